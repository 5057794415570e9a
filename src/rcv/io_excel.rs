// Primitives for reading Excel files, as exported by online forms.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::rcv::{
    io_common::{assemble_ranks, candidate_columns, make_default_id, parse_rank},
    *,
};

pub fn read_excel_ranking(
    path: &str,
    first_column_index: usize,
    worksheet_name: Option<&str>,
) -> RcvResult<ParsedElection> {
    let wrange = get_range(path, worksheet_name)?;
    let default_id = make_default_id(path);

    // Rows of the range start at its first used cell. Columns are counted from
    // column A and lines from line 1, as in the spreadsheet.
    let (start_row, start_col) = wrange.start().unwrap_or((0, 0));
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut iter = wrange.rows();
    let header_row = iter.next().context(MissingHeaderSnafu { path })?;
    let mut header: Vec<Option<String>> = vec![None; start_col];
    for (idx, cell) in header_row.iter().enumerate() {
        header.push(read_header_cell(cell, start_col + idx)?);
    }
    debug!("read_excel_ranking: header: {:?}", header);
    let columns = candidate_columns(&header, first_column_index)?;

    let mut ballots: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = start_row + idx + 2;
        let ranks = assemble_ranks(&columns, |col| {
            match col.checked_sub(start_col).and_then(|c| row.get(c)) {
                Some(cell) => read_rank_cell(cell, lineno),
                None => Ok(None),
            }
        })?;
        debug!("read_excel_ranking: lineno: {:?} ranks: {:?}", lineno, ranks);
        ballots.push(ParsedBallot {
            id: default_id(lineno),
            ranks,
        });
    }

    Ok(ParsedElection {
        candidates: columns.into_iter().map(|(_, name)| name).collect(),
        ballots,
    })
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> RcvResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    debug!("get_range: worksheets: {:?}", workbook.sheet_names());
    let wrange = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?,
    };
    wrange.context(OpeningExcelSnafu { path })
}

fn read_header_cell(cell: &DataType, column: usize) -> RcvResult<Option<String>> {
    match cell {
        DataType::String(s) => Ok(Some(s.clone())),
        DataType::Int(i) => Ok(Some(i.to_string())),
        DataType::Float(f) => Ok(Some(f.to_string())),
        DataType::Empty => Ok(None),
        x => WrongHeaderCellSnafu {
            column,
            content: format!("{:?}", x),
        }
        .fail(),
    }
}

fn read_rank_cell(cell: &DataType, lineno: usize) -> RcvResult<Option<f64>> {
    match cell {
        DataType::Int(i) => Ok(Some(*i as f64)),
        DataType::Float(f) if f.is_finite() => Ok(Some(*f)),
        DataType::String(s) => parse_rank(s, lineno),
        DataType::Empty => Ok(None),
        x => WrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", x),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_cells() {
        assert_eq!(
            read_header_cell(&DataType::String("Alice".to_string()), 1).unwrap(),
            Some("Alice".to_string())
        );
        assert_eq!(read_header_cell(&DataType::Empty, 1).unwrap(), None);
        assert_eq!(
            read_header_cell(&DataType::Int(2023), 1).unwrap(),
            Some("2023".to_string())
        );
        assert!(matches!(
            read_header_cell(&DataType::Bool(true), 4),
            Err(RcvError::WrongHeaderCell { column: 4, .. })
        ));
    }

    #[test]
    fn rank_cells() {
        assert_eq!(read_rank_cell(&DataType::Int(2), 2).unwrap(), Some(2.0));
        assert_eq!(read_rank_cell(&DataType::Float(1.5), 2).unwrap(), Some(1.5));
        assert_eq!(
            read_rank_cell(&DataType::String(" 3 ".to_string()), 2).unwrap(),
            Some(3.0)
        );
        assert_eq!(read_rank_cell(&DataType::Empty, 2).unwrap(), None);
        assert!(matches!(
            read_rank_cell(&DataType::Bool(false), 7),
            Err(RcvError::WrongCellType { lineno: 7, .. })
        ));
        assert!(read_rank_cell(&DataType::String("first".to_string()), 7).is_err());
    }

    fn test_file() -> String {
        concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/simpsons.xlsx").to_string()
    }

    fn ranks(r: &[(&str, f64)]) -> Vec<(String, f64)> {
        r.iter().map(|(n, x)| (n.to_string(), *x)).collect()
    }

    #[test]
    fn read_form() {
        let pe = read_excel_ranking(&test_file(), 1, None).unwrap();
        assert_eq!(pe.candidates.len(), 10);
        assert_eq!(pe.candidates[0], "Homer Simpson");
        assert_eq!(pe.candidates[9], "Montgomery Burns");
        assert_eq!(pe.ballots.len(), 3);
        assert_eq!(
            pe.ballots[0].ranks,
            ranks(&[("Homer Simpson", 3.0), ("Marge Simpson", 1.0), ("Lisa Simpson", 2.0)])
        );
        // Numeric text is a rank.
        assert_eq!(
            pe.ballots[2].ranks,
            ranks(&[("Homer Simpson", 1.0), ("Marge Simpson", 1.0), ("Lisa Simpson", 3.0)])
        );
        assert_eq!(pe.ballots[2].id, "simpsons.xlsx-00000004");
    }

    #[test]
    fn read_form_from_first_column() {
        // The timestamps are not ranks.
        assert!(matches!(
            read_excel_ranking(&test_file(), 0, None),
            Err(RcvError::WrongCellType { lineno: 2, .. })
        ));
    }

    #[test]
    fn worksheet_by_name() {
        let first = read_excel_ranking(&test_file(), 1, Some("Form1")).unwrap();
        assert_eq!(first.candidates.len(), 10);

        // Column A of this worksheet is empty: the candidates start at column B.
        let pe = read_excel_ranking(&test_file(), 1, Some("Shifted")).unwrap();
        assert_eq!(pe.candidates, vec!["Alice", "Bob"]);
        assert_eq!(pe.ballots.len(), 2);
        assert_eq!(pe.ballots[0].ranks, ranks(&[("Alice", 1.0), ("Bob", 2.0)]));
        assert_eq!(pe.ballots[1].ranks, ranks(&[("Bob", 1.0)]));

        let pe = read_excel_ranking(&test_file(), 2, Some("Shifted")).unwrap();
        assert_eq!(pe.candidates, vec!["Bob"]);
    }

    #[test]
    fn missing_worksheet() {
        assert!(matches!(
            read_excel_ranking(&test_file(), 1, Some("Form2")),
            Err(RcvError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_excel_ranking("/nonexistent/irvtab/ballots.xlsx", 1, None),
            Err(RcvError::OpeningExcel { .. })
        ));
    }
}
