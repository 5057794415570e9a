// Primitives for reading CSV files.

use crate::rcv::{
    io_common::{assemble_ranks, candidate_columns, make_default_id, parse_rank},
    *,
};

pub fn read_csv_ranking(path: &str, first_column_index: usize) -> RcvResult<ParsedElection> {
    let default_id = make_default_id(path);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let header: Vec<Option<String>> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1_usize })?
        .iter()
        .map(|s| Some(s.to_string()))
        .collect();
    debug!("read_csv_ranking: header: {:?}", header);
    let columns = candidate_columns(&header, first_column_index)?;

    let mut ballots: Vec<ParsedBallot> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let ranks = assemble_ranks(&columns, |col| match line.get(col) {
            Some(content) => parse_rank(content, lineno),
            None => Ok(None),
        })?;
        debug!("read_csv_ranking: lineno: {:?} ranks: {:?}", lineno, ranks);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tmp(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    #[test]
    fn read_simple() {
        let path = write_tmp(
            "irvtab_read_simple.csv",
            "Timestamp,Alice,Bob,Charlie\n\
             2023-01-01,1,2,\n\
             2023-01-02,,1,1\n\
             2023-01-03,3,2.5,1\n",
        );
        let pe = read_csv_ranking(&path, 1).unwrap();
        assert_eq!(pe.candidates, vec!["Alice", "Bob", "Charlie"]);
        assert_eq!(pe.ballots.len(), 3);
        assert_eq!(
            pe.ballots[0].ranks,
            vec![("Alice".to_string(), 1.0), ("Bob".to_string(), 2.0)]
        );
        assert_eq!(
            pe.ballots[1].ranks,
            vec![("Bob".to_string(), 1.0), ("Charlie".to_string(), 1.0)]
        );
        assert_eq!(pe.ballots[2].ranks.len(), 3);
        assert_eq!(pe.ballots[2].id, "irvtab_read_simple.csv-00000004");
    }

    #[test]
    fn short_rows_and_first_column() {
        let path = write_tmp("irvtab_short_rows.csv", "Alice,Bob,Charlie\n1\n,,1\n");
        let pe = read_csv_ranking(&path, 0).unwrap();
        assert_eq!(pe.candidates.len(), 3);
        assert_eq!(pe.ballots[0].ranks, vec![("Alice".to_string(), 1.0)]);
        assert_eq!(pe.ballots[1].ranks, vec![("Charlie".to_string(), 1.0)]);
    }

    #[test]
    fn bad_cell() {
        let path = write_tmp("irvtab_bad_cell.csv", "Id,Alice,Bob\n1,1,2\n2,first,2\n");
        assert!(matches!(
            read_csv_ranking(&path, 1),
            Err(RcvError::WrongCellType { lineno: 3, .. })
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_csv_ranking("/nonexistent/irvtab/ballots.csv", 1),
            Err(RcvError::CsvOpen { .. })
        ));
    }
}
