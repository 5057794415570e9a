use crate::rcv::*;

use log::warn;
use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno: usize| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Reads a rank written as text. Empty text means that no preference was expressed.
pub fn parse_rank(content: &str, lineno: usize) -> RcvResult<Option<f64>> {
    let s = content.trim();
    if s.is_empty() {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(Some(x)),
        _ => WrongCellTypeSnafu {
            lineno,
            content: s,
        }
        .fail(),
    }
}

/// Selects the candidate columns of the header, starting at the first column index.
///
/// Returns the index of each column with its candidate name. Columns with an
/// empty header are skipped.
pub fn candidate_columns(
    header: &[Option<String>],
    first_column_index: usize,
) -> RcvResult<Vec<(usize, String)>> {
    if first_column_index >= header.len() {
        return FirstColumnOutOfRangeSnafu {
            index: first_column_index,
            width: header.len(),
        }
        .fail();
    }
    let mut res: Vec<(usize, String)> = Vec::new();
    for (idx, name_o) in header.iter().enumerate().skip(first_column_index) {
        match name_o.as_ref().map(|s| s.trim()) {
            Some(name) if !name.is_empty() => res.push((idx, name.to_string())),
            _ => {
                warn!("candidate_columns: column {} has no name, skipping it", idx);
            }
        }
    }
    Ok(res)
}

/// Assembles the ranks of a row, given a function that reads the rank of a column.
pub fn assemble_ranks<F>(columns: &[(usize, String)], mut rank_at: F) -> RcvResult<Vec<(String, f64)>>
where
    F: FnMut(usize) -> RcvResult<Option<f64>>,
{
    let mut ranks: Vec<(String, f64)> = Vec::new();
    for (idx, name) in columns.iter() {
        if let Some(rank) = rank_at(*idx)? {
            ranks.push((name.clone(), rank));
        }
    }
    Ok(ranks)
}
