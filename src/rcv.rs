use log::{debug, info};

use instant_runoff::builder::Builder;
use instant_runoff::*;
use snafu::{prelude::*, Snafu};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value as JSValue;
use std::fs;

use crate::rcv::config_reader::*;
use crate::rcv::io_common::simplify_file_name;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod report;

#[derive(Debug, Snafu)]
pub enum RcvError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Missing header row in {path}"))]
    MissingHeader { path: String },
    #[snafu(display("Header column {column} is not a candidate name: {content}"))]
    WrongHeaderCell { column: usize, content: String },
    #[snafu(display("Line {lineno}: cannot read a rank out of {content}"))]
    WrongCellType { lineno: usize, content: String },
    #[snafu(display("The first column index {index} is beyond the {width} columns of the input"))]
    FirstColumnOutOfRange { index: usize, width: usize },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error reading {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Field {field} is not a valid number"))]
    ParsingJsonNumber { field: String },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("No input file given (use --input or filePath in the configuration)"))]
    MissingInput {},
    #[snafu(display("Unknown input type {input_type} (expected xlsx or csv)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Voting error: {source}"))]
    Voting { source: VotingErrors },
}

pub type RcvResult<T> = Result<T, RcvError>;

/// A ballot, as read from the input: the rank given to each candidate.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: String,
    pub ranks: Vec<(String, f64)>,
}

/// The content of an input file: the candidates (in column order) and the ballots.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedElection {
    pub candidates: Vec<String>,
    pub ballots: Vec<ParsedBallot>,
}

fn read_ranking_data(settings: &Settings) -> RcvResult<ParsedElection> {
    info!(
        "Attempting to read rank file {:?} ({:?})",
        settings.input_path, settings.input_type
    );
    match settings.input_type {
        InputType::Xlsx => io_excel::read_excel_ranking(
            &settings.input_path,
            settings.first_column_index,
            settings.excel_worksheet_name.as_deref(),
        ),
        InputType::Csv => io_csv::read_csv_ranking(&settings.input_path, settings.first_column_index),
    }
}

fn build_election(parsed: &ParsedElection, seed: Option<u64>) -> RcvResult<Election> {
    let mut builder = Builder::new()
        .candidates(&parsed.candidates)
        .context(VotingSnafu {})?;
    for pb in parsed.ballots.iter() {
        debug!("build_election: ballot {}: {:?}", pb.id, pb.ranks);
        builder.add_ranks(&pb.ranks);
    }
    let rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    Ok(builder.build(rng))
}

/// Runs the election round by round, printing the progress.
fn run_rounds(election: &mut Election, rule: TieBreakingRule) -> RcvResult<Vec<RoundStats>> {
    let mut res: Vec<RoundStats> = Vec::new();
    loop {
        let stats = election.run_round(rule).context(VotingSnafu {})?;
        report::print_round(&stats);
        let done = stats.state.is_terminal();
        res.push(stats);
        if done {
            return Ok(res);
        }
    }
}

fn write_summary(out: &str, summary: &JSValue) -> RcvResult<()> {
    let pretty_js = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    if out == "stdout" {
        println!("{}", pretty_js);
    } else {
        info!("Writing summary to {:?}", out);
        fs::write(out, pretty_js).context(WritingSummarySnafu { path: out })?;
    }
    Ok(())
}

pub fn run_election(settings: &Settings) -> RcvResult<Vec<RoundStats>> {
    info!("settings: {:?}", settings);
    let parsed = read_ranking_data(settings)?;
    println!(
        "Read {} ballots and {} candidates from {}.",
        parsed.ballots.len(),
        parsed.candidates.len(),
        simplify_file_name(&settings.input_path)
    );
    let mut sorted_names = parsed.candidates.clone();
    sorted_names.sort();
    println!("Candidates: {}", sorted_names.join(", "));

    let mut election = build_election(&parsed, settings.seed)?;
    println!(
        "Tie-breaking rule: {} ({})",
        settings.rule,
        settings.rule.description()
    );
    let rounds = run_rounds(&mut election, settings.rule)?;

    if let Some(out) = settings.out.as_deref() {
        let summary = report::summary_js(&settings.contest_name, settings.rule, &rounds);
        write_summary(out, &summary)?;
    }
    Ok(rounds)
}
