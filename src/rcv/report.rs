// Textual and JSON reports of an election.

use std::collections::BTreeSet;

use instant_runoff::*;
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

fn names(cands: &BTreeSet<Candidate>) -> String {
    cands
        .iter()
        .map(|c| c.name())
        .collect::<Vec<&str>>()
        .join(", ")
}

/// Percentages always carry a decimal part: 50.0, 33.333333333333336
fn fmt_percent(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("{:.1}", pct)
    } else {
        format!("{}", pct)
    }
}

/// Prints the progress of one round on the standard output.
pub fn print_round(stats: &RoundStats) {
    if stats.round > 1 {
        println!();
    }
    println!("-------------------------------------");
    println!(
        "Round #{} of election with {} ballots and {} candidates\n",
        stats.round, stats.num_ballots, stats.num_candidates
    );
    for (c, pct) in stats.standings.iter() {
        println!("{}: {}%", c, fmt_percent(*pct));
    }

    if let RunoffState::MajorityWinner(winners) = &stats.state {
        println!(
            "\nMajority winner{}: {}",
            if winners.len() == 1 { "" } else { "s (tied)" },
            names(winners)
        );
        return;
    }
    println!(
        "\nThe top-preference candidate{} not have absolute majority.",
        if stats.most_voted.len() > 1 {
            "s do"
        } else {
            " does"
        }
    );
    println!(
        "\n{} with the least preferences: {}",
        if stats.least_voted.len() > 1 {
            "Tied candidates"
        } else {
            "Candidate"
        },
        names(&stats.least_voted)
    );
    match &stats.state {
        RunoffState::AllTied(tied) => {
            println!("\nAll remaining candidates are tied: {}", names(tied));
        }
        _ => {
            println!(
                "\nEliminating candidate{} with the least preferences: {}",
                if stats.eliminated.len() > 1 { "s" } else { "" },
                names(&stats.eliminated)
            );
        }
    }
}

fn round_to_js(stats: &RoundStats) -> JSValue {
    let mut tally: JSMap<String, JSValue> = JSMap::new();
    for (c, count) in stats.tally.iter() {
        tally.insert(c.name().to_string(), json!(count.to_string()));
    }
    let mut standings: JSMap<String, JSValue> = JSMap::new();
    for (c, pct) in stats.standings.iter() {
        standings.insert(c.name().to_string(), json!(pct));
    }

    let mut tally_results: Vec<JSValue> = Vec::new();
    match &stats.state {
        RunoffState::MajorityWinner(winners) => {
            for c in winners.iter() {
                tally_results.push(json!({ "elected": c.name() }));
            }
        }
        RunoffState::AllTied(tied) => {
            for c in tied.iter() {
                tally_results.push(json!({ "tied": c.name() }));
            }
        }
        RunoffState::Running(_) => {
            for c in stats.eliminated.iter() {
                tally_results.push(json!({ "eliminated": c.name() }));
            }
        }
    }

    json!({
        "round": stats.round,
        "pebblesPerVote": stats.pebbles_per_vote.to_string(),
        "tally": tally,
        "standings": standings,
        "tallyResults": tally_results,
    })
}

/// The summary of an election, in JSON.
pub fn summary_js(contest_name: &str, rule: TieBreakingRule, rounds: &[RoundStats]) -> JSValue {
    let num_ballots = rounds.first().map(|rs| rs.num_ballots).unwrap_or(0);
    let results: Vec<JSValue> = rounds.iter().map(round_to_js).collect();
    json!({
        "config": {
            "contest": contest_name,
            "tieBreakingRule": rule.name(),
            "ballots": num_ballots,
        },
        "results": results,
    })
}
