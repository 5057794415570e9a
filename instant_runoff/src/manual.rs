/*!

This is the long-form manual for `instant_runoff` and `irvtab`.

## Ballots

A ballot gives a rank to some of the candidates. Only the order of the ranks
matters: `1, 2, 3` and `-5, 0.5, 100` describe the same ballot. Candidates with
the same rank are tied on this ballot. Candidates without a rank are all tied
in last position.

| ranks given                    | preferences            |
|--------------------------------|------------------------|
| Alice=1, Bob=2, Charlie=1      | 1. Alice, Charlie 2. Bob |
| Alice=1 (Bob, Charlie unranked)| 1. Alice 2. Bob, Charlie |
| nothing                        | 1. Alice, Bob, Charlie |

## Counting

Each round, every ballot gives one vote to its most preferred candidate(s) still
in the race. A ballot that ties `n` candidates at its top gives `1/n` of a vote
to each of them. These fractions are counted exactly, using *pebbles*: a vote is
worth as many pebbles as the least common multiple of the sizes of the top
groups of all the ballots. The percentages shown in the output are derived
from the pebbles and only serve for display.

A candidate with strictly more than half of the votes wins. Otherwise, the
candidate(s) with the fewest votes are eliminated and the next round starts.
If all the remaining candidates have the same number of votes and the
tie-breaking rule would eliminate all of them, the election ends with all of
them tied.

## Tie-breaking rules

When several candidates have the fewest votes:

* `ALL` eliminates all of them at once (default).
* `RANDOM` eliminates one of them at random, independently for each tie.
* `RVH` (random voter hierarchy) draws one random ordering of all the
  candidates at the start of the election, and each tie eliminates the tied
  candidate that comes first in this ordering.

`RANDOM` and `RVH` are reproducible when a seed is given (`--seed` or
`randomSeed`).

## Input formats

* `xlsx` Excel workbook, typically exported from Google Forms or Microsoft Forms.
* `csv` Comma Separated Values with the same layout.

Both expect one header row with the candidate names, and one row per ballot:

|  Timestamp | Alice | Bob | Charlie |
|------------|-------|-----|---------|
| 2024-01-01 | 1     | 2   |         |
| 2024-01-02 | 2     | 1   | 1       |

The columns before `firstColumnIndex` (0-based, default 1) are ignored.
Empty cells mean that no preference was expressed.

## Configuration

All the options can be given on the command line or in a JSON file passed
with `--config`. The command line takes precedence.

```text
{
  "contestName": "Board election",
  "filePath": "ballots.xlsx",
  "inputType": "xlsx",
  "firstColumnIndex": 1,
  "excelWorksheetName": "Form1",
  "tieBreakingRule": "RVH",
  "randomSeed": 42,
  "outputPath": "summary.json"
}
```

A relative `filePath` is resolved against the directory of the configuration
file.

 */
