/*!

# Quick start with an online form

This example runs an election end to end, using an online form to collect
the votes. Google Forms and Microsoft Forms both work.

We would like to decide between 3 candidates: Alice, Bob and Charlie.
Create a new form with one **Multiple Choice Grid** question. The rows are the
candidates (`Alice`, `Bob`, `Charlie`) and the columns are the ranks (`1`,
`2`, `3`). Voters are free to give the same rank to several candidates, or to
leave candidates unranked.

After the poll has ended, export the responses as an Excel (xlsx) file. The
first column holds the timestamp of each response, and each of the following
columns holds the ranks given to one candidate.

Run `irvtab` on the file:

```bash
irvtab -i 'responses.xlsx' --tie-breaking-rule ALL
```

The program prints the standings of every round:

```text
Read 3 ballots and 3 candidates from responses.xlsx.
Candidates: Alice, Bob, Charlie
Tie-breaking rule: ALL (eliminate all tied candidates at once)
-------------------------------------
Round #1 of election with 3 ballots and 3 candidates

Alice: 66.66666666666667%
Bob: 33.333333333333336%
Charlie: 0.0%

Majority winner: Alice
```

With these few example votes, `Alice` is the winner of this election.

**Saving the results** A summary of every round can be written in JSON with
the `--out` flag (`--out stdout` prints it instead).

It is the end of this quick start. See the [manual](../manual/index.html) for
the input formats, the tie-breaking rules and the configuration file.

*/
