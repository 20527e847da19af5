/*!

This is the long-form manual for `ranked_pairs` and `tideman`.

## The method

Ranked Pairs (also known as the Tideman method) elects a single winner from
complete rankings:

1. For every pair of candidates, count how many voters rank one above the other.
2. Keep, for each pair, the direction preferred by more voters. A pair with the
   same count both ways is dropped.
3. Sort these victories: larger margin first, then more votes for the winner,
   then by the index of the winner and of the loser in the roster.
4. Lock each victory as an edge `winner -> loser`, in that order, unless the edge
   would close a cycle with the edges already locked.
5. The winner is the candidate without an incoming edge. If more than one remains
   (this happens when some pairs are tied), the first one in roster order wins;
   `sources` in the summary lists all of them.

Every ballot must rank every candidate exactly once. Incomplete ballots and
ballots repeating a candidate are rejected and do not contribute to the tally.

## Input formats

The following formats are supported:
* `csv` one column per candidate, holding ranks (the default)
* `csv_choices` one column per rank, holding candidate names
* `xlsx` the `csv` layout in an Excel worksheet
* `prompt` interactive entry in the terminal

### `csv`

```text
VoterID,Alice,Bob,Charlie
101,2,1,3
102,1,3,2
```

The first row holds the candidate names. Each following row is a voter: the
number in a candidate column is the rank given to that candidate (1 is the most
preferred). In the example, voter `101` ranks Bob first, Alice second and Charlie
third.

A rank that is not a number, outside of `1..N` or given twice in the same row
makes the file invalid. A blank cell leaves the ballot incomplete: it is
rejected (or stops the count with `--strict`).

### `csv_choices`

```text
id,choice 1,choice 2,choice 3
id1,Bob,Alice,Charlie
id2,Alice,Charlie,Bob
```

Each column (in order) is a rank. The names in the header are not significant.

### `xlsx`

The `csv` layout, read from an Excel file. If the workbook holds more than one
worksheet, its name must be given with `--excel-worksheet-name` or
`excelWorksheetName`.

### `prompt`

Asks for the number of candidates, their names, the number of voters, then for
every voter the name at each rank. The candidates are not asked for when
`--candidates` or the configuration lists them.

## Configuration

`tideman` accepts an election description in JSON with `--config`:

```text
{
  "outputSettings": {
    "contestName": "Board election",
    "outputDirectory": "output",
    "contestDate": "2024-05-02",
    "contestJurisdiction": "",
    "contestOffice": ""
  },
  "cvrFileSources": [
    {
      "provider": "csv",
      "filePath": "ballots.csv",
      "idColumnIndex": 1,
      "firstVoteColumnIndex": 2,
      "firstVoteRowIndex": 2
    }
  ],
  "candidates": [
    { "name": "Alice" },
    { "name": "Bob" },
    { "name": "Charlie" }
  ]
}
```

FileSource:
 - `provider` (string): one of the input formats above, except `prompt`.
 - `filePath` (string): relative to the directory of the configuration file.
 - `idColumnIndex` (number or column letter, optional): the column holding the
   ballot id. Without it, ids are made from the file name and line number.
 - `firstVoteColumnIndex` (number or column letter, default 2).
 - `firstVoteRowIndex` (number, default 2): the first row holding a ballot. The
   row above holds the header.
 - `excelWorksheetName` (string, optional).

`candidates` is optional. Without it, the candidates are read from the header of
the first `csv` or `xlsx` source. Their order defines the roster order used to
break ties.

When `outputDirectory` is set and `--out` is not given, the summary is written
to `<outputDirectory>/<contestName>_summary.json`.

## Output

The summary lists the candidates and their codes (when the configuration gives
one), the preference matrix, every pair with its margin, votes and
whether it was locked, the locked edges, the candidates without incoming edge,
and the winner.

 */
