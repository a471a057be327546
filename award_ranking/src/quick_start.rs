/*!

# Quick start

This example runs the awards of a small event end to end.

**Recording the teams** Write the roster in a JSON file, for instance `roster.json`:

```json
{
  "teams": [
    { "name": "Alpha", "finalAmount": 250000, "playTime": { "minutes": 35 }, "level": 5,
      "members": [ { "name": "A1", "hp": 95 }, { "name": "A2", "hp": 88 },
                   { "name": "A3", "hp": 92 }, { "name": "A4", "hp": 85 } ] },
    { "name": "Bravo", "finalAmount": 280000, "playTime": { "minutes": 42 }, "level": 5,
      "members": [ { "name": "B1", "hp": 100 }, { "name": "B2", "hp": 95 },
                   { "name": "B3", "hp": 90 }, { "name": "B4", "hp": 88 } ] },
    { "name": "Charlie", "finalAmount": 180000, "playTime": { "minutes": 32 }, "level": 3,
      "members": [ { "name": "C1", "hp": 75 }, { "name": "C2", "hp": 72 },
                   { "name": "C3", "hp": 70 }, { "name": "C4", "hp": 68 } ] }
  ]
}
```

**Announcing the results** Run `raceboard` on this file, revealing the last
rank then the two others:

```bash
raceboard -i roster.json --award master --reveal next --reveal batch
```

The summary is printed in JSON format. The ranks that are still hidden show
`???` for every field.

```text
[2024-03-02T09:55:59Z INFO  award_ranking] compute_ranking: Master: processing 3 teams
[2024-03-02T09:55:59Z INFO  award_ranking::reveal] begin_reveal: revealing ranks [3]
[2024-03-02T09:55:59Z INFO  award_ranking::reveal] begin_reveal: revealing ranks [2, 1]
```

Without `--reveal`, all the leaderboards are hidden. Use `--reveal all` to show
everything.

**Using a configuration file** The same event can be described in a
configuration file, which also sets the rules:

```json
{
  "outputSettings": { "eventName": "Spring cup", "outputPath": "summary.json" },
  "rosterSources": [ { "provider": "json", "filePath": "roster.json" } ],
  "rules": { "hpPerMissingMember": 80, "revealBatchSize": 3, "revealDelayMs": 300 }
}
```

```bash
raceboard -c event.json --reveal all
```

*/
