/*!

This is the long-form manual for `award_ranking` and `raceboard`.

## Teams

A team has a name, the amount it collected at the end of the game, the number
of minutes it played, the final level it reached (1 to 5) and 4 member slots.
Each member slot holds a name and the hp the member had left at the end.

The amount and the minutes may be left empty while the game is still running.
An empty time is not the same as zero minutes: it is unknown.

### Surviving hp

The hp total of a team is the sum of the hp of its members. A member counts as
having played if a name was entered or if some hp was recorded. Every slot
without such a member adds 80 hp, so that the teams that played with fewer
members are not penalized for it.

| members     | hp         | hp total             |
|-------------|------------|----------------------|
| 4 members   | 95 88 92 85| 360                  |
| 2 members   | 50 30      | 80 + 2 x 80 = 240    |
| no member   |            | 4 x 80 = 320         |

## Awards

### `master`

```text
score = (amount / minutes) x hp total x level
```

Higher is better. A team without amount, without time or without hp does not
qualify.

### `collection`

The amount collected. Higher is better. Every team is ranked, a team without
an amount counts as zero.

### `time-attack`

The minutes it took to finish, for the teams that reached level 5. Lower is
better. Teams below level 5, or without a time, do not qualify.

## Ranks

Ranks are dense: teams with exactly the same score share the same rank and are
all marked as tied, and the next team takes the next rank. For instance, with
the amounts 200000, 200000 and 150000, the collection ranks are 1, 1 and 2.

The teams that do not qualify for an award are still listed, after all the
others, in the order of the roster. Each of them gets its own rank, following
the last rank of the qualified teams.

When a complete order of the teams is needed (the qualifying order), teams
with the same amount are ordered by name.

## Reveal

The results of each award are disclosed independently, starting from the last
rank:

* `next` reveals the worst rank still hidden
* `batch` reveals the next 3 hidden ranks
* `all` reveals everything, or hides everything if all the ranks are shown

`next` and `batch` wait for a short delay (300 ms by default) before showing
the ranks. Another `next` or `batch` cannot start during this delay. When all
the ranks are shown, `next` and `batch` hide everything again.

## Input formats

The following formats are supported by `raceboard`:
* `json` The roster as saved by the board (`{"teams": [...]}`), the exported
  team list (`{"version": "1.0", "teams": [...]}`) or a plain list of teams.
* `xlsx` An Excel spreadsheet with one team per row.

### `json`

```json
{
  "teams": [
    {
      "id": "alpha",
      "name": "Alpha",
      "finalAmount": 250000,
      "playTime": { "minutes": 35 },
      "level": 5,
      "members": [
        { "name": "Anna", "hp": 95 },
        { "name": "Bob", "hp": "" }
      ]
    }
  ]
}
```

Empty strings stand for values that were not entered. Missing ids are
generated from the file name and the position of the team.

### `xlsx`

The first row is a header and is skipped. The columns are, in order:

| name | amount | minutes | level | member 1 | hp 1 | member 2 | hp 2 | member 3 | hp 3 | member 4 | hp 4 |
|------|--------|---------|-------|----------|------|----------|------|----------|------|----------|------|

Empty cells are values that were not entered and blank rows are skipped. The
worksheet and the first team row can be set in the configuration with
`excelWorksheetName` and `firstTeamRowIndex` (counted from 1).

*/
