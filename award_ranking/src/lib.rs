/*!
Scoring, dense ranking and progressive reveal of the award leaderboards of a
team event.

Three leaderboards are computed independently from the same roster:

* [`Award::Master`]: `(final amount / minutes) * hp total * level`, higher is better
* [`Award::Collection`]: the final amount, higher is better
* [`Award::TimeAttack`]: the play time of the teams that reached the last level, lower is better

```
use award_ranking::builder::Builder;
use award_ranking::*;

let mut builder = Builder::new();
builder.add_team_simple("a", "Alpha", Some(250000.0), Some(35.0), 5, &[("Ann", 95.0)])?;
builder.add_team_simple("b", "Bravo", Some(280000.0), Some(42.0), 4, &[("Bob", 100.0)])?;
let roster = builder.build();

let ranking = compute_ranking(&roster, Award::Collection, &AwardRules::DEFAULT_RULES);
assert_eq!(ranking[0].team.name, "Bravo");
assert_eq!(ranking[0].rank, 1);
# Ok::<(), RosterErrors>(())
```

See the [manual] for the complete rules.
*/

pub mod builder;
mod config;
mod leaderboard;
pub mod manual;
pub mod quick_start;
mod reveal;
pub mod scoring;

use log::{debug, info};

use std::{cmp::Ordering, collections::HashMap};

pub use crate::config::*;
pub use crate::leaderboard::*;
pub use crate::reveal::*;

// **** Private structures ****

// A team with its metrics for one award, before ranking.
#[derive(Debug, Clone)]
struct ScoredTeam<'a> {
    team: &'a Team,
    hp_total: f64,
    score: Score,
}

impl<'a> ScoredTeam<'a> {
    // Only called on qualified teams.
    fn value(&self) -> f64 {
        self.score.value().unwrap_or(0.0)
    }

    fn into_ranked(self, rank: Rank, is_tie: bool) -> RankedTeam {
        RankedTeam {
            team: self.team.clone(),
            hp_total: self.hp_total,
            score: self.score,
            rank,
            is_tie,
        }
    }
}

/// Computes the leaderboard of one award.
///
/// The qualified teams come first, in award order. Teams with equal scores
/// share the same rank and are all flagged as tied. Ranks are dense: the
/// team after a tie takes the next integer.
///
/// The teams that do not qualify follow, in roster order, each with its own
/// rank continuing the same counter.
pub fn compute_ranking(roster: &[Team], award: Award, rules: &AwardRules) -> Vec<RankedTeam> {
    info!(
        "compute_ranking: {:?}: processing {} teams",
        award,
        roster.len()
    );
    let (qualified, unqualified): (Vec<ScoredTeam>, Vec<ScoredTeam>) = roster
        .iter()
        .map(|team| {
            let hp_total = scoring::hp_total(&team.members, rules);
            ScoredTeam {
                team,
                hp_total,
                score: scoring::award_score(award, team, hp_total, rules),
            }
        })
        .partition(|st| st.score.is_applicable());
    debug!(
        "compute_ranking: {:?}: {} qualified, {} not qualified",
        award,
        qualified.len(),
        unqualified.len()
    );

    let direction = award.direction();
    let res = assign_ranks(qualified, unqualified, |a, b| match direction {
        SortDirection::HigherIsBetter => b.value().total_cmp(&a.value()),
        SortDirection::LowerIsBetter => a.value().total_cmp(&b.value()),
    });
    for rt in res.iter() {
        debug!(
            "compute_ranking: {:?}: rank {} tie {} team {} score {:?}",
            award, rt.rank, rt.is_tie, rt.team.id, rt.score
        );
    }
    res
}

/// All the teams ordered by amount, then by name.
///
/// This is the total order used when the amount alone does not separate the
/// teams. Ranks and ties only look at the amount.
pub fn qualifying_order(roster: &[Team], rules: &AwardRules) -> Vec<RankedTeam> {
    let entries: Vec<ScoredTeam> = roster
        .iter()
        .map(|team| ScoredTeam {
            team,
            hp_total: scoring::hp_total(&team.members, rules),
            score: scoring::collection_score(team),
        })
        .collect();
    assign_ranks(entries, Vec::new(), |a, b| {
        b.value()
            .total_cmp(&a.value())
            .then_with(|| collate_names(&a.team.name, &b.team.name))
    })
}

/// Compares two team names for display purposes.
///
/// Letter case is ignored first and only used to separate names that are
/// otherwise equal.
pub fn collate_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// The rank of every team of a leaderboard, keyed by team id.
pub fn rank_map(ranking: &[RankedTeam]) -> HashMap<TeamId, Rank> {
    ranking
        .iter()
        .map(|rt| (rt.team.id.clone(), rt.rank))
        .collect()
}

// The qualified teams get sorted with `order`. Sorting is stable, so equal
// values keep the roster order.
fn assign_ranks<F>(
    mut qualified: Vec<ScoredTeam>,
    unqualified: Vec<ScoredTeam>,
    order: F,
) -> Vec<RankedTeam>
where
    F: Fn(&ScoredTeam, &ScoredTeam) -> Ordering,
{
    qualified.sort_by(|a, b| order(a, b));

    let mut res: Vec<RankedTeam> = Vec::with_capacity(qualified.len() + unqualified.len());
    for st in qualified {
        let value = st.value();
        let (rank, is_tie) = match res.last_mut() {
            Some(prev) if prev.score.value() == Some(value) => {
                prev.is_tie = true;
                (prev.rank, true)
            }
            Some(prev) => (prev.rank + 1, false),
            None => (1, false),
        };
        res.push(st.into_ranked(rank, is_tie));
    }

    // Never tied, even when they have the same inputs.
    for st in unqualified {
        let rank = res.last().map(|prev| prev.rank + 1).unwrap_or(1);
        res.push(st.into_ranked(rank, false));
    }
    res
}

#[cfg(test)]
mod tests {
    use super::builder::Builder;
    use super::*;
    use std::collections::BTreeSet;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn full_team(b: &mut Builder, id: &str, amount: f64, minutes: f64, level: u8, hps: [f64; 4]) {
        let members: Vec<(String, f64)> = hps
            .iter()
            .enumerate()
            .map(|(idx, hp)| (format!("{}-{}", id, idx), *hp))
            .collect();
        let members: Vec<(&str, f64)> = members.iter().map(|(n, hp)| (n.as_str(), *hp)).collect();
        b.add_team_simple(id, id, Some(amount), Some(minutes), level, &members)
            .unwrap();
    }

    fn ids(ranking: &[RankedTeam]) -> Vec<(&str, Rank, bool)> {
        ranking
            .iter()
            .map(|rt| (rt.team.id.0.as_str(), rt.rank, rt.is_tie))
            .collect()
    }

    fn assert_dense(ranking: &[RankedTeam]) {
        let ranks: BTreeSet<Rank> = ranking.iter().map(|rt| rt.rank).collect();
        let expected: BTreeSet<Rank> = (1..=ranks.len() as Rank).collect();
        assert_eq!(ranks, expected);
    }

    fn three_teams() -> Vec<Team> {
        let mut b = Builder::new();
        full_team(&mut b, "A", 250000.0, 35.0, 5, [95.0, 88.0, 92.0, 85.0]);
        full_team(&mut b, "B", 280000.0, 42.0, 5, [100.0, 95.0, 90.0, 88.0]);
        full_team(&mut b, "C", 180000.0, 32.0, 3, [75.0, 72.0, 70.0, 68.0]);
        b.build()
    }

    #[test]
    fn empty_roster() {
        init();
        for award in Award::ALL {
            assert!(compute_ranking(&[], award, &AwardRules::DEFAULT_RULES).is_empty());
        }
        assert!(qualifying_order(&[], &AwardRules::DEFAULT_RULES).is_empty());
    }

    #[test]
    fn master_three_teams() {
        init();
        let ranking = compute_ranking(&three_teams(), Award::Master, &AwardRules::DEFAULT_RULES);
        assert_eq!(
            ids(&ranking),
            vec![("A", 1, false), ("B", 2, false), ("C", 3, false)]
        );
        let scores: Vec<f64> = ranking.iter().map(|rt| rt.score.value().unwrap()).collect();
        assert!((scores[0] - 12_857_142.857).abs() < 0.01);
        assert!((scores[1] - 12_433_333.333).abs() < 0.01);
        assert!((scores[2] - 4_809_375.0).abs() < 0.01);
        assert_eq!(ranking[0].hp_total, 360.0);
        assert_eq!(ranking[1].hp_total, 373.0);
        assert_eq!(ranking[2].hp_total, 285.0);
    }

    #[test]
    fn time_attack_three_teams() {
        init();
        let ranking = compute_ranking(
            &three_teams(),
            Award::TimeAttack,
            &AwardRules::DEFAULT_RULES,
        );
        // C did not reach the last level: it comes last, not first.
        assert_eq!(
            ids(&ranking),
            vec![("A", 1, false), ("B", 2, false), ("C", 3, false)]
        );
        assert_eq!(ranking[2].score, Score::NotApplicable);
    }

    #[test]
    fn collection_tie_is_dense() {
        init();
        let mut b = Builder::new();
        full_team(&mut b, "x", 200000.0, 30.0, 2, [10.0, 10.0, 10.0, 10.0]);
        full_team(&mut b, "y", 150000.0, 20.0, 3, [20.0, 20.0, 20.0, 20.0]);
        full_team(&mut b, "z", 200000.0, 40.0, 4, [30.0, 30.0, 30.0, 30.0]);
        let ranking = compute_ranking(&b.build(), Award::Collection, &AwardRules::DEFAULT_RULES);
        assert_eq!(
            ids(&ranking),
            vec![("x", 1, true), ("z", 1, true), ("y", 2, false)]
        );
        assert_dense(&ranking);
    }

    #[test]
    fn all_tied() {
        init();
        let mut b = Builder::new();
        for id in ["p", "q", "r", "s"] {
            full_team(&mut b, id, 1000.0, 10.0, 5, [50.0, 50.0, 50.0, 50.0]);
        }
        let roster = b.build();
        for award in Award::ALL {
            let ranking = compute_ranking(&roster, award, &AwardRules::DEFAULT_RULES);
            assert_eq!(ranking.len(), 4);
            assert!(ranking.iter().all(|rt| rt.rank == 1 && rt.is_tie));
        }
    }

    #[test]
    fn unqualified_teams_follow_in_roster_order() {
        init();
        let mut b = Builder::new();
        b.add_team_simple("late1", "Late 1", None, None, 1, &[])
            .unwrap();
        full_team(&mut b, "fast", 100.0, 20.0, 5, [1.0, 1.0, 1.0, 1.0]);
        b.add_team_simple("late2", "Late 2", None, None, 1, &[])
            .unwrap();
        full_team(&mut b, "slow", 100.0, 30.0, 5, [1.0, 1.0, 1.0, 1.0]);
        full_team(&mut b, "lv4", 100.0, 10.0, 4, [1.0, 1.0, 1.0, 1.0]);
        let roster = b.build();

        let ranking = compute_ranking(&roster, Award::TimeAttack, &AwardRules::DEFAULT_RULES);
        assert_eq!(
            ids(&ranking),
            vec![
                ("fast", 1, false),
                ("slow", 2, false),
                ("late1", 3, false),
                ("late2", 4, false),
                ("lv4", 5, false)
            ]
        );

        let ranking = compute_ranking(&roster, Award::Master, &AwardRules::DEFAULT_RULES);
        assert_eq!(
            ids(&ranking),
            vec![
                ("lv4", 1, false),
                ("fast", 2, false),
                ("slow", 3, false),
                ("late1", 4, false),
                ("late2", 5, false)
            ]
        );
    }

    #[test]
    fn unqualified_block_after_a_tie() {
        init();
        let mut b = Builder::new();
        full_team(&mut b, "t1", 100.0, 20.0, 5, [1.0, 1.0, 1.0, 1.0]);
        full_team(&mut b, "t2", 500.0, 20.0, 5, [1.0, 1.0, 1.0, 1.0]);
        b.add_team_simple("dnf", "DNF", Some(10.0), Some(20.0), 2, &[])
            .unwrap();
        let ranking = compute_ranking(&b.build(), Award::TimeAttack, &AwardRules::DEFAULT_RULES);
        assert_eq!(
            ids(&ranking),
            vec![("t1", 1, true), ("t2", 1, true), ("dnf", 2, false)]
        );
    }

    #[test]
    fn ranks_are_dense_and_ties_consistent() {
        init();
        // A deterministic spread of values with many collisions.
        let mut b = Builder::new();
        for idx in 0..40u32 {
            let amount = ((idx * 7) % 5) as f64 * 1000.0;
            let minutes = ((idx * 3) % 4) as f64 * 10.0;
            let level = (idx % 5 + 1) as u8;
            let hp = ((idx * 11) % 3) as f64 * 25.0;
            full_team(
                &mut b,
                &format!("team{}", idx),
                amount,
                minutes,
                level,
                [hp, hp, 0.0, 0.0],
            );
        }
        let roster = b.build();
        for award in Award::ALL {
            let ranking = compute_ranking(&roster, award, &AwardRules::DEFAULT_RULES);
            assert_eq!(ranking.len(), roster.len());
            assert_dense(&ranking);
            for a in ranking.iter() {
                for b in ranking.iter() {
                    if a.team.id == b.team.id {
                        continue;
                    }
                    match (a.score, b.score) {
                        (Score::Applicable(x), Score::Applicable(y)) if x == y => {
                            assert_eq!(a.rank, b.rank);
                            assert!(a.is_tie && b.is_tie);
                        }
                        (Score::Applicable(_), Score::NotApplicable) => {
                            assert!(a.rank < b.rank);
                        }
                        _ => assert_ne!(a.rank, b.rank),
                    }
                }
            }
        }
    }

    #[test]
    fn qualifying_order_breaks_ties_by_name() {
        init();
        let mut b = Builder::new();
        b.add_team_simple("1", "delta", Some(300.0), None, 1, &[])
            .unwrap();
        b.add_team_simple("2", "Bravo", Some(500.0), None, 1, &[])
            .unwrap();
        b.add_team_simple("3", "alpha", Some(500.0), None, 1, &[])
            .unwrap();
        b.add_team_simple("4", "charlie", None, None, 1, &[])
            .unwrap();
        let ranking = qualifying_order(&b.build(), &AwardRules::DEFAULT_RULES);
        let names: Vec<(&str, Rank, bool)> = ranking
            .iter()
            .map(|rt| (rt.team.name.as_str(), rt.rank, rt.is_tie))
            .collect();
        assert_eq!(
            names,
            vec![
                ("alpha", 1, true),
                ("Bravo", 1, true),
                ("delta", 2, false),
                ("charlie", 3, false)
            ]
        );
    }

    #[test]
    fn rank_map_by_id() {
        init();
        let ranking = compute_ranking(
            &three_teams(),
            Award::Collection,
            &AwardRules::DEFAULT_RULES,
        );
        let ranks = rank_map(&ranking);
        assert_eq!(ranks.len(), 3);
        assert_eq!(ranks[&TeamId::from("B")], 1);
        assert_eq!(ranks[&TeamId::from("A")], 2);
        assert_eq!(ranks[&TeamId::from("C")], 3);
    }
}
