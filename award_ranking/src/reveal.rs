// Progressive disclosure of a leaderboard, from the last rank to the first.

use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::config::*;

/// The distinct ranks of a leaderboard, worst first.
pub fn ranks_worst_first(ranking: &[RankedTeam]) -> Vec<Rank> {
    let ranks: BTreeSet<Rank> = ranking.iter().map(|rt| rt.rank).collect();
    ranks.into_iter().rev().collect()
}

/// The ranks picked by a reveal that has started and still has to be committed.
#[must_use = "the ranks are only revealed once the reveal is committed"]
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PendingReveal {
    ranks: Vec<Rank>,
}

impl PendingReveal {
    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }
}

/// The outcome of a reveal request.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RevealStep {
    /// Everything was shown already: the leaderboard is hidden again.
    Reset,
    /// The ranks to show once the reveal gets committed.
    Started(PendingReveal),
    /// A reveal is already in progress, the request is ignored.
    Busy,
    /// Nothing left to show.
    Nothing,
}

/// Tracks which ranks of one leaderboard are disclosed.
///
/// The set of revealed ranks only grows, one rank or one batch at a time,
/// until it gets cleared all at once.
///
/// Revealing one rank is done in two steps: [`RevealState::begin_reveal_next`]
/// picks the rank and blocks other reveals, [`RevealState::commit`] shows it.
/// The caller is expected to wait for the reveal delay in between. The
/// blocking variants [`RevealState::reveal_next`] and
/// [`RevealState::reveal_batch`] do both.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RevealState {
    revealed: BTreeSet<Rank>,
    is_revealing: bool,
    batch_size: usize,
    delay: Duration,
}

impl Default for RevealState {
    fn default() -> RevealState {
        RevealState::new(&AwardRules::DEFAULT_RULES)
    }
}

impl RevealState {
    pub fn new(rules: &AwardRules) -> RevealState {
        RevealState {
            revealed: BTreeSet::new(),
            is_revealing: false,
            batch_size: rules.reveal_batch_size,
            delay: rules.reveal_delay,
        }
    }

    pub fn revealed_ranks(&self) -> &BTreeSet<Rank> {
        &self.revealed
    }

    pub fn is_rank_revealed(&self, rank: Rank) -> bool {
        self.revealed.contains(&rank)
    }

    /// True between the start of a reveal and its commit.
    pub fn is_revealing(&self) -> bool {
        self.is_revealing
    }

    /// True when every rank of a non-empty leaderboard is shown.
    pub fn is_fully_revealed(&self, ranking: &[RankedTeam]) -> bool {
        !ranking.is_empty() && ranking.iter().all(|rt| self.revealed.contains(&rt.rank))
    }

    /// Starts revealing the worst rank that is still hidden.
    pub fn begin_reveal_next(&mut self, ranking: &[RankedTeam]) -> RevealStep {
        self.begin_reveal(ranking, 1)
    }

    /// Starts revealing the next batch of hidden ranks, worst first.
    ///
    /// Fewer ranks are picked when not enough of them are left.
    pub fn begin_reveal_batch(&mut self, ranking: &[RankedTeam]) -> RevealStep {
        self.begin_reveal(ranking, self.batch_size)
    }

    /// Shows the ranks of a started reveal and accepts new reveals again.
    ///
    /// The ranks that left the leaderboard since the reveal started are
    /// ignored.
    pub fn commit(&mut self, pending: PendingReveal, ranking: &[RankedTeam]) {
        debug!("commit: revealing ranks {:?}", pending.ranks);
        self.revealed.extend(pending.ranks);
        self.is_revealing = false;
        self.drop_missing_ranks(ranking);
    }

    /// Reveals the worst hidden rank after the reveal delay.
    /// Hides everything when all the ranks are shown already.
    pub fn reveal_next(&mut self, ranking: &[RankedTeam]) {
        let step = self.begin_reveal_next(ranking);
        self.finish(step, ranking)
    }

    /// Reveals the next batch of hidden ranks after the reveal delay.
    /// Hides everything when all the ranks are shown already.
    pub fn reveal_batch(&mut self, ranking: &[RankedTeam]) {
        let step = self.begin_reveal_batch(ranking);
        self.finish(step, ranking)
    }

    /// Shows all the ranks at once, or hides them all if they are all shown.
    ///
    /// This does not wait and is not blocked by a reveal in progress.
    pub fn reveal_all(&mut self, ranking: &[RankedTeam]) {
        if self.is_fully_revealed(ranking) {
            info!("reveal_all: hiding all the ranks");
            self.hide_all();
        } else {
            self.revealed = ranking.iter().map(|rt| rt.rank).collect();
            info!("reveal_all: showing ranks {:?}", self.revealed);
        }
    }

    fn begin_reveal(&mut self, ranking: &[RankedTeam], count: usize) -> RevealStep {
        if self.is_revealing {
            debug!("begin_reveal: a reveal is already in progress");
            return RevealStep::Busy;
        }
        if self.is_fully_revealed(ranking) {
            info!("begin_reveal: all the ranks are shown, hiding them");
            self.hide_all();
            return RevealStep::Reset;
        }
        let next: Vec<Rank> = ranks_worst_first(ranking)
            .into_iter()
            .filter(|rank| !self.revealed.contains(rank))
            .take(count)
            .collect();
        if next.is_empty() {
            debug!("begin_reveal: nothing left to reveal");
            return RevealStep::Nothing;
        }
        info!("begin_reveal: revealing ranks {:?}", next);
        self.is_revealing = true;
        RevealStep::Started(PendingReveal { ranks: next })
    }

    fn finish(&mut self, step: RevealStep, ranking: &[RankedTeam]) {
        if let RevealStep::Started(pending) = step {
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            self.commit(pending, ranking);
        }
    }

    fn hide_all(&mut self) {
        self.revealed.clear();
    }

    // Forgets the ranks that are no longer on the leaderboard.
    pub(crate) fn drop_missing_ranks(&mut self, ranking: &[RankedTeam]) {
        let present: BTreeSet<Rank> = ranking.iter().map(|rt| rt.rank).collect();
        self.revealed.retain(|rank| present.contains(rank));
    }
}

/// One row of a leaderboard, as it may be shown.
#[derive(PartialEq, Debug, Clone)]
pub enum VisibleEntry {
    Revealed(RankedTeam),
    /// Only the row key is kept, every other field is masked.
    Hidden { team_id: TeamId },
}

impl VisibleEntry {
    pub fn is_revealed(&self) -> bool {
        matches!(self, VisibleEntry::Revealed(_))
    }
}

/// The leaderboard, with the teams of the hidden ranks masked.
pub fn visible_entries(ranking: &[RankedTeam], state: &RevealState) -> Vec<VisibleEntry> {
    ranking
        .iter()
        .map(|rt| {
            if state.is_rank_revealed(rt.rank) {
                VisibleEntry::Revealed(rt.clone())
            } else {
                VisibleEntry::Hidden {
                    team_id: rt.team.id.clone(),
                }
            }
        })
        .collect()
}

/// The revealed teams of the first three ranks, best first.
pub fn podium(ranking: &[RankedTeam], state: &RevealState) -> Vec<RankedTeam> {
    let mut res: Vec<RankedTeam> = ranking
        .iter()
        .filter(|rt| rt.rank <= 3 && state.is_rank_revealed(rt.rank))
        .cloned()
        .collect();
    res.sort_by_key(|rt| rt.rank);
    res
}
