use std::collections::HashMap;

use log::info;

use crate::config::*;
use crate::reveal::*;
use crate::{compute_ranking, rank_map};

/// One award: its current ranking and what is revealed of it.
#[derive(PartialEq, Debug, Clone)]
pub struct Leaderboard {
    award: Award,
    rules: AwardRules,
    ranking: Vec<RankedTeam>,
    reveal: RevealState,
}

impl Leaderboard {
    pub fn new(award: Award, rules: &AwardRules) -> Leaderboard {
        Leaderboard {
            award,
            rules: rules.clone(),
            ranking: Vec::new(),
            reveal: RevealState::new(rules),
        }
    }

    /// Computes the ranking again from the roster.
    ///
    /// What was revealed stays revealed, as long as the rank still exists.
    pub fn recompute(&mut self, roster: &[Team]) {
        self.ranking = compute_ranking(roster, self.award, &self.rules);
        self.reveal.drop_missing_ranks(&self.ranking);
        info!(
            "recompute: {:?}: {} teams, {} distinct ranks",
            self.award,
            self.ranking.len(),
            ranks_worst_first(&self.ranking).len()
        );
    }

    pub fn award(&self) -> Award {
        self.award
    }

    pub fn ranking(&self) -> &[RankedTeam] {
        &self.ranking
    }

    pub fn reveal_state(&self) -> &RevealState {
        &self.reveal
    }

    pub fn rank_map(&self) -> HashMap<TeamId, Rank> {
        rank_map(&self.ranking)
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.reveal.is_fully_revealed(&self.ranking)
    }

    pub fn begin_reveal_next(&mut self) -> RevealStep {
        self.reveal.begin_reveal_next(&self.ranking)
    }

    pub fn begin_reveal_batch(&mut self) -> RevealStep {
        self.reveal.begin_reveal_batch(&self.ranking)
    }

    pub fn commit(&mut self, pending: PendingReveal) {
        self.reveal.commit(pending, &self.ranking)
    }

    pub fn reveal_next(&mut self) {
        self.reveal.reveal_next(&self.ranking)
    }

    pub fn reveal_batch(&mut self) {
        self.reveal.reveal_batch(&self.ranking)
    }

    pub fn reveal_all(&mut self) {
        self.reveal.reveal_all(&self.ranking)
    }

    pub fn visible_entries(&self) -> Vec<VisibleEntry> {
        visible_entries(&self.ranking, &self.reveal)
    }

    pub fn podium(&self) -> Vec<RankedTeam> {
        podium(&self.ranking, &self.reveal)
    }
}

/// The three leaderboards of an event, each with its own reveal state.
#[derive(PartialEq, Debug, Clone)]
pub struct Leaderboards {
    pub master: Leaderboard,
    pub collection: Leaderboard,
    pub time_attack: Leaderboard,
}

impl Leaderboards {
    pub fn new(rules: &AwardRules) -> Leaderboards {
        Leaderboards {
            master: Leaderboard::new(Award::Master, rules),
            collection: Leaderboard::new(Award::Collection, rules),
            time_attack: Leaderboard::new(Award::TimeAttack, rules),
        }
    }

    pub fn from_roster(roster: &[Team], rules: &AwardRules) -> Leaderboards {
        let mut res = Leaderboards::new(rules);
        res.recompute(roster);
        res
    }

    pub fn recompute(&mut self, roster: &[Team]) {
        self.master.recompute(roster);
        self.collection.recompute(roster);
        self.time_attack.recompute(roster);
    }

    pub fn get(&self, award: Award) -> &Leaderboard {
        match award {
            Award::Master => &self.master,
            Award::Collection => &self.collection,
            Award::TimeAttack => &self.time_attack,
        }
    }

    pub fn get_mut(&mut self, award: Award) -> &mut Leaderboard {
        match award {
            Award::Master => &mut self.master,
            Award::Collection => &mut self.collection,
            Award::TimeAttack => &mut self.time_attack,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Leaderboard> {
        Award::ALL.into_iter().map(move |award| self.get(award))
    }
}
