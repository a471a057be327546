use std::collections::HashSet;

use log::debug;

pub use crate::config::*;

/// A builder for assembling a roster.
///
/// It checks that team ids are unique and that every team fits the member
/// slots and the level range.
///
/// ```
/// pub use award_ranking::builder::Builder;
/// # use award_ranking::RosterErrors;
///
/// let mut builder = Builder::new();
///
/// builder.add_team_simple("t1", "Alpha", Some(250000.0), Some(35.0), 5, &[("Anna", 95.0), ("Bob", 88.0)])?;
/// builder.add_team_simple("t2", "Bravo", None, None, 1, &[])?;
///
/// let roster = builder.build();
/// assert_eq!(roster.len(), 2);
///
/// # Ok::<(), RosterErrors>(())
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    pub(crate) _teams: Vec<Team>,
    pub(crate) _ids: HashSet<TeamId>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Adds a team with all of its member slots filled in.
    ///
    /// It is the simplest use case for most cases.
    ///
    /// members: the name and the hp of every member that played, at most 4.
    /// The remaining slots are left empty.
    pub fn add_team_simple(
        &mut self,
        id: &str,
        name: &str,
        final_amount: Option<f64>,
        play_time_minutes: Option<f64>,
        level: u8,
        members: &[(&str, f64)],
    ) -> Result<(), RosterErrors> {
        let team_id = TeamId::from(id);
        let level =
            Level::new(level).ok_or(RosterErrors::LevelOutOfRange(team_id.clone(), level))?;
        let members: Vec<Member> = members
            .iter()
            .map(|(name, hp)| Member::new(name, *hp))
            .collect();
        let members = member_slots(&team_id, &members)?;
        self.add_team(Team {
            id: team_id,
            name: name.to_string(),
            final_amount,
            play_time_minutes,
            level,
            members,
        })
    }

    pub fn add_team(&mut self, team: Team) -> Result<(), RosterErrors> {
        if !self._ids.insert(team.id.clone()) {
            return Err(RosterErrors::DuplicateTeamId(team.id));
        }
        debug!("add_team: {:?}", team);
        self._teams.push(team);
        Ok(())
    }

    /// The teams, in the order they were added.
    pub fn build(self) -> Vec<Team> {
        self._teams
    }
}

/// Fills the member slots of a team, padding with empty members.
pub fn member_slots(
    team_id: &TeamId,
    members: &[Member],
) -> Result<[Member; MEMBER_SLOTS], RosterErrors> {
    if members.len() > MEMBER_SLOTS {
        return Err(RosterErrors::TooManyMembers(team_id.clone(), members.len()));
    }
    Ok(std::array::from_fn(|idx| {
        members.get(idx).cloned().unwrap_or_default()
    }))
}
