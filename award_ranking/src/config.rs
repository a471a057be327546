// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::time::Duration;

/// The number of member slots of every team.
pub const MEMBER_SLOTS: usize = 4;

/// The opaque identifier of a team.
///
/// It is stable for the lifetime of the team and is the key used by all the
/// rank maps.
#[derive(Eq, PartialEq, Debug, Clone, Hash, PartialOrd, Ord)]
pub struct TeamId(pub String);

impl Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> TeamId {
        TeamId(s.to_string())
    }
}

/// The final level reached by a team, between 1 and 5.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(5);

    /// Returns None if the value is outside of the allowed range.
    pub fn new(value: u8) -> Option<Level> {
        if (Level::MIN.0..=Level::MAX.0).contains(&value) {
            Some(Level(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Level {
    fn default() -> Level {
        Level::MIN
    }
}

/// One member slot of a team.
///
/// An empty slot has a blank name and no hp.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Member {
    pub name: String,
    pub hp: Option<f64>,
}

impl Member {
    pub fn new(name: &str, hp: f64) -> Member {
        Member {
            name: name.to_string(),
            hp: Some(hp),
        }
    }

    /// A member counts as having played if a name was entered or if some hp
    /// was recorded.
    pub fn is_active(&self) -> bool {
        let has_name = !self.name.trim().is_empty();
        let has_hp = matches!(self.hp, Some(hp) if hp > 0.0);
        has_name || has_hp
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// The amount collected at the end of the game. None if not recorded yet.
    pub final_amount: Option<f64>,
    /// Minutes it took to finish. None if unknown, which is different from zero.
    pub play_time_minutes: Option<f64>,
    pub level: Level,
    pub members: [Member; MEMBER_SLOTS],
}

impl Team {
    /// A team with no result recorded yet.
    pub fn new(id: TeamId, name: &str) -> Team {
        Team {
            id,
            name: name.to_string(),
            final_amount: None,
            play_time_minutes: None,
            level: Level::MIN,
            members: Default::default(),
        }
    }
}

// ******** Output data structures *********

/// The comparable value computed by an award for one team.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Score {
    Applicable(f64),
    /// The team does not have enough valid inputs for this award.
    /// It stays on the leaderboard, after all the qualified teams.
    NotApplicable,
}

impl Score {
    pub fn value(&self) -> Option<f64> {
        match self {
            Score::Applicable(x) => Some(*x),
            Score::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Score::Applicable(_))
    }
}

pub type Rank = u32;

/// A team enriched with its position on one leaderboard.
#[derive(PartialEq, Debug, Clone)]
pub struct RankedTeam {
    pub team: Team,
    pub hp_total: f64,
    pub score: Score,
    /// Dense rank, starting at 1.
    pub rank: Rank,
    pub is_tie: bool,
}

/// The three leaderboards computed for an event.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Award {
    /// Composite efficiency: amount per minute, scaled by the surviving hp and the level.
    Master,
    /// Raw amount collected.
    Collection,
    /// Fastest team to reach the last level.
    TimeAttack,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SortDirection {
    HigherIsBetter,
    LowerIsBetter,
}

impl Award {
    pub const ALL: [Award; 3] = [Award::Master, Award::Collection, Award::TimeAttack];

    pub fn direction(&self) -> SortDirection {
        match self {
            Award::Master | Award::Collection => SortDirection::HigherIsBetter,
            Award::TimeAttack => SortDirection::LowerIsBetter,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Award::Master => "master",
            Award::Collection => "collection",
            Award::TimeAttack => "time-attack",
        }
    }

    pub fn from_label(label: &str) -> Option<Award> {
        Award::ALL.iter().find(|a| a.label() == label).copied()
    }
}

/// Errors that prevent a roster from being assembled.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RosterErrors {
    DuplicateTeamId(TeamId),
    LevelOutOfRange(TeamId, u8),
    TooManyMembers(TeamId, usize),
}

impl Error for RosterErrors {}

impl Display for RosterErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterErrors::DuplicateTeamId(id) => write!(f, "Duplicate team id {}", id),
            RosterErrors::LevelOutOfRange(id, level) => {
                write!(f, "Team {}: level {} is not between 1 and 5", id, level)
            }
            RosterErrors::TooManyMembers(id, count) => write!(
                f,
                "Team {}: {} members provided, at most {} are allowed",
                id, count, MEMBER_SLOTS
            ),
        }
    }
}

// ********* Configuration **********

#[derive(PartialEq, Debug, Clone)]
pub struct AwardRules {
    /// The hp credited for every empty member slot, so that teams that played
    /// short-handed are not penalized for the missing members.
    pub hp_per_missing_member: f64,
    /// Only the teams that reached at least this level enter the time attack.
    pub time_attack_level: Level,
    /// The number of ranks disclosed at once by a batch reveal.
    pub reveal_batch_size: usize,
    /// The pause between starting a reveal and committing it.
    pub reveal_delay: Duration,
}

impl AwardRules {
    pub const DEFAULT_RULES: AwardRules = AwardRules {
        hp_per_missing_member: 80.0,
        time_attack_level: Level::MAX,
        reveal_batch_size: 3,
        reveal_delay: Duration::from_millis(300),
    };
}

impl Default for AwardRules {
    fn default() -> AwardRules {
        AwardRules::DEFAULT_RULES
    }
}
