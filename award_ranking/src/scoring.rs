//! Per-team metrics and the score of each award.

use log::debug;

use crate::config::*;

/// The detail of the hp total of a team.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct HpBreakdown {
    /// The sum of the recorded hp.
    pub actual: f64,
    /// The hp credited for the empty slots.
    pub compensation: f64,
    pub total: f64,
    pub active_member_count: usize,
    pub missing_member_count: usize,
}

pub fn hp_breakdown(members: &[Member], rules: &AwardRules) -> HpBreakdown {
    let actual: f64 = members.iter().map(|m| m.hp.unwrap_or(0.0)).sum();
    let active_member_count = members.iter().filter(|m| m.is_active()).count();
    let missing_member_count = MEMBER_SLOTS.saturating_sub(active_member_count);
    let compensation = missing_member_count as f64 * rules.hp_per_missing_member;
    HpBreakdown {
        actual,
        compensation,
        total: actual + compensation,
        active_member_count,
        missing_member_count,
    }
}

/// The surviving hp of the team, including the compensation for missing members.
pub fn hp_total(members: &[Member], rules: &AwardRules) -> f64 {
    hp_breakdown(members, rules).total
}

/// Amount collected per minute, scaled by the surviving hp and the level reached.
///
/// The teams without any amount, time or hp do not qualify.
pub fn master_score(team: &Team, hp_total: f64) -> Score {
    let amount = team.final_amount.unwrap_or(0.0);
    let minutes = team.play_time_minutes.unwrap_or(0.0);
    if minutes == 0.0 || amount == 0.0 || hp_total == 0.0 {
        return Score::NotApplicable;
    }
    Score::Applicable((amount / minutes) * hp_total * team.level.value() as f64)
}

/// Every team is ranked, an unrecorded amount counts as zero.
pub fn collection_score(team: &Team) -> Score {
    Score::Applicable(team.final_amount.unwrap_or(0.0))
}

/// The play time of the teams that reached the time attack level.
pub fn time_attack_score(team: &Team, rules: &AwardRules) -> Score {
    if team.level < rules.time_attack_level {
        return Score::NotApplicable;
    }
    match team.play_time_minutes {
        Some(minutes) if minutes != 0.0 => Score::Applicable(minutes),
        _ => Score::NotApplicable,
    }
}

pub fn award_score(award: Award, team: &Team, hp_total: f64, rules: &AwardRules) -> Score {
    let score = match award {
        Award::Master => master_score(team, hp_total),
        Award::Collection => collection_score(team),
        Award::TimeAttack => time_attack_score(team, rules),
    };
    debug!(
        "award_score: {:?} team {} ({:?}): {:?}",
        award, team.id, team.name, score
    );
    score
}
