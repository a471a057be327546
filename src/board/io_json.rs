// Reads the rosters saved by the scoring desk.
//
// Accepted layouts: the saved board state (`{"teams": [...]}` with the
// results), a plain array of teams, and the export document (versioned,
// holding the team names and members only).

use crate::board::*;

use serde::Deserialize;
use serde_json::Value as JSValue;

const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Deserialize)]
struct JsonMember {
    name: Option<String>,
    hp: Option<JSValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct JsonPlayTime {
    minutes: Option<JSValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct JsonTeam {
    id: Option<String>,
    name: Option<String>,
    #[serde(rename = "finalAmount")]
    final_amount: Option<JSValue>,
    #[serde(rename = "playTime")]
    play_time: Option<JsonPlayTime>,
    level: Option<JSValue>,
    #[serde(default)]
    members: Vec<JsonMember>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RosterDocument {
    List(Vec<JsonTeam>),
    Document {
        version: Option<String>,
        teams: Vec<JsonTeam>,
    },
}

pub fn read_json_roster(path: &str) -> BoardResult<Vec<ParsedTeam>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_json_roster(&contents)
}

pub fn parse_json_roster(contents: &str) -> BoardResult<Vec<ParsedTeam>> {
    let doc: RosterDocument = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    let teams = match doc {
        RosterDocument::List(teams) => teams,
        RosterDocument::Document {
            version: Some(version),
            ..
        } if version != EXPORT_VERSION => {
            return UnsupportedRosterVersionSnafu { version }.fail();
        }
        RosterDocument::Document { teams, .. } => teams,
    };
    debug!("parse_json_roster: {} teams", teams.len());
    teams.iter().map(parse_team).collect()
}

fn parse_team(jt: &JsonTeam) -> BoardResult<ParsedTeam> {
    let mut members: Vec<(String, Option<f64>)> = Vec::new();
    for jm in jt.members.iter() {
        let hp = read_js_number(jm.hp.as_ref())?;
        members.push((jm.name.clone().unwrap_or_default(), hp));
    }
    let play_time_minutes = match &jt.play_time {
        Some(pt) => read_js_number(pt.minutes.as_ref())?,
        None => None,
    };
    Ok(ParsedTeam {
        id: jt.id.clone(),
        name: jt.name.clone().unwrap_or_default(),
        final_amount: read_js_number(jt.final_amount.as_ref())?,
        play_time_minutes,
        level: read_js_number(jt.level.as_ref())?,
        members,
    })
}

/// The fields left blank are saved as empty strings.
fn read_js_number(x: Option<&JSValue>) -> BoardResult<Option<f64>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => Ok(n.as_f64()),
        Some(JSValue::String(s)) if s.trim().is_empty() => Ok(None),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .map(Some)
            .context(ParsingJsonNumberSnafu { content: s.clone() }),
        Some(v) => ParsingJsonNumberSnafu {
            content: v.to_string(),
        }
        .fail(),
    }
}
