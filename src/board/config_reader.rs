use crate::board::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::time::Duration;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(rename = "eventDate")]
    pub event_date: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub teams: usize,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RosterSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "firstTeamRowIndex")]
    _first_team_row_index: Option<JSValue>,
}

impl RosterSource {
    /// A source given on the command line. The provider is guessed from the
    /// file extension when it is not specified.
    pub fn for_input(
        path: &str,
        input_type: Option<String>,
        excel_worksheet_name: Option<String>,
    ) -> RosterSource {
        let provider = input_type.unwrap_or_else(|| {
            if path.to_lowercase().ends_with(".xlsx") {
                "xlsx".to_string()
            } else {
                "json".to_string()
            }
        });
        RosterSource {
            provider,
            file_path: path.to_string(),
            excel_worksheet_name,
            _first_team_row_index: None,
        }
    }

    /// The index (starting at 0) of the first row holding a team.
    /// The index in the file starts at 1 to respect the conventions of the excel world.
    /// By default, the first row is a header.
    pub fn first_team_row_index(&self) -> BoardResult<usize> {
        if self._first_team_row_index.is_none() {
            return Ok(1);
        }
        let x = read_js_int(&self._first_team_row_index)?;
        if x == 0 {
            whatever!("firstTeamRowIndex starts at 1, got 0")
        }
        Ok(x - 1)
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesSettings {
    #[serde(rename = "hpPerMissingMember")]
    pub hp_per_missing_member: Option<f64>,
    #[serde(rename = "timeAttackLevel")]
    pub time_attack_level: Option<u8>,
    #[serde(rename = "revealBatchSize")]
    pub reveal_batch_size: Option<usize>,
    #[serde(rename = "revealDelayMs")]
    pub reveal_delay_ms: Option<u64>,
}

impl RulesSettings {
    pub fn award_rules(&self) -> BoardResult<AwardRules> {
        let defaults = AwardRules::DEFAULT_RULES;
        let hp_per_missing_member = match self.hp_per_missing_member {
            Some(x) if !x.is_finite() || x < 0.0 => {
                whatever!("hpPerMissingMember must be a non-negative number, got {}", x)
            }
            Some(x) => x,
            None => defaults.hp_per_missing_member,
        };
        let time_attack_level = match self.time_attack_level {
            Some(x) => match Level::new(x) {
                Some(l) => l,
                None => whatever!("timeAttackLevel must be between 1 and 5, got {}", x),
            },
            None => defaults.time_attack_level,
        };
        let reveal_batch_size = match self.reveal_batch_size {
            Some(0) => whatever!("revealBatchSize must be at least 1"),
            Some(x) => x,
            None => defaults.reveal_batch_size,
        };
        Ok(AwardRules {
            hp_per_missing_member,
            time_attack_level,
            reveal_batch_size,
            reveal_delay: self
                .reveal_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.reveal_delay),
        })
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "rosterSources", default)]
    pub roster_sources: Vec<RosterSource>,
    #[serde(default)]
    pub rules: RulesSettings,
}

impl Default for EventConfig {
    fn default() -> EventConfig {
        EventConfig {
            output_settings: OutputSettings {
                event_name: "raceboard".to_string(),
                event_date: None,
                output_path: None,
            },
            roster_sources: Vec::new(),
            rules: RulesSettings::default(),
        }
    }
}

pub fn read_config(path: &str) -> BoardResult<EventConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: EventConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> BoardResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn read_js_int(x: &Option<JSValue>) -> BoardResult<usize> {
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {
                content: n.to_string(),
            }),
        Some(JSValue::String(s)) => s
            .parse::<usize>()
            .ok()
            .context(ParsingJsonNumberSnafu { content: s.clone() }),
        _ => None.context(ParsingJsonNumberSnafu {
            content: format!("{:?}", x),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_from_settings() {
        let settings: RulesSettings =
            serde_json::from_str(r#"{"revealBatchSize": 5, "revealDelayMs": 0}"#).unwrap();
        let rules = settings.award_rules().unwrap();
        assert_eq!(rules.reveal_batch_size, 5);
        assert_eq!(rules.reveal_delay, Duration::ZERO);
        assert_eq!(rules.hp_per_missing_member, 80.0);
        assert_eq!(rules.time_attack_level, Level::MAX);

        let settings: RulesSettings = serde_json::from_str(r#"{"timeAttackLevel": 9}"#).unwrap();
        assert!(settings.award_rules().is_err());
        let settings: RulesSettings = serde_json::from_str(r#"{"revealBatchSize": 0}"#).unwrap();
        assert!(settings.award_rules().is_err());
    }

    #[test]
    fn compensation_may_be_zero() {
        let settings: RulesSettings =
            serde_json::from_str(r#"{"hpPerMissingMember": 0}"#).unwrap();
        assert_eq!(settings.award_rules().unwrap().hp_per_missing_member, 0.0);
        let settings: RulesSettings =
            serde_json::from_str(r#"{"hpPerMissingMember": -1}"#).unwrap();
        assert!(settings.award_rules().is_err());
    }

    #[test]
    fn minimal_config() {
        let config: EventConfig =
            serde_json::from_str(r#"{"outputSettings": {"eventName": "Cup"}}"#).unwrap();
        assert_eq!(config.output_settings.event_name, "Cup");
        assert!(config.roster_sources.is_empty());
        assert_eq!(config.rules, RulesSettings::default());
    }

    #[test]
    fn roster_source_rows() {
        let source: RosterSource = serde_json::from_str(
            r#"{"provider": "xlsx", "filePath": "a.xlsx", "firstTeamRowIndex": "3"}"#,
        )
        .unwrap();
        assert_eq!(source.first_team_row_index().unwrap(), 2);
        let source = RosterSource::for_input("Teams.XLSX", None, None);
        assert_eq!(source.provider, "xlsx");
        assert_eq!(source.first_team_row_index().unwrap(), 1);
        let source = RosterSource::for_input("teams.json", None, None);
        assert_eq!(source.provider, "json");
    }
}
