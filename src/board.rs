use log::{debug, info, warn};

use award_ranking::builder::{member_slots, Builder};
use award_ranking::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::board::config_reader::*;

mod config_reader;
mod io_common;
mod io_json;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum BoardError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook has no worksheet"))]
    EmptyExcel {},
    #[snafu(display("The workbook has no worksheet named {name}"))]
    MissingWorksheet { name: String },
    #[snafu(display("Line {lineno}: could not understand the cell {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not understand the number {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("Roster version {version} is not supported"))]
    UnsupportedRosterVersion { version: String },
    #[snafu(display("Invalid roster"))]
    InvalidRoster { source: RosterErrors },
    #[snafu(display("No roster was provided"))]
    MissingRosterSource {},
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type BoardResult<T> = Result<T, BoardError>;

/// A team, as parsed by the readers.
/// This is before normalizing the values and checking the roster.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedTeam {
    pub id: Option<String>,
    pub name: String,
    pub final_amount: Option<f64>,
    pub play_time_minutes: Option<f64>,
    pub level: Option<f64>,
    pub members: Vec<(String, Option<f64>)>,
}

/// The operator actions on a leaderboard.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RevealCommand {
    Next,
    Batch,
    All,
}

// Shown in place of every field of a hidden rank.
const HIDDEN: &str = "???";
const UNNAMED: &str = "(unnamed)";
const MISSING: &str = "-";

fn parse_reveal_commands(steps: &[String]) -> BoardResult<Vec<RevealCommand>> {
    let mut res: Vec<RevealCommand> = Vec::new();
    for step in steps {
        let cmd = match step.as_str() {
            "next" => RevealCommand::Next,
            "batch" => RevealCommand::Batch,
            "all" => RevealCommand::All,
            x => whatever!("Unknown reveal step {:?}: expected next, batch or all", x),
        };
        res.push(cmd);
    }
    Ok(res)
}

fn parse_awards(award: &Option<String>) -> BoardResult<Vec<Award>> {
    match award.as_deref() {
        None | Some("all") => Ok(Award::ALL.to_vec()),
        Some(x) => match Award::from_label(x) {
            Some(a) => Ok(vec![a]),
            None => whatever!(
                "Unknown award {:?}: expected master, collection, time-attack or all",
                x
            ),
        },
    }
}

fn validate_team(pt: ParsedTeam, default_id: String) -> BoardResult<Team> {
    let id = TeamId(pt.id.filter(|s| !s.is_empty()).unwrap_or(default_id));

    let level = match pt
        .level
        .filter(|l| l.fract() == 0.0 && (1.0..=5.0).contains(l))
        .and_then(|l| Level::new(l as u8))
    {
        Some(l) => l,
        None => {
            if let Some(l) = pt.level {
                warn!("validate_team: team {}: invalid level {}, using 1", id, l);
            }
            Level::MIN
        }
    };

    if pt.members.len() > MEMBER_SLOTS {
        warn!(
            "validate_team: team {}: keeping the first {} of {} members",
            id,
            MEMBER_SLOTS,
            pt.members.len()
        );
    }
    let members: Vec<Member> = pt
        .members
        .iter()
        .take(MEMBER_SLOTS)
        .map(|(name, hp)| Member {
            name: name.clone(),
            hp: io_common::finite(*hp),
        })
        .collect();
    let members = member_slots(&id, &members).context(InvalidRosterSnafu {})?;

    Ok(Team {
        id,
        name: pt.name,
        final_amount: io_common::finite(pt.final_amount),
        play_time_minutes: io_common::finite(pt.play_time_minutes),
        level,
        members,
    })
}

fn read_roster(root_path: &Path, sources: &[RosterSource]) -> BoardResult<Vec<Team>> {
    let mut builder = Builder::new();
    for source in sources {
        let p: PathBuf = root_path.join(&source.file_path);
        let p2 = p.as_path().display().to_string();
        info!("Attempting to read roster file {:?}", p2);
        let parsed_teams = match source.provider.as_str() {
            "json" => io_json::read_json_roster(&p2)?,
            "xlsx" => io_xlsx::read_excel_roster(&p2, source)?,
            x => whatever!("Provider not implemented {:?}", x),
        };
        let default_id = io_common::make_default_id(&p2);
        for (idx, pt) in parsed_teams.into_iter().enumerate() {
            debug!("read_roster: parsed team {:?}", pt);
            let team = validate_team(pt, default_id(idx + 1))?;
            builder.add_team(team).context(InvalidRosterSnafu {})?;
        }
    }
    Ok(builder.build())
}

fn apply_reveal(board: &mut Leaderboard, cmd: RevealCommand) {
    match cmd {
        RevealCommand::Next => board.reveal_next(),
        RevealCommand::Batch => board.reveal_batch(),
        RevealCommand::All => board.reveal_all(),
    }
}

fn display_name(name: &str) -> &str {
    if name.trim().is_empty() {
        UNNAMED
    } else {
        name
    }
}

fn format_value(x: Option<f64>) -> String {
    x.map(|v| v.to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn format_score(award: Award, score: Score) -> String {
    match (award, score) {
        (Award::Master, Score::Applicable(x)) => format!("{:.2}", x),
        (Award::Collection, Score::Applicable(x)) => x.to_string(),
        (Award::TimeAttack, Score::Applicable(x)) => format!("{} min", x),
        (Award::TimeAttack, Score::NotApplicable) => "not reached".to_string(),
        (_, Score::NotApplicable) => MISSING.to_string(),
    }
}

fn entry_to_json(award: Award, entry: &VisibleEntry) -> JSValue {
    match entry {
        VisibleEntry::Revealed(rt) => json!({
            "rank": rt.rank,
            "tie": rt.is_tie,
            "team": display_name(&rt.team.name),
            "score": format_score(award, rt.score),
            "amount": format_value(rt.team.final_amount),
            "time": format_value(rt.team.play_time_minutes),
            "hpTotal": rt.hp_total.to_string(),
            "level": rt.team.level.value(),
        }),
        VisibleEntry::Hidden { .. } => json!({
            "rank": HIDDEN,
            "tie": HIDDEN,
            "team": HIDDEN,
            "score": HIDDEN,
            "amount": HIDDEN,
            "time": HIDDEN,
            "hpTotal": HIDDEN,
            "level": HIDDEN,
        }),
    }
}

fn leaderboard_to_json(board: &Leaderboard) -> JSValue {
    let entries: Vec<JSValue> = board
        .visible_entries()
        .iter()
        .map(|e| entry_to_json(board.award(), e))
        .collect();
    json!({
        "award": board.award().label(),
        "fullyRevealed": board.is_fully_revealed(),
        "entries": entries,
    })
}

fn build_summary_js(
    config: &EventConfig,
    num_teams: usize,
    boards: &Leaderboards,
    awards: &[Award],
) -> JSValue {
    let c = OutputConfig {
        event: config.output_settings.event_name.clone(),
        date: config.output_settings.event_date.clone(),
        teams: num_teams,
    };
    let leaderboards: Vec<JSValue> = awards
        .iter()
        .map(|award| leaderboard_to_json(boards.get(*award)))
        .collect();
    json!({
        "config": c,
        "leaderboards": leaderboards,
    })
}

/// Reads the roster, computes the leaderboards and applies the reveal steps.
///
/// Returns the summary of the requested leaderboards.
pub fn run_event(
    config: &EventConfig,
    root_path: &Path,
    reveal: &[RevealCommand],
    awards: &[Award],
) -> BoardResult<JSValue> {
    let rules = config.rules.award_rules()?;
    info!("rules: {:?}", rules);

    ensure!(
        !config.roster_sources.is_empty(),
        MissingRosterSourceSnafu {}
    );
    let roster = read_roster(root_path, &config.roster_sources)?;
    info!("Read {} teams", roster.len());

    let mut boards = Leaderboards::from_roster(&roster, &rules);
    for award in awards {
        let board = boards.get_mut(*award);
        for cmd in reveal {
            apply_reveal(board, *cmd);
        }
        let podium: Vec<(Rank, String)> = board
            .podium()
            .iter()
            .map(|rt| (rt.rank, rt.team.name.clone()))
            .collect();
        info!("{}: podium so far: {:?}", award.label(), podium);
    }

    Ok(build_summary_js(config, roster.len(), &boards, awards))
}

fn write_summary(summary: &JSValue, out: Option<String>) -> BoardResult<()> {
    let pretty_js = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    match out.as_deref() {
        None | Some("") | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}

/// Compares the summary with a reference summary and prints the differences.
pub fn check_summary(summary: &JSValue, reference_path: &str) -> BoardResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("summary: {:?}", summary_ref);
    if summary_ref != *summary {
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        let pretty_js_stats = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
        warn!("Found differences with the reference summary");
        print_diff(
            pretty_js_summary_ref.as_str(),
            pretty_js_stats.as_ref(),
            "\n",
        );
        whatever!("Difference detected between computed summary and reference summary")
    }
    Ok(())
}

pub fn run_board(args: &Args) -> BoardResult<()> {
    let (mut config, root_path) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root_p = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root_p)
        }
        None => (EventConfig::default(), PathBuf::new()),
    };
    info!("config: {:?}", config);

    if let Some(input) = &args.input {
        config.roster_sources = vec![RosterSource::for_input(
            input,
            args.input_type.clone(),
            args.excel_worksheet_name.clone(),
        )];
    }

    let awards = parse_awards(&args.award)?;
    let reveal = parse_reveal_commands(&args.reveal)?;
    let summary = run_event(&config, &root_path, &reveal, &awards)?;

    let out = args
        .out
        .clone()
        .or_else(|| config.output_settings.output_path.clone());
    write_summary(&summary, out)?;

    if let Some(reference) = &args.reference {
        check_summary(&summary, reference)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_wrapper(test_name: &str, awards: &[Award], reveal: &[RevealCommand]) {
        init();
        let test_dir = format!("{}/testdata/{}", env!("CARGO_MANIFEST_DIR"), test_name);
        let config_path = format!("{}/{}_config.json", test_dir, test_name);
        let summary_path = format!("{}/{}_expected_summary.json", test_dir, test_name);
        info!("Running test {}", test_name);

        let config = read_config(&config_path).unwrap();
        let res = run_event(&config, Path::new(&test_dir), reveal, awards)
            .and_then(|summary| check_summary(&summary, &summary_path));
        if let Err(e) = res {
            panic!("test {} failed: {} {:?}", test_name, e, e);
        }
    }

    fn parsed(level: Option<f64>, members: usize) -> ParsedTeam {
        ParsedTeam {
            id: None,
            name: "Team".to_string(),
            final_amount: Some(f64::INFINITY),
            play_time_minutes: Some(12.0),
            level,
            members: (0..members)
                .map(|idx| (format!("m{}", idx), Some(10.0)))
                .collect(),
        }
    }

    #[test]
    fn three_teams() {
        test_wrapper("three_teams", &Award::ALL, &[RevealCommand::Batch]);
    }

    #[test]
    fn collection_tie() {
        test_wrapper(
            "collection_tie",
            &[Award::Collection],
            &[RevealCommand::Next, RevealCommand::Next],
        );
    }

    #[test]
    fn exported_teams() {
        test_wrapper(
            "exported_teams",
            &[Award::TimeAttack],
            &[RevealCommand::All],
        );
    }

    #[test]
    fn reveal_commands() {
        let steps: Vec<String> = ["next", "batch", "all"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            parse_reveal_commands(&steps).unwrap(),
            vec![
                RevealCommand::Next,
                RevealCommand::Batch,
                RevealCommand::All
            ]
        );
        assert!(parse_reveal_commands(&["first".to_string()]).is_err());
    }

    #[test]
    fn awards() {
        assert_eq!(parse_awards(&None).unwrap(), Award::ALL.to_vec());
        assert_eq!(
            parse_awards(&Some("time-attack".to_string())).unwrap(),
            vec![Award::TimeAttack]
        );
        assert!(parse_awards(&Some("fastest".to_string())).is_err());
    }

    #[test]
    fn validate_team_normalizes_values() {
        let team = validate_team(parsed(Some(7.0), 6), "f-00000001".to_string()).unwrap();
        assert_eq!(team.id, TeamId::from("f-00000001"));
        assert_eq!(team.level, Level::MIN);
        assert_eq!(team.final_amount, None);
        assert_eq!(team.play_time_minutes, Some(12.0));
        assert_eq!(team.members[3], Member::new("m3", 10.0));

        let team = validate_team(parsed(Some(4.0), 1), "x".to_string()).unwrap();
        assert_eq!(team.level.value(), 4);
        assert_eq!(team.members[1], Member::default());

        let team = validate_team(parsed(Some(2.5), 0), "x".to_string()).unwrap();
        assert_eq!(team.level, Level::MIN);
    }

    #[test]
    fn missing_roster() {
        let config = EventConfig::default();
        let res = run_event(&config, Path::new(""), &[], &Award::ALL);
        assert!(matches!(res, Err(BoardError::MissingRosterSource {})));
    }
}
