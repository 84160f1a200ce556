// Snapshot table loading and normalization.
//
// Reads the scraper's CSV exports: a season roster file of per-game player
// averages and a weekly record file of per-team category totals. Each table
// is an immutable snapshot, replaced wholesale on refresh.

use crate::config::{Category, Config, DataPaths};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Season-to-date stats for one player: games played plus per-game rates.
/// Percentage categories also carry makes per game so the rating engine can
/// weight them by volume. An empty team means the player is a free agent.
#[derive(Debug, Clone)]
pub struct PlayerSeasonRecord {
    pub name: String,
    pub team: String,
    pub games: u32,
    pub fgm: f64,
    pub fg_pct: f64,
    pub ftm: f64,
    pub ft_pct: f64,
    pub threes: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub turnovers: f64,
    pub blocks: f64,
    pub points: f64,
}

impl PlayerSeasonRecord {
    /// The per-game value for a counting category, or the raw percentage for
    /// a rate category.
    pub fn category_value(&self, category: Category) -> f64 {
        match category {
            Category::FgPct => self.fg_pct,
            Category::FtPct => self.ft_pct,
            Category::Threes => self.threes,
            Category::Rebounds => self.rebounds,
            Category::Assists => self.assists,
            Category::Steals => self.steals,
            Category::Turnovers => self.turnovers,
            Category::Blocks => self.blocks,
            Category::Points => self.points,
        }
    }

    pub fn is_free_agent(&self) -> bool {
        self.team.is_empty()
    }
}

/// Aggregate category totals for one team in one scoring period, plus the
/// combined games and minutes behind them and the scheduled opponent.
#[derive(Debug, Clone)]
pub struct TeamPeriodRecord {
    pub team: String,
    pub period: u32,
    pub opponent: String,
    pub games: u32,
    pub minutes: f64,
    pub fg_pct: f64,
    pub ft_pct: f64,
    pub threes: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub turnovers: f64,
    pub blocks: f64,
    pub points: f64,
}

impl TeamPeriodRecord {
    pub fn category_value(&self, category: Category) -> f64 {
        match category {
            Category::FgPct => self.fg_pct,
            Category::FtPct => self.ft_pct,
            Category::Threes => self.threes,
            Category::Rebounds => self.rebounds,
            Category::Assists => self.assists,
            Category::Steals => self.steals,
            Category::Turnovers => self.turnovers,
            Category::Blocks => self.blocks,
            Category::Points => self.points,
        }
    }
}

/// Both snapshot tables loaded and ready for the analytics engines.
#[derive(Debug, Clone)]
pub struct LeagueSnapshot {
    pub roster: Vec<PlayerSeasonRecord>,
    pub record: Vec<TeamPeriodRecord>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private) — scraper export format
// ---------------------------------------------------------------------------

/// Roster CSV row. Counting columns are f64 because some exports carry
/// per-game averages with decimals in every column. Extra columns (MPG,
/// rank, salary, ...) are silently absorbed via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawRosterRow {
    Player: String,
    #[serde(default)]
    Team: String,
    G: f64,
    FGM: f64,
    #[serde(rename = "FG%", alias = "FGP")]
    FGPct: f64,
    FTM: f64,
    #[serde(rename = "FT%", alias = "FTP")]
    FTPct: f64,
    #[serde(rename = "3PM")]
    TPM: f64,
    REB: f64,
    AST: f64,
    STL: f64,
    TO: f64,
    BLK: f64,
    PTS: f64,
    /// Absorb any extra columns the scraper includes.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

/// Weekly record CSV row. One row per (team, period). The scraper also
/// exports the real matchup score; that and anything else lands in the
/// flattened extras.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawRecordRow {
    Period: u32,
    Team: String,
    #[serde(default)]
    Opponent: String,
    G: f64,
    MIN: f64,
    #[serde(rename = "FG%", alias = "FGP")]
    FGPct: f64,
    #[serde(rename = "FT%", alias = "FTP")]
    FTPct: f64,
    #[serde(rename = "3PM")]
    TPM: f64,
    REB: f64,
    AST: f64,
    STL: f64,
    TO: f64,
    BLK: f64,
    PTS: f64,
    /// Absorb any extra columns the scraper includes.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns true if all given f64 values are finite (not NaN or Infinity).
fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_roster_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerSeasonRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut roster = Vec::new();
    for result in reader.deserialize::<RawRosterRow>() {
        match result {
            Ok(raw) => {
                if !all_finite(&[
                    raw.G, raw.FGM, raw.FGPct, raw.FTM, raw.FTPct, raw.TPM, raw.REB,
                    raw.AST, raw.STL, raw.TO, raw.BLK, raw.PTS,
                ]) {
                    warn!("skipping player '{}': non-finite stat value", raw.Player.trim());
                    continue;
                }
                roster.push(PlayerSeasonRecord {
                    name: raw.Player.trim().to_string(),
                    team: raw.Team.trim().to_string(),
                    games: raw.G.round() as u32,
                    fgm: raw.FGM,
                    fg_pct: raw.FGPct,
                    ftm: raw.FTM,
                    ft_pct: raw.FTPct,
                    threes: raw.TPM,
                    rebounds: raw.REB,
                    assists: raw.AST,
                    steals: raw.STL,
                    turnovers: raw.TO,
                    blocks: raw.BLK,
                    points: raw.PTS,
                });
            }
            Err(e) => {
                warn!("skipping malformed roster row: {}", e);
            }
        }
    }
    Ok(roster)
}

fn load_record_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamPeriodRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut record = Vec::new();
    for result in reader.deserialize::<RawRecordRow>() {
        match result {
            Ok(raw) => {
                if !all_finite(&[
                    raw.G, raw.MIN, raw.FGPct, raw.FTPct, raw.TPM, raw.REB, raw.AST,
                    raw.STL, raw.TO, raw.BLK, raw.PTS,
                ]) {
                    warn!(
                        "skipping record for team '{}' period {}: non-finite value",
                        raw.Team.trim(),
                        raw.Period
                    );
                    continue;
                }
                let team = raw.Team.trim().to_string();
                if team.is_empty() {
                    warn!("skipping record row in period {}: empty team name", raw.Period);
                    continue;
                }
                record.push(TeamPeriodRecord {
                    team,
                    period: raw.Period,
                    opponent: raw.Opponent.trim().to_string(),
                    games: raw.G.round() as u32,
                    minutes: raw.MIN,
                    fg_pct: raw.FGPct,
                    ft_pct: raw.FTPct,
                    threes: raw.TPM,
                    rebounds: raw.REB,
                    assists: raw.AST,
                    steals: raw.STL,
                    turnovers: raw.TO,
                    blocks: raw.BLK,
                    points: raw.PTS,
                });
            }
            Err(e) => {
                warn!("skipping malformed record row: {}", e);
            }
        }
    }
    Ok(record)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load the season roster snapshot from a CSV file.
pub fn load_roster(path: &Path) -> Result<Vec<PlayerSeasonRecord>, RecordError> {
    let file = std::fs::File::open(path).map_err(|e| RecordError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_roster_from_reader(file).map_err(|e| RecordError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the weekly record snapshot from a CSV file.
pub fn load_record(path: &Path) -> Result<Vec<TeamPeriodRecord>, RecordError> {
    let file = std::fs::File::open(path).map_err(|e| RecordError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_record_from_reader(file).map_err(|e| RecordError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load both snapshot tables using paths from the config.
pub fn load_snapshot(config: &Config) -> Result<LeagueSnapshot, RecordError> {
    load_snapshot_from_paths(&config.data_paths)
}

/// Load both snapshot tables from explicit paths. Exposed for testing and
/// flexibility.
pub fn load_snapshot_from_paths(paths: &DataPaths) -> Result<LeagueSnapshot, RecordError> {
    let roster = load_roster(Path::new(&paths.roster))?;
    let record = load_record(Path::new(&paths.record))?;

    let snapshot = LeagueSnapshot { roster, record };
    validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

/// Table-level integrity checks applied after both files load.
fn validate_snapshot(snapshot: &LeagueSnapshot) -> Result<(), RecordError> {
    if snapshot.roster.is_empty() {
        return Err(RecordError::Validation(
            "roster CSV produced zero valid rows".into(),
        ));
    }
    if snapshot.record.is_empty() {
        return Err(RecordError::Validation(
            "record CSV produced zero valid rows".into(),
        ));
    }

    let mut seen: HashSet<(&str, u32)> = HashSet::new();
    for rec in &snapshot.record {
        if !seen.insert((rec.team.as_str(), rec.period)) {
            return Err(RecordError::Validation(format!(
                "duplicate record for team `{}` in period {}",
                rec.team, rec.period
            )));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
