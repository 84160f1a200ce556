// Analytics engines: season z-score ratings, auction draft values, period
// strength tables, and head-to-head matchup simulation.

pub mod draft;
pub mod matchup;
pub mod records;
pub mod strength;
pub mod zscore;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::analytics::records::TeamPeriodRecord;
use crate::config::Category;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Broad classes of analytics failure. Validation failures abort before any
/// computation; data-integrity failures mean the snapshot itself is suspect;
/// computation failures are degenerate arithmetic (all inputs identical).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    DataIntegrity,
    Computation,
}

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("team `{0}` not recognized")]
    UnknownTeam(String),

    #[error("no scoring periods requested")]
    NoPeriods,

    #[error("no players in scope after filtering")]
    EmptyPopulation,

    #[error("category {category} has no variance across the population")]
    ZeroVariance { category: Category },

    #[error("category {category} has no spread across teams in period {period}")]
    ZeroSpread { category: Category, period: u32 },

    #[error("duplicate record for team `{team}` in period {period}")]
    DuplicateTeamPeriod { team: String, period: u32 },

    #[error("composite scores are all identical; min-max scaling is undefined")]
    FlatComposite,

    #[error("no positive composite mass to distribute the budget over")]
    NoPositiveMass,
}

impl AnalyticsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyticsError::UnknownTeam(_)
            | AnalyticsError::NoPeriods
            | AnalyticsError::EmptyPopulation => ErrorKind::Validation,
            AnalyticsError::ZeroVariance { .. }
            | AnalyticsError::ZeroSpread { .. }
            | AnalyticsError::DuplicateTeamPeriod { .. } => ErrorKind::DataIntegrity,
            AnalyticsError::FlatComposite | AnalyticsError::NoPositiveMass => {
                ErrorKind::Computation
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Round to 3 decimal places, the precision carried by every standardized
/// value this crate emits.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// All rows for one scoring period, keyed by team name. A team has at most
/// one record per period; a second row for the same team is a data-integrity
/// failure.
pub(crate) fn period_slice(
    records: &[TeamPeriodRecord],
    period: u32,
) -> Result<BTreeMap<&str, &TeamPeriodRecord>, AnalyticsError> {
    let mut slice: BTreeMap<&str, &TeamPeriodRecord> = BTreeMap::new();
    for rec in records.iter().filter(|r| r.period == period) {
        if slice.insert(rec.team.as_str(), rec).is_some() {
            return Err(AnalyticsError::DuplicateTeamPeriod {
                team: rec.team.clone(),
                period,
            });
        }
    }
    Ok(slice)
}

/// Whether the team appears anywhere in the record table.
pub(crate) fn team_known(records: &[TeamPeriodRecord], team: &str) -> bool {
    records.iter().any(|r| r.team == team)
}

/// Sort a requested period window ascending and drop repeats. An empty
/// window is a validation error.
pub(crate) fn clean_periods(periods: &[u32]) -> Result<Vec<u32>, AnalyticsError> {
    if periods.is_empty() {
        return Err(AnalyticsError::NoPeriods);
    }
    let mut cleaned = periods.to_vec();
    cleaned.sort_unstable();
    cleaned.dedup();
    Ok(cleaned)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_team_period(team: &str, period: u32, points: f64) -> TeamPeriodRecord {
        TeamPeriodRecord {
            team: team.to_string(),
            period,
            opponent: String::new(),
            games: 28,
            minutes: 1150.0,
            fg_pct: 0.46,
            ft_pct: 0.78,
            threes: 55.0,
            rebounds: 250.0,
            assists: 140.0,
            steals: 40.0,
            turnovers: 80.0,
            blocks: 30.0,
            points,
        }
    }

    #[test]
    fn round3_rounds_to_three_decimals() {
        assert_eq!(round3(1.23456), 1.235);
        assert_eq!(round3(-1.23456), -1.235);
        assert_eq!(round3(0.0), 0.0);
        assert_eq!(round3(2.5), 2.5);
    }

    #[test]
    fn clean_periods_sorts_and_dedups() {
        assert_eq!(clean_periods(&[3, 1, 2, 3, 1]).unwrap(), vec![1, 2, 3]);
        assert_eq!(clean_periods(&[7]).unwrap(), vec![7]);
        assert!(matches!(
            clean_periods(&[]).unwrap_err(),
            AnalyticsError::NoPeriods
        ));
    }

    #[test]
    fn period_slice_selects_only_requested_period() {
        let records = vec![
            make_team_period("Fish", 1, 310.0),
            make_team_period("Bears", 1, 295.0),
            make_team_period("Fish", 2, 280.0),
        ];

        let slice = period_slice(&records, 1).unwrap();
        assert_eq!(slice.len(), 2);
        assert!(slice.contains_key("Fish"));
        assert!(slice.contains_key("Bears"));
        assert_eq!(slice["Fish"].points, 310.0);
    }

    #[test]
    fn period_slice_rejects_duplicate_team() {
        let records = vec![
            make_team_period("Fish", 1, 310.0),
            make_team_period("Fish", 1, 295.0),
        ];

        let err = period_slice(&records, 1).unwrap_err();
        match &err {
            AnalyticsError::DuplicateTeamPeriod { team, period } => {
                assert_eq!(team, "Fish");
                assert_eq!(*period, 1);
            }
            other => panic!("expected DuplicateTeamPeriod, got: {other}"),
        }
        assert_eq!(err.kind(), ErrorKind::DataIntegrity);
    }

    #[test]
    fn team_known_scans_whole_table() {
        let records = vec![
            make_team_period("Fish", 1, 310.0),
            make_team_period("Bears", 2, 295.0),
        ];
        assert!(team_known(&records, "Bears"));
        assert!(!team_known(&records, "Walruses"));
    }

    #[test]
    fn error_kinds_cover_the_taxonomy() {
        assert_eq!(
            AnalyticsError::UnknownTeam("X".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(AnalyticsError::NoPeriods.kind(), ErrorKind::Validation);
        assert_eq!(
            AnalyticsError::ZeroVariance {
                category: Category::Points
            }
            .kind(),
            ErrorKind::DataIntegrity
        );
        assert_eq!(
            AnalyticsError::FlatComposite.kind(),
            ErrorKind::Computation
        );
        assert_eq!(
            AnalyticsError::NoPositiveMass.kind(),
            ErrorKind::Computation
        );
    }
}
