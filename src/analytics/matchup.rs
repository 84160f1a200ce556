// Head-to-head matchup simulation.
//
// Replays a window of scoring periods as hypothetical weekly matchups: the
// target team's totals against every other team's totals, category by
// category, with each match decided by majority of category wins.

use std::cmp::Ordering;

use tracing::warn;

use crate::analytics::records::TeamPeriodRecord;
use crate::analytics::{clean_periods, period_slice, team_known, AnalyticsError};
use crate::config::ScoringConfig;

// ---------------------------------------------------------------------------
// Output structs
// ---------------------------------------------------------------------------

/// Result of one simulated weekly matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Win,
    Loss,
    Tie,
}

impl MatchOutcome {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            MatchOutcome::Win => "WIN",
            MatchOutcome::Loss => "LOSS",
            MatchOutcome::Tie => "TIE",
        }
    }
}

/// Category tally for one simulated matchup between the target team and a
/// single opponent in a single period.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupResult {
    pub period: u32,
    pub opponent: String,
    /// Categories the target team won outright.
    pub wins: u32,
    /// Categories the opponent won outright.
    pub losses: u32,
    /// Categories that landed dead even. Ties never decide the match.
    pub ties: u32,
    /// Whether this opponent was the team's actual scheduled matchup for the
    /// period, per the record table's opponent column.
    pub scheduled: bool,
    pub outcome: MatchOutcome,
}

// ---------------------------------------------------------------------------
// Category comparison
// ---------------------------------------------------------------------------

/// Compare one category total between two teams, honoring direction:
/// for inverted categories the lower total wins.
fn compare_category(mine: f64, theirs: f64, inverted: bool) -> Ordering {
    let ord = mine.partial_cmp(&theirs).unwrap_or(Ordering::Equal);
    if inverted {
        ord.reverse()
    } else {
        ord
    }
}

// ---------------------------------------------------------------------------
// Simulation entry point
// ---------------------------------------------------------------------------

/// Simulate the target team's matchups against every other team for each
/// requested period.
///
/// Results come back ordered by period, then opponent name. Periods with no
/// records, and periods where the target team itself has no row, are logged
/// and skipped. An unknown team name aborts with no partial output.
pub fn simulate_matchups(
    records: &[TeamPeriodRecord],
    team: &str,
    periods: &[u32],
    scoring: &ScoringConfig,
) -> Result<Vec<MatchupResult>, AnalyticsError> {
    let periods = clean_periods(periods)?;
    if !team_known(records, team) {
        return Err(AnalyticsError::UnknownTeam(team.to_string()));
    }

    let mut results = Vec::new();
    for period in periods {
        let slice = period_slice(records, period)?;
        if slice.is_empty() {
            warn!(period, "no records for period, skipping");
            continue;
        }
        let mine = match slice.get(team) {
            Some(record) => *record,
            None => {
                warn!(team, period, "team has no record for period, skipping");
                continue;
            }
        };

        for (&opponent, &theirs) in &slice {
            if opponent == team {
                continue;
            }
            let mut wins = 0u32;
            let mut losses = 0u32;
            let mut ties = 0u32;
            for &category in &scoring.tracked_categories {
                match compare_category(
                    mine.category_value(category),
                    theirs.category_value(category),
                    scoring.is_inverted(category),
                ) {
                    Ordering::Greater => wins += 1,
                    Ordering::Less => losses += 1,
                    Ordering::Equal => ties += 1,
                }
            }
            let outcome = match wins.cmp(&losses) {
                Ordering::Greater => MatchOutcome::Win,
                Ordering::Less => MatchOutcome::Loss,
                Ordering::Equal => MatchOutcome::Tie,
            };
            results.push(MatchupResult {
                period,
                opponent: opponent.to_string(),
                wins,
                losses,
                ties,
                scheduled: mine.opponent == opponent,
                outcome,
            });
        }
    }
    Ok(results)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
