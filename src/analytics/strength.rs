// Period strength tables and power rankings.
//
// Converts raw weekly team totals into per-period min-max normalized
// category vectors, and collapses those vectors into a single power score
// per (team, period). Both outputs share one normalization pass, so a
// team's power score is always the sum of its strength vector.

use std::collections::BTreeMap;

use tracing::warn;

use crate::analytics::records::TeamPeriodRecord;
use crate::analytics::zscore::STDEV_EPSILON;
use crate::analytics::{clean_periods, period_slice, round3, team_known, AnalyticsError};
use crate::config::{Category, ScoringConfig};

/// Offset added to every normalized value, lifting the weakest team off the
/// floor of the scale. Values land in [0.2, 1.2].
const STRENGTH_OFFSET: f64 = 0.2;

// ---------------------------------------------------------------------------
// Output structs
// ---------------------------------------------------------------------------

/// One team's normalized category vector for a single scoring period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodStrength {
    pub period: u32,
    /// Tracked categories mapped to [0.2, 1.2], higher meaning stronger.
    pub values: BTreeMap<Category, f64>,
}

/// One team's power score for a single scoring period.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerEntry {
    pub team: String,
    pub period: u32,
    /// Sum of the team's normalized category vector for the period.
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Period normalization (shared by both outputs)
// ---------------------------------------------------------------------------

struct CategoryScale {
    category: Category,
    min: f64,
    max: f64,
    span: f64,
}

/// Min-max normalize one period's totals per tracked category, reversing
/// the scale for inverted categories, then shift by the strength offset.
///
/// Every team in the slice is normalized against every other team in the
/// same slice. A tracked category where all teams posted the same total
/// cannot be scaled.
fn normalize_period<'a>(
    slice: &BTreeMap<&'a str, &TeamPeriodRecord>,
    scoring: &ScoringConfig,
    period: u32,
) -> Result<BTreeMap<&'a str, BTreeMap<Category, f64>>, AnalyticsError> {
    let mut scales = Vec::with_capacity(scoring.tracked_categories.len());
    for &category in &scoring.tracked_categories {
        let min = slice
            .values()
            .map(|r| r.category_value(category))
            .fold(f64::INFINITY, f64::min);
        let max = slice
            .values()
            .map(|r| r.category_value(category))
            .fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        if !span.is_finite() || span < STDEV_EPSILON {
            return Err(AnalyticsError::ZeroSpread { category, period });
        }
        scales.push(CategoryScale {
            category,
            min,
            max,
            span,
        });
    }

    let mut normalized: BTreeMap<&str, BTreeMap<Category, f64>> = BTreeMap::new();
    for (&team, record) in slice {
        let mut values = BTreeMap::new();
        for scale in &scales {
            let raw = record.category_value(scale.category);
            let scaled = if scoring.is_inverted(scale.category) {
                (scale.max - raw) / scale.span
            } else {
                (raw - scale.min) / scale.span
            };
            values.insert(scale.category, round3(scaled + STRENGTH_OFFSET));
        }
        normalized.insert(team, values);
    }
    Ok(normalized)
}

// ---------------------------------------------------------------------------
// Team strength vectors
// ---------------------------------------------------------------------------

/// Compute one team's normalized strength vector for each requested period.
///
/// Periods with no records at all, and periods where the team itself is
/// missing, are logged and skipped rather than aborting the window. An
/// unknown team name aborts before any period is touched.
pub fn team_strengths(
    records: &[TeamPeriodRecord],
    team: &str,
    periods: &[u32],
    scoring: &ScoringConfig,
) -> Result<Vec<PeriodStrength>, AnalyticsError> {
    let periods = clean_periods(periods)?;
    if !team_known(records, team) {
        return Err(AnalyticsError::UnknownTeam(team.to_string()));
    }

    let mut strengths = Vec::with_capacity(periods.len());
    for period in periods {
        let slice = period_slice(records, period)?;
        if slice.is_empty() {
            warn!(period, "no records for period, skipping");
            continue;
        }
        if !slice.contains_key(team) {
            warn!(team, period, "team has no record for period, skipping");
            continue;
        }
        let mut normalized = normalize_period(&slice, scoring, period)?;
        if let Some(values) = normalized.remove(team) {
            strengths.push(PeriodStrength { period, values });
        }
    }
    Ok(strengths)
}

// ---------------------------------------------------------------------------
// Power rankings
// ---------------------------------------------------------------------------

/// Collapse every team's strength vector into one power score per period.
///
/// Entries come back ordered by period, then descending score, then team
/// name. Periods with no records are logged and skipped.
pub fn power_rankings(
    records: &[TeamPeriodRecord],
    periods: &[u32],
    scoring: &ScoringConfig,
) -> Result<Vec<PowerEntry>, AnalyticsError> {
    let periods = clean_periods(periods)?;

    let mut entries = Vec::new();
    for period in periods {
        let slice = period_slice(records, period)?;
        if slice.is_empty() {
            warn!(period, "no records for period, skipping");
            continue;
        }
        let normalized = normalize_period(&slice, scoring, period)?;
        for (team, values) in normalized {
            let score = round3(values.values().sum());
            entries.push(PowerEntry {
                team: team.to_string(),
                period,
                score,
            });
        }
    }

    entries.sort_by(|a, b| {
        a.period
            .cmp(&b.period)
            .then_with(|| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.team.cmp(&b.team))
    });
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
