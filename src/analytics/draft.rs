// Auction draft value conversion.
//
// Turns composite z-scores into 0–65 auction values for a budget draft. The
// league budget is distributed proportionally to positive composite mass,
// and the resulting monetary shares are min-max normalized onto the 0–65
// integer scale.

use crate::analytics::zscore::{minmax_scale, StandardizedRating};
use crate::analytics::AnalyticsError;

/// Upper bound of the normalized draft value scale. The best player in the
/// population lands exactly here, the worst at 0.
pub const DRAFT_VALUE_CAP: u32 = 65;

/// Distribute the league budget proportionally to composite scores.
///
/// Only positive composites carry mass; negative composites receive negative
/// shares, which the min-max pass later clamps into the bottom of the scale.
fn budget_shares(composites: &[f64], budget: u32) -> Result<Vec<f64>, AnalyticsError> {
    let positive_mass: f64 = composites.iter().filter(|c| **c > 0.0).sum();
    if positive_mass <= 0.0 {
        return Err(AnalyticsError::NoPositiveMass);
    }
    Ok(composites
        .iter()
        .map(|c| c / positive_mass * budget as f64)
        .collect())
}

/// Compute 0–65 draft values for every rating, from both the overall and the
/// punt-adjusted composite.
///
/// Expects the ratings produced by `zscore::compute_ratings`; values are
/// written in place so the list keeps its composite ordering.
pub fn apply_draft_values(
    ratings: &mut [StandardizedRating],
    budget: u32,
) -> Result<(), AnalyticsError> {
    let composites: Vec<f64> = ratings.iter().map(|r| r.composite).collect();
    let shares = budget_shares(&composites, budget)?;
    let values = minmax_scale(&shares, DRAFT_VALUE_CAP as f64)?;

    let adjusted: Vec<f64> = ratings.iter().map(|r| r.adjusted_composite).collect();
    let adjusted_shares = budget_shares(&adjusted, budget)?;
    let adjusted_values = minmax_scale(&adjusted_shares, DRAFT_VALUE_CAP as f64)?;

    for (i, rating) in ratings.iter_mut().enumerate() {
        rating.draft_value = Some(values[i]);
        rating.adjusted_draft_value = Some(adjusted_values[i]);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
