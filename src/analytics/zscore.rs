// Season z-score ratings with volume-weighted rate stats.

use std::collections::BTreeMap;

use crate::analytics::records::PlayerSeasonRecord;
use crate::analytics::{round3, AnalyticsError};
use crate::config::{Category, PopulationScope, ScoringConfig};

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single category across a player pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation (or a min-max span) is treated
/// as zero.
pub(crate) const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and sample standard deviation (N−1 denominator) for a slice
/// of values.
///
/// Returns `stdev: 0.0` for slices with fewer than two values, since a
/// deviation needs at least two observations.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return PoolStats { mean, stdev: 0.0 };
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero (guarding
/// against division by zero). `compute_ratings` rejects zero-variance
/// categories before this point, so the guard only matters for direct
/// callers.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

// ---------------------------------------------------------------------------
// Rate stat contribution (volume-weighted)
// ---------------------------------------------------------------------------

/// Rate-stat contribution: `makes_per_game * (player_pct - league_avg_pct)`.
///
/// A player shooting above the population average produces a positive
/// contribution, weighted by nightly make volume, so a 60% shooter on two
/// attempts a game moves the needle less than a 55% shooter on twenty.
pub fn rate_contribution(makes_per_game: f64, pct: f64, league_avg_pct: f64) -> f64 {
    makes_per_game * (pct - league_avg_pct)
}

// ---------------------------------------------------------------------------
// Standardized rating (main output struct)
// ---------------------------------------------------------------------------

/// A player's standardized season rating.
///
/// `rank`, `adjusted_rank`, and `punt_shift` are filled by the min-max pass
/// at the end of `compute_ratings`. Draft values stay `None` until
/// `draft::apply_draft_values` runs.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardizedRating {
    pub name: String,
    pub team: String,
    pub games: u32,
    /// Per-category z-scores, rounded to 3 decimals, sign already flipped
    /// for inverted categories.
    pub zscores: BTreeMap<Category, f64>,
    /// Sum of z-scores over every tracked category.
    pub composite: f64,
    /// Sum of z-scores over tracked categories minus the punted ones.
    pub adjusted_composite: f64,
    /// Composite min-max normalized to 0–100 across the population.
    pub rank: u32,
    /// Adjusted composite min-max normalized to 0–100 across the population.
    pub adjusted_rank: u32,
    /// `adjusted_rank − rank`: how far the player moves once punted
    /// categories stop counting.
    pub punt_shift: i32,
    pub draft_value: Option<u32>,
    pub adjusted_draft_value: Option<u32>,
}

// ---------------------------------------------------------------------------
// Pool construction
// ---------------------------------------------------------------------------

/// Restrict the roster snapshot to the standardization population: players
/// with at least one game, minus free agents when the scope says so.
fn filter_pool<'a>(
    roster: &'a [PlayerSeasonRecord],
    scoring: &ScoringConfig,
) -> Vec<&'a PlayerSeasonRecord> {
    roster
        .iter()
        .filter(|p| p.games > 0)
        .filter(|p| match scoring.population_scope {
            PopulationScope::All => true,
            PopulationScope::Rostered => !p.is_free_agent(),
        })
        .collect()
}

/// League-average FG% and FT% across the pool (plain means of the
/// percentage columns).
fn compute_league_rates(pool: &[&PlayerSeasonRecord]) -> (f64, f64) {
    if pool.is_empty() {
        return (0.0, 0.0);
    }
    let n = pool.len() as f64;
    let fg = pool.iter().map(|p| p.fg_pct).sum::<f64>() / n;
    let ft = pool.iter().map(|p| p.ft_pct).sum::<f64>() / n;
    (fg, ft)
}

/// The number that gets standardized for one (player, category) pair: the
/// per-game value for counting categories, or the volume-weighted
/// contribution for rate categories.
fn observed_value(
    player: &PlayerSeasonRecord,
    category: Category,
    league_fg_pct: f64,
    league_ft_pct: f64,
) -> f64 {
    match category {
        Category::FgPct => rate_contribution(player.fgm, player.fg_pct, league_fg_pct),
        Category::FtPct => rate_contribution(player.ftm, player.ft_pct, league_ft_pct),
        other => player.category_value(other),
    }
}

/// Per-category pool statistics over the in-scope population. A tracked
/// category where every player is identical cannot be standardized.
fn compute_category_stats(
    pool: &[&PlayerSeasonRecord],
    scoring: &ScoringConfig,
    league_fg_pct: f64,
    league_ft_pct: f64,
) -> Result<BTreeMap<Category, PoolStats>, AnalyticsError> {
    let mut stats = BTreeMap::new();
    for &category in &scoring.tracked_categories {
        let values: Vec<f64> = pool
            .iter()
            .map(|p| observed_value(p, category, league_fg_pct, league_ft_pct))
            .collect();
        let category_stats = compute_pool_stats(&values);
        if category_stats.stdev < STDEV_EPSILON {
            return Err(AnalyticsError::ZeroVariance { category });
        }
        stats.insert(category, category_stats);
    }
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Min-max scaling
// ---------------------------------------------------------------------------

/// Min-max scale values onto integers `0..=cap`: the maximum value maps to
/// `cap`, the minimum to 0.
pub fn minmax_scale(values: &[f64], cap: f64) -> Result<Vec<u32>, AnalyticsError> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if !span.is_finite() || span < STDEV_EPSILON {
        return Err(AnalyticsError::FlatComposite);
    }
    Ok(values
        .iter()
        .map(|v| (cap * (v - min) / span).round() as u32)
        .collect())
}

// ---------------------------------------------------------------------------
// Top-level entry point
// ---------------------------------------------------------------------------

/// Standardize the roster snapshot into season ratings, sorted descending by
/// composite.
///
/// Steps:
/// 1. Filter the population (played games, population scope).
/// 2. Compute league-average FG%/FT% from the pool.
/// 3. Compute per-category pool stats, using volume-weighted contributions
///    for the rate categories.
/// 4. Z-score every player per tracked category (3 decimals), flipping the
///    sign of inverted categories, and sum into composite and punt-adjusted
///    composite.
/// 5. Min-max normalize both composites to 0–100 integer ranks and record
///    each player's punt shift.
pub fn compute_ratings(
    roster: &[PlayerSeasonRecord],
    scoring: &ScoringConfig,
) -> Result<Vec<StandardizedRating>, AnalyticsError> {
    // ---- 1. Population ----
    let pool = filter_pool(roster, scoring);
    if pool.is_empty() {
        return Err(AnalyticsError::EmptyPopulation);
    }

    // ---- 2. League averages for rate stats ----
    let (league_fg_pct, league_ft_pct) = compute_league_rates(&pool);

    // ---- 3. Pool stats ----
    let stats = compute_category_stats(&pool, scoring, league_fg_pct, league_ft_pct)?;

    // ---- 4. Score the pool ----
    let mut ratings: Vec<StandardizedRating> = Vec::with_capacity(pool.len());
    for player in &pool {
        let mut zscores = BTreeMap::new();
        let mut composite = 0.0;
        let mut adjusted_composite = 0.0;
        for (&category, category_stats) in &stats {
            let observed = observed_value(player, category, league_fg_pct, league_ft_pct);
            let mut z = round3(compute_zscore(observed, category_stats));
            if scoring.is_inverted(category) {
                z = -z;
            }
            composite += z;
            if !scoring.is_punted(category) {
                adjusted_composite += z;
            }
            zscores.insert(category, z);
        }
        ratings.push(StandardizedRating {
            name: player.name.clone(),
            team: player.team.clone(),
            games: player.games,
            zscores,
            composite,
            adjusted_composite,
            rank: 0,
            adjusted_rank: 0,
            punt_shift: 0,
            draft_value: None,
            adjusted_draft_value: None,
        });
    }

    // Sort descending by composite
    ratings.sort_by(|a, b| {
        b.composite
            .partial_cmp(&a.composite)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // ---- 5. Min-max ranks ----
    let composites: Vec<f64> = ratings.iter().map(|r| r.composite).collect();
    let ranks = minmax_scale(&composites, 100.0)?;
    let adjusted: Vec<f64> = ratings.iter().map(|r| r.adjusted_composite).collect();
    let adjusted_ranks = minmax_scale(&adjusted, 100.0)?;

    for (i, rating) in ratings.iter_mut().enumerate() {
        rating.rank = ranks[i];
        rating.adjusted_rank = adjusted_ranks[i];
        rating.punt_shift = adjusted_ranks[i] as i32 - ranks[i] as i32;
    }

    Ok(ratings)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
