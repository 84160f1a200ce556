// Text report rendering.
//
// Turns analytics output into fixed-width tables for the terminal. These are
// pure string builders: computation stays in the analytics modules and
// printing stays in the binary.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::analytics::matchup::{MatchOutcome, MatchupResult};
use crate::analytics::strength::{PeriodStrength, PowerEntry};
use crate::analytics::zscore::StandardizedRating;
use crate::config::ScoringConfig;

/// Right-aligned cell for an optional value, dash when unset.
fn value_cell(value: Option<u32>) -> String {
    match value {
        Some(v) => format!("{:>6}", v),
        None => format!("{:>6}", "-"),
    }
}

/// Team column text, with free agents shown as FA.
fn team_label(team: &str) -> &str {
    if team.is_empty() {
        "FA"
    } else {
        team
    }
}

// ---------------------------------------------------------------------------
// Season ratings table
// ---------------------------------------------------------------------------

/// Render the full season rating table: one row per player, one column per
/// tracked category z-score, then composites, ranks, punt shift, and draft
/// values.
pub fn ratings_table(ratings: &[StandardizedRating], scoring: &ScoringConfig) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(&format!("SEASON RATINGS ({} players)\n\n", ratings.len()));

    out.push_str(&format!("{:>4}  {:<22}{:<11}{:>3}", "#", "Player", "Team", "G"));
    for category in &scoring.tracked_categories {
        out.push_str(&format!("{:>8}", category.label()));
    }
    out.push_str(&format!(
        "{:>9}{:>9}{:>6}{:>6}{:>7}{:>6}{:>6}\n",
        "Comp", "Adj", "Rank", "AdjR", "Shift", "Val", "AdjV"
    ));

    for (i, rating) in ratings.iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:<22}{:<11}{:>3}",
            i + 1,
            rating.name,
            team_label(&rating.team),
            rating.games
        ));
        for category in &scoring.tracked_categories {
            let z = rating.zscores.get(category).copied().unwrap_or(0.0);
            out.push_str(&format!("{:>+8.3}", z));
        }
        out.push_str(&format!(
            "{:>+9.3}{:>+9.3}{:>6}{:>6}{:>+7}{}{}\n",
            rating.composite,
            rating.adjusted_composite,
            rating.rank,
            rating.adjusted_rank,
            rating.punt_shift,
            value_cell(rating.draft_value),
            value_cell(rating.adjusted_draft_value),
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Power ranking table
// ---------------------------------------------------------------------------

/// Render power rankings as one row per team and one column per period,
/// plus a window total. Teams sort by total, best first.
pub fn power_table(entries: &[PowerEntry]) -> String {
    if entries.is_empty() {
        return "No periods with records.\n".to_string();
    }

    let mut periods: Vec<u32> = entries.iter().map(|e| e.period).collect();
    periods.sort_unstable();
    periods.dedup();

    let mut scores: BTreeMap<&str, BTreeMap<u32, f64>> = BTreeMap::new();
    for entry in entries {
        scores
            .entry(entry.team.as_str())
            .or_default()
            .insert(entry.period, entry.score);
    }

    let mut totals: Vec<(&str, f64)> = scores
        .iter()
        .map(|(team, by_period)| (*team, by_period.values().sum()))
        .collect();
    totals.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    let mut out = String::with_capacity(1024);
    out.push_str(&format!("POWER RANKINGS ({} periods)\n\n", periods.len()));
    out.push_str(&format!("{:>4}  {:<14}", "#", "Team"));
    for period in &periods {
        out.push_str(&format!("{:>8}", format!("P{period}")));
    }
    out.push_str(&format!("{:>9}\n", "Total"));

    for (i, (team, total)) in totals.iter().enumerate() {
        out.push_str(&format!("{:>4}  {:<14}", i + 1, team));
        for period in &periods {
            match scores.get(team).and_then(|by_period| by_period.get(period)) {
                Some(score) => out.push_str(&format!("{:>8.3}", score)),
                None => out.push_str(&format!("{:>8}", "-")),
            }
        }
        out.push_str(&format!("{:>9.3}\n", total));
    }
    out
}

// ---------------------------------------------------------------------------
// Category strength table
// ---------------------------------------------------------------------------

/// Render one team's per-period category strength vectors.
pub fn strengths_table(
    team: &str,
    strengths: &[PeriodStrength],
    scoring: &ScoringConfig,
) -> String {
    if strengths.is_empty() {
        return format!("No periods with records for {team}.\n");
    }

    let mut out = String::with_capacity(1024);
    out.push_str(&format!(
        "CATEGORY STRENGTHS for {team} (0.200 weakest, 1.200 strongest per period)\n\n"
    ));
    out.push_str(&format!("{:>6}", "Period"));
    for category in &scoring.tracked_categories {
        out.push_str(&format!("{:>8}", category.label()));
    }
    out.push('\n');

    for strength in strengths {
        out.push_str(&format!("{:>6}", strength.period));
        for category in &scoring.tracked_categories {
            let value = strength.values.get(category).copied().unwrap_or(0.0);
            out.push_str(&format!("{:>8.3}", value));
        }
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Matchup summary
// ---------------------------------------------------------------------------

/// Render simulated matchup results and a closing record line. Scheduled
/// opponents carry a star.
pub fn matchup_summary(team: &str, results: &[MatchupResult]) -> String {
    if results.is_empty() {
        return format!("No periods with records for {team}.\n");
    }

    let won = results
        .iter()
        .filter(|r| r.outcome == MatchOutcome::Win)
        .count();
    let lost = results
        .iter()
        .filter(|r| r.outcome == MatchOutcome::Loss)
        .count();
    let tied = results
        .iter()
        .filter(|r| r.outcome == MatchOutcome::Tie)
        .count();

    let mut out = String::with_capacity(1024);
    out.push_str(&format!("SIMULATED MATCHUPS for {team}\n\n"));
    out.push_str(&format!(
        "{:>6}  {:<14}{:>9}  {}\n",
        "Period", "Opponent", "Cats", "Result"
    ));

    for result in results {
        let tally = format!("{}-{}-{}", result.wins, result.losses, result.ties);
        out.push_str(&format!(
            "{:>6}  {:<14}{:>9}  {:<4}{}\n",
            result.period,
            result.opponent,
            tally,
            result.outcome.label(),
            if result.scheduled { "  *" } else { "" },
        ));
    }

    out.push_str(&format!(
        "\nRecord: {won}-{lost}-{tied} across {} simulated matchups",
        results.len()
    ));
    if results.iter().any(|r| r.scheduled) {
        out.push_str("  (* scheduled opponent)");
    }
    out.push('\n');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
