// Category analytics entry point.
//
// Startup sequence:
// 1. Initialize tracing (diagnostics to stderr, tables to stdout)
// 2. Parse the command line
// 3. Bootstrap config files, load and validate config
// 4. Load the roster and weekly record snapshots
// 5. Run the requested command and print its report

use hoopsight::analytics::records;
use hoopsight::analytics::{draft, matchup, strength, zscore};
use hoopsight::config;
use hoopsight::report;

use anyhow::Context;
use chrono::Local;
use tracing::{info, warn};

const USAGE: &str = "\
Usage: hoopsight <command> [args]

Commands:
  ratings                     Season z-score ratings for every player
  power <periods>             Power rankings over a period window
  strengths <team> <periods>  Per-period category strengths for one team
  h2h <team> <periods>        Simulated weekly matchups for one team

<periods> takes period numbers and N-M ranges, e.g. `1 3 5-8`.

Options:
  -h, --help                  Show this help text
";

#[derive(Debug)]
enum Command {
    Ratings,
    Power { periods: Vec<u32> },
    Strengths { team: String, periods: Vec<u32> },
    HeadToHead { team: String, periods: Vec<u32> },
}

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Parse the command line
    let command = parse_cli().map_err(|e| {
        eprintln!("{USAGE}");
        e
    })?;
    info!(?command, "starting up");

    // 3. Bootstrap and load config
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let copied = config::ensure_config_files(&cwd).context("failed to bootstrap config files")?;
    for path in &copied {
        info!("initialized config file {}", path.display());
    }
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "config loaded: league={}, {} tracked categories, ${} budget",
        config.league.name,
        config.scoring.tracked_categories.len(),
        config.league.league_budget
    );

    // 4. Load the data snapshot
    let snapshot = records::load_snapshot(&config).context("failed to load data snapshot")?;
    info!(
        "snapshot loaded: {} players, {} team-period records",
        snapshot.roster.len(),
        snapshot.record.len()
    );

    // 5. Run the command
    println!(
        "{} | generated {}",
        config.league.name,
        Local::now().format("%Y-%m-%d %H:%M")
    );
    println!();

    match command {
        Command::Ratings => {
            let mut ratings = zscore::compute_ratings(&snapshot.roster, &config.scoring)
                .context("rating computation failed")?;
            if let Err(e) = draft::apply_draft_values(&mut ratings, config.league.league_budget) {
                warn!("draft values unavailable: {}", e);
            }
            print!("{}", report::ratings_table(&ratings, &config.scoring));
        }
        Command::Power { periods } => {
            let entries = strength::power_rankings(&snapshot.record, &periods, &config.scoring)
                .context("power ranking computation failed")?;
            print!("{}", report::power_table(&entries));
        }
        Command::Strengths { team, periods } => {
            let strengths =
                strength::team_strengths(&snapshot.record, &team, &periods, &config.scoring)
                    .context("strength computation failed")?;
            print!("{}", report::strengths_table(&team, &strengths, &config.scoring));
        }
        Command::HeadToHead { team, periods } => {
            let results =
                matchup::simulate_matchups(&snapshot.record, &team, &periods, &config.scoring)
                    .context("matchup simulation failed")?;
            print!("{}", report::matchup_summary(&team, &results));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Command line parsing
// ---------------------------------------------------------------------------

fn parse_cli() -> anyhow::Result<Command> {
    let mut args = std::env::args().skip(1);

    let command = match args.next().as_deref() {
        Some("-h") | Some("--help") => {
            println!("{USAGE}");
            std::process::exit(0);
        }
        Some("ratings") => Command::Ratings,
        Some("power") => Command::Power {
            periods: parse_periods(args)?,
        },
        Some("strengths") => {
            let team = args.next().context("strengths needs a team name")?;
            Command::Strengths {
                team,
                periods: parse_periods(args)?,
            }
        }
        Some("h2h") => {
            let team = args.next().context("h2h needs a team name")?;
            Command::HeadToHead {
                team,
                periods: parse_periods(args)?,
            }
        }
        Some(other) => anyhow::bail!("unknown command `{other}`"),
        None => anyhow::bail!("no command given"),
    };

    Ok(command)
}

/// Parse the remaining arguments as a period window: plain numbers and
/// inclusive `N-M` ranges.
fn parse_periods(args: impl Iterator<Item = String>) -> anyhow::Result<Vec<u32>> {
    let mut periods = Vec::new();
    for arg in args {
        match arg.split_once('-') {
            Some((start, end)) => {
                let start: u32 = start
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid period range `{arg}`"))?;
                let end: u32 = end
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid period range `{arg}`"))?;
                anyhow::ensure!(start <= end, "period range `{arg}` runs backwards");
                periods.extend(start..=end);
            }
            None => periods.push(
                arg.trim()
                    .parse()
                    .with_context(|| format!("invalid period `{arg}`"))?,
            ),
        }
    }
    anyhow::ensure!(!periods.is_empty(), "no periods given");
    Ok(periods)
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hoopsight=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::parse_periods;

    fn parse(args: &[&str]) -> anyhow::Result<Vec<u32>> {
        parse_periods(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn plain_numbers() {
        assert_eq!(parse(&["1", "3", "2"]).unwrap(), vec![1, 3, 2]);
    }

    #[test]
    fn inclusive_ranges_expand() {
        assert_eq!(parse(&["5-8"]).unwrap(), vec![5, 6, 7, 8]);
        assert_eq!(parse(&["1", "3-4"]).unwrap(), vec![1, 3, 4]);
    }

    #[test]
    fn backwards_range_rejected() {
        assert!(parse(&["8-5"]).is_err());
    }

    #[test]
    fn junk_rejected() {
        assert!(parse(&["week1"]).is_err());
        assert!(parse(&["1-2-3"]).is_err());
        assert!(parse(&[]).is_err());
    }
}
