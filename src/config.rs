// Configuration loading and parsing (config/league.toml).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// A tracked statistical category. Declaration order is the canonical
/// column order wherever no explicit order is configured.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FgPct,
    FtPct,
    Threes,
    Rebounds,
    Assists,
    Steals,
    Turnovers,
    Blocks,
    Points,
}

impl Category {
    /// Short column label for report output.
    pub fn label(self) -> &'static str {
        match self {
            Category::FgPct => "FG%",
            Category::FtPct => "FT%",
            Category::Threes => "3PM",
            Category::Rebounds => "REB",
            Category::Assists => "AST",
            Category::Steals => "STL",
            Category::Turnovers => "TO",
            Category::Blocks => "BLK",
            Category::Points => "PTS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which players form the standardization population for season ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationScope {
    /// Every player in the snapshot (rostered and free agents).
    #[default]
    All,
    /// Rostered players only; free agents are dropped before standardizing.
    Rostered,
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub scoring: ScoringConfig,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    league: LeagueConfig,
    scoring: ScoringConfig,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Total auction budget across the league, in dollars.
    pub league_budget: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Categories that count toward ranking, in report column order.
    pub tracked_categories: Vec<Category>,
    /// Categories excluded from the punt-adjusted composite.
    #[serde(default)]
    pub punted_categories: Vec<Category>,
    /// Categories where a lower raw value is better.
    #[serde(default)]
    pub invert_categories: Vec<Category>,
    #[serde(default)]
    pub population_scope: PopulationScope,
}

impl ScoringConfig {
    pub fn is_punted(&self, category: Category) -> bool {
        self.punted_categories.contains(&category)
    }

    pub fn is_inverted(&self, category: Category) -> bool {
        self.invert_categories.contains(&category)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub roster: String,
    pub record: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` for the common current-directory case.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let league_text = read_file(&league_path)?;
    let file: ConfigFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    let config = Config {
        league: file.league,
        scoring: file.scoring,
        data_paths: file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&path, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", path.display(), target.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory. Run `ensure_config_files` first on a fresh checkout.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.league_budget == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.league_budget".into(),
            message: "must be greater than 0".into(),
        });
    }

    let scoring = &config.scoring;
    if scoring.tracked_categories.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "scoring.tracked_categories".into(),
            message: "must list at least one category".into(),
        });
    }

    for (i, cat) in scoring.tracked_categories.iter().enumerate() {
        if scoring.tracked_categories[..i].contains(cat) {
            return Err(ConfigError::ValidationError {
                field: "scoring.tracked_categories".into(),
                message: format!("category {cat} listed more than once"),
            });
        }
    }

    // Punted and inverted categories must be a subset of the tracked list.
    for cat in &scoring.punted_categories {
        if !scoring.tracked_categories.contains(cat) {
            return Err(ConfigError::ValidationError {
                field: "scoring.punted_categories".into(),
                message: format!("category {cat} is not tracked"),
            });
        }
    }
    for cat in &scoring.invert_categories {
        if !scoring.tracked_categories.contains(cat) {
            return Err(ConfigError::ValidationError {
                field: "scoring.invert_categories".into(),
                message: format!("category {cat} is not tracked"),
            });
        }
    }

    if config.data_paths.roster.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.roster".into(),
            message: "must not be empty".into(),
        });
    }
    if config.data_paths.record.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.record".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VALID_LEAGUE_TOML: &str = r#"
[league]
name = "For Keeps"
league_budget = 2000

[scoring]
tracked_categories = [
    "fg_pct", "ft_pct", "threes", "rebounds", "assists",
    "steals", "turnovers", "blocks", "points",
]
punted_categories = ["threes", "points"]
invert_categories = ["turnovers"]
population_scope = "all"

[data_paths]
roster = "data/roster.csv"
record = "data/record.csv"
"#;

    /// Helper: create a temp base dir with the given league.toml content
    /// under config/.
    fn write_config(dir_name: &str, league_toml: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(dir_name);
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("league.toml"), league_toml).unwrap();
        tmp
    }

    #[test]
    fn load_valid_config() {
        let tmp = write_config("hoopsight_config_valid", VALID_LEAGUE_TOML);
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.league.name, "For Keeps");
        assert_eq!(config.league.league_budget, 2000);
        assert_eq!(config.scoring.tracked_categories.len(), 9);
        assert_eq!(config.scoring.tracked_categories[0], Category::FgPct);
        assert_eq!(
            config.scoring.punted_categories,
            vec![Category::Threes, Category::Points]
        );
        assert_eq!(config.scoring.invert_categories, vec![Category::Turnovers]);
        assert_eq!(config.scoring.population_scope, PopulationScope::All);
        assert_eq!(config.data_paths.roster, "data/roster.csv");
        assert_eq!(config.data_paths.record, "data/record.csv");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn load_project_default_config() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let tmp = std::env::temp_dir().join("hoopsight_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            root.join("defaults/league.toml"),
            tmp.join("defaults/league.toml"),
        )
        .unwrap();

        let copied = ensure_config_files(&tmp).expect("should copy default config");
        assert_eq!(copied.len(), 1);

        let config = load_config_from(&tmp).expect("shipped defaults should validate");
        assert!(!config.scoring.tracked_categories.is_empty());
        assert!(config.league.league_budget > 0);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn punted_and_inverted_helpers() {
        let tmp = write_config("hoopsight_config_helpers", VALID_LEAGUE_TOML);
        let config = load_config_from(&tmp).unwrap();

        assert!(config.scoring.is_punted(Category::Threes));
        assert!(!config.scoring.is_punted(Category::Rebounds));
        assert!(config.scoring.is_inverted(Category::Turnovers));
        assert!(!config.scoring.is_inverted(Category::Points));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn population_scope_defaults_to_all() {
        let toml_text = VALID_LEAGUE_TOML.replace("population_scope = \"all\"\n", "");
        let tmp = write_config("hoopsight_config_scope_default", &toml_text);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.scoring.population_scope, PopulationScope::All);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_league_budget_zero() {
        let toml_text = VALID_LEAGUE_TOML.replace("league_budget = 2000", "league_budget = 0");
        let tmp = write_config("hoopsight_config_budget_zero", &toml_text);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "league.league_budget");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_tracked_categories() {
        let toml_text = r#"
[league]
name = "Test"
league_budget = 2000

[scoring]
tracked_categories = []

[data_paths]
roster = "data/roster.csv"
record = "data/record.csv"
"#;
        let tmp = write_config("hoopsight_config_empty_tracked", toml_text);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "scoring.tracked_categories");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_duplicate_tracked_category() {
        let toml_text = VALID_LEAGUE_TOML.replace(
            "\"fg_pct\", \"ft_pct\",",
            "\"fg_pct\", \"fg_pct\",",
        );
        let tmp = write_config("hoopsight_config_dup_tracked", &toml_text);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, message } => {
                assert_eq!(field, "scoring.tracked_categories");
                assert!(message.contains("more than once"), "message: {message}");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_punted_category_not_tracked() {
        let toml_text = VALID_LEAGUE_TOML.replace(
            "tracked_categories = [\n    \"fg_pct\", \"ft_pct\", \"threes\", \"rebounds\", \"assists\",\n    \"steals\", \"turnovers\", \"blocks\", \"points\",\n]",
            "tracked_categories = [\"rebounds\", \"assists\"]",
        );
        let tmp = write_config("hoopsight_config_punt_untracked", &toml_text);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "scoring.punted_categories");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_inverted_category_not_tracked() {
        let toml_text = r#"
[league]
name = "Test"
league_budget = 2000

[scoring]
tracked_categories = ["rebounds", "assists"]
invert_categories = ["turnovers"]

[data_paths]
roster = "data/roster.csv"
record = "data/record.csv"
"#;
        let tmp = write_config("hoopsight_config_invert_untracked", toml_text);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "scoring.invert_categories");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_category_name() {
        let toml_text = VALID_LEAGUE_TOML.replace("\"rebounds\"", "\"dunks\"");
        let tmp = write_config("hoopsight_config_unknown_cat", &toml_text);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with("league.toml"));
            }
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = std::env::temp_dir().join("hoopsight_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with("league.toml"));
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = write_config("hoopsight_config_invalid", "this is not valid [[[ toml");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with("league.toml"));
            }
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("hoopsight_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join("league.toml"), VALID_LEAGUE_TOML).unwrap();
        // Example files should NOT be copied.
        fs::write(defaults_dir.join("league.toml.example"), "# template\n").unwrap();

        assert!(!tmp.join("config").exists());

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/league.toml").exists());
        assert!(!tmp.join("config/league.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("hoopsight_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(defaults_dir.join("league.toml"), VALID_LEAGUE_TOML).unwrap();
        fs::write(config_dir.join("league.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());

        let content = fs::read_to_string(config_dir.join("league.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("hoopsight_ensure_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
