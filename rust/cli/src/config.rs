//! Layered simulator configuration.
//!
//! Values are resolved from built-in defaults, then the TOML file named by
//! `LIAR_CONFIG`, then `LIAR_*` environment variables. Command-line flags are
//! applied on top by each command through [`ConfigResolved::override_with`].

use liar_ai::BotKind;
use liar_engine::rules::{MAX_PLAYERS, MIN_PLAYERS};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub players: usize,
    /// Empty means every seat plays `random`.
    pub bots: Vec<String>,
    pub seed: Option<u64>,
    pub games: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Cli,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub players: ValueSource,
    pub bots: ValueSource,
    pub seed: ValueSource,
    pub games: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            players: ValueSource::Default,
            bots: ValueSource::Default,
            seed: ValueSource::Default,
            games: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            players: 4,
            bots: Vec::new(),
            seed: None,
            games: 1,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("LIAR_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
        if let Some(v) = f.bots {
            cfg.bots = v;
            sources.bots = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.games {
            cfg.games = v;
            sources.games = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("LIAR_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(players) = std::env::var("LIAR_PLAYERS")
        && !players.is_empty()
    {
        cfg.players = players
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid players".into()))?;
        sources.players = ValueSource::Env;
    }
    if let Ok(bots) = std::env::var("LIAR_BOTS")
        && !bots.is_empty()
    {
        cfg.bots = split_list(&bots);
        sources.bots = ValueSource::Env;
    }
    if let Ok(games) = std::env::var("LIAR_GAMES")
        && !games.is_empty()
    {
        cfg.games = games
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid games".into()))?;
        sources.games = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

impl ConfigResolved {
    /// Apply command-line values, which win over every other layer.
    pub fn override_with(
        mut self,
        players: Option<usize>,
        bots: &[String],
        seed: Option<u64>,
        games: Option<u32>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = players {
            self.config.players = v;
            self.sources.players = ValueSource::Cli;
        }
        if !bots.is_empty() {
            self.config.bots = bots.to_vec();
            self.sources.bots = ValueSource::Cli;
        }
        if let Some(v) = seed {
            self.config.seed = Some(v);
            self.sources.seed = ValueSource::Cli;
        }
        if let Some(v) = games {
            self.config.games = v;
            self.sources.games = ValueSource::Cli;
        }
        validate(&self.config)?;
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    players: Option<usize>,
    #[serde(default)]
    bots: Option<Vec<String>>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    games: Option<u32>,
}

fn split_list(s: &str) -> Vec<String> {
    s.split([',', ' '])
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&cfg.players) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: players must be between {} and {}",
            MIN_PLAYERS, MAX_PLAYERS
        )));
    }
    if cfg.games == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: games must be >=1".into(),
        ));
    }
    for bot in &cfg.bots {
        bot.parse::<BotKind>()
            .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(config: Config) -> ConfigResolved {
        ConfigResolved {
            config,
            sources: ConfigSources::default(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn rejects_out_of_range_players() {
        let cfg = Config {
            players: 7,
            ..Config::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_unknown_bot_names() {
        let cfg = Config {
            bots: vec!["random".into(), "psychic".into()],
            ..Config::default()
        };
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("psychic"));
    }

    #[test]
    fn command_line_values_win() {
        let r = resolved(Config::default())
            .override_with(Some(3), &["heuristic".to_string()], Some(7), None)
            .unwrap();
        assert_eq!(r.config.players, 3);
        assert_eq!(r.config.bots, vec!["heuristic"]);
        assert_eq!(r.config.seed, Some(7));
        assert_eq!(r.config.games, 1);
        assert_eq!(r.sources.players, ValueSource::Cli);
        assert_eq!(r.sources.games, ValueSource::Default);
    }

    #[test]
    fn command_line_values_are_validated() {
        let err = resolved(Config::default())
            .override_with(None, &[], None, Some(0))
            .unwrap_err();
        assert!(err.to_string().contains("games"));
    }

    #[test]
    fn bot_lists_split_on_commas_and_spaces() {
        assert_eq!(
            split_list("random, heuristic  random"),
            vec!["random", "heuristic", "random"]
        );
    }
}
