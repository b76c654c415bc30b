use crate::submit::DEFAULT_SUBMIT_URL;
use clap::Parser;
use common::{ConfigError, GameConfig};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Could not read game config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid game config {path}: {source}")]
    Invalid { path: PathBuf, source: ConfigError },
}

/// Giant squid bingo game server
#[derive(Parser, Debug)]
#[command(name = "squid-bingo")]
#[command(about = "Bingo game server that plays until the last board wins", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to bind to
    #[arg(short, long, default_value = "8000")]
    pub port: u16,

    /// Game data: JSON (`.json`) or the puzzle text format. Uses the classic game if omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Delay between automatic draws
    #[arg(long, default_value = "50")]
    pub auto_draw_interval_ms: u64,

    /// Delay before the final score is revealed
    #[arg(long, default_value = "1500")]
    pub score_delay_ms: u64,

    /// Endpoint that receives submitted scores
    #[arg(long, default_value = DEFAULT_SUBMIT_URL)]
    pub submit_url: String,

    /// Directory for the rolling log files
    #[arg(long, default_value = "./logs")]
    pub log_dir: PathBuf,
}

impl Cli {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn auto_draw_interval(&self) -> Duration {
        Duration::from_millis(self.auto_draw_interval_ms)
    }

    pub fn score_delay(&self) -> Duration {
        Duration::from_millis(self.score_delay_ms)
    }

    pub fn load_config(&self) -> Result<GameConfig, ConfigLoadError> {
        let Some(path) = &self.config else {
            return Ok(GameConfig::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let is_json = path.extension().map_or(false, |ext| ext == "json");
        let config = if is_json {
            GameConfig::from_json(&contents)
        } else {
            contents.parse()
        };
        config.map_err(|source| ConfigLoadError::Invalid {
            path: path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["squid-bingo"]);
        assert_eq!(cli.address(), "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(cli.auto_draw_interval(), Duration::from_millis(50));
        assert_eq!(cli.score_delay(), Duration::from_millis(1500));
        assert_eq!(cli.submit_url, DEFAULT_SUBMIT_URL);
        assert_eq!(cli.load_config().unwrap(), GameConfig::default());
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::parse_from(["squid-bingo", "--config", "/nonexistent/game.json"]);
        assert!(matches!(cli.load_config(), Err(ConfigLoadError::Io { .. })));
    }

    #[test]
    fn test_load_json_config() {
        let path = std::env::temp_dir().join(format!("squid-bingo-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"draws": [1, 2], "boards": [[[1, 2]]]}"#).unwrap();
        let cli = Cli::parse_from(["squid-bingo", "-c", path.to_str().unwrap(), "-p", "9000"]);
        let config = cli.load_config().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.draws().get(), &[1, 2]);
        assert_eq!(cli.port, 9000);
    }
}
