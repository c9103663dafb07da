use clap::{Parser, ValueEnum};

use crate::feeds::{BALLDONTLIE_TEAMS, ESPN_NBA_SCOREBOARD};

/// Where the day's slate comes from.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// ESPN scoreboard, falling back through any configured proxies
    Espn,
    /// Embedded full-data sample slate (offline)
    Sample,
}

/// NBA pick analytics service
#[derive(Parser, Debug, Clone)]
#[command(name = "pickpulse", version, about)]
pub struct Config {
    /// Slate source
    #[arg(long, env = "PICKPULSE_SOURCE", value_enum, default_value = "espn")]
    pub source: Source,

    /// ESPN scoreboard URL
    #[arg(long, env = "ESPN_URL", default_value = ESPN_NBA_SCOREBOARD)]
    pub espn_url: String,

    /// Pass-through proxy prefix, tried in order after the direct request
    /// (e.g. https://proxy.example/raw?url=). Repeat for several proxies.
    #[arg(long = "proxy-url", env = "PROXY_URLS", value_delimiter = ',')]
    pub proxy_urls: Vec<String>,

    /// Team directory URL
    #[arg(long, env = "TEAMS_URL", default_value = BALLDONTLIE_TEAMS)]
    pub teams_url: String,

    /// Deadline for each individual source attempt, in seconds
    #[arg(long, env = "SOURCE_TIMEOUT_SECS", default_value = "8")]
    pub source_timeout_secs: u64,

    /// How often the slate is re-fetched and re-analyzed, in seconds
    #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value = "300")]
    pub refresh_interval_secs: u64,

    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// Default stake used for parlay payouts (USD)
    #[arg(long, env = "WAGER", default_value = "10.0")]
    pub wager: f64,

    /// Analyze once, print the pick board as JSON and exit
    #[arg(long, default_value = "false")]
    pub once: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.source_timeout_secs == 0 {
            anyhow::bail!("source_timeout_secs must be at least 1");
        }
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be at least 1");
        }
        if !self.wager.is_finite() || self.wager < 0.0 {
            anyhow::bail!("wager must be a non-negative amount");
        }
        for url in std::iter::once(&self.espn_url)
            .chain(&self.proxy_urls)
            .chain(std::iter::once(&self.teams_url))
        {
            if let Err(e) = url::Url::parse(url) {
                anyhow::bail!("invalid URL '{}': {}", url, e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["pickpulse"]);
        assert_eq!(config.source, Source::Espn);
        assert_eq!(config.espn_url, ESPN_NBA_SCOREBOARD);
        assert!(config.proxy_urls.is_empty());
        assert_eq!(config.source_timeout_secs, 8);
        assert_eq!(config.refresh_interval_secs, 300);
        assert_eq!(config.dashboard_addr, "0.0.0.0:8080");
        assert!(!config.once);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_repeated_proxies_keep_order() {
        let config = Config::parse_from([
            "pickpulse",
            "--proxy-url",
            "https://a.example/?url=",
            "--proxy-url",
            "https://b.example/raw?url=",
        ]);
        assert_eq!(
            config.proxy_urls,
            vec!["https://a.example/?url=", "https://b.example/raw?url="]
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config::parse_from(["pickpulse", "--source-timeout-secs", "0"]);
        assert!(config.validate().is_err());

        let config = Config::parse_from(["pickpulse", "--wager=-5"]);
        assert!(config.validate().is_err());

        let config = Config::parse_from(["pickpulse", "--proxy-url", "not a url"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_source() {
        let config = Config::parse_from(["pickpulse", "--source", "sample", "--once"]);
        assert_eq!(config.source, Source::Sample);
        assert!(config.once);
    }
}
