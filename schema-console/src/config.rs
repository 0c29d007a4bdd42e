//! Console configuration
//!
//! Read from the environment, with defaults matching a service running locally.

use crate::layout::{Direction, LayoutOptions, DEFAULT_NODE_GAP, DEFAULT_RANK_GAP};
use crate::{Error, Result};

pub const SERVICE_URL_VARIABLE: &str = "SCHEMA_CONSOLE_SERVICE_URL";
pub const DIRECTION_VARIABLE: &str = "SCHEMA_CONSOLE_LAYOUT_DIRECTION";
pub const NODE_GAP_VARIABLE: &str = "SCHEMA_CONSOLE_NODE_GAP";
pub const RANK_GAP_VARIABLE: &str = "SCHEMA_CONSOLE_RANK_GAP";

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5001";

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Root URL of the schema and query services
    pub service_url: String,
    pub direction: Direction,
    pub node_gap: f64,
    pub rank_gap: f64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            direction: Direction::default(),
            node_gap: DEFAULT_NODE_GAP,
            rank_gap: DEFAULT_RANK_GAP,
        }
    }
}

impl ConsoleConfig {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names
    ///
    /// Unset or blank variables fall back to defaults; present but invalid
    /// values are rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let service_url = value(SERVICE_URL_VARIABLE)
            .map(|url| url.trim().to_string())
            .unwrap_or(defaults.service_url);

        let direction = match value(DIRECTION_VARIABLE) {
            Some(raw) => raw.parse()?,
            None => defaults.direction,
        };

        let node_gap = parse_gap(NODE_GAP_VARIABLE, value(NODE_GAP_VARIABLE))?.unwrap_or(defaults.node_gap);
        let rank_gap = parse_gap(RANK_GAP_VARIABLE, value(RANK_GAP_VARIABLE))?.unwrap_or(defaults.rank_gap);

        Ok(Self {
            service_url,
            direction,
            node_gap,
            rank_gap,
        })
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            direction: self.direction,
            node_gap: self.node_gap,
            rank_gap: self.rank_gap,
        }
    }
}

fn parse_gap(name: &str, raw: Option<String>) -> Result<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(gap) if gap.is_finite() && gap >= 0.0 => Ok(Some(gap)),
        _ => Err(Error::Config(format!(
            "{} must be a non-negative number, got '{}'",
            name, raw
        ))),
    }
}
