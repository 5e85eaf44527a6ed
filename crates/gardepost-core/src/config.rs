use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

// Domain constants — shared by the scheduler and the radius resolver.
/// Local hour of day every publication slot lands on.
pub const PUBLICATION_HOUR: u32 = 6;
/// Hour the generation start date is pinned to before any date math.
pub const GENERATION_START_HOUR: u32 = 8;
/// Hard ceiling for the duty-roster search radius.
pub const MAX_RADIUS_KM: u32 = 35;
/// Search radius used when a pharmacy does not specify one.
pub const DEFAULT_RADIUS_KM: u32 = 1;

/// Top-level config (gardepost.toml + GARDEPOST_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GardepostConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub duty_feed: DutyFeedConfig,
    #[serde(default)]
    pub facebook: FacebookConfig,
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Duty-roster feed endpoints (dataset JSON + formatted PDF report).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyFeedConfig {
    #[serde(default = "default_duty_base_url")]
    pub base_url: String,
    /// Language tag passed to the report endpoint.
    #[serde(default = "default_report_language")]
    pub report_language: String,
}

impl Default for DutyFeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_duty_base_url(),
            report_language: default_report_language(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacebookConfig {
    #[serde(default = "default_graph_url")]
    pub graph_url: String,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            graph_url: default_graph_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_geocode_url")]
    pub base_url: String,
    pub api_key: String,
}

/// Where fetched PDFs and rasterized PNGs are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_pdf_dir")]
    pub pdf_dir: String,
    #[serde(default = "default_png_dir")]
    pub png_dir: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            pdf_dir: default_pdf_dir(),
            png_dir: default_png_dir(),
        }
    }
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.gardepost/gardepost.db", home)
}
fn default_duty_base_url() -> String {
    "https://www.pharmagarde.be".to_string()
}
fn default_report_language() -> String {
    "FR".to_string()
}
fn default_graph_url() -> String {
    "https://graph.facebook.com/v19.0".to_string()
}
fn default_geocode_url() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}
fn default_pdf_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.gardepost/tmp/pdfs", home)
}
fn default_png_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.gardepost/tmp/pngs", home)
}

impl GardepostConfig {
    /// Load config from a TOML file with GARDEPOST_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.gardepost/gardepost.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: GardepostConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("GARDEPOST_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.gardepost/gardepost.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_everything_but_the_geocoding_key() {
        let config: GardepostConfig = serde_json::from_value(serde_json::json!({
            "geocoding": { "api_key": "test-key" }
        }))
        .unwrap();

        assert!(config.database.path.ends_with("gardepost.db"));
        assert_eq!(config.duty_feed.report_language, "FR");
        assert_eq!(config.facebook.graph_url, "https://graph.facebook.com/v19.0");
        assert_eq!(config.geocoding.api_key, "test-key");
        assert!(config.artifacts.pdf_dir.ends_with("pdfs"));
    }
}
