use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;
use crate::i18n::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// Loading refuses the config
    Error,
    /// Logged, config still used
    Warning,
}

/// One problem found in a config value, keyed by its dotted path.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub field: String,
    pub message: String,
    pub level: IssueLevel,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.field, self.message)
    }
}

/// Everything `Config::validate` found.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub issues: Vec<ConfigIssue>,
}

impl ValidationReport {
    fn push(&mut self, level: IssueLevel, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ConfigIssue {
            field: field.into(),
            message: message.into(),
            level,
        });
    }

    pub fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(IssueLevel::Error, field, message);
    }

    pub fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(IssueLevel::Warning, field, message);
    }

    pub fn errors(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.level == IssueLevel::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.level == IssueLevel::Warning)
    }

    /// No errors; warnings are allowed
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// All errors on one line
    pub fn summary(&self) -> String {
        self.errors()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml and the saved preferences
    pub config_dir: PathBuf,

    /// Forecast and geocoding endpoints plus the default farm location
    #[serde(default)]
    pub weather: WeatherConfig,

    /// IP-geolocation providers
    #[serde(default)]
    pub location: LocationConfig,
}

/// Where the weather panel looks when the device location is unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Country label shown after the place name, per language
    pub country_en: String,
    pub country_vi: String,
}

impl DefaultLocation {
    pub fn country_label(&self, language: Language) -> &str {
        language.pick(&self.country_en, &self.country_vi)
    }
}

impl Default for DefaultLocation {
    fn default() -> Self {
        // An Giang province, Mekong Delta
        Self {
            name: "An Giang".to_string(),
            latitude: 10.3759,
            longitude: 105.4185,
            country_en: "Vietnam".to_string(),
            country_vi: "Việt Nam".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Open-Meteo geocoding endpoint used for coordinate lookups
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Per-request timeout. Unset means requests wait until they settle.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub default_location: DefaultLocation,
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            geocoding_url: default_geocoding_url(),
            request_timeout_secs: None,
            default_location: DefaultLocation::default(),
        }
    }
}

/// Response layout of an IP-geolocation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoProviderKind {
    /// ipapi.co: numeric coordinates, `country_name`
    IpApi,
    /// get.geojs.io: string coordinates, `country`
    GeoJs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoProviderConfig {
    pub kind: GeoProviderKind,
    pub url: String,
}

impl GeoProviderConfig {
    pub fn new(kind: GeoProviderKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Tried in order; the first usable record wins
    #[serde(default = "default_providers")]
    pub providers: Vec<GeoProviderConfig>,
}

fn default_providers() -> Vec<GeoProviderConfig> {
    vec![
        GeoProviderConfig::new(GeoProviderKind::IpApi, "https://ipapi.co/json/"),
        GeoProviderConfig::new(GeoProviderKind::GeoJs, "https://get.geojs.io/v1/ip/geo.json"),
    ]
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: dirs::config_dir()
                .map(|dir| dir.join("mekong"))
                .unwrap_or_else(|| PathBuf::from(".mekong")),
            weather: WeatherConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the platform config directory
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`. A missing file is created with defaults whose
    /// `config_dir` is the file's directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut config = Self::default();
            if let Some(dir) = path.parent() {
                config.config_dir = dir.to_path_buf();
            }
            config.save_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&contents).map_err(|e| {
            ConfigError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load and validate; errors reject the config, warnings are logged.
    pub fn load_validated() -> Result<(Self, ValidationReport)> {
        let config = Self::load()?;
        let report = config.validate();

        if !report.is_valid() {
            return Err(ConfigError::Invalid(report.summary()).into());
        }
        for warning in report.warnings() {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, report))
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        check_url(&mut report, "weather.forecast_url", &self.weather.forecast_url);
        check_url(&mut report, "weather.geocoding_url", &self.weather.geocoding_url);

        let home = &self.weather.default_location;
        if home.name.trim().is_empty() {
            report.error("weather.default_location.name", "must not be empty");
        }
        if !(-90.0..=90.0).contains(&home.latitude) {
            report.error(
                "weather.default_location.latitude",
                format!("{} is outside -90..=90", home.latitude),
            );
        }
        if !(-180.0..=180.0).contains(&home.longitude) {
            report.error(
                "weather.default_location.longitude",
                format!("{} is outside -180..=180", home.longitude),
            );
        }

        match self.weather.request_timeout_secs {
            Some(0) => report.error(
                "weather.request_timeout_secs",
                "must be at least 1; remove it to wait indefinitely",
            ),
            Some(secs) if secs > 300 => {
                report.warn("weather.request_timeout_secs", "longer than five minutes")
            }
            _ => {}
        }

        if self.location.providers.is_empty() {
            report.warn(
                "location.providers",
                "empty; weather always uses the default location",
            );
        }
        for (i, provider) in self.location.providers.iter().enumerate() {
            check_url(&mut report, &format!("location.providers[{}].url", i), &provider.url);
        }

        report
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("No platform config directory")?;
        Ok(base.join("mekong").join("config.toml"))
    }
}

/// Endpoints must be absolute http(s) URLs with a host; plain http is only a warning.
fn check_url(report: &mut ValidationReport, field: &str, value: &str) {
    let url = match Url::parse(value) {
        Ok(url) => url,
        Err(e) => {
            report.error(field, format!("not a URL: {}", e));
            return;
        }
    };

    match url.scheme() {
        "https" => {}
        "http" => report.warn(field, "uses plain http"),
        other => report.error(field, format!("scheme must be http or https, got {}", other)),
    }
    if url.host().is_none() {
        report.error(field, "has no host");
    }
}
