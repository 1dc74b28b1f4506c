use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::performance::RepTargets;
use crate::metrics::targets::{PerformanceThresholds, DEFAULT_THRESHOLDS};

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub business: BusinessRules,
    pub targets: RepTargets,
    pub logging: LoggingConfig,
}

/// Business constants that vary per jurisdiction or commercial agreement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusinessRules {
    /// Fraction of net revenue added as VAT; gross / (1 + vat_rate) = net.
    pub vat_rate: Decimal,
    pub operating_expense_rate: Decimal,
    /// Flat delivery cost per lead sold.
    pub lead_fulfillment_unit_cost: Decimal,
    /// Stand-in for days remaining on orders without a deadline.
    pub no_deadline_days: i64,
    pub completion_weight: f64,
    pub thresholds: PerformanceThresholds,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            vat_rate: Decimal::new(20, 2),
            operating_expense_rate: Decimal::new(20, 2),
            lead_fulfillment_unit_cost: Decimal::from(20),
            no_deadline_days: 999,
            completion_weight: 1000.0,
            thresholds: DEFAULT_THRESHOLDS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub vat_rate: Option<Decimal>,
    pub no_deadline_days: Option<i64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("leadportal.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(business) = patch.business {
            if let Some(vat_rate) = business.vat_rate {
                self.business.vat_rate = vat_rate;
            }
            if let Some(operating_expense_rate) = business.operating_expense_rate {
                self.business.operating_expense_rate = operating_expense_rate;
            }
            if let Some(unit_cost) = business.lead_fulfillment_unit_cost {
                self.business.lead_fulfillment_unit_cost = unit_cost;
            }
            if let Some(no_deadline_days) = business.no_deadline_days {
                self.business.no_deadline_days = no_deadline_days;
            }
            if let Some(completion_weight) = business.completion_weight {
                self.business.completion_weight = completion_weight;
            }
        }

        if let Some(thresholds) = patch.thresholds {
            if let Some(ahead_pct) = thresholds.ahead_pct {
                self.business.thresholds.ahead_pct = ahead_pct;
            }
            if let Some(on_track_pct) = thresholds.on_track_pct {
                self.business.thresholds.on_track_pct = on_track_pct;
            }
            if let Some(behind_pct) = thresholds.behind_pct {
                self.business.thresholds.behind_pct = behind_pct;
            }
        }

        if let Some(targets) = patch.targets {
            if let Some(daily_calls) = targets.daily_calls {
                self.targets.daily_calls = daily_calls;
            }
            if let Some(daily_hours) = targets.daily_hours {
                self.targets.daily_hours = daily_hours;
            }
            if let Some(daily_bookings) = targets.daily_bookings {
                self.targets.daily_bookings = daily_bookings;
            }
            if let Some(daily_pipeline) = targets.daily_pipeline {
                self.targets.daily_pipeline = daily_pipeline;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("LEADPORTAL_VAT_RATE") {
            self.business.vat_rate = parse_decimal("LEADPORTAL_VAT_RATE", &value)?;
        }
        if let Some(value) = read_env("LEADPORTAL_OPERATING_EXPENSE_RATE") {
            self.business.operating_expense_rate =
                parse_decimal("LEADPORTAL_OPERATING_EXPENSE_RATE", &value)?;
        }
        if let Some(value) = read_env("LEADPORTAL_LEAD_FULFILLMENT_UNIT_COST") {
            self.business.lead_fulfillment_unit_cost =
                parse_decimal("LEADPORTAL_LEAD_FULFILLMENT_UNIT_COST", &value)?;
        }
        if let Some(value) = read_env("LEADPORTAL_NO_DEADLINE_DAYS") {
            self.business.no_deadline_days = parse_i64("LEADPORTAL_NO_DEADLINE_DAYS", &value)?;
        }
        if let Some(value) = read_env("LEADPORTAL_COMPLETION_WEIGHT") {
            self.business.completion_weight = parse_f64("LEADPORTAL_COMPLETION_WEIGHT", &value)?;
        }

        if let Some(value) = read_env("LEADPORTAL_TARGET_DAILY_CALLS") {
            self.targets.daily_calls = parse_f64("LEADPORTAL_TARGET_DAILY_CALLS", &value)?;
        }
        if let Some(value) = read_env("LEADPORTAL_TARGET_DAILY_HOURS") {
            self.targets.daily_hours = parse_f64("LEADPORTAL_TARGET_DAILY_HOURS", &value)?;
        }
        if let Some(value) = read_env("LEADPORTAL_TARGET_DAILY_BOOKINGS") {
            self.targets.daily_bookings = parse_f64("LEADPORTAL_TARGET_DAILY_BOOKINGS", &value)?;
        }
        if let Some(value) = read_env("LEADPORTAL_TARGET_DAILY_PIPELINE") {
            self.targets.daily_pipeline = parse_f64("LEADPORTAL_TARGET_DAILY_PIPELINE", &value)?;
        }

        let log_level =
            read_env("LEADPORTAL_LOGGING_LEVEL").or_else(|| read_env("LEADPORTAL_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("LEADPORTAL_LOGGING_FORMAT").or_else(|| read_env("LEADPORTAL_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(vat_rate) = overrides.vat_rate {
            self.business.vat_rate = vat_rate;
        }
        if let Some(no_deadline_days) = overrides.no_deadline_days {
            self.business.no_deadline_days = no_deadline_days;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_business(&self.business)?;
        validate_targets(&self.targets)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// The file [`AppConfig::load`] reads: `explicit_path` when it exists, else
/// `leadportal.toml`, else `config/leadportal.toml`.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("leadportal.toml"), PathBuf::from("config/leadportal.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_business(business: &BusinessRules) -> Result<(), ConfigError> {
    let rate_in_range = |rate: Decimal| rate >= Decimal::ZERO && rate < Decimal::ONE;

    if !rate_in_range(business.vat_rate) {
        return Err(ConfigError::Validation(
            "business.vat_rate must be in range 0..1 (0.20 means 20%)".to_string(),
        ));
    }

    if !rate_in_range(business.operating_expense_rate) {
        return Err(ConfigError::Validation(
            "business.operating_expense_rate must be in range 0..1".to_string(),
        ));
    }

    if business.lead_fulfillment_unit_cost < Decimal::ZERO {
        return Err(ConfigError::Validation(
            "business.lead_fulfillment_unit_cost must not be negative".to_string(),
        ));
    }

    if !(business.completion_weight.is_finite() && business.completion_weight > 0.0) {
        return Err(ConfigError::Validation(
            "business.completion_weight must be greater than zero".to_string(),
        ));
    }

    let PerformanceThresholds { ahead_pct, on_track_pct, behind_pct } = business.thresholds;
    let descending = ahead_pct > on_track_pct && on_track_pct > behind_pct && behind_pct > 0.0;
    if !descending {
        return Err(ConfigError::Validation(
            "thresholds must satisfy ahead_pct > on_track_pct > behind_pct > 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_targets(targets: &RepTargets) -> Result<(), ConfigError> {
    let fields = [
        ("targets.daily_calls", targets.daily_calls),
        ("targets.daily_hours", targets.daily_hours),
        ("targets.daily_bookings", targets.daily_bookings),
        ("targets.daily_pipeline", targets.daily_pipeline),
    ];

    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!("{name} must be zero or greater")));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

/// Environment value as the loader sees it; blank values count as unset.
pub fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn invalid_override(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

fn parse_i64(key: &str, value: &str) -> Result<i64, ConfigError> {
    value.trim().parse::<i64>().map_err(|_| invalid_override(key, value))
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| invalid_override(key, value))
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim()).map_err(|_| invalid_override(key, value))
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    business: Option<BusinessPatch>,
    thresholds: Option<ThresholdsPatch>,
    targets: Option<TargetsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct BusinessPatch {
    vat_rate: Option<Decimal>,
    operating_expense_rate: Option<Decimal>,
    lead_fulfillment_unit_cost: Option<Decimal>,
    no_deadline_days: Option<i64>,
    completion_weight: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ThresholdsPatch {
    ahead_pct: Option<f64>,
    on_track_pct: Option<f64>,
    behind_pct: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct TargetsPatch {
    daily_calls: Option<f64>,
    daily_hours: Option<f64>,
    daily_bookings: Option<f64>,
    daily_pipeline: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
