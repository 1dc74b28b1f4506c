use std::fs;
use std::path::Path;

use leadportal_core::config::{read_env, resolve_config_path, AppConfig};
use serde::Serialize;
use toml::Value;

use crate::commands::{load_config, CommandResult};

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match load_config("config") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let entries: Vec<ConfigEntry> = effective_values(&config)
        .into_iter()
        .map(|(key, env_keys, value)| ConfigEntry {
            key,
            value,
            source: field_source(
                key,
                env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        })
        .collect();

    CommandResult::success(
        "config",
        "effective config (source precedence: env > file > default)",
        entries,
    )
}

type EffectiveValue = (&'static str, &'static [&'static str], String);

/// Env keys are listed in the order the loader consults them.
fn effective_values(config: &AppConfig) -> Vec<EffectiveValue> {
    let business = &config.business;
    let targets = &config.targets;

    vec![
        entry("business.vat_rate", &["LEADPORTAL_VAT_RATE"], business.vat_rate.to_string()),
        entry(
            "business.operating_expense_rate",
            &["LEADPORTAL_OPERATING_EXPENSE_RATE"],
            business.operating_expense_rate.to_string(),
        ),
        entry(
            "business.lead_fulfillment_unit_cost",
            &["LEADPORTAL_LEAD_FULFILLMENT_UNIT_COST"],
            business.lead_fulfillment_unit_cost.to_string(),
        ),
        entry(
            "business.no_deadline_days",
            &["LEADPORTAL_NO_DEADLINE_DAYS"],
            business.no_deadline_days.to_string(),
        ),
        entry(
            "business.completion_weight",
            &["LEADPORTAL_COMPLETION_WEIGHT"],
            business.completion_weight.to_string(),
        ),
        entry("thresholds.ahead_pct", &[], business.thresholds.ahead_pct.to_string()),
        entry("thresholds.on_track_pct", &[], business.thresholds.on_track_pct.to_string()),
        entry("thresholds.behind_pct", &[], business.thresholds.behind_pct.to_string()),
        entry(
            "targets.daily_calls",
            &["LEADPORTAL_TARGET_DAILY_CALLS"],
            targets.daily_calls.to_string(),
        ),
        entry(
            "targets.daily_hours",
            &["LEADPORTAL_TARGET_DAILY_HOURS"],
            targets.daily_hours.to_string(),
        ),
        entry(
            "targets.daily_bookings",
            &["LEADPORTAL_TARGET_DAILY_BOOKINGS"],
            targets.daily_bookings.to_string(),
        ),
        entry(
            "targets.daily_pipeline",
            &["LEADPORTAL_TARGET_DAILY_PIPELINE"],
            targets.daily_pipeline.to_string(),
        ),
        entry(
            "logging.level",
            &["LEADPORTAL_LOGGING_LEVEL", "LEADPORTAL_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        entry(
            "logging.format",
            &["LEADPORTAL_LOGGING_FORMAT", "LEADPORTAL_LOG_FORMAT"],
            format!("{:?}", config.logging.format),
        ),
    ]
}

fn entry(key: &'static str, env_keys: &'static [&'static str], value: String) -> EffectiveValue {
    (key, env_keys, value)
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| read_env(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::contains_path;

    #[test]
    fn dotted_paths_are_resolved_through_tables() {
        let doc = "[business]\nvat_rate = 0.2\n".parse::<Value>().expect("valid toml");
        assert!(contains_path(&doc, "business.vat_rate"));
        assert!(!contains_path(&doc, "business.completion_weight"));
        assert!(!contains_path(&doc, "targets.daily_calls"));
    }
}
