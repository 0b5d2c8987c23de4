use std::{fmt::Write, path::Path, str::FromStr};

use anyhow::bail;
use serde::Deserialize;
use serde_dynamic_string::DynamicString;
use toml::Value;

use crate::Config;

/// Fields which are dropped instead of failing the load when they cannot be expanded.
const OPTIONAL_FIELDS: &[&str] = &["relay.completion.api_key"];

pub(crate) struct ExpansionError {
    pub(crate) path: String,
    pub(crate) message: String,
}

pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let path = path.as_ref().to_path_buf();
    let content = std::fs::read_to_string(&path)?;
    let raw_config: Value = toml::from_str(&content)?;

    let (config, ignored) = load_from_value(raw_config)?;

    for ExpansionError { path, message } in ignored {
        log::warn!("Ignoring '{path}': {message}");
    }

    Ok(config)
}

/// Expands, deserializes and validates the raw configuration.
///
/// Returns the optional fields that were dropped next to the configuration.
pub(crate) fn load_from_value(mut raw_config: Value) -> anyhow::Result<(Config, Vec<ExpansionError>)> {
    let mut ignored = Vec::new();

    loop {
        let Err(err) = expand_dynamic_strings(&mut Vec::new(), &mut raw_config) else {
            break;
        };

        if !OPTIONAL_FIELDS.contains(&err.path.as_str()) {
            bail!("Failed to expand dynamic string at path '{}': {}", err.path, err.message);
        }

        remove_field(&mut raw_config, &err.path);
        ignored.push(err);
    }

    let config = Config::deserialize(raw_config)?;
    validate(&config)?;

    Ok((config, ignored))
}

pub(crate) fn validate(config: &Config) -> anyhow::Result<()> {
    if !config.relay.path.starts_with('/') {
        bail!("relay.path must start with '/', got '{}'", config.relay.path);
    }

    let prefix = &config.gateway.proxy.prefix;

    if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
        bail!("gateway.proxy.prefix must look like '/segment', got '{prefix}'");
    }

    if config.relay.intent.keywords.iter().any(|keyword| keyword.trim().is_empty()) {
        bail!("relay.intent.keywords must not contain blank entries");
    }

    config.relay.health.validate("relay", &[&*config.relay.path])?;

    let prefix_root = format!("{prefix}/");
    config.gateway.health.validate("gateway", &[&**prefix, prefix_root.as_str()])?;

    Ok(())
}

fn remove_field(config: &mut Value, path: &str) {
    let mut parts: Vec<&str> = path.split('.').collect();

    let Some(last) = parts.pop() else {
        return;
    };

    let mut current = config;

    for part in parts {
        match current.as_table_mut().and_then(|table| table.get_mut(part)) {
            Some(value) => current = value,
            None => return,
        }
    }

    if let Some(table) = current.as_table_mut() {
        table.remove(last);
    }
}

fn expand_dynamic_strings<'a>(
    path: &mut Vec<Result<&'a str, usize>>,
    value: &'a mut Value,
) -> Result<(), ExpansionError> {
    match value {
        Value::String(s) => match DynamicString::<String>::from_str(s) {
            Ok(out) => *s = out.into_inner(),
            Err(err) => {
                let mut p = String::new();

                for segment in path.iter() {
                    match segment {
                        Ok(s) => {
                            p.push_str(s);
                            p.push('.');
                        }
                        Err(i) => {
                            let _ = write!(p, "[{i}]");
                        }
                    }
                }

                if p.ends_with('.') {
                    p.pop();
                }

                return Err(ExpansionError {
                    path: p,
                    message: err.to_string(),
                });
            }
        },
        Value::Array(values) => {
            for (i, value) in values.iter_mut().enumerate() {
                path.push(Err(i));
                expand_dynamic_strings(path, value)?;
                path.pop();
            }
        }
        Value::Table(map) => {
            for (key, value) in map {
                path.push(Ok(key.as_str()));
                expand_dynamic_strings(path, value)?;
                path.pop();
            }
        }
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::Datetime(_) => (),
    }

    Ok(())
}
