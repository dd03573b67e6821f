//! `chatrelay check` — Validate configuration without connecting.

use std::path::Path;

use chatrelay_config::AppConfig;
use chatrelay_core::error::ConfigurationError;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("ChatRelay — Configuration Check");
    println!("===============================\n");

    let path = super::config_path(config_path);
    if !path.exists() {
        println!("  ⚠️  No config file at {} — run `chatrelay init`", path.display());
    }

    let config = super::load_config(config_path).map_err(|e| {
        println!("  ❌ Config file invalid: {e}");
        e
    })?;
    println!("  ✅ Host settings valid (port {})", config.host.port);

    let results = check_models(&config);
    if results.is_empty() {
        println!("  ⚠️  No models configured");
    }

    let mut issues = 0;
    for (identity, result) in &results {
        match result {
            Ok(()) => println!("  ✅ {identity}"),
            Err(e) => {
                println!("  ❌ {identity}: {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
        Ok(())
    } else {
        Err(format!("{issues} model(s) have invalid configuration").into())
    }
}

/// Validate each model the way registration would.
pub fn check_models(config: &AppConfig) -> Vec<(String, Result<(), ConfigurationError>)> {
    config
        .descriptors()
        .into_iter()
        .map(|model| {
            let mut effective = model.config;
            effective.absorb_defaults(&config.defaults);
            (model.identity, effective.validate().map(|_| ()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_core::model::AdapterConfig;

    #[test]
    fn reports_each_model() {
        let mut config = AppConfig::default();
        config.models.insert(
            "good".into(),
            AdapterConfig {
                host: Some("irc.libera.chat".into()),
                nick: Some("bot".into()),
                channel: Some("#sailsjs".into()),
                ..AdapterConfig::default()
            },
        );
        config.models.insert(
            "nochannel".into(),
            AdapterConfig {
                host: Some("irc.libera.chat".into()),
                nick: Some("bot".into()),
                ..AdapterConfig::default()
            },
        );

        let results = check_models(&config);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], ("good".to_string(), Ok(())));
        assert_eq!(
            results[1],
            ("nochannel".to_string(), Err(ConfigurationError::MissingChannel))
        );
    }
}
