use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use console::{style, Term};

use crate::commands::status::mask_password;
use crate::OutputFormat;
use webpunch_core::{AdvancedOptions, CredentialStore, LocatorRole};

/// Everything `config set` may change. Unset fields keep their stored value.
pub struct SetOptions {
    pub url: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<String>,
    pub prompt_password: bool,
    pub selectors: Vec<String>,
    pub auto_end: Option<String>,
    pub no_auto_end: bool,
    pub headless: bool,
    pub no_headless: bool,
}

pub fn set(store: &CredentialStore, options: SetOptions) -> Result<()> {
    let mut config = store.load();

    if let Some(url) = options.url {
        url::Url::parse(&url).with_context(|| format!("invalid URL '{}'", url))?;
        config.url = url;
    }
    if let Some(user_id) = options.user_id {
        config.user_id = user_id;
    }
    if let Some(password) = options.password {
        config.password = password;
    } else if options.prompt_password {
        let term = Term::stderr();
        term.write_str("Portal password: ")?;
        config.password = term.read_secure_line()?;
    }

    for pair in &options.selectors {
        let (role, id) = parse_selector(pair)?;
        config.selectors.set(role, &id);
    }

    if let Some(time) = options.auto_end {
        NaiveTime::parse_from_str(&time, "%H:%M")
            .map_err(|_| anyhow::anyhow!("invalid --auto-end time '{}', expected HH:MM", time))?;
        config.advanced.auto_end.enabled = true;
        config.advanced.auto_end.time = time;
    } else if options.no_auto_end {
        config.advanced.auto_end.enabled = false;
    }

    if options.headless {
        config.advanced.headless_mode = true;
    } else if options.no_headless {
        config.advanced.headless_mode = false;
    }

    let saved = store.save(
        &config.url,
        &config.user_id,
        &config.password,
        config.selectors,
        Some(config.advanced),
    );
    if !saved {
        anyhow::bail!("could not save configuration to {}", store.config_path().display());
    }

    println!("✅ Configuration saved to {}", store.config_path().display());
    if !store.is_configured() {
        println!("⚠️  Configuration is still incomplete (URL, user id and password are required)");
    }
    Ok(())
}

pub fn show(store: &CredentialStore, format: OutputFormat) -> Result<()> {
    let config = store.load();

    match format {
        OutputFormat::Pretty => {
            println!("{}", style("stored configuration").bold());
            println!();
            println!("  url:       {}", config.url);
            println!("  user_id:   {}", config.user_id);
            println!("  password:  {}", mask_password(&config.password));
            println!("  headless:  {}", config.advanced.headless_mode);
            println!(
                "  auto_end:  enabled={} time={}",
                config.advanced.auto_end.enabled, config.advanced.auto_end.time
            );
            println!();
            println!("  selectors:");
            for role in LocatorRole::ALL {
                println!("    {:<16} {}", role.as_str(), config.selectors.get(role));
            }
        }
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "url": config.url,
                "user_id": config.user_id,
                "password": mask_password(&config.password),
                "selectors": LocatorRole::ALL
                    .iter()
                    .map(|role| {
                        (
                            role.as_str().to_string(),
                            serde_json::Value::from(config.selectors.get(*role)),
                        )
                    })
                    .collect::<serde_json::Map<String, serde_json::Value>>(),
                "advanced": {
                    "headless_mode": config.advanced.headless_mode,
                    "auto_end": {
                        "enabled": config.advanced.auto_end.enabled,
                        "time": config.advanced.auto_end.time,
                    },
                },
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}

pub fn reset(store: &CredentialStore, yes: bool) -> Result<()> {
    if !yes {
        let term = Term::stderr();
        term.write_str("Delete the stored configuration? [y/N] ")?;
        let answer = term.read_line()?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if store.reset() {
        println!("✅ Configuration deleted");
        Ok(())
    } else {
        anyhow::bail!("could not delete {}", store.config_path().display())
    }
}

fn parse_selector(pair: &str) -> Result<(LocatorRole, String)> {
    let (role, id) = pair
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("invalid --selector '{}', expected ROLE=ID", pair))?;
    let role = LocatorRole::from_str(role.trim())
        .map_err(|e| anyhow::anyhow!("invalid --selector '{}': {}", pair, e))?;
    Ok((role, id.trim().to_string()))
}
