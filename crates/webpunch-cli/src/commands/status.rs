use anyhow::Result;
use console::style;

use crate::OutputFormat;
use webpunch_core::{Config, CredentialStore};

pub fn execute(store: &CredentialStore, format: OutputFormat) -> Result<()> {
    let config = store.load();

    match format {
        OutputFormat::Pretty => print_pretty(store, &config),
        OutputFormat::Json => print_json(store, &config)?,
    }

    Ok(())
}

fn print_pretty(store: &CredentialStore, config: &Config) {
    let configured = config.is_complete();

    println!("{}", style("webpunch status").bold());
    println!();
    if configured {
        println!("  State:      {}", style("configured").green());
    } else {
        println!("  State:      {}", style("not configured").yellow());
    }
    println!("  Config:     {}", store.config_path().display());
    println!("  URL:        {}", display_or_unset(&config.url));
    println!("  User id:    {}", display_or_unset(&config.user_id));
    println!("  Password:   {}", mask_password(&config.password));
    println!(
        "  Headless:   {}",
        if config.advanced.headless_mode { "yes" } else { "no" }
    );
    if config.advanced.auto_end.enabled {
        println!("  Auto end:   {}", config.advanced.auto_end.time);
    } else {
        println!("  Auto end:   off");
    }

    if !configured {
        println!();
        println!("Run `webpunch config set` to finish setup.");
    }
}

fn print_json(store: &CredentialStore, config: &Config) -> Result<()> {
    let doc = serde_json::json!({
        "configured": config.is_complete(),
        "config_path": store.config_path(),
        "url": config.url,
        "user_id": config.user_id,
        "password_set": !config.password.is_empty(),
        "headless_mode": config.advanced.headless_mode,
        "auto_end": {
            "enabled": config.advanced.auto_end.enabled,
            "time": config.advanced.auto_end.time,
        },
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

pub(crate) fn mask_password(password: &str) -> &'static str {
    if password.is_empty() {
        "(not set)"
    } else {
        "********"
    }
}
