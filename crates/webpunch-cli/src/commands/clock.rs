use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use webpunch_browser::{PunchClient, PunchKind};
use webpunch_core::CredentialStore;

pub fn execute(store: CredentialStore, kind: PunchKind) -> Result<()> {
    let client = PunchClient::new(store);
    if !client.is_configured() {
        anyhow::bail!("webpunch is not configured. Run `webpunch config set` first.");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    tracing::info!("starting {}", kind.as_str());
    let spinner = make_spinner(&format!("Performing {}...", kind.as_str()));

    let succeeded = runtime.block_on(async { run(&client, kind).await });

    // Drop the runtime promptly so a lingering browser handler task can't hang us.
    runtime.shutdown_timeout(Duration::from_millis(100));

    if succeeded {
        spinner.finish_with_message(format!("{} recorded", kind.as_str()));
        println!("✅ {} succeeded", kind.as_str());
        Ok(())
    } else {
        spinner.finish_and_clear();
        anyhow::bail!(
            "{} failed - check the configuration and the log",
            kind.as_str()
        )
    }
}

async fn run(client: &PunchClient, kind: PunchKind) -> bool {
    match kind {
        PunchKind::ClockIn => client.clock_in().await,
        PunchKind::ClockOut => client.clock_out().await,
    }
}

fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or(ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
