use anyhow::Result;
use std::time::Duration;

use webpunch_browser::PunchClient;
use webpunch_core::CredentialStore;

/// Log in with the saved settings and tear the browser down again.
pub fn execute(store: CredentialStore) -> Result<()> {
    let client = PunchClient::new(store);
    if !client.is_configured() {
        anyhow::bail!("webpunch is not configured. Run `webpunch config set` first.");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    println!("🔐 Testing portal login...");
    let succeeded = runtime.block_on(async { client.test_login().await });

    runtime.shutdown_timeout(Duration::from_millis(100));

    if succeeded {
        println!("✅ Login succeeded");
        Ok(())
    } else {
        anyhow::bail!("login failed - check the configuration and the log")
    }
}
