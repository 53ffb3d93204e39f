//! Caller-facing API for the tray app / scheduler / CLI.

use crate::flow::{self, PunchKind};
use crate::session::BrowserSession;
use webpunch_core::{CredentialStore, LocatorMap};

/// Performs punch operations against the configured portal.
///
/// Credentials and options are re-read from the store on every operation so
/// live settings edits take effect without a restart. Locators are cached at
/// construction and refreshed only by [`reload_locators`](Self::reload_locators).
///
/// At most one punch should be in flight at a time; that is the caller's
/// contract, the client does not coordinate concurrent invocations.
pub struct PunchClient {
    store: CredentialStore,
    selectors: LocatorMap,
}

impl PunchClient {
    pub fn new(store: CredentialStore) -> Self {
        let selectors = store.load().selectors;
        Self { store, selectors }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_configured()
    }

    /// Re-read the locator map after a settings edit.
    pub fn reload_locators(&mut self) {
        self.selectors = self.store.load().selectors;
        tracing::debug!("locator map reloaded");
    }

    pub async fn clock_in(&self) -> bool {
        self.punch(PunchKind::ClockIn).await
    }

    pub async fn clock_out(&self) -> bool {
        self.punch(PunchKind::ClockOut).await
    }

    /// Log in and out again without punching, to validate the settings.
    pub async fn test_login(&self) -> bool {
        let config = self.store.load();
        let session = match BrowserSession::open(config.advanced.headless_mode).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("browser launch failed: {}", e);
                return false;
            }
        };
        flow::run_login_check(&session, &config, &self.selectors).await
    }

    async fn punch(&self, kind: PunchKind) -> bool {
        // Fresh snapshot per attempt: settings edits between punches apply.
        let config = self.store.load();

        let session = match BrowserSession::open(config.advanced.headless_mode).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("browser launch failed: {}", e);
                return false;
            }
        };

        flow::run_punch(&session, &config, &self.selectors, kind).await
    }
}
