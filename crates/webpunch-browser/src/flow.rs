//! Login and punch sequences.
//!
//! Both flows are strictly sequential with no internal retries: one call is
//! one attempt, and rescheduling belongs to the caller. Expected failures are
//! values ([`FlowError`]), never panics, and the detailed reason only reaches
//! the log; the public boundary reduces everything to success/failure.

use std::time::Duration;
use thiserror::Error;

use crate::driver::{DriverError, PortalDriver};
use webpunch_core::{Config, LocatorMap, LocatorRole};

/// Bound for mandatory element waits (page landmarks, punch buttons,
/// completion proof).
pub const ELEMENT_WAIT: Duration = Duration::from_secs(10);

/// Shorter speculative bound for the optional confirmation dialog. Sites
/// without one should not cost a full wait.
pub const CONFIRM_WAIT: Duration = Duration::from_secs(5);

/// Why a login or punch attempt failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("configuration is incomplete (url, user id and password are required)")]
    IncompleteConfig,

    #[error("timed out waiting for element '{}'", .0.as_str())]
    WaitTimeout(LocatorRole),

    #[error("element '{}' not found", .0.as_str())]
    NotFound(LocatorRole),

    #[error("completion signal did not appear within the timeout")]
    VerificationTimeout,

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

fn step_error(err: DriverError, role: LocatorRole) -> FlowError {
    match err {
        DriverError::Timeout => FlowError::WaitTimeout(role),
        DriverError::NotFound => FlowError::NotFound(role),
        DriverError::Other(message) => FlowError::Unexpected(message),
    }
}

/// Which punch action to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchKind {
    ClockIn,
    ClockOut,
}

impl PunchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PunchKind::ClockIn => "clock-in",
            PunchKind::ClockOut => "clock-out",
        }
    }

    fn button_role(&self) -> LocatorRole {
        match self {
            PunchKind::ClockIn => LocatorRole::ClockInButton,
            PunchKind::ClockOut => LocatorRole::ClockOutButton,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginState {
    NotStarted,
    PageLoaded,
    IdEntered,
    PasswordEntered,
    LoginSubmitted,
    Verified,
}

fn advance(state: &mut LoginState, next: LoginState) {
    tracing::debug!(from = ?state, to = ?next, "login state transition");
    *state = next;
}

/// Authenticate against the configured portal form.
///
/// The `dakoku_panel` landmark doubles as the login-success signal; its
/// absence covers both bad credentials and bad locator configuration, which
/// the automation cannot tell apart.
pub async fn login<D>(driver: &D, config: &Config, locators: &LocatorMap) -> Result<(), FlowError>
where
    D: PortalDriver + ?Sized,
{
    let mut state = LoginState::NotStarted;

    if !config.is_complete() {
        tracing::warn!("login aborted: configuration incomplete");
        return Err(FlowError::IncompleteConfig);
    }

    driver
        .goto(&config.url)
        .await
        .map_err(|e| FlowError::Unexpected(e.to_string()))?;
    advance(&mut state, LoginState::PageLoaded);

    let id_field = locators.get(LocatorRole::UserIdInput);
    driver
        .wait_for(id_field, ELEMENT_WAIT)
        .await
        .map_err(|e| step_error(e, LocatorRole::UserIdInput))?;
    driver
        .fill(id_field, &config.user_id)
        .await
        .map_err(|e| step_error(e, LocatorRole::UserIdInput))?;
    advance(&mut state, LoginState::IdEntered);

    // The password field is expected on the same page; no wait-retry here.
    driver
        .fill(locators.get(LocatorRole::PasswordInput), &config.password)
        .await
        .map_err(|e| step_error(e, LocatorRole::PasswordInput))?;
    advance(&mut state, LoginState::PasswordEntered);

    driver
        .click(locators.get(LocatorRole::LoginButton))
        .await
        .map_err(|e| step_error(e, LocatorRole::LoginButton))?;
    advance(&mut state, LoginState::LoginSubmitted);

    match driver
        .wait_for(locators.get(LocatorRole::DakokuPanel), ELEMENT_WAIT)
        .await
    {
        Ok(()) => {
            advance(&mut state, LoginState::Verified);
            tracing::info!("login verified");
            Ok(())
        }
        Err(DriverError::Timeout) | Err(DriverError::NotFound) => {
            tracing::warn!("login verification landmark did not appear");
            Err(FlowError::VerificationTimeout)
        }
        Err(e) => Err(FlowError::Unexpected(e.to_string())),
    }
}

/// Perform one punch action end-to-end (login included).
pub async fn punch<D>(
    driver: &D,
    config: &Config,
    locators: &LocatorMap,
    kind: PunchKind,
) -> Result<(), FlowError>
where
    D: PortalDriver + ?Sized,
{
    login(driver, config, locators).await?;

    let button = kind.button_role();
    let button_id = locators.get(button);
    driver
        .wait_clickable(button_id, ELEMENT_WAIT)
        .await
        .map_err(|e| step_error(e, button))?;
    driver
        .click(button_id)
        .await
        .map_err(|e| step_error(e, button))?;
    tracing::debug!("{} button clicked", kind.as_str());

    // Confirmation dialogs are site-dependent; absence is not an error.
    let confirm_id = locators.get(LocatorRole::ConfirmButton);
    match driver.wait_clickable(confirm_id, CONFIRM_WAIT).await {
        Ok(()) => {
            driver
                .click(confirm_id)
                .await
                .map_err(|e| step_error(e, LocatorRole::ConfirmButton))?;
            tracing::debug!("confirmation dialog accepted");
        }
        Err(DriverError::Timeout) | Err(DriverError::NotFound) => {
            tracing::debug!("no confirmation dialog, continuing");
        }
        Err(DriverError::Other(message)) => return Err(FlowError::Unexpected(message)),
    }

    match driver
        .wait_for(locators.get(LocatorRole::SuccessMessage), ELEMENT_WAIT)
        .await
    {
        Ok(()) => {
            tracing::info!("{} punch confirmed by portal", kind.as_str());
            Ok(())
        }
        Err(DriverError::Timeout) | Err(DriverError::NotFound) => {
            tracing::warn!("{} punch not confirmed: success message missing", kind.as_str());
            Err(FlowError::VerificationTimeout)
        }
        Err(e) => Err(FlowError::Unexpected(e.to_string())),
    }
}

/// Run a punch and guarantee the session is torn down on every exit path.
pub async fn run_punch<D>(
    driver: &D,
    config: &Config,
    locators: &LocatorMap,
    kind: PunchKind,
) -> bool
where
    D: PortalDriver + ?Sized,
{
    let outcome = punch(driver, config, locators, kind).await;
    driver.close().await;
    match outcome {
        Ok(()) => {
            tracing::info!("{} completed", kind.as_str());
            true
        }
        Err(e) => {
            tracing::warn!("{} failed: {}", kind.as_str(), e);
            false
        }
    }
}

/// Run a login only (settings-dialog connection test), with guaranteed
/// teardown.
pub async fn run_login_check<D>(driver: &D, config: &Config, locators: &LocatorMap) -> bool
where
    D: PortalDriver + ?Sized,
{
    let outcome = login(driver, config, locators).await;
    driver.close().await;
    match outcome {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("login check failed: {}", e);
            false
        }
    }
}
