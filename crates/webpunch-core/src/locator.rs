use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical roles of the portal page elements the automation interacts with.
///
/// Every role maps to the `id` attribute of exactly one element on the
/// configured site. The stored identifier is user-editable; when no value is
/// stored the role's own name doubles as the default identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorRole {
    UserIdInput,
    PasswordInput,
    LoginButton,
    /// Post-login landmark whose presence proves authentication succeeded.
    DakokuPanel,
    ClockInButton,
    ClockOutButton,
    /// Optional confirmation dialog button; not every site shows one.
    ConfirmButton,
    SuccessMessage,
}

impl LocatorRole {
    pub const ALL: [LocatorRole; 8] = [
        LocatorRole::UserIdInput,
        LocatorRole::PasswordInput,
        LocatorRole::LoginButton,
        LocatorRole::DakokuPanel,
        LocatorRole::ClockInButton,
        LocatorRole::ClockOutButton,
        LocatorRole::ConfirmButton,
        LocatorRole::SuccessMessage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocatorRole::UserIdInput => "user_id_input",
            LocatorRole::PasswordInput => "password_input",
            LocatorRole::LoginButton => "login_button",
            LocatorRole::DakokuPanel => "dakoku_panel",
            LocatorRole::ClockInButton => "clock_in_button",
            LocatorRole::ClockOutButton => "clock_out_button",
            LocatorRole::ConfirmButton => "confirm_button",
            LocatorRole::SuccessMessage => "success_message",
        }
    }

    /// Fallback element identifier used when no override is stored.
    pub fn default_id(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for LocatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocatorRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        LocatorRole::ALL
            .iter()
            .find(|role| role.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown locator role: {}", s))
    }
}

/// User-editable mapping from locator roles to site-specific element ids.
///
/// Serialized as the `selectors` section of the config document. Missing or
/// empty entries resolve to the role's default identifier so a lookup key is
/// never empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorMap {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_button: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dakoku_panel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_in_button: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_out_button: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_button: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
}

impl LocatorMap {
    /// Resolve the effective element id for a role.
    pub fn get(&self, role: LocatorRole) -> &str {
        match self.slot(role) {
            Some(id) if !id.trim().is_empty() => id,
            _ => role.default_id(),
        }
    }

    /// Store an override for a role. An empty value clears the override.
    pub fn set(&mut self, role: LocatorRole, id: impl Into<String>) {
        let id = id.into();
        let slot = self.slot_mut(role);
        if id.trim().is_empty() {
            *slot = None;
        } else {
            *slot = Some(id);
        }
    }

    fn slot(&self, role: LocatorRole) -> Option<&String> {
        match role {
            LocatorRole::UserIdInput => self.user_id_input.as_ref(),
            LocatorRole::PasswordInput => self.password_input.as_ref(),
            LocatorRole::LoginButton => self.login_button.as_ref(),
            LocatorRole::DakokuPanel => self.dakoku_panel.as_ref(),
            LocatorRole::ClockInButton => self.clock_in_button.as_ref(),
            LocatorRole::ClockOutButton => self.clock_out_button.as_ref(),
            LocatorRole::ConfirmButton => self.confirm_button.as_ref(),
            LocatorRole::SuccessMessage => self.success_message.as_ref(),
        }
    }

    fn slot_mut(&mut self, role: LocatorRole) -> &mut Option<String> {
        match role {
            LocatorRole::UserIdInput => &mut self.user_id_input,
            LocatorRole::PasswordInput => &mut self.password_input,
            LocatorRole::LoginButton => &mut self.login_button,
            LocatorRole::DakokuPanel => &mut self.dakoku_panel,
            LocatorRole::ClockInButton => &mut self.clock_in_button,
            LocatorRole::ClockOutButton => &mut self.clock_out_button,
            LocatorRole::ConfirmButton => &mut self.confirm_button,
            LocatorRole::SuccessMessage => &mut self.success_message,
        }
    }
}
