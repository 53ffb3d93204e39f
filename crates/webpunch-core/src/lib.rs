pub mod config;
pub mod crypto;
pub mod error;
pub mod locator;
pub mod store;

pub use config::{AdvancedOptions, AutoEnd, Config};
pub use error::{Error, Result};
pub use locator::{LocatorMap, LocatorRole};
pub use store::CredentialStore;
