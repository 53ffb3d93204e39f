mod chrome_finder;
mod client;
mod driver;
mod error;
mod flow;
mod session;

pub use chrome_finder::ChromeFinder;
pub use client::PunchClient;
pub use driver::{DriverError, PortalDriver, StepResult};
pub use error::{Error, Result};
pub use flow::{login, punch, run_login_check, run_punch, FlowError, PunchKind};
pub use flow::{CONFIRM_WAIT, ELEMENT_WAIT};
pub use session::BrowserSession;
