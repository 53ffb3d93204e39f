pub mod clock;
pub mod completion;
pub mod config;
pub mod status;
pub mod test_login;
