mod cipher;
mod key;
mod machine;

pub use cipher::{decrypt, encrypt};
pub use key::EncryptionKey;
pub use machine::{MachineIdentity, SystemIdentity};

#[cfg(test)]
pub(crate) use machine::FixedIdentity;
