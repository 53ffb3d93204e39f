//! Encryption key lifecycle.
//!
//! The key is loaded from `key.bin` next to the config file when present;
//! otherwise it is derived from the machine identifier with PBKDF2 and
//! persisted there. Obtaining a key never fails: when no machine identifier
//! is available the key is derived from a fixed fallback constant, which
//! keeps the store usable at reduced security.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use std::path::Path;
use zeroize::Zeroizing;

use crate::crypto::machine::MachineIdentity;

const KEY_LEN: usize = 32;
const PBKDF2_ROUNDS: u32 = 100_000;
const FIXED_SALT: &[u8] = b"webpunch.credential-store.v1";
const FALLBACK_IDENTIFIER: &str = "webpunch-shared-fallback-key";

/// Name of the key file stored alongside the config document.
pub const KEY_FILE: &str = "key.bin";

/// A 256-bit key for the password cipher. Zeroed on drop.
pub struct EncryptionKey(Zeroizing<[u8; KEY_LEN]>);

impl EncryptionKey {
    /// Load or derive the key for a store directory.
    pub fn obtain(dir: &Path, identity: &dyn MachineIdentity) -> Self {
        let key_path = dir.join(KEY_FILE);

        if let Ok(bytes) = std::fs::read(&key_path) {
            if bytes.len() == KEY_LEN {
                let mut key = [0u8; KEY_LEN];
                key.copy_from_slice(&bytes);
                tracing::debug!("loaded encryption key from {}", key_path.display());
                return Self(Zeroizing::new(key));
            }
            tracing::warn!(
                "key file {} has unexpected length {}, re-deriving",
                key_path.display(),
                bytes.len()
            );
        }

        let key = match identity.identifier() {
            Some(id) => Self::derive(&id),
            None => {
                tracing::warn!(
                    "no machine identifier available; using fallback key (degraded security)"
                );
                Self::derive(FALLBACK_IDENTIFIER)
            }
        };

        // Persisting is best-effort: derivation is deterministic, so a failed
        // write only costs time on the next load.
        if let Err(e) = std::fs::write(&key_path, key.bytes()) {
            tracing::warn!("could not persist key file {}: {}", key_path.display(), e);
        }

        key
    }

    fn derive(source: &str) -> Self {
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(source.as_bytes(), FIXED_SALT, PBKDF2_ROUNDS, &mut key);
        Self(Zeroizing::new(key))
    }

    pub fn bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}
