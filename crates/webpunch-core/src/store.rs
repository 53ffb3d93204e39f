//! Encrypted on-disk credential/config store.
//!
//! One JSON document plus a key file, exclusively owned by this type. Every
//! operation is synchronous file I/O against the same directory; failures are
//! logged and reduced to "behave as if unset" so callers never see a fault.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use crate::config::{AdvancedOptions, Config};
use crate::crypto::{self, EncryptionKey, MachineIdentity, SystemIdentity};
use crate::locator::LocatorMap;

/// Name of the config document inside the store directory.
pub const CONFIG_FILE: &str = "config.json";

const DEFAULT_DIR: &str = ".webpunch";

pub struct CredentialStore {
    dir: PathBuf,
    key: EncryptionKey,
}

impl CredentialStore {
    /// Open the store in the user's home directory (`~/.webpunch`).
    pub fn open_default() -> Self {
        let dir = dirs::home_dir()
            .map(|home| home.join(DEFAULT_DIR))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR));
        Self::open(dir)
    }

    /// Open the store in an explicit directory, creating it if needed.
    pub fn open(dir: PathBuf) -> Self {
        Self::with_identity(dir, &SystemIdentity)
    }

    /// Open with a caller-supplied machine identity source.
    pub fn with_identity(dir: PathBuf, identity: &dyn MachineIdentity) -> Self {
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!("could not create store directory {}: {}", dir.display(), e);
        }
        let key = EncryptionKey::obtain(&dir, identity);
        Self { dir, key }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Read the current configuration.
    ///
    /// A missing, unreadable, or unparsable document yields the empty
    /// default configuration. A password that fails to decrypt is replaced
    /// with the empty string; callers treat that as "not configured".
    pub fn load(&self) -> Config {
        let path = self.config_path();
        if !path.exists() {
            return Config::default();
        }

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("could not open {}: {}", path.display(), e);
                return Config::default();
            }
        };

        let mut config: Config = match serde_json::from_reader(BufReader::new(file)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("could not parse {}: {}", path.display(), e);
                return Config::default();
            }
        };

        if !config.password.is_empty() {
            match crypto::decrypt(self.key.bytes(), &config.password) {
                Ok(plaintext) => config.password = plaintext,
                Err(e) => {
                    tracing::warn!("{}; treating password as unset", e);
                    config.password.clear();
                }
            }
        }

        config
    }

    /// Persist the configuration, encrypting a non-empty password.
    ///
    /// An empty password is stored as-is and marks the config incomplete.
    /// When `advanced` is `None` the previously stored options are kept.
    pub fn save(
        &self,
        url: &str,
        user_id: &str,
        password: &str,
        selectors: LocatorMap,
        advanced: Option<AdvancedOptions>,
    ) -> bool {
        let current = self.load();

        let stored_password = if password.is_empty() {
            String::new()
        } else {
            match crypto::encrypt(self.key.bytes(), password) {
                Ok(token) => token,
                Err(e) => {
                    tracing::warn!("could not encrypt password: {}", e);
                    return false;
                }
            }
        };

        let config = Config {
            url: url.to_string(),
            user_id: user_id.to_string(),
            password: stored_password,
            selectors,
            advanced: advanced.unwrap_or(current.advanced),
        };

        self.write(&config)
    }

    /// Rewrite only the locator section, keeping credentials and options.
    pub fn save_selectors(&self, selectors: LocatorMap) -> bool {
        let current = self.load();
        self.save(
            &current.url,
            &current.user_id,
            &current.password,
            selectors,
            Some(current.advanced),
        )
    }

    /// True iff url, user id and (decrypted) password are all present.
    pub fn is_configured(&self) -> bool {
        self.load().is_complete()
    }

    /// Delete the persisted configuration. Idempotent; the key file is kept
    /// so previously exported documents stay decryptable.
    pub fn reset(&self) -> bool {
        let path = self.config_path();
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("configuration reset ({})", path.display());
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                tracing::warn!("could not remove {}: {}", path.display(), e);
                false
            }
        }
    }

    fn write(&self, config: &Config) -> bool {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            tracing::warn!("could not create store directory {}: {}", self.dir.display(), e);
            return false;
        }

        let path = self.config_path();
        let file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("could not write {}: {}", path.display(), e);
                return false;
            }
        };

        match serde_json::to_writer_pretty(BufWriter::new(file), config) {
            Ok(()) => {
                tracing::debug!("configuration saved to {}", path.display());
                true
            }
            Err(e) => {
                tracing::warn!("could not serialize configuration: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::FixedIdentity;
    use crate::locator::LocatorRole;

    fn test_store(dir: &std::path::Path) -> CredentialStore {
        CredentialStore::with_identity(dir.to_path_buf(), &FixedIdentity("test-machine"))
    }

    #[test]
    fn test_save_load_round_trips_password_through_encryption() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        assert!(store.save(
            "https://portal.example.com",
            "emp042",
            "s3cret-p@ss",
            LocatorMap::default(),
            None,
        ));

        // On disk the password must be an opaque token, not the plaintext.
        let raw = std::fs::read_to_string(store.config_path()).unwrap();
        assert!(!raw.contains("s3cret-p@ss"));

        let config = store.load();
        assert_eq!(config.url, "https://portal.example.com");
        assert_eq!(config.user_id, "emp042");
        assert_eq!(config.password, "s3cret-p@ss");
        assert!(store.is_configured());
    }

    #[test]
    fn test_load_on_never_saved_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        assert_eq!(store.load(), Config::default());
        assert!(!store.is_configured());
    }

    #[test]
    fn test_is_configured_requires_each_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let cases = [
            ("", "emp042", "pw"),
            ("https://portal.example.com", "", "pw"),
            ("https://portal.example.com", "emp042", ""),
        ];
        for (url, user_id, password) in cases {
            assert!(store.save(url, user_id, password, LocatorMap::default(), None));
            assert!(!store.is_configured(), "({}, {}, {})", url, user_id, password);
        }

        assert!(store.save(
            "https://portal.example.com",
            "emp042",
            "pw",
            LocatorMap::default(),
            None,
        ));
        assert!(store.is_configured());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        // Absent file still succeeds.
        assert!(store.reset());

        store.save("u", "i", "p", LocatorMap::default(), None);
        assert!(store.reset());
        assert!(!store.is_configured());
        assert!(store.reset());
    }

    #[test]
    fn test_corrupted_password_token_reads_as_unset() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.save("https://portal.example.com", "emp042", "pw", LocatorMap::default(), None);

        // Corrupt the stored token in place.
        let mut config: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.config_path()).unwrap()).unwrap();
        config["password"] = serde_json::Value::String("AAAA not a valid token".to_string());
        std::fs::write(store.config_path(), config.to_string()).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.password, "");
        assert!(!store.is_configured());
    }

    #[test]
    fn test_unparsable_document_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        std::fs::write(store.config_path(), "{ not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn test_empty_password_is_stored_unencrypted() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.save("https://portal.example.com", "emp042", "", LocatorMap::default(), None);
        let raw = std::fs::read_to_string(store.config_path()).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["password"], "");
    }

    #[test]
    fn test_advanced_options_kept_unless_supplied() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let advanced = AdvancedOptions {
            headless_mode: false,
            ..AdvancedOptions::default()
        };
        store.save("u", "i", "p", LocatorMap::default(), Some(advanced.clone()));

        // Saving without advanced keeps the previous options.
        store.save("u2", "i2", "p2", LocatorMap::default(), None);
        assert_eq!(store.load().advanced, advanced);

        // Supplying advanced replaces them.
        store.save("u2", "i2", "p2", LocatorMap::default(), Some(AdvancedOptions::default()));
        assert!(store.load().advanced.headless_mode);
    }

    #[test]
    fn test_save_selectors_keeps_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.save("https://portal.example.com", "emp042", "pw", LocatorMap::default(), None);

        let mut selectors = LocatorMap::default();
        selectors.set(LocatorRole::LoginButton, "signin-btn");
        assert!(store.save_selectors(selectors));

        let config = store.load();
        assert_eq!(config.password, "pw");
        assert_eq!(config.selectors.get(LocatorRole::LoginButton), "signin-btn");
        assert!(store.is_configured());
    }

    #[test]
    fn test_live_edits_visible_on_next_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.save("https://a.example.com", "emp042", "pw", LocatorMap::default(), None);
        assert_eq!(store.load().url, "https://a.example.com");

        // A second writer against the same directory (settings editor).
        let editor = test_store(dir.path());
        editor.save("https://b.example.com", "emp042", "pw", LocatorMap::default(), None);

        assert_eq!(store.load().url, "https://b.example.com");
    }
}
