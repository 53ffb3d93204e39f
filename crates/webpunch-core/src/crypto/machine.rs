//! Machine-unique identifier used to bind the encryption key to this host.

/// Source of a machine-unique identifier.
///
/// Kept behind a trait so the store can be tested with a fixed identifier
/// and so a missing platform source degrades gracefully instead of failing.
pub trait MachineIdentity {
    /// A stable identifier for this machine, or `None` when unavailable.
    fn identifier(&self) -> Option<String>;
}

/// Reads the platform's native machine id.
pub struct SystemIdentity;

impl MachineIdentity for SystemIdentity {
    #[cfg(target_os = "linux")]
    fn identifier(&self) -> Option<String> {
        for path in ["/etc/machine-id", "/var/lib/dbus/machine-id"] {
            if let Ok(contents) = std::fs::read_to_string(path) {
                let id = contents.trim();
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
        }
        None
    }

    #[cfg(target_os = "macos")]
    fn identifier(&self) -> Option<String> {
        let output = std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
            .ok()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        // Line looks like: "IOPlatformUUID" = "XXXXXXXX-...."
        let line = stdout.lines().find(|l| l.contains("IOPlatformUUID"))?;
        let uuid = line.split('"').nth(3)?;
        if uuid.is_empty() {
            None
        } else {
            Some(uuid.to_string())
        }
    }

    #[cfg(target_os = "windows")]
    fn identifier(&self) -> Option<String> {
        let output = std::process::Command::new("reg")
            .args([
                "query",
                r"HKLM\SOFTWARE\Microsoft\Cryptography",
                "/v",
                "MachineGuid",
            ])
            .output()
            .ok()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout.lines().find(|l| l.contains("MachineGuid"))?;
        let guid = line.split_whitespace().last()?;
        if guid.is_empty() {
            None
        } else {
            Some(guid.to_string())
        }
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    fn identifier(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
pub(crate) struct FixedIdentity(pub &'static str);

#[cfg(test)]
impl MachineIdentity for FixedIdentity {
    fn identifier(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}

#[cfg(test)]
pub(crate) struct NoIdentity;

#[cfg(test)]
impl MachineIdentity for NoIdentity {
    fn identifier(&self) -> Option<String> {
        None
    }
}
