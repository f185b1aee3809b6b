//! Output buffer capacities.
//!
//! Every boundary call hands the callee fixed-size buffers. Their sizes live
//! in [`Capacities`], carried explicitly by a [`Boundary`](crate::Boundary).
//! A process-wide default can be installed once, before first use.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static GLOBAL: OnceLock<Capacities> = OnceLock::new();

/// Byte capacities of the caller-owned output buffers.
///
/// Missing fields deserialize to their defaults, so a host config file only
/// needs to name what it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capacities {
    /// Principal bytes.
    pub identifier: u32,
    /// Principal text, including its NUL terminator.
    pub text: u32,
    /// Diagnostic message, including its NUL terminator.
    pub diagnostic: u32,
    /// DER public key returned by signing.
    pub public_key: u32,
    /// Signature returned by signing.
    pub signature: u32,
}

impl Capacities {
    pub const DEFAULT: Self = Self {
        identifier: 32,
        text: 128,
        diagnostic: 256,
        public_key: 128,
        signature: 128,
    };

    pub fn with_identifier(mut self, identifier: u32) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn with_text(mut self, text: u32) -> Self {
        self.text = text;
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: u32) -> Self {
        self.diagnostic = diagnostic;
        self
    }

    pub fn with_public_key(mut self, public_key: u32) -> Self {
        self.public_key = public_key;
        self
    }

    pub fn with_signature(mut self, signature: u32) -> Self {
        self.signature = signature;
        self
    }

    /// Fix the process-wide capacities.
    ///
    /// Fails once the global value exists, including when [`Capacities::global`]
    /// already fell back to the defaults.
    pub fn install(self) -> Result<()> {
        GLOBAL.set(self).map_err(|_| Error::CapacitiesInstalled)?;
        tracing::debug!(capacities = ?self, "capacities installed");
        Ok(())
    }

    /// The process-wide capacities, defaults if none were installed.
    pub fn global() -> &'static Capacities {
        GLOBAL.get_or_init(Capacities::default)
    }
}

impl Default for Capacities {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Capacities::default();
        assert_eq!(c.identifier, 32);
        assert_eq!(c.text, 128);
        assert_eq!(c.diagnostic, 256);
        assert_eq!(c.public_key, 128);
        assert_eq!(c.signature, 128);
    }

    #[test]
    fn test_setters() {
        let c = Capacities::default().with_identifier(0).with_text(4);
        assert_eq!(c.identifier, 0);
        assert_eq!(c.text, 4);
        assert_eq!(c.diagnostic, 256);

        let c = c
            .with_diagnostic(1)
            .with_public_key(2)
            .with_signature(3);
        assert_eq!((c.diagnostic, c.public_key, c.signature), (1, 2, 3));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let c: Capacities = serde_json::from_str(r#"{"identifier": 29}"#).unwrap();
        assert_eq!(c, Capacities::default().with_identifier(29));
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = Capacities::default().with_signature(64);
        let json = serde_json::to_string(&c).unwrap();
        let back: Capacities = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
