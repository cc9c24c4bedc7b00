//! Configuration-backed feature flags.
//!
//! Serves [`FeatureFlagsPort`] from the `flags` section of the client
//! configuration, with optional in-memory overrides for operators and tests.
//!
//! # Example
//!
//! ```
//! use careercraft_core::{FeatureFlagsPort, FLAG_ERROR_REPORTING};
//! use careercraft_domain::{Environment, FeatureFlags};
//! use careercraft_infra::services::ConfigFeatureFlags;
//!
//! let flags = ConfigFeatureFlags::new(FeatureFlags {
//!     environment: Environment::Production,
//!     error_reporting: true,
//! });
//!
//! flags.set_override(FLAG_ERROR_REPORTING, false);
//! assert!(!flags.is_enabled(FLAG_ERROR_REPORTING, true));
//! ```

use std::collections::HashMap;

use careercraft_core::{FeatureFlagsPort, FLAG_ERROR_REPORTING};
use careercraft_domain::{Environment, FeatureFlags};
use parking_lot::RwLock;

/// Feature flags read from configuration.
#[derive(Debug)]
pub struct ConfigFeatureFlags {
    base: FeatureFlags,
    overrides: RwLock<HashMap<String, bool>>,
}

impl ConfigFeatureFlags {
    pub fn new(base: FeatureFlags) -> Self {
        Self { base, overrides: RwLock::new(HashMap::new()) }
    }

    /// Force `flag` to `enabled`, taking precedence over configuration.
    pub fn set_override(&self, flag: impl Into<String>, enabled: bool) {
        self.overrides.write().insert(flag.into(), enabled);
    }

    pub fn clear_override(&self, flag: &str) {
        self.overrides.write().remove(flag);
    }
}

impl FeatureFlagsPort for ConfigFeatureFlags {
    fn is_enabled(&self, flag: &str, default: bool) -> bool {
        if let Some(enabled) = self.overrides.read().get(flag) {
            return *enabled;
        }
        match flag {
            FLAG_ERROR_REPORTING => self.base.error_reporting,
            _ => default,
        }
    }

    fn environment(&self) -> Environment {
        self.base.environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_flags_come_from_config() {
        let flags = ConfigFeatureFlags::new(FeatureFlags {
            environment: Environment::Staging,
            error_reporting: false,
        });

        assert!(!flags.is_enabled(FLAG_ERROR_REPORTING, true));
        assert_eq!(flags.environment(), Environment::Staging);
    }

    #[test]
    fn unknown_flags_use_default() {
        let flags = ConfigFeatureFlags::new(FeatureFlags::default());
        assert!(flags.is_enabled("new_results_view", true));
        assert!(!flags.is_enabled("new_results_view", false));
    }

    #[test]
    fn overrides_win_until_cleared() {
        let flags = ConfigFeatureFlags::new(FeatureFlags::default());
        flags.set_override(FLAG_ERROR_REPORTING, false);
        assert!(!flags.is_enabled(FLAG_ERROR_REPORTING, true));

        flags.clear_override(FLAG_ERROR_REPORTING);
        assert!(flags.is_enabled(FLAG_ERROR_REPORTING, false));
    }
}
