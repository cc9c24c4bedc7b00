//! Feature flags port
//!
//! The classifier's reporting decision depends on two externally supplied
//! facts: whether error reporting is switched on, and whether this is a
//! production deployment. Both come through this port so the source (config
//! file, environment, remote flag service) can be swapped.
//!
//! # Example
//!
//! ```
//! use careercraft_core::{ClassificationPolicy, FeatureFlagsPort, FLAG_ERROR_REPORTING};
//! use careercraft_domain::Environment;
//!
//! struct Fixed;
//!
//! impl FeatureFlagsPort for Fixed {
//!     fn is_enabled(&self, flag: &str, default: bool) -> bool {
//!         if flag == FLAG_ERROR_REPORTING { true } else { default }
//!     }
//!
//!     fn environment(&self) -> Environment {
//!         Environment::Production
//!     }
//! }
//!
//! let policy = ClassificationPolicy::from_port(&Fixed);
//! assert!(policy.reporting_enabled && policy.production);
//! ```

use careercraft_domain::Environment;

use crate::classification::ClassificationPolicy;

/// Flag gating the `should_report` decision.
pub const FLAG_ERROR_REPORTING: &str = "error_reporting";

/// Port for querying feature flags.
pub trait FeatureFlagsPort: Send + Sync {
    /// Whether `flag` is on; `default` when the source does not know it.
    fn is_enabled(&self, flag: &str, default: bool) -> bool;

    /// Deployment environment the client runs in.
    fn environment(&self) -> Environment;
}

impl ClassificationPolicy {
    /// Snapshot the flags relevant to classification.
    pub fn from_port(flags: &dyn FeatureFlagsPort) -> Self {
        Self::new(
            flags.is_enabled(FLAG_ERROR_REPORTING, true),
            flags.environment().is_production(),
        )
    }
}
