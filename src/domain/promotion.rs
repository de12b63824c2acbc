use crate::utils::error::{Result, UpdateError};

pub const TESTING: &str = "testing";
pub const STAGING: &str = "staging";
pub const PRODUCTION: &str = "production";

/// Environments updated, in order, when promoting up to `highest`.
///
/// Staging is promoted on its own; production drags testing and staging
/// along with it.
pub fn promotion_targets(highest: &str) -> Result<&'static [&'static str]> {
    match highest {
        TESTING => Ok(&[TESTING]),
        STAGING => Ok(&[STAGING]),
        PRODUCTION => Ok(&[TESTING, STAGING, PRODUCTION]),
        other => Err(UpdateError::usage(format!(
            "cannot promote to unknown environment '{}' (expected {}, {} or {})",
            other, TESTING, STAGING, PRODUCTION
        ))),
    }
}
