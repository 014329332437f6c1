//! Cross-field invariant checks applied to incoming requests.
//!
//! Pure predicate + error-construction helpers: no side effects, invoked by
//! the request models' `validate()` methods before any state mutation.
//! Each failure names the violated rule so it can be surfaced verbatim.

use crate::error::{Error, Result};

/// At least one of two optional fields must be set.
pub fn at_least_one(rule: &'static str, a_set: bool, b_set: bool) -> Result<()> {
    if !a_set && !b_set {
        return Err(Error::Validation {
            rule,
            message: "at least one of the two fields must be set".into(),
        });
    }
    Ok(())
}

/// Exactly one of two mutually-exclusive fields must be set.
///
/// Rejects both directions: neither-set and both-set.
pub fn exactly_one(rule: &'static str, a_set: bool, b_set: bool) -> Result<()> {
    match (a_set, b_set) {
        (false, false) => Err(Error::Validation {
            rule,
            message: "one of the two fields must be set".into(),
        }),
        (true, true) => Err(Error::Validation {
            rule,
            message: "the two fields are mutually exclusive".into(),
        }),
        _ => Ok(()),
    }
}

/// A dependent field becomes required when `condition` holds.
pub fn required_when(rule: &'static str, condition: bool, present: bool) -> Result<()> {
    if condition && !present {
        return Err(Error::Validation {
            rule,
            message: "required field missing".into(),
        });
    }
    Ok(())
}
