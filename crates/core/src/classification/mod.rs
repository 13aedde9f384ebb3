//! Failure classification
//!
//! Normalizes raw collaborator failures into the [`ErrorKind`] taxonomy.

mod classifier;

pub use classifier::ErrorClassifier;

use calsync_domain::ErrorKind;

/// Ordered human recovery steps for `code`.
pub fn recovery_steps(code: ErrorKind) -> &'static [&'static str] {
    code.recovery_steps()
}
