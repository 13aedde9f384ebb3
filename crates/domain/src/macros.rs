//! Macro for implementing Display and FromStr for code-like enums
//!
//! Error kinds and engine statuses travel as stable string codes (logs, the
//! persisted error journal, host bindings). This macro keeps the variant to
//! code mapping in a single place and gives both directions of the conversion.
//!
//! # Example
//!
//! ```rust
//! use calsync_domain::impl_domain_code_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Phase {
//!     Warmup,
//!     Steady,
//! }
//!
//! impl_domain_code_conversions!(Phase {
//!     Warmup => "WARMUP",
//!     Steady => "STEADY",
//! });
//!
//! assert_eq!(Phase::Warmup.to_string(), "WARMUP");
//! assert_eq!("steady".parse::<Phase>().unwrap(), Phase::Steady);
//! ```

/// Implements Display and FromStr traits for code enums
///
/// - Display writes the code exactly as declared
/// - FromStr accepts the code in any ASCII case
#[macro_export]
macro_rules! impl_domain_code_conversions {
    ($enum_name:ident { $($variant:ident => $code:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Stable string code for this variant.
            pub const fn as_code(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_code())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($code) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
