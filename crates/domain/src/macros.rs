//! Display/FromStr generation for string-backed status enums.
//!
//! Statuses are persisted as lowercase snake_case text, so both directions
//! of the conversion live next to each other.
//!
//! ```rust
//! use profilesync_domain::impl_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum RunState {
//!     Idle,
//!     Running,
//! }
//!
//! impl_status_conversions!(RunState {
//!     Idle => "idle",
//!     Running => "running",
//! });
//!
//! assert_eq!(RunState::Running.to_string(), "running");
//! assert_eq!("IDLE".parse::<RunState>(), Ok(RunState::Idle));
//! ```

/// Implements `Display`, `FromStr` and an `as_str` accessor for a status
/// enum.
///
/// Parsing is case-insensitive; unknown values produce a descriptive
/// `String` error naming the enum.
#[macro_export]
macro_rules! impl_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical string form, as stored and logged.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
