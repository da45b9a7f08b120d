//! Backdrop-specific error types.
//!
//! Configuration loading is the only fallible boundary: every error here is
//! logged and answered with compiled defaults rather than aborting the app.

use std::fmt;

/// Top-level error enum for the backdrop.
#[derive(Debug)]
pub enum BackdropError {
    /// The config file exists but could not be read.
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::config::BackdropConfig`].
    ConfigParse {
        path: String,
        source: toml::de::Error,
    },

    /// A palette entry is not a `#rrggbb` (or `rrggbb`) hex string.
    InvalidColor {
        /// The rejected palette entry.
        value: String,
    },

    /// The palette has no usable entries.
    EmptyPalette,

    /// A constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for BackdropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackdropError::ConfigRead { path, source } => {
                write!(f, "could not read {}: {}", path, source)
            }
            BackdropError::ConfigParse { path, source } => {
                write!(f, "could not parse {}: {}", path, source)
            }
            BackdropError::InvalidColor { value } => {
                write!(f, "'{}' is not a hex colour", value)
            }
            BackdropError::EmptyPalette => write!(f, "star palette is empty"),
            BackdropError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for BackdropError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackdropError::ConfigRead { source, .. } => Some(source),
            BackdropError::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias: a `Result` using `BackdropError` as the error type.
pub type BackdropResult<T> = Result<T, BackdropError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Rejects `value` unless it lies in `(min, max]`.
pub fn validate_range(
    name: &'static str,
    value: f32,
    min_exclusive: f32,
    max_inclusive: f32,
    safe_range: &'static str,
) -> BackdropResult<()> {
    if value.is_finite() && value > min_exclusive && value <= max_inclusive {
        Ok(())
    } else {
        Err(BackdropError::UnsafeConstant {
            name,
            value,
            safe_range,
        })
    }
}

/// Rejects negative or non-finite values.
pub fn validate_non_negative(name: &'static str, value: f32) -> BackdropResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(BackdropError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    }
}

/// Rejects a `min..=max` pair that is inverted, negative, or non-finite.
/// The reported value is `min`.
pub fn validate_ordered(name: &'static str, min: f32, max: f32) -> BackdropResult<()> {
    if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
        Ok(())
    } else {
        Err(BackdropError::UnsafeConstant {
            name,
            value: min,
            safe_range: "0.0 <= min <= max",
        })
    }
}

/// Returns an error if `gravity_const` is outside its validated safe range.
///
/// Values above 5.0 fling asteroids across the whole field in a single tick.
pub fn validate_gravity_const(value: f32) -> BackdropResult<()> {
    validate_range("GRAVITY_CONST", value, 0.0, 5.0, "(0.0, 5.0]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_const_bounds() {
        assert!(validate_gravity_const(0.5).is_ok());
        assert!(validate_gravity_const(5.0).is_ok());
        assert!(validate_gravity_const(0.0).is_err());
        assert!(validate_gravity_const(-1.0).is_err());
        assert!(validate_gravity_const(f32::NAN).is_err());
    }

    #[test]
    fn ordered_pairs() {
        assert!(validate_ordered("ASTEROID_RADIUS", 0.5, 2.0).is_ok());
        assert!(validate_ordered("ASTEROID_RADIUS", 1.0, 1.0).is_ok());
        assert!(validate_ordered("ASTEROID_RADIUS", 3.0, 1.0).is_err());
        assert!(validate_ordered("ASTEROID_RADIUS", -1.0, 1.0).is_err());
        assert!(validate_ordered("ASTEROID_RADIUS", 0.5, f32::NAN).is_err());
    }

    #[test]
    fn non_negative_bounds() {
        assert!(validate_non_negative("STAR_DRIFT", 0.0).is_ok());
        assert!(validate_non_negative("STAR_DRIFT", 0.2).is_ok());
        assert!(validate_non_negative("STAR_DRIFT", -0.2).is_err());
        assert!(validate_non_negative("STAR_DRIFT", f32::INFINITY).is_err());
    }

    #[test]
    fn unsafe_constant_message_names_the_constant() {
        let err = validate_range("COLLISION_FACTOR", 9.0, 0.0, 2.0, "(0.0, 2.0]").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("COLLISION_FACTOR"), "got: {msg}");
        assert!(msg.contains("(0.0, 2.0]"), "got: {msg}");
    }
}
