//! Result wrapper for computations that must always hand back a usable value.

use serde::Serialize;

use crate::engine::ScoringError;

/// A value that is either fully computed or a degraded fallback.
///
/// Callers always get a structurally valid value; the degraded arm keeps the
/// cause inspectable instead of swallowing it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok { value: T },
    Degraded {
        value: T,
        #[serde(serialize_with = "serialize_cause")]
        cause: ScoringError,
    },
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Outcome::Ok { value }
    }

    pub fn degraded(value: T, cause: ScoringError) -> Self {
        Outcome::Degraded { value, cause }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Ok { value } | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Ok { value } | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    /// Why the value is degraded, if it is.
    pub fn cause(&self) -> Option<&ScoringError> {
        match self {
            Outcome::Ok { .. } => None,
            Outcome::Degraded { cause, .. } => Some(cause),
        }
    }

    /// Transform the carried value, keeping the degraded marker.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Ok { value } => Outcome::Ok { value: f(value) },
            Outcome::Degraded { value, cause } => Outcome::Degraded {
                value: f(value),
                cause,
            },
        }
    }
}

fn serialize_cause<S: serde::Serializer>(cause: &ScoringError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&cause.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_outcome() {
        let outcome = Outcome::ok(7u8);
        assert!(!outcome.is_degraded());
        assert!(outcome.cause().is_none());
        assert_eq!(*outcome.value(), 7);
    }

    #[test]
    fn test_degraded_outcome_keeps_cause() {
        let outcome = Outcome::degraded(
            50u8,
            ScoringError::NonFinite {
                stage: "composite",
                value: f64::INFINITY,
            },
        );
        assert!(outcome.is_degraded());
        assert!(matches!(outcome.cause(), Some(ScoringError::NonFinite { .. })));

        let mapped = outcome.map(|v| v as u32 * 2);
        assert!(mapped.is_degraded());
        assert_eq!(mapped.into_value(), 100);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Outcome::ok(1u8)).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["value"], 1);
    }
}
