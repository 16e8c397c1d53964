//! Transition effects between adjacent clips.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default transition length in seconds.
pub const DEFAULT_TRANSITION_DURATION: f64 = 0.5;

/// Named cross-fade transition effect.
///
/// The variants cover the effects the product UI exposes; anything else the
/// encoder recognizes natively can be passed through with [`TransitionKind::Other`].
/// The string form is handed to FFmpeg's `xfade` filter verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransitionKind {
    Fade,
    WipeLeft,
    WipeRight,
    WipeUp,
    WipeDown,
    SlideLeft,
    SlideRight,
    /// Any other effect name supported by the encoder's xfade filter.
    Other(String),
}

impl TransitionKind {
    /// The xfade effect name as FFmpeg expects it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Fade => "fade",
            Self::WipeLeft => "wipeleft",
            Self::WipeRight => "wiperight",
            Self::WipeUp => "wipeup",
            Self::WipeDown => "wipedown",
            Self::SlideLeft => "slideleft",
            Self::SlideRight => "slideright",
            Self::Other(name) => name,
        }
    }
}

impl Default for TransitionKind {
    fn default() -> Self {
        Self::Fade
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TransitionKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "fade" => Self::Fade,
            "wipeleft" => Self::WipeLeft,
            "wiperight" => Self::WipeRight,
            "wipeup" => Self::WipeUp,
            "wipedown" => Self::WipeDown,
            "slideleft" => Self::SlideLeft,
            "slideright" => Self::SlideRight,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for TransitionKind {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<TransitionKind> for String {
    fn from(kind: TransitionKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A transition effect together with its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    /// Effect name passed through to the encoder.
    pub kind: TransitionKind,
    /// Transition length in seconds (typically well below clip length).
    pub duration_seconds: f64,
}

impl TransitionSpec {
    pub fn new(kind: impl Into<TransitionKind>, duration_seconds: f64) -> Self {
        Self {
            kind: kind.into(),
            duration_seconds,
        }
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            kind: TransitionKind::Fade,
            duration_seconds: DEFAULT_TRANSITION_DURATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kinds_round_trip() {
        for name in [
            "fade",
            "wipeleft",
            "wiperight",
            "wipeup",
            "wipedown",
            "slideleft",
            "slideright",
        ] {
            let kind = TransitionKind::from(name);
            assert!(!matches!(kind, TransitionKind::Other(_)), "{name}");
            assert_eq!(kind.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_kind_passes_through() {
        let kind = TransitionKind::from("circlecrop");
        assert_eq!(kind, TransitionKind::Other("circlecrop".to_string()));
        assert_eq!(kind.as_str(), "circlecrop");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&TransitionKind::WipeLeft).unwrap();
        assert_eq!(json, "\"wipeleft\"");

        let kind: TransitionKind = serde_json::from_str("\"dissolve\"").unwrap();
        assert_eq!(kind, TransitionKind::Other("dissolve".to_string()));
    }
}
