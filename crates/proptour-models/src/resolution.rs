//! Output resolution handling.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default output resolution (720p landscape).
pub const DEFAULT_WIDTH: u32 = 1280;
/// Default output resolution (720p landscape).
pub const DEFAULT_HEIGHT: u32 = 720;

/// Error parsing a `"<width>x<height>"` resolution string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionParseError {
    #[error("invalid resolution format: {0} (expected <width>x<height>)")]
    InvalidFormat(String),

    #[error("resolution dimensions must be positive: {0}")]
    ZeroDimension(String),
}

/// Target output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once('x')
            .ok_or_else(|| ResolutionParseError::InvalidFormat(s.to_string()))?;

        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| ResolutionParseError::InvalidFormat(s.to_string()))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| ResolutionParseError::InvalidFormat(s.to_string()))?;

        if width == 0 || height == 0 {
            return Err(ResolutionParseError::ZeroDimension(s.to_string()));
        }

        Ok(Self { width, height })
    }
}
