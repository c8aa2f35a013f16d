//! # Options
//!
//! User-facing configuration for the swing transform: which note colors
//! suppress swing and which turn notes into rests.
//!
//! Options can be built in code or read from a YAML file:
//!
//! ```yaml
//! no-swing-color: "#00ff00"
//! silence-color: NONE
//! ```
//!
//! Colors are validated once, when a [`ColorPolicy`] is built from the options.

use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SwingError};

/// Sentinel that disables a color option.
pub const DISABLED: &str = "NONE";

pub const DEFAULT_NO_SWING_COLOR: &str = "#FF0000";
pub const DEFAULT_SILENCE_COLOR: &str = "#0000FF";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct Options {
    /// Notes of this color keep the beat they open straight.
    pub no_swing_color: String,
    /// Notes of this color become rests.
    pub silence_color: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            no_swing_color: DEFAULT_NO_SWING_COLOR.to_string(),
            silence_color: DEFAULT_SILENCE_COLOR.to_string(),
        }
    }
}

impl Options {
    /// Parse options from YAML. Missing keys keep their defaults.
    ///
    /// ```
    /// use swingify::Options;
    ///
    /// let options = Options::from_yaml("silence-color: NONE").unwrap();
    /// assert_eq!(options.no_swing_color, "#FF0000");
    /// assert_eq!(options.silence_color, "NONE");
    /// ```
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn with_no_swing_color(mut self, color: impl Into<String>) -> Self {
        self.no_swing_color = color.into();
        self
    }

    pub fn with_silence_color(mut self, color: impl Into<String>) -> Self {
        self.silence_color = color.into();
        self
    }
}

/// A normalized reference color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorRef {
    Disabled,
    /// Upper-cased `#RRGGBB`.
    Hex(String),
}

impl ColorRef {
    fn parse(option: &str, value: &str) -> Result<Self> {
        let upper = value.trim().to_ascii_uppercase();
        if upper == DISABLED {
            return Ok(ColorRef::Disabled);
        }
        if is_hex_color(&upper) {
            return Ok(ColorRef::Hex(upper));
        }
        Err(SwingError::InvalidConfig(format!(
            "Value for option {} must be a 6-digit hex color or '{}', but it is '{}'",
            option, DISABLED, value
        )))
    }

    /// Case-insensitive match; a disabled reference never matches.
    pub fn matches(&self, color: &str) -> bool {
        match self {
            ColorRef::Disabled => false,
            ColorRef::Hex(hex) => hex.eq_ignore_ascii_case(color.trim()),
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Validated color options, ready for classifying notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPolicy {
    pub no_swing: ColorRef,
    pub silence: ColorRef,
}

impl ColorPolicy {
    pub fn new(options: &Options) -> Result<Self> {
        let no_swing = ColorRef::parse("no-swing-color", &options.no_swing_color)?;
        let silence = ColorRef::parse("silence-color", &options.silence_color)?;

        if no_swing == silence {
            return Err(SwingError::InvalidConfig(
                "Options 'no-swing-color' and 'silence-color' must have different values."
                    .to_string(),
            ));
        }

        if no_swing == ColorRef::Disabled {
            warn!("no-swing color disabled: every eligible beat will swing");
        }
        if silence == ColorRef::Disabled {
            warn!("silence color disabled: no notes will be turned into rests");
        }

        Ok(Self { no_swing, silence })
    }
}
