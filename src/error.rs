//! # Error Types
//!
//! This module defines all error types for the swing transform.
//!
//! Errors raised while walking the score carry a [`Location`] (part id and
//! measure number) so users can find the offending measure in their notation
//! software.
//!
//! ## Error Types
//! - `MissingDivisions` - A note was reached before any `<divisions>` was declared
//! - `MalformedValue` - A numeric element does not hold an integer
//! - `MissingDuration` - A note without `<duration>`
//! - `UnsupportedConstruct` - `<backup>`/`<forward>` or a non-partwise score
//! - `OrphanChordNote` / `InconsistentChordDuration` - Broken chords
//! - `InvalidConfig` - Bad color options
//! - `DurationMismatch` - Internal consistency check failed
//! - `Xml`, `Io`, `Options` - Reading and writing documents and option files
//!
//! ## Usage
//! ```rust
//! use swingify::{swing_xml, Options, SwingError};
//!
//! let source = r#"<score-partwise><part id="P1"><measure number="1">
//!   <note><duration>1</duration></note>
//! </measure></part></score-partwise>"#;
//!
//! match swing_xml(source, &Options::default()) {
//!     Ok(xml) => println!("{}", xml),
//!     Err(SwingError::MissingDivisions { location }) => {
//!         eprintln!("Declare <divisions> first{}", location);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SwingError>;

/// Where in the score an error was detected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub part: Option<String>,
    pub measure: Option<String>,
}

impl Location {
    pub fn new(part: Option<&str>, measure: Option<&str>) -> Self {
        Self {
            part: part.map(str::to_string),
            measure: measure.map(str::to_string),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.part, &self.measure) {
            (None, None) => Ok(()),
            (part, measure) => write!(
                f,
                " in part {} measure {}",
                part.as_deref().unwrap_or(""),
                measure.as_deref().unwrap_or("")
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum SwingError {
    /// No `<divisions>` was declared in this measure or any earlier one.
    ///
    /// # Example
    /// ```
    /// # use swingify::{Location, SwingError};
    /// let err = SwingError::MissingDivisions {
    ///     location: Location::new(Some("P1"), Some("1")),
    /// };
    /// assert_eq!(err.to_string(), "No divisions defined in part P1 measure 1");
    /// ```
    #[error("No divisions defined{location}")]
    MissingDivisions { location: Location },

    /// A numeric element does not hold an integer (or a zero `<divisions>`).
    #[error("<{element}> value must be an integer, but found \"{value}\"{location}")]
    MalformedValue {
        element: String,
        value: String,
        location: Location,
    },

    #[error("<duration> element missing on note{location}")]
    MissingDuration { location: Location },

    /// Timeline repositioning and non-partwise scores are rejected outright.
    #[error("<{element}> is not currently supported but is present{location}")]
    UnsupportedConstruct { element: String, location: Location },

    #[error("Found chord note without preceding main chord note{location}")]
    OrphanChordNote { location: Location },

    /// # Example
    /// ```
    /// # use swingify::{Location, SwingError};
    /// let err = SwingError::InconsistentChordDuration {
    ///     lead: 1,
    ///     member: 2,
    ///     location: Location::new(Some("P1"), Some("4")),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Chord notes must all be the same duration, but found durations 1 and 2 in part P1 measure 4"
    /// );
    /// ```
    #[error("Chord notes must all be the same duration, but found durations {lead} and {member}{location}")]
    InconsistentChordDuration {
        lead: u32,
        member: u32,
        location: Location,
    },

    #[error("Invalid options: {0}")]
    InvalidConfig(String),

    /// The transformed measure is not exactly three times the original.
    ///
    /// Signals a defect in the transform itself, not in the input.
    #[error("Faulty processing: Modified durations don't add up properly (expected duration sum {expected}, found {found}){location}")]
    DurationMismatch {
        expected: u64,
        found: u64,
        location: Location,
    },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid options file: {0}")]
    Options(#[from] serde_yaml::Error),
}

impl From<quick_xml::Error> for SwingError {
    fn from(err: quick_xml::Error) -> Self {
        SwingError::Xml(err.to_string())
    }
}
