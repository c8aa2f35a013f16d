//! # Swing Module
//!
//! Rewrites straight eighth-note pairs in a MusicXML score into long-short
//! (ternary) pairs while keeping every measure's total length exact.
//!
//! ## Sub-modules
//! - `beat_grid` - Splits a note's duration at beat boundaries
//! - `color` - Per-note overrides from note/notehead colors
//! - `chord` - Chord member detection and duration checks
//! - `divisions` - Active division unit per measure, tripled in the output
//! - `engine` - Document walker and per-measure swing state
//! - `rest` - Turns silenced notes into rests
//!
//! ## Time Scale
//!
//! The output uses three times the input's `<divisions>`, so a beat of `D`
//! input ticks becomes `3D` output ticks. A straight eighth pair is `3:3`
//! half-beats scaled by the beat, a swung pair is `4:2`. Integer arithmetic
//! stays exact either way.
//!
//! ## Swing Rule
//!
//! Beats are straight by default. A beat becomes swung when the lead note that
//! opens it lasts exactly half a beat and is not colored with the no-swing
//! color. The decision is made once per beat, when a note's trailing part
//! starts it.
//!
//! ```text
//! divisions = 2, durations 1 2 1 1 1
//!
//! beat     |   1   |   2   |   3   |
//! input     1 | 2     | 1 | 1 | 1 |
//! output    4 | 6         | 2 | 4 | 2
//! ```
//!
//! ## Example
//! ```rust
//! use swingify::{swing_document, Document, Options};
//!
//! let mut document = Document::parse(
//!     r#"<score-partwise><part id="P1"><measure number="1">
//! <attributes><divisions>2</divisions></attributes>
//! <note><duration>1</duration></note>
//! <note><duration>1</duration></note>
//! </measure></part></score-partwise>"#,
//! )?;
//!
//! let report = swing_document(&mut document, &Options::default())?;
//! assert_eq!(report.swung_beats, 1);
//!
//! let durations: Vec<String> = document
//!     .root
//!     .find_descendant("measure")
//!     .unwrap()
//!     .children_named("note")
//!     .map(|note| note.child("duration").unwrap().text())
//!     .collect();
//! assert_eq!(durations, ["4", "2"]);
//! # Ok::<(), swingify::SwingError>(())
//! ```

mod beat_grid;
mod chord;
mod color;
mod divisions;
mod engine;
mod rest;


pub use beat_grid::{decompose, BeatComponents};
pub use chord::is_chord_continuation;
pub use color::{resolve_color, ColorFlag};
pub use divisions::resolve_divisions;
pub use engine::{swing_document, SwingReport};
pub use rest::{convert_to_rest, silence, Silenced};
