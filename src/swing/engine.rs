use log::{debug, info, trace};

use super::beat_grid::decompose;
use super::chord::is_chord_continuation;
use super::color::ColorFlag;
use super::divisions::{read_integer, resolve_divisions};
use super::rest::{silence, Silenced};
use crate::document::{Document, Element, Node};
use crate::error::{Location, Result, SwingError};
use crate::options::{ColorPolicy, Options};

/// Elements that move the timeline backwards or forwards within a measure.
const UNSUPPORTED_ELEMENTS: [&str; 2] = ["backup", "forward"];

/// Counts collected while swinging a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwingReport {
    pub parts: usize,
    pub measures: usize,
    pub notes: usize,
    /// Beats rewritten to a long-short pair.
    pub swung_beats: usize,
    /// Lead notes turned into rests.
    pub rests: usize,
    /// Silenced chord members that were deleted.
    pub removed_chord_notes: usize,
}

/// Walk state for one measure. Reset at every measure start.
#[derive(Debug, Default)]
struct MeasureState {
    /// Original-scale offset from the measure start.
    position: u64,
    /// Offset in the tripled output scale.
    transformed_position: u64,
    /// Whether the current beat is swung.
    swinging: bool,
    preceding_lead: Option<u32>,
    last_transformed: u64,
}

impl MeasureState {
    /// Compute the transformed duration of a lead note and advance the timeline.
    ///
    /// Returns whether this note opened a swung beat.
    fn lead_note(&mut self, divisions: u32, duration: u32, flag: ColorFlag) -> bool {
        let components = decompose(divisions, self.position, duration);
        let beat = u64::from(divisions);
        let swing_factor = |swinging: bool| -> u64 { if swinging { 2 } else { 3 } };

        let mut transformed = components.pre * swing_factor(self.swinging);
        if components.interior % beat == 0 {
            // Whole beats stay straight
            transformed += components.interior * 3;
        } else {
            transformed += components.interior * swing_factor(self.swinging);
        }

        let mut opened_swing = false;
        if components.post > 0 {
            // Only an unflagged eighth note opens a swung beat
            self.swinging = flag != ColorFlag::NoSwing && components.post * 2 == beat;
            opened_swing = self.swinging;
        }
        transformed += components.post * if self.swinging { 4 } else { 3 };

        self.position += u64::from(duration);
        self.transformed_position += transformed;
        self.preceding_lead = Some(duration);
        self.last_transformed = transformed;

        opened_swing
    }
}

/// Rewrite every part of a `score-partwise` document into swing rhythm.
///
/// Durations and divisions are rewritten in place on the tripled time scale;
/// notes colored with the silence color become rests.
pub fn swing_document(document: &mut Document, options: &Options) -> Result<SwingReport> {
    let policy = ColorPolicy::new(options)?;
    let root = &mut document.root;

    if root.name != "score-partwise" {
        return Err(SwingError::UnsupportedConstruct {
            element: root.name.clone(),
            location: Location::default(),
        });
    }

    let mut report = SwingReport::default();
    for part in root.children_named_mut("part") {
        swing_part(part, &policy, &mut report)?;
        report.parts += 1;
    }

    info!(
        "Swung {} beats in {} measures across {} parts ({} notes, {} rests, {} chord notes removed)",
        report.swung_beats,
        report.measures,
        report.parts,
        report.notes,
        report.rests,
        report.removed_chord_notes
    );
    Ok(report)
}

fn swing_part(part: &mut Element, policy: &ColorPolicy, report: &mut SwingReport) -> Result<()> {
    let part_id = part.attribute("id").map(str::to_string);
    let mut divisions = None;

    for measure in part.children_named_mut("measure") {
        let location = Location {
            part: part_id.clone(),
            measure: measure.attribute("number").map(str::to_string),
        };

        check_measure(measure, &location)?;
        let current = resolve_divisions(measure, divisions, &location)?;
        divisions = Some(current);

        swing_measure(measure, current, policy, &location, report)?;
        report.measures += 1;
    }
    Ok(())
}

fn check_measure(measure: &Element, location: &Location) -> Result<()> {
    for name in UNSUPPORTED_ELEMENTS {
        if measure.find_descendant(name).is_some() {
            return Err(SwingError::UnsupportedConstruct {
                element: name.to_string(),
                location: location.clone(),
            });
        }
    }
    Ok(())
}

fn swing_measure(
    measure: &mut Element,
    divisions: u32,
    policy: &ColorPolicy,
    location: &Location,
    report: &mut SwingReport,
) -> Result<()> {
    let mut state = MeasureState::default();
    let mut silenced = Vec::new();

    debug!("Measure{}: divisions {}", location, divisions);

    for (index, node) in measure.children.iter_mut().enumerate() {
        let note = match node {
            Node::Element(element) if element.name == "note" => element,
            _ => continue,
        };

        let duration_element = note
            .child("duration")
            .ok_or_else(|| SwingError::MissingDuration {
                location: location.clone(),
            })?;
        let duration = read_integer(duration_element, location)?;
        let flag = policy.classify(note);

        let continuation = is_chord_continuation(note, duration, state.preceding_lead, location)?;
        if !continuation && state.lead_note(divisions, duration, flag) {
            report.swung_beats += 1;
        }
        let transformed = state.last_transformed;

        trace!(
            "  note {} -> {} (chord: {}, flag: {:?}, swinging: {})",
            duration,
            transformed,
            continuation,
            flag,
            state.swinging
        );

        if let Some(duration_element) = note.child_mut("duration") {
            duration_element.set_text(transformed.to_string());
        }
        if flag == ColorFlag::Silence {
            silenced.push((index, continuation));
        }
        report.notes += 1;
    }

    let expected = state.position * 3;
    if expected != state.transformed_position {
        return Err(SwingError::DurationMismatch {
            expected,
            found: state.transformed_position,
            location: location.clone(),
        });
    }

    // Back to front so removals keep earlier indices valid
    for (index, continuation) in silenced.into_iter().rev() {
        match silence(&mut measure.children, index, continuation) {
            Some(Silenced::Rest) => report.rests += 1,
            Some(Silenced::Removed) => report.removed_chord_notes += 1,
            None => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_notes(divisions: u32, durations: &[u32]) -> Vec<u64> {
        let mut state = MeasureState::default();
        durations
            .iter()
            .map(|&duration| {
                state.lead_note(divisions, duration, ColorFlag::None);
                state.last_transformed
            })
            .collect()
    }

    #[test]
    fn test_eighth_pair_swings() {
        assert_eq!(lead_notes(2, &[1, 1, 1, 1]), [4, 2, 4, 2]);
    }

    #[test]
    fn test_syncopation() {
        assert_eq!(lead_notes(2, &[1, 2, 1, 1, 1]), [4, 6, 2, 4, 2]);
    }

    #[test]
    fn test_odd_divisions_never_swing() {
        assert_eq!(lead_notes(3, &[1, 1, 1]), [3, 3, 3]);
    }

    #[test]
    fn test_no_swing_flag_keeps_beat_straight() {
        let mut state = MeasureState::default();
        assert!(!state.lead_note(2, 1, ColorFlag::NoSwing));
        assert_eq!(state.last_transformed, 3);
        assert!(!state.lead_note(2, 1, ColorFlag::None));
        assert_eq!(state.last_transformed, 3);
        assert!(state.lead_note(2, 1, ColorFlag::Silence));
        assert_eq!(state.last_transformed, 4);
    }

    #[test]
    fn test_positions_track_both_scales() {
        let mut state = MeasureState::default();
        for duration in [1, 3, 3, 1] {
            state.lead_note(2, duration, ColorFlag::None);
        }
        assert_eq!(state.position, 8);
        assert_eq!(state.transformed_position, 24);
        assert_eq!(state.preceding_lead, Some(1));
    }

    #[test]
    fn test_backup_is_rejected() {
        let mut document = Document::parse(
            r#"<score-partwise><part id="P1"><measure number="2">
<attributes><divisions>1</divisions></attributes>
<note><duration>4</duration></note>
<backup><duration>4</duration></backup>
</measure></part></score-partwise>"#,
        )
        .unwrap();
        let err = swing_document(&mut document, &Options::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "<backup> is not currently supported but is present in part P1 measure 2"
        );
    }

    #[test]
    fn test_timewise_scores_are_rejected() {
        let mut document = Document::parse("<score-timewise/>").unwrap();
        assert!(matches!(
            swing_document(&mut document, &Options::default()),
            Err(SwingError::UnsupportedConstruct { .. })
        ));
    }
}
