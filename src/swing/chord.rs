use crate::document::Element;
use crate::error::{Location, Result, SwingError};

/// True if `note` sounds together with the preceding lead note.
///
/// Chord members must carry the lead note's duration. A chord member with no
/// lead note before it in the measure, or only a zero-length one, is an error.
pub fn is_chord_continuation(
    note: &Element,
    duration: u32,
    preceding_lead: Option<u32>,
    location: &Location,
) -> Result<bool> {
    if !note.has_child("chord") {
        return Ok(false);
    }

    match preceding_lead {
        Some(lead) if lead == duration => Ok(true),
        None | Some(0) => Err(SwingError::OrphanChordNote {
            location: location.clone(),
        }),
        Some(lead) => Err(SwingError::InconsistentChordDuration {
            lead,
            member: duration,
            location: location.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Node;

    fn chord_note() -> Element {
        let mut note = Element::new("note");
        note.push_child(Node::Element(Element::new("chord")));
        note
    }

    #[test]
    fn test_plain_note_is_lead() {
        let note = Element::new("note");
        assert!(!is_chord_continuation(&note, 2, Some(1), &Location::default()).unwrap());
        assert!(!is_chord_continuation(&note, 2, None, &Location::default()).unwrap());
    }

    #[test]
    fn test_matching_chord_member() {
        assert!(is_chord_continuation(&chord_note(), 2, Some(2), &Location::default()).unwrap());
    }

    #[test]
    fn test_chord_errors() {
        let location = Location::new(Some("P1"), Some("3"));
        let err = is_chord_continuation(&chord_note(), 2, Some(1), &location).unwrap_err();
        assert!(matches!(
            err,
            SwingError::InconsistentChordDuration { lead: 1, member: 2, .. }
        ));

        let err = is_chord_continuation(&chord_note(), 2, None, &location).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Found chord note without preceding main chord note in part P1 measure 3"
        );
    }

    #[test]
    fn test_zero_length_lead() {
        let err =
            is_chord_continuation(&chord_note(), 2, Some(0), &Location::default()).unwrap_err();
        assert!(matches!(err, SwingError::OrphanChordNote { .. }));
        assert!(is_chord_continuation(&chord_note(), 0, Some(0), &Location::default()).unwrap());
    }
}
