use crate::document::Element;
use crate::options::ColorPolicy;

/// Per-note override derived from its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorFlag {
    #[default]
    None,
    /// Keep the beat this note opens straight.
    NoSwing,
    /// Turn the note into a rest.
    Silence,
}

/// The note's own `color`, falling back to its `<notehead>` color.
pub fn resolve_color(note: &Element) -> Option<&str> {
    note.attribute("color")
        .filter(|color| !color.is_empty())
        .or_else(|| note.child("notehead").and_then(|head| head.attribute("color")))
        .filter(|color| !color.is_empty())
}

impl ColorPolicy {
    /// Match the note's color against the no-swing color first, then the silence color.
    pub fn classify(&self, note: &Element) -> ColorFlag {
        match resolve_color(note) {
            Some(color) if self.no_swing.matches(color) => ColorFlag::NoSwing,
            Some(color) if self.silence.matches(color) => ColorFlag::Silence,
            _ => ColorFlag::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Node};
    use crate::options::Options;

    fn note(xml: &str) -> Element {
        Document::parse(xml).unwrap().root
    }

    #[test]
    fn test_resolve_color() {
        assert_eq!(resolve_color(&note(r##"<note color="#FF0000"/>"##)), Some("#FF0000"));
        assert_eq!(
            resolve_color(&note(r##"<note><notehead color="#00ff00">x</notehead></note>"##)),
            Some("#00ff00")
        );
        assert_eq!(
            resolve_color(&note(
                r##"<note color="#111111"><notehead color="#222222"/></note>"##
            )),
            Some("#111111")
        );
        assert_eq!(resolve_color(&note("<note><notehead>x</notehead></note>")), None);
        assert_eq!(resolve_color(&note("<note/>")), None);
    }

    #[test]
    fn test_classify_defaults() {
        let policy = ColorPolicy::new(&Options::default()).unwrap();
        assert_eq!(policy.classify(&note(r##"<note color="#ff0000"/>"##)), ColorFlag::NoSwing);
        assert_eq!(
            policy.classify(&note(r##"<note><notehead color="#0000FF"/></note>"##)),
            ColorFlag::Silence
        );
        assert_eq!(policy.classify(&note(r##"<note color="#000000"/>"##)), ColorFlag::None);
        assert_eq!(policy.classify(&note("<note/>")), ColorFlag::None);
    }

    #[test]
    fn test_classify_with_disabled_option() {
        let options = Options::default().with_no_swing_color("NONE");
        let policy = ColorPolicy::new(&options).unwrap();
        assert_eq!(policy.classify(&note(r##"<note color="#FF0000"/>"##)), ColorFlag::None);
        assert_eq!(policy.classify(&note(r##"<note color="NONE"/>"##)), ColorFlag::None);

        let mut silent = Element::new("note");
        silent.set_attribute("color", "#0000ff");
        silent.push_child(Node::Element(Element::new("duration")));
        assert_eq!(policy.classify(&silent), ColorFlag::Silence);
    }
}
