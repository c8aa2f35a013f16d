use crate::document::{Element, Node};

/// Children a note keeps when it becomes a rest.
const REST_CHILDREN: [&str; 4] = ["duration", "notations", "type", "voice"];

/// What happened to a silenced note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Silenced {
    Rest,
    Removed,
}

/// Silence the note at `index` among a measure's children.
///
/// Chord members are removed outright; a lead note keeps its duration and
/// voice/type bookkeeping and gets a `<rest/>` as its first child.
pub fn silence(
    children: &mut Vec<Node>,
    index: usize,
    chord_continuation: bool,
) -> Option<Silenced> {
    if index >= children.len() {
        return None;
    }
    if chord_continuation {
        children.remove(index);
        return Some(Silenced::Removed);
    }

    let note = children.get_mut(index)?.as_element_mut()?;
    convert_to_rest(note);
    Some(Silenced::Rest)
}

pub fn convert_to_rest(note: &mut Element) {
    note.retain_children(|child| match child {
        Node::Element(element) => REST_CHILDREN.contains(&element.name.as_str()),
        _ => false,
    });
    note.insert_child(0, Node::Element(Element::new("rest")));
}
