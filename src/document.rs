//! # Document Tree
//!
//! A small mutable XML tree for MusicXML scores, read and written with `quick-xml`.
//!
//! The swing transform only rewrites a handful of elements (`<divisions>`,
//! `<duration>`, silenced notes), so the tree keeps everything else as it was
//! found: whitespace text, comments, the declaration and the doctype all
//! survive a parse/serialize cycle.
//!
//! ## Type Hierarchy
//! ```text
//! Document
//!   ├── prolog: Vec<Node>   (declaration, doctype, comments)
//!   ├── root: Element
//!   │     ├── name
//!   │     ├── attributes: Vec<(name, value)>
//!   │     └── children: Vec<Node>
//!   └── epilog: Vec<Node>
//!
//! Node (enum)
//!   ├── Element
//!   ├── Text / CData
//!   ├── Comment / ProcessingInstruction
//!   └── Declaration / DocType
//! ```
//!
//! ## Example
//! ```rust
//! use swingify::Document;
//!
//! let mut document = Document::parse("<note><duration>2</duration></note>")?;
//! let duration = document.root.child_mut("duration").unwrap();
//! assert_eq!(duration.text(), "2");
//! duration.set_text("6");
//! assert_eq!(document.to_xml_string()?, "<note><duration>6</duration></note>");
//! # Ok::<(), swingify::SwingError>(())
//! ```

use std::borrow::Cow;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Result, SwingError};

/// `<?xml ...?>` declaration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    /// Raw comment content, without `<!--` and `-->`.
    Comment(String),
    /// Raw instruction content, without `<?` and `?>`.
    ProcessingInstruction(String),
    Declaration(Declaration),
    /// Raw doctype content, without `<!DOCTYPE` and `>`.
    DocType(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// True for elements with the given name.
    pub fn is_element_named(&self, name: &str) -> bool {
        matches!(self, Node::Element(element) if element.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Child elements, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |element| element.name == name)
    }

    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> {
        self.elements_mut().filter(move |element| element.name == name)
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|element| element.name == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// First element with the given name anywhere below this one, depth first.
    pub fn find_descendant(&self, name: &str) -> Option<&Element> {
        self.elements().find_map(|element| {
            if element.name == name {
                Some(element)
            } else {
                element.find_descendant(name)
            }
        })
    }

    /// Concatenated text and CDATA content of the direct children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) | Node::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    pub fn retain_children<F>(&mut self, keep: F)
    where
        F: FnMut(&Node) -> bool,
    {
        self.children.retain(keep);
    }

    pub fn insert_child(&mut self, index: usize, node: Node) {
        let index = index.min(self.children.len());
        self.children.insert(index, node);
    }

    pub fn push_child(&mut self, node: Node) {
        self.children.push(node);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub prolog: Vec<Node>,
    pub root: Element,
    pub epilog: Vec<Node>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    /// Parse an XML string into a tree.
    pub fn parse(source: &str) -> Result<Self> {
        let mut reader = Reader::from_str(source);
        reader.trim_text(false);

        let mut builder = TreeBuilder::default();

        loop {
            let event = reader.read_event().map_err(|e| {
                SwingError::Xml(format!("{} at position {}", e, reader.buffer_position()))
            })?;

            match event {
                Event::Start(start) => builder.open(element_from_start(&start)?),
                Event::Empty(start) => builder.append(Node::Element(element_from_start(&start)?))?,
                Event::End(_) => builder.close()?,
                Event::Text(text) => builder.append(Node::Text(text.unescape()?.into_owned()))?,
                Event::CData(cdata) => {
                    builder.append(Node::CData(utf8(cdata.into_inner())?))?
                }
                Event::Comment(comment) => {
                    builder.append(Node::Comment(utf8(comment.into_inner())?))?
                }
                Event::PI(instruction) => builder.append(Node::ProcessingInstruction(utf8(
                    instruction.into_inner(),
                )?))?,
                Event::DocType(doctype) => {
                    builder.append(Node::DocType(utf8(doctype.into_inner())?))?
                }
                Event::Decl(decl) => builder.append(Node::Declaration(declaration(&decl)?))?,
                Event::Eof => break,
            }
        }

        builder.finish()
    }

    /// Serialize the tree back to XML.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());

        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.epilog {
            write_node(&mut writer, node)?;
        }

        String::from_utf8(writer.into_inner())
            .map_err(|e| SwingError::Xml(format!("output is not valid UTF-8: {}", e)))
    }
}

#[derive(Default)]
struct TreeBuilder {
    prolog: Vec<Node>,
    root: Option<Element>,
    epilog: Vec<Node>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn open(&mut self, element: Element) {
        self.open.push(element);
    }

    fn close(&mut self) -> Result<()> {
        let element = self
            .open
            .pop()
            .ok_or_else(|| SwingError::Xml("closing tag without opening tag".to_string()))?;
        self.append(Node::Element(element))
    }

    fn append(&mut self, node: Node) -> Result<()> {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(node);
            return Ok(());
        }

        match node {
            Node::Element(element) => {
                if self.root.is_some() {
                    return Err(SwingError::Xml(format!(
                        "document has more than one root element (found <{}>)",
                        element.name
                    )));
                }
                self.root = Some(element);
            }
            Node::Text(ref text) | Node::CData(ref text) if !text.trim().is_empty() => {
                return Err(SwingError::Xml(
                    "text content outside of the root element".to_string(),
                ));
            }
            other => {
                if self.root.is_some() {
                    self.epilog.push(other);
                } else {
                    self.prolog.push(other);
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Document> {
        if let Some(unclosed) = self.open.last() {
            return Err(SwingError::Xml(format!("unclosed element <{}>", unclosed.name)));
        }
        let root = self
            .root
            .ok_or_else(|| SwingError::Xml("document has no root element".to_string()))?;
        Ok(Document {
            prolog: self.prolog,
            root,
            epilog: self.epilog,
        })
    }
}

fn utf8(bytes: Cow<'_, [u8]>) -> Result<String> {
    String::from_utf8(bytes.into_owned())
        .map_err(|e| SwingError::Xml(format!("invalid UTF-8: {}", e)))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| SwingError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn declaration(decl: &BytesDecl<'_>) -> Result<Declaration> {
    let version = utf8(decl.version()?)?;
    let encoding = decl.encoding().transpose()?.map(utf8).transpose()?;
    let standalone = decl.standalone().transpose()?.map(utf8).transpose()?;
    Ok(Declaration {
        version,
        encoding,
        standalone,
    })
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    match node {
        Node::Element(element) => write_element(writer, element)?,
        Node::Text(text) => {
            writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?
        }
        Node::CData(text) => writer.write_event(Event::CData(BytesCData::new(text.as_str())))?,
        Node::Comment(raw) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(raw.as_str())))?
        }
        Node::ProcessingInstruction(raw) => {
            writer.write_event(Event::PI(BytesText::from_escaped(raw.as_str())))?
        }
        Node::Declaration(decl) => writer.write_event(Event::Decl(BytesDecl::new(
            &decl.version,
            decl.encoding.as_deref(),
            decl.standalone.as_deref(),
        )))?,
        Node::DocType(raw) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(raw.as_str())))?
        }
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCORE: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="4.0">
  <!-- first part -->
  <part id="P1">
    <measure number="1">
      <note color="#FF0000">
        <chord/>
        <duration>2</duration>
      </note>
    </measure>
  </part>
</score-partwise>
"##;

    #[test]
    fn test_round_trip_preserves_layout() {
        let document = Document::parse(SCORE).unwrap();
        assert_eq!(document.to_xml_string().unwrap(), SCORE);
    }

    #[test]
    fn test_prolog_and_root() {
        let document = Document::parse(SCORE).unwrap();
        assert!(matches!(document.prolog[0], Node::Declaration(ref d) if d.version == "1.0"));
        assert!(document
            .prolog
            .iter()
            .any(|node| matches!(node, Node::DocType(raw) if raw.starts_with("score-partwise"))));
        assert_eq!(document.root.name, "score-partwise");
        assert_eq!(document.root.attribute("version"), Some("4.0"));
    }

    #[test]
    fn test_navigation() {
        let document = Document::parse(SCORE).unwrap();
        let part = document.root.child("part").unwrap();
        assert_eq!(part.attribute("id"), Some("P1"));

        let note = part.child("measure").unwrap().child("note").unwrap();
        assert!(note.has_child("chord"));
        assert_eq!(note.attribute("color"), Some("#FF0000"));
        assert_eq!(note.child("duration").unwrap().text(), "2");
        assert_eq!(
            document.root.find_descendant("duration").map(Element::text),
            Some("2".to_string())
        );
        assert!(document.root.find_descendant("backup").is_none());
    }

    #[test]
    fn test_escaping() {
        let source = r#"<words font="a&amp;b">Rock &amp; roll, don't &lt;stop&gt;</words>"#;
        let document = Document::parse(source).unwrap();
        assert_eq!(document.root.attribute("font"), Some("a&b"));
        assert_eq!(document.root.text(), "Rock & roll, don't <stop>");
        assert_eq!(document.to_xml_string().unwrap(), source);
    }

    #[test]
    fn test_edit_children() {
        let mut document =
            Document::parse("<note><pitch/><duration>3</duration><voice>1</voice></note>")
                .unwrap();
        let note = &mut document.root;
        note.retain_children(|node| !node.is_element_named("pitch"));
        note.insert_child(0, Node::Element(Element::new("rest")));
        note.set_attribute("color", "#0000FF");
        assert_eq!(
            document.to_xml_string().unwrap(),
            r##"<note color="#0000FF"><rest/><duration>3</duration><voice>1</voice></note>"##
        );
    }

    #[test]
    fn test_built_document() {
        let mut note = Element::new("note");
        note.push_child(Node::Element(Element::new("rest")));
        let mut duration = Element::new("duration");
        duration.set_text("4");
        note.push_child(Node::Element(duration));

        let mut document = Document::new(note);
        document.epilog.push(Node::Comment(" end ".to_string()));
        assert_eq!(
            document.to_xml_string().unwrap(),
            "<note><rest/><duration>4</duration></note><!-- end -->"
        );
    }

    #[test]
    fn test_malformed_documents() {
        for source in [
            "<a><b></a>",
            "<a>",
            "",
            "<a/><b/>",
            "text<a/>",
        ] {
            assert!(
                matches!(Document::parse(source), Err(SwingError::Xml(_))),
                "{:?} should fail",
                source
            );
        }
    }
}
