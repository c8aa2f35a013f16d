pub mod document;
pub mod error;
pub mod options;
pub mod swing;

pub use document::{Document, Element, Node};
pub use error::*;
pub use options::{ColorPolicy, ColorRef, Options};
pub use swing::{swing_document, ColorFlag, SwingReport};

/// Swing a MusicXML string and return the rewritten document.
/// This is the main entry point for the library.
pub fn swing_xml(source: &str, options: &Options) -> Result<String> {
    let mut document = Document::parse(source)?;
    swing_document(&mut document, options)?;
    document.to_xml_string()
}

/// Swing a MusicXML string, also returning what was changed.
pub fn swing_xml_with_report(source: &str, options: &Options) -> Result<(String, SwingReport)> {
    let mut document = Document::parse(source)?;
    let report = swing_document(&mut document, options)?;
    Ok((document.to_xml_string()?, report))
}
