use crate::document::Element;
use crate::error::{Location, Result, SwingError};

/// Resolve the division unit for `measure` and triple it in the output.
///
/// A measure declaring `<attributes><divisions>` gets that element's value
/// rewritten to three times itself; the original value is returned for this
/// measure's arithmetic. Otherwise the `inherited` unit from an earlier measure
/// stays active.
pub fn resolve_divisions(
    measure: &mut Element,
    inherited: Option<u32>,
    location: &Location,
) -> Result<u32> {
    let declared = measure
        .children_named_mut("attributes")
        .find_map(|attributes| attributes.child_mut("divisions"));

    match declared {
        Some(element) => {
            let value = read_integer(element, location)?;
            if value == 0 {
                return Err(malformed(element, location));
            }
            element.set_text((u64::from(value) * 3).to_string());
            Ok(value)
        }
        None => inherited.ok_or_else(|| SwingError::MissingDivisions {
            location: location.clone(),
        }),
    }
}

/// Parse an element's text as an unsigned integer, ignoring surrounding whitespace.
pub(crate) fn read_integer(element: &Element, location: &Location) -> Result<u32> {
    element
        .text()
        .trim()
        .parse()
        .map_err(|_| malformed(element, location))
}

fn malformed(element: &Element, location: &Location) -> SwingError {
    SwingError::MalformedValue {
        element: element.name.clone(),
        value: element.text(),
        location: location.clone(),
    }
}
