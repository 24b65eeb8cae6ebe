//! Parser for YouTube's timedtext XML format.
//!
//! ```xml
//! <transcript>
//!   <text start="0.48" dur="2.16">Hello &amp;amp; welcome</text>
//! </transcript>
//! ```
//!
//! Text is entity-encoded twice (XML, then HTML) and may carry inline
//! formatting tags.

use super::Fragment;
use crate::error::{Result, TubesumError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::{Captures, Regex};
use std::fmt::Display;
use std::sync::LazyLock;

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("Invalid regex")
});

static FORMATTING_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:font|b|i|u|s|c|v|span|br|ruby|rt)\b[^<>]*/?>").expect("Invalid regex")
});

/// Parse a timedtext document into fragments, skipping blank ones.
pub fn parse_timedtext(xml: &str) -> Result<Vec<Fragment>> {
    let xml = xml.trim();
    if xml.is_empty() {
        return Ok(Vec::new());
    }

    if !xml.contains("<transcript") && !xml.contains("<text") {
        return Err(TubesumError::Captions(
            "Caption response is not timedtext XML".to_string(),
        ));
    }

    let mut reader = Reader::from_str(xml);
    let mut fragments = Vec::new();
    // (start, duration, raw text) of the open <text> element
    let mut current: Option<(f64, f64, String)> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) if e.name().as_ref() == b"text" => {
                current = Some((attr_seconds(&e, "start"), attr_seconds(&e, "dur"), String::new()));
            }
            Event::Text(e) => {
                if let Some((_, _, raw)) = current.as_mut() {
                    raw.push_str(&e.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(e) => {
                if let Some((_, _, raw)) = current.as_mut() {
                    raw.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) if e.name().as_ref() == b"text" => {
                if let Some((start, duration, raw)) = current.take() {
                    let text = clean_text(&raw);
                    if !text.is_empty() {
                        fragments.push(Fragment {
                            text,
                            start,
                            duration,
                        });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(fragments)
}

fn xml_error(e: impl Display) -> TubesumError {
    TubesumError::Captions(format!("Error reading timedtext XML: {}", e))
}

fn attr_seconds(element: &BytesStart, name: &str) -> f64 {
    element
        .try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok()?.trim().parse().ok())
        .unwrap_or(0.0)
}

/// Second entity pass, formatting tags removed, whitespace collapsed.
fn clean_text(raw: &str) -> String {
    let decoded = decode_entities(raw);
    let stripped = FORMATTING_TAG.replace_all(&decoded, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode one level of HTML character references.
///
/// Unknown named entities are left untouched.
pub fn decode_entities(input: &str) -> String {
    ENTITY
        .replace_all(input, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };

            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
