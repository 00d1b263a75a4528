//! Decoders for the two caption payload formats the platform serves.
//!
//! - Timed-text XML: `<transcript><text start=".." dur="..">..</text>..</transcript>`,
//!   decoded into ordered [`Segment`]s.
//! - WebVTT: cue blocks with timing arrows, decoded into plain text only.

use std::{borrow::Cow, sync::LazyLock};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use regex::{Captures, Regex};

use crate::{
    error::{Result, TranscriptError},
    types::Segment,
};

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("entity pattern is valid")
});

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));

/// Decode a timed-text XML document into segments, in document order.
///
/// Missing or unparsable `start`/`dur` attributes default to `0.0`. Elements
/// whose text is empty after normalization are dropped. Only a structurally
/// broken document is an error.
pub fn decode_xml(xml: &str) -> Result<Vec<Segment>> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut cue: Option<PendingCue> = None;

    loop {
        let event = reader.read_event().map_err(|e| TranscriptError::Decode {
            reason: format!("malformed XML at byte {}: {e}", reader.error_position()),
        })?;

        match event {
            Event::Start(start) => match cue.as_mut() {
                Some(pending) => pending.nested += 1,
                None if start.name().as_ref() == b"text" => {
                    cue = Some(PendingCue::open(&start));
                }
                None => {}
            },
            Event::End(_) => {
                if let Some(pending) = cue.as_mut() {
                    if pending.nested > 0 {
                        pending.nested -= 1;
                    } else if let Some(segment) = cue.take().and_then(PendingCue::close) {
                        segments.push(segment);
                    }
                }
            }
            Event::Empty(_) => {
                if let Some(pending) = cue.as_mut() {
                    pending.raw.push(' ');
                }
            }
            Event::Text(text) => {
                if let Some(pending) = cue.as_mut() {
                    let decoded = text
                        .unescape()
                        .unwrap_or_else(|_| String::from_utf8_lossy(&text).into_owned().into());
                    pending.raw.push_str(&decoded);
                }
            }
            Event::CData(data) => {
                if let Some(pending) = cue.as_mut() {
                    pending.raw.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if cue.is_some() {
        return Err(TranscriptError::Decode {
            reason: "unterminated <text> element".to_string(),
        });
    }

    Ok(segments)
}

/// Decode a WebVTT payload into its transcript text, one cue line per line.
///
/// Timing is not recovered. Blank lines, timing lines, numeric cue indices,
/// the `WEBVTT` header block and `NOTE`, `STYLE` or `REGION` blocks are dropped.
pub fn decode_vtt(vtt: &str) -> String {
    let mut lines = Vec::new();
    let mut skipping = false;
    let mut block_start = true;

    for line in vtt.lines() {
        let line = line.trim_start_matches('\u{feff}').trim();

        if line.is_empty() {
            skipping = false;
            block_start = true;
            continue;
        }
        if line.starts_with("WEBVTT") || (block_start && is_non_cue_block(line)) {
            skipping = true;
            block_start = false;
            continue;
        }
        block_start = false;
        if skipping || line.contains("-->") || line.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let text = normalize_cue_text(line);
        if !text.is_empty() {
            lines.push(text);
        }
    }

    lines.join("\n")
}

fn is_non_cue_block(line: &str) -> bool {
    ["NOTE", "STYLE", "REGION"].iter().any(|keyword| {
        line.strip_prefix(keyword)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
    })
}

pub fn looks_like_vtt(body: &str) -> bool {
    body.trim_start_matches('\u{feff}')
        .trim_start()
        .starts_with("WEBVTT")
}

pub fn looks_like_xml_transcript(body: &str) -> bool {
    body.contains("<transcript") || body.contains("<text ")
}

/// Unescape entities, strip markup tags, collapse whitespace.
pub fn normalize_cue_text(raw: &str) -> String {
    let unescaped = unescape_entities(raw);
    let stripped = MARKUP_TAG.replace_all(&unescaped, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Single-pass HTML entity unescape. Unknown named entities are kept verbatim.
fn unescape_entities(raw: &str) -> Cow<'_, str> {
    ENTITY.replace_all(raw, |caps: &Captures| {
        let entity = &caps[1];
        let decoded = match entity {
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "nbsp" => Some(' '),
            _ => entity.strip_prefix('#').and_then(|num| {
                let code = match num.strip_prefix(['x', 'X']) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => num.parse::<u32>().ok(),
                };
                code.and_then(char::from_u32)
            }),
        };

        match decoded {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

struct PendingCue {
    start: f64,
    duration: f64,
    raw: String,
    nested: usize,
}

impl PendingCue {
    fn open(element: &BytesStart<'_>) -> Self {
        let mut start = 0.0;
        let mut duration = 0.0;

        for attr in element.attributes().flatten() {
            let value = attr.unescape_value().ok().and_then(|v| parse_seconds(&v));
            match attr.key.as_ref() {
                b"start" => start = value.unwrap_or(0.0),
                b"dur" => duration = value.unwrap_or(0.0),
                _ => {}
            }
        }

        Self {
            start,
            duration,
            raw: String::new(),
            nested: 0,
        }
    }

    fn close(self) -> Option<Segment> {
        let text = normalize_cue_text(&self.raw);
        if text.is_empty() {
            return None;
        }

        Some(Segment {
            text,
            start: self.start,
            duration: self.duration,
        })
    }
}

fn parse_seconds(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
