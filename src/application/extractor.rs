//! Signal extraction from raw alert emails.
//!
//! Alerts arrive either as a single text part or as a multipart message
//! whose plain-text alternative carries the alert text. Only that text is
//! inspected; HTML alternatives are ignored.

use mailparse::{parse_mail, ParsedMail};

use crate::domain::{Extraction, Signal};

/// Classify one raw RFC 822 message.
///
/// Never fails: unparseable or undecodable input becomes
/// [`Extraction::Failed`] with a short reason.
#[must_use]
pub fn classify(raw: &[u8]) -> Extraction {
    match plain_text(raw) {
        Ok(text) => Signal::detect(&text).map_or(Extraction::NoSignal, Extraction::Signal),
        Err(reason) => Extraction::Failed(reason),
    }
}

/// Decoded body of the part that carries the alert text.
fn plain_text(raw: &[u8]) -> Result<String, String> {
    let parsed = parse_mail(raw).map_err(|e| format!("unparseable message: {e}"))?;

    let part = if parsed.subparts.is_empty() {
        &parsed
    } else {
        first_plain_leaf(&parsed).ok_or_else(|| "no text/plain part".to_string())?
    };

    let text = part
        .get_body()
        .map_err(|e| format!("undecodable body: {e}"))?;

    if text.trim().is_empty() {
        return Err("empty body".to_string());
    }
    Ok(text)
}

/// Depth-first search for the first `text/plain` leaf.
fn first_plain_leaf<'a, 'm>(part: &'a ParsedMail<'m>) -> Option<&'a ParsedMail<'m>> {
    if part.subparts.is_empty() {
        return part
            .ctype
            .mimetype
            .eq_ignore_ascii_case("text/plain")
            .then_some(part);
    }
    part.subparts.iter().find_map(|sub| first_plain_leaf(sub))
}
