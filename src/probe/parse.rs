//! Extraction of the probe address from the lookup response.
//!
//! The response is an XML document, but all we need is the text of the first
//! `<Ip>` element. Instead of pulling in an XML parser we scan for the tags and
//! only accept characters that can appear in an IPv4 or IPv6 literal.

use thiserror::Error;

const OPEN_TAG: &str = "<Ip>";
const CLOSE_TAG: &str = "</Ip>";

/// Reasons the address could not be extracted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIpError {
    /// No `<Ip>` tag in the body.
    #[error("missing <Ip> tag")]
    MissingOpenTag,
    /// No `</Ip>` tag after the opening tag.
    #[error("missing </Ip> tag")]
    MissingCloseTag,
    /// A character that cannot be part of an IP literal.
    #[error("invalid character {0:?} in address")]
    InvalidCharacter(char),
    /// Only whitespace between the tags.
    #[error("empty address")]
    Empty,
}

/// Extracts the probe address from a lookup response body.
///
/// Whitespace inside the element is dropped and hex digits are lowercased, so
/// `<Ip> 2001:DB8::1 </Ip>` yields `2001:db8::1`. Any character other than
/// whitespace, decimal or hex digits, `.` and `:` rejects the whole body.
pub fn parse_ip(body: &str) -> Result<String, ParseIpError> {
    let start = body.find(OPEN_TAG).ok_or(ParseIpError::MissingOpenTag)? + OPEN_TAG.len();
    let rest = &body[start..];
    let end = rest.find(CLOSE_TAG).ok_or(ParseIpError::MissingCloseTag)?;

    let mut address = String::with_capacity(end);
    for ch in rest[..end].chars() {
        // '\x0b' (vertical tab) is whitespace for our purposes too
        if ch.is_ascii_whitespace() || ch == '\x0b' {
            continue;
        }
        let ch = ch.to_ascii_lowercase();
        if !(ch.is_ascii_digit() || ('a'..='f').contains(&ch) || ch == '.' || ch == ':') {
            return Err(ParseIpError::InvalidCharacter(ch));
        }
        address.push(ch);
    }

    if address.is_empty() {
        return Err(ParseIpError::Empty);
    }
    Ok(address)
}
