use super::dictionary::Dictionary;
use super::element::{Collection, Element};
use super::error::BencodeError;
use super::list::List;
use super::scalar::{BInteger, BString};
use crate::constants::MAX_DEPTH;
use bytes::Bytes;
use tracing::debug;

/// Decoder settings.
///
/// # Examples
///
/// ```
/// use rbencode::bencode::{decode_with, DecodeConfig};
///
/// let config = DecodeConfig::default().strict(true);
/// assert!(decode_with(b"d1:ai1e1:bi2ee", &config).is_ok());
/// assert!(decode_with(b"d1:bi2e1:ai1ee", &config).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Deepest list/dictionary nesting accepted.
    pub max_depth: usize,
    /// Require dictionary keys in strictly ascending order.
    pub strict: bool,
}

impl DecodeConfig {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            strict: false,
        }
    }
}

/// Decodes one complete bencode value into an element tree.
///
/// Dictionaries are filled through [`Collection::smart_add`], so duplicate
/// keys are merged with the last value winning and unsorted keys are
/// accepted. Use [`decode_with`] and [`DecodeConfig::strict`] to reject them.
///
/// # Errors
///
/// Fails on malformed input, trailing bytes, non-string dictionary keys and
/// nesting deeper than [`MAX_DEPTH`].
///
/// # Examples
///
/// ```
/// use rbencode::bencode::decode;
///
/// let mut element = decode(b"d4:spami42e3:cow3:mooe").unwrap();
/// assert_eq!(element.get("spam").and_then(|v| v.as_integer()), Some(42));
///
/// // Re-encoding yields the canonical key order.
/// assert_eq!(element.encode().as_ref(), b"d3:cow3:moo4:spami42ee");
/// ```
pub fn decode(data: &[u8]) -> Result<Element, BencodeError> {
    decode_with(data, &DecodeConfig::default())
}

/// Decodes one complete bencode value using `config`.
pub fn decode_with(data: &[u8], config: &DecodeConfig) -> Result<Element, BencodeError> {
    let mut pos = 0;
    let element = decode_value(data, &mut pos, 0, config)?;

    if pos != data.len() {
        return Err(BencodeError::TrailingData);
    }

    debug!("Decoded bencode {} from {} bytes", element.kind(), data.len());
    Ok(element)
}

fn decode_value(
    data: &[u8],
    pos: &mut usize,
    depth: usize,
    config: &DecodeConfig,
) -> Result<Element, BencodeError> {
    if depth > config.max_depth {
        return Err(BencodeError::NestingTooDeep);
    }

    if *pos >= data.len() {
        return Err(BencodeError::UnexpectedEof);
    }

    match data[*pos] {
        b'i' => decode_integer(data, pos),
        b'l' => decode_list(data, pos, depth, config),
        b'd' => decode_dict(data, pos, depth, config),
        b'0'..=b'9' => decode_string(data, pos),
        c => Err(BencodeError::UnexpectedChar(c as char)),
    }
}

fn decode_integer(data: &[u8], pos: &mut usize) -> Result<Element, BencodeError> {
    let end = find(data, *pos + 1, b'e')?;
    let value = parse_integer(&data[*pos + 1..end])?;
    *pos = end + 1;
    Ok(Element::Integer(BInteger::new(value)))
}

fn decode_string(data: &[u8], pos: &mut usize) -> Result<Element, BencodeError> {
    let colon = find(data, *pos, b':')?;
    let len = parse_length(&data[*pos..colon])?;

    let start = colon + 1;
    if len > data.len() - start {
        return Err(BencodeError::UnexpectedEof);
    }

    *pos = start + len;
    Ok(Element::String(BString::new(Bytes::copy_from_slice(
        &data[start..*pos],
    ))))
}

/// Index of the first `byte` at or after `from`.
fn find(data: &[u8], from: usize, byte: u8) -> Result<usize, BencodeError> {
    data.get(from..)
        .and_then(|rest| rest.iter().position(|&b| b == byte))
        .map(|offset| from + offset)
        .ok_or(BencodeError::UnexpectedEof)
}

/// Parses `0` or `-?[1-9][0-9]*`. Signs other than a single `-`, leading
/// zeros and `-0` are rejected.
fn parse_integer(body: &[u8]) -> Result<i64, BencodeError> {
    let invalid = || BencodeError::InvalidInteger(String::from_utf8_lossy(body).into_owned());

    let magnitude = body.strip_prefix(b"-").unwrap_or(body);
    let canonical = match magnitude {
        [b'0'] => magnitude.len() == body.len(),
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    };
    if !canonical {
        return Err(invalid());
    }

    std::str::from_utf8(body)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)
}

/// Parses a string length: `0` or `[1-9][0-9]*`.
fn parse_length(body: &[u8]) -> Result<usize, BencodeError> {
    let canonical = match body {
        [b'0'] => true,
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    };
    if !canonical {
        return Err(BencodeError::InvalidStringLength);
    }

    std::str::from_utf8(body)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(BencodeError::InvalidStringLength)
}

fn decode_list(
    data: &[u8],
    pos: &mut usize,
    depth: usize,
    config: &DecodeConfig,
) -> Result<Element, BencodeError> {
    *pos += 1;
    let mut list = List::new();

    while *pos < data.len() && data[*pos] != b'e' {
        list.smart_add(decode_value(data, pos, depth + 1, config)?)?;
    }

    if *pos >= data.len() {
        return Err(BencodeError::UnexpectedEof);
    }

    *pos += 1;
    Ok(Element::List(list))
}

fn decode_dict(
    data: &[u8],
    pos: &mut usize,
    depth: usize,
    config: &DecodeConfig,
) -> Result<Element, BencodeError> {
    *pos += 1;
    let mut dict = Dictionary::new();
    let mut last_key: Option<Bytes> = None;

    while *pos < data.len() && data[*pos] != b'e' {
        let element = decode_value(data, pos, depth + 1, config)?;

        if config.strict && dict.pending_key().is_none() {
            if let Element::String(key) = &element {
                if last_key.as_ref().is_some_and(|last| last >= key.as_bytes()) {
                    return Err(BencodeError::UnsortedKeys);
                }
                last_key = Some(key.as_bytes().clone());
            }
        }

        dict.smart_add(element)?;
    }

    if *pos >= data.len() {
        return Err(BencodeError::UnexpectedEof);
    }

    *pos += 1;
    dict.finish()?;
    Ok(Element::Dictionary(dict))
}
