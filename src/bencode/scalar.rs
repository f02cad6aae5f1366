use super::element::{CollectionId, Element};
use super::native::Native;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// A bencode byte string, encoded as `<length>:<bytes>`.
///
/// The bytes may or may not be valid UTF-8.
///
/// # Examples
///
/// ```
/// use rbencode::bencode::BString;
///
/// let s = BString::from("spam");
/// assert_eq!(s.encode().as_ref(), b"4:spam");
/// assert_eq!(s.as_str(), Some("spam"));
/// ```
#[derive(Clone)]
pub struct BString {
    value: Bytes,
    parent: Option<CollectionId>,
}

impl BString {
    pub fn new(value: impl Into<Bytes>) -> Self {
        Self {
            value: value.into(),
            parent: None,
        }
    }

    /// Raw bytes, used for key ordering and key equality.
    pub fn as_bytes(&self) -> &Bytes {
        &self.value
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }

    pub fn into_bytes(self) -> Bytes {
        self.value
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.value.len() + 4);
        self.encode_into(&mut buf);
        buf.freeze()
    }

    pub(crate) fn encode_into(&self, buf: &mut BytesMut) {
        let mut len = itoa::Buffer::new();
        buf.put_slice(len.format(self.value.len()).as_bytes());
        buf.put_u8(b':');
        buf.put_slice(&self.value);
    }

    /// True when `other` is a string with the same bytes.
    pub fn compare(&self, other: &Element) -> bool {
        matches!(other, Element::String(s) if s.value == self.value)
    }

    pub fn un_morph(&self) -> Native {
        Native::Bytes(self.value.clone())
    }

    pub fn parent(&self) -> Option<CollectionId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<CollectionId>) {
        self.parent = parent;
    }
}

impl PartialEq for BString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for BString {}

impl fmt::Debug for BString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "BString({:?})", s),
            None => write!(f, "BString({:?})", self.value),
        }
    }
}

impl From<&str> for BString {
    fn from(s: &str) -> Self {
        BString::new(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for BString {
    fn from(s: String) -> Self {
        BString::new(s)
    }
}

impl From<&[u8]> for BString {
    fn from(b: &[u8]) -> Self {
        BString::new(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for BString {
    fn from(b: Vec<u8>) -> Self {
        BString::new(b)
    }
}

impl From<Bytes> for BString {
    fn from(b: Bytes) -> Self {
        BString::new(b)
    }
}

/// A bencode integer, encoded as `i<number>e`.
///
/// # Examples
///
/// ```
/// use rbencode::bencode::BInteger;
///
/// assert_eq!(BInteger::new(-42).encode().as_ref(), b"i-42e");
/// ```
#[derive(Clone)]
pub struct BInteger {
    value: i64,
    parent: Option<CollectionId>,
}

impl BInteger {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            parent: None,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(22);
        self.encode_into(&mut buf);
        buf.freeze()
    }

    pub(crate) fn encode_into(&self, buf: &mut BytesMut) {
        let mut digits = itoa::Buffer::new();
        buf.put_u8(b'i');
        buf.put_slice(digits.format(self.value).as_bytes());
        buf.put_u8(b'e');
    }

    /// True when `other` is an integer with the same value.
    pub fn compare(&self, other: &Element) -> bool {
        matches!(other, Element::Integer(i) if i.value == self.value)
    }

    pub fn un_morph(&self) -> Native {
        Native::Integer(self.value)
    }

    pub fn parent(&self) -> Option<CollectionId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<CollectionId>) {
        self.parent = parent;
    }
}

impl PartialEq for BInteger {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for BInteger {}

impl fmt::Debug for BInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BInteger({})", self.value)
    }
}

impl From<i64> for BInteger {
    fn from(i: i64) -> Self {
        BInteger::new(i)
    }
}
