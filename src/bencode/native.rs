use super::dictionary::Dictionary;
use super::element::Element;
use super::error::BencodeError;
use super::list::List;
use super::scalar::{BInteger, BString};
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};

/// Plain host values produced by [`Element::un_morph`].
///
/// Dictionary entries keep the order of the dictionary they came from. Use
/// [`Native::into_sorted`] to compare two values regardless of key order.
///
/// # Examples
///
/// ```
/// use rbencode::bencode::{decode, Native};
///
/// let native = decode(b"d3:cow3:moo4:spaml1:ai1eee").unwrap().un_morph();
/// assert_eq!(native.get(b"cow").and_then(Native::as_str), Some("moo"));
/// assert_eq!(native.get(b"spam").and_then(Native::as_list).map(|l| l.len()), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Native {
    Bytes(Bytes),
    Integer(i64),
    List(Vec<Native>),
    Dict(Vec<(Bytes, Native)>),
}

impl Native {
    pub fn string(s: &str) -> Self {
        Native::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Native::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()?).ok()
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Native::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Native]> {
        match self {
            Native::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&[(Bytes, Native)]> {
        match self {
            Native::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up `key` if this is a dictionary.
    pub fn get(&self, key: &[u8]) -> Option<&Native> {
        self.as_dict()?
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v)
    }

    /// Recursively orders dictionary entries by key.
    pub fn into_sorted(self) -> Native {
        match self {
            Native::List(l) => Native::List(l.into_iter().map(Native::into_sorted).collect()),
            Native::Dict(d) => {
                let mut d: Vec<_> = d.into_iter().map(|(k, v)| (k, v.into_sorted())).collect();
                d.sort_by(|a, b| a.0.cmp(&b.0));
                Native::Dict(d)
            }
            other => other,
        }
    }
}

impl From<i64> for Native {
    fn from(i: i64) -> Self {
        Native::Integer(i)
    }
}

impl From<&str> for Native {
    fn from(s: &str) -> Self {
        Native::string(s)
    }
}

impl From<Bytes> for Native {
    fn from(b: Bytes) -> Self {
        Native::Bytes(b)
    }
}

impl From<Vec<Native>> for Native {
    fn from(l: Vec<Native>) -> Self {
        Native::List(l)
    }
}

/// Conversion of a host value into an [`Element`].
///
/// Strings and byte buffers become byte strings, integer types become
/// integers, sequences become lists and maps become dictionaries. Elements
/// pass through unchanged. Values with no bencode form, such as floats and
/// `None`, fail with [`BencodeError::Unrepresentable`].
pub trait IntoElement {
    fn into_element(self) -> Result<Element, BencodeError>;
}

impl IntoElement for Element {
    fn into_element(self) -> Result<Element, BencodeError> {
        Ok(self)
    }
}

impl IntoElement for &Element {
    fn into_element(self) -> Result<Element, BencodeError> {
        Ok(self.clone())
    }
}

impl IntoElement for BString {
    fn into_element(self) -> Result<Element, BencodeError> {
        Ok(Element::String(self))
    }
}

impl IntoElement for &BString {
    fn into_element(self) -> Result<Element, BencodeError> {
        Ok(Element::String(self.clone()))
    }
}

impl IntoElement for BInteger {
    fn into_element(self) -> Result<Element, BencodeError> {
        Ok(Element::Integer(self))
    }
}

impl IntoElement for List {
    fn into_element(self) -> Result<Element, BencodeError> {
        Ok(Element::List(self))
    }
}

impl IntoElement for Dictionary {
    fn into_element(self) -> Result<Element, BencodeError> {
        Ok(Element::Dictionary(self))
    }
}

macro_rules! into_string_element {
    ($($ty:ty),*) => {
        $(
            impl IntoElement for $ty {
                fn into_element(self) -> Result<Element, BencodeError> {
                    Ok(Element::String(BString::from(self)))
                }
            }
        )*
    };
}

into_string_element!(&str, String, &[u8], Vec<u8>, Bytes);

impl IntoElement for &String {
    fn into_element(self) -> Result<Element, BencodeError> {
        self.as_str().into_element()
    }
}

impl<const N: usize> IntoElement for &[u8; N] {
    fn into_element(self) -> Result<Element, BencodeError> {
        self.as_slice().into_element()
    }
}

macro_rules! into_integer_element {
    ($($ty:ty),*) => {
        $(
            impl IntoElement for $ty {
                fn into_element(self) -> Result<Element, BencodeError> {
                    let value = i64::try_from(self).map_err(|_| BencodeError::IntegerOutOfRange)?;
                    Ok(Element::Integer(BInteger::new(value)))
                }
            }
        )*
    };
}

// `u8` is left out so that `Vec<u8>` stays a byte string.
into_integer_element!(i8, i16, i32, i64, u16, u32, u64, isize, usize);

impl IntoElement for f32 {
    fn into_element(self) -> Result<Element, BencodeError> {
        Err(BencodeError::Unrepresentable("float"))
    }
}

impl IntoElement for f64 {
    fn into_element(self) -> Result<Element, BencodeError> {
        Err(BencodeError::Unrepresentable("float"))
    }
}

impl<T: IntoElement> IntoElement for Option<T> {
    fn into_element(self) -> Result<Element, BencodeError> {
        match self {
            Some(value) => value.into_element(),
            None => Err(BencodeError::Unrepresentable("null")),
        }
    }
}

impl<T: IntoElement> IntoElement for Vec<T> {
    fn into_element(self) -> Result<Element, BencodeError> {
        List::from_items(self).map(Element::List)
    }
}

impl<K: IntoElement, V: IntoElement> IntoElement for BTreeMap<K, V> {
    fn into_element(self) -> Result<Element, BencodeError> {
        Dictionary::from_pairs(self).map(Element::Dictionary)
    }
}

impl<K: IntoElement, V: IntoElement, S> IntoElement for HashMap<K, V, S> {
    fn into_element(self) -> Result<Element, BencodeError> {
        Dictionary::from_pairs(self).map(Element::Dictionary)
    }
}

impl IntoElement for Native {
    fn into_element(self) -> Result<Element, BencodeError> {
        match self {
            Native::Bytes(b) => b.into_element(),
            Native::Integer(i) => i.into_element(),
            Native::List(l) => l.into_element(),
            Native::Dict(d) => Dictionary::from_pairs(d).map(Element::Dictionary),
        }
    }
}

impl IntoElement for &Native {
    fn into_element(self) -> Result<Element, BencodeError> {
        self.clone().into_element()
    }
}
