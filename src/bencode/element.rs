use super::dictionary::Dictionary;
use super::error::BencodeError;
use super::list::List;
use super::native::{IntoElement, Native};
use super::scalar::{BInteger, BString};
use bytes::{Bytes, BytesMut};
use std::io::Write;
use std::slice;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a [`List`] or [`Dictionary`].
///
/// Elements record the id of the collection they are attached to as their
/// parent. The id is a plain handle: it never owns or reaches the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(u64);

impl CollectionId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        CollectionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Behaviour shared by the two container elements.
///
/// # Examples
///
/// ```
/// use rbencode::bencode::{Collection, Dictionary, Element, List};
///
/// let mut list = List::new();
/// list.smart_add(Element::morph(1).unwrap()).unwrap();
/// assert_eq!(list.count(), 1);
///
/// let mut dict = Dictionary::new();
/// dict.smart_add(Element::morph("key").unwrap()).unwrap();
/// assert_eq!(dict.count(), 0);
/// dict.smart_add(Element::morph("value").unwrap()).unwrap();
/// assert_eq!(dict.count(), 1);
/// ```
pub trait Collection {
    /// The unit a collection stores: elements for lists, pairs for dictionaries.
    type Entry;

    /// Returns this collection's identity, used as the parent of its children.
    fn id(&self) -> CollectionId;

    /// Returns the number of complete entries.
    fn count(&self) -> usize;

    /// Iterates entries in their current stored order.
    fn entries(&self) -> slice::Iter<'_, Self::Entry>;

    /// Accepts one element from a flat token stream.
    fn smart_add(&mut self, element: Element) -> Result<(), BencodeError>;

    /// Checks that no partially added entry is left behind.
    fn finish(&mut self) -> Result<(), BencodeError> {
        Ok(())
    }
}

/// A node of the bencode element tree.
///
/// Equality (`==`) is structural and ignores parent bookkeeping. The
/// [`compare`](Element::compare) method implements bencode value equality,
/// which is only meaningful for scalars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    String(BString),
    Integer(BInteger),
    List(List),
    Dictionary(Dictionary),
}

impl Element {
    /// Converts a host value into an element. Elements pass through unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbencode::bencode::Element;
    ///
    /// let element = Element::morph("spam").unwrap();
    /// assert_eq!(element.as_str(), Some("spam"));
    ///
    /// let again = Element::morph(element.clone()).unwrap();
    /// assert_eq!(again, element);
    ///
    /// assert!(Element::morph(1.5f64).is_err());
    /// ```
    pub fn morph<T: IntoElement>(value: T) -> Result<Element, BencodeError> {
        value.into_element()
    }

    /// Returns the canonical bencode form of this element.
    ///
    /// Dictionaries inside the tree are sorted in place as a side effect.
    pub fn encode(&mut self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Writes the canonical bencode form of this element to `writer`.
    pub fn write_to<W: Write>(&mut self, writer: &mut W) -> Result<(), BencodeError> {
        writer.write_all(&self.encode())?;
        Ok(())
    }

    pub(crate) fn encode_into(&mut self, buf: &mut BytesMut) {
        match self {
            Element::String(s) => s.encode_into(buf),
            Element::Integer(i) => i.encode_into(buf),
            Element::List(l) => l.encode_into(buf),
            Element::Dictionary(d) => d.encode_into(buf),
        }
    }

    /// Bencode value equality. Lists and dictionaries never compare equal.
    pub fn compare(&self, other: &Element) -> bool {
        match self {
            Element::String(s) => s.compare(other),
            Element::Integer(i) => i.compare(other),
            Element::List(_) | Element::Dictionary(_) => false,
        }
    }

    /// Recursively converts this element into plain host values.
    pub fn un_morph(&self) -> Native {
        match self {
            Element::String(s) => s.un_morph(),
            Element::Integer(i) => i.un_morph(),
            Element::List(l) => l.un_morph(),
            Element::Dictionary(d) => d.un_morph(),
        }
    }

    /// Returns the collection this element is attached to, if any.
    pub fn parent(&self) -> Option<CollectionId> {
        match self {
            Element::String(s) => s.parent(),
            Element::Integer(i) => i.parent(),
            Element::List(l) => l.parent(),
            Element::Dictionary(d) => d.parent(),
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<CollectionId>) {
        match self {
            Element::String(s) => s.set_parent(parent),
            Element::Integer(i) => i.set_parent(parent),
            Element::List(l) => l.set_parent(parent),
            Element::Dictionary(d) => d.set_parent(parent),
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::String(_) => "string",
            Element::Integer(_) => "integer",
            Element::List(_) => "list",
            Element::Dictionary(_) => "dictionary",
        }
    }

    pub fn as_string(&self) -> Option<&BString> {
        match self {
            Element::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        self.as_string().map(BString::as_bytes)
    }

    /// Returns the value as UTF-8 text if it is a string holding valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_string()?.as_str()
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Element::Integer(i) => Some(i.value()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Element::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Element::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Element::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Element::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the element and returns the dictionary, if it is one.
    pub fn into_dict(self) -> Option<Dictionary> {
        match self {
            Element::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up a key in this element if it is a dictionary.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbencode::bencode::decode;
    ///
    /// let element = decode(b"d3:foo3:bare").unwrap();
    /// assert_eq!(element.get("foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert!(element.get("missing").is_none());
    /// ```
    pub fn get<K: IntoElement>(&self, key: K) -> Option<&Element> {
        self.as_dict()?.get(key)
    }
}
