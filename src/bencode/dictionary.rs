use super::element::{Collection, CollectionId, Element};
use super::error::BencodeError;
use super::native::{IntoElement, Native};
use super::scalar::BString;
use bytes::{BufMut, Bytes, BytesMut};
use std::slice;
use tracing::{trace, warn};

/// A key/value unit owned by a [`Dictionary`].
///
/// The key is always a byte string. Pairs are only created by the dictionary,
/// so a key cannot be changed after insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryPair {
    key: BString,
    value: Element,
}

impl DictionaryPair {
    pub fn key(&self) -> &BString {
        &self.key
    }

    pub fn value(&self) -> &Element {
        &self.value
    }
}

/// Progress of incremental population through [`Collection::smart_add`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SmartAddState {
    /// The next element is a key.
    #[default]
    Empty,
    /// A key has been staged and the next element is its value.
    AwaitingValue(BString),
}

/// A bencode dictionary, encoded as `d<key><value>...e`.
///
/// Pairs are kept in insertion order until the dictionary is encoded. Encoding
/// sorts the stored pairs by the raw bytes of their keys, so the output is
/// always canonical and later iteration observes the sorted order.
///
/// Keys are byte strings. Any key given as a host value is morphed first, and
/// anything that does not become a string is rejected with
/// [`BencodeError::InvalidKey`] before the dictionary is touched. Setting a
/// key that already exists replaces its value in place.
///
/// # Examples
///
/// ```
/// use rbencode::bencode::Dictionary;
///
/// let mut dict = Dictionary::from_pairs([("b", 2), ("a", 1)]).unwrap();
/// assert_eq!(dict.encode().as_ref(), b"d1:ai1e1:bi2ee");
///
/// dict.set("a", "one").unwrap();
/// assert_eq!(dict.len(), 2);
/// assert_eq!(dict.get("a").and_then(|v| v.as_str()), Some("one"));
///
/// assert!(dict.set(42, "v").is_err());
/// assert!(!dict.exists("missing"));
/// ```
#[derive(Debug)]
pub struct Dictionary {
    id: CollectionId,
    parent: Option<CollectionId>,
    pairs: Vec<DictionaryPair>,
    pending: SmartAddState,
    sorted: bool,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            id: CollectionId::next(),
            parent: None,
            pairs: Vec::new(),
            pending: SmartAddState::Empty,
            sorted: true,
        }
    }

    /// Builds a dictionary from key/value pairs.
    ///
    /// Later duplicates of a key replace earlier ones. Fails on the first key
    /// that is not a string.
    pub fn from_pairs<I, K, V>(source: I) -> Result<Self, BencodeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: IntoElement,
        V: IntoElement,
    {
        let mut dict = Self::new();
        for (key, value) in source {
            dict.set(key, value)?;
        }
        Ok(dict)
    }

    /// Returns true if a pair with an equal key is stored.
    ///
    /// A key that is not a string is never present.
    pub fn exists<K: IntoElement>(&self, key: K) -> bool {
        normalize_key(key)
            .map(|key| self.position(&key).is_some())
            .unwrap_or(false)
    }

    /// Returns the value stored under `key`, or `None` if there is none.
    pub fn get<K: IntoElement>(&self, key: K) -> Option<&Element> {
        let key = normalize_key(key).ok()?;
        self.position(&key).map(|i| &self.pairs[i].value)
    }

    /// Mutable access to the value stored under `key`, for editing it in place.
    ///
    /// Assigning a whole new element through the reference leaves that
    /// element's parent unset; use [`set`](Dictionary::set) to replace a value.
    pub fn get_mut<K: IntoElement>(&mut self, key: K) -> Option<&mut Element> {
        let key = normalize_key(key).ok()?;
        let i = self.position(&key)?;
        Some(&mut self.pairs[i].value)
    }

    /// Stores `value` under `key`.
    ///
    /// Both are normalized before anything changes: a non-string key yields
    /// [`BencodeError::InvalidKey`] and a value without a bencode form yields
    /// its morph error. An existing pair keeps its position and gets the new
    /// value; otherwise a pair is appended. The value's parent becomes this
    /// dictionary either way.
    pub fn set<K, V>(&mut self, key: K, value: V) -> Result<(), BencodeError>
    where
        K: IntoElement,
        V: IntoElement,
    {
        let key = normalize_key(key)?;
        let value = value.into_element()?;
        self.insert(key, value);
        Ok(())
    }

    fn insert(&mut self, mut key: BString, mut value: Element) {
        value.set_parent(Some(self.id));

        if let Some(i) = self.position(&key) {
            trace!("Replacing value of dictionary key {:?}", key);
            self.pairs[i].value = value;
            return;
        }

        if let Some(last) = self.pairs.last() {
            self.sorted &= last.key.as_bytes() < key.as_bytes();
        }
        key.set_parent(Some(self.id));
        self.pairs.push(DictionaryPair { key, value });
    }

    /// Removes the pair stored under `key` and returns its value.
    pub fn remove<K: IntoElement>(&mut self, key: K) -> Option<Element> {
        let key = normalize_key(key).ok()?;
        let i = self.position(&key)?;
        let mut value = self.pairs.remove(i).value;
        value.set_parent(None);
        Some(value)
    }

    fn position(&self, key: &BString) -> Option<usize> {
        self.pairs.iter().position(|pair| pair.key == *key)
    }

    /// Returns the key staged by [`smart_add`](Collection::smart_add), if any.
    pub fn pending_key(&self) -> Option<&BString> {
        match &self.pending {
            SmartAddState::Empty => None,
            SmartAddState::AwaitingValue(key) => Some(key),
        }
    }

    pub fn smart_add_state(&self) -> &SmartAddState {
        &self.pending
    }

    /// Drops a staged key that never received its value and returns it.
    pub fn discard_pending(&mut self) -> Option<BString> {
        match std::mem::take(&mut self.pending) {
            SmartAddState::Empty => None,
            SmartAddState::AwaitingValue(mut key) => {
                key.set_parent(None);
                Some(key)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// True when the stored pairs are already in canonical key order.
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn iter(&self) -> slice::Iter<'_, DictionaryPair> {
        self.pairs.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &BString> {
        self.pairs.iter().map(DictionaryPair::key)
    }

    /// Returns the canonical bencode form, sorting the stored pairs first.
    ///
    /// A key staged by `smart_add` without a value is not part of the output.
    pub fn encode(&mut self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf);
        buf.freeze()
    }

    pub(crate) fn encode_into(&mut self, buf: &mut BytesMut) {
        if let Some(key) = self.pending_key() {
            warn!("Encoding dictionary with dangling key {:?}", key);
        }
        self.sort();

        buf.put_u8(b'd');
        for pair in &mut self.pairs {
            pair.key.encode_into(buf);
            pair.value.encode_into(buf);
        }
        buf.put_u8(b'e');
    }

    fn sort(&mut self) {
        if !self.sorted {
            self.pairs.sort_by(|a, b| a.key.as_bytes().cmp(b.key.as_bytes()));
            self.sorted = true;
        }
    }

    /// Dictionaries have no bencode value equality; this is always false.
    pub fn compare(&self, _other: &Element) -> bool {
        false
    }

    /// Converts the pairs, in their current stored order, into host values.
    pub fn un_morph(&self) -> Native {
        Native::Dict(
            self.pairs
                .iter()
                .map(|pair| (pair.key.as_bytes().clone(), pair.value.un_morph()))
                .collect(),
        )
    }

    pub fn parent(&self) -> Option<CollectionId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<CollectionId>) {
        self.parent = parent;
    }
}

fn normalize_key<K: IntoElement>(key: K) -> Result<BString, BencodeError> {
    match key.into_element() {
        Ok(Element::String(key)) => Ok(key),
        _ => Err(BencodeError::InvalidKey),
    }
}

impl Collection for Dictionary {
    type Entry = DictionaryPair;

    fn id(&self) -> CollectionId {
        self.id
    }

    fn count(&self) -> usize {
        self.pairs.len()
    }

    fn entries(&self) -> slice::Iter<'_, DictionaryPair> {
        self.pairs.iter()
    }

    /// Alternates between staging a key and pairing it with a value.
    ///
    /// A key must be a string element; anything else is rejected with
    /// [`BencodeError::InvalidKey`] and leaves the state unchanged.
    fn smart_add(&mut self, element: Element) -> Result<(), BencodeError> {
        match std::mem::take(&mut self.pending) {
            SmartAddState::Empty => match element {
                Element::String(mut key) => {
                    key.set_parent(Some(self.id));
                    self.pending = SmartAddState::AwaitingValue(key);
                }
                _ => return Err(BencodeError::InvalidKey),
            },
            SmartAddState::AwaitingValue(key) => self.insert(key, element),
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), BencodeError> {
        match self.pending {
            SmartAddState::Empty => Ok(()),
            SmartAddState::AwaitingValue(_) => Err(BencodeError::DanglingKey),
        }
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

// A clone is a new collection, so its children are re-homed onto it.
impl Clone for Dictionary {
    fn clone(&self) -> Self {
        let id = CollectionId::next();
        let pairs = self
            .pairs
            .iter()
            .map(|pair| {
                let mut pair = pair.clone();
                pair.key.set_parent(Some(id));
                pair.value.set_parent(Some(id));
                pair
            })
            .collect();
        let pending = match &self.pending {
            SmartAddState::Empty => SmartAddState::Empty,
            SmartAddState::AwaitingValue(key) => {
                let mut key = key.clone();
                key.set_parent(Some(id));
                SmartAddState::AwaitingValue(key)
            }
        };
        Self {
            id,
            parent: self.parent,
            pairs,
            pending,
            sorted: self.sorted,
        }
    }
}

/// Structural equality: the same keys with equal values, in any order.
impl PartialEq for Dictionary {
    fn eq(&self, other: &Self) -> bool {
        self.pending == other.pending
            && self.pairs.len() == other.pairs.len()
            && self.pairs.iter().all(|pair| {
                other
                    .position(&pair.key)
                    .is_some_and(|i| other.pairs[i].value == pair.value)
            })
    }
}

impl Eq for Dictionary {}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = &'a DictionaryPair;
    type IntoIter = slice::Iter<'a, DictionaryPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
