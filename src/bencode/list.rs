use super::element::{Collection, CollectionId, Element};
use super::error::BencodeError;
use super::native::{IntoElement, Native};
use bytes::{BufMut, Bytes, BytesMut};
use std::slice;

/// An ordered sequence of elements, encoded as `l<items>e`.
///
/// # Examples
///
/// ```
/// use rbencode::bencode::List;
///
/// let mut list = List::new();
/// list.push("spam").unwrap();
/// list.push(42).unwrap();
/// assert_eq!(list.encode().as_ref(), b"l4:spami42ee");
/// ```
#[derive(Debug)]
pub struct List {
    id: CollectionId,
    parent: Option<CollectionId>,
    items: Vec<Element>,
}

impl List {
    pub fn new() -> Self {
        Self {
            id: CollectionId::next(),
            parent: None,
            items: Vec::new(),
        }
    }

    /// Builds a list by morphing every item of `source`.
    pub fn from_items<I, T>(source: I) -> Result<Self, BencodeError>
    where
        I: IntoIterator<Item = T>,
        T: IntoElement,
    {
        let mut list = Self::new();
        for item in source {
            list.push(item)?;
        }
        Ok(list)
    }

    /// Appends a value, morphing host values into elements.
    pub fn push<T: IntoElement>(&mut self, value: T) -> Result<(), BencodeError> {
        let element = value.into_element()?;
        self.attach(element);
        Ok(())
    }

    fn attach(&mut self, mut element: Element) {
        element.set_parent(Some(self.id));
        self.items.push(element);
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.items.get(index)
    }

    /// Mutable access to the item at `index`, for editing it in place.
    ///
    /// Assigning a whole new element through the reference leaves that
    /// element's parent unset; use [`replace`](List::replace) instead.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.items.get_mut(index)
    }

    /// Swaps the item at `index` for `value` and returns the detached old item.
    pub fn replace<T: IntoElement>(
        &mut self,
        index: usize,
        value: T,
    ) -> Result<Element, BencodeError> {
        let mut element = value.into_element()?;
        let slot = self
            .items
            .get_mut(index)
            .ok_or(BencodeError::IndexOutOfRange(index))?;

        element.set_parent(Some(self.id));
        let mut old = std::mem::replace(slot, element);
        old.set_parent(None);
        Ok(old)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Element> {
        self.items.iter()
    }

    pub fn encode(&mut self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf);
        buf.freeze()
    }

    pub(crate) fn encode_into(&mut self, buf: &mut BytesMut) {
        buf.put_u8(b'l');
        for item in &mut self.items {
            item.encode_into(buf);
        }
        buf.put_u8(b'e');
    }

    /// Lists have no bencode value equality; this is always false.
    pub fn compare(&self, _other: &Element) -> bool {
        false
    }

    pub fn un_morph(&self) -> Native {
        Native::List(self.items.iter().map(Element::un_morph).collect())
    }

    pub fn parent(&self) -> Option<CollectionId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<CollectionId>) {
        self.parent = parent;
    }
}

impl Collection for List {
    type Entry = Element;

    fn id(&self) -> CollectionId {
        self.id
    }

    fn count(&self) -> usize {
        self.items.len()
    }

    fn entries(&self) -> slice::Iter<'_, Element> {
        self.items.iter()
    }

    fn smart_add(&mut self, element: Element) -> Result<(), BencodeError> {
        self.attach(element);
        Ok(())
    }
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

// A clone is a new collection, so its children are re-homed onto it.
impl Clone for List {
    fn clone(&self) -> Self {
        let mut list = Self {
            id: CollectionId::next(),
            parent: self.parent,
            items: Vec::with_capacity(self.items.len()),
        };
        for item in &self.items {
            list.attach(item.clone());
        }
        list
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for List {}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Element;
    type IntoIter = slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
