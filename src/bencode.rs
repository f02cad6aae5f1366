//! Bencode element tree ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files and tracker
//! responses.
//!
//! # Data Types
//!
//! Every node of the tree is an [`Element`]:
//!
//! | Element | Format | Example |
//! |---------|--------|---------|
//! | [`BInteger`] | `i<number>e` | `i42e` → 42 |
//! | [`BString`] | `<length>:<data>` | `4:spam` → "spam" |
//! | [`List`] | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | [`Dictionary`] | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! Lists and dictionaries implement [`Collection`]. Each child records the
//! [`CollectionId`] of the collection it is attached to as its parent.
//!
//! # Examples
//!
//! ## Morphing host values
//!
//! ```
//! use rbencode::bencode::{Element, Native};
//! use std::collections::BTreeMap;
//!
//! let mut info = BTreeMap::new();
//! info.insert("name", Element::morph("example.txt").unwrap());
//! info.insert("length", Element::morph(1024).unwrap());
//!
//! let mut element = Element::morph(info).unwrap();
//! assert_eq!(element.encode().as_ref(), b"d6:lengthi1024e4:name11:example.txte");
//!
//! let native = element.un_morph();
//! assert_eq!(native.get(b"length").and_then(Native::as_integer), Some(1024));
//! ```
//!
//! ## Building a dictionary
//!
//! Keys can be added in any order; encoding always emits them sorted.
//!
//! ```
//! use rbencode::bencode::{Dictionary, List};
//!
//! let mut tiers = List::new();
//! tiers.push(vec!["http://tracker.example.com/announce"]).unwrap();
//!
//! let mut torrent = Dictionary::new();
//! torrent.set("announce", "http://tracker.example.com/announce").unwrap();
//! torrent.set("announce-list", tiers).unwrap();
//! torrent.set("comment", "hello").unwrap();
//! torrent.set("comment", "replaced").unwrap();
//!
//! assert_eq!(torrent.len(), 3);
//! assert!(torrent.encode().starts_with(b"d8:announce35:http://"));
//! ```
//!
//! ## Token-by-token population
//!
//! ```
//! use rbencode::bencode::{Collection, Dictionary, Element};
//!
//! let mut dict = Dictionary::new();
//! for token in ["b", "2", "a", "1"] {
//!     dict.smart_add(Element::morph(token).unwrap()).unwrap();
//! }
//! dict.finish().unwrap();
//! assert_eq!(dict.encode().as_ref(), b"d1:a1:11:b1:2e");
//! ```
//!
//! # Error Handling
//!
//! - [`BencodeError::InvalidKey`] - A dictionary key is not a string
//! - [`BencodeError::DanglingKey`] - A key was staged without a value
//! - [`BencodeError::Unrepresentable`] - A host value has no bencode form
//! - [`BencodeError::UnexpectedEof`] - Input ended unexpectedly
//! - [`BencodeError::InvalidInteger`] - Malformed integer (e.g., leading zeros)
//! - [`BencodeError::UnexpectedChar`] - Unexpected character in input
//! - [`BencodeError::NestingTooDeep`] - Recursion limit exceeded (max 64 levels)
//! - [`BencodeError::TrailingData`] - Extra data after the value
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod dictionary;
mod element;
mod error;
mod list;
mod native;
mod scalar;

pub use decode::{decode, decode_with, DecodeConfig};
pub use dictionary::{Dictionary, DictionaryPair, SmartAddState};
pub use element::{Collection, CollectionId, Element};
pub use error::BencodeError;
pub use list::List;
pub use native::{IntoElement, Native};
pub use scalar::{BInteger, BString};

#[cfg(test)]
mod tests;
