//! rbencode - A typed Bencode element tree
//!
//! This library models Bencode ([BEP-3]) values as a tree of typed elements
//! and produces the canonical byte form BitTorrent peers and trackers expect.
//!
//! # Modules
//!
//! - [`bencode`] - Element tree, morphing, canonical encoding and decoding
//! - [`info_hash`] - BEP-3/52 info hashes of encoded dictionaries
//! - [`constants`] - Codec limits
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

pub mod bencode;
pub mod constants;
pub mod info_hash;

pub use bencode::{
    decode, decode_with, BInteger, BString, BencodeError, Collection, CollectionId, DecodeConfig,
    Dictionary, DictionaryPair, Element, IntoElement, List, Native, SmartAddState,
};
pub use info_hash::InfoHash;
