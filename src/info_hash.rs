//! Info hashes of encoded dictionaries ([BEP-3], [BEP-52]).
//!
//! A torrent is identified by the digest of the canonical encoding of its
//! `info` dictionary: SHA-1 for v1 torrents, SHA-256 for v2 torrents.
//!
//! # Examples
//!
//! ```
//! use rbencode::bencode::Dictionary;
//! use rbencode::InfoHash;
//!
//! let mut info = Dictionary::from_pairs([("name", "example.txt")]).unwrap();
//! info.set("length", 1024).unwrap();
//!
//! let hash = InfoHash::v1(&mut info);
//! assert!(hash.is_v1());
//! assert_eq!(InfoHash::from_hex(&hash.to_hex()).unwrap(), hash);
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html
//! [BEP-52]: http://bittorrent.org/beps/bep_0052.html

use crate::bencode::{BencodeError, Dictionary};
use crate::constants::{V1_HASH_LEN, V2_HASH_LEN};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoHash {
    V1([u8; V1_HASH_LEN]),
    V2([u8; V2_HASH_LEN]),
}

impl InfoHash {
    /// SHA-1 of the dictionary's canonical encoding.
    ///
    /// Takes the dictionary mutably because encoding sorts it.
    pub fn v1(info: &mut Dictionary) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(info.encode());
        InfoHash::V1(hasher.finalize().into())
    }

    /// SHA-256 of the dictionary's canonical encoding.
    pub fn v2(info: &mut Dictionary) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(info.encode());
        InfoHash::V2(hasher.finalize().into())
    }

    pub fn from_v1_bytes(bytes: &[u8]) -> Result<Self, BencodeError> {
        let arr = bytes
            .try_into()
            .map_err(|_| BencodeError::InvalidInfoHashLength)?;
        Ok(InfoHash::V1(arr))
    }

    pub fn from_v2_bytes(bytes: &[u8]) -> Result<Self, BencodeError> {
        let arr = bytes
            .try_into()
            .map_err(|_| BencodeError::InvalidInfoHashLength)?;
        Ok(InfoHash::V2(arr))
    }

    pub fn from_hex(s: &str) -> Result<Self, BencodeError> {
        let bytes = hex_decode(s).ok_or(BencodeError::InvalidInfoHashLength)?;
        match bytes.len() {
            V1_HASH_LEN => Self::from_v1_bytes(&bytes),
            V2_HASH_LEN => Self::from_v2_bytes(&bytes),
            _ => Err(BencodeError::InvalidInfoHashLength),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            InfoHash::V1(arr) => arr,
            InfoHash::V2(arr) => arr,
        }
    }

    pub fn is_v1(&self) -> bool {
        matches!(self, InfoHash::V1(_))
    }

    pub fn is_v2(&self) -> bool {
        matches!(self, InfoHash::V2(_))
    }

    pub fn to_hex(&self) -> String {
        hex_encode(self.as_bytes())
    }
}

impl fmt::Debug for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InfoHash({})", self.to_hex())
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", b);
        s
    })
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
