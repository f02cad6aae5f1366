//! Codec limits.
//!
//! Defaults for [`DecodeConfig`](crate::bencode::DecodeConfig) and the sizes of
//! the BitTorrent digests computed over encoded dictionaries.

// ============================================================================
// Decoding
// ============================================================================

/// Deepest list/dictionary nesting the decoder accepts by default
pub const MAX_DEPTH: usize = 64;

// ============================================================================
// Info hashes
// ============================================================================

/// Length of a v1 (SHA-1) info hash in bytes
pub const V1_HASH_LEN: usize = 20;

/// Length of a v2 (SHA-256) info hash in bytes
pub const V2_HASH_LEN: usize = 32;
