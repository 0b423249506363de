//! Core chain types: block hashes, chain positions, candidate block summaries.
//!
//! Heights and timestamps use u64 throughout. Timestamps are Unix seconds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HashParseError;

/// A 32-byte block hash.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The zero hash (32 zero bytes). Used as the parent of the genesis block.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create a Hash256 from a byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero hash.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse a hash from 64 hex characters, with or without a `0x` prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use cali_core::types::Hash256;
    /// let h = Hash256::from_hex("0x0101010101010101010101010101010101010101010101010101010101010101").unwrap();
    /// assert_eq!(h, Hash256([1; 32]));
    /// ```
    pub fn from_hex(s: &str) -> Result<Self, HashParseError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != 64 {
            return Err(HashParseError::InvalidLength(digits.len()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| HashParseError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for Hash256 {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A block's place in the local chain index.
///
/// Produced and owned by the chain index; checkpoint code only reads it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainPosition {
    /// Hash of the block.
    pub hash: Hash256,
    /// Height above genesis (genesis is 0).
    pub height: u64,
    /// Block timestamp in Unix seconds.
    pub timestamp: u64,
    /// Cumulative number of transactions from genesis up to and including this block.
    pub chain_tx: u64,
}

/// Summary of a candidate block as handed to the chain index.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockMeta {
    /// Hash of the candidate block.
    pub hash: Hash256,
    /// Hash of its parent. `Hash256::ZERO` for genesis.
    pub prev_hash: Hash256,
    /// Block timestamp in Unix seconds.
    pub timestamp: u64,
    /// Number of transactions in this block alone.
    pub tx_count: u64,
}
