//! Record codec: order ↔ storage bytes.
//!
//! The storage representation is self-describing JSON. `encode` and `decode`
//! are inverses: for every valid order, `decode(encode(order)) == order`.
//! Bytes produced by `encode` always decode, so a decode failure on a stored
//! record means the record is corrupt and the operation must fail, never
//! retry.

use thiserror::Error;

use super::model::Order;

/// Codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed order record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Serialize an order into its storage representation.
pub fn encode(order: &Order) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(order)?)
}

/// Deserialize an order from its storage representation.
pub fn decode(bytes: &[u8]) -> Result<Order, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}
