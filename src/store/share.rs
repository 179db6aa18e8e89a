//! Share codes: a plan packed into a URL-safe string.
//!
//! Format is JSON, compressed as an LZ4 frame, then lowercase hex.

use std::io::{Read, Write};

use thiserror::Error;
use tracing::warn;

use super::Plan;

/// Largest decompressed payload a share code may expand to.
pub const MAX_DECODED_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share code is not valid hex: {0}")]
    InvalidEncoding(String),
    #[error("share code failed to decompress: {0}")]
    Decompress(String),
    #[error("share code does not contain a valid plan: {0}")]
    InvalidPayload(String),
    #[error("failed to compress plan: {0}")]
    Compress(String),
    #[error("share code expands past {0} bytes")]
    TooLarge(usize),
}

pub fn encode(plan: &Plan) -> Result<String, ShareError> {
    let json = serde_json::to_vec(plan).map_err(|e| ShareError::InvalidPayload(e.to_string()))?;
    let mut encoder = lz4_flex::frame::FrameEncoder::new(Vec::new());
    encoder
        .write_all(&json)
        .map_err(|e| ShareError::Compress(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| ShareError::Compress(e.to_string()))?;
    Ok(hex::encode(compressed))
}

pub fn decode(code: &str) -> Result<Plan, ShareError> {
    decode_inner(code.trim()).inspect_err(|e| warn!(error = %e, "Rejected share code"))
}

fn decode_inner(code: &str) -> Result<Plan, ShareError> {
    let compressed = hex::decode(code).map_err(|e| ShareError::InvalidEncoding(e.to_string()))?;
    let decoder = lz4_flex::frame::FrameDecoder::new(compressed.as_slice());
    let mut json = Vec::new();
    decoder
        .take(MAX_DECODED_BYTES as u64 + 1)
        .read_to_end(&mut json)
        .map_err(|e| ShareError::Decompress(e.to_string()))?;
    if json.len() > MAX_DECODED_BYTES {
        return Err(ShareError::TooLarge(MAX_DECODED_BYTES));
    }
    serde_json::from_slice(&json).map_err(|e| ShareError::InvalidPayload(e.to_string()))
}
