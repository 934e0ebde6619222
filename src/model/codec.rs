//! Model-state blob codec.
//!
//! The host stores one opaque blob per context and overwrites it on every
//! mutation. The frame is a 4-byte magic, a 1-byte schema version and a
//! MessagePack payload; the encoding is an internal detail and never exposed
//! to external clients.

use crate::model::state::ModelState;
use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

const MAGIC: [u8; 4] = *b"TMDL";
const VERSION: u8 = 1;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("blob too short to hold a frame header")]
    TruncatedHeader,
    #[error("blob does not start with the model-state magic")]
    BadMagic,
    #[error("unsupported blob version {0}")]
    UnsupportedVersion(u8),
    #[error("payload encoding failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("payload decoding failed: {0}")]
    Decode(#[from] rmp_serde::decode::Error)
}

/// Serializes the state into the blob the host persists.
pub fn encode(state: &ModelState) -> Result<Bytes, CodecError> {
    let payload = rmp_serde::to_vec(state)?;
    let mut buf = BytesMut::with_capacity(MAGIC.len() + 1 + payload.len());
    buf.put_slice(&MAGIC);
    buf.put_u8(VERSION);
    buf.put_slice(&payload);
    Ok(buf.freeze())
}

/// Restores a state from a blob previously produced by [`encode`].
pub fn decode(blob: &[u8]) -> Result<ModelState, CodecError> {
    if blob.len() < MAGIC.len() + 1 {
        return Err(CodecError::TruncatedHeader);
    }
    let (header, payload) = blob.split_at(MAGIC.len() + 1);
    if header[..MAGIC.len()] != MAGIC {
        return Err(CodecError::BadMagic);
    }
    let version = header[MAGIC.len()];
    if version != VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    Ok(rmp_serde::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::Config;
    use crate::utils::test_utils::*;

    #[test]
    fn test_round_trip_empty_state() {
        let state = ModelState::empty(Config::default());
        let blob = encode(&state).unwrap();
        assert_eq!(decode(&blob).unwrap(), state);
    }

    #[test]
    fn test_round_trip_populated_state() {
        let mut state = generate_model();
        seed_player(&mut state, "A", 1120.5, "V1");
        seed_player(&mut state, "B", 987.25, "V2");
        state.players.get_mut("B").unwrap().is_guest = true;
        state.players.get_mut("B").unwrap().guest_matches = 2;
        state.players.get_mut("A").unwrap().add_role_weight("attack", 1.5);
        state.tier_bonus.insert("C".to_string(), 25.0);
        state.interactions.add_synergy("V1", "A", "B", 0.5);
        state.interactions.add_domination("V2", "B", "A", -0.3);

        let blob = encode(&state).unwrap();
        assert_eq!(decode(&blob).unwrap(), state);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let state = ModelState::empty(Config::default());
        let mut blob = encode(&state).unwrap().to_vec();
        blob[0] = b'X';

        assert!(matches!(decode(&blob), Err(CodecError::BadMagic)));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let state = ModelState::empty(Config::default());
        let mut blob = encode(&state).unwrap().to_vec();
        blob[4] = 99;

        assert!(matches!(decode(&blob), Err(CodecError::UnsupportedVersion(99))));
    }

    #[test]
    fn test_rejects_truncated_blob() {
        assert!(matches!(decode(b"TMD"), Err(CodecError::TruncatedHeader)));
    }
}
