use crate::SerializationError;
use rebound_core::BallAction;

/// Turns ball snapshots into frames and back.
pub trait Serializer: Send + Sync {
    fn serialize(&self, action: &BallAction) -> Result<Vec<u8>, SerializationError>;

    fn deserialize(&self, frame: &[u8]) -> Result<BallAction, SerializationError>;

    fn name(&self) -> &'static str;
}

/// One JSON object per frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, action: &BallAction) -> Result<Vec<u8>, SerializationError> {
        Ok(serde_json::to_vec(action)?)
    }

    fn deserialize(&self, frame: &[u8]) -> Result<BallAction, SerializationError> {
        Ok(serde_json::from_slice(frame)?)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// bincode-encoded snapshot, base64 wrapped for line-oriented transports.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinarySerializer;

impl Serializer for BinarySerializer {
    fn serialize(&self, action: &BallAction) -> Result<Vec<u8>, SerializationError> {
        let raw = bincode::serialize(action)?;
        Ok(base64::encode(raw).into_bytes())
    }

    fn deserialize(&self, frame: &[u8]) -> Result<BallAction, SerializationError> {
        let raw = base64::decode(String::from_utf8_lossy(frame).trim())?;
        Ok(bincode::deserialize(&raw)?)
    }

    fn name(&self) -> &'static str {
        "binary"
    }
}
