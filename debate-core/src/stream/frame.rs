//! Wire frames pushed by the producer.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{DebateError, DebateResult};
use crate::side::Side;
use crate::verdict::RawVerdictPayload;

/// Literal data line marking the normal end of a stream.
pub const TERMINATION_SENTINEL: &str = "[DONE]";

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// One debate turn.
    Message { speaker: Side, text: String },
    /// The judge's output, shape unconstrained.
    Verdict(RawVerdictPayload),
    /// The termination sentinel.
    Done,
}

#[derive(Deserialize)]
struct MessageBody {
    sender: Side,
    content: String,
}

/// Decode one frame's data payload.
pub fn decode_frame(data: &str) -> DebateResult<Frame> {
    let data = data.trim();
    if data == TERMINATION_SENTINEL {
        return Ok(Frame::Done);
    }

    let value: Value = serde_json::from_str(data)
        .map_err(|e| DebateError::decode(format!("invalid JSON: {e}")))?;
    let frame_type = match value.get("type") {
        Some(Value::String(t)) => t.clone(),
        Some(other) => {
            return Err(DebateError::decode(format!(
                "type discriminator is not a string: {other}"
            )))
        }
        None => return Err(DebateError::decode("missing type discriminator")),
    };

    match frame_type.as_str() {
        "message" => {
            let body: MessageBody = serde_json::from_value(value)
                .map_err(|e| DebateError::decode(format!("malformed message frame: {e}")))?;
            Ok(Frame::Message {
                speaker: body.sender,
                text: body.content,
            })
        }
        "verdict" => Ok(Frame::Verdict(value)),
        _ => Err(DebateError::UnknownFrameType(frame_type)),
    }
}
