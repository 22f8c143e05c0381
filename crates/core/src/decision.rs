//! Response validation — from an untrusted completion reply to a [`Decision`].
//!
//! The reply is narrowed in three steps before it is interpreted:
//!
//! 1. **choices**: the response must carry a non-empty `choices` array
//! 2. **replies**: each choice contributes its `message.content` text, if any;
//!    choices without one are skipped, not rejected
//! 3. **single reply**: exactly one reply must survive
//!
//! Only then is the reply parsed as JSON and its `answer`/`description` keys
//! read. Finally the answer is bounds-checked against the stage's paths.
//! Every failure is terminal and is logged together with the raw payload.

use std::num::IntErrorKind;

use serde_json::Value;
use tracing::error;

use crate::error::DecisionError;
use crate::prompt::{ANSWER_KEY, DESCRIPTION_KEY};

/// A validated path choice, safe to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Zero-based index of an existing path in the active stage
    pub path: usize,

    /// The model's justification
    pub description: String,
}

impl Decision {
    /// The path number in the contract's one-based convention.
    pub fn one_based_path(&self) -> u64 {
        self.path as u64 + 1
    }
}

/// Validate a raw completion response against a stage with `path_count` paths.
pub fn extract_decision(raw: &Value, path_count: usize) -> Result<Decision, DecisionError> {
    let replies = match collect_replies(raw) {
        Ok(replies) => replies,
        Err(e) => {
            error!(payload = %raw, "Completion response has no usable choices");
            return Err(e);
        }
    };

    let reply = match replies.as_slice() {
        [reply] => *reply,
        _ => {
            error!(count = replies.len(), payload = %raw, "Incorrect number of replies");
            return Err(DecisionError::UnexpectedReplyCount {
                count: replies.len(),
            });
        }
    };

    let (answer, description) = parse_reply(reply).inspect_err(|_| {
        error!(reply, "Reply provided in incorrect format");
    })?;

    let path = usize::try_from(answer)
        .ok()
        .filter(|path| *path < path_count)
        .ok_or_else(|| {
            error!(%answer, path_count, reply, "Answer does not name an existing path");
            DecisionError::PathOutOfRange {
                path: answer,
                available: path_count,
            }
        })?;

    Ok(Decision { path, description })
}

/// Steps 1 and 2: every non-empty `message.content` string among the choices.
fn collect_replies(raw: &Value) -> Result<Vec<&str>, DecisionError> {
    let choices = raw
        .get("choices")
        .and_then(Value::as_array)
        .filter(|choices| !choices.is_empty())
        .ok_or(DecisionError::EmptyChoices)?;

    Ok(choices
        .iter()
        .filter_map(|choice| choice.get("message"))
        .filter_map(|message| message.get("content"))
        .filter_map(Value::as_str)
        .filter(|content| !content.is_empty())
        .collect())
}

/// Parse the single reply into its answer and description.
fn parse_reply(reply: &str) -> Result<(i128, String), DecisionError> {
    let malformed = |reason: &str| DecisionError::MalformedReply {
        reply: reply.to_string(),
        reason: reason.to_string(),
    };

    let parsed: Value = serde_json::from_str(reply).map_err(|e| malformed(&e.to_string()))?;
    let object = parsed
        .as_object()
        .ok_or_else(|| malformed("reply is not a JSON object"))?;

    let answer = object
        .get(ANSWER_KEY)
        .ok_or_else(|| malformed("missing 'answer'"))?;
    let answer = coerce_integer(answer).ok_or_else(|| malformed("'answer' is not an integer"))?;

    let description = object
        .get(DESCRIPTION_KEY)
        .ok_or_else(|| malformed("missing 'description'"))?
        .as_str()
        .ok_or_else(|| malformed("'description' is not a string"))?
        .to_string();

    Ok((answer, description))
}

/// Integers, integral floats, and decimal-integer strings.
///
/// Values beyond `i128` saturate; they still name no path.
fn coerce_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i128)),
        Value::String(s) => match s.trim().parse::<i128>() {
            Ok(n) => Some(n),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Some(i128::MAX),
                IntErrorKind::NegOverflow => Some(i128::MIN),
                _ => None,
            },
        },
        _ => None,
    }
}
