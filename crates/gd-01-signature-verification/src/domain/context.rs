//! Domain separation for context-bound verification.
//!
//! The signed bytes are `message || context || len(context)`. The trailing
//! length byte stops a message ending in context-like bytes from colliding
//! with a different (message, context) split.

use crate::domain::errors::SignatureError;

pub const MAX_CONTEXT_LEN: usize = 255;

pub fn frame_with_context(message: &[u8], context: &[u8]) -> Result<Vec<u8>, SignatureError> {
    if context.is_empty() {
        return Err(SignatureError::EmptyContext);
    }
    if context.len() > MAX_CONTEXT_LEN {
        return Err(SignatureError::ContextTooLong(context.len()));
    }
    let mut framed = Vec::with_capacity(message.len() + context.len() + 1);
    framed.extend_from_slice(message);
    framed.extend_from_slice(context);
    framed.push(context.len() as u8);
    Ok(framed)
}
