//! Order state token codec
//!
//! The order state travels between flow stages as a URL query value:
//! JSON serialization followed by percent-encoding. The decoder is
//! deliberately forgiving since the token arrives from an address bar
//! the guest can edit: any malformed token yields an empty state
//! instead of an error, and a missing subtotal is recomputed from the
//! items.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use tracing::warn;

use shared::error::{OrderError, OrderResult};
use shared::order::{OrderState, compute_subtotal};

/// Characters left bare by `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode order state into a URL-safe token
pub fn encode_state(state: &OrderState) -> String {
    // serializing a struct of plain fields cannot fail
    let json = serde_json::to_string(state).unwrap_or_default();
    utf8_percent_encode(&json, COMPONENT).to_string()
}

/// Decode a token, falling back to an empty state on any failure
///
/// `None`, invalid percent sequences, invalid UTF-8, and malformed
/// JSON all produce the empty state (no items, subtotal zero). A
/// payload that omits its subtotal gets it recomputed from the items.
pub fn decode_state(token: Option<&str>) -> OrderState {
    let Some(token) = token else {
        return empty_state();
    };
    match try_decode_state(token) {
        Ok(state) => state,
        Err(e) => {
            warn!("discarding malformed state token: {e}");
            empty_state()
        }
    }
}

/// The well-defined empty draft: no items, subtotal zero
fn empty_state() -> OrderState {
    OrderState { subtotal: Some(0), ..OrderState::default() }
}

/// Strict decode for callers that need to distinguish failure
pub fn try_decode_state(token: &str) -> OrderResult<OrderState> {
    let json = percent_decode_str(token)
        .decode_utf8()
        .map_err(|_| OrderError::DecodeFailure)?;
    let mut state: OrderState =
        serde_json::from_str(&json).map_err(|_| OrderError::DecodeFailure)?;
    if state.subtotal.is_none() {
        state.subtotal = Some(compute_subtotal(&state.items));
    }
    Ok(state)
}
