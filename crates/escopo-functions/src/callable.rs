//! The callable request/response envelope.
//!
//! Requests carry their payload as `{"data": ...}`; successful responses wrap
//! the handler output as `{"result": ...}`.

use axum::{
  Json,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::CallableError;

/// Successful callable output.
#[derive(Debug)]
pub struct Callable<T>(pub T);

impl<T: Serialize> IntoResponse for Callable<T> {
  fn into_response(self) -> Response { Json(json!({ "result": self.0 })).into_response() }
}

/// Extract the `data` payload from a raw request body.
///
/// An empty body is treated as `{"data": null}`.
pub fn parse_data(body: &[u8]) -> Result<Value, CallableError> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(Value::Null);
  }

  let mut envelope: Value = serde_json::from_slice(body).map_err(|e| {
    CallableError::InvalidArgument(format!("Corpo da requisição inválido: {e}"))
  })?;

  envelope
    .as_object_mut()
    .and_then(|o| o.remove("data"))
    .ok_or_else(|| {
      CallableError::InvalidArgument(
        "A requisição deve conter o campo \"data\".".to_owned(),
      )
    })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_body_is_null_data() {
    assert_eq!(parse_data(b"").unwrap(), Value::Null);
    assert_eq!(parse_data(b"  \n").unwrap(), Value::Null);
  }

  #[test]
  fn data_is_unwrapped() {
    let data = parse_data(br#"{"data":{"uid":"u1"}}"#).unwrap();
    assert_eq!(data["uid"], "u1");
  }

  #[test]
  fn missing_envelope_is_invalid() {
    let err = parse_data(br#"{"uid":"u1"}"#).unwrap_err();
    assert_eq!(err.status(), "INVALID_ARGUMENT");
  }

  #[test]
  fn malformed_json_is_invalid() {
    let err = parse_data(b"{not json").unwrap_err();
    assert!(matches!(err, CallableError::InvalidArgument(_)));
  }
}
