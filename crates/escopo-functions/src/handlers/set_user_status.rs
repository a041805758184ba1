//! `POST /setUserStatus` — enable or disable one account.
//!
//! Payload: `{"data": {"uid": "<uid>", "disabled": true|false}}`.

use axum::extract::State;
use bytes::Bytes;
use escopo_core::{
  identity::IdentityPatch,
  provider::{IdentityProvider, ProfileStore},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  AppState,
  auth::{Caller, caller_uid, require_admin},
  callable::{Callable, parse_data},
  error::CallableError,
};

const DENIED: &str =
  "Permissão negada. Apenas administradores podem alterar o status de usuários.";
const INVALID_UID: &str = "O UID do usuário é obrigatório e deve ser uma string.";
const INVALID_DISABLED: &str =
  "O status \"disabled\" é obrigatório e deve ser um booleano.";
const UPDATE_FAILED: &str = "Erro ao atualizar o status do usuário.";

/// A validated request to flip an account's disabled flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
  pub uid:      String,
  pub disabled: bool,
}

impl StatusChange {
  /// Validate a raw payload. `uid` is checked before `disabled`.
  pub fn from_data(data: &Value) -> Result<Self, CallableError> {
    let uid = match data.get("uid") {
      Some(Value::String(uid)) if !uid.is_empty() => uid.clone(),
      _ => return Err(CallableError::InvalidArgument(INVALID_UID.to_owned())),
    };
    let Some(disabled) = data.get("disabled").and_then(Value::as_bool) else {
      return Err(CallableError::InvalidArgument(INVALID_DISABLED.to_owned()));
    };
    Ok(Self { uid, disabled })
  }
}

/// Success payload of `setUserStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
  pub message: String,
}

impl StatusMessage {
  pub fn for_state(disabled: bool) -> Self {
    let verb = if disabled { "desativado" } else { "ativado" };
    Self {
      message: format!("Usuário {verb} com sucesso."),
    }
  }
}

pub async fn handler<I, P>(
  State(state): State<AppState<I, P>>,
  Caller(caller): Caller,
  body: Bytes,
) -> Result<Callable<StatusMessage>, CallableError>
where
  I: IdentityProvider + 'static,
  P: ProfileStore + 'static,
{
  tracing::info!(
    caller = caller_uid(&caller),
    payload = %String::from_utf8_lossy(&body),
    "setUserStatus called"
  );
  let caller = require_admin(caller, DENIED)?;

  let change = StatusChange::from_data(&parse_data(&body)?)?;

  // Existence of `uid` is left to the provider.
  if let Err(e) = state
    .identity
    .update_identity(&change.uid, IdentityPatch::disabled(change.disabled))
    .await
  {
    tracing::error!(error = %e, uid = %change.uid, "error updating user status");
    return Err(CallableError::Internal(UPDATE_FAILED.to_owned()));
  }

  tracing::info!(
    caller = %caller.uid,
    uid = %change.uid,
    disabled = change.disabled,
    "updated user status"
  );
  Ok(Callable(StatusMessage::for_state(change.disabled)))
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn valid_payload() {
    let change = StatusChange::from_data(&json!({"uid": "u1", "disabled": true})).unwrap();
    assert_eq!(change, StatusChange {
      uid:      "u1".into(),
      disabled: true,
    });
  }

  #[test]
  fn uid_must_be_a_non_empty_string() {
    for data in [
      json!({"uid": "", "disabled": true}),
      json!({"uid": 42, "disabled": true}),
      json!({"disabled": true}),
      Value::Null,
    ] {
      assert_eq!(
        StatusChange::from_data(&data).unwrap_err(),
        CallableError::InvalidArgument(INVALID_UID.into()),
        "{data}"
      );
    }
  }

  #[test]
  fn disabled_must_be_a_boolean() {
    for data in [
      json!({"uid": "u1", "disabled": "true"}),
      json!({"uid": "u1", "disabled": 1}),
      json!({"uid": "u1"}),
    ] {
      assert_eq!(
        StatusChange::from_data(&data).unwrap_err(),
        CallableError::InvalidArgument(INVALID_DISABLED.into()),
        "{data}"
      );
    }
  }

  #[test]
  fn messages_reflect_new_state() {
    assert_eq!(
      StatusMessage::for_state(true).message,
      "Usuário desativado com sucesso."
    );
    assert_eq!(
      StatusMessage::for_state(false).message,
      "Usuário ativado com sucesso."
    );
  }
}
