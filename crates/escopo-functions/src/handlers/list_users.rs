//! `POST /listUsers` — every account joined with its profile, newest first.

use axum::extract::State;
use bytes::Bytes;
use escopo_core::{
  directory::{CombinedUserView, LIST_PAGE_SIZE, combine_users},
  profile::USERS_COLLECTION,
  provider::{IdentityProvider, ProfileStore},
};

use crate::{
  AppState,
  auth::{Caller, caller_uid, require_admin},
  callable::{Callable, parse_data},
  error::CallableError,
};

const DENIED: &str =
  "Permissão negada. Apenas administradores podem listar usuários.";
const UNKNOWN_FAILURE: &str =
  "Ocorreu um erro desconhecido ao processar a solicitação de usuários.";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub async fn handler<I, P>(
  State(state): State<AppState<I, P>>,
  Caller(caller): Caller,
  body: Bytes,
) -> Result<Callable<Vec<CombinedUserView>>, CallableError>
where
  I: IdentityProvider + 'static,
  P: ProfileStore + 'static,
{
  tracing::info!(caller = caller_uid(&caller), "listUsers called");
  let caller = require_admin(caller, DENIED)?;
  // The payload carries nothing, but it must still be a callable envelope.
  parse_data(&body)?;

  let users = fetch_directory(&state).await.map_err(|e| {
    tracing::error!(error = %e, "error listing users");
    internal_error(&e)
  })?;

  tracing::info!(caller = %caller.uid, count = users.len(), "fetched users");
  Ok(Callable(users))
}

async fn fetch_directory<I, P>(
  state: &AppState<I, P>,
) -> Result<Vec<CombinedUserView>, BoxError>
where
  I: IdentityProvider,
  P: ProfileStore,
{
  let identities = state.identity.list_identities(LIST_PAGE_SIZE).await?;
  if identities.len() >= LIST_PAGE_SIZE {
    tracing::warn!(
      limit = LIST_PAGE_SIZE,
      "identity listing reached the page size; directory may be truncated"
    );
  }
  let profiles = state.profiles.list_documents(USERS_COLLECTION).await?;
  Ok(combine_users(identities, profiles))
}

/// The cause is passed through to the caller.
fn internal_error(e: &BoxError) -> CallableError {
  let cause = e.to_string();
  if cause.is_empty() {
    return CallableError::Internal(UNKNOWN_FAILURE.to_owned());
  }
  CallableError::Internal(format!(
    "Erro interno ao processar a solicitação de usuários: {cause}"
  ))
}
