use crate::store::{ReviewStore, StoreError, UnitOfWork};
use review_sync_config::{Config, CredentialStore};
use review_sync_models::ReviewRecord;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("review {0} not found")]
    NotFound(i64),

    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Shared-secret check for administrative operations.
///
/// With no token configured every administrative request is rejected.
#[derive(Debug, Clone, Default)]
pub struct AdminAuth {
    token: Option<String>,
}

impl AdminAuth {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Config (and its env overrides) first, then the credential store
    pub fn from_config(config: &Config, credentials: &CredentialStore) -> Self {
        let token = config
            .admin
            .token
            .clone()
            .or_else(|| credentials.get_admin_token().cloned());
        Self::new(token)
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    pub fn authorize(&self, presented: Option<&str>) -> Result<(), ModerationError> {
        match (&self.token, presented) {
            (Some(expected), Some(given)) if tokens_match(expected, given) => Ok(()),
            _ => Err(ModerationError::Unauthorized),
        }
    }
}

/// Byte comparison whose running time does not depend on where the tokens differ
fn tokens_match(expected: &str, given: &str) -> bool {
    expected.len() == given.len()
        && expected
            .bytes()
            .zip(given.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Set the moderation flag of one review.
///
/// Authorization is checked before the lookup, so an unauthorized caller
/// cannot learn which ids exist.
pub fn set_hidden<S: ReviewStore + ?Sized>(
    store: &mut S,
    auth: &AdminAuth,
    presented: Option<&str>,
    id: i64,
    hidden: bool,
) -> Result<ReviewRecord, ModerationError> {
    if let Err(e) = auth.authorize(presented) {
        warn!(review_id = id, "Rejected moderation request");
        return Err(e);
    }

    let mut uow = UnitOfWork::begin(store);
    let mut record = uow.get(id)?.ok_or(ModerationError::NotFound(id))?;
    record.hidden = hidden;
    uow.insert(record.clone());
    uow.commit()?;

    info!(review_id = id, hidden, "Updated review visibility");
    Ok(record)
}

pub fn hide_review<S: ReviewStore + ?Sized>(
    store: &mut S,
    auth: &AdminAuth,
    presented: Option<&str>,
    id: i64,
) -> Result<ReviewRecord, ModerationError> {
    set_hidden(store, auth, presented, id, true)
}

pub fn show_review<S: ReviewStore + ?Sized>(
    store: &mut S,
    auth: &AdminAuth,
    presented: Option<&str>,
    id: i64,
) -> Result<ReviewRecord, ModerationError> {
    set_hidden(store, auth, presented, id, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::path::PathBuf;

    fn store_with(id: i64) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.commit(vec![ReviewRecord::with_id(id)]).unwrap();
        store
    }

    fn auth() -> AdminAuth {
        AdminAuth::new(Some("s3cret".to_string()))
    }

    #[test]
    fn test_hide_and_show() {
        let mut store = store_with(7001);

        let hidden = hide_review(&mut store, &auth(), Some("s3cret"), 7001).unwrap();
        assert!(hidden.hidden);
        assert!(store.get(7001).unwrap().unwrap().hidden);

        show_review(&mut store, &auth(), Some("s3cret"), 7001).unwrap();
        assert!(!store.get(7001).unwrap().unwrap().hidden);
    }

    #[test]
    fn test_hide_is_idempotent() {
        let mut store = store_with(-5);
        hide_review(&mut store, &auth(), Some("s3cret"), -5).unwrap();
        hide_review(&mut store, &auth(), Some("s3cret"), -5).unwrap();
        assert!(store.get(-5).unwrap().unwrap().hidden);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut store = store_with(1);
        assert!(matches!(
            hide_review(&mut store, &auth(), Some("s3cret"), 2),
            Err(ModerationError::NotFound(2))
        ));
    }

    #[test]
    fn test_unauthorized_is_checked_first() {
        let mut store = store_with(1);
        assert!(matches!(
            hide_review(&mut store, &auth(), Some("wrong"), 2),
            Err(ModerationError::Unauthorized)
        ));
        assert!(matches!(
            show_review(&mut store, &auth(), None, 1),
            Err(ModerationError::Unauthorized)
        ));
        assert!(!store.get(1).unwrap().unwrap().hidden);
    }

    #[test]
    fn test_unconfigured_auth_rejects_everything() {
        let auth = AdminAuth::new(Some("   ".to_string()));
        assert!(!auth.is_configured());
        assert!(auth.authorize(Some("")).is_err());
        assert!(AdminAuth::default().authorize(Some("anything")).is_err());
    }

    #[test]
    fn test_from_config_prefers_config_token() {
        let mut credentials = CredentialStore::new(PathBuf::from("/nonexistent/credentials.toml"));
        credentials.set_admin_token("stored".to_string());

        let mut config = Config::default();
        assert!(AdminAuth::from_config(&config, &credentials).authorize(Some("stored")).is_ok());

        config.admin.token = Some("from-env".to_string());
        let auth = AdminAuth::from_config(&config, &credentials);
        assert!(auth.authorize(Some("from-env")).is_ok());
        assert!(auth.authorize(Some("stored")).is_err());
    }

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("dashboard", "dashboard"));
        assert!(!tokens_match("dashboard", "dashboarc"));
        assert!(!tokens_match("dashboard", "dash"));
        assert!(!tokens_match("dash", "dashboard"));
        assert!(!tokens_match("dashboard", ""));

        let auth = AdminAuth::new(Some("dashboard".to_string()));
        assert!(auth.authorize(Some("dashboard")).is_ok());
        assert!(auth.authorize(Some("Dashboard")).is_err());
        assert!(auth.authorize(Some("dashboard ")).is_err());
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(Some("bearer   abc ")), Some("abc"));
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(Some("abc")), None);
        assert_eq!(bearer_token(None), None);
    }
}
