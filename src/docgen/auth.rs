//! Admin capability and anti-forgery checks for state-changing requests.
//!
//! Every admin operation names an [`Action`]. The guard hands out one random token per
//! action; a request is accepted only when the caller holds the admin capability and
//! presents the current token for that action. Checks run before any filesystem work.

use crate::error::{DocgenError, Result};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// `check_migration` and `migrate_files`.
    Migration,
    /// Settings, uploads, directory tests and cleanup.
    Admin,
}

#[derive(Debug, Clone)]
pub struct AdminRequest {
    pub is_admin: bool,
    pub token: String,
}

impl AdminRequest {
    pub fn new(is_admin: bool, token: impl Into<String>) -> Self {
        Self {
            is_admin,
            token: token.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RequestGuard {
    tokens: HashMap<Action, String>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh token for `action`, invalidating the previous one.
    pub fn issue(&mut self, action: Action) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(action, token.clone());
        token
    }

    pub fn check(&self, action: Action, request: &AdminRequest) -> Result<()> {
        if !request.is_admin {
            tracing::warn!(?action, "rejected request without admin capability");
            return Err(DocgenError::PermissionDenied);
        }
        match self.tokens.get(&action) {
            Some(expected) if !request.token.is_empty() && *expected == request.token => Ok(()),
            _ => {
                tracing::warn!(?action, "rejected request with invalid token");
                Err(DocgenError::InvalidToken)
            }
        }
    }
}
