//! Session configuration

use serde::Deserialize;

use crate::domain::foundation::UserId;

use super::error::ValidationError;

/// Identifies whose interview is being run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Owner of the interview; scopes every stored document.
    pub user_id: Option<String>,
}

impl SessionConfig {
    /// The configured user id.
    ///
    /// # Errors
    /// `MissingRequired` when absent or blank.
    pub fn user_id(&self) -> Result<UserId, ValidationError> {
        self.user_id
            .as_deref()
            .and_then(|id| UserId::new(id).ok())
            .ok_or(ValidationError::MissingRequired("session.user_id"))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.user_id().map(|_| ())
    }
}
