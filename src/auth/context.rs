use serde::{Deserialize, Serialize};
use crate::errors::ServiceError;

/// Staff member the session belongs to, as returned by the login endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Shape of the persisted login response (`{message, token, user}`).
#[derive(Debug, Clone, Default, Deserialize)]
struct StoredSession {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<SessionUser>,
}

/// Represents the authenticated session for the current operation.
///
/// Every data-access call receives one of these explicitly; the bearer token
/// is only ever read through [`AuthContext::authorization_header`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthContext {
    token: Option<String>,
    /// The signed-in staff member, when the login response carried one
    pub user: Option<SessionUser>,
}

impl AuthContext {
    /// Create a new authentication context
    pub fn new(token: impl Into<String>, user: Option<SessionUser>) -> Self {
        let token = token.into();
        Self {
            token: if token.trim().is_empty() { None } else { Some(token) },
            user,
        }
    }

    /// Context with no credentials; requests go out with an empty header.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a context from the stored login payloads. The session-scoped copy
    /// wins over the persistent one; unreadable JSON yields an anonymous context.
    pub fn from_storage(session_value: Option<&str>, local_value: Option<&str>) -> Self {
        let raw = match session_value.or(local_value) {
            Some(raw) => raw,
            None => return Self::anonymous(),
        };

        match serde_json::from_str::<StoredSession>(raw) {
            Ok(stored) => Self {
                token: stored.token.filter(|t| !t.trim().is_empty()),
                user: stored.user,
            },
            Err(e) => {
                log::warn!("Ignoring unreadable stored session: {}", e);
                Self::anonymous()
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Value for the `Authorization` header: `Bearer <token>`, or empty.
    pub fn authorization_header(&self) -> String {
        match &self.token {
            Some(token) => format!("Bearer {}", token),
            None => String::new(),
        }
    }

    /// Fail early for operations that cannot run without a session
    pub fn require_authenticated(&self) -> Result<(), ServiceError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(ServiceError::Authentication("No active session".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_storage_preferred_over_local() {
        let session = r#"{"token":"session-token"}"#;
        let local = r#"{"token":"local-token"}"#;
        let auth = AuthContext::from_storage(Some(session), Some(local));
        assert_eq!(auth.authorization_header(), "Bearer session-token");

        let auth = AuthContext::from_storage(None, Some(local));
        assert_eq!(auth.authorization_header(), "Bearer local-token");
    }

    #[test]
    fn test_stored_user_is_read() {
        let stored = r#"{"message":"ok","token":"abc","user":{"id":7,"name":"Ada","email":"ada@example.org"}}"#;
        let auth = AuthContext::from_storage(None, Some(stored));
        assert!(auth.is_authenticated());
        let user = auth.user.unwrap();
        assert_eq!(user.id, Some(7));
        assert_eq!(user.email.as_deref(), Some("ada@example.org"));
    }

    #[test]
    fn test_missing_or_malformed_session() {
        let auth = AuthContext::from_storage(None, None);
        assert_eq!(auth.authorization_header(), "");
        assert!(auth.require_authenticated().is_err());

        let auth = AuthContext::from_storage(Some("not json"), Some(r#"{"token":"x"}"#));
        assert!(!auth.is_authenticated());

        let auth = AuthContext::from_storage(Some("{}"), None);
        assert_eq!(auth.authorization_header(), "");

        let auth = AuthContext::new("  ", None);
        assert!(!auth.is_authenticated());
    }
}
