//! Ephemeral push session state.
//!
//! A [`PushSession`] holds the session token for exactly one push
//! invocation. It is created from the login response's `set-cookie` header
//! and dropped when the push completes; it is never persisted or shared
//! across calls.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PushError, PushResult};

/// Cookie name carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// Matches `session_id=<token>;` inside a `set-cookie` header value.
static SESSION_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"session_id=(\S*);").expect("SESSION_TOKEN_REGEX is a valid regex pattern")
});

/// Authenticated context for one push operation.
#[derive(Debug, Clone)]
pub struct PushSession {
    token: String,
}

impl PushSession {
    /// Extract the session token from a `set-cookie` response header value.
    pub fn from_set_cookie(header: &str) -> PushResult<Self> {
        let captures = SESSION_TOKEN_REGEX.captures(header).ok_or_else(|| {
            PushError::Authentication("missing session token in set-cookie header".to_string())
        })?;

        Ok(Self {
            token: captures[1].to_string(),
        })
    }

    /// The session token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The `Cookie` header value to attach to authenticated requests.
    pub fn cookie_header(&self) -> String {
        format!("{SESSION_COOKIE_NAME}={};", self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_from_set_cookie() {
        let session = PushSession::from_set_cookie("session_id=sessid1; Path=/; HttpOnly").unwrap();
        assert_eq!(session.token(), "sessid1");
        assert_eq!(session.cookie_header(), "session_id=sessid1;");
    }

    #[test]
    fn rejects_cookie_without_session_id() {
        let err = PushSession::from_set_cookie("cook").unwrap_err();
        assert!(err.to_string().contains("missing session token"));
    }

    #[test]
    fn rejects_unterminated_token() {
        // The token must be `;`-terminated, as the service emits it.
        let err = PushSession::from_set_cookie("session_id=sessid1").unwrap_err();
        assert!(matches!(err, PushError::Authentication(_)));
    }
}
