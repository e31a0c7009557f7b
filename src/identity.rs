//! Who is reading the feed.
//!
//! The feed loader needs to know three things about the reader: whether the
//! identity is still being resolved, whether they are signed in, and their
//! user id.  Any change to these resets the feed.

use crate::source::UserId;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Identity {
    /// Resolution still pending.  No fetch is issued while this is set.
    pub loading: bool,
    pub authenticated: bool,
    pub user: Option<UserId>,
}

impl Identity {
    pub fn loading() -> Self {
        Self {
            loading: true,
            authenticated: false,
            user: None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            loading: false,
            authenticated: false,
            user: None,
        }
    }

    pub fn signed_in(user: UserId) -> Self {
        Self {
            loading: false,
            authenticated: true,
            user: Some(user),
        }
    }

    /// The user id to personalise with, if resolved and signed in.
    pub fn user(&self) -> Option<&UserId> {
        if self.loading || !self.authenticated {
            return None;
        }
        self.user.as_ref()
    }

    /// Short label for the status bar.
    pub fn label(&self) -> String {
        match (self.loading, self.user()) {
            (true, _) => "signing in…".to_string(),
            (false, Some(user)) => format!("@{user}"),
            (false, None) => "guest".to_string(),
        }
    }
}

/// Resolve the reader's identity from the configured user id.
///
/// Runs as a background task so the feed starts in the loading state and
/// only fetches once the identity is known.
pub async fn resolve(user_id: Option<String>) -> Identity {
    match user_id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty()) {
        Some(id) => {
            tracing::info!(user = %id, "identity resolved");
            Identity::signed_in(UserId::new(id))
        }
        None => {
            tracing::info!("no user configured, browsing as guest");
            Identity::anonymous()
        }
    }
}
