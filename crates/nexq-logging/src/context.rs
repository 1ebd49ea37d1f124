//! Session context injection
//!
//! Thread-local storage for the signed-in user of the current messaging
//! session, so that every span opened in a scope carries the same user
//! label, role and run instance id.

use std::cell::RefCell;

use tracing::Span;
use uuid::Uuid;

/// Session context data stored in thread-local storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContextData {
    /// Display label of the signed-in user
    pub user: String,
    /// Supply-chain role of the user
    pub role: String,
    /// Unique id for this run of the client
    pub instance_id: Uuid,
}

thread_local! {
    static SESSION_CONTEXT: RefCell<Option<SessionContextData>> = const { RefCell::new(None) };
}

/// RAII guard for session context
///
/// Creating the guard sets the context for the current thread. Dropping it
/// restores whatever was set before.
///
/// # Example
///
/// ```ignore
/// use nexq_logging::SessionContextGuard;
///
/// let _guard = SessionContextGuard::new("ABC Electronics", "Manufacturer");
/// let _span = nexq_logging::session_span().entered();
///
/// tracing::info!("Opened conversation");
/// ```
pub struct SessionContextGuard {
    previous: Option<SessionContextData>,
}

impl SessionContextGuard {
    /// Set the session context for the current scope
    pub fn new(user: impl Into<String>, role: impl Into<String>) -> Self {
        Self::with_instance_id(user, role, Uuid::new_v4())
    }

    /// Set the session context with a specific instance id
    pub fn with_instance_id(
        user: impl Into<String>,
        role: impl Into<String>,
        instance_id: Uuid,
    ) -> Self {
        let previous = SESSION_CONTEXT.with(|ctx| ctx.borrow().clone());

        let new_ctx = SessionContextData {
            user: user.into(),
            role: role.into(),
            instance_id,
        };

        SESSION_CONTEXT.with(|ctx| *ctx.borrow_mut() = Some(new_ctx));

        Self { previous }
    }

    /// Get the current session context (if any)
    pub fn current() -> Option<SessionContextData> {
        SESSION_CONTEXT.with(|ctx| ctx.borrow().clone())
    }

    /// Get the current user label (if set)
    pub fn current_user() -> Option<String> {
        Self::current().map(|ctx| ctx.user)
    }

    /// Get the current instance id (if set)
    pub fn current_instance_id() -> Option<Uuid> {
        Self::current().map(|ctx| ctx.instance_id)
    }
}

impl Drop for SessionContextGuard {
    fn drop(&mut self) {
        SESSION_CONTEXT.with(|ctx| *ctx.borrow_mut() = self.previous.take());
    }
}

/// Span carrying the current session context as fields
///
/// JSON output includes span fields, so entering this span tags every
/// event beneath it with `user`, `role` and `instance_id`. Without an
/// active guard the fields are left empty.
pub fn session_span() -> Span {
    match SessionContextGuard::current() {
        Some(ctx) => tracing::info_span!(
            "session",
            user = %ctx.user,
            role = %ctx.role,
            instance_id = %ctx.instance_id
        ),
        None => tracing::info_span!(
            "session",
            user = tracing::field::Empty,
            role = tracing::field::Empty,
            instance_id = tracing::field::Empty
        ),
    }
}
