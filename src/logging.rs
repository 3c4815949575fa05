// src/logging.rs
//! Query logging hook — sanitization + request correlation
//!
//! Drivers behind the [`Connector`](crate::registry::Connector) seam call
//! [`log_query`] from their query path; the registry logs lifecycle
//! events itself.

use std::cell::RefCell;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

static PASSWORD_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)password\s*=\s*'[^']*'").unwrap());

/// Redact quoted password assignments before a statement is logged.
pub fn sanitize_query(sql: &str) -> String {
    PASSWORD_ASSIGNMENT
        .replace_all(sql, "password='[REDACTED]'")
        .into_owned()
}

thread_local! {
    static REQUEST_ID: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Tag subsequent log entries on this thread with a correlation id.
pub fn set_request_id(id: impl Into<String>) {
    REQUEST_ID.with(|cell| *cell.borrow_mut() = Some(id.into()));
}

pub fn clear_request_id() {
    REQUEST_ID.with(|cell| *cell.borrow_mut() = None);
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.with(|cell| cell.borrow().clone())
}

/// Run `f` with an ambient request id, restoring the previous one after.
pub fn with_request_id<T>(id: impl Into<String>, f: impl FnOnce() -> T) -> T {
    let previous = REQUEST_ID.with(|cell| cell.borrow_mut().replace(id.into()));
    let result = f();
    REQUEST_ID.with(|cell| *cell.borrow_mut() = previous);
    result
}

/// Structured log entry for one executed statement.
pub fn log_query(db_key: &str, sql: &str, elapsed: Option<Duration>) {
    let request_id = current_request_id();
    tracing::info!(
        target: "encrypted_db_registry::query",
        db_key,
        sql = %sanitize_query(sql),
        elapsed_ms = elapsed.map(|d| d.as_millis() as u64),
        request_id = request_id.as_deref(),
        "database query"
    );
}
