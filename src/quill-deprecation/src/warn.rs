//! One-shot deprecation warnings.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::sink;

/// A deduplicated warning: armed at construction, fired at most once.
///
/// Clones share the one-shot state, so the pieces of a single wrapper (a
/// getter/setter pair, a one-time migration step) consume the same single
/// shot. Independently constructed wrappers get independent instances.
#[derive(Clone)]
pub struct WarnOnce {
    inner: Arc<WarnOnceState>,
}

struct WarnOnceState {
    message: String,
    fired: AtomicBool,
}

impl WarnOnce {
    fn new(message: String) -> Self {
        Self {
            inner: Arc::new(WarnOnceState {
                message,
                fired: AtomicBool::new(false),
            }),
        }
    }

    /// Trigger the warning.
    ///
    /// Suppressed triggers are no-ops and do not consume the single shot.
    /// The first unsuppressed trigger reaches the sink; every later one is
    /// ignored, no matter how many callers race here.
    pub fn fire(&self) {
        if sink::no_deprecation() {
            return;
        }
        if self.inner.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        sink::log(&self.inner.message);
    }

    /// Whether the single shot has been consumed.
    pub fn has_fired(&self) -> bool {
        self.inner.fired.load(Ordering::SeqCst)
    }

    /// The message this warning reports.
    pub fn message(&self) -> &str {
        &self.inner.message
    }
}

impl std::fmt::Debug for WarnOnce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarnOnce")
            .field("message", &self.inner.message)
            .field("fired", &self.has_fired())
            .finish()
    }
}

/// One-shot warning with a caller-supplied message.
pub fn warn_once_message(message: impl Into<String>) -> WarnOnce {
    WarnOnce::new(message.into())
}

/// One-shot warning that `old_name` is deprecated, suggesting `new_name`
/// when there is a replacement to point at.
pub fn warn_once(old_name: &str, new_name: Option<&str>) -> WarnOnce {
    let message = match new_name {
        Some(new_name) => format!(
            "'{old_name}' is deprecated and will be removed. Please use '{new_name}' instead."
        ),
        None => format!("'{old_name}' is deprecated and will be removed."),
    };
    WarnOnce::new(message)
}

/// Immediate, non-deduplicated warning. Reports on every call unless
/// notices are suppressed.
pub fn warn(old_name: &str, new_name: &str) {
    if sink::no_deprecation() {
        return;
    }
    sink::log(&format!(
        "'{old_name}' is deprecated. Use '{new_name}' instead."
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_with_replacement() {
        let warning = warn_once("getAll", Some("getApplications"));
        assert_eq!(
            warning.message(),
            "'getAll' is deprecated and will be removed. Please use 'getApplications' instead."
        );
    }

    #[test]
    fn test_message_without_replacement() {
        let warning = warn_once("getAll", None);
        assert_eq!(warning.message(), "'getAll' is deprecated and will be removed.");
    }

    #[test]
    fn test_custom_message_kept_verbatim() {
        let warning = warn_once_message("the tray balloon is going away");
        assert_eq!(warning.message(), "the tray balloon is going away");
        assert!(!warning.has_fired());
    }
}
