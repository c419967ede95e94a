//! Notice sink: the single reporting channel every deprecation notice
//! flows through.
//!
//! Policy is evaluated in order on every [`log`] call: a registered custom
//! handler wins; otherwise the host's throw flag turns the notice into a
//! hard failure, the trace flag attaches a captured backtrace, and the
//! default is a tagged warning line.

use std::backtrace::Backtrace;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::warn;

/// Log target for deprecation output.
const TARGET: &str = "quill::deprecation";

/// Tag prefixed to console warnings.
const APP_TAG: &str = "(quill)";

/// Custom notice handler registered by the host or an embedder.
pub type DeprecationHandler = Arc<dyn Fn(&str) + Send + Sync>;

static HANDLER: Lazy<RwLock<Option<DeprecationHandler>>> = Lazy::new(|| RwLock::new(None));

// Host flags. Loaded fresh on every notice emission, never captured at
// wrap time.
static NO_DEPRECATION: AtomicBool = AtomicBool::new(false);
static THROW_DEPRECATION: AtomicBool = AtomicBool::new(false);
static TRACE_DEPRECATION: AtomicBool = AtomicBool::new(false);

/// Replace the custom notice handler. `None` clears it and restores the
/// throw/trace/console fallback chain.
pub fn set_handler(handler: Option<DeprecationHandler>) {
    *HANDLER.write() = handler;
}

/// Currently registered custom handler, if any.
pub fn handler() -> Option<DeprecationHandler> {
    HANDLER.read().clone()
}

/// Suppress every deprecation notice.
pub fn set_no_deprecation(value: bool) {
    NO_DEPRECATION.store(value, Ordering::SeqCst);
}

/// Whether deprecation notices are suppressed.
pub fn no_deprecation() -> bool {
    NO_DEPRECATION.load(Ordering::SeqCst)
}

/// Turn deprecation notices into hard failures.
pub fn set_throw_deprecation(value: bool) {
    THROW_DEPRECATION.store(value, Ordering::SeqCst);
}

/// Whether deprecation notices are promoted to hard failures.
pub fn throw_deprecation() -> bool {
    THROW_DEPRECATION.load(Ordering::SeqCst)
}

/// Attach a captured backtrace to deprecation notices.
pub fn set_trace_deprecation(value: bool) {
    TRACE_DEPRECATION.store(value, Ordering::SeqCst);
}

/// Whether deprecation notices carry a captured backtrace.
pub fn trace_deprecation() -> bool {
    TRACE_DEPRECATION.load(Ordering::SeqCst)
}

/// Read the `QUILL_NO_DEPRECATION`, `QUILL_THROW_DEPRECATION`, and
/// `QUILL_TRACE_DEPRECATION` environment toggles into the host flags.
/// The host calls this once at startup.
pub fn init_from_env() {
    set_no_deprecation(env_flag("QUILL_NO_DEPRECATION"));
    set_throw_deprecation(env_flag("QUILL_THROW_DEPRECATION"));
    set_trace_deprecation(env_flag("QUILL_TRACE_DEPRECATION"));
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false"))
        .unwrap_or(false)
}

/// Report one deprecation notice through the configured channel.
///
/// Panics when the throw flag is set and no custom handler is registered.
pub fn log(message: &str) {
    if let Some(handler) = handler() {
        handler(message);
        return;
    }
    if throw_deprecation() {
        panic!("{message}");
    }
    if trace_deprecation() {
        let backtrace = Backtrace::force_capture();
        warn!(target: TARGET, %backtrace, "{message}");
        return;
    }
    warn!(target: TARGET, "{APP_TAG} {message}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_handler_round_trip() {
        assert!(handler().is_none());

        let noop: DeprecationHandler = Arc::new(|_message| {});
        set_handler(Some(noop));
        assert!(handler().is_some());

        set_handler(None);
        assert!(handler().is_none());
    }

    #[test]
    #[serial]
    fn test_env_flag_parsing() {
        std::env::remove_var("QUILL_NO_DEPRECATION");
        assert!(!env_flag("QUILL_NO_DEPRECATION"));

        std::env::set_var("QUILL_NO_DEPRECATION", "1");
        assert!(env_flag("QUILL_NO_DEPRECATION"));

        std::env::set_var("QUILL_NO_DEPRECATION", "0");
        assert!(!env_flag("QUILL_NO_DEPRECATION"));

        std::env::set_var("QUILL_NO_DEPRECATION", "false");
        assert!(!env_flag("QUILL_NO_DEPRECATION"));

        std::env::set_var("QUILL_NO_DEPRECATION", "true");
        assert!(env_flag("QUILL_NO_DEPRECATION"));

        std::env::remove_var("QUILL_NO_DEPRECATION");
    }

    #[test]
    #[serial]
    fn test_init_from_env_sets_flags() {
        std::env::set_var("QUILL_NO_DEPRECATION", "1");
        std::env::remove_var("QUILL_THROW_DEPRECATION");
        std::env::remove_var("QUILL_TRACE_DEPRECATION");

        init_from_env();
        assert!(no_deprecation());
        assert!(!throw_deprecation());
        assert!(!trace_deprecation());

        std::env::remove_var("QUILL_NO_DEPRECATION");
        set_no_deprecation(false);
    }
}
