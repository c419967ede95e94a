//! Bridging deprecated event names.
//!
//! A renamed event keeps firing under its old name for as long as anyone
//! still listens for it, with one warning the first time the legacy path
//! is taken. When nobody listens on the old name, emissions cost nothing
//! beyond the listener-count check.

use std::sync::Arc;

use quill_events::{Emitter, EventSubscription, INTERNAL_EVENT_PREFIX};
use serde_json::Value;

use crate::warn::warn_once;

/// Reshapes a new-name emission's arguments for re-emission under the old
/// name. Returning `None` suppresses the re-emission.
pub type EventTransformer = Arc<dyn Fn(&[Value]) -> Option<Vec<Value>> + Send + Sync>;

/// Subscribe to `new_name` and mirror its emissions under `old_name` while
/// listeners remain on the old name.
///
/// Internal events (new name starting with `-`) are bridged without a
/// replacement suggestion in the warning, since the new name is not part
/// of the documented surface.
pub fn event(
    emitter: &Arc<dyn Emitter>,
    old_name: &str,
    new_name: &str,
    transformer: Option<EventTransformer>,
) -> EventSubscription {
    let notice = if new_name.starts_with(INTERNAL_EVENT_PREFIX) {
        warn_once(&format!("{old_name} event"), None)
    } else {
        warn_once(
            &format!("{old_name} event"),
            Some(&format!("{new_name} event")),
        )
    };

    let hub = Arc::clone(emitter);
    let old = old_name.to_string();
    emitter.on(
        new_name,
        Arc::new(move |args: &[Value]| {
            if hub.listener_count(&old) == 0 {
                return;
            }
            notice.fire();
            match transformer.as_ref() {
                Some(transform) => {
                    if let Some(transformed) = transform(args) {
                        hub.emit(&old, &transformed);
                    }
                }
                None => hub.emit(&old, args),
            }
        }),
    )
}
