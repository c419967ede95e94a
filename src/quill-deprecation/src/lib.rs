//! Deprecation notices for Quill's embedder-facing API surface.
//!
//! Lets API maintainers mark functions, properties, and emitted events as
//! deprecated, renamed, or removed. Each caller that still exercises a
//! deprecated path is told about it exactly once per distinct warning,
//! through a pluggable reporting channel.
//!
//! Provides:
//! - A process-wide notice sink with a pluggable handler and
//!   throw/trace/console fallbacks ([`log`], [`set_handler`]).
//! - One-shot warning state machines ([`warn_once`], [`warn_once_message`])
//!   and an immediate variant ([`warn`]).
//! - Wrappers for deprecated functions ([`remove_function`],
//!   [`rename_function`], [`move_api`]), object properties
//!   ([`remove_property`], [`rename_property`]), and events ([`event`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use quill_deprecation::{rename_function, ApiFunction};
//! use serde_json::json;
//!
//! let get_applications = ApiFunction::new("getAll", |_args| json!(["browser"]));
//!
//! // Installed under the old name; warns the first caller, then delegates.
//! let get_all = rename_function(get_applications, "getApplications");
//! let apps = get_all.call(&[]);
//! ```
//!
//! Notices honor three host flags, read fresh on every emission: suppress
//! (`QUILL_NO_DEPRECATION`), throw (`QUILL_THROW_DEPRECATION`), and trace
//! (`QUILL_TRACE_DEPRECATION`).

pub mod events;
pub mod functions;
pub mod properties;
pub mod sink;
pub mod warn;

pub use events::{event, EventTransformer};
pub use functions::{move_api, remove_function, rename_function, ApiFunction};
pub use properties::{remove_property, rename_property, Getter, PropertyBag, PropertySlot, Setter};
pub use sink::{
    handler, init_from_env, log, no_deprecation, set_handler, set_no_deprecation,
    set_throw_deprecation, set_trace_deprecation, throw_deprecation, trace_deprecation,
    DeprecationHandler,
};
pub use warn::{warn, warn_once, warn_once_message, WarnOnce};

use thiserror::Error;

/// Errors surfaced at wrapper construction time.
#[derive(Error, Debug)]
pub enum DeprecationError {
    /// `remove_function` was handed an endpoint that no longer exists.
    #[error("'{0} function' is invalid or already marked for removal")]
    InvalidFunction(String),
}

pub type Result<T> = std::result::Result<T, DeprecationError>;
