//! Deprecated property wrappers over the shell's dynamic API objects.
//!
//! API objects expose named properties that are either plain data slots or
//! accessor pairs. [`PropertyBag`] is that descriptor table; the wrappers
//! swap a slot for an accessor pair that reports the deprecation before
//! delegating to the original behavior.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::sink;
use crate::warn::warn_once;

/// Property getter. Receives the owning bag so accessors can delegate to
/// sibling slots.
pub type Getter = Arc<dyn Fn(&PropertyBag) -> Value + Send + Sync>;

/// Property setter.
pub type Setter = Arc<dyn Fn(&PropertyBag, Value) + Send + Sync>;

/// One named property: a plain data value or an accessor pair.
#[derive(Clone)]
pub enum PropertySlot {
    /// Plain stored value.
    Data(Value),
    /// Accessor pair; an accessor slot always holds both halves.
    Accessor { get: Getter, set: Setter },
}

impl std::fmt::Debug for PropertySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Self::Accessor { .. } => f.write_str("Accessor"),
        }
    }
}

/// Descriptor table for one API object's named properties.
#[derive(Clone, Default)]
pub struct PropertyBag {
    slots: Arc<RwLock<HashMap<String, PropertySlot>>>,
}

impl PropertyBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a plain data property.
    pub fn insert_data(&self, name: impl Into<String>, value: Value) {
        self.slots.write().insert(name.into(), PropertySlot::Data(value));
    }

    /// Install an accessor pair.
    pub fn insert_accessor(&self, name: impl Into<String>, get: Getter, set: Setter) {
        self.slots
            .write()
            .insert(name.into(), PropertySlot::Accessor { get, set });
    }

    /// Whether a property of this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.read().contains_key(name)
    }

    /// Current slot for `name`, cloned out of the table.
    pub fn slot(&self, name: &str) -> Option<PropertySlot> {
        self.slots.read().get(name).cloned()
    }

    /// Read a property. Accessors run with the table lock released, so a
    /// getter may read sibling slots.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.slot(name)? {
            PropertySlot::Data(value) => Some(value),
            PropertySlot::Accessor { get, .. } => Some(get(self)),
        }
    }

    /// Write a property. Accessor slots run their setter; data and absent
    /// slots take the value directly.
    pub fn set(&self, name: &str, value: Value) {
        match self.slot(name) {
            Some(PropertySlot::Accessor { set, .. }) => set(self, value),
            _ => self.insert_data(name, value),
        }
    }
}

impl std::fmt::Debug for PropertyBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.slots.read().iter()).finish()
    }
}

/// Replace `removed_name`'s accessor pair with one that reports the pending
/// removal before delegating.
///
/// Objects that never had the accessor shape are left untouched: the
/// mismatch is logged through the sink and the bag comes back unchanged,
/// since this runs defensively at load time across objects of varying
/// shape. The setter's warning can be gated to `only_for_values`
/// membership; the delegation itself is never gated.
pub fn remove_property(
    bag: PropertyBag,
    removed_name: &str,
    only_for_values: Option<Vec<Value>>,
) -> PropertyBag {
    let (original_get, original_set) = match bag.slot(removed_name) {
        None => {
            sink::log(&format!(
                "Unable to remove property '{removed_name}' from an object that lacks it."
            ));
            return bag;
        }
        Some(PropertySlot::Data(_)) => {
            sink::log(&format!(
                "Unable to remove property '{removed_name}' from an object that lacks a getter / setter pair for it."
            ));
            return bag;
        }
        Some(PropertySlot::Accessor { get, set }) => (get, set),
    };

    let notice = warn_once(&format!("{removed_name} property"), None);
    let get_notice = notice.clone();
    bag.insert_accessor(
        removed_name,
        Arc::new(move |bag: &PropertyBag| {
            get_notice.fire();
            original_get(bag)
        }),
        Arc::new(move |bag: &PropertyBag, value: Value| {
            let should_warn = only_for_values
                .as_ref()
                .is_none_or(|values| values.contains(&value));
            if should_warn {
                notice.fire();
            }
            original_set(bag, value);
        }),
    );
    bag
}

/// Forward `old_name` to `new_name`, migrating the current value once when
/// the new slot does not exist yet. Every access through the old name
/// triggers the shared one-shot warning.
pub fn rename_property(bag: PropertyBag, old_name: &str, new_name: &str) -> PropertyBag {
    let notice = warn_once(old_name, Some(new_name));

    // One-time migration: the old value moves to the new slot, and the
    // move itself counts as deprecated usage.
    if bag.contains(old_name) && !bag.contains(new_name) {
        notice.fire();
        if let Some(value) = bag.get(old_name) {
            bag.insert_data(new_name, value);
        }
    }

    let get_key = new_name.to_string();
    let get_notice = notice.clone();
    let set_key = new_name.to_string();
    bag.insert_accessor(
        old_name,
        Arc::new(move |bag: &PropertyBag| {
            get_notice.fire();
            bag.get(&get_key).unwrap_or(Value::Null)
        }),
        Arc::new(move |bag: &PropertyBag, value: Value| {
            notice.fire();
            bag.set(&set_key, value);
        }),
    );
    bag
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_slot_round_trip() {
        let bag = PropertyBag::new();
        bag.insert_data("zoom", json!(1.25));

        assert!(bag.contains("zoom"));
        assert_eq!(bag.get("zoom"), Some(json!(1.25)));

        bag.set("zoom", json!(2.0));
        assert_eq!(bag.get("zoom"), Some(json!(2.0)));
    }

    #[test]
    fn test_absent_slot_reads_none_and_writes_data() {
        let bag = PropertyBag::new();
        assert_eq!(bag.get("missing"), None);

        bag.set("missing", json!("now present"));
        assert_eq!(bag.get("missing"), Some(json!("now present")));
    }

    #[test]
    fn test_accessor_delegates_to_sibling_slot() {
        let bag = PropertyBag::new();
        bag.insert_data("backing", json!(7));
        bag.insert_accessor(
            "visible",
            Arc::new(|bag: &PropertyBag| bag.get("backing").unwrap_or(Value::Null)),
            Arc::new(|bag: &PropertyBag, value: Value| bag.set("backing", value)),
        );

        assert_eq!(bag.get("visible"), Some(json!(7)));
        bag.set("visible", json!(8));
        assert_eq!(bag.get("backing"), Some(json!(8)));
    }
}
