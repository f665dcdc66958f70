//! The contract between a form and whatever owns its values.
//!
//! The provider is the single source of truth for values and validity. The
//! form receives a [`FormSnapshot`] per render and reports user intent through
//! [`FormCallbacks`]; it never edits a snapshot in place.

use std::fmt;
use std::rc::Rc;

use crate::{FieldId, FieldMap, FieldStatus};

pub type FieldCallback = Rc<dyn Fn(FieldId)>;
pub type ChangeCallback = Rc<dyn Fn(FieldId, String)>;

/// Values, statuses and focus target for one render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormSnapshot {
    pub values: FieldMap<String>,
    pub status: FieldMap<FieldStatus>,
    /// Field that should hold input focus. `None` means "leave focus alone".
    pub focused: Option<FieldId>,
    /// Brand detected from the card number, e.g. `"visa"`.
    pub brand: Option<String>,
}

impl FormSnapshot {
    pub fn value(&self, field: FieldId) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn status(&self, field: FieldId) -> FieldStatus {
        self.status.get(field).copied().unwrap_or_default()
    }
}

/// Events flowing back to the provider, always tagged with the field.
///
/// Unset callbacks are silently skipped. Callbacks are invoked while the form
/// is mid-update; a provider should queue the event and re-render afterwards
/// rather than calling back into the form synchronously.
#[derive(Clone, Default)]
pub struct FormCallbacks {
    pub on_focus: Option<FieldCallback>,
    pub on_change: Option<ChangeCallback>,
    /// Fires when a value goes from empty to non-empty. The name is historical.
    pub on_become_empty: Option<FieldCallback>,
    /// Fires when a status leaves `valid`. The name is historical.
    pub on_become_valid: Option<FieldCallback>,
}

impl FormCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_focus(mut self, f: impl Fn(FieldId) + 'static) -> Self {
        self.on_focus = Some(Rc::new(f));
        self
    }

    pub fn on_change(mut self, f: impl Fn(FieldId, String) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    pub fn on_become_empty(mut self, f: impl Fn(FieldId) + 'static) -> Self {
        self.on_become_empty = Some(Rc::new(f));
        self
    }

    pub fn on_become_valid(mut self, f: impl Fn(FieldId) + 'static) -> Self {
        self.on_become_valid = Some(Rc::new(f));
        self
    }

    pub fn focus(&self, field: FieldId) {
        if let Some(cb) = &self.on_focus {
            cb(field);
        }
    }

    pub fn change(&self, field: FieldId, value: String) {
        if let Some(cb) = &self.on_change {
            cb(field, value);
        }
    }

    pub fn become_empty(&self, field: FieldId) {
        if let Some(cb) = &self.on_become_empty {
            cb(field);
        }
    }

    pub fn become_valid(&self, field: FieldId) {
        if let Some(cb) = &self.on_become_valid {
            cb(field);
        }
    }
}

impl fmt::Debug for FormCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormCallbacks")
            .field("on_focus", &self.on_focus.as_ref().map(|_| "..."))
            .field("on_change", &self.on_change.as_ref().map(|_| "..."))
            .field(
                "on_become_empty",
                &self.on_become_empty.as_ref().map(|_| "..."),
            )
            .field(
                "on_become_valid",
                &self.on_become_valid.as_ref().map(|_| "..."),
            )
            .finish()
    }
}

/// Anything that can feed a card form.
pub trait StateProvider {
    fn snapshot(&self) -> FormSnapshot;
    fn callbacks(&self) -> FormCallbacks;
}
