//! Focus handles.
//!
//! The form never reaches into a field to focus it. Each field registers a
//! [`Focusable`] handle under its [`FieldId`] when it is created and removes
//! it when it goes away; the form only talks to this table.

use std::cell::Cell;
use std::rc::Rc;

use cardinput_core::{FieldId, FieldMap};

pub trait Focusable {
    /// Gives this input keyboard focus.
    fn focus(&self);
}

#[derive(Default)]
pub struct FocusHandles {
    handles: FieldMap<Rc<dyn Focusable>>,
}

impl FocusHandles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, field: FieldId, handle: Rc<dyn Focusable>) {
        if self.handles.insert(field, handle).is_some() {
            log::trace!("focus handle for {field} replaced");
        }
    }

    pub fn deregister(&mut self, field: FieldId) {
        self.handles.remove(field);
    }

    pub fn get(&self, field: FieldId) -> Option<Rc<dyn Focusable>> {
        self.handles.get(field).cloned()
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.handles.contains(field)
    }

    /// Focuses `field` if a handle is registered. Returns whether it was.
    pub fn focus(&self, field: FieldId) -> bool {
        match self.get(field) {
            Some(h) => {
                h.focus();
                true
            }
            None => {
                log::debug!("no focus handle for {field}; skipping focus");
                false
            }
        }
    }
}

/// Which input currently holds keyboard focus. Shared by every field of a
/// form so that focusing one implicitly blurs the others.
#[derive(Clone, Default)]
pub struct InputFocus(Rc<Cell<Option<FieldId>>>);

impl InputFocus {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get(&self) -> Option<FieldId> {
        self.0.get()
    }
    pub fn set(&self, field: Option<FieldId>) {
        self.0.set(field);
    }
    pub fn is(&self, field: FieldId) -> bool {
        self.0.get() == Some(field)
    }
}
