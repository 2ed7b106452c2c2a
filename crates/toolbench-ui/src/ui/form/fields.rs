//! Toolkit-independent form fields
//!
//! Fields hold the value a widget displays and notify on change. The GTK
//! view mirrors them into real widgets; tests drive them directly.

use super::signal::{HandlerId, Signal};
use std::cell::{Cell, RefCell};

/// An observable value
pub struct Property<T> {
    value: RefCell<T>,
    changed: Signal<T>,
}

impl<T: Clone + PartialEq> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            changed: Signal::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store a value; handlers run only if it differs from the current one
    pub fn set(&self, value: T) {
        if *self.value.borrow() == value {
            return;
        }
        *self.value.borrow_mut() = value.clone();
        self.changed.emit(&value);
    }

    pub fn connect_changed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&T) + 'static,
    {
        self.changed.connect(handler)
    }

    pub fn disconnect(&self, id: HandlerId) -> bool {
        self.changed.disconnect(id)
    }
}

/// A text input, single or multi-line
pub struct TextField {
    text: Property<String>,
    placeholder: RefCell<String>,
    multiline: bool,
    focused: Cell<bool>,
    valid: Property<bool>,
}

impl TextField {
    /// Single-line entry
    pub fn single_line(text: &str) -> Self {
        Self::build(text, false)
    }

    /// Multi-line text area
    pub fn multi_line(text: &str) -> Self {
        Self::build(text, true)
    }

    fn build(text: &str, multiline: bool) -> Self {
        Self {
            text: Property::new(text.to_string()),
            placeholder: RefCell::new(String::new()),
            multiline,
            focused: Cell::new(false),
            valid: Property::new(true),
        }
    }

    pub fn text(&self) -> String {
        self.text.get()
    }

    /// Replace the text, notifying handlers if it changed
    pub fn set_text(&self, text: &str) {
        self.text.set(text.to_string());
    }

    /// Register a handler receiving the full new text
    pub fn connect_changed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&String) + 'static,
    {
        self.text.connect_changed(handler)
    }

    pub fn placeholder(&self) -> String {
        self.placeholder.borrow().clone()
    }

    pub fn set_placeholder(&self, placeholder: &str) {
        *self.placeholder.borrow_mut() = placeholder.to_string();
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// Request initial input focus
    pub fn grab_focus(&self) {
        self.focused.set(true);
    }

    pub fn has_focus(&self) -> bool {
        self.focused.get()
    }

    /// Whether the current text was accepted by the bound model
    pub fn is_valid(&self) -> bool {
        self.valid.get()
    }

    pub fn set_valid(&self, valid: bool) {
        self.valid.set(valid);
    }

    pub fn connect_valid_changed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&bool) + 'static,
    {
        self.valid.connect_changed(handler)
    }
}

/// A drop-down choice between fixed items
pub struct ChoiceField {
    items: Vec<String>,
    selected: Property<Option<usize>>,
}

impl ChoiceField {
    pub fn new(items: Vec<String>, selected: Option<usize>) -> Self {
        let selected = selected.filter(|i| *i < items.len());
        Self {
            items,
            selected: Property::new(selected),
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected.get()
    }

    /// Select an item; out-of-range indices are ignored
    pub fn set_selected(&self, index: Option<usize>) {
        if index.is_some_and(|i| i >= self.items.len()) {
            return;
        }
        self.selected.set(index);
    }

    pub fn connect_changed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&Option<usize>) + 'static,
    {
        self.selected.connect_changed(handler)
    }
}
