//! Mirror form fields into GTK widgets
//!
//! Widget edits are pushed into the field, and field changes are pushed
//! back into the widget. A field ignores text equal to its own, which
//! ends the echo. Fields only hold weak references to their widgets.

use crate::ui::form::{ChoiceField, TextField};
use gtk4::prelude::*;
use gtk4::{DropDown, Entry, TextView};
use std::rc::Rc;

/// Single-line entry showing `field`
pub fn entry(field: &Rc<TextField>) -> Entry {
    let entry = Entry::new();
    entry.set_text(&field.text());
    let placeholder = field.placeholder();
    if !placeholder.is_empty() {
        entry.set_placeholder_text(Some(&placeholder));
    }
    mark_invalid(&entry, field.is_valid());

    {
        let field = field.clone();
        entry.connect_changed(move |e| field.set_text(e.text().as_str()));
    }
    {
        let entry = entry.downgrade();
        field.connect_changed(move |text| {
            if let Some(entry) = entry.upgrade() {
                if entry.text().as_str() != text.as_str() {
                    entry.set_text(text);
                }
            }
        });
    }
    {
        let entry = entry.downgrade();
        field.connect_valid_changed(move |valid| {
            if let Some(entry) = entry.upgrade() {
                mark_invalid(&entry, *valid);
            }
        });
    }
    if field.has_focus() {
        entry.grab_focus();
    }
    entry
}

/// Multi-line text view showing `field`
pub fn text_view(field: &Rc<TextField>) -> TextView {
    let view = TextView::new();
    view.set_wrap_mode(gtk4::WrapMode::WordChar);
    view.set_vexpand(true);
    let buffer = view.buffer();
    buffer.set_text(&field.text());

    {
        let field = field.clone();
        buffer.connect_changed(move |b| {
            let (start, end) = b.bounds();
            field.set_text(b.text(&start, &end, false).as_str());
        });
    }
    {
        let buffer = buffer.downgrade();
        field.connect_changed(move |text| {
            let Some(buffer) = buffer.upgrade() else {
                return;
            };
            let (start, end) = buffer.bounds();
            if buffer.text(&start, &end, false).as_str() != text.as_str() {
                buffer.set_text(text);
            }
        });
    }
    view
}

/// Drop-down showing `field`
pub fn drop_down(field: &Rc<ChoiceField>) -> DropDown {
    let items: Vec<&str> = field.items().iter().map(String::as_str).collect();
    let drop_down = DropDown::from_strings(&items);
    drop_down.set_selected(to_position(field.selected()));

    {
        let field = field.clone();
        drop_down.connect_selected_notify(move |d| field.set_selected(from_position(d.selected())));
    }
    {
        let drop_down = drop_down.downgrade();
        field.connect_changed(move |selected| {
            let position = to_position(*selected);
            if let Some(drop_down) = drop_down.upgrade() {
                if drop_down.selected() != position {
                    drop_down.set_selected(position);
                }
            }
        });
    }
    drop_down
}

fn mark_invalid(widget: &impl IsA<gtk4::Widget>, valid: bool) {
    if valid {
        widget.remove_css_class("error");
    } else {
        widget.add_css_class("error");
    }
}

fn to_position(selected: Option<usize>) -> u32 {
    selected
        .and_then(|i| u32::try_from(i).ok())
        .unwrap_or(gtk4::INVALID_LIST_POSITION)
}

fn from_position(position: u32) -> Option<usize> {
    if position == gtk4::INVALID_LIST_POSITION {
        None
    } else {
        usize::try_from(position).ok()
    }
}
