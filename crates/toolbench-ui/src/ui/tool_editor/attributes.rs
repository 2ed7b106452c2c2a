use crate::ui::form::{HandlerId, Signal, TextField};
use std::cell::RefCell;
use std::rc::Rc;
use toolbench_core::data::tool::is_reserved_attr;
use toolbench_core::{Shared, Tool};

/// One custom attribute
pub struct AttributeRow {
    pub name: String,
    pub value: Rc<TextField>,
}

/// Edits the free-form attributes of a tool
pub struct ToolAttributes {
    tool: Shared<Tool>,
    rows: RefCell<Vec<AttributeRow>>,
    rows_changed: Signal<()>,
}

impl ToolAttributes {
    pub fn new(tool: Shared<Tool>) -> Self {
        let attrs: Vec<(String, String)> = tool
            .borrow()
            .attrs()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let rows = attrs
            .into_iter()
            .map(|(name, value)| Self::row(&tool, name, &value))
            .collect();
        Self {
            tool,
            rows: RefCell::new(rows),
            rows_changed: Signal::new(),
        }
    }

    fn row(tool: &Shared<Tool>, name: String, value: &str) -> AttributeRow {
        let field = Rc::new(TextField::single_line(value));
        let tool = tool.clone();
        let key = name.clone();
        field.connect_changed(move |text| {
            tool.borrow_mut().set_attr(&key, text);
        });
        AttributeRow { name, value: field }
    }

    /// Add an attribute
    ///
    /// Returns false for a blank or existing name, and for a name owned by
    /// a dedicated field (see [`is_reserved_attr`]).
    pub fn add_attribute(&self, name: &str, value: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.value_field(name).is_some() {
            return false;
        }
        if !self.tool.borrow_mut().set_attr(name, value) {
            return false;
        }
        let row = Self::row(&self.tool, name.to_string(), value);
        {
            let mut rows = self.rows.borrow_mut();
            rows.push(row);
            rows.sort_by(|a, b| a.name.cmp(&b.name));
        }
        tracing::debug!("Added attribute {}", name);
        self.rows_changed.emit(&());
        true
    }

    /// Remove an attribute; returns false if it does not exist
    pub fn remove_attribute(&self, name: &str) -> bool {
        let removed = {
            let mut rows = self.rows.borrow_mut();
            let before = rows.len();
            rows.retain(|r| r.name != name);
            rows.len() != before
        };
        if removed {
            self.tool.borrow_mut().remove_attr(name);
            self.rows_changed.emit(&());
        }
        removed
    }

    /// Attribute names and value fields, sorted by name
    pub fn rows(&self) -> Vec<(String, Rc<TextField>)> {
        self.rows
            .borrow()
            .iter()
            .map(|r| (r.name.clone(), r.value.clone()))
            .collect()
    }

    pub fn value_field(&self, name: &str) -> Option<Rc<TextField>> {
        self.rows
            .borrow()
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.value.clone())
    }

    /// Notified after rows are added or removed
    pub fn connect_rows_changed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&()) + 'static,
    {
        self.rows_changed.connect(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbench_core::types::shared;
    use toolbench_core::ToolShape;

    fn tool_with_attrs() -> Shared<Tool> {
        let mut tool = Tool::new("t", ToolShape::default());
        tool.set_attr("Vendor part", "X-100");
        tool.set_attr("Bin", "A3");
        shared(tool)
    }

    #[test]
    fn test_rows_seeded_sorted() {
        let editor = ToolAttributes::new(tool_with_attrs());
        let names: Vec<String> = editor.rows().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Bin", "Vendor part"]);
        assert_eq!(editor.value_field("Bin").unwrap().text(), "A3");
    }

    #[test]
    fn test_edit_add_remove() {
        let tool = tool_with_attrs();
        let editor = ToolAttributes::new(tool.clone());
        let changes = shared(0);
        let c = changes.clone();
        editor.connect_rows_changed(move |_| *c.borrow_mut() += 1);

        editor.value_field("Bin").unwrap().set_text("B1");
        assert_eq!(tool.borrow().get_attr("Bin"), Some("B1"));

        assert!(editor.add_attribute("Coolant", "mist"));
        assert!(!editor.add_attribute("Coolant", "flood"));
        assert!(!editor.add_attribute("  ", "x"));
        assert!(!editor.add_attribute("Notes", "x"));
        assert!(!editor.add_attribute(" Flutes ", "4"));
        assert!(editor.value_field("Notes").is_none());
        assert_eq!(tool.borrow().get_notes(), "");
        assert_eq!(tool.borrow().get_attr("Coolant"), Some("mist"));

        assert!(editor.remove_attribute("Vendor part"));
        assert!(!editor.remove_attribute("Vendor part"));
        assert_eq!(tool.borrow().get_attr("Vendor part"), None);
        assert_eq!(*changes.borrow(), 2);
    }
}
