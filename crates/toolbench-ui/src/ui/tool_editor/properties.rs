use crate::ui::form::{ChoiceField, HandlerId, Signal, TextField};
use std::rc::{Rc, Weak};
use toolbench_core::units::{parse_length, MeasurementSystem};
use toolbench_core::{Shared, Tool, ToolMaterial};

/// Edits the numeric properties of a tool and its slot number
///
/// The slot number belongs to a library, not to the tool, so edits to it
/// are only announced through [`ToolProperties::connect_tool_no_changed`].
pub struct ToolProperties {
    tool_no: Option<Rc<TextField>>,
    flutes: Rc<TextField>,
    chipload: Rc<TextField>,
    material: Rc<ChoiceField>,
    tool_no_changed: Rc<Signal<u32>>,
}

impl ToolProperties {
    /// The tool number field exists only when `tool_no` is given
    pub fn new(tool: Shared<Tool>, tool_no: Option<u32>) -> Self {
        let tool_no_changed = Rc::new(Signal::new());

        let tool_no_field = tool_no.map(|no| {
            let field = Rc::new(TextField::single_line(&no.to_string()));
            let signal = tool_no_changed.clone();
            let weak = Rc::downgrade(&field);
            field.connect_changed(move |text| {
                let parsed = text.trim().parse::<u32>().ok();
                mark(&weak, parsed.is_some());
                if let Some(no) = parsed {
                    signal.emit(&no);
                }
            });
            field
        });

        let (flutes_text, chipload_text, material) = {
            let t = tool.borrow();
            (
                t.flutes.map(|f| f.to_string()).unwrap_or_default(),
                t.chipload.map(|c| format!("{:.4}", c)).unwrap_or_default(),
                t.material,
            )
        };

        let flutes = Rc::new(TextField::single_line(&flutes_text));
        {
            let tool = tool.clone();
            let weak = Rc::downgrade(&flutes);
            flutes.connect_changed(move |text| {
                let text = text.trim();
                let value = if text.is_empty() {
                    Some(None)
                } else {
                    text.parse::<u32>().ok().filter(|f| *f > 0).map(Some)
                };
                mark(&weak, value.is_some());
                if let Some(value) = value {
                    tool.borrow_mut().flutes = value;
                }
            });
        }

        let chipload = Rc::new(TextField::single_line(&chipload_text));
        {
            let tool = tool.clone();
            let weak = Rc::downgrade(&chipload);
            chipload.connect_changed(move |text| {
                let value = if text.trim().is_empty() {
                    Some(None)
                } else {
                    parse_length(text, MeasurementSystem::Metric)
                        .ok()
                        .filter(|c| *c >= 0.0)
                        .map(Some)
                };
                mark(&weak, value.is_some());
                if let Some(value) = value {
                    tool.borrow_mut().chipload = value;
                }
            });
        }

        let materials = ToolMaterial::all();
        let material = Rc::new(ChoiceField::new(
            materials.iter().map(|m| m.to_string()).collect(),
            materials.iter().position(|m| *m == material),
        ));
        {
            let tool = tool.clone();
            material.connect_changed(move |index| {
                if let Some(m) = index.and_then(|i| materials.get(i)) {
                    tool.borrow_mut().material = *m;
                }
            });
        }

        Self {
            tool_no: tool_no_field,
            flutes,
            chipload,
            material,
            tool_no_changed,
        }
    }

    /// Register a handler for edits of the tool number
    pub fn connect_tool_no_changed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&u32) + 'static,
    {
        self.tool_no_changed.connect(handler)
    }

    pub fn tool_no_field(&self) -> Option<&Rc<TextField>> {
        self.tool_no.as_ref()
    }

    pub fn flutes_field(&self) -> &Rc<TextField> {
        &self.flutes
    }

    /// Chip load in mm per tooth
    pub fn chipload_field(&self) -> &Rc<TextField> {
        &self.chipload
    }

    pub fn material_field(&self) -> &Rc<ChoiceField> {
        &self.material
    }
}

fn mark(field: &Weak<TextField>, valid: bool) {
    if let Some(field) = field.upgrade() {
        field.set_valid(valid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbench_core::types::shared;
    use toolbench_core::ToolShape;

    fn tool() -> Shared<Tool> {
        shared(Tool::new("6mm", ToolShape::default()))
    }

    #[test]
    fn test_tool_no_field_only_with_slot() {
        assert!(ToolProperties::new(tool(), None).tool_no_field().is_none());
        let props = ToolProperties::new(tool(), Some(4));
        assert_eq!(props.tool_no_field().unwrap().text(), "4");
    }

    #[test]
    fn test_tool_no_changed_emits_parsed_numbers() {
        let props = ToolProperties::new(tool(), Some(1));
        let seen = shared(Vec::new());
        let s = seen.clone();
        props.connect_tool_no_changed(move |no| s.borrow_mut().push(*no));

        let field = props.tool_no_field().unwrap();
        field.set_text("12");
        field.set_text("12a");
        assert!(!field.is_valid());
        field.set_text(" 7 ");
        assert_eq!(*seen.borrow(), vec![12, 7]);
    }

    #[test]
    fn test_flutes_and_chipload_write_through() {
        let tool = tool();
        let props = ToolProperties::new(tool.clone(), None);
        props.flutes_field().set_text("3");
        props.chipload_field().set_text("0.05 mm");
        assert_eq!(tool.borrow().flutes, Some(3));
        assert_eq!(tool.borrow().chipload, Some(0.05));

        props.flutes_field().set_text("0");
        assert_eq!(tool.borrow().flutes, Some(3));
        assert!(!props.flutes_field().is_valid());

        props.flutes_field().set_text("");
        props.chipload_field().set_text("");
        assert_eq!(tool.borrow().flutes, None);
        assert_eq!(tool.borrow().chipload, None);
    }

    #[test]
    fn test_material_choice() {
        let tool = tool();
        let props = ToolProperties::new(tool.clone(), None);
        let choice = props.material_field();
        assert_eq!(choice.selected(), Some(1));
        choice.set_selected(Some(0));
        assert_eq!(tool.borrow().material, ToolMaterial::Hss);
    }
}
