use crate::ui::form::TextField;
use std::rc::{Rc, Weak};
use toolbench_core::data::shape::param_label;
use toolbench_core::units::MeasurementSystem;
use toolbench_core::{Shared, Tool};

/// One editable shape parameter
pub struct ShapeParamRow {
    pub name: String,
    pub label: String,
    pub field: Rc<TextField>,
}

/// Edits the parameters of a tool's shape
///
/// Text that does not parse leaves the parameter untouched and marks the
/// field invalid until a parsable value is entered.
pub struct ShapeEditor {
    tool: Shared<Tool>,
    system: MeasurementSystem,
    rows: Vec<ShapeParamRow>,
}

impl ShapeEditor {
    pub fn new(tool: Shared<Tool>) -> Self {
        Self::with_system(tool, MeasurementSystem::Metric)
    }

    /// Display and parse plain numbers in `system`
    pub fn with_system(tool: Shared<Tool>, system: MeasurementSystem) -> Self {
        let params: Vec<(String, String)> = tool
            .borrow()
            .shape
            .params()
            .map(|p| (p.name.clone(), p.value.format(system)))
            .collect();

        let rows = params
            .into_iter()
            .map(|(name, text)| {
                let field = Rc::new(TextField::single_line(&text));
                Self::bind(&tool, system, &name, &field);
                ShapeParamRow {
                    label: param_label(&name),
                    name,
                    field,
                }
            })
            .collect();

        Self { tool, system, rows }
    }

    fn bind(tool: &Shared<Tool>, system: MeasurementSystem, name: &str, field: &Rc<TextField>) {
        let tool = tool.clone();
        let name = name.to_string();
        let weak: Weak<TextField> = Rc::downgrade(field);
        field.connect_changed(move |text| {
            let result = tool
                .borrow_mut()
                .shape
                .set_param_from_str(&name, text, system);
            let valid = match result {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!("Ignoring shape parameter input: {}", e);
                    false
                }
            };
            if let Some(field) = weak.upgrade() {
                field.set_valid(valid);
            }
        });
    }

    /// Shape identifier shown as the editor heading
    pub fn shape_name(&self) -> &'static str {
        self.tool.borrow().shape.name()
    }

    pub fn system(&self) -> MeasurementSystem {
        self.system
    }

    pub fn rows(&self) -> &[ShapeParamRow] {
        &self.rows
    }

    /// Field editing the parameter `name`
    pub fn field(&self, name: &str) -> Option<&Rc<TextField>> {
        self.rows.iter().find(|r| r.name == name).map(|r| &r.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbench_core::data::{ParamValue, ShapeKind, ToolShape};
    use toolbench_core::types::shared;

    fn vbit() -> Shared<Tool> {
        shared(Tool::new("V", ToolShape::builtin(ShapeKind::Vbit)))
    }

    #[test]
    fn test_rows_follow_shape_parameters() {
        let tool = vbit();
        let editor = ShapeEditor::new(tool.clone());
        let names: Vec<String> = tool
            .borrow()
            .shape
            .params()
            .map(|p| p.name.clone())
            .collect();
        let rows: Vec<String> = editor.rows().iter().map(|r| r.name.clone()).collect();
        assert_eq!(rows, names);
        assert_eq!(editor.shape_name(), "v-bit");
    }

    #[test]
    fn test_edit_writes_parameter() {
        let tool = vbit();
        let editor = ShapeEditor::new(tool.clone());
        let field = editor.field("CuttingEdgeAngle").unwrap();
        field.set_text("45 °");
        assert_eq!(
            tool.borrow().shape.get_param("CuttingEdgeAngle"),
            Some(ParamValue::Angle(45.0))
        );
        assert!(field.is_valid());
    }

    #[test]
    fn test_invalid_text_keeps_value() {
        let tool = vbit();
        let editor = ShapeEditor::new(tool.clone());
        let before = tool.borrow().shape.get_param("Diameter");
        let field = editor.field("Diameter").unwrap();
        field.set_text("wide");
        assert_eq!(tool.borrow().shape.get_param("Diameter"), before);
        assert!(!field.is_valid());

        field.set_text("1/4 in");
        assert!(field.is_valid());
        assert_eq!(
            tool.borrow().shape.get_param("Diameter"),
            Some(ParamValue::Length(6.35))
        );
    }

    #[test]
    fn test_imperial_display() {
        let tool = shared(Tool::new("E", ToolShape::builtin(ShapeKind::Endmill)));
        tool.borrow_mut()
            .shape
            .set_param("Diameter", ParamValue::Length(25.4))
            .unwrap();
        let editor = ShapeEditor::with_system(tool, MeasurementSystem::Imperial);
        assert_eq!(editor.field("Diameter").unwrap().text(), "1.000 in");
    }
}
