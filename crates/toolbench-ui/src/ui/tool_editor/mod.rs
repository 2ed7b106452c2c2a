//! Tool editor dialog model
//!
//! [`ToolEditor`] wires form fields to a caller-owned [`Tool`]. Every edit
//! is written to the tool as it happens; nothing is buffered and nothing
//! is saved. The dialog itself is toolkit independent: a [`ModalHost`]
//! shows it, see [`crate::ui::gtk::ToolEditorDialog`].

pub mod attributes;
pub mod feeds;
pub mod properties;
pub mod shape_editor;

pub use attributes::{AttributeRow, ToolAttributes};
pub use feeds::FeedsAndSpeedsEditor;
pub use properties::ToolProperties;
pub use shape_editor::{ShapeEditor, ShapeParamRow};

use crate::ui::form::{FormTemplate, HandlerId, Property, TabBook, TabPage, TextField};
use std::cell::Cell;
use std::rc::Rc;
use toolbench_core::units::MeasurementSystem;
use toolbench_core::{Shared, SpindleLimits, Tool, ToolDb, ToolSerializer};

/// Lifecycle of a dialog; it never reopens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Open,
    Closed,
}

/// How the dialog was closed
///
/// Tool edits are kept either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    Accepted,
    Rejected,
}

/// Displays a dialog modally
pub trait ModalHost {
    /// Show `editor` and block until it is dismissed
    fn exec(&self, editor: &ToolEditor) -> DialogResponse;
}

/// Construction options beyond the tool and its collaborators
#[derive(Debug, Clone, Default)]
pub struct EditorOptions {
    pub template: FormTemplate,
    /// Units for shape parameters typed without a suffix
    pub measurement_system: MeasurementSystem,
    pub spindle_limits: SpindleLimits,
}

type Getter = fn(&Tool) -> &str;
type Setter = fn(&mut Tool, &str);

const TEXT_BINDINGS: &[(&str, Getter, Setter)] = &[
    ("coating", Tool::get_coating, Tool::set_coating),
    ("hardness", Tool::get_hardness, Tool::set_hardness),
    ("materials", Tool::get_materials, Tool::set_materials),
    ("supplier", Tool::get_supplier, Tool::set_supplier),
];

/// A labelled text field bound to one tool attribute
pub struct TextBinding {
    pub id: &'static str,
    pub label: String,
    pub field: Rc<TextField>,
}

/// Editor for a single tool
pub struct ToolEditor {
    tool: Shared<Tool>,
    template: FormTemplate,
    title: Rc<Property<String>>,
    name: Rc<TextField>,
    shape: ShapeEditor,
    properties: ToolProperties,
    feeds: Option<Rc<FeedsAndSpeedsEditor>>,
    feeds_tab: Option<usize>,
    attributes: ToolAttributes,
    tabs: TabBook,
    text_fields: Vec<TextBinding>,
    notes: Rc<TextField>,
    tool_no: Rc<Cell<Option<u32>>>,
    state: Cell<DialogState>,
    response: Cell<Option<DialogResponse>>,
}

impl ToolEditor {
    /// Create an editor with the built-in form
    pub fn new(
        db: Shared<ToolDb>,
        serializer: Rc<dyn ToolSerializer>,
        tool: Shared<Tool>,
        tool_no: Option<u32>,
    ) -> Self {
        Self::with_options(db, serializer, tool, tool_no, EditorOptions::default())
    }

    pub fn with_options(
        db: Shared<ToolDb>,
        serializer: Rc<dyn ToolSerializer>,
        tool: Shared<Tool>,
        tool_no: Option<u32>,
        options: EditorOptions,
    ) -> Self {
        let EditorOptions {
            template,
            measurement_system,
            spindle_limits,
        } = options;

        // Name field and window title
        let label = tool.borrow().get_label().to_string();
        let title = Rc::new(Property::new(window_title(&label, &template.window_title)));
        let name = Rc::new(TextField::single_line(&label));
        name.set_placeholder(&template.name_placeholder);
        name.grab_focus();
        {
            let tool = tool.clone();
            let title = title.clone();
            let default_title = template.window_title.clone();
            name.connect_changed(move |text| {
                tool.borrow_mut().set_label(text);
                title.set(window_title(text, &default_title));
            });
        }

        // Tool tab
        let shape = ShapeEditor::with_system(tool.clone(), measurement_system);
        let properties = ToolProperties::new(tool.clone(), tool_no);
        let tool_no = Rc::new(Cell::new(tool_no));
        {
            let tool_no = tool_no.clone();
            properties.connect_tool_no_changed(move |no| tool_no.set(Some(*no)));
        }

        let tabs = TabBook::new();
        tabs.add_tab(&template.tool_tab_label, TabPage::Tool);

        let supports_feeds = tool.borrow().supports_feeds_and_speeds();
        let (feeds, feeds_tab) = if supports_feeds {
            let editor =
                FeedsAndSpeedsEditor::with_limits(db, serializer, tool.clone(), spindle_limits);
            let index = tabs.insert_tab(1, &template.feeds_tab_label, TabPage::FeedsAndSpeeds);
            (Some(editor), Some(index))
        } else {
            (None, None)
        };

        let attributes = ToolAttributes::new(tool.clone());
        tabs.add_tab(&template.attributes_tab_label, TabPage::Attributes);

        tabs.set_current_index(0);
        if let (Some(editor), Some(index)) = (feeds.clone(), feeds_tab) {
            tabs.connect_current_changed(move |current| {
                if *current == index {
                    editor.update();
                }
            });
        }

        // Text attributes, in template order
        let mut text_fields: Vec<TextBinding> = Vec::new();
        for entry in &template.fields {
            let Some((id, get, set)) = TEXT_BINDINGS.iter().find(|(id, _, _)| *id == entry.id)
            else {
                tracing::warn!("Form template lists unknown field '{}'", entry.id);
                continue;
            };
            if text_fields.iter().any(|b| b.id == *id) {
                tracing::warn!("Form template lists field '{}' twice", id);
                continue;
            }
            let field = Rc::new(TextField::single_line(get(&tool.borrow())));
            {
                let tool = tool.clone();
                let set = *set;
                field.connect_changed(move |text| set(&mut tool.borrow_mut(), text));
            }
            tracing::debug!("Bound {} field", id);
            text_fields.push(TextBinding {
                id: *id,
                label: entry.display_label(),
                field,
            });
        }

        let notes = Rc::new(TextField::multi_line(tool.borrow().get_notes()));
        {
            let tool = tool.clone();
            notes.connect_changed(move |text| tool.borrow_mut().set_notes(text));
        }

        tracing::info!(
            "Opened tool editor for '{}'{}",
            label,
            if supports_feeds { "" } else { " (no feeds and speeds)" }
        );

        Self {
            tool,
            template,
            title,
            name,
            shape,
            properties,
            feeds,
            feeds_tab,
            attributes,
            tabs,
            text_fields,
            notes,
            tool_no,
            state: Cell::new(DialogState::Open),
            response: Cell::new(None),
        }
    }

    /// Show the dialog through `host` and block until it is dismissed
    ///
    /// Running a closed dialog returns its earlier response at once.
    pub fn run(&self, host: &dyn ModalHost) -> DialogResponse {
        if let Some(response) = self.response.get() {
            return response;
        }
        let response = host.exec(self);
        self.close(response);
        self.response.get().unwrap_or(response)
    }

    /// Close with `response`; later calls are ignored
    pub fn close(&self, response: DialogResponse) {
        if self.state.get() == DialogState::Closed {
            return;
        }
        self.state.set(DialogState::Closed);
        self.response.set(Some(response));
        tracing::info!(
            "Closed tool editor for '{}' ({:?})",
            self.tool.borrow().get_label(),
            response
        );
    }

    /// The dismiss control: closes without any other effect
    pub fn dismiss(&self) {
        self.close(DialogResponse::Rejected);
    }

    pub fn accept(&self) {
        self.close(DialogResponse::Accepted);
    }

    pub fn state(&self) -> DialogState {
        self.state.get()
    }

    pub fn response(&self) -> Option<DialogResponse> {
        self.response.get()
    }

    /// The tool being edited
    pub fn tool(&self) -> &Shared<Tool> {
        &self.tool
    }

    pub fn template(&self) -> &FormTemplate {
        &self.template
    }

    pub fn window_title(&self) -> String {
        self.title.get()
    }

    pub fn connect_title_changed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&String) + 'static,
    {
        self.title.connect_changed(handler)
    }

    /// Slot number as last reported by the properties editor
    pub fn tool_no(&self) -> Option<u32> {
        self.tool_no.get()
    }

    pub fn name_field(&self) -> &Rc<TextField> {
        &self.name
    }

    pub fn shape_editor(&self) -> &ShapeEditor {
        &self.shape
    }

    pub fn properties(&self) -> &ToolProperties {
        &self.properties
    }

    pub fn feeds(&self) -> Option<&Rc<FeedsAndSpeedsEditor>> {
        self.feeds.as_ref()
    }

    /// Index of the feeds and speeds tab, if the tool supports it
    pub fn feeds_tab_index(&self) -> Option<usize> {
        self.feeds_tab
    }

    pub fn attributes(&self) -> &ToolAttributes {
        &self.attributes
    }

    pub fn tabs(&self) -> &TabBook {
        &self.tabs
    }

    /// Coating, hardness, materials and supplier, in form order
    pub fn text_fields(&self) -> &[TextBinding] {
        &self.text_fields
    }

    pub fn text_field(&self, id: &str) -> Option<&Rc<TextField>> {
        self.text_fields
            .iter()
            .find(|b| b.id == id)
            .map(|b| &b.field)
    }

    pub fn notes_field(&self) -> &Rc<TextField> {
        &self.notes
    }
}

/// `"<label> - <default>"`, or the default title for an empty label
pub fn window_title(label: &str, default_title: &str) -> String {
    if label.is_empty() {
        default_title.to_string()
    } else {
        format!("{} - {}", label, default_title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_title() {
        assert_eq!(window_title("", "Tool Editor"), "Tool Editor");
        assert_eq!(window_title("6mm End", "Tool Editor"), "6mm End - Tool Editor");
        assert_eq!(window_title(" ", "T"), "  - T");
    }
}
