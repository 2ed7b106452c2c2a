use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use toolbench_core::types::shared;
use toolbench_core::{FcSerializer, Shared, ShapeKind, Tool, ToolDb, ToolSerializer, ToolShape};
use toolbench_ui::ui::form::{FieldTemplate, FormTemplate, TabPage};
use toolbench_ui::ui::tool_editor::{
    window_title, DialogResponse, DialogState, EditorOptions, ModalHost, ToolEditor,
};

struct Fixture {
    _dir: tempfile::TempDir,
    db: Shared<ToolDb>,
    serializer: Rc<dyn ToolSerializer>,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let serializer: Rc<dyn ToolSerializer> = Rc::new(FcSerializer::new(dir.path()));
        Self {
            _dir: dir,
            db: shared(ToolDb::new()),
            serializer,
        }
    }

    fn editor(&self, tool: &Shared<Tool>, tool_no: Option<u32>) -> ToolEditor {
        ToolEditor::new(self.db.clone(), self.serializer.clone(), tool.clone(), tool_no)
    }
}

fn endmill(label: &str) -> Shared<Tool> {
    shared(Tool::new(label, ToolShape::builtin(ShapeKind::Endmill)))
}

fn probe() -> Shared<Tool> {
    shared(Tool::new("Probe", ToolShape::builtin(ShapeKind::Probe)))
}

fn default_title() -> String {
    FormTemplate::default().window_title
}

/// Runs a closure against the editor, then closes it the given way
struct ScriptedHost<F: Fn(&ToolEditor)> {
    script: F,
    response: DialogResponse,
    calls: Cell<usize>,
}

impl<F: Fn(&ToolEditor)> ModalHost for ScriptedHost<F> {
    fn exec(&self, editor: &ToolEditor) -> DialogResponse {
        self.calls.set(self.calls.get() + 1);
        (self.script)(editor);
        match self.response {
            DialogResponse::Accepted => editor.accept(),
            DialogResponse::Rejected => editor.dismiss(),
        }
        self.response
    }
}

fn refresh_counter(editor: &ToolEditor) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    editor
        .feeds()
        .expect("cutter has a feeds tab")
        .connect_refreshed(move |_| c.set(c.get() + 1));
    count
}

#[test]
fn test_name_field_seeded_and_focused() {
    let fx = Fixture::new();
    let tool = endmill("6mm Flat");
    let editor = fx.editor(&tool, None);

    let name = editor.name_field();
    assert_eq!(name.text(), "6mm Flat");
    assert_eq!(name.placeholder(), "Tool name");
    assert!(name.has_focus());
    assert_eq!(editor.window_title(), format!("6mm Flat - {}", default_title()));
}

#[test]
fn test_empty_label_uses_default_title() {
    let fx = Fixture::new();
    let tool = endmill("");
    let editor = fx.editor(&tool, None);
    assert_eq!(editor.window_title(), default_title());

    editor.name_field().set_text("V");
    assert_eq!(editor.window_title(), format!("V - {}", default_title()));
    editor.name_field().set_text("");
    assert_eq!(editor.window_title(), default_title());
    assert_eq!(tool.borrow().get_label(), "");
}

#[test]
fn test_title_follows_template() {
    let fx = Fixture::new();
    let tool = endmill("T1");
    let options = EditorOptions {
        template: FormTemplate {
            window_title: "Bit".to_string(),
            ..FormTemplate::default()
        },
        ..EditorOptions::default()
    };
    let editor = ToolEditor::with_options(
        fx.db.clone(),
        fx.serializer.clone(),
        tool.clone(),
        None,
        options,
    );
    assert_eq!(editor.window_title(), "T1 - Bit");

    let titles = Rc::new(std::cell::RefCell::new(Vec::new()));
    let t = titles.clone();
    editor.connect_title_changed(move |title| t.borrow_mut().push(title.clone()));
    editor.name_field().set_text("T2");
    assert_eq!(*titles.borrow(), vec!["T2 - Bit".to_string()]);
}

#[test]
fn test_text_fields_seeded_from_tool() {
    let fx = Fixture::new();
    let tool = endmill("E");
    {
        let mut t = tool.borrow_mut();
        t.set_coating("TiAlN");
        t.set_hardness("HRC 55");
        t.set_materials("Aluminium, plastics");
        t.set_supplier("Acme");
        t.set_notes("line one\nline two");
    }
    let editor = fx.editor(&tool, None);

    let ids: Vec<&str> = editor.text_fields().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec!["coating", "hardness", "materials", "supplier"]);
    assert_eq!(editor.text_field("coating").unwrap().text(), "TiAlN");
    assert_eq!(editor.text_field("hardness").unwrap().text(), "HRC 55");
    assert_eq!(editor.text_field("materials").unwrap().text(), "Aluminium, plastics");
    assert_eq!(editor.text_field("supplier").unwrap().text(), "Acme");
    assert_eq!(editor.notes_field().text(), "line one\nline two");
    assert!(editor.notes_field().is_multiline());
}

#[test]
fn test_text_fields_follow_template_order() {
    let fx = Fixture::new();
    let tool = endmill("E");
    tool.borrow_mut().set_coating("TiN");
    let field = |id: &str, label: &str| FieldTemplate {
        id: id.to_string(),
        label: label.to_string(),
    };
    let options = EditorOptions {
        template: FormTemplate {
            fields: vec![
                field("supplier", "Vendor"),
                field("bogus", "Bogus"),
                field("coating", ""),
                field("supplier", "Again"),
            ],
            ..FormTemplate::default()
        },
        ..EditorOptions::default()
    };
    let editor = ToolEditor::with_options(
        fx.db.clone(),
        fx.serializer.clone(),
        tool.clone(),
        None,
        options,
    );

    let fields: Vec<(&str, &str)> = editor
        .text_fields()
        .iter()
        .map(|b| (b.id, b.label.as_str()))
        .collect();
    assert_eq!(fields, vec![("supplier", "Vendor"), ("coating", "Coating")]);
    assert!(editor.text_field("hardness").is_none());
    assert_eq!(editor.text_field("coating").unwrap().text(), "TiN");
}

#[test]
fn test_unsupported_tool_has_no_feeds_tab() {
    let fx = Fixture::new();
    let tool = probe();
    let editor = fx.editor(&tool, None);

    assert_eq!(editor.feeds_tab_index(), None);
    assert!(editor.feeds().is_none());
    assert_eq!(editor.tabs().count(), 2);
    assert_eq!(editor.tabs().index_of(TabPage::Attributes), Some(1));

    editor.tabs().set_current_index(1);
    editor.tabs().set_current_index(0);
    assert_eq!(editor.tabs().current_index(), Some(0));
}

#[test]
fn test_feeds_tab_inserted_second() {
    let fx = Fixture::new();
    let tool = endmill("E");
    let editor = fx.editor(&tool, None);

    assert_eq!(editor.feeds_tab_index(), Some(1));
    let pages: Vec<TabPage> = editor.tabs().tabs().into_iter().map(|t| t.page).collect();
    assert_eq!(
        pages,
        vec![TabPage::Tool, TabPage::FeedsAndSpeeds, TabPage::Attributes]
    );
    assert_eq!(editor.tabs().tabs()[1].label, FormTemplate::default().feeds_tab_label);
}

#[test]
fn test_initial_tab_is_first_and_nothing_refreshed() {
    let fx = Fixture::new();
    let tool = endmill("E");
    let editor = fx.editor(&tool, None);
    assert_eq!(editor.tabs().current_index(), Some(0));
    assert!(editor.feeds().unwrap().result().is_none());
}

#[test]
fn test_one_refresh_per_switch_into_feeds_tab() {
    let fx = Fixture::new();
    let tool = endmill("E");
    let editor = fx.editor(&tool, None);
    let count = refresh_counter(&editor);
    let tabs = editor.tabs();

    tabs.set_current_index(1);
    assert_eq!(count.get(), 1);
    tabs.set_current_index(1);
    assert_eq!(count.get(), 1);

    tabs.set_current_index(2);
    tabs.set_current_index(0);
    assert_eq!(count.get(), 1);

    tabs.set_current_index(1);
    assert_eq!(count.get(), 2);
    assert!(editor.feeds().unwrap().result().is_some());
}

#[test]
fn test_refresh_sees_latest_edits() {
    let fx = Fixture::new();
    let tool = endmill("E");
    let editor = fx.editor(&tool, None);

    editor.tabs().set_current_index(1);
    let before = editor.feeds().unwrap().result().unwrap();

    editor.tabs().set_current_index(0);
    editor.shape_editor().field("Diameter").unwrap().set_text("3 mm");
    editor.tabs().set_current_index(1);
    let after = editor.feeds().unwrap().result().unwrap();
    assert!(after.rpm >= before.rpm);
    assert_ne!(after, before);
}

#[test]
fn test_tool_number_change_is_local() {
    let fx = Fixture::new();
    let tool = endmill("E");
    let editor = fx.editor(&tool, Some(3));
    let snapshot = tool.borrow().clone();

    assert_eq!(editor.tool_no(), Some(3));
    let field = editor.properties().tool_no_field().unwrap();
    field.set_text("42");
    assert_eq!(editor.tool_no(), Some(42));
    field.set_text("forty");
    assert_eq!(editor.tool_no(), Some(42));
    assert_eq!(*tool.borrow(), snapshot);
}

#[test]
fn test_no_tool_number_without_slot() {
    let fx = Fixture::new();
    let tool = endmill("E");
    let editor = fx.editor(&tool, None);
    assert_eq!(editor.tool_no(), None);
    assert!(editor.properties().tool_no_field().is_none());
}

#[test]
fn test_editor_holds_the_given_tool() {
    let fx = Fixture::new();
    let tool = endmill("E");
    let editor = fx.editor(&tool, Some(1));
    assert!(Rc::ptr_eq(editor.tool(), &tool));

    editor.text_field("supplier").unwrap().set_text("Acme");
    drop(editor);
    assert_eq!(Rc::strong_count(&tool), 1);
    assert_eq!(tool.borrow().get_supplier(), "Acme");
}

#[test]
fn test_run_keeps_edits_when_dismissed() {
    let fx = Fixture::new();
    let tool = endmill("Old");
    let editor = fx.editor(&tool, None);
    let host = ScriptedHost {
        script: |e: &ToolEditor| {
            e.name_field().set_text("New");
            e.text_field("coating").unwrap().set_text("DLC");
            e.notes_field().set_text("keep");
        },
        response: DialogResponse::Rejected,
        calls: Cell::new(0),
    };

    assert_eq!(editor.state(), DialogState::Open);
    assert_eq!(editor.run(&host), DialogResponse::Rejected);
    assert_eq!(editor.state(), DialogState::Closed);

    let t = tool.borrow();
    assert_eq!(t.get_label(), "New");
    assert_eq!(t.get_coating(), "DLC");
    assert_eq!(t.get_notes(), "keep");
}

#[test]
fn test_run_after_close_returns_first_response() {
    let fx = Fixture::new();
    let tool = endmill("E");
    let editor = fx.editor(&tool, None);
    let host = ScriptedHost {
        script: |_: &ToolEditor| {},
        response: DialogResponse::Accepted,
        calls: Cell::new(0),
    };

    assert_eq!(editor.run(&host), DialogResponse::Accepted);
    assert_eq!(editor.run(&host), DialogResponse::Accepted);
    assert_eq!(host.calls.get(), 1);

    editor.dismiss();
    assert_eq!(editor.response(), Some(DialogResponse::Accepted));
}

#[test]
fn test_feeds_save_through_editor() {
    let fx = Fixture::new();
    let tool = fx
        .db
        .borrow_mut()
        .add_tool(Tool::new("Saved", ToolShape::builtin(ShapeKind::Ballend)));
    let editor = fx.editor(&tool, None);
    editor.name_field().set_text("Saved again");
    editor.feeds().unwrap().save().unwrap();

    let stored = fx.serializer.deserialize_tools().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].get_label(), "Saved again");
}

proptest! {
    #[test]
    fn title_rule_holds_for_any_label(label in "\\PC{0,24}") {
        let fx = Fixture::new();
        let tool = endmill("seed");
        let editor = fx.editor(&tool, None);
        editor.name_field().set_text(&label);

        prop_assert_eq!(tool.borrow().get_label(), label.as_str());
        prop_assert_eq!(editor.window_title(), window_title(&label, &default_title()));
        if label.is_empty() {
            prop_assert_eq!(editor.window_title(), default_title());
        } else {
            prop_assert_eq!(editor.window_title(), format!("{} - {}", label, default_title()));
        }
    }

    #[test]
    fn text_fields_write_through(
        coating in "\\PC{0,16}",
        hardness in "\\PC{0,16}",
        materials in "\\PC{0,16}",
        supplier in "\\PC{0,16}",
        notes in "(\\PC{0,12}\n){0,3}",
    ) {
        let fx = Fixture::new();
        let tool = endmill("E");
        let editor = fx.editor(&tool, None);

        editor.text_field("coating").unwrap().set_text(&coating);
        editor.text_field("hardness").unwrap().set_text(&hardness);
        editor.text_field("materials").unwrap().set_text(&materials);
        editor.text_field("supplier").unwrap().set_text(&supplier);
        editor.notes_field().set_text(&notes);

        let t = tool.borrow();
        prop_assert_eq!(t.get_coating(), coating.as_str());
        prop_assert_eq!(t.get_hardness(), hardness.as_str());
        prop_assert_eq!(t.get_materials(), materials.as_str());
        prop_assert_eq!(t.get_supplier(), supplier.as_str());
        prop_assert_eq!(t.get_notes(), notes.as_str());
    }
}
