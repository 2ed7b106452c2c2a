use gtk4::prelude::*;
use gtk4::{
    Align, ApplicationWindow, Box, Button, Label, ListBox, Orientation, PolicyType,
    ScrolledWindow,
};
use std::rc::Rc;

use super::tool_editor_dialog::ToolEditorDialog;
use crate::ui::form::FormTemplate;
use crate::ui::tool_editor::{EditorOptions, ToolEditor};
use gettextrs::gettext;
use toolbench_core::{Shared, Tool, ToolDb, ToolLibrary, ToolSerializer, ToolShape};
use toolbench_settings::Config;

/// Main window: the tools of one library, each editable in a dialog
///
/// When the library could not be loaded the window is read-only and never
/// writes through the serializer.
#[derive(Clone)]
pub struct LibraryWindow {
    pub window: ApplicationWindow,
    db: Shared<ToolDb>,
    serializer: Rc<dyn ToolSerializer>,
    config: Rc<Config>,
    template: Rc<FormTemplate>,
    tools_list: ListBox,
    status: Label,
    read_only: bool,
}

impl LibraryWindow {
    pub fn new(
        app: &libadwaita::Application,
        db: Shared<ToolDb>,
        serializer: Rc<dyn ToolSerializer>,
        config: Config,
        template: FormTemplate,
        load_error: Option<String>,
    ) -> Self {
        let window = ApplicationWindow::builder()
            .application(app)
            .title("Toolbench")
            .default_width(config.ui.window_width as i32)
            .default_height(config.ui.window_height as i32)
            .build();

        let main_box = Box::new(Orientation::Vertical, 10);
        main_box.set_margin_top(10);
        main_box.set_margin_bottom(10);
        main_box.set_margin_start(10);
        main_box.set_margin_end(10);

        let title = Label::new(Some(&config.library.default_library));
        title.add_css_class("title-4");
        title.set_halign(Align::Start);
        main_box.append(&title);

        let scroll = ScrolledWindow::new();
        scroll.set_policy(PolicyType::Never, PolicyType::Automatic);
        scroll.set_vexpand(true);
        let tools_list = ListBox::new();
        tools_list.add_css_class("boxed-list");
        scroll.set_child(Some(&tools_list));
        main_box.append(&scroll);

        let action_bar = Box::new(Orientation::Horizontal, 10);
        let new_btn = Button::with_label(&gettext("New Tool"));
        new_btn.add_css_class("suggested-action");
        let save_btn = Button::with_label(&gettext("Save All"));
        action_bar.append(&new_btn);
        action_bar.append(&save_btn);
        let status = Label::new(None);
        status.set_hexpand(true);
        status.set_halign(Align::End);
        status.add_css_class("dim-label");
        action_bar.append(&status);
        main_box.append(&action_bar);

        window.set_child(Some(&main_box));

        let view = Self {
            window,
            db,
            serializer,
            config: Rc::new(config),
            template: Rc::new(template),
            tools_list,
            status,
            read_only: load_error.is_some(),
        };
        if let Some(error) = &load_error {
            new_btn.set_sensitive(false);
            save_btn.set_sensitive(false);
            view.status.set_text(error);
        } else {
            view.ensure_library();
        }
        view.load_tools();

        {
            let view = view.clone();
            new_btn.connect_clicked(move |_| view.new_tool());
        }
        {
            let view = view.clone();
            save_btn.connect_clicked(move |_| view.save_all());
        }

        view
    }

    fn library_id(&self) -> &str {
        &self.config.library.default_library
    }

    fn ensure_library(&self) {
        let mut db = self.db.borrow_mut();
        if db.get_library(self.library_id()).is_none() {
            db.add_library(ToolLibrary::new(self.library_id()));
        }
    }

    fn load_tools(&self) {
        while let Some(child) = self.tools_list.first_child() {
            self.tools_list.remove(&child);
        }

        let entries: Vec<(Option<u32>, Shared<Tool>)> = {
            let db = self.db.borrow();
            let library = db.get_library(self.library_id());
            db.tools()
                .into_iter()
                .map(|tool| {
                    let no = library.and_then(|l| l.tool_no_of(&tool.borrow().id));
                    (no, tool)
                })
                .collect()
        };

        for (tool_no, tool) in entries {
            let row = Box::new(Orientation::Horizontal, 10);
            row.set_margin_top(4);
            row.set_margin_bottom(4);
            let number = Label::new(Some(&tool_no.map(|n| format!("#{}", n)).unwrap_or_default()));
            number.set_width_chars(5);
            let label = Label::new(Some(&tool.borrow().description_short()));
            label.set_hexpand(true);
            label.set_halign(Align::Start);
            let edit_btn = Button::with_label(&gettext("Edit"));
            row.append(&number);
            row.append(&label);
            row.append(&edit_btn);
            self.tools_list.append(&row);

            let view = self.clone();
            edit_btn.connect_clicked(move |_| view.edit_tool(tool.clone(), tool_no));
        }
    }

    fn new_tool(&self) {
        let tool = self
            .db
            .borrow_mut()
            .add_tool(Tool::new(gettext("New Tool"), ToolShape::default()));
        let tool_no = {
            let mut db = self.db.borrow_mut();
            let id = tool.borrow().id.clone();
            match db.get_library_mut(self.library_id()) {
                Ok(library) => {
                    let no = library.next_tool_no();
                    library.assign_tool(no, id).ok().map(|_| no)
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    None
                }
            }
        };
        self.edit_tool(tool, tool_no);
    }

    fn edit_tool(&self, tool: Shared<Tool>, tool_no: Option<u32>) {
        let options = EditorOptions {
            template: (*self.template).clone(),
            measurement_system: self.config.ui.measurement_system,
            spindle_limits: self.config.machine.spindle_limits(),
        };
        let editor = Rc::new(ToolEditor::with_options(
            self.db.clone(),
            self.serializer.clone(),
            tool.clone(),
            tool_no,
            options,
        ));
        let parent: &gtk4::Window = self.window.upcast_ref();
        let dialog = ToolEditorDialog::new(
            editor.clone(),
            Some(parent),
            self.config.ui.editor_width as i32,
            self.config.ui.editor_height as i32,
        );
        let response = dialog.run();
        tracing::debug!("Tool editor returned {:?}", response);

        if let (Some(old), Some(new)) = (tool_no, editor.tool_no()) {
            if old != new {
                self.renumber(&tool, new);
            }
        }
        self.save_tool(&tool);
        self.load_tools();
    }

    fn renumber(&self, tool: &Shared<Tool>, tool_no: u32) {
        let id = tool.borrow().id.clone();
        let mut db = self.db.borrow_mut();
        let occupant = db
            .get_library(self.library_id())
            .and_then(|library| library.tool_at(tool_no))
            .filter(|other| **other != id)
            .and_then(|other| db.get_tool(other))
            .map(|other| other.borrow().get_label().to_string());
        let result = db
            .get_library_mut(self.library_id())
            .and_then(|library| library.assign_tool(tool_no, id));
        if let Err(e) = result {
            tracing::warn!("Keeping previous tool number: {}", e);
            let message = match occupant {
                Some(label) => format!("#{} {}: {}", tool_no, gettext("is used by"), label),
                None => e.to_string(),
            };
            self.status.set_text(&message);
        }
    }

    fn save_tool(&self, tool: &Shared<Tool>) {
        if self.read_only {
            tracing::warn!("Library is read-only, not saving");
            return;
        }
        let id = tool.borrow().id.clone();
        let db = self.db.borrow();
        let result = db.save_tool(self.serializer.as_ref(), &id).and_then(|_| {
            match db.get_library(self.library_id()) {
                Some(library) => self.serializer.serialize_library(library),
                None => Ok(()),
            }
        });
        match result {
            Ok(()) => self.status.set_text(&gettext("Saved")),
            Err(e) => {
                tracing::warn!("Failed to save tool {}: {}", id, e);
                self.status.set_text(&e.to_string());
            }
        }
    }

    fn save_all(&self) {
        if self.read_only {
            return;
        }
        match self.db.borrow().save(self.serializer.as_ref()) {
            Ok(()) => self.status.set_text(&gettext("Saved")),
            Err(e) => {
                tracing::warn!("Failed to save tool library: {}", e);
                self.status.set_text(&e.to_string());
            }
        }
    }
}
