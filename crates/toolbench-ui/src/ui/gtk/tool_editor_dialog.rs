use gtk4::prelude::*;
use gtk4::{
    Align, Box, Button, Frame, Grid, HeaderBar, Label, ListBox, Notebook, Orientation,
    PolicyType, ScrolledWindow, Window,
};
use std::rc::Rc;

use super::bind;
use crate::ui::form::TabPage;
use crate::ui::tool_editor::{
    DialogResponse, FeedsAndSpeedsEditor, ModalHost, ToolAttributes, ToolEditor,
};
use gettextrs::gettext;
use toolbench_core::FeedsResult;

/// GTK rendering of a [`ToolEditor`]
#[derive(Clone)]
pub struct ToolEditorDialog {
    pub window: Window,
    editor: Rc<ToolEditor>,
    notebook: Notebook,
}

impl ToolEditorDialog {
    pub fn new(editor: Rc<ToolEditor>, parent: Option<&Window>, width: i32, height: i32) -> Self {
        let window = Window::builder()
            .title(editor.window_title())
            .default_width(width)
            .default_height(height)
            .modal(true)
            .build();
        if let Some(parent) = parent {
            window.set_transient_for(Some(parent));
        }

        let header = HeaderBar::new();
        window.set_titlebar(Some(&header));
        {
            let window = window.downgrade();
            editor.connect_title_changed(move |title| {
                if let Some(window) = window.upgrade() {
                    window.set_title(Some(title));
                }
            });
        }

        let vbox = Box::new(Orientation::Vertical, 10);
        vbox.set_margin_top(10);
        vbox.set_margin_bottom(10);
        vbox.set_margin_start(10);
        vbox.set_margin_end(10);

        let name = bind::entry(editor.name_field());
        name.add_css_class("title-4");
        vbox.append(&name);

        let notebook = Notebook::new();
        notebook.set_vexpand(true);
        for tab in editor.tabs().tabs() {
            let page = match tab.page {
                TabPage::Tool => Self::create_tool_page(&editor),
                TabPage::FeedsAndSpeeds => match editor.feeds() {
                    Some(feeds) => Self::create_feeds_page(feeds),
                    None => continue,
                },
                TabPage::Attributes => Self::create_attributes_page(&editor),
            };
            notebook.append_page(&page, Some(&Label::new(Some(&tab.label))));
        }
        if let Some(index) = editor.tabs().current_index() {
            notebook.set_current_page(u32::try_from(index).ok());
        }
        {
            let editor = editor.clone();
            notebook.connect_switch_page(move |_, _, page| {
                editor.tabs().set_current_index(page as usize);
            });
        }
        vbox.append(&notebook);

        let button_bar = Box::new(Orientation::Horizontal, 10);
        button_bar.set_halign(Align::End);
        let close_btn = Button::with_label(&editor.template().close_label);
        button_bar.append(&close_btn);
        vbox.append(&button_bar);

        window.set_child(Some(&vbox));

        let dialog = Self {
            window,
            editor,
            notebook,
        };

        {
            let dialog = dialog.clone();
            close_btn.connect_clicked(move |_| {
                dialog.editor.dismiss();
                dialog.window.close();
            });
        }
        {
            let editor = dialog.editor.clone();
            dialog.window.connect_close_request(move |_| {
                editor.dismiss();
                glib::Propagation::Proceed
            });
        }

        dialog
    }

    /// Show modally and block until the dialog is closed
    pub fn run(&self) -> DialogResponse {
        self.editor.run(self)
    }

    pub fn editor(&self) -> &Rc<ToolEditor> {
        &self.editor
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    fn create_tool_page(editor: &ToolEditor) -> gtk4::Widget {
        let page = Box::new(Orientation::Vertical, 10);
        page.set_margin_top(10);
        page.set_margin_start(10);
        page.set_margin_end(10);

        // Shape parameters
        let shape = editor.shape_editor();
        let shape_frame = Frame::new(Some(shape.shape_name()));
        let grid = form_grid();
        for (row, param) in shape.rows().iter().enumerate() {
            attach_row(&grid, row, &param.label, &bind::entry(&param.field));
        }
        shape_frame.set_child(Some(&grid));
        page.append(&shape_frame);

        // Properties
        let props = editor.properties();
        let props_frame = Frame::new(Some(&gettext("Properties")));
        let grid = form_grid();
        let mut row = 0;
        if let Some(field) = props.tool_no_field() {
            attach_row(&grid, row, &gettext("Tool number"), &bind::entry(field));
            row += 1;
        }
        attach_row(&grid, row, &gettext("Flutes"), &bind::entry(props.flutes_field()));
        attach_row(
            &grid,
            row + 1,
            &gettext("Chip load (mm)"),
            &bind::entry(props.chipload_field()),
        );
        attach_row(
            &grid,
            row + 2,
            &gettext("Tool material"),
            &bind::drop_down(props.material_field()),
        );
        props_frame.set_child(Some(&grid));
        page.append(&props_frame);

        // Text attributes and notes
        let grid = form_grid();
        for (row, binding) in editor.text_fields().iter().enumerate() {
            attach_row(&grid, row, &binding.label, &bind::entry(&binding.field));
        }
        page.append(&grid);

        let notes_label = Label::new(Some(&editor.template().notes_label));
        notes_label.set_halign(Align::Start);
        page.append(&notes_label);
        let notes = ScrolledWindow::new();
        notes.set_policy(PolicyType::Never, PolicyType::Automatic);
        notes.set_min_content_height(80);
        notes.set_child(Some(&bind::text_view(editor.notes_field())));
        page.append(&notes);

        scrolled(&page)
    }

    fn create_feeds_page(feeds: &Rc<FeedsAndSpeedsEditor>) -> gtk4::Widget {
        let page = Box::new(Orientation::Vertical, 10);
        page.set_margin_top(10);
        page.set_margin_start(10);
        page.set_margin_end(10);

        let grid = form_grid();
        attach_row(
            &grid,
            0,
            &gettext("Work material"),
            &bind::drop_down(feeds.material_field()),
        );

        let rows = [
            gettext("Spindle speed"),
            gettext("Surface speed"),
            gettext("Chip load"),
            gettext("Feed rate"),
            gettext("Plunge rate"),
            gettext("Depth of cut"),
        ];
        let values: Vec<Label> = rows
            .iter()
            .enumerate()
            .map(|(i, title)| {
                let value = Label::new(Some("-"));
                value.set_halign(Align::Start);
                value.set_selectable(true);
                attach_row(&grid, i + 1, title, &value);
                value
            })
            .collect();
        page.append(&grid);

        let message = Label::new(None);
        message.set_halign(Align::Start);
        message.add_css_class("dim-label");
        page.append(&message);

        let save_btn = Button::with_label(&gettext("Save Tool"));
        save_btn.set_halign(Align::Start);
        page.append(&save_btn);

        {
            let feeds_for_msg = Rc::downgrade(feeds);
            feeds.connect_refreshed(move |result| {
                let texts = match result {
                    Some(r) => result_texts(r),
                    None => vec!["-".to_string(); values.len()],
                };
                for (label, text) in values.iter().zip(texts) {
                    label.set_text(&text);
                }
                let note = match (result, feeds_for_msg.upgrade()) {
                    (Some(r), _) if r.rpm_clamped => gettext("Spindle speed limited by machine"),
                    (None, Some(feeds)) => feeds.error().unwrap_or_default(),
                    _ => String::new(),
                };
                message.set_text(&note);
            });
        }
        {
            let feeds = feeds.clone();
            save_btn.connect_clicked(move |_| {
                if let Err(e) = feeds.save() {
                    tracing::warn!("Failed to save tool: {}", e);
                }
            });
        }

        scrolled(&page)
    }

    fn create_attributes_page(editor: &Rc<ToolEditor>) -> gtk4::Widget {
        let page = Box::new(Orientation::Vertical, 10);
        page.set_margin_top(10);
        page.set_margin_start(10);
        page.set_margin_end(10);

        let list = ListBox::new();
        list.add_css_class("boxed-list");
        list.set_vexpand(true);
        fill_attribute_list(&list, editor.attributes());
        page.append(&list);
        {
            let weak = Rc::downgrade(editor);
            editor.attributes().connect_rows_changed(move |_| {
                if let Some(editor) = weak.upgrade() {
                    fill_attribute_list(&list, editor.attributes());
                }
            });
        }

        let add_bar = Box::new(Orientation::Horizontal, 10);
        let name = gtk4::Entry::new();
        name.set_placeholder_text(Some(&gettext("Attribute name")));
        let value = gtk4::Entry::new();
        value.set_placeholder_text(Some(&gettext("Value")));
        value.set_hexpand(true);
        let add_btn = Button::with_label(&gettext("Add"));
        add_bar.append(&name);
        add_bar.append(&value);
        add_bar.append(&add_btn);
        page.append(&add_bar);

        {
            let editor = editor.clone();
            add_btn.connect_clicked(move |_| {
                if editor.attributes().add_attribute(&name.text(), &value.text()) {
                    name.remove_css_class("error");
                    name.set_text("");
                    value.set_text("");
                } else {
                    name.add_css_class("error");
                }
            });
        }

        scrolled(&page)
    }
}

impl ModalHost for ToolEditorDialog {
    fn exec(&self, editor: &ToolEditor) -> DialogResponse {
        let main_loop = glib::MainLoop::new(None, false);
        {
            let main_loop = main_loop.clone();
            self.window.connect_hide(move |_| main_loop.quit());
        }
        self.window.present();
        main_loop.run();
        editor.response().unwrap_or(DialogResponse::Rejected)
    }
}

fn fill_attribute_list(list: &ListBox, attributes: &ToolAttributes) {
    while let Some(child) = list.first_child() {
        list.remove(&child);
    }
    for (name, field) in attributes.rows() {
        let row = Box::new(Orientation::Horizontal, 10);
        let label = Label::new(Some(&name));
        label.set_width_chars(16);
        label.set_xalign(0.0);
        let entry = bind::entry(&field);
        entry.set_hexpand(true);
        row.append(&label);
        row.append(&entry);
        list.append(&row);
    }
}

fn result_texts(r: &FeedsResult) -> Vec<String> {
    vec![
        format!("{:.0} rpm", r.rpm),
        format!("{:.1} m/min", r.surface_speed),
        format!("{:.4} mm ({} flutes)", r.chipload, r.flutes),
        format!("{:.0} mm/min", r.feed_rate),
        format!("{:.0} mm/min", r.plunge_rate),
        format!("{:.2} mm", r.depth_of_cut),
    ]
}

fn form_grid() -> Grid {
    let grid = Grid::new();
    grid.set_row_spacing(6);
    grid.set_column_spacing(12);
    grid.set_margin_top(6);
    grid.set_margin_bottom(6);
    grid.set_margin_start(6);
    grid.set_margin_end(6);
    grid
}

fn attach_row(grid: &Grid, row: usize, title: &str, widget: &impl IsA<gtk4::Widget>) {
    let row = row as i32;
    let label = Label::new(Some(title));
    label.set_halign(Align::End);
    grid.attach(&label, 0, row, 1, 1);
    widget.set_hexpand(true);
    grid.attach(widget, 1, row, 1, 1);
}

fn scrolled(page: &Box) -> gtk4::Widget {
    let scroll = ScrolledWindow::new();
    scroll.set_policy(PolicyType::Never, PolicyType::Automatic);
    scroll.set_child(Some(page));
    scroll.upcast()
}
