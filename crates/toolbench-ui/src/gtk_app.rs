use gtk4::prelude::*;
use gtk4::CssProvider;
use libadwaita::Application as AdwApplication;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::ui::form::FormTemplate;
use crate::ui::gtk::LibraryWindow;
use gettextrs::{bind_textdomain_codeset, setlocale, textdomain, LocaleCategory};
use toolbench_core::{FcSerializer, ToolDb, ToolSerializer};
use toolbench_settings::SettingsManager;

const APP_ID: &str = "io.github.toolbench.Toolbench";
const TEMPLATE_FILE: &str = "tool_editor.json";

pub fn main() {
    init_i18n();

    let settings = SettingsManager::open_default().unwrap_or_else(|e| {
        tracing::warn!("{}; using settings in the working directory", e);
        SettingsManager::open(PathBuf::from("config.json"))
    });
    if !settings.path().exists() {
        if let Err(e) = settings.save() {
            tracing::warn!("Failed to write default settings: {}", e);
        }
    }
    let config = settings.config().clone();

    let template = SettingsManager::config_dir()
        .map(|dir| FormTemplate::load_or_default(&dir.join(TEMPLATE_FILE)))
        .unwrap_or_default();

    let serializer: Rc<dyn ToolSerializer> =
        Rc::new(FcSerializer::new(config.library.directory.clone()));
    let db = Rc::new(RefCell::new(ToolDb::new()));
    let load_error = db.borrow_mut().load(serializer.as_ref()).err().map(|e| {
        tracing::error!("Failed to load tool library, opening read-only: {}", e);
        e.to_string()
    });

    let app = AdwApplication::builder().application_id(APP_ID).build();

    app.connect_startup(|_| {
        load_css();
    });

    app.connect_activate(move |app| {
        let view = LibraryWindow::new(
            app,
            db.clone(),
            serializer.clone(),
            config.clone(),
            template.clone(),
            load_error.clone(),
        );

        let quit_action = gtk4::gio::SimpleAction::new("quit", None);
        {
            let app = app.clone();
            quit_action.connect_activate(move |_, _| app.quit());
        }
        app.add_action(&quit_action);
        app.set_accels_for_action("app.quit", &["<Control>q"]);

        view.window.present();
    });

    app.run();
}

fn init_i18n() {
    setlocale(LocaleCategory::LcAll, "");
    if let Err(e) = textdomain("toolbench") {
        tracing::warn!("Failed to set text domain: {}", e);
    }
    if let Err(e) = bind_textdomain_codeset("toolbench", "UTF-8") {
        tracing::warn!("Failed to set text domain codeset: {}", e);
    }
}

fn load_css() {
    let Some(display) = gtk4::gdk::Display::default() else {
        tracing::warn!("No display; skipping stylesheet");
        return;
    };
    let provider = CssProvider::new();
    provider.load_from_data(include_str!("ui/gtk/style.css"));
    gtk4::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}
