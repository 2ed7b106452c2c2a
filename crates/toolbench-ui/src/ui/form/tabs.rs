//! Tab container model

use super::signal::{HandlerId, Signal};
use std::cell::{Cell, RefCell};

/// What a tab hosts, so views know which page to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabPage {
    /// Shape and properties
    Tool,
    /// Feeds and speeds
    FeedsAndSpeeds,
    /// Custom attributes
    Attributes,
}

/// One tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub label: String,
    pub page: TabPage,
}

/// An ordered set of tabs with one current tab
pub struct TabBook {
    tabs: RefCell<Vec<Tab>>,
    current: Cell<Option<usize>>,
    current_changed: Signal<usize>,
}

impl TabBook {
    pub fn new() -> Self {
        Self {
            tabs: RefCell::new(Vec::new()),
            current: Cell::new(None),
            current_changed: Signal::new(),
        }
    }

    /// Insert a tab at `index` (appended if out of range), returning its index
    ///
    /// The first tab of an empty book becomes current. Inserting before
    /// the current tab shifts the current index without notifying.
    pub fn insert_tab(&self, index: usize, label: &str, page: TabPage) -> usize {
        let index = {
            let mut tabs = self.tabs.borrow_mut();
            let index = index.min(tabs.len());
            tabs.insert(
                index,
                Tab {
                    label: label.to_string(),
                    page,
                },
            );
            index
        };

        match self.current.get() {
            None => {
                self.current.set(Some(index));
                self.current_changed.emit(&index);
            }
            Some(current) if index <= current => self.current.set(Some(current + 1)),
            Some(_) => {}
        }
        index
    }

    /// Append a tab, returning its index
    pub fn add_tab(&self, label: &str, page: TabPage) -> usize {
        self.insert_tab(usize::MAX, label, page)
    }

    pub fn tabs(&self) -> Vec<Tab> {
        self.tabs.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.tabs.borrow().len()
    }

    /// Index of the first tab hosting `page`
    pub fn index_of(&self, page: TabPage) -> Option<usize> {
        self.tabs.borrow().iter().position(|t| t.page == page)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current.get()
    }

    /// Switch tabs; notifies only when the current tab actually changes
    pub fn set_current_index(&self, index: usize) {
        if index >= self.count() || self.current.get() == Some(index) {
            return;
        }
        self.current.set(Some(index));
        self.current_changed.emit(&index);
    }

    pub fn connect_current_changed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&usize) + 'static,
    {
        self.current_changed.connect(handler)
    }
}

impl Default for TabBook {
    fn default() -> Self {
        Self::new()
    }
}
