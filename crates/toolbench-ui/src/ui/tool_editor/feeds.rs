use crate::ui::form::{ChoiceField, HandlerId, Signal};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use toolbench_core::{
    FeedsCalculator, FeedsResult, Shared, SpindleLimits, Tool, ToolDb, ToolSerializer,
};

/// Feeds and speeds for a tool in a chosen work-piece material
///
/// Results are recomputed by [`FeedsAndSpeedsEditor::update`], which the
/// tool editor calls when its tab is shown, and whenever the material
/// choice changes.
pub struct FeedsAndSpeedsEditor {
    db: Shared<ToolDb>,
    serializer: Rc<dyn ToolSerializer>,
    tool: Shared<Tool>,
    limits: SpindleLimits,
    material: Rc<ChoiceField>,
    result: RefCell<Option<FeedsResult>>,
    error: RefCell<Option<String>>,
    refreshed: Signal<Option<FeedsResult>>,
}

impl FeedsAndSpeedsEditor {
    pub fn new(
        db: Shared<ToolDb>,
        serializer: Rc<dyn ToolSerializer>,
        tool: Shared<Tool>,
    ) -> Rc<Self> {
        Self::with_limits(db, serializer, tool, SpindleLimits::default())
    }

    pub fn with_limits(
        db: Shared<ToolDb>,
        serializer: Rc<dyn ToolSerializer>,
        tool: Shared<Tool>,
        limits: SpindleLimits,
    ) -> Rc<Self> {
        let names: Vec<String> = db.borrow().materials().iter().map(|m| m.name.clone()).collect();
        let selected = if names.is_empty() { None } else { Some(0) };

        Rc::new_cyclic(|weak: &Weak<Self>| {
            let material = Rc::new(ChoiceField::new(names, selected));
            let weak = weak.clone();
            material.connect_changed(move |_| {
                if let Some(editor) = weak.upgrade() {
                    editor.update();
                }
            });
            Self {
                db,
                serializer,
                tool,
                limits,
                material,
                result: RefCell::new(None),
                error: RefCell::new(None),
                refreshed: Signal::new(),
            }
        })
    }

    /// Recalculate from the current tool and material
    ///
    /// Failures clear the results and are kept as a message for display.
    pub fn update(&self) {
        let outcome = {
            let db = self.db.borrow();
            let material = self
                .material
                .selected()
                .and_then(|i| db.materials().get(i));
            match material {
                Some(material) => {
                    FeedsCalculator::calculate(&self.tool.borrow(), material, self.limits)
                        .map_err(|e| e.to_string())
                }
                None => Err("No work-piece material selected".to_string()),
            }
        };

        let result = match outcome {
            Ok(result) => {
                tracing::debug!(
                    "Feeds and speeds: {:.0} rpm, feed {:.0} mm/min",
                    result.rpm,
                    result.feed_rate
                );
                *self.error.borrow_mut() = None;
                Some(result)
            }
            Err(e) => {
                tracing::warn!("Feeds and speeds unavailable: {}", e);
                *self.error.borrow_mut() = Some(e);
                None
            }
        };
        *self.result.borrow_mut() = result;
        self.refreshed.emit(&result);
    }

    /// Notified after every [`FeedsAndSpeedsEditor::update`]
    pub fn connect_refreshed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&Option<FeedsResult>) + 'static,
    {
        self.refreshed.connect(handler)
    }

    pub fn result(&self) -> Option<FeedsResult> {
        *self.result.borrow()
    }

    /// Why the last update produced no result
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn material_field(&self) -> &Rc<ChoiceField> {
        &self.material
    }

    /// Persist the tool through the database and serializer
    pub fn save(&self) -> toolbench_core::Result<()> {
        let id = self.tool.borrow().id.clone();
        self.db.borrow().save_tool(self.serializer.as_ref(), &id)?;
        tracing::info!("Saved tool {} via {}", id, self.serializer.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbench_core::types::shared;
    use toolbench_core::{FcSerializer, ShapeKind, ToolShape};

    fn setup(kind: ShapeKind) -> (tempfile::TempDir, Rc<FeedsAndSpeedsEditor>, Shared<Tool>) {
        let dir = tempfile::tempdir().unwrap();
        let db = shared(ToolDb::new());
        let tool = db
            .borrow_mut()
            .add_tool(Tool::new("cutter", ToolShape::builtin(kind)));
        let serializer: Rc<dyn ToolSerializer> = Rc::new(FcSerializer::new(dir.path()));
        let editor = FeedsAndSpeedsEditor::new(db, serializer, tool.clone());
        (dir, editor, tool)
    }

    #[test]
    fn test_update_publishes_result() {
        let (_dir, editor, _tool) = setup(ShapeKind::Endmill);
        let seen = shared(Vec::new());
        let s = seen.clone();
        editor.connect_refreshed(move |r| s.borrow_mut().push(r.is_some()));

        assert!(editor.result().is_none());
        editor.update();
        assert_eq!(*seen.borrow(), vec![true]);
        assert!(editor.result().unwrap().rpm > 0.0);
        assert!(editor.error().is_none());
    }

    #[test]
    fn test_material_change_recalculates() {
        let (_dir, editor, _tool) = setup(ShapeKind::Endmill);
        editor.update();
        let first = editor.result().unwrap();
        let count = editor.material_field().items().len();
        editor.material_field().set_selected(Some(count - 1));
        assert_ne!(editor.result().unwrap(), first);
    }

    #[test]
    fn test_unsupported_tool_clears_result() {
        let (_dir, editor, _tool) = setup(ShapeKind::Probe);
        editor.update();
        assert!(editor.result().is_none());
        assert!(editor.error().unwrap().contains("cutter"));
    }

    #[test]
    fn test_save_writes_tool() {
        let (dir, editor, tool) = setup(ShapeKind::Endmill);
        tool.borrow_mut().chipload = Some(0.04);
        editor.save().unwrap();
        let id = tool.borrow().id.to_string();
        assert!(dir.path().join("Bit").join(format!("{}.fctb", id)).exists());
    }
}
