//! Type aliases for shared state and callbacks.
//!
//! The editor and its collaborators live on the UI thread, so shared
//! state is `Rc<RefCell<T>>` rather than `Arc<Mutex<T>>`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use toolbench_core::types::*;
//!
//! // Instead of: Rc<RefCell<Tool>>
//! let tool: Shared<Tool> = shared(Tool::default());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// Use when you need to share mutable state within a single thread (e.g., GTK UI).
///
/// # Example
/// ```rust,ignore
/// let tool: Shared<Tool> = shared(Tool::default());
/// tool.borrow_mut().set_label("6mm endmill");
/// ```
pub type Shared<T> = Rc<RefCell<T>>;

/// A UI callback taking a borrowed payload.
///
/// Handlers are reference counted so a signal can snapshot its handler
/// list before emitting.
pub type UiHandler<T> = Rc<dyn Fn(&T)>;

/// Create a new `Shared<T>` from a value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
