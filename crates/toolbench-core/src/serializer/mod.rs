//! Tool storage serializers
//!
//! A serializer moves tools and libraries between a [`ToolDb`] and some
//! storage format. The trait is object safe so the database and editors
//! can hold `Rc<dyn ToolSerializer>` without knowing the format.
//!
//! [`ToolDb`]: crate::data::db::ToolDb

pub mod freecad;

use crate::data::db::ToolLibrary;
use crate::data::tool::{Tool, ToolId};
use crate::error::Result;

pub use freecad::FcSerializer;

/// Storage format for tools and libraries
pub trait ToolSerializer {
    /// Short format name for logs and menus
    fn name(&self) -> &'static str;

    /// Write one tool, replacing any stored version
    fn serialize_tool(&self, tool: &Tool) -> Result<()>;

    /// Read every stored tool
    ///
    /// A tool that cannot be read is skipped with a warning; only a
    /// storage that cannot be listed at all is an error.
    fn deserialize_tools(&self) -> Result<Vec<Tool>>;

    /// Whether a tool is stored, readable or not
    fn contains_tool(&self, id: &ToolId) -> bool;

    /// Delete a stored tool; deleting a missing tool is not an error
    fn delete_tool(&self, id: &ToolId) -> Result<()>;

    /// Write one library, replacing any stored version
    fn serialize_library(&self, library: &ToolLibrary) -> Result<()>;

    /// Read every stored library
    fn deserialize_libraries(&self) -> Result<Vec<ToolLibrary>>;
}
