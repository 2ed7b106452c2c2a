//! Tool database
//!
//! Holds every known tool, the libraries that assign tool numbers to
//! them, and the work-piece material table. Tools are handed out as
//! [`Shared`] handles so editors can mutate them in place; persisting
//! the result is an explicit [`ToolDb::save_tool`] or [`ToolDb::save`].

use super::materials::{standard_materials, WorkMaterial};
use super::tool::{Tool, ToolId};
use crate::error::{LibraryError, Result, ToolError};
use crate::serializer::ToolSerializer;
use crate::types::{shared, Shared};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A tool library: a numbered set of tools, e.g. one machine's magazine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolLibrary {
    /// Library identifier (file stem when serialized)
    pub id: String,
    /// Display name
    pub label: String,
    tools: BTreeMap<u32, ToolId>,
}

impl ToolLibrary {
    /// Create an empty library
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: label.clone(),
            label,
            tools: BTreeMap::new(),
        }
    }

    /// Assign a tool to a tool number
    ///
    /// A tool may appear only once; assigning it again moves it.
    pub fn assign_tool(&mut self, tool_no: u32, id: ToolId) -> Result<()> {
        if let Some(existing) = self.tools.get(&tool_no) {
            if *existing != id {
                return Err(LibraryError::DuplicateToolNumber {
                    library: self.label.clone(),
                    tool_no,
                }
                .into());
            }
        }
        self.unassign(&id);
        self.tools.insert(tool_no, id);
        Ok(())
    }

    /// Remove a tool from the library, returning its former number
    pub fn unassign(&mut self, id: &ToolId) -> Option<u32> {
        let tool_no = self.tool_no_of(id)?;
        self.tools.remove(&tool_no);
        Some(tool_no)
    }

    /// Tool number of a tool in this library
    pub fn tool_no_of(&self, id: &ToolId) -> Option<u32> {
        self.tools
            .iter()
            .find(|(_, tid)| *tid == id)
            .map(|(no, _)| *no)
    }

    /// Tool id at a tool number
    pub fn tool_at(&self, tool_no: u32) -> Option<&ToolId> {
        self.tools.get(&tool_no)
    }

    /// Lowest unused tool number, starting at 1
    pub fn next_tool_no(&self) -> u32 {
        (1..)
            .find(|n| !self.tools.contains_key(n))
            .unwrap_or(u32::MAX)
    }

    /// (tool number, tool id) pairs in ascending number order
    pub fn entries(&self) -> impl Iterator<Item = (u32, &ToolId)> {
        self.tools.iter().map(|(no, id)| (*no, id))
    }

    /// Number of assigned tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if library is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// In-memory database of tools and libraries
pub struct ToolDb {
    tools: HashMap<ToolId, Shared<Tool>>,
    libraries: BTreeMap<String, ToolLibrary>,
    materials: Vec<WorkMaterial>,
}

impl ToolDb {
    /// Create an empty database with the standard material table
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            libraries: BTreeMap::new(),
            materials: standard_materials(),
        }
    }

    /// Add a tool, returning its shared handle
    ///
    /// A tool with the same id replaces the previous entry.
    pub fn add_tool(&mut self, tool: Tool) -> Shared<Tool> {
        let id = tool.id.clone();
        let handle = shared(tool);
        self.tools.insert(id, handle.clone());
        handle
    }

    /// Get the shared handle of a tool
    pub fn get_tool(&self, id: &ToolId) -> Option<Shared<Tool>> {
        self.tools.get(id).cloned()
    }

    /// Remove a tool and its library assignments
    pub fn remove_tool(&mut self, id: &ToolId) -> Option<Shared<Tool>> {
        let removed = self.tools.remove(id)?;
        for library in self.libraries.values_mut() {
            library.unassign(id);
        }
        Some(removed)
    }

    /// All tools, sorted by label
    pub fn tools(&self) -> Vec<Shared<Tool>> {
        let mut tools: Vec<Shared<Tool>> = self.tools.values().cloned().collect();
        tools.sort_by(|a, b| {
            let (a, b) = (a.borrow(), b.borrow());
            a.get_label()
                .to_lowercase()
                .cmp(&b.get_label().to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        tools
    }

    /// Number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the database holds no tools
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Add or replace a library
    pub fn add_library(&mut self, library: ToolLibrary) {
        self.libraries.insert(library.id.clone(), library);
    }

    /// Get a library by id
    pub fn get_library(&self, id: &str) -> Option<&ToolLibrary> {
        self.libraries.get(id)
    }

    /// Get a mutable library by id
    pub fn get_library_mut(&mut self, id: &str) -> Result<&mut ToolLibrary> {
        self.libraries.get_mut(id).ok_or_else(|| {
            LibraryError::LibraryNotFound { id: id.to_string() }.into()
        })
    }

    /// All libraries, sorted by id
    pub fn libraries(&self) -> impl Iterator<Item = &ToolLibrary> {
        self.libraries.values()
    }

    /// Work-piece materials for feeds and speeds
    pub fn materials(&self) -> &[WorkMaterial] {
        &self.materials
    }

    /// Replace the database content with what the serializer holds
    ///
    /// Nothing is replaced unless the whole read succeeds. Library entries
    /// pointing at tools the serializer does not store are dropped; entries
    /// for stored tools that could not be read are kept so that saving the
    /// library does not lose their slots.
    pub fn load(&mut self, serializer: &dyn ToolSerializer) -> Result<()> {
        let tools: HashMap<ToolId, Shared<Tool>> = serializer
            .deserialize_tools()?
            .into_iter()
            .map(|tool| (tool.id.clone(), shared(tool)))
            .collect();

        let mut libraries = BTreeMap::new();
        for mut library in serializer.deserialize_libraries()? {
            let dangling: Vec<ToolId> = library
                .entries()
                .filter(|(_, id)| !tools.contains_key(*id))
                .map(|(_, id)| id.clone())
                .collect();
            for id in dangling {
                if serializer.contains_tool(&id) {
                    tracing::warn!(
                        "Library '{}' keeps unreadable tool {}",
                        library.label,
                        id
                    );
                } else {
                    tracing::warn!(
                        "Library '{}' references unknown tool {}, dropping it",
                        library.label,
                        id
                    );
                    library.unassign(&id);
                }
            }
            libraries.insert(library.id.clone(), library);
        }

        self.tools = tools;
        self.libraries = libraries;
        tracing::info!(
            "Loaded {} tools and {} libraries via {}",
            self.tools.len(),
            self.libraries.len(),
            serializer.name()
        );
        Ok(())
    }

    /// Write every tool and library through the serializer
    pub fn save(&self, serializer: &dyn ToolSerializer) -> Result<()> {
        for tool in self.tools.values() {
            serializer.serialize_tool(&tool.borrow())?;
        }
        for library in self.libraries.values() {
            serializer.serialize_library(library)?;
        }
        tracing::info!(
            "Saved {} tools and {} libraries via {}",
            self.tools.len(),
            self.libraries.len(),
            serializer.name()
        );
        Ok(())
    }

    /// Write a single tool through the serializer
    pub fn save_tool(&self, serializer: &dyn ToolSerializer, id: &ToolId) -> Result<()> {
        let tool = self
            .get_tool(id)
            .ok_or_else(|| ToolError::ToolNotFound { id: id.to_string() })?;
        serializer.serialize_tool(&tool.borrow())?;
        tracing::debug!("Saved tool {}", id);
        Ok(())
    }
}

impl Default for ToolDb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::shape::{ShapeKind, ToolShape};
    use std::rc::Rc;

    fn tool(label: &str) -> Tool {
        Tool::new(label, ToolShape::builtin(ShapeKind::Endmill))
    }

    #[test]
    fn test_handles_are_shared() {
        let mut db = ToolDb::new();
        let handle = db.add_tool(tool("a"));
        let id = handle.borrow().id.clone();
        handle.borrow_mut().set_label("renamed");

        let again = db.get_tool(&id).unwrap();
        assert!(Rc::ptr_eq(&handle, &again));
        assert_eq!(again.borrow().get_label(), "renamed");
    }

    #[test]
    fn test_tools_sorted_by_label() {
        let mut db = ToolDb::new();
        db.add_tool(tool("b"));
        db.add_tool(tool("A"));
        db.add_tool(tool("c"));
        let labels: Vec<String> = db
            .tools()
            .iter()
            .map(|t| t.borrow().get_label().to_string())
            .collect();
        assert_eq!(labels, vec!["A", "b", "c"]);
    }

    #[test]
    fn test_library_assignment() {
        let a = ToolId("a".to_string());
        let b = ToolId("b".to_string());
        let mut lib = ToolLibrary::new("Default");
        lib.assign_tool(1, a.clone()).unwrap();
        assert!(lib.assign_tool(1, b.clone()).is_err());
        lib.assign_tool(2, b.clone()).unwrap();
        assert_eq!(lib.next_tool_no(), 3);
        assert_eq!(lib.tool_at(2), Some(&b));
        assert_eq!(lib.tool_at(3), None);

        // moving a tool frees its old slot
        lib.assign_tool(5, a.clone()).unwrap();
        assert_eq!(lib.tool_no_of(&a), Some(5));
        assert_eq!(lib.next_tool_no(), 1);
        assert_eq!(lib.len(), 2);
    }

    #[test]
    fn test_remove_tool_unassigns() {
        let mut db = ToolDb::new();
        let handle = db.add_tool(tool("a"));
        let id = handle.borrow().id.clone();
        let mut lib = ToolLibrary::new("Default");
        lib.assign_tool(1, id.clone()).unwrap();
        db.add_library(lib);

        assert!(db.remove_tool(&id).is_some());
        assert!(db.get_library("Default").unwrap().is_empty());
        assert!(db.get_library_mut("missing").is_err());
    }
}
