//! FreeCAD tool directory serializer
//!
//! Layout under the root directory:
//! - `Bit/<id>.fctb` - one JSON document per tool
//! - `Library/<id>.fctl` - one JSON document per library
//!
//! Tool metadata that FreeCAD has no dedicated field for (coating,
//! supplier, notes, ...) lives in the `attribute` map next to custom
//! attributes, so files written here still open in FreeCAD.

use super::ToolSerializer;
use crate::data::db::ToolLibrary;
use crate::data::shape::ToolShape;
use crate::data::tool::{is_reserved_attr, Tool, ToolId, ToolMaterial};
use crate::error::{Result, SerializerError};
use crate::units::{parse_length, MeasurementSystem};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const BIT_DIR: &str = "Bit";
const LIBRARY_DIR: &str = "Library";
const TOOL_EXT: &str = "fctb";
const LIBRARY_EXT: &str = "fctl";
const TOOL_VERSION: u32 = 2;
const LIBRARY_VERSION: u32 = 1;

const ATTR_FLUTES: &str = "Flutes";
const ATTR_CHIPLOAD: &str = "Chipload";
const ATTR_MATERIAL: &str = "Material";
const ATTR_COATING: &str = "Coating";
const ATTR_HARDNESS: &str = "Hardness";
const ATTR_MATERIALS: &str = "Materials";
const ATTR_SUPPLIER: &str = "Supplier";
const ATTR_NOTES: &str = "Notes";

#[derive(Debug, Serialize, Deserialize)]
struct FctbDocument {
    version: u32,
    name: String,
    shape: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pixmap: Option<String>,
    #[serde(default)]
    parameter: BTreeMap<String, String>,
    #[serde(default)]
    attribute: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FctlEntry {
    nr: u32,
    path: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct FctlDocument {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default)]
    tools: Vec<FctlEntry>,
}

/// Serializer for the FreeCAD `.fctb` / `.fctl` directory layout
#[derive(Debug, Clone)]
pub struct FcSerializer {
    root: PathBuf,
}

impl FcSerializer {
    /// Create a serializer rooted at a tool directory
    ///
    /// Directories are created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn tool_path(&self, id: &ToolId) -> PathBuf {
        self.root
            .join(BIT_DIR)
            .join(format!("{}.{}", file_stem(&id.0), TOOL_EXT))
    }

    fn library_path(&self, library: &ToolLibrary) -> PathBuf {
        self.root
            .join(LIBRARY_DIR)
            .join(format!("{}.{}", file_stem(&library.id), LIBRARY_EXT))
    }

    fn tool_to_document(tool: &Tool) -> FctbDocument {
        let parameter = tool
            .shape
            .params()
            .map(|p| (p.name.clone(), p.value.to_string()))
            .collect();

        let mut attribute: BTreeMap<String, Value> = tool
            .attrs()
            .iter()
            .filter(|(k, _)| !is_reserved_attr(k))
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        if let Some(flutes) = tool.flutes {
            attribute.insert(ATTR_FLUTES.to_string(), Value::from(flutes));
        }
        if let Some(chipload) = tool.chipload {
            attribute.insert(
                ATTR_CHIPLOAD.to_string(),
                Value::String(format!("{} mm", chipload)),
            );
        }
        attribute.insert(
            ATTR_MATERIAL.to_string(),
            Value::String(tool.material.to_string()),
        );
        for (key, value) in [
            (ATTR_COATING, tool.get_coating()),
            (ATTR_HARDNESS, tool.get_hardness()),
            (ATTR_MATERIALS, tool.get_materials()),
            (ATTR_SUPPLIER, tool.get_supplier()),
            (ATTR_NOTES, tool.get_notes()),
        ] {
            if !value.is_empty() {
                attribute.insert(key.to_string(), Value::String(value.to_string()));
            }
        }

        FctbDocument {
            version: TOOL_VERSION,
            name: tool.get_label().to_string(),
            shape: tool.shape.kind().file_name(),
            pixmap: tool.pixmap.clone(),
            parameter,
            attribute,
        }
    }

    /// Read a single `.fctb` file
    pub fn read_tool(path: &Path) -> Result<Tool> {
        let id = ToolId(stem_of(path));
        let doc: FctbDocument = read_json(path)?;
        Self::document_to_tool(id, doc, path)
    }

    fn document_to_tool(id: ToolId, doc: FctbDocument, path: &Path) -> Result<Tool> {
        let malformed = |reason: String| SerializerError::Malformed {
            path: path.display().to_string(),
            reason,
        };

        let mut shape: ToolShape =
            ToolShape::from_name(&doc.shape).map_err(|e| malformed(e.to_string()))?;
        for (name, value) in &doc.parameter {
            if shape.get_param(name).is_none() {
                tracing::warn!("{}: ignoring unknown parameter {}", path.display(), name);
                continue;
            }
            shape
                .set_param_from_str(name, value, MeasurementSystem::Metric)
                .map_err(|e| malformed(e.to_string()))?;
        }

        let mut tool = Tool::with_id(id, doc.name, shape);
        tool.pixmap = doc.pixmap;
        for (key, value) in doc.attribute {
            let text = value_to_string(&value);
            match key.as_str() {
                ATTR_FLUTES => {
                    tool.flutes = Some(text.trim().parse().map_err(|_| {
                        malformed(format!("invalid flute count '{}'", text))
                    })?);
                }
                ATTR_CHIPLOAD => {
                    tool.chipload = Some(
                        parse_length(&text, MeasurementSystem::Metric)
                            .map_err(|e| malformed(format!("invalid chipload: {}", e)))?,
                    );
                }
                ATTR_MATERIAL => match ToolMaterial::from_name(&text) {
                    Some(material) => tool.material = material,
                    None => tracing::warn!(
                        "{}: unknown tool material '{}', keeping default",
                        path.display(),
                        text
                    ),
                },
                ATTR_COATING => tool.set_coating(&text),
                ATTR_HARDNESS => tool.set_hardness(&text),
                ATTR_MATERIALS => tool.set_materials(&text),
                ATTR_SUPPLIER => tool.set_supplier(&text),
                ATTR_NOTES => tool.set_notes(&text),
                _ => {
                    tool.set_attr(&key, &text);
                }
            }
        }
        Ok(tool)
    }
}

impl ToolSerializer for FcSerializer {
    fn name(&self) -> &'static str {
        "FreeCAD"
    }

    fn serialize_tool(&self, tool: &Tool) -> Result<()> {
        let path = self.tool_path(&tool.id);
        write_json(&path, &Self::tool_to_document(tool))?;
        tracing::debug!("Wrote tool '{}' to {}", tool.get_label(), path.display());
        Ok(())
    }

    fn deserialize_tools(&self) -> Result<Vec<Tool>> {
        let mut tools = Vec::new();
        for path in list_files(&self.root.join(BIT_DIR), TOOL_EXT)? {
            match Self::read_tool(&path) {
                Ok(tool) => tools.push(tool),
                Err(e) => tracing::warn!("Skipping unreadable tool: {}", e),
            }
        }
        Ok(tools)
    }

    fn contains_tool(&self, id: &ToolId) -> bool {
        self.tool_path(id).is_file()
    }

    fn delete_tool(&self, id: &ToolId) -> Result<()> {
        let path = self.tool_path(id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SerializerError::Io {
                path: path.display().to_string(),
                source,
            }
            .into()),
        }
    }

    fn serialize_library(&self, library: &ToolLibrary) -> Result<()> {
        let doc = FctlDocument {
            version: LIBRARY_VERSION,
            label: Some(library.label.clone()),
            tools: library
                .entries()
                .map(|(nr, id)| FctlEntry {
                    nr,
                    path: format!("{}.{}", file_stem(&id.0), TOOL_EXT),
                })
                .collect(),
        };
        write_json(&self.library_path(library), &doc)
    }

    fn deserialize_libraries(&self) -> Result<Vec<ToolLibrary>> {
        let mut libraries = Vec::new();
        for path in list_files(&self.root.join(LIBRARY_DIR), LIBRARY_EXT)? {
            let doc: FctlDocument = read_json(&path)?;
            let id = stem_of(&path);
            let mut library = ToolLibrary::new(doc.label.unwrap_or_else(|| id.clone()));
            library.id = id;
            for entry in doc.tools {
                let tool_id = ToolId(stem_of(Path::new(&entry.path)));
                if let Err(e) = library.assign_tool(entry.nr, tool_id) {
                    tracing::warn!("{}: {}", path.display(), e);
                }
            }
            libraries.push(library);
        }
        Ok(libraries)
    }
}

/// Map an id to a string usable as a file name
fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Files with the given extension, sorted; a missing directory is empty
fn list_files(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let io_err = |source: std::io::Error| SerializerError::Io {
        path: dir.display().to_string(),
        source,
    };
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.extension().is_some_and(|e| e == ext) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| SerializerError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let value = serde_json::from_str(&content).map_err(|source| SerializerError::Json {
        path: path.display().to_string(),
        source,
    })?;
    Ok(value)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let io_err = |source: std::io::Error| SerializerError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| SerializerError::Json {
        path: path.display().to_string(),
        source,
    })?;
    std::fs::write(path, json).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_sanitizes() {
        assert_eq!(file_stem("a/b:c"), "a_b_c");
        assert_eq!(file_stem("plain-id"), "plain-id");
    }

    #[test]
    fn test_dedicated_keys_are_reserved() {
        for key in [
            ATTR_FLUTES,
            ATTR_CHIPLOAD,
            ATTR_MATERIAL,
            ATTR_COATING,
            ATTR_HARDNESS,
            ATTR_MATERIALS,
            ATTR_SUPPLIER,
            ATTR_NOTES,
        ] {
            assert!(is_reserved_attr(key), "{}", key);
        }
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&Value::from(3)), "3");
        assert_eq!(value_to_string(&Value::String("x".into())), "x");
        assert_eq!(value_to_string(&Value::Null), "");
    }
}
