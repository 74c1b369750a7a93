//! Tool registry — immutable, name-keyed descriptor table.
//!
//! Built once from a descriptor list, validated on construction, then only read.
//! There is no insert/remove API after construction.

use super::builtin;
use super::descriptor::{Locale, ToolDescriptor};
use crate::types::{Error, Result};
use crate::validation::{validate_non_empty, validate_tool_name};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

static BUILTIN: OnceLock<std::result::Result<ToolRegistry, String>> = OnceLock::new();

/// Read-only descriptor table keyed by fully qualified tool name.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    entries: BTreeMap<String, Arc<ToolDescriptor>>,
}

impl ToolRegistry {
    /// Validate and index descriptors.
    ///
    /// Rejects empty or malformed names, duplicates, empty token sets, broken
    /// path contracts and input schemas that do not compile.
    pub fn from_descriptors(descriptors: Vec<ToolDescriptor>) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for descriptor in descriptors {
            validate_tool_name(&descriptor.name)?;
            validate_non_empty(&descriptor.project, "project")?;
            validate_non_empty(&descriptor.path, "path")?;
            if descriptor.access_tokens.is_empty() {
                return Err(Error::validation(format!(
                    "{}: access token set cannot be empty",
                    descriptor.name
                )));
            }
            descriptor.check_path_contract()?;
            for locale in [Locale::En, Locale::Zh] {
                jsonschema::validator_for(&descriptor.input_schema(locale)).map_err(|e| {
                    Error::validation(format!(
                        "{}: input schema does not compile: {}",
                        descriptor.name, e
                    ))
                })?;
            }

            if entries.contains_key(&descriptor.name) {
                return Err(Error::validation(format!(
                    "duplicate tool name: {}",
                    descriptor.name
                )));
            }
            entries.insert(descriptor.name.clone(), Arc::new(descriptor));
        }

        Ok(Self { entries })
    }

    /// Process-wide built-in catalogue, validated on first access.
    pub fn builtin() -> Result<&'static ToolRegistry> {
        let loaded = BUILTIN.get_or_init(|| {
            let registry = ToolRegistry::from_descriptors(builtin::descriptors());
            if let Ok(registry) = &registry {
                tracing::debug!("Built-in tool registry loaded ({} tools)", registry.len());
            }
            registry.map_err(|e| e.to_string())
        });
        loaded
            .as_ref()
            .map_err(|msg| Error::internal(format!("built-in tool registry is invalid: {}", msg)))
    }

    /// Get a descriptor by fully qualified name.
    pub fn get(&self, name: &str) -> Option<&Arc<ToolDescriptor>> {
        self.entries.get(name)
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All descriptors, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ToolDescriptor>> {
        self.entries.values()
    }

    /// Distinct project ids, sorted.
    pub fn projects(&self) -> Vec<&str> {
        self.entries
            .values()
            .map(|d| d.project.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Descriptors of one project, ordered by name.
    pub fn by_project<'a>(&'a self, project: &'a str) -> impl Iterator<Item = &'a Arc<ToolDescriptor>> {
        self.entries.values().filter(move |d| d.project == project)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
