//! Point-in-time view of a container tree.
//!
//! Snapshots are plain data: bindings are rendered as strings and sorted so
//! two snapshots of the same tree compare equal. With the `graph-export`
//! feature they serialize to JSON or YAML.

use std::fmt;

#[cfg(feature = "graph-export")]
use serde::Serialize;

use crate::container::Container;
#[cfg(feature = "graph-export")]
use crate::error::{DiError, DiResult};
use crate::scope::Scope;

/// One binding in a container's tables.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize))]
pub struct BindingInfo {
    /// Rendered slot, e.g. `database [replica]`
    pub slot: String,
    /// Scope of a factory binding; `None` for instances
    pub scope: Option<Scope>,
    /// Type produced or held
    pub type_name: &'static str,
}

/// Snapshot of one container and its subtree.
///
/// # Examples
///
/// ```
/// use arbor_di::{Container, Scope};
///
/// let root = Container::new();
/// root.register_singleton("config", |_| Ok(String::from("prod"))).unwrap();
/// let request = root.create_labeled_child("request");
/// request.register_instance(7u32, "request-id").unwrap();
///
/// let snapshot = root.snapshot();
/// assert_eq!(snapshot.factories[0].scope, Some(Scope::Singleton));
/// assert_eq!(snapshot.children[0].path, "root/request");
/// assert_eq!(snapshot.children[0].instances[0].slot, "request-id [default]");
/// assert_eq!(snapshot.binding_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize))]
pub struct ContainerSnapshot {
    pub label: String,
    pub path: String,
    pub depth: usize,
    pub disposed: bool,
    pub factories: Vec<BindingInfo>,
    pub instances: Vec<BindingInfo>,
    pub children: Vec<ContainerSnapshot>,
}

impl ContainerSnapshot {
    /// Bindings in this container and all descendants.
    pub fn binding_count(&self) -> usize {
        self.factories.len()
            + self.instances.len()
            + self
                .children
                .iter()
                .map(ContainerSnapshot::binding_count)
                .sum::<usize>()
    }

    /// Containers in this subtree, this one included.
    pub fn container_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ContainerSnapshot::container_count)
            .sum::<usize>()
    }
}

/// Indented tree, one line per container and binding.
impl fmt::Display for ContainerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

impl ContainerSnapshot {
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        writeln!(
            f,
            "{}{}{}",
            pad,
            self.label,
            if self.disposed { " (disposed)" } else { "" }
        )?;
        for binding in &self.factories {
            if let Some(scope) = binding.scope {
                writeln!(f, "{}  factory {} {} -> {}", pad, scope, binding.slot, binding.type_name)?;
            }
        }
        for binding in &self.instances {
            writeln!(f, "{}  instance {} -> {}", pad, binding.slot, binding.type_name)?;
        }
        for child in &self.children {
            child.write_tree(f, indent + 1)?;
        }
        Ok(())
    }
}

#[cfg(feature = "graph-export")]
#[derive(Serialize)]
struct Export<'a> {
    exported_at: String,
    version: &'static str,
    tree: &'a ContainerSnapshot,
}

#[cfg(feature = "graph-export")]
impl ContainerSnapshot {
    fn export(&self) -> Export<'_> {
        Export {
            exported_at: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            tree: self,
        }
    }

    /// Pretty JSON with an export timestamp.
    pub fn to_json(&self) -> DiResult<String> {
        serde_json::to_string_pretty(&self.export()).map_err(|e| DiError::Export(e.to_string()))
    }

    /// YAML with an export timestamp.
    pub fn to_yaml(&self) -> DiResult<String> {
        serde_yaml::to_string(&self.export()).map_err(|e| DiError::Export(e.to_string()))
    }
}

impl Container {
    /// Captures this container and its subtree.
    pub fn snapshot(&self) -> ContainerSnapshot {
        let (mut factories, mut instances) = {
            let registry = self.inner.registry.borrow();
            let factories: Vec<BindingInfo> = registry
                .factories()
                .map(|(slot, binding)| BindingInfo {
                    slot: slot.to_string(),
                    scope: Some(binding.scope),
                    type_name: binding.type_name,
                })
                .collect();
            let instances: Vec<BindingInfo> = registry
                .instances()
                .map(|(slot, entry)| BindingInfo {
                    slot: slot.to_string(),
                    scope: None,
                    type_name: entry.type_name,
                })
                .collect();
            (factories, instances)
        };
        factories.sort_by(|a, b| a.slot.cmp(&b.slot));
        instances.sort_by(|a, b| a.slot.cmp(&b.slot));

        ContainerSnapshot {
            label: self.label(),
            path: self.path(),
            depth: self.depth(),
            disposed: self.is_disposed(),
            factories,
            instances,
            children: self.children().iter().map(Container::snapshot).collect(),
        }
    }
}
