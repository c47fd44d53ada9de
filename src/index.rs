//! The top-level index document.
//!
//! One per documentation tree: namespace/type/assembly listings plus the
//! extension-method registry. Listings are kept sorted so successive runs
//! produce reproducible diffs.

use indexmap::IndexMap;

use crate::declarations::TypeKind;
use crate::model::{AssemblyInfoNode, TypeDoc, record_assembly};

/// One type listed under a namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub name: String,
    pub kind: TypeKind,
}

/// One registered extension method: the type it extends and the member
/// reference that documents it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionMethodRef {
    pub host_type: String,
    pub member: String,
}

/// The aggregate index over every documented type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexDoc {
    pub title: String,
    pub assemblies: Vec<AssemblyInfoNode>,
    pub namespaces: IndexMap<String, Vec<IndexEntry>>,
    pub extension_methods: Vec<ExtensionMethodRef>,
}

impl IndexDoc {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// List a documented type under its namespace, reusing any existing
    /// entry.
    pub fn record_type(&mut self, doc: &TypeDoc) {
        let entries = self.namespaces.entry(doc.namespace.clone()).or_default();
        match entries.iter_mut().find(|e| e.name == doc.name()) {
            Some(entry) => entry.kind = doc.kind,
            None => entries.push(IndexEntry {
                name: doc.name().to_string(),
                kind: doc.kind,
            }),
        }
    }

    pub fn record_assembly(&mut self, name: &str, version: &str) {
        record_assembly(&mut self.assemblies, name, version, None);
    }

    pub fn record_extension_method(&mut self, host_type: &str, member: &str) {
        let entry = ExtensionMethodRef {
            host_type: host_type.to_string(),
            member: member.to_string(),
        };
        if !self.extension_methods.contains(&entry) {
            self.extension_methods.push(entry);
        }
    }

    /// Canonical ordering: namespaces and their types sorted by name, the
    /// extension registry by (host, member).
    pub fn sort(&mut self) {
        self.namespaces.sort_keys();
        for entries in self.namespaces.values_mut() {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }
        self.extension_methods
            .sort_by(|a, b| (&a.host_type, &a.member).cmp(&(&b.host_type, &b.member)));
        self.assemblies.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_are_grouped_and_sorted() {
        let mut index = IndexDoc::new("Widgets");
        index.record_type(&TypeDoc::new("Widgets.Zoo", "Widgets", TypeKind::Class));
        index.record_type(&TypeDoc::new("Widgets.Alpha", "Widgets", TypeKind::Struct));
        index.record_type(&TypeDoc::new("Widgets.Alpha", "Widgets", TypeKind::Struct));
        index.sort();
        let entries = &index.namespaces["Widgets"];
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Alpha");
        assert_eq!(entries[1].name, "Zoo");
    }

    #[test]
    fn extension_registry_dedupes() {
        let mut index = IndexDoc::new("Widgets");
        index.record_extension_method("Widgets.Widget", "M:Widgets.Ext.Frob");
        index.record_extension_method("Widgets.Widget", "M:Widgets.Ext.Frob");
        assert_eq!(index.extension_methods.len(), 1);
    }
}
