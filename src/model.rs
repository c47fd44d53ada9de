//! The in-memory Document Model.
//!
//! One document per documented type: a tree of types → members → signature
//! variants → parameters/attributes/generic parameters, each node
//! addressable by a stable key derived from declaration identity. Mutation
//! goes through explicit upsert/remove helpers rather than ad hoc node
//! splicing, so "reuse the node if the value matches" is one operation with
//! one meaning everywhere.
//!
//! Human-authored documentation text lives in [`DocBlock`] and is never
//! regenerated: the engine only plants placeholders for newly discovered
//! slots and reads prose to decide whether a node is protected.

use indexmap::{IndexMap, IndexSet};

use crate::declarations::{MemberKind, RefKind, TypeKind};
use crate::formatter::normalize_fingerprint;
use crate::frameworks::{FrameworkSet, Membership};
use crate::policy::ApiStyle;

/// One (language, value, usage) signature rendering with the frameworks it
/// applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureVariant {
    pub language: String,
    pub value: String,
    pub usage: Option<String>,
    pub frameworks: Membership,
}

/// A single tracked value: the payload plus the frameworks it holds in.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedValue {
    pub value: String,
    pub frameworks: Membership,
}

/// A membership-tracked list of values. Two mutation disciplines share this
/// type: variant facts (base type, return type) keep membership sets
/// disjoint per distinct value via [`TrackedValues::sync`]; set facts
/// (interface lists) accumulate via [`TrackedValues::append`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedValues(Vec<TrackedValue>);

impl TrackedValues {
    pub fn values(&self) -> &[TrackedValue] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v.value == value)
    }

    /// Clean-slate replacement: a single entry holding only `framework`.
    pub fn replace_with(&mut self, value: &str, framework: &str) {
        self.0.clear();
        self.0.push(TrackedValue {
            value: value.to_string(),
            frameworks: Membership::only(framework),
        });
    }

    /// Variant-fact discipline: an entry with the same value gains the
    /// framework; otherwise the framework is removed from every other entry
    /// and a new entry carrying only it is created. Entries whose set
    /// becomes empty are dropped.
    pub fn sync(&mut self, value: &str, framework: &str, known: &FrameworkSet) {
        if let Some(entry) = self.0.iter_mut().find(|v| v.value == value) {
            entry.frameworks.insert(framework);
            return;
        }
        for entry in &mut self.0 {
            entry.frameworks.remove(framework, known);
        }
        self.0.retain(|v| !v.frameworks.is_empty());
        self.0.push(TrackedValue {
            value: value.to_string(),
            frameworks: Membership::only(framework),
        });
    }

    /// Set-fact discipline: upsert the value and add the framework, never
    /// removing anything.
    pub fn append(&mut self, value: &str, framework: &str) {
        match self.0.iter_mut().find(|v| v.value == value) {
            Some(entry) => entry.frameworks.insert(framework),
            None => self.0.push(TrackedValue {
                value: value.to_string(),
                frameworks: Membership::only(framework),
            }),
        }
    }

    /// Restore a persisted entry verbatim (deserialization edge).
    pub fn push_raw(&mut self, value: String, frameworks: Membership) {
        self.0.push(TrackedValue { value, frameworks });
    }

    /// Last-pass canonicalization: universal sets collapse to elided form,
    /// empty entries disappear.
    pub fn canonicalize(&mut self, known: &FrameworkSet) {
        for entry in &mut self.0 {
            entry.frameworks.canonicalize(known);
        }
        self.0.retain(|v| !v.frameworks.is_empty());
    }
}

/// Per-framework assembly membership of a type or member.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyInfoNode {
    pub name: String,
    pub versions: Vec<String>,
    pub apistyle: Option<ApiStyle>,
}

/// One link of a persisted type-forwarding chain.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeForwardNode {
    pub from_assembly: String,
    pub from_version: String,
    pub to_assembly: String,
    pub to_version: String,
    pub frameworks: Membership,
}

/// A documented parameter slot. `index` is explicit only once a framework
/// alternate exists at the slot; it is stripped again when every parameter
/// in the group is universal.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    pub name: String,
    pub ty: String,
    pub ref_kind: RefKind,
    pub index: Option<usize>,
    pub frameworks: Membership,
}

/// A documented generic parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParamNode {
    pub name: String,
    pub constraints: Vec<String>,
    pub frameworks: Membership,
}

/// A documented exception entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionDoc {
    pub cref: String,
    pub text: String,
}

/// Human-authored prose attached to a node. Entries hold raw XML fragments
/// and are preserved byte for byte across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocBlock {
    pub summary: String,
    pub remarks: Option<String>,
    pub params: IndexMap<String, String>,
    pub typeparams: IndexMap<String, String>,
    pub returns: Option<String>,
    pub value: Option<String>,
    pub exceptions: Vec<ExceptionDoc>,
    pub altmembers: Vec<String>,
}

/// Whether a prose fragment is the well-known placeholder (or blank).
pub fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty()
        || trimmed
            .trim_end_matches('.')
            .eq_ignore_ascii_case("to be added")
}

impl DocBlock {
    /// A fresh block holding only the placeholder summary.
    pub fn placeholder(placeholder: &str) -> Self {
        Self {
            summary: placeholder.to_string(),
            ..Default::default()
        }
    }

    /// True if any slot carries real user prose.
    pub fn has_user_content(&self) -> bool {
        if !is_placeholder(&self.summary) {
            return true;
        }
        if self.remarks.as_deref().is_some_and(|t| !is_placeholder(t)) {
            return true;
        }
        if self.returns.as_deref().is_some_and(|t| !is_placeholder(t)) {
            return true;
        }
        if self.value.as_deref().is_some_and(|t| !is_placeholder(t)) {
            return true;
        }
        if self
            .params
            .values()
            .chain(self.typeparams.values())
            .any(|t| !is_placeholder(t))
        {
            return true;
        }
        self.exceptions.iter().any(|e| !is_placeholder(&e.text))
    }

    /// Plant a placeholder entry for a newly discovered parameter; existing
    /// prose is left alone.
    pub fn ensure_param(&mut self, name: &str, placeholder: &str) {
        if !self.params.contains_key(name) {
            self.params.insert(name.to_string(), placeholder.to_string());
        }
    }

    pub fn ensure_typeparam(&mut self, name: &str, placeholder: &str) {
        if !self.typeparams.contains_key(name) {
            self.typeparams
                .insert(name.to_string(), placeholder.to_string());
        }
    }

    pub fn ensure_returns(&mut self, placeholder: &str) {
        if self.returns.is_none() {
            self.returns = Some(placeholder.to_string());
        }
    }

    pub fn ensure_value(&mut self, placeholder: &str) {
        if self.value.is_none() {
            self.value = Some(placeholder.to_string());
        }
    }
}

/// One documented member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDoc {
    pub name: String,
    pub explicit_interface: Option<String>,
    pub kind: MemberKind,
    pub signatures: Vec<SignatureVariant>,
    pub return_type: TrackedValues,
    pub parameters: Vec<ParameterNode>,
    pub type_params: Vec<TypeParamNode>,
    pub attributes: Vec<String>,
    pub implements: Vec<String>,
    pub assemblies: Vec<AssemblyInfoNode>,
    pub apistyle: Option<ApiStyle>,
    pub docs: DocBlock,
    /// Frameworks that matched this member during the current run. Run
    /// bookkeeping only, never serialized.
    pub(crate) seen_frameworks: IndexSet<String>,
}

impl MemberDoc {
    pub fn new(name: &str, kind: MemberKind) -> Self {
        Self {
            name: name.to_string(),
            explicit_interface: None,
            kind,
            signatures: Vec::new(),
            return_type: TrackedValues::default(),
            parameters: Vec::new(),
            type_params: Vec::new(),
            attributes: Vec::new(),
            implements: Vec::new(),
            assemblies: Vec::new(),
            apistyle: None,
            docs: DocBlock::default(),
            seen_frameworks: IndexSet::new(),
        }
    }

    /// Display name as persisted: explicit implementations are qualified
    /// with their declaring interface.
    pub fn display_name(&self) -> String {
        match &self.explicit_interface {
            Some(iface) => format!("{}.{}", iface, self.name),
            None => self.name.clone(),
        }
    }

    pub fn signature(&self, language: &str) -> Option<&SignatureVariant> {
        self.signatures.iter().find(|s| s.language == language)
    }

    /// The matching key derived from the stored signature in the
    /// fingerprint language, if one is stored.
    pub fn fingerprint(&self, language: &str) -> Option<String> {
        self.signature(language)
            .map(|s| normalize_fingerprint(&s.value))
    }

    pub fn has_user_content(&self) -> bool {
        self.docs.has_user_content()
    }
}

/// One documented type: the root of a persisted document.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDoc {
    pub full_name: String,
    pub namespace: String,
    pub kind: TypeKind,
    pub signatures: Vec<SignatureVariant>,
    pub assemblies: Vec<AssemblyInfoNode>,
    pub type_params: Vec<TypeParamNode>,
    pub base: TrackedValues,
    pub interfaces: TrackedValues,
    pub attributes: Vec<String>,
    pub forwards: Vec<TypeForwardNode>,
    pub members: Vec<MemberDoc>,
    pub docs: DocBlock,
}

impl TypeDoc {
    pub fn new(full_name: &str, namespace: &str, kind: TypeKind) -> Self {
        Self {
            full_name: full_name.to_string(),
            namespace: namespace.to_string(),
            kind,
            signatures: Vec::new(),
            assemblies: Vec::new(),
            type_params: Vec::new(),
            base: TrackedValues::default(),
            interfaces: TrackedValues::default(),
            attributes: Vec::new(),
            forwards: Vec::new(),
            members: Vec::new(),
            docs: DocBlock::default(),
        }
    }

    /// Short name: the last segment of the qualified name.
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.full_name)
    }

    /// Upsert an assembly-info entry by (name, apistyle) and record the
    /// version, reusing the node when it already matches.
    pub fn record_assembly(&mut self, name: &str, version: &str, apistyle: Option<ApiStyle>) {
        record_assembly(&mut self.assemblies, name, version, apistyle);
    }
}

/// Shared upsert for assembly-info containers on types and members.
pub(crate) fn record_assembly(
    assemblies: &mut Vec<AssemblyInfoNode>,
    name: &str,
    version: &str,
    apistyle: Option<ApiStyle>,
) {
    match assemblies
        .iter_mut()
        .find(|a| a.name == name && a.apistyle == apistyle)
    {
        Some(entry) => {
            if !entry.versions.iter().any(|v| v == version) {
                entry.versions.push(version.to_string());
            }
        }
        None => assemblies.push(AssemblyInfoNode {
            name: name.to_string(),
            versions: vec![version.to_string()],
            apistyle,
        }),
    }
}
