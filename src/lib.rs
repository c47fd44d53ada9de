//! # docsync
//!
//! An incremental reconciliation engine for hand-annotated API reference
//! documentation trees. Given a persisted document per documented type and
//! freshly introspected snapshots of the type catalog ("frameworks"), the
//! engine merges newly discovered structural facts (signatures,
//! attributes, base types, parameters, generic constraints) into the
//! existing documents while preserving human-authored prose, tracking
//! which variant facts apply to which subset of frameworks, and retiring
//! stale facts without destroying user content.
//!
//! ## Pipeline
//!
//! A run processes frameworks in a fixed declared order; for each
//! (type, framework) pair the [`Reconciler`] applies four stages:
//!
//! 1. **Duplicate resolution** — sibling nodes sharing a signature
//!    fingerprint collapse deterministically (documented node wins, ties
//!    keep the first encountered).
//! 2. **Match & update** — existing nodes matching a current declaration
//!    by fingerprint are refreshed in place; membership sets gain the
//!    current framework.
//! 3. **Create** — declarations with no node become fresh members tagged
//!    with the current framework.
//! 4. **Retire** — on the final pass, nodes no framework matched go
//!    through the removal-policy state machine
//!    {Delete, Preserve, MarkClassicOnly, MarkUnifiedOnly}.
//!
//! Facts holding in every framework of the run are canonicalized to an
//! elided "universal" form on the final pass, keeping steady-state
//! documents framework-set-agnostic.
//!
//! ## Collaborators
//!
//! The symbol-extraction front end and the signature renderers stay
//! outside: callers supply [`TypeDecl`]/[`Declaration`] values (the Type
//! Model) and [`SignatureFormatter`] implementations (one per output
//! language). The engine owns matching, variant tracking, policy, and the
//! persisted document vocabulary.
//!
//! ## Example
//!
//! ```rust
//! use docsync::{
//!     AssemblyRef, Declaration, DeclarationKind, FormatterSet, FrameworkSet, Reconciler,
//!     TypeDecl, TypeDoc, TypeKind, UpdateOptions, UpdateStats,
//! };
//!
//! let frameworks = FrameworkSet::new(["net6", "net8"]);
//! let formatters = FormatterSet::canonical();
//! let options = UpdateOptions::default();
//! let stats = UpdateStats::new();
//! let mut reconciler = Reconciler::new(&formatters, &frameworks, &options, &stats);
//!
//! let decl = TypeDecl {
//!     full_name: "Widgets.Widget".into(),
//!     namespace: "Widgets".into(),
//!     kind: TypeKind::Class,
//!     base: Some("System.Object".into()),
//!     interfaces: vec![],
//!     type_params: vec![],
//!     attributes: vec![],
//!     assembly: AssemblyRef { name: "Widgets".into(), version: "1.0.0.0".into() },
//!     forwards: vec![],
//!     enclosing_forwards: vec![],
//! };
//! let frob = Declaration {
//!     name: "Frob".into(),
//!     explicit_interface: None,
//!     attributes: vec![],
//!     implements: vec![],
//!     assembly: decl.assembly.clone(),
//!     kind: DeclarationKind::Method {
//!         params: vec![],
//!         type_params: vec![],
//!         returns: "System.Void".into(),
//!     },
//! };
//!
//! let mut doc = TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class);
//! for pass in frameworks.passes() {
//!     reconciler
//!         .reconcile(&mut doc, &decl, std::slice::from_ref(&frob), pass)
//!         .unwrap();
//! }
//! assert_eq!(stats.added(), 1);
//! ```

pub mod attributes;
pub mod declarations;
pub mod error;
pub mod formatter;
pub mod forwarding;
pub mod frameworks;
pub mod index;
pub mod model;
pub mod parameters;
pub mod policy;
pub mod reconciler;
pub mod signatures;
pub mod stats;
pub mod xml;

// Re-export primary public API
pub use declarations::{
    AssemblyRef, AttrDecl, Declaration, DeclarationKind, GenericParamDecl, InterfaceDecl,
    MemberKind, ParamDecl, RefKind, TypeDecl, TypeForwardDecl, TypeKind,
};
pub use error::ReconcileError;
pub use formatter::{CanonicalFormatter, FormatterSet, SignatureFormatter};
pub use frameworks::{FrameworkSet, Membership, PassInfo};
pub use index::IndexDoc;
pub use model::{DocBlock, MemberDoc, SignatureVariant, TypeDoc};
pub use policy::{ApiStyle, RunKind, UpdateOptions};
pub use reconciler::{Reconciler, RemovalAction};
pub use stats::{ReconcileOutcome, UpdateStats};
pub use xml::{XmlError, read_index, read_type, write_index, write_type};
