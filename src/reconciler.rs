//! The reconciliation engine.
//!
//! One call merges one (type, framework) unit of Type Model facts into the
//! document, in four stages:
//!
//! 1. **Duplicate resolution** — existing sibling nodes sharing a
//!    fingerprint collapse to one; the node carrying user prose wins, ties
//!    go to the first encountered.
//! 2. **Match & update** — every existing node whose stored canonical
//!    signature matches a current declaration is refreshed in place:
//!    signature variants, parameters, generic parameters, attributes,
//!    interface-implementation references, assembly membership.
//! 3. **Create** — declarations with no matching node become fresh members
//!    tagged with the current framework.
//! 4. **Retire** — on the run's final pass, nodes no framework matched are
//!    fed to the removal-policy state machine
//!    {Delete, Preserve, MarkClassicOnly, MarkUnifiedOnly}.
//!
//! The engine is single-threaded per document: matching and duplicate
//! resolution read and write sibling nodes within one pass. Distinct types
//! may be processed in parallel within a pass by giving each worker its own
//! `Reconciler` (with stable type affinity across passes) and merging the
//! shared [`UpdateStats`] afterwards.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::attributes::sync_attributes;
use crate::declarations::{Declaration, MemberKind, TypeDecl};
use crate::error::ReconcileError;
use crate::formatter::FormatterSet;
use crate::forwarding::{canonicalize_forwards, sync_forwards};
use crate::frameworks::{FrameworkSet, PassInfo};
use crate::model::{DocBlock, MemberDoc, TypeDoc, record_assembly};
use crate::parameters::{
    canonicalize_parameters, canonicalize_type_params, sync_parameters, sync_type_params,
};
use crate::policy::{ApiStyle, UpdateOptions};
use crate::signatures::{canonicalize_signatures, sync_signature};
use crate::stats::{ReconcileOutcome, UpdateStats};

/// Resolution for a member node no framework of the run matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalAction {
    Delete,
    Preserve,
    MarkClassicOnly,
    MarkUnifiedOnly,
}

/// The engine. Holds only explicit run context (formatters, the run's
/// framework set, policy, shared counters) plus the run-scoped record of
/// which types have already had their clean-slate pass.
pub struct Reconciler<'a> {
    formatters: &'a FormatterSet,
    frameworks: &'a FrameworkSet,
    options: &'a UpdateOptions,
    stats: &'a UpdateStats,
    visited: HashSet<String>,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        formatters: &'a FormatterSet,
        frameworks: &'a FrameworkSet,
        options: &'a UpdateOptions,
        stats: &'a UpdateStats,
    ) -> Self {
        Self {
            formatters,
            frameworks,
            options,
            stats,
            visited: HashSet::new(),
        }
    }

    /// Merge one framework's view of one type into its document.
    pub fn reconcile(
        &mut self,
        doc: &mut TypeDoc,
        decl: &TypeDecl,
        members: &[Declaration],
        pass: PassInfo<'_>,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let first_for_type = self.visited.insert(decl.full_name.clone());
        let outcome = self
            .reconcile_inner(doc, decl, members, pass, first_for_type)
            .map_err(|e| e.in_assembly(&decl.assembly.name, &decl.assembly.version))?;
        self.stats.record(&outcome);
        Ok(outcome)
    }

    fn reconcile_inner(
        &self,
        doc: &mut TypeDoc,
        decl: &TypeDecl,
        members: &[Declaration],
        pass: PassInfo<'_>,
        first_for_type: bool,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let ty_name = decl.full_name.clone();

        if first_for_type {
            for node in &mut doc.members {
                node.seen_frameworks.clear();
            }
        }

        self.sync_type_level(doc, decl, pass, first_for_type);

        // Current declarations keyed by fingerprint, in declaration order.
        // The Type Model is required to yield a stable order; the first of
        // two colliding declarations wins.
        let mut current: IndexMap<String, &Declaration> = IndexMap::new();
        for member in members {
            if hidden_explicit_impl(member, decl) {
                debug!(
                    ty = %ty_name,
                    member = %member.display_name(),
                    "explicit implementation of a non-public interface; excluded"
                );
                continue;
            }
            let Some(fingerprint) = self.formatters.member_fingerprint(member) else {
                debug!(
                    ty = %ty_name,
                    member = %member.display_name(),
                    "no computable signature; member skipped"
                );
                continue;
            };
            if current.contains_key(&fingerprint) {
                warn!(
                    ty = %ty_name,
                    member = %member.display_name(),
                    signature = %fingerprint,
                    "type model yielded two declarations with one fingerprint; keeping the first"
                );
            } else {
                current.insert(fingerprint, member);
            }
        }

        let mut outcome = ReconcileOutcome::default();

        self.resolve_duplicates(doc, &mut outcome)?;

        // Match and refresh surviving nodes.
        let mut matched: HashSet<String> = HashSet::new();
        for node in &mut doc.members {
            let fingerprint = node
                .fingerprint(self.formatters.fingerprint_language())
                .ok_or_else(|| ReconcileError::UnmatchableNode {
                    ty: ty_name.clone(),
                    member: node.display_name(),
                })?;
            if let Some(declaration) = current.get(fingerprint.as_str()).copied() {
                self.update_member(node, declaration, pass);
                matched.insert(fingerprint);
                outcome.unchanged += 1;
            }
        }

        // Fresh members for unmatched declarations.
        for (fingerprint, declaration) in &current {
            if matched.contains(fingerprint.as_str()) {
                continue;
            }
            let node = self.create_member(*declaration, pass);
            debug!(
                ty = %ty_name,
                member = %node.display_name(),
                framework = pass.framework,
                "created member"
            );
            doc.members.push(node);
            outcome.added += 1;
        }

        // Stale nodes are only decidable once every framework has spoken.
        if pass.is_last() {
            self.retire_stale(doc, &ty_name, &mut outcome);
            self.finalize_type(doc);
        }

        Ok(outcome)
    }

    /// Collapse sibling nodes sharing a fingerprint. The node with user
    /// prose survives; ties keep the first encountered.
    fn resolve_duplicates(
        &self,
        doc: &mut TypeDoc,
        outcome: &mut ReconcileOutcome,
    ) -> Result<(), ReconcileError> {
        let language = self.formatters.fingerprint_language();
        let ty_name = doc.full_name.clone();

        let mut by_fingerprint: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (i, node) in doc.members.iter().enumerate() {
            let fingerprint =
                node.fingerprint(language)
                    .ok_or_else(|| ReconcileError::UnmatchableNode {
                        ty: ty_name.clone(),
                        member: node.display_name(),
                    })?;
            by_fingerprint.entry(fingerprint).or_default().push(i);
        }

        let mut doomed: Vec<usize> = Vec::new();
        for (fingerprint, indices) in &by_fingerprint {
            if indices.len() < 2 {
                continue;
            }
            let keeper = indices
                .iter()
                .copied()
                .find(|&i| doc.members[i].has_user_content())
                .unwrap_or(indices[0]);
            for &i in indices {
                if i == keeper {
                    continue;
                }
                if doc.members[i].has_user_content() {
                    warn!(
                        ty = %ty_name,
                        member = %doc.members[i].display_name(),
                        signature = %fingerprint,
                        "duplicate members both carry documentation; keeping the first encountered"
                    );
                } else {
                    warn!(
                        ty = %ty_name,
                        member = %doc.members[i].display_name(),
                        signature = %fingerprint,
                        "removing undocumented duplicate member"
                    );
                }
                doomed.push(i);
            }
        }

        doomed.sort_unstable();
        for i in doomed.into_iter().rev() {
            doc.members.remove(i);
            outcome.removed += 1;
        }
        Ok(())
    }

    fn sync_type_level(
        &self,
        doc: &mut TypeDoc,
        decl: &TypeDecl,
        pass: PassInfo<'_>,
        first_for_type: bool,
    ) {
        let fx = pass.framework;
        let known = pass.known();

        doc.kind = decl.kind;
        doc.namespace = decl.namespace.clone();

        let fingerprint = self.formatters.fingerprint_formatter();
        if let Some(value) = fingerprint.type_signature(decl) {
            sync_signature(
                &mut doc.signatures,
                fingerprint.language(),
                &value,
                fingerprint.type_usage(decl).as_deref(),
                fx,
                known,
                first_for_type,
            );
        }
        for formatter in self.formatters.languages() {
            if let Some(value) = formatter.type_signature(decl) {
                sync_signature(
                    &mut doc.signatures,
                    formatter.language(),
                    &value,
                    formatter.type_usage(decl).as_deref(),
                    fx,
                    known,
                    first_for_type,
                );
            }
        }

        // Base and interfaces: recomputed fully on the first pass, only
        // appended to by later passes of the same run.
        if first_for_type {
            doc.base.clear();
            doc.interfaces.clear();
        }
        match &decl.base {
            Some(base) if first_for_type => doc.base.replace_with(base, fx),
            Some(base) => doc.base.append(base, fx),
            None => {}
        }
        for iface in decl.interfaces.iter().filter(|i| i.public) {
            doc.interfaces.append(&iface.name, fx);
        }

        sync_type_params(
            &decl.type_params,
            &mut doc.type_params,
            fx,
            known,
            first_for_type,
        );
        sync_attributes(
            &decl.attributes,
            &mut doc.attributes,
            self.formatters,
            first_for_type,
        );
        doc.record_assembly(
            &decl.assembly.name,
            &decl.assembly.version,
            self.options.run_kind.style(),
        );
        sync_forwards(
            &decl.forwards,
            &decl.enclosing_forwards,
            &mut doc.forwards,
            fx,
            first_for_type,
        );

        if doc.docs.summary.is_empty() {
            doc.docs.summary = self.options.placeholder.clone();
        }
        for tp in &decl.type_params {
            doc.docs.ensure_typeparam(&tp.name, &self.options.placeholder);
        }
    }

    /// Refresh one matched node in place. The member's own first pass is
    /// the first framework of the run that matched it, which may be later
    /// than the type's first pass.
    fn update_member(&self, node: &mut MemberDoc, decl: &Declaration, pass: PassInfo<'_>) {
        let fx = pass.framework;
        let known = pass.known();
        let first = node.seen_frameworks.is_empty();
        node.seen_frameworks.insert(fx.to_string());

        node.kind = decl.member_kind();
        node.name = decl.name.clone();
        node.explicit_interface = decl.explicit_interface.clone();

        let fingerprint = self.formatters.fingerprint_formatter();
        if let Some(value) = fingerprint.member_signature(decl) {
            sync_signature(
                &mut node.signatures,
                fingerprint.language(),
                &value,
                fingerprint.member_usage(decl).as_deref(),
                fx,
                known,
                first,
            );
        }
        for formatter in self.formatters.languages() {
            if let Some(value) = formatter.member_signature(decl) {
                sync_signature(
                    &mut node.signatures,
                    formatter.language(),
                    &value,
                    formatter.member_usage(decl).as_deref(),
                    fx,
                    known,
                    first,
                );
            }
        }

        match decl.return_type() {
            Some(ret) if first => node.return_type.replace_with(ret, fx),
            Some(ret) => node.return_type.sync(ret, fx, known),
            None => {
                if first {
                    node.return_type.clear();
                }
            }
        }

        if sync_parameters(decl.params(), &mut node.parameters, fx, known, first) {
            debug!(
                member = %node.display_name(),
                framework = fx,
                "parameter framework alternate recorded"
            );
        }
        sync_type_params(decl.type_params(), &mut node.type_params, fx, known, first);
        sync_attributes(&decl.attributes, &mut node.attributes, self.formatters, first);

        // Interface-implementation references come straight from the Type
        // Model's interface map.
        if first {
            node.implements = decl.implements.clone();
        } else {
            for implemented in &decl.implements {
                if !node.implements.contains(implemented) {
                    node.implements.push(implemented.clone());
                }
            }
        }

        record_assembly(
            &mut node.assemblies,
            &decl.assembly.name,
            &decl.assembly.version,
            self.options.run_kind.style(),
        );

        // A node tagged for one style that reappears under the other is no
        // longer style-scoped.
        if let (Some(style), Some(tag)) = (self.options.run_kind.style(), node.apistyle) {
            if tag != style {
                node.apistyle = None;
            }
        }

        for param in decl.params() {
            node.docs.ensure_param(&param.name, &self.options.placeholder);
        }
        for tp in decl.type_params() {
            node.docs.ensure_typeparam(&tp.name, &self.options.placeholder);
        }
        match node.kind {
            MemberKind::Method => {
                if decl.return_type().is_some_and(|r| r != "System.Void") {
                    node.docs.ensure_returns(&self.options.placeholder);
                }
            }
            MemberKind::Property => node.docs.ensure_value(&self.options.placeholder),
            MemberKind::Field | MemberKind::Event | MemberKind::Constructor => {}
        }
    }

    fn create_member(&self, decl: &Declaration, pass: PassInfo<'_>) -> MemberDoc {
        let mut node = MemberDoc::new(&decl.name, decl.member_kind());
        node.explicit_interface = decl.explicit_interface.clone();
        node.docs = DocBlock::placeholder(&self.options.placeholder);
        if self.options.final_style_run {
            node.apistyle = self.options.run_kind.style();
        }
        self.update_member(&mut node, decl, pass);
        node
    }

    /// Resolve nodes that no framework of the run matched.
    fn retire_stale(&self, doc: &mut TypeDoc, ty_name: &str, outcome: &mut ReconcileOutcome) {
        let run_style = self.options.run_kind.style();
        let mut kept = Vec::with_capacity(doc.members.len());
        for mut node in std::mem::take(&mut doc.members) {
            if !node.seen_frameworks.is_empty() {
                kept.push(node);
                continue;
            }
            let other_style = run_style.is_some_and(|s| node.apistyle == Some(s.other()));
            match self.removal_action(&node) {
                RemovalAction::Delete => {
                    debug!(
                        ty = %ty_name,
                        member = %node.display_name(),
                        "deleting member absent from every framework"
                    );
                    outcome.removed += 1;
                }
                RemovalAction::Preserve => {
                    if !other_style {
                        if node.has_user_content() {
                            warn!(
                                ty = %ty_name,
                                member = %node.display_name(),
                                "member no longer exists but carries documentation; preserved"
                            );
                        } else {
                            warn!(
                                ty = %ty_name,
                                member = %node.display_name(),
                                "stale member preserved (delete disabled)"
                            );
                        }
                    }
                    kept.push(node);
                }
                RemovalAction::MarkClassicOnly => {
                    debug!(ty = %ty_name, member = %node.display_name(), "marked classic-only");
                    node.apistyle = Some(ApiStyle::Classic);
                    kept.push(node);
                }
                RemovalAction::MarkUnifiedOnly => {
                    debug!(ty = %ty_name, member = %node.display_name(), "marked unified-only");
                    node.apistyle = Some(ApiStyle::Unified);
                    kept.push(node);
                }
            }
        }
        doc.members = kept;
    }

    /// The removal-policy state machine.
    pub fn removal_action(&self, node: &MemberDoc) -> RemovalAction {
        let run_style = self.options.run_kind.style();
        if let (Some(style), Some(tag)) = (run_style, node.apistyle) {
            if tag != style {
                // Belongs to the other style; not this run's decision.
                return RemovalAction::Preserve;
            }
        }
        if self.options.preserve {
            return RemovalAction::Preserve;
        }
        match run_style {
            // Untagged and missing from this style: assume the other style
            // still has it and demote; that style's own run will decide.
            Some(ApiStyle::Classic) if node.apistyle.is_none() => RemovalAction::MarkUnifiedOnly,
            Some(ApiStyle::Unified) if node.apistyle.is_none() => RemovalAction::MarkClassicOnly,
            _ if self.options.delete_stale => RemovalAction::Delete,
            _ => RemovalAction::Preserve,
        }
    }

    /// Last-pass canonicalization: universal elision everywhere, empty
    /// variants dropped, unnecessary parameter indices stripped. Idempotent,
    /// and callable separately for types the final framework never touched.
    pub fn finalize_type(&self, doc: &mut TypeDoc) {
        let known = self.frameworks;
        canonicalize_signatures(&mut doc.signatures, known);
        doc.base.canonicalize(known);
        doc.interfaces.canonicalize(known);
        canonicalize_type_params(&mut doc.type_params, known);
        canonicalize_forwards(&mut doc.forwards, known);
        for member in &mut doc.members {
            canonicalize_signatures(&mut member.signatures, known);
            member.return_type.canonicalize(known);
            canonicalize_parameters(&mut member.parameters, known);
            canonicalize_type_params(&mut member.type_params, known);
        }
    }
}

/// An explicitly implemented member whose declaring interface is not public
/// never surfaces, independent of framework.
fn hidden_explicit_impl(member: &Declaration, ty: &TypeDecl) -> bool {
    match &member.explicit_interface {
        Some(iface) => !ty.interfaces.iter().any(|i| i.public && i.name == *iface),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::{
        AssemblyRef, AttrDecl, DeclarationKind, InterfaceDecl, ParamDecl, TypeKind,
    };
    use crate::policy::RunKind;

    fn assembly() -> AssemblyRef {
        AssemblyRef {
            name: "Widgets".into(),
            version: "1.0.0.0".into(),
        }
    }

    fn type_decl() -> TypeDecl {
        TypeDecl {
            full_name: "Widgets.Widget".into(),
            namespace: "Widgets".into(),
            kind: TypeKind::Class,
            base: Some("System.Object".into()),
            interfaces: vec![InterfaceDecl {
                name: "System.IDisposable".into(),
                public: true,
            }],
            type_params: vec![],
            attributes: vec![AttrDecl::new("System.SerializableAttribute")],
            assembly: assembly(),
            forwards: vec![],
            enclosing_forwards: vec![],
        }
    }

    fn method(name: &str, params: Vec<ParamDecl>) -> Declaration {
        Declaration {
            name: name.into(),
            explicit_interface: None,
            attributes: vec![],
            implements: vec![],
            assembly: assembly(),
            kind: DeclarationKind::Method {
                params,
                type_params: vec![],
                returns: "System.Void".into(),
            },
        }
    }

    struct Fixture {
        formatters: FormatterSet,
        frameworks: FrameworkSet,
        options: UpdateOptions,
        stats: UpdateStats,
    }

    impl Fixture {
        fn new(frameworks: &[&str]) -> Self {
            Self {
                formatters: FormatterSet::canonical(),
                frameworks: FrameworkSet::new(frameworks.iter().copied()),
                options: UpdateOptions::default(),
                stats: UpdateStats::new(),
            }
        }

        fn reconciler(&self) -> Reconciler<'_> {
            Reconciler::new(&self.formatters, &self.frameworks, &self.options, &self.stats)
        }

        fn run(&self, doc: &mut TypeDoc, members_per_pass: &[&[Declaration]]) {
            let decl = type_decl();
            let mut reconciler = self.reconciler();
            for (i, members) in members_per_pass.iter().enumerate() {
                let pass = self.frameworks.pass(i).unwrap();
                reconciler.reconcile(doc, &decl, members, pass).unwrap();
            }
        }
    }

    fn empty_doc() -> TypeDoc {
        TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class)
    }

    #[test]
    fn creates_members_on_first_sight() {
        let fixture = Fixture::new(&["net6"]);
        let mut doc = empty_doc();
        let m = method("M", vec![]);
        fixture.run(&mut doc, &[&[m]]);
        assert_eq!(doc.members.len(), 1);
        assert_eq!(doc.members[0].name, "M");
        assert_eq!(fixture.stats.added(), 1);
        assert!(!doc.members[0].docs.has_user_content());
    }

    #[test]
    fn second_run_is_idempotent() {
        let fixture = Fixture::new(&["net6", "net8"]);
        let mut doc = empty_doc();
        let m = method("M", vec![ParamDecl::new("x", "System.Int32")]);
        fixture.run(&mut doc, &[&[m.clone()], &[m.clone()]]);
        let after_first = doc.clone();
        fixture.run(&mut doc, &[&[m.clone()], &[m]]);
        assert_eq!(doc, after_first);
    }

    #[test]
    fn placeholder_member_deleted_when_delete_enabled() {
        let mut fixture = Fixture::new(&["net6"]);
        fixture.options.delete_stale = true;
        let mut doc = empty_doc();
        // Seed the document with M via a first run.
        fixture.run(&mut doc, &[&[method("M", vec![])]]);
        assert_eq!(doc.members.len(), 1);
        // Next run: the declaration is gone.
        fixture.run(&mut doc, &[&[]]);
        assert!(doc.members.is_empty());
        assert_eq!(fixture.stats.removed(), 1);
    }

    #[test]
    fn documented_member_survives_without_delete() {
        let fixture = Fixture::new(&["net6"]);
        let mut doc = empty_doc();
        fixture.run(&mut doc, &[&[method("M", vec![])]]);
        doc.members[0].docs.summary = "Performs the frobnication.".into();
        fixture.run(&mut doc, &[&[]]);
        assert_eq!(doc.members.len(), 1);
        assert_eq!(fixture.stats.removed(), 0);
        assert_eq!(doc.members[0].docs.summary, "Performs the frobnication.");
    }

    #[test]
    fn duplicate_without_content_loses_regardless_of_order() {
        for content_first in [true, false] {
            let fixture = Fixture::new(&["net6"]);
            let mut doc = empty_doc();
            fixture.run(&mut doc, &[&[method("M", vec![])]]);
            let mut dup = doc.members[0].clone();
            if content_first {
                doc.members[0].docs.summary = "Documented.".into();
            } else {
                dup.docs.summary = "Documented.".into();
            }
            doc.members.push(dup);

            fixture.run(&mut doc, &[&[method("M", vec![])]]);
            assert_eq!(doc.members.len(), 1);
            assert_eq!(doc.members[0].docs.summary, "Documented.");
        }
    }

    #[test]
    fn hidden_explicit_impl_is_excluded() {
        let fixture = Fixture::new(&["net6"]);
        let mut doc = empty_doc();
        let mut m = method("Sneak", vec![]);
        m.explicit_interface = Some("Widgets.ISecret".into());
        fixture.run(&mut doc, &[&[m]]);
        assert!(doc.members.is_empty());
    }

    #[test]
    fn unified_run_demotes_untagged_stale_member() {
        let mut fixture = Fixture::new(&["net6"]);
        fixture.options.run_kind = RunKind::Unified;
        fixture.options.delete_stale = true;
        let mut doc = empty_doc();
        fixture.run(&mut doc, &[&[method("M", vec![])]]);
        // Member vanishes from the unified surface; delete must not fire.
        fixture.run(&mut doc, &[&[]]);
        assert_eq!(doc.members.len(), 1);
        assert_eq!(doc.members[0].apistyle, Some(ApiStyle::Classic));
    }

    #[test]
    fn reappearing_member_sheds_its_style_tag() {
        let mut fixture = Fixture::new(&["net6"]);
        fixture.options.run_kind = RunKind::Unified;
        let mut doc = empty_doc();
        fixture.run(&mut doc, &[&[method("M", vec![])]]);
        doc.members[0].apistyle = Some(ApiStyle::Classic);
        fixture.run(&mut doc, &[&[method("M", vec![])]]);
        assert_eq!(doc.members[0].apistyle, None);
    }

    #[test]
    fn final_style_run_tags_new_members() {
        let mut fixture = Fixture::new(&["net6"]);
        fixture.options.run_kind = RunKind::Unified;
        fixture.options.final_style_run = true;
        let mut doc = empty_doc();
        fixture.run(&mut doc, &[&[method("OnlyInUnified", vec![])]]);
        assert_eq!(doc.members[0].apistyle, Some(ApiStyle::Unified));
    }

    #[test]
    fn member_absent_from_one_framework_keeps_its_subset() {
        let fixture = Fixture::new(&["net6", "net8"]);
        let mut doc = empty_doc();
        let m = method("M", vec![ParamDecl::new("x", "System.Int32")]);
        // Present in net6, absent from net8.
        fixture.run(&mut doc, &[&[m], &[]]);
        assert_eq!(doc.members.len(), 1);
        let sig = doc.members[0]
            .signature(fixture.formatters.fingerprint_language())
            .unwrap();
        assert_eq!(
            sig.frameworks.encode(&fixture.frameworks).as_deref(),
            Some("net6")
        );
    }

    #[test]
    fn member_in_all_frameworks_is_universal() {
        let fixture = Fixture::new(&["net6", "net8"]);
        let mut doc = empty_doc();
        let m = method("M", vec![ParamDecl::new("x", "System.Int32")]);
        fixture.run(&mut doc, &[&[m.clone()], &[m]]);
        let sig = doc.members[0]
            .signature(fixture.formatters.fingerprint_language())
            .unwrap();
        assert_eq!(sig.frameworks.encode(&fixture.frameworks), None);
    }

    #[test]
    fn type_level_interfaces_append_across_passes() {
        let fixture = Fixture::new(&["net6", "net8"]);
        let mut doc = empty_doc();
        let mut reconciler = fixture.reconciler();
        let mut decl = type_decl();
        reconciler
            .reconcile(&mut doc, &decl, &[], fixture.frameworks.pass(0).unwrap())
            .unwrap();
        decl.interfaces.push(InterfaceDecl {
            name: "System.ICloneable".into(),
            public: true,
        });
        reconciler
            .reconcile(&mut doc, &decl, &[], fixture.frameworks.pass(1).unwrap())
            .unwrap();
        assert!(doc.interfaces.contains("System.IDisposable"));
        assert!(doc.interfaces.contains("System.ICloneable"));
        let cloneable = doc
            .interfaces
            .values()
            .iter()
            .find(|v| v.value == "System.ICloneable")
            .unwrap();
        assert_eq!(
            cloneable.frameworks.encode(&fixture.frameworks).as_deref(),
            Some("net8")
        );
    }

    #[test]
    fn errors_carry_assembly_context() {
        let fixture = Fixture::new(&["net6"]);
        let mut doc = empty_doc();
        // A node with no stored canonical signature cannot be matched.
        doc.members.push(MemberDoc::new("Orphan", MemberKind::Method));
        let mut reconciler = fixture.reconciler();
        let err = reconciler
            .reconcile(
                &mut doc,
                &type_decl(),
                &[],
                fixture.frameworks.pass(0).unwrap(),
            )
            .unwrap_err();
        match err {
            ReconcileError::Assembly {
                assembly, source, ..
            } => {
                assert_eq!(assembly, "Widgets");
                assert!(matches!(*source, ReconcileError::UnmatchableNode { .. }));
            }
            other => panic!("expected assembly context, got {other:?}"),
        }
    }
}
