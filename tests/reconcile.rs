//! End-to-end reconciliation properties: framework-membership elision,
//! idempotence, content preservation, and positional stability, driven
//! through the public API the way an orchestrator would.

use docsync::{
    AssemblyRef, Declaration, DeclarationKind, FormatterSet, FrameworkSet, ParamDecl, Reconciler,
    TypeDecl, TypeDoc, TypeKind, UpdateOptions, UpdateStats, write_type,
};

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
        interfaces: vec![],
        type_params: vec![],
        attributes: vec![],
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

/// Run one full pass sequence; `members_per_pass[i]` is what the type model
/// reports for framework `i`.
fn run(
    doc: &mut TypeDoc,
    frameworks: &FrameworkSet,
    options: &UpdateOptions,
    members_per_pass: &[Vec<Declaration>],
) -> UpdateStats {
    let formatters = FormatterSet::canonical();
    let stats = UpdateStats::new();
    let mut reconciler = Reconciler::new(&formatters, frameworks, options, &stats);
    let decl = type_decl();
    for (i, members) in members_per_pass.iter().enumerate() {
        let pass = frameworks.pass(i).unwrap();
        reconciler.reconcile(doc, &decl, members, pass).unwrap();
    }
    stats
}

#[test]
fn member_present_in_one_framework_is_tagged_then_goes_universal() {
    let frameworks = FrameworkSet::new(["net6", "net8"]);
    let options = UpdateOptions::default();
    let m = method("M", vec![ParamDecl::new("x", "System.Int32")]);

    // M(int) exists only in net6.
    let mut doc = TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class);
    run(&mut doc, &frameworks, &options, &[vec![m.clone()], vec![]]);
    let xml = write_type(&doc, &frameworks).unwrap();
    assert!(
        xml.contains("FrameworkAlternate=\"net6\""),
        "net6-only member must carry the membership attribute:\n{xml}"
    );

    // net8 gains the same signature; reprocessing both in order makes the
    // fact universal and the attribute disappears from the member.
    run(
        &mut doc,
        &frameworks,
        &options,
        &[vec![m.clone()], vec![m]],
    );
    let xml = write_type(&doc, &frameworks).unwrap();
    assert!(
        !xml.contains("FrameworkAlternate"),
        "universal facts must elide the membership attribute:\n{xml}"
    );
}

#[test]
fn reconciliation_is_idempotent_to_the_byte() {
    let frameworks = FrameworkSet::new(["net6", "net8"]);
    let options = UpdateOptions::default();
    let shared = method("Shared", vec![ParamDecl::new("x", "System.Int32")]);
    let only_new = method("OnlyNew", vec![]);

    let passes = vec![vec![shared.clone()], vec![shared, only_new]];

    let mut doc = TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class);
    run(&mut doc, &frameworks, &options, &passes);
    let first = write_type(&doc, &frameworks).unwrap();

    run(&mut doc, &frameworks, &options, &passes);
    let second = write_type(&doc, &frameworks).unwrap();

    assert_eq!(first, second);
}

#[test]
fn documented_members_survive_any_number_of_runs_without_delete() {
    let frameworks = FrameworkSet::new(["net6"]);
    let options = UpdateOptions::default();

    let mut doc = TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class);
    run(
        &mut doc,
        &frameworks,
        &options,
        &[vec![method("Gone", vec![])]],
    );
    doc.members[0].docs.summary = "Removed in 2.0; kept for reference.".into();

    // The declaration disappears; two more runs must not touch the node.
    for _ in 0..2 {
        let stats = run(&mut doc, &frameworks, &options, &[vec![]]);
        assert_eq!(stats.removed(), 0);
    }
    assert_eq!(doc.members.len(), 1);
    assert_eq!(
        doc.members[0].docs.summary,
        "Removed in 2.0; kept for reference."
    );
}

#[test]
fn delete_mode_removes_placeholder_members_and_counts_them() {
    let frameworks = FrameworkSet::new(["net6"]);
    let mut options = UpdateOptions::default();

    let mut doc = TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class);
    run(
        &mut doc,
        &frameworks,
        &options,
        &[vec![method("Gone", vec![])]],
    );

    options.delete_stale = true;
    let stats = run(&mut doc, &frameworks, &options, &[vec![]]);
    assert!(doc.members.is_empty());
    assert_eq!(stats.removed(), 1);
}

#[test]
fn positional_alternates_are_stable_and_prunable() {
    let frameworks = FrameworkSet::new(["net6", "net8"]);
    let options = UpdateOptions::default();
    // One native-int slot whose documented rendering differs per framework.
    let mut old_rendering = ParamDecl::new("value", "System.IntPtr");
    old_rendering.il_type = Some("native int".into());
    let mut new_rendering = ParamDecl::new("value", "nint");
    new_rendering.il_type = Some("native int".into());
    let narrow = method("M", vec![old_rendering]);
    let wide = method("M", vec![new_rendering]);

    let mut doc = TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class);
    run(
        &mut doc,
        &frameworks,
        &options,
        &[vec![narrow.clone()], vec![wide]],
    );

    // Exactly two parameter nodes at the same slot, one per framework.
    let params = &doc.members[0].parameters;
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].index, Some(0));
    assert_eq!(params[1].index, Some(0));
    assert_eq!(params[0].frameworks.encode(&frameworks).as_deref(), Some("net6"));
    assert_eq!(params[1].frameworks.encode(&frameworks).as_deref(), Some("net8"));
    assert_eq!(params[0].ty, "System.IntPtr");
    assert_eq!(params[1].ty, "nint");

    // Dropping net8 from the run makes the newer alternate disappear on the
    // next run, and the surviving universal slot sheds its explicit index.
    let net6_only = FrameworkSet::new(["net6"]);
    run(&mut doc, &net6_only, &options, &[vec![narrow]]);
    let params = &doc.members[0].parameters;
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].ty, "System.IntPtr");
    assert_eq!(params[0].index, None);
}

#[test]
fn resumed_runs_converge_to_the_same_document() {
    // A partial run leaves the document valid-but-incomplete; restarting
    // from pass 1 converges to exactly what an uninterrupted run produces.
    let frameworks = FrameworkSet::new(["net6", "net8"]);
    let options = UpdateOptions::default();
    let m = method("M", vec![ParamDecl::new("x", "System.Int32")]);
    let passes = vec![vec![m.clone()], vec![m]];

    let mut uninterrupted = TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class);
    run(&mut uninterrupted, &frameworks, &options, &passes);

    let mut interrupted = TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class);
    run(&mut interrupted, &frameworks, &options, &passes[..1].to_vec());
    run(&mut interrupted, &frameworks, &options, &passes);

    assert_eq!(
        write_type(&uninterrupted, &frameworks).unwrap(),
        write_type(&interrupted, &frameworks).unwrap()
    );
}
