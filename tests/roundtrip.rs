//! Persistence round trips: a document written after a run, loaded from
//! disk, reconciled again and rewritten must come back byte-identical, and
//! universal elision must survive the disk boundary.

use std::fs;

use docsync::{
    AssemblyRef, Declaration, DeclarationKind, FormatterSet, FrameworkSet, IndexDoc, ParamDecl,
    Reconciler, TypeDecl, TypeDoc, TypeKind, UpdateOptions, UpdateStats, read_index, read_type,
    write_index, write_type,
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

fn members() -> Vec<Declaration> {
    vec![Declaration {
        name: "Frob".into(),
        explicit_interface: None,
        attributes: vec![],
        implements: vec![],
        assembly: assembly(),
        kind: DeclarationKind::Method {
            params: vec![ParamDecl::new("count", "System.Int32")],
            type_params: vec![],
            returns: "System.Int32".into(),
        },
    }]
}

fn run_both_passes(doc: &mut TypeDoc, frameworks: &FrameworkSet) {
    let formatters = FormatterSet::canonical();
    let options = UpdateOptions::default();
    let stats = UpdateStats::new();
    let mut reconciler = Reconciler::new(&formatters, frameworks, &options, &stats);
    let decl = type_decl();
    let current = members();
    for pass in frameworks.passes() {
        reconciler.reconcile(doc, &decl, &current, pass).unwrap();
    }
}

#[test]
fn save_load_reconcile_save_is_stable() {
    let frameworks = FrameworkSet::new(["net6", "net8"]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Widgets.Widget.xml");

    let mut doc = TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class);
    run_both_passes(&mut doc, &frameworks);
    fs::write(&path, write_type(&doc, &frameworks).unwrap()).unwrap();

    // A later run starts from the persisted form, the way the orchestrator
    // does between processes.
    let first = fs::read_to_string(&path).unwrap();
    let mut loaded = read_type(&first).unwrap();
    run_both_passes(&mut loaded, &frameworks);
    fs::write(&path, write_type(&loaded, &frameworks).unwrap()).unwrap();

    let second = fs::read_to_string(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn user_prose_survives_the_disk_boundary_and_reconciliation() {
    let frameworks = FrameworkSet::new(["net6", "net8"]);
    let mut doc = TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class);
    run_both_passes(&mut doc, &frameworks);

    doc.members[0].docs.summary =
        "Frobnicates the widget; see <see cref=\"M:Widgets.Widget.Twiddle\"/>.".into();
    doc.members[0]
        .docs
        .params
        .insert("count".into(), "Times to frob, &gt; 0.".into());

    let xml = write_type(&doc, &frameworks).unwrap();
    let mut loaded = read_type(&xml).unwrap();
    run_both_passes(&mut loaded, &frameworks);

    assert_eq!(
        loaded.members[0].docs.summary,
        "Frobnicates the widget; see <see cref=\"M:Widgets.Widget.Twiddle\"/>."
    );
    assert_eq!(loaded.members[0].docs.params["count"], "Times to frob, &gt; 0.");
}

#[test]
fn elision_survives_the_disk_boundary() {
    let frameworks = FrameworkSet::new(["net6", "net8"]);
    let mut doc = TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class);
    run_both_passes(&mut doc, &frameworks);

    // Present in both frameworks: no membership attributes anywhere.
    let xml = write_type(&doc, &frameworks).unwrap();
    assert!(!xml.contains("FrameworkAlternate"));

    // Absence decodes as "all frameworks" and re-applying elision is a
    // no-op on the bytes.
    let loaded = read_type(&xml).unwrap();
    let rewritten = write_type(&loaded, &frameworks).unwrap();
    assert_eq!(xml, rewritten);
}

#[test]
fn index_survives_the_disk_boundary() {
    let frameworks = FrameworkSet::new(["net6", "net8"]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.xml");

    let mut doc = TypeDoc::new("Widgets.Widget", "Widgets", TypeKind::Class);
    run_both_passes(&mut doc, &frameworks);

    let mut index = IndexDoc::new("Widgets");
    index.record_type(&doc);
    index.record_assembly("Widgets", "1.0.0.0");
    index.sort();
    fs::write(&path, write_index(&index).unwrap()).unwrap();

    let loaded = read_index(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded, index);
}
