//! Positional parameter and generic-parameter synchronizer.
//!
//! A parameter's positional slot is stable across frameworks even when its
//! type varies: the same slot carrying a different type in a different
//! framework is a "framework alternate", not a new parameter. Slots are
//! implicit (list order) until the first alternate appears, at which point
//! every node in the group is retrofitted with an explicit index and the
//! alternate is inserted as a membership-tracked sibling of the same slot.
//! Once every node in the group is universal again, explicit indices are
//! stripped as unnecessary.

use crate::declarations::{GenericParamDecl, ParamDecl};
use crate::frameworks::{FrameworkSet, Membership};
use crate::model::{ParameterNode, TypeParamNode};

fn slot(params: &[ParameterNode], i: usize) -> usize {
    params[i].index.unwrap_or(i)
}

fn retrofit_indices(params: &mut [ParameterNode]) {
    for i in 0..params.len() {
        if params[i].index.is_none() {
            params[i].index = Some(i);
        }
    }
}

fn fresh_node(decl: &ParamDecl, index: Option<usize>, framework: &str) -> ParameterNode {
    ParameterNode {
        name: decl.name.clone(),
        ty: decl.ty.clone(),
        ref_kind: decl.ref_kind,
        index,
        frameworks: Membership::only(framework),
    }
}

/// Sync one framework's parameter list into the document group. Returns
/// whether a framework-alternate scenario was triggered.
pub fn sync_parameters(
    decl_params: &[ParamDecl],
    params: &mut Vec<ParameterNode>,
    framework: &str,
    known: &FrameworkSet,
    first_for_identity: bool,
) -> bool {
    if first_for_identity {
        *params = decl_params
            .iter()
            .map(|p| fresh_node(p, None, framework))
            .collect();
        return false;
    }

    let mut alternate = false;
    let mut touched = vec![false; params.len()];

    for (pos, decl) in decl_params.iter().enumerate() {
        // Exact slot match: same name, same type.
        if let Some(i) = (0..params.len()).find(|&i| {
            slot(params, i) == pos && params[i].name == decl.name && params[i].ty == decl.ty
        }) {
            params[i].frameworks.insert(framework);
            params[i].ref_kind = decl.ref_kind;
            touched[i] = true;
            continue;
        }

        // Same slot, same name but a different type; or same slot, same
        // type under a new name. Either way the slot sprouted an alternate.
        let existing = (0..params.len())
            .find(|&i| slot(params, i) == pos && params[i].name == decl.name)
            .or_else(|| {
                (0..params.len())
                    .find(|&i| slot(params, i) == pos && params[i].ty == decl.ty && !touched[i])
            });

        if let Some(i) = existing {
            retrofit_indices(params);
            params[i].frameworks.remove(framework, known);
            touched[i] = true;
            params.insert(i + 1, fresh_node(decl, Some(pos), framework));
            touched.insert(i + 1, true);
            alternate = true;
            continue;
        }

        // No slot counterpart at all: a newly added parameter.
        let explicit = params.iter().any(|p| p.index.is_some());
        let at = (0..params.len())
            .find(|&i| slot(params, i) > pos)
            .unwrap_or(params.len());
        let index = if explicit { Some(pos) } else { None };
        params.insert(at, fresh_node(decl, index, framework));
        touched.insert(at, true);
    }

    // Parameters with no current counterpart lose this framework and die
    // once no framework claims them.
    for i in 0..params.len() {
        if !touched[i] {
            params[i].frameworks.remove(framework, known);
        }
    }
    params.retain(|p| !p.frameworks.is_empty());

    alternate
}

/// Final-pass canonicalization: collapse universal memberships and, when
/// no node in the group carries a membership attribute any longer, strip
/// the explicit indices.
pub fn canonicalize_parameters(params: &mut Vec<ParameterNode>, known: &FrameworkSet) {
    for p in params.iter_mut() {
        p.frameworks.canonicalize(known);
    }
    params.retain(|p| !p.frameworks.is_empty());
    if params.iter().all(|p| p.frameworks == Membership::All) {
        for p in params.iter_mut() {
            p.index = None;
        }
    }
}

/// Sync one framework's generic parameters. Generic parameters match by
/// name; constraints accumulate.
pub fn sync_type_params(
    decls: &[GenericParamDecl],
    nodes: &mut Vec<TypeParamNode>,
    framework: &str,
    known: &FrameworkSet,
    first_for_identity: bool,
) {
    if first_for_identity {
        *nodes = decls
            .iter()
            .map(|d| TypeParamNode {
                name: d.name.clone(),
                constraints: d.constraints.clone(),
                frameworks: Membership::only(framework),
            })
            .collect();
        return;
    }

    let mut touched = vec![false; nodes.len()];
    for (pos, decl) in decls.iter().enumerate() {
        if let Some(i) = nodes.iter().position(|n| n.name == decl.name) {
            nodes[i].frameworks.insert(framework);
            for c in &decl.constraints {
                if !nodes[i].constraints.contains(c) {
                    nodes[i].constraints.push(c.clone());
                }
            }
            touched[i] = true;
        } else {
            let at = pos.min(nodes.len());
            nodes.insert(
                at,
                TypeParamNode {
                    name: decl.name.clone(),
                    constraints: decl.constraints.clone(),
                    frameworks: Membership::only(framework),
                },
            );
            touched.insert(at, true);
        }
    }

    for i in 0..nodes.len() {
        if !touched[i] {
            nodes[i].frameworks.remove(framework, known);
        }
    }
    nodes.retain(|n| !n.frameworks.is_empty());
}

pub fn canonicalize_type_params(nodes: &mut Vec<TypeParamNode>, known: &FrameworkSet) {
    for n in nodes.iter_mut() {
        n.frameworks.canonicalize(known);
    }
    nodes.retain(|n| !n.frameworks.is_empty());
}
