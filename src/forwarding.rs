//! Type-forwarding chain synchronizer.
//!
//! Tracks, per type, the chain of assembly type-forwards discovered for the
//! current framework, including forwards inherited from the enclosing
//! (nested-in) type chain. One entry exists per distinct
//! (from-assembly, from-version, to-assembly, to-version) tuple, carrying a
//! framework-membership set with the same universal-elision rule as
//! signature variants.

use crate::declarations::TypeForwardDecl;
use crate::frameworks::{FrameworkSet, Membership};
use crate::model::TypeForwardNode;

fn matches(node: &TypeForwardNode, decl: &TypeForwardDecl) -> bool {
    node.from_assembly == decl.from_assembly
        && node.from_version == decl.from_version
        && node.to_assembly == decl.to_assembly
        && node.to_version == decl.to_version
}

/// Sync one framework's forwards (own plus inherited) into the chain.
pub fn sync_forwards(
    own: &[TypeForwardDecl],
    inherited: &[TypeForwardDecl],
    chain: &mut Vec<TypeForwardNode>,
    framework: &str,
    first_for_identity: bool,
) {
    if first_for_identity {
        chain.clear();
    }
    for decl in own.iter().chain(inherited) {
        match chain.iter_mut().find(|node| matches(node, decl)) {
            Some(node) => node.frameworks.insert(framework),
            None => chain.push(TypeForwardNode {
                from_assembly: decl.from_assembly.clone(),
                from_version: decl.from_version.clone(),
                to_assembly: decl.to_assembly.clone(),
                to_version: decl.to_version.clone(),
                frameworks: Membership::only(framework),
            }),
        }
    }
}

/// Final-pass canonicalization: universal elision, empty entries dropped.
pub fn canonicalize_forwards(chain: &mut Vec<TypeForwardNode>, known: &FrameworkSet) {
    for node in chain.iter_mut() {
        node.frameworks.canonicalize(known);
    }
    chain.retain(|node| !node.frameworks.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward(to_version: &str) -> TypeForwardDecl {
        TypeForwardDecl {
            from_assembly: "mscorlib".into(),
            from_version: "4.0.0.0".into(),
            to_assembly: "System.Runtime".into(),
            to_version: to_version.into(),
        }
    }

    #[test]
    fn distinct_tuples_are_kept_apart() {
        let known = FrameworkSet::new(["net6", "net8"]);
        let mut chain = Vec::new();
        sync_forwards(&[forward("6.0.0.0")], &[], &mut chain, "net6", true);
        sync_forwards(&[forward("8.0.0.0")], &[], &mut chain, "net8", false);
        canonicalize_forwards(&mut chain, &known);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].frameworks.encode(&known).as_deref(), Some("net6"));
        assert_eq!(chain[1].frameworks.encode(&known).as_deref(), Some("net8"));
    }

    #[test]
    fn shared_forward_goes_universal() {
        let known = FrameworkSet::new(["net6", "net8"]);
        let mut chain = Vec::new();
        sync_forwards(&[forward("6.0.0.0")], &[], &mut chain, "net6", true);
        sync_forwards(&[forward("6.0.0.0")], &[], &mut chain, "net8", false);
        canonicalize_forwards(&mut chain, &known);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].frameworks, Membership::All);
    }

    #[test]
    fn inherited_forwards_join_the_chain() {
        let mut chain = Vec::new();
        sync_forwards(&[], &[forward("6.0.0.0")], &mut chain, "net6", true);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].to_assembly, "System.Runtime");
    }
}
