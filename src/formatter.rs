//! Signature formatting seam and the canonical matching key.
//!
//! Rendering human-facing signatures is an external concern: callers plug
//! [`SignatureFormatter`] implementations into a [`FormatterSet`], one per
//! output language. The engine itself only needs one thing from a
//! signature: a stable, language-neutral fingerprint to match members
//! across frameworks independent of cosmetic differences. The built-in
//! [`CanonicalFormatter`] supplies that key; its output is also stored in
//! the document so later runs can re-derive fingerprints for existing
//! nodes.

use crate::declarations::{AttrDecl, Declaration, DeclarationKind, TypeDecl};

/// Renders a type or member as a canonical signature string for one output
/// language. Returning `None` means the signature cannot be computed (for
/// example an inaccessible type is referenced); such members are skipped
/// rather than failing the pass.
pub trait SignatureFormatter {
    fn language(&self) -> &str;

    fn type_signature(&self, decl: &TypeDecl) -> Option<String>;

    fn member_signature(&self, decl: &Declaration) -> Option<String>;

    /// Optional usage sample attached alongside the signature value.
    fn member_usage(&self, _decl: &Declaration) -> Option<String> {
        None
    }

    fn type_usage(&self, _decl: &TypeDecl) -> Option<String> {
        None
    }

    /// Rendering of a custom attribute in this language.
    fn attribute(&self, attr: &AttrDecl) -> String {
        attr.render()
    }
}

/// The formatter collaborators for one run: a fingerprint formatter whose
/// output is the matching key, plus any number of output languages.
pub struct FormatterSet {
    fingerprint: Box<dyn SignatureFormatter>,
    languages: Vec<Box<dyn SignatureFormatter>>,
}

impl FormatterSet {
    pub fn new(fingerprint: Box<dyn SignatureFormatter>) -> Self {
        Self {
            fingerprint,
            languages: Vec::new(),
        }
    }

    /// A set using the built-in canonical fingerprint and no output
    /// languages.
    pub fn canonical() -> Self {
        Self::new(Box::new(CanonicalFormatter))
    }

    pub fn with_language(mut self, formatter: Box<dyn SignatureFormatter>) -> Self {
        self.languages.push(formatter);
        self
    }

    pub fn fingerprint_language(&self) -> &str {
        self.fingerprint.language()
    }

    pub fn fingerprint_formatter(&self) -> &dyn SignatureFormatter {
        &*self.fingerprint
    }

    pub fn languages(&self) -> impl Iterator<Item = &dyn SignatureFormatter> {
        self.languages.iter().map(|formatter| &**formatter)
    }

    /// The normalized matching key for a current declaration.
    pub fn member_fingerprint(&self, decl: &Declaration) -> Option<String> {
        self.fingerprint
            .member_signature(decl)
            .map(|sig| normalize_fingerprint(&sig))
    }

    /// Attribute text in the primary output language (first registered),
    /// falling back to the default rendering.
    pub fn primary_attribute_text(&self, attr: &AttrDecl) -> String {
        match self.languages.first() {
            Some(formatter) => formatter.attribute(attr),
            None => self.fingerprint.attribute(attr),
        }
    }
}

/// Normalize a canonical signature into the matching key: whitespace runs
/// collapse to a single space so cosmetic reformatting does not break
/// identity.
pub fn normalize_fingerprint(signature: &str) -> String {
    let mut out = String::with_capacity(signature.len());
    let mut pending_space = false;
    for ch in signature.trim().chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}

/// The built-in language-neutral formatter. Its output intentionally
/// ignores everything cosmetic: only name, arity, parameter types and the
/// value type participate, so the same member matches across frameworks
/// even when per-language renderings differ.
pub struct CanonicalFormatter;

/// Language tag under which the canonical signature is stored.
pub const CANONICAL_LANGUAGE: &str = "Canonical";

impl SignatureFormatter for CanonicalFormatter {
    fn language(&self) -> &str {
        CANONICAL_LANGUAGE
    }

    fn type_signature(&self, decl: &TypeDecl) -> Option<String> {
        let mut sig = format!("{} {}", decl.kind.as_str().to_ascii_lowercase(), decl.full_name);
        if !decl.type_params.is_empty() {
            sig.push_str(&format!("`{}", decl.type_params.len()));
        }
        Some(sig)
    }

    /// The key is name + parameter identity types + arity. Return types do
    /// not participate: a member whose value type varies per framework is
    /// still one member, carrying return-type variants.
    fn member_signature(&self, decl: &Declaration) -> Option<String> {
        let name = match &decl.kind {
            DeclarationKind::Constructor { .. } => ".ctor".to_string(),
            _ => match &decl.explicit_interface {
                Some(iface) => format!("{}.{}", iface, decl.name),
                None => decl.name.clone(),
            },
        };

        let mut sig = name;
        let arity = decl.type_params().len();
        if arity > 0 {
            sig.push_str(&format!("``{arity}"));
        }

        match &decl.kind {
            DeclarationKind::Field { .. } | DeclarationKind::Event { .. } => {}
            _ => {
                sig.push('(');
                for (i, p) in decl.params().iter().enumerate() {
                    if i > 0 {
                        sig.push(',');
                    }
                    sig.push_str(p.identity_type());
                    // By-ref-ness is identity; the ref/out/in direction is cosmetic.
                    if p.ref_kind.as_attr().is_some() {
                        sig.push('&');
                    }
                }
                sig.push(')');
            }
        }
        Some(sig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::{AssemblyRef, ParamDecl, RefKind};

    fn method(name: &str, params: Vec<ParamDecl>) -> Declaration {
        Declaration {
            name: name.into(),
            explicit_interface: None,
            attributes: vec![],
            implements: vec![],
            assembly: AssemblyRef {
                name: "Lib".into(),
                version: "1.0.0.0".into(),
            },
            kind: DeclarationKind::Method {
                params,
                type_params: vec![],
                returns: "System.Void".into(),
            },
        }
    }

    #[test]
    fn fingerprint_ignores_whitespace() {
        assert_eq!(
            normalize_fingerprint("  M ( System.Int32 ) "),
            normalize_fingerprint("M (System.Int32)")
        );
    }

    #[test]
    fn canonical_member_key_is_stable() {
        let set = FormatterSet::canonical();
        let a = method("M", vec![ParamDecl::new("x", "System.Int32")]);
        let b = method("M", vec![ParamDecl::new("renamed", "System.Int32")]);
        // Parameter names are cosmetic; types are not.
        assert_eq!(set.member_fingerprint(&a), set.member_fingerprint(&b));

        let c = method("M", vec![ParamDecl::new("x", "System.Int64")]);
        assert_ne!(set.member_fingerprint(&a), set.member_fingerprint(&c));
    }

    #[test]
    fn byref_changes_the_key() {
        let by_val = method("M", vec![ParamDecl::new("x", "System.Int32")]);
        let mut by_ref = by_val.clone();
        if let DeclarationKind::Method { params, .. } = &mut by_ref.kind {
            params[0].ref_kind = RefKind::Ref;
        }
        let set = FormatterSet::canonical();
        assert_ne!(set.member_fingerprint(&by_val), set.member_fingerprint(&by_ref));
    }

    #[test]
    fn constructors_share_the_ctor_name() {
        let set = FormatterSet::canonical();
        let ctor = Declaration {
            name: "List".into(),
            explicit_interface: None,
            attributes: vec![],
            implements: vec![],
            assembly: AssemblyRef {
                name: "Lib".into(),
                version: "1.0.0.0".into(),
            },
            kind: DeclarationKind::Constructor { params: vec![] },
        };
        let key = set.member_fingerprint(&ctor).unwrap();
        assert!(key.starts_with(".ctor("));
    }
}
