//! Signature-variant synchronizer.
//!
//! Cross-run structural changes are only trustworthy starting from an empty
//! baseline, so the first pass for an identity clears every prior variant
//! of a language before resyncing. From then on: an exact (value, usage)
//! match gains the current framework; any other value loses it; a new
//! variant is born carrying only the current framework. The final pass
//! collapses complete membership sets into the elided universal form and
//! drops variants no framework claims.

use crate::frameworks::FrameworkSet;
use crate::model::SignatureVariant;

/// Apply one framework's rendering of a signature to the variant list.
pub fn sync_signature(
    variants: &mut Vec<SignatureVariant>,
    language: &str,
    value: &str,
    usage: Option<&str>,
    framework: &str,
    known: &FrameworkSet,
    first_for_identity: bool,
) {
    if first_for_identity {
        variants.retain(|v| v.language != language);
    }

    if let Some(existing) = variants
        .iter_mut()
        .find(|v| v.language == language && v.value == value && v.usage.as_deref() == usage)
    {
        existing.frameworks.insert(framework);
        return;
    }

    for variant in variants.iter_mut().filter(|v| v.language == language) {
        variant.frameworks.remove(framework, known);
    }
    variants.retain(|v| v.language != language || !v.frameworks.is_empty());

    variants.push(SignatureVariant {
        language: language.to_string(),
        value: value.to_string(),
        usage: usage.map(str::to_string),
        frameworks: crate::frameworks::Membership::only(framework),
    });
}

/// Final-pass canonicalization across all languages.
pub fn canonicalize_signatures(variants: &mut Vec<SignatureVariant>, known: &FrameworkSet) {
    for variant in variants.iter_mut() {
        variant.frameworks.canonicalize(known);
    }
    variants.retain(|v| !v.frameworks.is_empty());
}
