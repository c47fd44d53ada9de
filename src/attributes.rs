//! Attribute-list synchronizer.
//!
//! Attributes are not framework-tracked individually: presence is binary
//! per pass, driven by the enclosing node's first/last-pass semantics. The
//! first pass clears the container; every pass then upserts by the
//! primary-language rendered text, so an attribute already present is left
//! untouched. An empty container is simply not serialized, keeping vacuous
//! `Attributes` elements out of the persisted document.

use crate::declarations::AttrDecl;
use crate::formatter::FormatterSet;

/// Sync one pass's attributes into the rendered-text container.
pub fn sync_attributes(
    source: &[AttrDecl],
    attributes: &mut Vec<String>,
    formatters: &FormatterSet,
    first_for_identity: bool,
) {
    if first_for_identity {
        attributes.clear();
    }
    for attr in source {
        let text = formatters.primary_attribute_text(attr);
        if !attributes.iter().any(|existing| *existing == text) {
            attributes.push(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pass_clears_stale_entries() {
        let formatters = FormatterSet::canonical();
        let mut attrs = vec!["System.ObsoleteAttribute".to_string()];
        sync_attributes(
            &[AttrDecl::new("System.FlagsAttribute")],
            &mut attrs,
            &formatters,
            true,
        );
        assert_eq!(attrs, vec!["System.FlagsAttribute"]);
    }

    #[test]
    fn later_passes_union_by_rendered_text() {
        let formatters = FormatterSet::canonical();
        let mut attrs = Vec::new();
        sync_attributes(
            &[AttrDecl::new("System.FlagsAttribute")],
            &mut attrs,
            &formatters,
            true,
        );
        sync_attributes(
            &[
                AttrDecl::new("System.FlagsAttribute"),
                AttrDecl::new("System.SerializableAttribute"),
            ],
            &mut attrs,
            &formatters,
            false,
        );
        assert_eq!(
            attrs,
            vec!["System.FlagsAttribute", "System.SerializableAttribute"]
        );
    }

    #[test]
    fn empty_source_on_first_pass_empties_the_container() {
        let formatters = FormatterSet::canonical();
        let mut attrs = vec!["Anything".to_string()];
        sync_attributes(&[], &mut attrs, &formatters, true);
        assert!(attrs.is_empty());
    }
}
