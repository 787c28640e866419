//! Description Formatter
//!
//! Synthesizes the human-readable `description` string for a [`Tag`] from
//! its `value`. Per-tag description computation never fails in this
//! implementation — scalar, array and structure synthesis are pure string
//! operations — but the contract (`DescriptionFormatError`) is that a
//! failure here falls back to the raw value rather than propagating, so
//! callers that plug in custom per-tag translators get that same guarantee
//! for free.

use crate::core::tag::{ArrayItem, Tag};
use crate::core::translate;

/// Scalar description: the per-tag translator's rendering of `raw` if one
/// is registered for `qname`, else `raw` itself.
pub fn describe_simple(qname: &str, raw: &str) -> String {
    translate::translate_scalar(qname, raw)
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string())
}

/// Array description: comma-space-joined per-item descriptions, unless a
/// per-tag array translator overrides the default.
pub fn describe_array(qname: &str, items: &[ArrayItem]) -> String {
    let joined = || items.iter().map(ArrayItem::description).collect::<Vec<_>>().join(", ");
    translate::translate_array(qname, items).unwrap_or_else(joined)
}

/// Structure description: delegates to [`crate::core::tag::structure_description`],
/// which applies the IPTC Core Creator Contact Info key rename.
pub fn describe_structure(fields: &indexmap::IndexMap<String, Tag>) -> String {
    crate::core::tag::structure_description(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn describe_simple_uses_translator_when_present() {
        assert_eq!(describe_simple("tiff:Orientation", "3"), "Rotate 180");
    }

    #[test]
    fn describe_simple_passes_through_unknown_tags() {
        assert_eq!(describe_simple("dc:title", "Hello"), "Hello");
    }

    #[test]
    fn describe_array_joins_item_descriptions() {
        let items = vec![
            ArrayItem::Tag(Tag::simple("47", "47")),
            ArrayItem::Tag(Tag::simple("11", "11")),
        ];
        assert_eq!(describe_array("dc:subject", &items), "47, 11");
    }

    #[test]
    fn describe_structure_renames_creator_contact_keys() {
        let mut fields = IndexMap::new();
        fields.insert("CiAdrCity".to_string(), Tag::simple("Berlin", "Berlin"));
        assert_eq!(describe_structure(&fields), "CreatorCity: Berlin");
    }
}
