//! The output value model: [`Tag`], [`TagValue`] and [`ArrayItem`]
//!
//! This is the shape the RDF Interpreter produces and the Description
//! Formatter fills in. It mirrors the `SimpleNode`/`ArrayNode`/`StructureNode`
//! split of the RDF-level node model this crate's parser used to build
//! directly, but keeps only what a *reader* needs: no qualifier objects, no
//! mutation methods, plain local-name-keyed attribute maps.

use indexmap::IndexMap;

use crate::core::translate::rename_structure_key;

/// A single interpreted XMP property.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tag {
    pub value: TagValue,
    /// Local-name-keyed qualifiers/attributes. Never contains `xmlns:*`,
    /// `rdf:parseType`, or `rdf:resource`.
    pub attributes: IndexMap<String, String>,
    /// Human-readable rendering of `value`, always present.
    pub description: String,
}

impl Tag {
    pub fn simple(value: impl Into<String>, description: impl Into<String>) -> Self {
        Tag {
            value: TagValue::Simple(value.into()),
            attributes: IndexMap::new(),
            description: description.into(),
        }
    }
}

/// The value carried by a [`Tag`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum TagValue {
    Simple(String),
    Structure(IndexMap<String, Tag>),
    Array(Vec<ArrayItem>),
}

/// An element of an array-valued tag.
///
/// Array items that classify as a structure (RDF Interpreter rule 4) are
/// naked field maps rather than full `Tag`s: rule 4 yields the structure's
/// value unwrapped when applied inside an array.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ArrayItem {
    Tag(Tag),
    Struct(IndexMap<String, Tag>),
}

impl ArrayItem {
    /// The description used when this item is itself part of an array's
    /// comma-joined description: a tag's own `description`, or the
    /// recursive `"Key: SubDescription"` rendering of a naked structure.
    pub fn description(&self) -> String {
        match self {
            ArrayItem::Tag(tag) => tag.description.clone(),
            ArrayItem::Struct(fields) => structure_description(fields),
        }
    }
}

/// `"; "`-joined `"Key: SubDescription"` pairs, used for both `Tag::Structure`
/// descriptions and naked-structure array items. `Key` has already been
/// passed through the IPTC Core Creator Contact Info rename table by the
/// time it lands in `fields`.
pub fn structure_description(fields: &IndexMap<String, Tag>) -> String {
    fields
        .iter()
        .map(|(key, tag)| format!("{}: {}", rename_structure_key(key), tag.description))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_tag_has_empty_attributes() {
        let tag = Tag::simple("4711", "4711");
        assert_eq!(tag.value, TagValue::Simple("4711".to_string()));
        assert!(tag.attributes.is_empty());
    }

    #[test]
    fn structure_description_joins_with_semicolons() {
        let mut fields = IndexMap::new();
        fields.insert("A".to_string(), Tag::simple("47", "47"));
        fields.insert("B".to_string(), Tag::simple("11", "11"));
        assert_eq!(structure_description(&fields), "A: 47; B: 11");
    }

    #[test]
    fn array_item_struct_description_is_recursive() {
        let mut fields = IndexMap::new();
        fields.insert("City".to_string(), Tag::simple("Berlin", "Berlin"));
        let item = ArrayItem::Struct(fields);
        assert_eq!(item.description(), "City: Berlin");
    }
}
