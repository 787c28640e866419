//! RDF Interpreter — the core of the core
//!
//! Walks every `rdf:Description` under the `rdf:RDF` root and classifies
//! each of its children into a [`Tag`] following seven priority rules.
//! This is the largest and most XMP-specific component: XMP's RDF striped
//! syntax admits several shorthand forms for the same logical value (a
//! plain property, a qualified value, a compacted structure, a
//! nested-description structure, an array), and a reader has to recognize
//! all of them without knowing in advance which one a given writer used.

use indexmap::IndexMap;

use crate::core::describe::{describe_array, describe_simple, describe_structure};
use crate::core::dom::local_name;
use crate::core::normalize::normalize_local_name;
use crate::core::tag::{ArrayItem, Tag, TagValue};
use crate::core::tree::{Children, INode, INodeValue};

/// Interprets the `rdf:RDF` intermediate tree into the final tag map.
/// Multiple `rdf:Description` siblings are merged as if they were one.
pub fn interpret(tree: &INode) -> IndexMap<String, Tag> {
    let mut output = IndexMap::new();
    for desc in collect_descriptions(tree) {
        process_description(desc, &mut output);
    }
    output
}

fn collect_descriptions(tree: &INode) -> Vec<&INode> {
    let Some(map) = tree.children() else {
        return Vec::new();
    };
    map.iter()
        .filter(|(qname, _)| local_name(qname) == "Description")
        .flat_map(|(_, children)| children.iter())
        .collect()
}

fn process_description<'a>(desc: &'a INode, output: &mut IndexMap<String, Tag>) {
    // rdf:Description's own attributes are shorthand simple properties
    // (scenario 1: `xmp:Foo="4711"` directly on the Description).
    for (attr_qname, attr_value) in &desc.attributes {
        if is_syntactic_attr(attr_qname) {
            continue;
        }
        output.insert(normalize_local_name(attr_qname), attribute_shorthand_tag(attr_qname, attr_value));
    }

    let Some(map) = desc.children() else {
        return;
    };
    for (child_qname, children) in map {
        // Rule 1: duplicate-sequence collapses to the last occurrence.
        let node = children.last();
        let tag = classify(child_qname, node);
        output.insert(normalize_local_name(child_qname), tag);
    }
}

/// The two shapes a classification can settle on before wrapping: a
/// complete [`Tag`], or a structure's bare field map plus the attributes
/// that belong on the eventual wrapping `Tag` (kept separate because array
/// items drop them — rule 6 unwraps rule 4's result).
enum Classification {
    Tag(Tag),
    NakedStructure(IndexMap<String, Tag>, IndexMap<String, String>),
}

/// Classifies one child of an `rdf:Description` (or a recursively nested
/// property) into a full [`Tag`], applying rules 2 through 7 in priority
/// order. Rule 1 is the caller's responsibility (it operates on the
/// `Children` slot, not the node itself).
pub fn classify(qname: &str, node: &INode) -> Tag {
    match classify_inner(qname, node) {
        Classification::Tag(tag) => tag,
        Classification::NakedStructure(fields, attributes) => {
            let description = describe_structure(&fields);
            Tag { value: TagValue::Structure(fields), attributes, description }
        }
    }
}

/// Classifies an `rdf:li` array item. Differs from [`classify`] only in
/// that a rule-4 structure result stays unwrapped (a bare field map, no
/// attributes or description of its own), per the array rule's footnote.
fn classify_array_item(qname: &str, node: &INode) -> ArrayItem {
    match classify_inner(qname, node) {
        Classification::Tag(tag) => ArrayItem::Tag(tag),
        Classification::NakedStructure(fields, _attributes) => ArrayItem::Struct(fields),
    }
}

fn classify_inner(qname: &str, node: &INode) -> Classification {
    let parse_type_resource = node.attributes.get("rdf:parseType").map(String::as_str) == Some("Resource");

    match &node.value {
        INodeValue::Text(text) => {
            if parse_type_resource {
                // Rule 4(a): parseType=Resource with no rdf:value child —
                // trivially true, since a text leaf has no children at all.
                Classification::NakedStructure(IndexMap::new(), normalize_attrs(&node.attributes))
            } else {
                classify_leaf(qname, node, text)
            }
        }
        INodeValue::Element(map) if map.is_empty() => {
            if parse_type_resource {
                // Rule 2: empty resource.
                Classification::Tag(Tag::simple(String::new(), String::new()))
            } else {
                classify_leaf(qname, node, "")
            }
        }
        INodeValue::Element(map) => classify_with_children(qname, node, map, parse_type_resource),
    }
}

/// Rules 5 and 7, the two outcomes available to a childless element.
fn classify_leaf(qname: &str, node: &INode, text: &str) -> Classification {
    let has_lang = node.attributes.contains_key("xml:lang");
    let has_resource = node.attributes.contains_key("rdf:resource");

    let mut fields = IndexMap::new();
    if !has_lang && !has_resource {
        for (attr_qname, attr_value) in &node.attributes {
            if is_syntactic_attr(attr_qname) {
                continue;
            }
            fields.insert(normalize_local_name(attr_qname), attribute_shorthand_tag(attr_qname, attr_value));
        }
    }

    if !fields.is_empty() {
        // Rule 5: compact structure (attribute shorthand). Every
        // non-syntactic attribute becomes a child tag; the outer
        // `attributes` map is empty by definition. Only taken when at
        // least one attribute actually survives the syntactic filter —
        // an element with none (e.g. a plain `xmp:Title` whose only
        // attribute is a local `xmlns:xmp` declaration) falls through to
        // rule 7 instead of producing an empty, meaningless structure.
        Classification::NakedStructure(fields, IndexMap::new())
    } else {
        // Rule 7: simple value (default).
        let value = node.attributes.get("rdf:resource").cloned().unwrap_or_else(|| text.to_string());
        let attributes = normalize_attrs(&node.attributes);
        let description = describe_simple(qname, &value);
        Classification::Tag(Tag { value: TagValue::Simple(value), attributes, description })
    }
}

fn classify_with_children(
    qname: &str,
    node: &INode,
    map: &IndexMap<String, Children>,
    parse_type_resource: bool,
) -> Classification {
    let rdf_value_child = find_local(map, "value");

    if parse_type_resource {
        return match rdf_value_child {
            // Rule 3(a): parseType=Resource with an rdf:value child.
            Some(value_node) => {
                Classification::Tag(simple_with_qualifiers(qname, node, value_node, map, None))
            }
            // Rule 4(a): parseType=Resource with no rdf:value child.
            None => {
                let fields = structure_fields(map);
                Classification::NakedStructure(fields, normalize_attrs(&node.attributes))
            }
        };
    }

    if let Some(desc_node) = find_local(map, "Description") {
        let desc_children = desc_node.children();
        let desc_value_child = desc_children.and_then(|m| find_local(m, "value"));
        return match desc_value_child {
            // Rule 3(b): a single rdf:Description child itself contains an rdf:value.
            Some(value_node) => Classification::Tag(simple_with_qualifiers(
                qname,
                node,
                value_node,
                desc_children.expect("value child implies a children map"),
                Some(desc_node),
            )),
            // Rule 4(b): a nested rdf:Description without rdf:value.
            None => {
                let mut fields = desc_children.map(structure_fields).unwrap_or_default();
                for (attr_qname, attr_value) in &desc_node.attributes {
                    if is_syntactic_attr(attr_qname) {
                        continue;
                    }
                    fields.insert(normalize_local_name(attr_qname), attribute_shorthand_tag(attr_qname, attr_value));
                }
                Classification::NakedStructure(fields, normalize_attrs(&node.attributes))
            }
        };
    }

    if let Some(array_node) = find_array_container(map) {
        // Rule 6: array.
        let items = collect_array_items(array_node);
        let attributes = normalize_attrs(&node.attributes);
        let description = describe_array(qname, &items);
        return Classification::Tag(Tag { value: TagValue::Array(items), attributes, description });
    }

    // No known shape matched (malformed input with unexpected child
    // elements): degrade to rule 7's default rather than drop the node.
    let value = node.attributes.get("rdf:resource").cloned().unwrap_or_default();
    let attributes = normalize_attrs(&node.attributes);
    let description = describe_simple(qname, &value);
    Classification::Tag(Tag { value: TagValue::Simple(value), attributes, description })
}

/// Builds the `value` of rule 3's simple-with-qualifiers tag: the
/// `rdf:value`'s URI if present else its text, with attributes unioned from
/// the outer element, an optional inner `rdf:Description`, and every
/// non-`rdf:value` sibling (using the sibling's local name and text).
fn simple_with_qualifiers(
    qname: &str,
    outer: &INode,
    value_node: &INode,
    siblings: &IndexMap<String, Children>,
    inner_description: Option<&INode>,
) -> Tag {
    let value = value_node
        .attributes
        .get("rdf:resource")
        .cloned()
        .unwrap_or_else(|| value_node.text().to_string());

    let mut attributes = normalize_attrs(&outer.attributes);
    if let Some(desc) = inner_description {
        attributes.extend(normalize_attrs(&desc.attributes));
    }
    for (sibling_qname, sibling_children) in siblings {
        if local_name(sibling_qname) == "value" {
            continue;
        }
        let sibling_node = sibling_children.last();
        attributes.insert(local_name(sibling_qname).to_string(), sibling_node.text().to_string());
    }

    let description = describe_simple(qname, &value);
    Tag { value: TagValue::Simple(value), attributes, description }
}

fn structure_fields(map: &IndexMap<String, Children>) -> IndexMap<String, Tag> {
    let mut fields = IndexMap::new();
    for (child_qname, children) in map {
        let node = children.last();
        fields.insert(normalize_local_name(child_qname), classify(child_qname, node));
    }
    fields
}

fn find_local<'a>(map: &'a IndexMap<String, Children>, local: &str) -> Option<&'a INode> {
    map.iter().find(|(qname, _)| local_name(qname) == local).map(|(_, children)| children.last())
}

fn find_array_container(map: &IndexMap<String, Children>) -> Option<&INode> {
    map.iter()
        .find(|(qname, _)| matches!(local_name(qname), "Bag" | "Seq" | "Alt"))
        .map(|(_, children)| children.last())
}

fn collect_array_items(array_node: &INode) -> Vec<ArrayItem> {
    let Some(map) = array_node.children() else {
        return Vec::new();
    };
    let Some((_, li_children)) = map.iter().find(|(qname, _)| local_name(qname) == "li") else {
        return Vec::new();
    };
    li_children.iter().map(|li_node| classify_array_item("rdf:li", li_node)).collect()
}

fn attribute_shorthand_tag(qname: &str, value: &str) -> Tag {
    Tag::simple(value, describe_simple(qname, value))
}

fn is_syntactic_attr(qname: &str) -> bool {
    qname == "xmlns"
        || qname.starts_with("xmlns:")
        || qname == "rdf:about"
        || qname == "rdf:ID"
        || qname == "rdf:nodeID"
        || qname == "rdf:parseType"
        || qname == "rdf:resource"
}

/// Drops namespace declarations and RDF syntactic attributes, rewrites
/// `xml:lang` to `lang`, and strips the prefix from everything else.
fn normalize_attrs(attrs: &IndexMap<String, String>) -> IndexMap<String, String> {
    let mut out = IndexMap::new();
    for (key, value) in attrs {
        if key == "xmlns" || key.starts_with("xmlns:") || key == "rdf:parseType" || key == "rdf:resource" {
            continue;
        }
        if key == "xml:lang" {
            out.insert("lang".to_string(), value.clone());
            continue;
        }
        out.insert(local_name(key).to_string(), value.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dom::QuickXmlDomParser;
    use crate::core::dom::DomParser;
    use crate::core::tree::to_tree;

    fn interpret_xml(body: &str) -> IndexMap<String, Tag> {
        let xml = format!(
            r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">{body}</rdf:RDF>"#
        );
        let doc = QuickXmlDomParser.parse(&xml).unwrap();
        let tree = to_tree(&doc).unwrap();
        interpret(&tree)
    }

    #[test]
    fn simple_scalar_with_attribute_shorthand() {
        let tags = interpret_xml(r#"<rdf:Description xmlns:xmp="urn:x" xmp:Foo="4711"/>"#);
        let foo = tags.get("Foo").unwrap();
        assert_eq!(foo.value, TagValue::Simple("4711".to_string()));
        assert!(foo.attributes.is_empty());
        assert_eq!(foo.description, "4711");
    }

    #[test]
    fn leaf_with_only_a_namespace_declaration_is_a_simple_value_not_an_empty_structure() {
        // `xmlns:xmp` is the element's only attribute and is syntactic, so
        // there is nothing left for rule 5 to turn into a field: this must
        // fall through to rule 7 rather than produce an empty structure.
        let tags = interpret_xml(r#"<rdf:Description><xmp:Title xmlns:xmp="urn:x">Hello</xmp:Title></rdf:Description>"#);
        let title = tags.get("Title").unwrap();
        assert_eq!(title.value, TagValue::Simple("Hello".to_string()));
        assert_eq!(title.description, "Hello");
    }

    #[test]
    fn leaf_with_no_attributes_at_all_is_a_simple_value() {
        let tags = interpret_xml(r#"<rdf:Description><dc:title>Hello</dc:title></rdf:Description>"#);
        let title = tags.get("title").unwrap();
        assert_eq!(title.value, TagValue::Simple("Hello".to_string()));
    }

    #[test]
    fn compact_structure_via_attribute_shorthand() {
        let tags = interpret_xml(
            r#"<rdf:Description><xmp:S xmlns:xmp="urn:x" xmp:A="47" xmp:B="11"/></rdf:Description>"#,
        );
        let s = tags.get("S").unwrap();
        let TagValue::Structure(fields) = &s.value else { panic!("expected structure") };
        assert_eq!(fields.get("A").unwrap().value, TagValue::Simple("47".to_string()));
        assert_eq!(fields.get("B").unwrap().value, TagValue::Simple("11".to_string()));
        assert_eq!(s.description, "A: 47; B: 11");
    }

    #[test]
    fn unordered_array_with_language_qualifier() {
        let tags = interpret_xml(
            r#"<rdf:Description><xmp:Arr xmlns:xmp="urn:x" xml:lang="en"><rdf:Bag>
                <rdf:li>47</rdf:li><rdf:li xml:lang="sv">11</rdf:li>
            </rdf:Bag></xmp:Arr></rdf:Description>"#,
        );
        let arr = tags.get("Arr").unwrap();
        assert_eq!(arr.attributes.get("lang"), Some(&"en".to_string()));
        assert_eq!(arr.description, "47, 11");
        let TagValue::Array(items) = &arr.value else { panic!("expected array") };
        assert_eq!(items.len(), 2);
        let ArrayItem::Tag(second) = &items[1] else { panic!("expected tag item") };
        assert_eq!(second.attributes.get("lang"), Some(&"sv".to_string()));
    }

    #[test]
    fn tiff_orientation_translation() {
        let tags = interpret_xml(
            r#"<rdf:Description><tiff:Orientation xmlns:tiff="urn:x">3</tiff:Orientation></rdf:Description>"#,
        );
        let orientation = tags.get("Orientation").unwrap();
        assert_eq!(orientation.value, TagValue::Simple("3".to_string()));
        assert_eq!(orientation.description, "Rotate 180");
    }

    #[test]
    fn creator_contact_info_key_rename() {
        let tags = interpret_xml(
            r#"<rdf:Description><Iptc4xmpCore:CreatorContactInfo xmlns:Iptc4xmpCore="urn:x"
                CiAdrCity="Berlin" CiAdrCtry="DE" CiAdrExtadr="Main St" CiAdrPcode="10115"
                CiAdrRegion="BE" CiEmailWork="a@b.com" CiTelWork="+49" CiUrlWork="https://example.com"/>
            </rdf:Description>"#,
        );
        let info = tags.get("CreatorContactInfo").unwrap();
        assert!(info.description.starts_with("CreatorCity: Berlin"));
        for key in ["CreatorCountry", "CreatorAddress", "CreatorPostalCode", "CreatorRegion", "CreatorWorkEmail", "CreatorWorkPhone", "CreatorWorkUrl"] {
            assert!(info.description.contains(key), "missing {key} in {}", info.description);
        }
    }

    #[test]
    fn microsoft_rating_variants_collapse_with_last_wins() {
        let tags = interpret_xml(
            r#"<rdf:Description>
                <MicrosoftPhoto:Rating xmlns:MicrosoftPhoto="urn:a">40</MicrosoftPhoto:Rating>
                <MicroSoftPhoto_1_:Rating xmlns:MicroSoftPhoto_1_="urn:b">50</MicroSoftPhoto_1_:Rating>
            </rdf:Description>"#,
        );
        assert_eq!(tags.len(), 1);
        let rating = tags.get("RatingPercent").unwrap();
        assert_eq!(rating.value, TagValue::Simple("50".to_string()));
    }

    #[test]
    fn nested_description_with_rdf_value_is_simple_with_qualifiers() {
        let tags = interpret_xml(
            r#"<rdf:Description><xmp:CreateDate xmlns:xmp="urn:x"><rdf:Description>
                <rdf:value>2024-01-01</rdf:value><xmp:tzsource>clock</xmp:tzsource>
            </rdf:Description></xmp:CreateDate></rdf:Description>"#,
        );
        let date = tags.get("CreateDate").unwrap();
        assert_eq!(date.value, TagValue::Simple("2024-01-01".to_string()));
        assert_eq!(date.attributes.get("tzsource"), Some(&"clock".to_string()));
    }

    #[test]
    fn parse_type_resource_simple_with_qualifiers() {
        let tags = interpret_xml(
            r#"<rdf:Description><xmp:Count rdf:parseType="Resource">
                <rdf:value>3</rdf:value><xmp:unit>items</xmp:unit>
            </xmp:Count></rdf:Description>"#,
        );
        let count = tags.get("Count").unwrap();
        assert_eq!(count.value, TagValue::Simple("3".to_string()));
        assert_eq!(count.attributes.get("unit"), Some(&"items".to_string()));
    }

    #[test]
    fn rdf_resource_is_consumed_not_retained() {
        let tags = interpret_xml(
            r#"<rdf:Description><dc:source xmlns:dc="urn:x" rdf:resource="https://example.com/a"/></rdf:Description>"#,
        );
        let source = tags.get("source").unwrap();
        assert_eq!(source.value, TagValue::Simple("https://example.com/a".to_string()));
        assert!(!source.attributes.contains_key("resource"));
    }

    #[test]
    fn parse_type_resource_whitespace_only_is_empty() {
        let tags = interpret_xml(
            r#"<rdf:Description><xmp:Empty rdf:parseType="Resource">   </xmp:Empty></rdf:Description>"#,
        );
        let empty = tags.get("Empty").unwrap();
        assert_eq!(empty.value, TagValue::Simple(String::new()));
        assert_eq!(empty.description, "");
    }

    #[test]
    fn multiple_descriptions_merge_into_one_map() {
        let tags = interpret_xml(
            r#"<rdf:Description xmlns:xmp="urn:x" xmp:A="1"/><rdf:Description xmlns:xmp="urn:x" xmp:B="2"/>"#,
        );
        assert_eq!(tags.get("A").unwrap().value, TagValue::Simple("1".to_string()));
        assert_eq!(tags.get("B").unwrap().value, TagValue::Simple("2".to_string()));
    }

    #[test]
    fn duplicate_child_name_last_one_wins() {
        let tags = interpret_xml(
            r#"<rdf:Description><xmp:Title xmlns:xmp="urn:x">first</xmp:Title><xmp:Title xmlns:xmp="urn:x">second</xmp:Title></rdf:Description>"#,
        );
        assert_eq!(tags.get("Title").unwrap().value, TagValue::Simple("second".to_string()));
    }
}
