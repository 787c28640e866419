//! RDF Tree Builder: generic DOM → typed intermediate tree
//!
//! Converts a [`DomNode`] into the [`INode`] shape: a tree decoupled from
//! any particular XML library, with repeated child names collapsed into
//! ordered sequences rather than left as a flat list of siblings.

use indexmap::IndexMap;

use crate::core::dom::{find_rdf_root, local_name, DomNode};
use crate::core::error::{XmpError, XmpResult};

/// One child slot of an [`INode`]: either a single occurrence or an ordered
/// sequence when the same qualified name repeated.
#[derive(Debug, Clone, PartialEq)]
pub enum Children {
    Single(INode),
    Many(Vec<INode>),
}

impl Children {
    /// RDF Interpreter rule 1: reduce a repeated name to its last element.
    pub fn last(&self) -> &INode {
        match self {
            Children::Single(node) => node,
            Children::Many(nodes) => nodes.last().expect("Many is never empty"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &INode> {
        match self {
            Children::Single(node) => std::slice::from_ref(node).iter(),
            Children::Many(nodes) => nodes.iter(),
        }
    }
}

/// The intermediate tree node. `attributes` map qualified names to string
/// values; `value` is either a text leaf or a mapping from child
/// qualified-name to [`Children`] (empty when the element has no children).
#[derive(Debug, Clone, PartialEq)]
pub struct INode {
    pub attributes: IndexMap<String, String>,
    pub value: INodeValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum INodeValue {
    Text(String),
    Element(IndexMap<String, Children>),
}

impl INode {
    /// The element's text content, or the empty string if it has children
    /// rather than text.
    pub fn text(&self) -> &str {
        match &self.value {
            INodeValue::Text(text) => text,
            INodeValue::Element(_) => "",
        }
    }

    /// The children map, or `None` if this node collapsed to a text leaf.
    pub fn children(&self) -> Option<&IndexMap<String, Children>> {
        match &self.value {
            INodeValue::Element(map) => Some(map),
            INodeValue::Text(_) => None,
        }
    }

    /// Looks up a child by local name (ignoring the qualifying prefix),
    /// returning the last occurrence if the name repeated.
    pub fn child_by_local_name(&self, local: &str) -> Option<&INode> {
        self.children()?
            .iter()
            .find(|(qname, _)| local_name(qname) == local)
            .map(|(_, children)| children.last())
    }
}

/// Builds the intermediate tree for the `rdf:RDF` element (optionally
/// wrapped in `x:xmpmeta`) found in `document`.
///
/// A missing `rdf:RDF` root is a structural mismatch.
pub fn to_tree(document: &DomNode) -> XmpResult<INode> {
    let rdf_root = find_rdf_root(document)
        .ok_or_else(|| XmpError::StructuralMismatch("no rdf:RDF element found".to_string()))?;
    Ok(build_inode(rdf_root))
}

fn build_inode(dom: &DomNode) -> INode {
    let attributes = dom.attributes.clone();

    if dom.children.is_empty() {
        let value = match &dom.text {
            Some(text) if !text.trim().is_empty() => INodeValue::Text(text.clone()),
            _ => INodeValue::Element(IndexMap::new()),
        };
        return INode { attributes, value };
    }

    let mut map: IndexMap<String, Children> = IndexMap::new();
    for child in &dom.children {
        let child_node = build_inode(child);
        match map.get_mut(&child.tag_name) {
            None => {
                map.insert(child.tag_name.clone(), Children::Single(child_node));
            }
            Some(Children::Single(existing)) => {
                let existing = existing.clone();
                map.insert(
                    child.tag_name.clone(),
                    Children::Many(vec![existing, child_node]),
                );
            }
            Some(Children::Many(nodes)) => nodes.push(child_node),
        }
    }
    INode { attributes, value: INodeValue::Element(map) }
}
