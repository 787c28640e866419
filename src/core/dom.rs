//! Pluggable XML parser adapter
//!
//! The reader never parses XML itself beyond the default implementation
//! shipped here: every stage above this module talks to a generic
//! [`DomNode`] tree produced by something implementing [`DomParser`].
//! A caller may supply its own adapter (wrapping a different XML library)
//! at construction time, or rely on the process-wide default slot.

use std::sync::{Arc, OnceLock, RwLock};

use indexmap::IndexMap;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::core::error::{XmpError, XmpResult};

/// A generic, parser-agnostic XML element.
///
/// This is the `Document`/`childNodes`/`tagName`/`attributes` contract made
/// concrete: every [`DomParser`] implementation must produce a tree of
/// these regardless of which XML library sits behind it. Qualified names
/// (`tagName`, attribute keys) are kept exactly as they appeared in the
/// source, prefix and all — namespace URI resolution is not performed
/// here, since only prefixes are used downstream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomNode {
    /// Qualified element name, e.g. `"rdf:Description"`.
    pub tag_name: String,
    /// Attributes in document order, qualified name to value.
    pub attributes: IndexMap<String, String>,
    /// Child elements, in document order. Whitespace-only text siblings of
    /// element children are not represented (they carry no information for
    /// RDF interpretation).
    pub children: Vec<DomNode>,
    /// Concatenated text content, present only when this element has no
    /// child elements of its own.
    pub text: Option<String>,
}

impl DomNode {
    fn local_name(&self) -> &str {
        local_name(&self.tag_name)
    }
}

/// Returns the substring of `qname` after the first colon, or the whole
/// string if there is none.
pub fn local_name(qname: &str) -> &str {
    qname.split_once(':').map(|(_, l)| l).unwrap_or(qname)
}

/// Capability interface for pluggable XML parsing.
///
/// Implement this to back the reader with a different XML library; the
/// shipped [`QuickXmlDomParser`] is the default used when no parser is
/// injected and no override has been configured.
pub trait DomParser: Send + Sync {
    /// Parses `xml` into a [`DomNode`] rooted at the document element.
    fn parse(&self, xml: &str) -> XmpResult<DomNode>;
}

/// Default parser adapter, backed by `quick-xml`.
///
/// Namespace-unaware by construction: it never validates that a prefix used
/// in a tag or attribute name was actually declared, so the auto-repair
/// retry in [`parse_with_repair`] never fires against it. The retry path
/// exists for stricter third-party adapters that do reject unbound
/// prefixes, and is exercised in tests against such an adapter.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuickXmlDomParser;

impl DomParser for QuickXmlDomParser {
    fn parse(&self, xml: &str) -> XmpResult<DomNode> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut stack: Vec<DomNode> = Vec::new();
        let mut root: Option<DomNode> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let node = DomNode {
                        tag_name: qname_of(e.name().as_ref()),
                        attributes: collect_attributes(&e),
                        children: Vec::new(),
                        text: None,
                    };
                    stack.push(node);
                }
                Ok(Event::Empty(e)) => {
                    let node = DomNode {
                        tag_name: qname_of(e.name().as_ref()),
                        attributes: collect_attributes(&e),
                        children: Vec::new(),
                        text: None,
                    };
                    push_child(&mut stack, &mut root, node);
                }
                Ok(Event::Text(e)) => {
                    let raw = String::from_utf8_lossy(e.as_ref());
                    let text = unescape(&raw).map(|c| c.into_owned()).unwrap_or_else(|_| raw.into_owned());
                    if let Some(top) = stack.last_mut() {
                        match &mut top.text {
                            Some(existing) => existing.push_str(&text),
                            None => top.text = Some(text),
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    let Some(node) = stack.pop() else {
                        continue;
                    };
                    push_child(&mut stack, &mut root, node);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XmpError::XmlParseFailure(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        root.ok_or_else(|| XmpError::XmlParseFailure("document has no root element".to_string()))
    }
}

fn push_child(stack: &mut Vec<DomNode>, root: &mut Option<DomNode>, node: DomNode) {
    if let Some(parent) = stack.last_mut() {
        // A parent that gains an element child can no longer be a text leaf;
        // whitespace-only framing text was already discarded by trim_text.
        parent.text = None;
        parent.children.push(node);
    } else {
        *root = Some(node);
    }
}

fn qname_of(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn collect_attributes(e: &quick_xml::events::BytesStart<'_>) -> IndexMap<String, String> {
    e.attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let raw = String::from_utf8_lossy(attr.value.as_ref());
            let value = unescape(&raw).map(|c| c.into_owned()).unwrap_or_else(|_| raw.into_owned());
            (key, value)
        })
        .collect()
}

/// Parses `xml` with `parser`, retrying once with synthesized namespace
/// declarations if the first attempt fails in a way that looks like an
/// unbound-prefix error.
///
/// Real-world XMP often omits `xmlns:rdf`, `xmlns:xmp`, etc. Parsers that
/// validate namespace bindings (unlike the shipped default) reject such
/// documents; this retries at most once, after declaring every prefix found
/// in the source as `xmlns:prefix="about:legacy-namespace"` on the document
/// element.
pub fn parse_with_repair(parser: &dyn DomParser, xml: &str) -> XmpResult<DomNode> {
    match parser.parse(xml) {
        Ok(doc) => Ok(doc),
        Err(e) if looks_like_unbound_prefix(&e) => {
            let repaired = inject_namespace_declarations(xml);
            parser.parse(&repaired)
        }
        Err(e) => Err(e),
    }
}

fn looks_like_unbound_prefix(err: &XmpError) -> bool {
    let XmpError::XmlParseFailure(message) = err else {
        return false;
    };
    let lower = message.to_ascii_lowercase();
    lower.contains("unbound") || lower.contains("prefix") || lower.contains("namespace")
}

/// Scans `xml` for `prefix:` usages on tag and attribute names that have no
/// matching `xmlns:prefix=` declaration anywhere in the source, and injects
/// synthetic declarations for them on the first opening tag.
fn inject_namespace_declarations(xml: &str) -> String {
    let mut declared = std::collections::HashSet::new();
    let mut used = std::collections::HashSet::new();

    let mut chars = xml.char_indices().peekable();
    let mut in_tag = false;
    let mut token_start = None;
    while let Some((i, c)) = chars.next() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if in_tag && (c.is_alphanumeric() || c == '_' || c == ':' || c == '-' || c == '.') => {
                if token_start.is_none() {
                    token_start = Some(i);
                }
            }
            _ if in_tag => {
                if let Some(start) = token_start.take() {
                    record_prefix(&xml[start..i], &mut declared, &mut used);
                }
            }
            _ => {}
        }
    }
    if let Some(start) = token_start {
        record_prefix(&xml[start..], &mut declared, &mut used);
    }

    let missing: Vec<&str> = used.difference(&declared).map(|s| s.as_str()).collect();
    if missing.is_empty() {
        return xml.to_string();
    }

    let Some(insert_at) = xml.find('<').and_then(|start| {
        xml[start..].find(|c: char| c.is_whitespace() || c == '>' || c == '/').map(|o| start + o)
    }) else {
        return xml.to_string();
    };

    let mut repaired = String::with_capacity(xml.len() + missing.len() * 48);
    repaired.push_str(&xml[..insert_at]);
    for prefix in missing {
        repaired.push_str(&format!(" xmlns:{prefix}=\"about:legacy-namespace\""));
    }
    repaired.push_str(&xml[insert_at..]);
    repaired
}

fn record_prefix(token: &str, declared: &mut std::collections::HashSet<String>, used: &mut std::collections::HashSet<String>) {
    let token = token.trim_start_matches('/');
    if let Some(prefix) = token.strip_prefix("xmlns:") {
        declared.insert(prefix.to_string());
        return;
    }
    if token == "xmlns" {
        return;
    }
    if let Some((prefix, _)) = token.split_once(':') {
        if !prefix.is_empty() && prefix != "xml" {
            used.insert(prefix.to_string());
        }
    }
}

static DEFAULT_PARSER: OnceLock<RwLock<Option<Arc<dyn DomParser>>>> = OnceLock::new();

fn default_parser_slot() -> &'static RwLock<Option<Arc<dyn DomParser>>> {
    DEFAULT_PARSER.get_or_init(|| RwLock::new(Some(Arc::new(QuickXmlDomParser))))
}

/// Installs `parser` as the process-wide default used by [`crate::read`]
/// calls that omit an explicit parser. Not interlocked across calls:
/// callers that swap the default concurrently with in-flight reads must
/// serialize those swaps themselves (see the concurrency notes in the
/// crate-level docs).
pub fn set_default_dom_parser(parser: Arc<dyn DomParser>) {
    let slot = default_parser_slot();
    let mut guard = slot.write().expect("default DOM parser lock poisoned");
    *guard = Some(parser);
}

/// Clears the process-wide default, so that a `read` call without an
/// explicit parser falls back to [`XmpError::NoParserAvailable`].
pub fn clear_default_dom_parser() {
    let slot = default_parser_slot();
    let mut guard = slot.write().expect("default DOM parser lock poisoned");
    *guard = None;
}

/// Returns the process-wide default parser, if one is configured.
pub fn default_dom_parser() -> Option<Arc<dyn DomParser>> {
    let slot = default_parser_slot();
    let guard = slot.read().expect("default DOM parser lock poisoned");
    guard.clone()
}

/// Finds the `rdf:RDF` element, optionally wrapped in `x:xmpmeta`, that
/// serves as the root of the intermediate tree.
pub fn find_rdf_root(doc: &DomNode) -> Option<&DomNode> {
    if doc.local_name() == "RDF" {
        return Some(doc);
    }
    for child in &doc.children {
        if child.local_name() == "xmpmeta" {
            if let Some(rdf) = child.children.iter().find(|c| c.local_name() == "RDF") {
                return Some(rdf);
            }
        }
        if child.local_name() == "RDF" {
            return Some(child);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_rdf() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:xmp="http://ns.adobe.com/xap/1.0/">
  <rdf:Description rdf:about="" xmp:CreatorTool="MyApp"/>
</rdf:RDF>"#;
        let doc = QuickXmlDomParser.parse(xml).unwrap();
        assert_eq!(doc.tag_name, "rdf:RDF");
        assert_eq!(doc.children.len(), 1);
        let desc = &doc.children[0];
        assert_eq!(desc.attributes.get("xmp:CreatorTool").map(String::as_str), Some("MyApp"));
    }

    #[test]
    fn finds_root_under_xmpmeta_wrapper() {
        let xml = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description/>
  </rdf:RDF>
</x:xmpmeta>"#;
        let doc = QuickXmlDomParser.parse(xml).unwrap();
        let rdf = find_rdf_root(&doc).unwrap();
        assert_eq!(rdf.tag_name, "rdf:RDF");
    }

    #[test]
    fn text_only_element_collapses_to_text() {
        let xml = "<tiff:Orientation>3</tiff:Orientation>";
        let doc = QuickXmlDomParser.parse(xml).unwrap();
        assert_eq!(doc.text.as_deref(), Some("3"));
        assert!(doc.children.is_empty());
    }

    struct AlwaysUnboundPrefixOnce {
        failed_once: std::sync::atomic::AtomicBool,
    }

    impl DomParser for AlwaysUnboundPrefixOnce {
        fn parse(&self, xml: &str) -> XmpResult<DomNode> {
            if !self.failed_once.swap(true, std::sync::atomic::Ordering::SeqCst) {
                return Err(XmpError::XmlParseFailure("unbound prefix: rdf".to_string()));
            }
            QuickXmlDomParser.parse(xml)
        }
    }

    #[test]
    fn repairs_missing_namespace_declaration_once() {
        let xml = r#"<rdf:RDF><rdf:Description rdf:about="" xmp:Foo="1"/></rdf:RDF>"#;
        let parser = AlwaysUnboundPrefixOnce { failed_once: std::sync::atomic::AtomicBool::new(false) };
        let doc = parse_with_repair(&parser, xml).unwrap();
        assert_eq!(doc.tag_name, "rdf:RDF");
    }

    #[test]
    fn default_parser_slot_round_trips() {
        assert!(default_dom_parser().is_some());
        clear_default_dom_parser();
        assert!(default_dom_parser().is_none());
        set_default_dom_parser(Arc::new(QuickXmlDomParser));
        assert!(default_dom_parser().is_some());
    }
}
