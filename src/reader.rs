//! Top-level orchestration: `read`, the crate's one real entry point
//!
//! Wires the chunk assembler, DOM parser, tree builder and RDF interpreter
//! into a single operation: raw byte ranges in, a tag dictionary out,
//! nothing fatal in between.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::core::chunk::{self, Source};
use crate::core::dom::{self, DomParser};
use crate::core::error::XmpError;
use crate::core::interpret;
use crate::core::tag::Tag;
use crate::core::tree;
use crate::core::warnings::DiagnosticSink;

/// The result of a [`read`] call.
///
/// Conceptually a single mapping from local name to `Tag` plus a reserved
/// `_raw` key; a literal mixed-type map has no natural Rust representation,
/// so `_raw` is lifted into its own field instead. `raw` is `None` exactly
/// when the mapping would have lacked a `_raw` key: no chunk decoded
/// successfully. `raw` is the byte-concatenation of the *input* chunks that
/// decoded successfully, decoded as UTF-8 but not envelope-trimmed — it is
/// not the (trimmed) XML handed to the parser.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReadOutput {
    pub tags: IndexMap<String, Tag>,
    #[cfg_attr(feature = "serde", serde(rename = "_raw", skip_serializing_if = "Option::is_none"))]
    pub raw: Option<String>,
}

/// Reads XMP metadata out of `source`, producing a tag dictionary.
///
/// `dom_parser` overrides the process-wide default (see
/// [`crate::core::dom::set_default_dom_parser`]); when both are absent,
/// `sink` receives a single [`XmpError::NoParserAvailable`] diagnostic and
/// an empty [`ReadOutput`] is returned. Nothing here panics or propagates an
/// error to the caller — see the crate-level error handling notes.
pub fn read(source: Source<'_>, dom_parser: Option<Arc<dyn DomParser>>, sink: &dyn DiagnosticSink) -> ReadOutput {
    let assembled = chunk::assemble(source);
    if assembled.standard.is_none() && assembled.extended.is_none() {
        return ReadOutput::default();
    }

    let Some(parser) = dom_parser.or_else(dom::default_dom_parser) else {
        sink.warn("read", &XmpError::NoParserAvailable);
        return ReadOutput::default();
    };

    let standard_tags = assembled
        .standard
        .as_deref()
        .and_then(|xml| parse_document(parser.as_ref(), xml, sink, "standard chunk"));
    let extended_tags = assembled
        .extended
        .as_deref()
        .and_then(|xml| parse_document(parser.as_ref(), xml, sink, "extended chunk"));

    let both_present = assembled.extended.is_some();
    if both_present && standard_tags.is_none() && extended_tags.is_none() {
        // Extended-XMP fallback: independent parses of both chunks failed,
        // so byte-concatenate the raw (untrimmed) chunk bytes and try once
        // more as a single document. `_raw` is reset to just this fallback
        // attempt.
        let combined_raw = format!(
            "{}{}",
            assembled.standard_raw.unwrap_or_default(),
            assembled.extended_raw.unwrap_or_default()
        );
        let combined_trimmed = chunk::trim_packet_envelope(&combined_raw).to_string();
        return match parse_document(parser.as_ref(), &combined_trimmed, sink, "concatenated fallback") {
            Some(tags) => ReadOutput { tags, raw: Some(combined_raw) },
            None => ReadOutput::default(),
        };
    }

    let mut tags = IndexMap::new();
    let mut raw_parts = Vec::new();
    // Extended tags override standard on a duplicate key, consistent with
    // treating the extended chunk as the continuation of the same document.
    // `_raw` accumulates the untrimmed chunk bytes of whichever chunks
    // successfully decoded: it is the byte-concatenation of the input
    // chunks, wrapper and framing bytes included, not the XML handed to
    // the parser.
    if let Some(standard_tags) = standard_tags {
        tags.extend(standard_tags);
        if let Some(raw) = assembled.standard_raw {
            raw_parts.push(raw);
        }
    }
    if let Some(extended_tags) = extended_tags {
        tags.extend(extended_tags);
        if let Some(raw) = assembled.extended_raw {
            raw_parts.push(raw);
        }
    }

    let raw = (!raw_parts.is_empty()).then(|| raw_parts.join(""));
    ReadOutput { tags, raw }
}

fn parse_document(
    parser: &dyn DomParser,
    xml: &str,
    sink: &dyn DiagnosticSink,
    context: &str,
) -> Option<IndexMap<String, Tag>> {
    let dom = match dom::parse_with_repair(parser, xml) {
        Ok(dom) => dom,
        Err(e) => {
            sink.warn(context, &e);
            return None;
        }
    };
    let node = match tree::to_tree(&dom) {
        Ok(node) => node,
        Err(e) => {
            sink.warn(context, &e);
            return None;
        }
    };
    Some(interpret::interpret(&node))
}
