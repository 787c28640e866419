//! A pure Rust XMP (Extensible Metadata Platform) metadata reader.
//!
//! Given XMP bytes extracted from a JPEG, PNG, TIFF, HEIC, WebP or similar
//! image file (a job left to the caller — this crate starts once the bytes
//! are already in hand), [`read`] produces a tag dictionary: human-readable
//! `description` strings alongside the structured `value` XMP's RDF/XML
//! actually encoded.
//!
//! XMP's RDF striped syntax admits several equivalent ways to write the
//! same property — attribute shorthand, `parseType="Resource"` compaction,
//! nested `rdf:Description` qualifiers, `rdf:Bag`/`rdf:Seq`/`rdf:Alt`
//! arrays. [`core::interpret`] is where all of those collapse into one
//! value model.
//!
//! Nothing on this crate's public surface throws. A malformed or partial
//! document degrades to whatever could be recovered rather than an error;
//! see [`core::error`] and [`core::warnings`] for how failures surface
//! instead.

pub mod core;
pub mod reader;

pub use core::chunk::{Chunk, Source};
pub use core::dom::{
    clear_default_dom_parser, default_dom_parser, set_default_dom_parser, DomNode, DomParser,
    QuickXmlDomParser,
};
pub use core::error::{XmpError, XmpResult};
pub use core::tag::{ArrayItem, Tag, TagValue};
pub use core::warnings::{DiagnosticSink, LogSink, NullSink};
pub use reader::{read, ReadOutput};

/// Reads `source` using the process-wide default DOM parser and a
/// [`LogSink`], for callers that have no need to inject either.
pub fn read_with_defaults(source: Source<'_>) -> ReadOutput {
    read(source, None, &LogSink)
}
