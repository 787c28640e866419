//! XMP core module
//!
//! Pipeline stages, leaves first: chunk assembly, XML parsing, the
//! intermediate tree, RDF interpretation, and description/tag rendering.
//! [`crate::reader::read`] is the only thing that calls all of them in
//! sequence; everything here is usable on its own for callers that already
//! have, say, a parsed [`dom::DomNode`] from somewhere else.

pub mod chunk;
pub mod describe;
pub mod dom;
pub mod error;
pub mod interpret;
pub mod normalize;
pub mod tag;
pub mod translate;
pub mod tree;
pub mod warnings;

pub use chunk::{assemble, Chunk, Source};
pub use dom::{DomParser, QuickXmlDomParser};
pub use error::{XmpError, XmpResult};
pub use interpret::interpret;
pub use normalize::normalize_local_name;
pub use tag::{ArrayItem, Tag, TagValue};
pub use tree::{to_tree, INode, INodeValue};
pub use warnings::{DiagnosticSink, LogSink, NullSink};
