//! Internal error kinds for the XMP reader
//!
//! None of these ever reach the public boundary: [`crate::read`] and friends
//! always return a (possibly empty) tag map. They exist so each stage of the
//! pipeline can report why it produced nothing, to the diagnostic sink and
//! to tests. Convention throughout the pipeline: catch at the boundary of
//! the affected unit, degrade to empty/partial, keep going.
use thiserror::Error;

/// Failure of a single pipeline stage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XmpError {
    /// No DOM parser was supplied and no default is configured.
    #[error("no DOM parser available")]
    NoParserAvailable,

    /// The configured parser rejected the document, even after a
    /// namespace-repair retry.
    #[error("XML parse failure: {0}")]
    XmlParseFailure(String),

    /// The document parsed as XML but has no `rdf:RDF` root.
    #[error("structural mismatch: {0}")]
    StructuralMismatch(String),

    /// A single child of an `rdf:Description` could not be classified.
    #[error("could not interpret tag `{0}`")]
    PerTagInterpretError(String),

    /// Description synthesis failed for one tag; the raw value is used.
    #[error("could not format description for `{0}`")]
    DescriptionFormatError(String),
}

/// Result type alias used internally by the pipeline stages.
pub type XmpResult<T> = Result<T, XmpError>;
