//! Error taxonomy for the discovery pipeline.
//!
//! Fatal conditions (missing inputs, empty sources) surface as variants here;
//! single malformed rows are skipped and tallied, never raised.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CognateError {
    /// A required input file could not be obtained. Nothing is written.
    #[error("source unavailable: {path}")]
    SourceUnavailable { path: String },

    /// A source yielded zero usable entries for a language.
    #[error("malformed source: no usable entries for language '{language}'")]
    MalformedSource { language: String },

    /// A language code outside the supported set was encountered at load time.
    #[error("unknown language code '{code}'")]
    UnknownLanguage { code: String },

    /// The merge pipeline was invoked without one of its two record sets.
    #[error("missing record set: {which}")]
    MissingRecordSet { which: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
