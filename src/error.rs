//! Error types for proof generation.
//!
//! Nothing here is retried or recovered locally. The first failure aborts the
//! current run and surfaces its kind and context to the caller, so no partial
//! bundle can ever be emitted.

use thiserror::Error;

/// Failure modes of a proof-generation run.
#[derive(Debug, Error)]
pub enum ProofGenError {
    /// Malformed numeric, hex, or address input. Local and non-retryable.
    #[error("invalid {what}: {value:?}")]
    Format { what: &'static str, value: String },

    /// The remote call could not complete (connect failure, non-success
    /// status, unparseable body).
    #[error("transport failure during {method}: {source}")]
    Transport {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint understood the request but reported an application error.
    #[error("RPC error {code} from {method}: {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },

    /// A required field is absent from an otherwise well-formed response.
    /// Usually means the node speaks a different protocol version.
    #[error("missing field `{field}` in {method} response")]
    MissingField { method: String, field: String },

    /// Malformed or non-canonical RLP input.
    #[error("RLP decode error: {0}")]
    Decode(String),

    /// The RLP-encoded header does not hash to the block hash the node
    /// reported, so the header and proofs may describe different blocks.
    #[error("block hash mismatch: node reported {reported} but header hashes to {computed}")]
    BlockMismatch { reported: String, computed: String },
}

impl ProofGenError {
    pub(crate) fn format(what: &'static str, value: impl Into<String>) -> Self {
        Self::Format {
            what,
            value: value.into(),
        }
    }

    pub(crate) fn missing_field(method: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            method: method.into(),
            field: field.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProofGenError>;
