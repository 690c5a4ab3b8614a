//! Error types for the segment-database client.
//!
//! # Design
//! Credential problems are split from request problems: the former are fatal
//! at construction time, the latter are per-call and carry the failing URL so
//! operators can correlate log lines with server-side records. `Http` means
//! the server answered with a non-success status; `Transport` means the
//! request never completed (DNS, refused connection, timeout, reset). Neither
//! is retried automatically — the caller decides.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`SegmentDbClient`](crate::SegmentDbClient).
#[derive(Debug, Error)]
pub enum Error {
    /// The credential provider could not resolve a certificate/key pair.
    /// Fatal: no client can be constructed without one.
    #[error("no client certificate credential was found")]
    CredentialNotFound,

    /// A credential file exists but could not be read.
    #[error("could not read credential file {}", path.display())]
    CredentialRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The credential was rejected by the TLS backend, or the transport
    /// could not be constructed from it.
    #[error("client credential rejected by TLS backend")]
    CredentialInvalid(#[source] reqwest::Error),

    /// The server responded with a non-success status code.
    #[error("server returned {status} {reason} for {url}")]
    Http {
        status: u16,
        reason: String,
        url: String,
    },

    /// The request failed below the HTTP layer: DNS resolution, connection
    /// refused, timeout, or reset mid-transfer.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl Error {
    /// Status code of an [`Error::Http`], if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for connection-level failures (including timeouts).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}
