//! Synchronous client core for a DQSEGDB segment-database service.
//!
//! # Overview
//! Two halves: pure URL construction for the four `/dq` query shapes
//! (`urls`), and a blocking authenticated transport (`client`) that issues
//! GET/PUT/PATCH requests against those URLs with TLS client-certificate
//! authentication on `https` endpoints.
//!
//! # Design
//! - URL building is deterministic string concatenation with no encoding;
//!   the transport never inspects or rewrites the URLs it is given.
//! - Response bodies are opaque strings. This crate does no JSON parsing;
//!   higher-level tooling owns the payload schemas.
//! - The client credential is resolved once through the
//!   [`CredentialProvider`] seam and is immutable afterwards.
//! - Timeouts are scoped per request, so the client is safe to share across
//!   threads; calls in flight cannot clobber each other's deadline.
//! - Trace lines go through the `log` facade: `debug` around each call,
//!   `error` on every failure before it propagates.

pub mod client;
pub mod credential;
pub mod error;
pub mod urls;

pub use client::{SegmentDbClient, DEFAULT_TIMEOUT};
pub use credential::{Credential, CredentialProvider, StaticCredential};
pub use error::Error;
pub use urls::{
    flag_query_url, segment_query_url, segment_query_url_in_window, version_query_url,
    FlagVersion, Protocol,
};
