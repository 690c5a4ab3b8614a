//! Client-certificate credential handling.
//!
//! # Design
//! Discovery of grid or proxy certificates is an external concern; this
//! module only defines the seam. A [`CredentialProvider`] hands the client a
//! [`Credential`] — a certificate/key path pair — exactly once, at
//! construction time. The pair is loaded into a TLS identity immediately and
//! reused for every HTTPS connection for the life of the client; there is no
//! rotation or expiry handling.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// A client-certificate credential: paths to a PEM certificate and its
/// private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl Credential {
    pub fn new(cert_path: impl AsRef<Path>, key_path: impl AsRef<Path>) -> Self {
        Self {
            cert_path: cert_path.as_ref().to_path_buf(),
            key_path: key_path.as_ref().to_path_buf(),
        }
    }

    /// Load both PEM files and build a TLS identity from them.
    ///
    /// The certificate and key may live in separate files (the usual grid
    /// layout) or the same file given twice; the bytes are concatenated
    /// before parsing, which accepts either.
    pub fn identity(&self) -> Result<reqwest::Identity, Error> {
        let mut pem = read_pem(&self.cert_path)?;
        pem.extend_from_slice(&read_pem(&self.key_path)?);
        reqwest::Identity::from_pem(&pem).map_err(Error::CredentialInvalid)
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|source| Error::CredentialRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Source of the client credential, resolved once at client construction.
///
/// Implementations wrap whatever discovery mechanism the deployment uses
/// (explicit configuration, grid proxy lookup, ...). Returning `None` makes
/// client construction fail with [`Error::CredentialNotFound`].
pub trait CredentialProvider {
    fn resolve(&self) -> Option<Credential>;
}

/// Provider for a credential known up front.
#[derive(Debug, Clone)]
pub struct StaticCredential(pub Credential);

impl CredentialProvider for StaticCredential {
    fn resolve(&self) -> Option<Credential> {
        Some(self.0.clone())
    }
}
