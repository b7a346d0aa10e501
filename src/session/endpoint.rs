//! Location of charon's VICI socket

use crate::error::{Error, Result};
use crate::session::{Connector, ViciSession};
use std::path::{Path, PathBuf};
use tokio::net::UnixStream;
use tracing::{debug, trace};

/// Default VICI socket of charon
pub const DEFAULT_URI: &str = "unix:///var/run/charon.vici";

/// A VICI endpoint reachable over a Unix domain socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Path to the VICI socket
    socket_path: PathBuf,
}

impl Endpoint {
    /// Create an endpoint for the given socket path
    pub fn new<P: AsRef<Path>>(socket_path: P) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
        }
    }

    /// Parse a VICI URI
    ///
    /// Accepts `unix://<path>` and bare absolute paths. charon can also
    /// listen on `tcp://`, which is not supported here.
    pub fn parse(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        if let Some(path) = uri.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(Error::Config(format!("Missing socket path in '{}'", uri)));
            }
            return Ok(Self::new(path));
        }
        if uri.starts_with('/') {
            return Ok(Self::new(uri));
        }
        match uri.split_once("://") {
            Some((scheme, _)) => Err(Error::Config(format!(
                "Unsupported VICI URI scheme '{}' in '{}'",
                scheme, uri
            ))),
            None => Err(Error::Config(format!("Invalid VICI URI '{}'", uri))),
        }
    }

    /// Resolve the endpoint from the first available source, falling back
    /// to charon's default socket
    pub fn resolve(candidates: &[Option<&str>]) -> Result<Self> {
        let uri = candidates
            .iter()
            .flatten()
            .copied()
            .next()
            .unwrap_or(DEFAULT_URI);
        debug!(uri = %uri, "Using VICI endpoint");
        Self::parse(uri)
    }

    /// Get the socket path
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new("/var/run/charon.vici")
    }
}

impl Connector for Endpoint {
    type Session = ViciSession;

    async fn connect(&self) -> Result<ViciSession> {
        let stream = UnixStream::connect(&self.socket_path).await.map_err(|e| {
            Error::Session(format!(
                "Failed to connect to VICI socket at {}: {}",
                self.socket_path.display(),
                e
            ))
        })?;

        trace!(socket_path = %self.socket_path.display(), "Connected to VICI socket");
        Ok(ViciSession::new(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unix_uri() {
        let endpoint = Endpoint::parse("unix:///run/charon.vici").unwrap();
        assert_eq!(endpoint.socket_path(), Path::new("/run/charon.vici"));
    }

    #[test]
    fn test_parse_bare_path() {
        let endpoint = Endpoint::parse("/tmp/test.vici").unwrap();
        assert_eq!(endpoint.socket_path(), Path::new("/tmp/test.vici"));
    }

    #[test]
    fn test_parse_tcp_rejected() {
        let err = Endpoint::parse("tcp://127.0.0.1:4502").unwrap_err();
        assert!(err.to_string().contains("Unsupported VICI URI scheme 'tcp'"));
    }

    #[test]
    fn test_parse_garbage_rejected() {
        assert!(Endpoint::parse("charon").is_err());
        assert!(Endpoint::parse("unix://").is_err());
    }

    #[test]
    fn test_resolve_priority() {
        let endpoint = Endpoint::resolve(&[None, Some("unix:///a.vici"), Some("/b.vici")]).unwrap();
        assert_eq!(endpoint.socket_path(), Path::new("/a.vici"));
    }

    #[test]
    fn test_resolve_default() {
        let endpoint = Endpoint::resolve(&[None, None]).unwrap();
        assert_eq!(endpoint, Endpoint::default());
    }

    #[tokio::test]
    async fn test_connect_nonexistent_socket() {
        let endpoint = Endpoint::new("/tmp/nonexistent-vici-12345.sock");
        let err = endpoint.connect().await.unwrap_err();
        assert!(matches!(err, Error::Session(_)));
        assert!(err.to_string().contains("Failed to connect"));
    }
}
