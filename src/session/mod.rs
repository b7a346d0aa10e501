//! Control-plane session
//!
//! This module provides the read-only view of charon used by completion:
//! - `ControlPlane`: the queries completion needs
//! - `Connector`: opens a fresh session per completion request
//! - `Endpoint` / `ViciSession`: the implementation over charon's VICI socket

mod endpoint;
mod vici;

pub use endpoint::{DEFAULT_URI, Endpoint};
pub use vici::ViciSession;

use crate::error::Result;
use crate::protocol::Section;

/// Restriction of an SA listing to one IKE_SA
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaFilter {
    #[default]
    All,
    /// IKE_SAs instantiated from the named connection
    IkeName(String),
    /// The IKE_SA with this unique id
    IkeId(String),
}

/// Read-only queries against the daemon owning IKE state
///
/// Every listing is keyed by entity name. Connection entries carry their
/// CHILD_SA configurations under `children`; IKE_SA entries carry a
/// `uniqueid` and their CHILD_SAs under `child-sas`, each of which in turn
/// has `name` and `uniqueid`.
#[allow(async_fn_in_trait)]
pub trait ControlPlane {
    /// Configured connections, optionally only the named one
    async fn list_conns(&mut self, ike: Option<&str>) -> Result<Section>;

    /// Established IKE_SAs and their CHILD_SAs
    async fn list_sas(&mut self, filter: &SaFilter) -> Result<Section>;

    /// Configured virtual IP pools
    async fn get_pools(&mut self) -> Result<Section>;
}

/// Factory for control-plane sessions
#[allow(async_fn_in_trait)]
pub trait Connector {
    type Session: ControlPlane;

    /// Open a new session
    async fn connect(&self) -> Result<Self::Session>;
}
