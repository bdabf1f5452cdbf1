//! Layout algorithms for the cluster scene.
//!
//! The [`LayoutComputer`] asks a remote service for positions and falls back
//! to the deterministic [`local`] layout whenever that fails. Both paths
//! produce the same positioned [`ClusterData`](crate::cluster::ClusterData).

pub mod computer;
pub mod local;
pub mod remote;

pub use computer::{FallbackReason, LayoutComputer, LayoutOutcome, LayoutPhase, LayoutStrategy};
pub use local::{compute_local_layout, LocalLayoutConfig};
pub use remote::{LayoutTransport, RemoteLayoutRequest, RemoteLayoutResponse};
