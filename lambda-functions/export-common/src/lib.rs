//! Shared building blocks for the RDS snapshot export Lambdas.
//!
//! Both functions read their settings from the environment, talk to the RDS
//! control plane through [`SnapshotControlPlane`], and answer with the same
//! API Gateway style envelope.

pub mod config;
pub mod control_plane;
pub mod error;
pub mod identifiers;
pub mod response;

pub use config::{ClusterSnapshotExportConfig, ExportDestination, SnapshotExportConfig};
pub use control_plane::{
    ClusterSnapshotAck, CreateClusterSnapshotRequest, ExportTaskAck, ExportTaskRequest,
    RdsControlPlane, SnapshotControlPlane,
};
pub use error::{ErrorDetail, ErrorKind, ExportError};
pub use response::{ApiGatewayResponse, ExportStarted};
