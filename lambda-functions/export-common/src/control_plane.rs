use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_rds::client::Waiters;
use aws_sdk_rds::Client as RdsClient;
use bon::Builder;
use tracing::info;

use crate::error::ExportError;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateClusterSnapshotRequest {
    pub db_cluster_identifier: String,
    pub snapshot_identifier: String,
}

/// What RDS returns once it has accepted a snapshot request.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSnapshotAck {
    pub snapshot_identifier: String,
    pub snapshot_arn: Option<String>,
    pub status: Option<String>,
}

/// Parameters of a `StartExportTask` call. Unset optionals are left out of
/// the outgoing request.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(on(String, into))]
pub struct ExportTaskRequest {
    pub export_task_identifier: String,
    pub source_arn: String,
    pub s3_bucket_name: String,
    pub iam_role_arn: String,
    pub kms_key_id: Option<String>,
    pub s3_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportTaskAck {
    pub export_task_identifier: String,
    pub status: Option<String>,
}

/// The RDS operations the export Lambdas depend on.
#[async_trait]
pub trait SnapshotControlPlane: Send + Sync {
    async fn create_cluster_snapshot(
        &self,
        request: CreateClusterSnapshotRequest,
    ) -> Result<ClusterSnapshotAck, ExportError>;

    /// Blocks until the cluster snapshot is `available` or `ceiling` elapses.
    async fn wait_until_available(
        &self,
        snapshot_identifier: String,
        ceiling: Duration,
    ) -> Result<(), ExportError>;

    async fn start_export_task(
        &self,
        request: ExportTaskRequest,
    ) -> Result<ExportTaskAck, ExportError>;
}

/// [`SnapshotControlPlane`] backed by the AWS SDK.
pub struct RdsControlPlane {
    client: RdsClient,
}

impl RdsControlPlane {
    pub fn new(client: RdsClient) -> Self {
        Self { client }
    }

    pub async fn from_env() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(RdsClient::new(&config))
    }
}

#[async_trait]
impl SnapshotControlPlane for RdsControlPlane {
    async fn create_cluster_snapshot(
        &self,
        request: CreateClusterSnapshotRequest,
    ) -> Result<ClusterSnapshotAck, ExportError> {
        let output = self
            .client
            .create_db_cluster_snapshot()
            .db_cluster_identifier(&request.db_cluster_identifier)
            .db_cluster_snapshot_identifier(&request.snapshot_identifier)
            .send()
            .await
            .map_err(|e| ExportError::from_sdk("CreateDBClusterSnapshot", e))?;

        let snapshot = output.db_cluster_snapshot();

        Ok(ClusterSnapshotAck {
            snapshot_identifier: snapshot
                .and_then(|s| s.db_cluster_snapshot_identifier())
                .unwrap_or(request.snapshot_identifier.as_str())
                .to_string(),
            snapshot_arn: snapshot
                .and_then(|s| s.db_cluster_snapshot_arn())
                .map(str::to_string),
            status: snapshot.and_then(|s| s.status()).map(str::to_string),
        })
    }

    async fn wait_until_available(
        &self,
        snapshot_identifier: String,
        ceiling: Duration,
    ) -> Result<(), ExportError> {
        info!(
            "Waiting up to {}s for snapshot {} to become available",
            ceiling.as_secs(),
            snapshot_identifier
        );

        self.client
            .wait_until_db_cluster_snapshot_available()
            .db_cluster_snapshot_identifier(&snapshot_identifier)
            .wait(ceiling)
            .await
            .map_err(|e| ExportError::from_waiter(&snapshot_identifier, ceiling, e))?;

        Ok(())
    }

    async fn start_export_task(
        &self,
        request: ExportTaskRequest,
    ) -> Result<ExportTaskAck, ExportError> {
        let output = self
            .client
            .start_export_task()
            .export_task_identifier(&request.export_task_identifier)
            .source_arn(&request.source_arn)
            .s3_bucket_name(&request.s3_bucket_name)
            .iam_role_arn(&request.iam_role_arn)
            .set_kms_key_id(request.kms_key_id.clone())
            .set_s3_prefix(request.s3_prefix.clone())
            .send()
            .await
            .map_err(|e| ExportError::from_sdk("StartExportTask", e))?;

        Ok(ExportTaskAck {
            export_task_identifier: output
                .export_task_identifier()
                .unwrap_or(request.export_task_identifier.as_str())
                .to_string(),
            status: output.status().map(str::to_string),
        })
    }
}
