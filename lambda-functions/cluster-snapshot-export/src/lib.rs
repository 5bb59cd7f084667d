use std::future::Future;

use chrono::{DateTime, Utc};
use export_common::identifiers::snapshot_export_task_identifier;
use export_common::{
    ApiGatewayResponse, ClusterSnapshotAck, ClusterSnapshotExportConfig,
    CreateClusterSnapshotRequest, ExportError, ExportStarted, ExportTaskRequest,
    SnapshotControlPlane,
};
use serde_json::Value;
use tracing::{error, info};

pub const SUCCESS_MESSAGE: &str = "Cluster snapshot created and export task started successfully";
pub const FAILURE_MESSAGE: &str = "Failed to create and export cluster snapshot";

/// Snapshots an Aurora cluster, waits for the snapshot, then exports it.
pub struct ClusterSnapshotExportService<P> {
    control_plane: P,
    config: ClusterSnapshotExportConfig,
}

impl<P: SnapshotControlPlane> ClusterSnapshotExportService<P> {
    pub fn new(control_plane: P, config: ClusterSnapshotExportConfig) -> Self {
        Self {
            control_plane,
            config,
        }
    }

    pub async fn create_snapshot(&self) -> Result<ClusterSnapshotAck, ExportError> {
        let request = CreateClusterSnapshotRequest {
            db_cluster_identifier: self.config.db_cluster_identifier.clone(),
            snapshot_identifier: self.config.snapshot_name.clone(),
        };
        info!("Creating cluster snapshot: {:?}", request);

        let ack = self.control_plane.create_cluster_snapshot(request).await?;

        info!(
            "Snapshot {} created with status {}",
            ack.snapshot_identifier,
            ack.status.as_deref().unwrap_or("unknown")
        );

        Ok(ack)
    }

    pub fn export_request(
        &self,
        snapshot: &ClusterSnapshotAck,
        now: DateTime<Utc>,
    ) -> Result<ExportTaskRequest, ExportError> {
        let source_arn = snapshot
            .snapshot_arn
            .as_deref()
            .ok_or_else(|| ExportError::Rejected {
                operation: "CreateDBClusterSnapshot",
                code: None,
                message: format!(
                    "no ARN returned for snapshot {}",
                    snapshot.snapshot_identifier
                ),
            })?;
        let destination = &self.config.destination;

        Ok(ExportTaskRequest::builder()
            .export_task_identifier(snapshot_export_task_identifier(
                &self.config.snapshot_name,
                now,
            ))
            .source_arn(source_arn)
            .s3_bucket_name(destination.s3_bucket_name.as_str())
            .iam_role_arn(destination.iam_role_arn.as_str())
            .maybe_kms_key_id(destination.kms_key_id.clone())
            .maybe_s3_prefix(destination.s3_prefix.clone())
            .build())
    }

    /// Create, wait, export. The first failing step ends the run; a snapshot
    /// that was already created is left in place.
    pub async fn create_and_export(
        &self,
        now: DateTime<Utc>,
    ) -> Result<ExportStarted, ExportError> {
        let snapshot = self.create_snapshot().await?;

        self.control_plane
            .wait_until_available(snapshot.snapshot_identifier.clone(), self.config.wait_timeout)
            .await?;
        info!("Snapshot {} is available", snapshot.snapshot_identifier);

        let request = self.export_request(&snapshot, now)?;
        info!("Starting export task: {:?}", request);

        let ack = self.control_plane.start_export_task(request).await?;

        Ok(ExportStarted {
            export_task_identifier: ack.export_task_identifier,
            status: ack.status,
        })
    }

    pub async fn handle(&self) -> ApiGatewayResponse {
        match self.create_and_export(Utc::now()).await {
            Ok(started) => {
                info!(
                    "Export task {} accepted with status {}",
                    started.export_task_identifier,
                    started.status.as_deref().unwrap_or("unknown")
                );
                ApiGatewayResponse::success(SUCCESS_MESSAGE, &started)
            }
            Err(e) => {
                error!("Error creating or exporting snapshot: {:?}", e);
                ApiGatewayResponse::failure(FAILURE_MESSAGE, &e)
            }
        }
    }
}

pub async fn handle_event<P, C, Fut>(
    event: &Value,
    config: Result<ClusterSnapshotExportConfig, ExportError>,
    connect: C,
) -> ApiGatewayResponse
where
    P: SnapshotControlPlane,
    C: FnOnce() -> Fut,
    Fut: Future<Output = P>,
{
    info!("Received event: {}", event);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ApiGatewayResponse::failure(FAILURE_MESSAGE, &e);
        }
    };

    ClusterSnapshotExportService::new(connect().await, config)
        .handle()
        .await
}
