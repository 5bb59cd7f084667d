use std::future::Future;

use chrono::{DateTime, Utc};
use export_common::identifiers::timestamped_export_task_identifier;
use export_common::{
    ApiGatewayResponse, ExportError, ExportStarted, ExportTaskRequest, SnapshotControlPlane,
    SnapshotExportConfig,
};
use serde_json::Value;
use tracing::{error, info};

pub const SUCCESS_MESSAGE: &str = "Snapshot export task started successfully";
pub const FAILURE_MESSAGE: &str = "Failed to start snapshot export task";

/// Starts an export task for a snapshot that already exists.
pub struct SnapshotExportService<P> {
    control_plane: P,
    config: SnapshotExportConfig,
}

impl<P: SnapshotControlPlane> SnapshotExportService<P> {
    pub fn new(control_plane: P, config: SnapshotExportConfig) -> Self {
        Self {
            control_plane,
            config,
        }
    }

    pub fn export_request(&self, now: DateTime<Utc>) -> ExportTaskRequest {
        let destination = &self.config.destination;

        ExportTaskRequest::builder()
            .export_task_identifier(timestamped_export_task_identifier(now))
            .source_arn(self.config.source_arn.as_str())
            .s3_bucket_name(destination.s3_bucket_name.as_str())
            .iam_role_arn(destination.iam_role_arn.as_str())
            .maybe_kms_key_id(destination.kms_key_id.clone())
            .maybe_s3_prefix(destination.s3_prefix.clone())
            .build()
    }

    pub async fn start_export(&self, now: DateTime<Utc>) -> Result<ExportStarted, ExportError> {
        let request = self.export_request(now);
        info!("Starting export task: {:?}", request);

        let ack = self.control_plane.start_export_task(request).await?;

        Ok(ExportStarted {
            export_task_identifier: ack.export_task_identifier,
            status: ack.status,
        })
    }

    /// Runs one invocation. Failures become a 500 envelope rather than an `Err`.
    pub async fn handle(&self) -> ApiGatewayResponse {
        match self.start_export(Utc::now()).await {
            Ok(started) => {
                info!(
                    "Export task {} accepted with status {}",
                    started.export_task_identifier,
                    started.status.as_deref().unwrap_or("unknown")
                );
                ApiGatewayResponse::success(SUCCESS_MESSAGE, &started)
            }
            Err(e) => {
                error!("Error starting export task: {:?}", e);
                ApiGatewayResponse::failure(FAILURE_MESSAGE, &e)
            }
        }
    }
}

/// Entry point shared by the Lambda binary and the tests. `connect` is only
/// awaited once the configuration has been validated.
pub async fn handle_event<P, C, Fut>(
    event: &Value,
    config: Result<SnapshotExportConfig, ExportError>,
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

    SnapshotExportService::new(connect().await, config)
        .handle()
        .await
}
