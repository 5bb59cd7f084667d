use cluster_snapshot_export::handle_event;
use export_common::{ApiGatewayResponse, ClusterSnapshotExportConfig, RdsControlPlane};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn function_handler(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let config = ClusterSnapshotExportConfig::from_env();

    Ok(handle_event(&event.payload, config, RdsControlPlane::from_env).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    run(service_fn(function_handler)).await
}
