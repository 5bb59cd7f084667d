use std::time::Duration;

use crate::error::ExportError;

pub const SOURCE_ARN: &str = "SOURCE_ARN";
pub const DB_CLUSTER_IDENTIFIER: &str = "DB_CLUSTER_IDENTIFIER";
pub const SNAPSHOT_NAME: &str = "SNAPSHOT_NAME";
pub const S3_BUCKET_NAME: &str = "S3_BUCKET_NAME";
pub const IAM_ROLE_ARN: &str = "IAM_ROLE_ARN";
pub const KMS_KEY_ID: &str = "KMS_KEY_ID";
pub const S3_PREFIX: &str = "S3_PREFIX";
pub const SNAPSHOT_WAIT_TIMEOUT_SECONDS: &str = "SNAPSHOT_WAIT_TIMEOUT_SECONDS";

/// Upper bound on how long the cluster snapshot may take to become available.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(600);

/// Where and how the export is written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDestination {
    pub s3_bucket_name: String,
    pub iam_role_arn: String,
    pub kms_key_id: Option<String>,
    pub s3_prefix: Option<String>,
}

/// Settings for exporting a snapshot that already exists.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotExportConfig {
    pub source_arn: String,
    pub destination: ExportDestination,
}

/// Settings for snapshotting a cluster and exporting the result.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSnapshotExportConfig {
    pub db_cluster_identifier: String,
    pub snapshot_name: String,
    pub destination: ExportDestination,
    pub wait_timeout: Duration,
}

impl ExportDestination {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ExportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            s3_bucket_name: required(lookup, S3_BUCKET_NAME)?,
            iam_role_arn: required(lookup, IAM_ROLE_ARN)?,
            kms_key_id: optional(lookup, KMS_KEY_ID),
            s3_prefix: optional(lookup, S3_PREFIX),
        })
    }
}

impl SnapshotExportConfig {
    pub fn from_env() -> Result<Self, ExportError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            source_arn: required(&lookup, SOURCE_ARN)?,
            destination: ExportDestination::from_lookup(&lookup)?,
        })
    }
}

impl ClusterSnapshotExportConfig {
    pub fn from_env() -> Result<Self, ExportError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let wait_timeout = match optional(&lookup, SNAPSHOT_WAIT_TIMEOUT_SECONDS) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_WAIT_TIMEOUT,
        };

        Ok(Self {
            db_cluster_identifier: required(&lookup, DB_CLUSTER_IDENTIFIER)?,
            snapshot_name: required(&lookup, SNAPSHOT_NAME)?,
            destination: ExportDestination::from_lookup(&lookup)?,
            wait_timeout,
        })
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ExportError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or(ExportError::MissingConfig(name))
}

// Blank values count as unset.
fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_timeout(raw: &str) -> Result<Duration, ExportError> {
    match raw.parse::<u64>() {
        Ok(0) => Err(ExportError::InvalidConfig {
            name: SNAPSHOT_WAIT_TIMEOUT_SECONDS,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(seconds) => Ok(Duration::from_secs(seconds)),
        Err(e) => Err(ExportError::InvalidConfig {
            name: SNAPSHOT_WAIT_TIMEOUT_SECONDS,
            reason: e.to_string(),
        }),
    }
}
