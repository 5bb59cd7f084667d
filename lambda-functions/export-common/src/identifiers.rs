use chrono::{DateTime, SecondsFormat, Utc};

const TIMESTAMPED_PREFIX: &str = "snapshot";

/// Export task name for a pre-existing snapshot: `snapshot` followed by the
/// 14 digits of the UTC timestamp, e.g. `snapshot20250115102030`.
pub fn timestamped_export_task_identifier(now: DateTime<Utc>) -> String {
    let digits: String = now
        .to_rfc3339_opts(SecondsFormat::Secs, true)
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    format!("{}{}", TIMESTAMPED_PREFIX, digits)
}

/// Export task name for a freshly created snapshot:
/// `<snapshot_name>-export-<epoch millis>`.
pub fn snapshot_export_task_identifier(snapshot_name: &str, now: DateTime<Utc>) -> String {
    format!("{}-export-{}", snapshot_name, now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_timestamped_identifier_format() {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 10, 20, 30).unwrap();
        assert_eq!(
            timestamped_export_task_identifier(now),
            "snapshot20250115102030"
        );
    }

    #[test]
    fn test_timestamped_identifier_drops_subsecond_precision() {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 10, 20, 30).unwrap()
            + Duration::milliseconds(987);
        let id = timestamped_export_task_identifier(now);

        assert_eq!(id.len(), "snapshot".len() + 14);
        assert!(id["snapshot".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_timestamped_identifiers_differ_one_second_apart() {
        let first = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        let second = first + Duration::seconds(1);

        assert_ne!(
            timestamped_export_task_identifier(first),
            timestamped_export_task_identifier(second)
        );
        assert_eq!(
            timestamped_export_task_identifier(second),
            "snapshot20260101000000"
        );
    }

    #[test]
    fn test_snapshot_identifier_format() {
        let now = Utc.timestamp_millis_opt(1_736_936_430_123).unwrap();
        assert_eq!(
            snapshot_export_task_identifier("snap1", now),
            "snap1-export-1736936430123"
        );
    }

    #[test]
    fn test_snapshot_identifiers_differ_by_millisecond() {
        let now = Utc.timestamp_millis_opt(1_736_936_430_123).unwrap();
        let later = now + Duration::milliseconds(1);

        assert_ne!(
            snapshot_export_task_identifier("nightly", now),
            snapshot_export_task_identifier("nightly", later)
        );
    }
}
