use time::OffsetDateTime;
use time::macros::format_description;

/// Format `datetime` as a two-digit `HH:MM` display timestamp.
pub fn format_timestamp(datetime: OffsetDateTime) -> String {
    datetime
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| format!("{:02}:{:02}", datetime.hour(), datetime.minute()))
}

/// The current local time as an `HH:MM` display timestamp.
///
/// Falls back to UTC when the local offset cannot be determined.
pub fn display_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_timestamp(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn formats_hours_and_minutes() {
        assert_eq!(format_timestamp(datetime!(2025-03-01 09:05 UTC)), "09:05");
        assert_eq!(format_timestamp(datetime!(2025-03-01 23:59:59 UTC)), "23:59");
    }

    #[test]
    fn display_timestamp_shape() {
        let stamp = display_timestamp();
        assert_eq!(stamp.len(), 5);
        assert_eq!(&stamp[2..3], ":");
    }
}
