use chrono::DateTime;

/// Converts an RFC 3339 timestamp into epoch milliseconds.
///
/// The backend reports dates as ISO strings (`2022-08-30T14:00:00.000Z`);
/// clients get a uniform numeric representation instead. Absent or
/// unparseable input yields `None`.
pub fn epoch_ms(value: Option<&str>) -> Option<i64> {
    value
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.timestamp_millis())
}
