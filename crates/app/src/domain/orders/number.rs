//! Human-readable order numbers.

use jiff::{Timestamp, tz::TimeZone};

/// Order numbers roll over after this many orders per day prefix.
const SEQUENCE_MODULUS: i64 = 1_000_000;

/// `ORD-YYYYMMDD-NNNNNN` from the UTC date and a sequence value.
#[must_use]
pub fn format_order_number(now: Timestamp, sequence: i64) -> String {
    let date = now.to_zoned(TimeZone::UTC).strftime("%Y%m%d");

    format!("ORD-{date}-{:06}", sequence.rem_euclid(SEQUENCE_MODULUS))
}

/// `ORD-<unix millis>`, used when the sequence cannot be read.
pub(crate) fn fallback_order_number(now: Timestamp) -> String {
    format!("ORD-{}", now.as_millisecond())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formats_date_and_padded_sequence() -> TestResult {
        let now: Timestamp = "2026-03-14T23:59:59Z".parse()?;

        assert_eq!(format_order_number(now, 42), "ORD-20260314-000042");
        assert_eq!(format_order_number(now, 1_000_007), "ORD-20260314-000007");

        Ok(())
    }

    #[test]
    fn fallback_uses_unix_millis() -> TestResult {
        let now: Timestamp = "2026-03-14T00:00:00.5Z".parse()?;

        assert_eq!(fallback_order_number(now), "ORD-1773446400500");

        Ok(())
    }
}
