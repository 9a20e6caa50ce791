use chrono::{DateTime, Local, Utc};
use reqwest::header::HeaderMap;
use std::str::FromStr;

pub const RATE_LIMIT_REMAINING: &str = "rate-limit-remaining";
pub const RATE_LIMIT_TOTAL: &str = "rate-limit-total";
pub const RATE_LIMIT_RESET: &str = "rate-limit-reset";

/// Request quota reported by the server alongside a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests left in the current window.
    pub remaining: u32,
    /// Requests allowed per window.
    pub total: u32,
    /// When the window resets, in UTC.
    pub reset: DateTime<Utc>,
}

impl RateLimitInfo {
    /// Build a snapshot from `Rate-Limit-*` headers.
    ///
    /// All three headers must be present and parse, otherwise `None`; a
    /// partially filled snapshot is never produced.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let remaining = header_num::<u32>(headers, RATE_LIMIT_REMAINING)?;
        let total = header_num::<u32>(headers, RATE_LIMIT_TOTAL)?;
        let epoch = header_num::<u64>(headers, RATE_LIMIT_RESET)?;
        let reset = DateTime::<Utc>::from_timestamp(i64::try_from(epoch).ok()?, 0)?;
        Some(Self {
            remaining,
            total,
            reset,
        })
    }

    /// Reset time in the machine's local zone.
    pub fn reset_local(&self) -> DateTime<Local> {
        self.reset.with_timezone(&Local)
    }
}

fn header_num<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (k, v) in pairs {
            h.insert(*k, v.parse().unwrap());
        }
        h
    }

    #[test]
    fn all_headers_present() {
        let h = headers(&[
            (RATE_LIMIT_REMAINING, "9"),
            (RATE_LIMIT_TOTAL, "10"),
            (RATE_LIMIT_RESET, "1600000000"),
        ]);
        let info = RateLimitInfo::from_headers(&h).unwrap();
        assert_eq!(info.remaining, 9);
        assert_eq!(info.total, 10);
        assert_eq!(info.reset.timestamp(), 1_600_000_000);
        assert_eq!(info.reset_local().timestamp(), 1_600_000_000);
    }

    #[test]
    fn missing_header_is_absent() {
        let h = headers(&[(RATE_LIMIT_REMAINING, "9"), (RATE_LIMIT_RESET, "0")]);
        assert_eq!(RateLimitInfo::from_headers(&h), None);
        assert_eq!(RateLimitInfo::from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn malformed_header_is_absent() {
        let cases = [
            ("abc", "10", "0"),
            ("9", "ten", "0"),
            ("9", "10", "-5"),
            ("-1", "10", "0"),
            ("9", "10", "1.5"),
        ];
        for (remaining, total, reset) in cases {
            let h = headers(&[
                (RATE_LIMIT_REMAINING, remaining),
                (RATE_LIMIT_TOTAL, total),
                (RATE_LIMIT_RESET, reset),
            ]);
            assert_eq!(RateLimitInfo::from_headers(&h), None, "{remaining}/{total}/{reset}");
        }
    }

    #[test]
    fn out_of_range_reset_is_absent() {
        let h = headers(&[
            (RATE_LIMIT_REMAINING, "1"),
            (RATE_LIMIT_TOTAL, "1"),
            (RATE_LIMIT_RESET, "18446744073709551615"),
        ]);
        assert_eq!(RateLimitInfo::from_headers(&h), None);
    }
}
