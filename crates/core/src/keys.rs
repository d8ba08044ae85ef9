//! Typed surrogate keys for the star schema.
//!
//! Keys are composite values internally and serialize to their storage
//! string form only at the warehouse boundary. Keeping them typed avoids
//! collision bugs from naive concatenation (a tool name containing an
//! underscore can't bleed into the date part of a time key, because the
//! two never share a namespace).

use std::fmt;

use chrono::NaiveDate;

/// Surrogate key for `dim_tools`, derived from the tool name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolKey(String);

impl ToolKey {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self(tool_name.into())
    }

    pub fn tool_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tool_{}", self.0)
    }
}

/// Surrogate key for `dim_time`: one slot per (date, hour) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeKey {
    pub date: NaiveDate,
    pub hour: u8,
}

impl TimeKey {
    pub fn new(date: NaiveDate, hour: u8) -> Self {
        Self { date, hour }
    }

    /// Parses the storage form back into its components.
    ///
    /// The hour is the suffix after the last underscore; the date part
    /// never contains one.
    pub fn parse(key: &str) -> Option<Self> {
        let (date, hour) = key.rsplit_once('_')?;
        Some(Self {
            date: date.parse().ok()?,
            hour: hour.parse().ok()?,
        })
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{:02}", self.date, self.hour)
    }
}

/// Surrogate key for `dim_sessions`, derived from the session id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self(session_id.into())
    }

    pub fn session_id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session_{}", self.0)
    }
}

/// Surrogate key for `fact_daily_kpis`: one row per (date, tool) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KpiKey {
    pub date: NaiveDate,
    pub tool_name: String,
}

impl KpiKey {
    pub fn new(date: NaiveDate, tool_name: impl Into<String>) -> Self {
        Self {
            date,
            tool_name: tool_name.into(),
        }
    }
}

impl fmt::Display for KpiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.date, self.tool_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn tool_key_storage_form() {
        assert_eq!(ToolKey::new("merge").to_string(), "tool_merge");
        assert_eq!(ToolKey::new("page_remover").to_string(), "tool_page_remover");
    }

    #[test]
    fn time_key_zero_pads_hour() {
        let key = TimeKey::new(date("2025-07-25"), 9);
        assert_eq!(key.to_string(), "2025-07-25_09");
    }

    #[test]
    fn time_key_round_trips() {
        for hour in 0..24 {
            let key = TimeKey::new(date("2025-07-25"), hour);
            assert_eq!(TimeKey::parse(&key.to_string()), Some(key));
        }
    }

    #[test]
    fn time_key_parse_rejects_garbage() {
        assert_eq!(TimeKey::parse("2025-07-25"), None);
        assert_eq!(TimeKey::parse("not-a-date_10"), None);
        assert_eq!(TimeKey::parse("2025-07-25_xx"), None);
    }

    #[test]
    fn session_key_storage_form() {
        assert_eq!(SessionKey::new("s1").to_string(), "session_s1");
    }

    #[test]
    fn kpi_key_storage_form() {
        let key = KpiKey::new(date("2025-07-25"), "merge");
        assert_eq!(key.to_string(), "2025-07-25_merge");
    }
}
