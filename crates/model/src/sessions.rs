//! Sessions dimension builder with user-agent derivation.
//!
//! Events are grouped by session id, taking the earliest timestamp and
//! the first non-null properties payload per group. A malformed payload
//! never drops the session: the row is still emitted with Unknown
//! derived fields.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use etl_core::{EventProperties, RawEvent, SessionKey};
use tracing::debug;
use warehouse::insert::SessionRow;

#[derive(Default)]
struct SessionGroup<'a> {
    start: Option<DateTime<Utc>>,
    properties: Option<&'a str>,
}

/// Browser from ordered substring matches. Chrome ships a Safari token,
/// so the Chrome check must run first.
fn browser(user_agent: &str) -> &'static str {
    if user_agent.contains("Chrome") && user_agent.contains("Safari") {
        "Chrome"
    } else if user_agent.contains("Safari") && !user_agent.contains("Chrome") {
        "Safari"
    } else if user_agent.contains("Firefox") {
        "Firefox"
    } else {
        "Unknown"
    }
}

fn operating_system(user_agent: &str) -> &'static str {
    if user_agent.contains("Windows") {
        "Windows"
    } else if user_agent.contains("Mac") {
        "macOS"
    } else if user_agent.contains("iPhone") {
        "iOS"
    } else if user_agent.contains("Android") {
        "Android"
    } else {
        "Unknown"
    }
}

fn device_type(user_agent: &str) -> &'static str {
    if ["iPhone", "Android", "Mobile"]
        .iter()
        .any(|token| user_agent.contains(token))
    {
        "Mobile"
    } else {
        "Desktop"
    }
}

/// Builds the sessions dimension: one row per distinct session id, in
/// session-id order. Rows with a null session id are skipped.
pub fn build_sessions(events: &[RawEvent]) -> Vec<SessionRow> {
    let mut groups: BTreeMap<&str, SessionGroup> = BTreeMap::new();

    for event in events {
        let Some(id) = event.session_id.as_deref() else {
            continue;
        };
        let group = groups.entry(id).or_default();

        if let Some(ts) = event.timestamp {
            group.start = Some(group.start.map_or(ts, |current| current.min(ts)));
        }
        if group.properties.is_none() {
            group.properties = event.properties.as_deref();
        }
    }

    let rows: Vec<SessionRow> = groups
        .into_iter()
        .map(|(id, group)| {
            // No payload at all is a normal session; a payload that fails
            // to parse downgrades the derived fields to Unknown.
            let parsed = match group.properties {
                None => Some(EventProperties::default()),
                Some(raw) => EventProperties::parse(raw),
            };

            match parsed {
                Some(props) => {
                    let user_agent = props.user_agent.unwrap_or_default();
                    SessionRow {
                        session_key: SessionKey::new(id).to_string(),
                        session_id: id.to_string(),
                        browser: browser(&user_agent).to_string(),
                        operating_system: operating_system(&user_agent).to_string(),
                        device_type: device_type(&user_agent).to_string(),
                        language: props.language.unwrap_or_default(),
                        referrer: props.referrer.unwrap_or_default(),
                        session_start: group.start,
                        user_agent,
                    }
                }
                None => SessionRow {
                    session_key: SessionKey::new(id).to_string(),
                    session_id: id.to_string(),
                    user_agent: String::new(),
                    browser: "Unknown".to_string(),
                    operating_system: "Unknown".to_string(),
                    device_type: "Unknown".to_string(),
                    language: String::new(),
                    referrer: String::new(),
                    session_start: group.start,
                },
            }
        })
        .collect();

    debug!(rows = rows.len(), "built sessions dimension");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                             (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
                                    AppleWebKit/605.1.15 Version/17.0 Mobile/15E148 Safari/604.1";
    const FIREFOX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn event(session: Option<&str>, timestamp: Option<&str>, properties: Option<&str>) -> RawEvent {
        RawEvent {
            event_id: "e".into(),
            user_id: None,
            url: None,
            event_type: None,
            tool_name: None,
            tool_category: None,
            date: None,
            hour: None,
            session_id: session.map(Into::into),
            properties: properties.map(Into::into),
            timestamp: timestamp.map(ts),
        }
    }

    #[test]
    fn browser_matching_is_ordered() {
        assert_eq!(browser(CHROME_UA), "Chrome");
        assert_eq!(browser(SAFARI_IPHONE_UA), "Safari");
        assert_eq!(browser(FIREFOX_UA), "Firefox");
        assert_eq!(browser("curl/8.0"), "Unknown");
    }

    #[test]
    fn os_and_device_derivation() {
        assert_eq!(operating_system(CHROME_UA), "Windows");
        assert_eq!(operating_system(SAFARI_IPHONE_UA), "iOS");
        assert_eq!(device_type(CHROME_UA), "Desktop");
        assert_eq!(device_type(SAFARI_IPHONE_UA), "Mobile");
        assert_eq!(device_type("something Android something"), "Mobile");
    }

    #[test]
    fn groups_take_earliest_timestamp_and_first_payload() {
        let props = format!("{{'user_agent': '{CHROME_UA}', 'language': 'en-US'}}");
        let events = vec![
            event(Some("s1"), Some("2025-07-25T11:00:00Z"), None),
            event(Some("s1"), Some("2025-07-25T10:00:00Z"), Some(&props)),
        ];

        let rows = build_sessions(&events);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].session_key, "session_s1");
        assert_eq!(rows[0].session_start, Some(ts("2025-07-25T10:00:00Z")));
        assert_eq!(rows[0].browser, "Chrome");
        assert_eq!(rows[0].language, "en-US");
    }

    #[test]
    fn one_row_per_session_id() {
        let events = vec![
            event(Some("s1"), None, None),
            event(Some("s2"), None, None),
            event(Some("s1"), None, None),
            event(None, None, None),
        ];
        let rows = build_sessions(&events);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn malformed_payload_still_emits_row() {
        let events = vec![event(Some("s1"), Some("2025-07-25T10:00:00Z"), Some("{{{"))];
        let rows = build_sessions(&events);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].browser, "Unknown");
        assert_eq!(rows[0].device_type, "Unknown");
        assert_eq!(rows[0].session_start, Some(ts("2025-07-25T10:00:00Z")));
    }

    #[test]
    fn absent_payload_defaults_to_desktop() {
        let rows = build_sessions(&[event(Some("s1"), None, None)]);
        assert_eq!(rows[0].browser, "Unknown");
        assert_eq!(rows[0].device_type, "Desktop");
        assert_eq!(rows[0].session_start, None);
    }
}
