//! Tools dimension builder.

use std::collections::HashSet;

use etl_core::{RawEvent, ToolKey};
use tracing::debug;
use warehouse::insert::ToolRow;

/// Dashboard metadata for the tools the platform ships. Unmapped tool
/// names get generic defaults.
fn tool_metadata(name: &str) -> (&'static str, i32, String) {
    match name {
        "merge" => ("merge", 1, "Combine multiple PDF files into one".into()),
        "nup" => ("grid", 2, "Multiple pages per sheet layout".into()),
        "compressor" => ("compress", 3, "Reduce PDF file size".into()),
        "split" => ("split", 4, "Split PDF into separate pages".into()),
        "pdf_bw" => ("palette", 5, "Convert PDF to black and white".into()),
        "page_remover" => ("delete", 6, "Remove specific pages from PDF".into()),
        "homepage" => ("home", 99, "Main website landing page".into()),
        _ => ("tool", 50, format!("{name} tool")),
    }
}

/// `page_remover` -> `Page Remover`.
fn display_name(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Builds the tools dimension: one row per distinct tool name, in first
/// appearance order. Rows with a null tool name are skipped; the first
/// category seen for a tool wins.
pub fn build_tools(events: &[RawEvent]) -> Vec<ToolRow> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for event in events {
        let Some(name) = event.tool_name.as_deref() else {
            continue;
        };
        if !seen.insert(name.to_string()) {
            continue;
        }

        let (icon, sort, description) = tool_metadata(name);
        rows.push(ToolRow {
            tool_key: ToolKey::new(name).to_string(),
            tool_name: name.to_string(),
            tool_category: event.tool_category.clone(),
            tool_display_name: display_name(name),
            tool_description: description,
            is_active: true,
            icon_name: icon.to_string(),
            sort_order: sort,
        });
    }

    debug!(rows = rows.len(), "built tools dimension");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn event(tool: Option<&str>, category: Option<&str>) -> RawEvent {
        RawEvent {
            event_id: "e".into(),
            user_id: None,
            url: None,
            event_type: None,
            tool_name: tool.map(Into::into),
            tool_category: category.map(Into::into),
            date: None,
            hour: None,
            session_id: None,
            properties: None,
            timestamp: None,
        }
    }

    #[test]
    fn dedupes_on_tool_name() {
        let events = vec![
            event(Some("merge"), Some("pdf")),
            event(Some("merge"), Some("pdf")),
            event(Some("split"), Some("pdf")),
        ];
        let rows = build_tools(&events);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tool_key, "tool_merge");
        assert_eq!(rows[1].tool_key, "tool_split");
    }

    #[test]
    fn skips_null_tool_names() {
        let events = vec![event(None, Some("pdf")), event(Some("merge"), None)];
        assert_eq!(build_tools(&events).len(), 1);
    }

    #[test]
    fn known_tools_get_curated_metadata() {
        let rows = build_tools(&[event(Some("compressor"), None)]);
        assert_eq!(rows[0].icon_name, "compress");
        assert_eq!(rows[0].sort_order, 3);
        assert_eq!(rows[0].tool_description, "Reduce PDF file size");
    }

    #[test]
    fn unknown_tools_get_defaults() {
        let rows = build_tools(&[event(Some("ocr"), None)]);
        assert_eq!(rows[0].icon_name, "tool");
        assert_eq!(rows[0].sort_order, 50);
        assert_eq!(rows[0].tool_description, "ocr tool");
    }

    #[test]
    fn display_name_title_cases_underscores() {
        assert_eq!(display_name("page_remover"), "Page Remover");
        assert_eq!(display_name("pdf_bw"), "Pdf Bw");
        assert_eq!(display_name("merge"), "Merge");
    }
}
