//! The closed set of event kinds the warehouse models.

/// Canonical event kinds tracked by the star schema.
///
/// The set is closed: `parse` returns `None` for anything else, and the
/// caller decides the fallback policy. The detail-fact builder maps
/// unknown names to `PageView`; see `star_model::facts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PageView,
    FileUploadStarted,
    ProcessingStarted,
    FileDownloaded,
    SessionEnd,
    ErrorOccurred,
}

impl EventKind {
    /// All kinds, in reference-table order.
    pub const ALL: [EventKind; 6] = [
        Self::PageView,
        Self::FileUploadStarted,
        Self::ProcessingStarted,
        Self::FileDownloaded,
        Self::SessionEnd,
        Self::ErrorOccurred,
    ];

    /// Parses a source event-type name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "page_view" => Some(Self::PageView),
            "file_upload_started" => Some(Self::FileUploadStarted),
            "processing_started" => Some(Self::ProcessingStarted),
            "file_downloaded" => Some(Self::FileDownloaded),
            "session_end" => Some(Self::SessionEnd),
            "error_occurred" => Some(Self::ErrorOccurred),
            _ => None,
        }
    }

    /// The canonical event-type name as it appears in source rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageView => "page_view",
            Self::FileUploadStarted => "file_upload_started",
            Self::ProcessingStarted => "processing_started",
            Self::FileDownloaded => "file_downloaded",
            Self::SessionEnd => "session_end",
            Self::ErrorOccurred => "error_occurred",
        }
    }

    /// The surrogate key used in `dim_event_types` and `fact_analytics`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::PageView => "evt_page_view",
            Self::FileUploadStarted => "evt_file_upload",
            Self::ProcessingStarted => "evt_processing",
            Self::FileDownloaded => "evt_download",
            Self::SessionEnd => "evt_session_end",
            Self::ErrorOccurred => "evt_error",
        }
    }
}
