use chrono::NaiveDate;

use crate::form::CreateForm;
use crate::models::{
    Application, LinkFilter, ListQuery, SortOrder, Stats, Status, total_pages,
};

pub const LOAD_ERROR: &str = "Unable to load applications. Check the API server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Everything that selects which page of records is on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Filters {
    pub query: String,
    pub status: Option<Status>,
    pub link: LinkFilter,
    pub sort_order: SortOrder,
    pub page: u32,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            query: String::new(),
            status: None,
            link: LinkFilter::Any,
            sort_order: SortOrder::Desc,
            page: 1,
        }
    }
}

impl Filters {
    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            q: Some(self.query.trim().to_string()).filter(|q| !q.is_empty()),
            status: self.status,
            has_link: self.link.as_param(),
            sort_order: self.sort_order,
            ..ListQuery::page(self.page)
        }
    }

    pub fn status_label(&self) -> &'static str {
        self.status.map(Status::as_str).unwrap_or("All statuses")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingUndo {
    pub id: i64,
    pub company: String,
    pub token: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// The single owner of dashboard view state. Only `update` mutates it.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub stats: Stats,
    pub applications: Vec<Application>,
    pub total: u64,
    pub load: LoadState,
    pub error: Option<String>,
    pub filters: Filters,
    pub selected: usize,

    pub searching: bool,
    pub search_pending: bool,
    pub form_open: bool,
    pub form: CreateForm,
    pub submitting: bool,
    pub confirm_delete: Option<i64>,
    pub undo: Option<PendingUndo>,
    pub notice: Option<Notice>,
    pub should_quit: bool,

    // Latest issued load; older results are dropped.
    pub(crate) generation: u64,
    pub(crate) search_token: u64,
    pub(crate) undo_token: u64,
}

impl DashboardState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            stats: Stats::default(),
            applications: Vec::new(),
            total: 0,
            load: LoadState::Idle,
            error: None,
            filters: Filters::default(),
            selected: 0,
            searching: false,
            search_pending: false,
            form_open: false,
            form: CreateForm::new(today),
            submitting: false,
            confirm_delete: None,
            undo: None,
            notice: None,
            should_quit: false,
            generation: 0,
            search_token: 0,
            undo_token: 0,
        }
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total)
    }

    pub fn selected_application(&self) -> Option<&Application> {
        self.applications.get(self.selected)
    }

    pub fn application(&self, id: i64) -> Option<&Application> {
        self.applications.iter().find(|app| app.id == id)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_to_query() {
        let filters = Filters {
            query: "  rust ".to_string(),
            status: Some(Status::Interview),
            link: LinkFilter::HasLink,
            sort_order: SortOrder::Asc,
            page: 2,
        };
        let query = filters.to_query();
        assert_eq!(query.q.as_deref(), Some("rust"));
        assert_eq!(query.status, Some(Status::Interview));
        assert_eq!(query.has_link, Some(true));
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset, 10);
    }

    #[test]
    fn test_blank_query_is_omitted() {
        let filters = Filters {
            query: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(filters.to_query().q, None);
        assert_eq!(filters.status_label(), "All statuses");
    }

    #[test]
    fn test_new_state_is_idle_on_first_page() {
        let state = DashboardState::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(state.load, LoadState::Idle);
        assert_eq!(state.filters.page, 1);
        assert_eq!(state.total_pages(), 1);
        assert!(state.selected_application().is_none());
    }
}
