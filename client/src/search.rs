//! Dashboard filter state bound to the URL query, and the search debouncer.

use std::time::Duration;

use tokio::time::Instant;

use crate::types::{TripListParams, TripStatus};

/// Delay between the last keystroke and the search being applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

pub const DASHBOARD_PAGE_SIZE: u64 = 10;

/// Status tabs of the trips page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusTab {
    #[default]
    Scheduled,
    InTransit,
    Delivered,
    Cancelled,
    All,
}

impl StatusTab {
    pub const ALL: [StatusTab; 5] = [
        StatusTab::Scheduled,
        StatusTab::InTransit,
        StatusTab::Delivered,
        StatusTab::Cancelled,
        StatusTab::All,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InTransit => "in-transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::All => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Programados",
            Self::InTransit => "En Tránsito",
            Self::Delivered => "Entregados",
            Self::Cancelled => "Cancelados",
            Self::All => "Todos",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }

    /// Status filter sent to the API; `None` for the "all" tab.
    pub fn status(self) -> Option<TripStatus> {
        match self {
            Self::Scheduled => Some(TripStatus::Scheduled),
            Self::InTransit => Some(TripStatus::InTransit),
            Self::Delivered => Some(TripStatus::Delivered),
            Self::Cancelled => Some(TripStatus::Cancelled),
            Self::All => None,
        }
    }
}

/// Tab, search term and page of the trips page, as carried in the URL
/// (`?tab=in-transit&q=nafta&page=2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardQuery {
    tab: StatusTab,
    search: Option<String>,
    page: u64,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            tab: StatusTab::default(),
            search: None,
            page: 1,
        }
    }
}

impl DashboardQuery {
    /// Lenient parse: unknown tabs, blank searches and bad page numbers fall
    /// back to the defaults.
    pub fn from_query_string(query: &str) -> Self {
        let mut state = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "tab" => state.tab = StatusTab::from_slug(&value).unwrap_or_default(),
                "q" => state.search = normalize_search(&value),
                "page" => state.page = value.parse().ok().filter(|p| *p > 0).unwrap_or(1),
                _ => {}
            }
        }
        state
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if self.tab != StatusTab::default() {
            serializer.append_pair("tab", self.tab.slug());
        }
        if let Some(q) = &self.search {
            serializer.append_pair("q", q);
        }
        if self.page > 1 {
            serializer.append_pair("page", &self.page.to_string());
        }
        serializer.finish()
    }

    pub fn tab(&self) -> StatusTab {
        self.tab
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    /// Switching tabs goes back to the first page.
    pub fn set_tab(&mut self, tab: StatusTab) {
        if self.tab != tab {
            self.tab = tab;
            self.page = 1;
        }
    }

    /// A changed search term goes back to the first page.
    pub fn set_search(&mut self, term: &str) {
        let term = normalize_search(term);
        if self.search != term {
            self.search = term;
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: u64) {
        self.page = page.max(1);
    }

    pub fn to_list_params(&self) -> TripListParams {
        TripListParams {
            page: Some(self.page),
            limit: Some(DASHBOARD_PAGE_SIZE),
            search: self.search.clone(),
            status: self.tab.status().map(|s| s.as_str().to_string()),
            ..Default::default()
        }
    }
}

fn normalize_search(term: &str) -> Option<String> {
    let term = term.trim();
    (!term.is_empty()).then(|| term.to_string())
}

/// Debounces search input.
///
/// Each keystroke restarts the delay; the term is committed once the input
/// has been quiet for the full delay. Enter commits at once and Escape clears.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    input: String,
    deadline: Option<Instant>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            input: String::new(),
            deadline: None,
        }
    }

    /// Current (uncommitted) input text.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Record a keystroke and restart the delay.
    pub fn on_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Enter: commit immediately.
    pub fn flush(&mut self) -> Option<String> {
        self.deadline = None;
        normalize_search(&self.input)
    }

    /// Escape: drop the input and any pending commit. Returns the committed
    /// term, which is always `None`.
    pub fn clear(&mut self) -> Option<String> {
        self.input.clear();
        self.deadline = None;
        None
    }

    /// The committed term if the delay has elapsed, without waiting.
    pub fn take_due(&mut self) -> Option<Option<String>> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(self.flush()),
            _ => None,
        }
    }

    /// Wait until the pending input settles and return the committed term.
    /// Returns `None` straight away when nothing is pending.
    pub async fn settled(&mut self) -> Option<Option<String>> {
        let deadline = self.deadline?;
        tokio::time::sleep_until(deadline).await;
        Some(self.flush())
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}
