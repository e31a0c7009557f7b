use ratatui::widgets::ListState;

use crate::feed::{Applied, FeedLoader, PageRequest, ALL_CATEGORY};
use crate::fetch::FetchMsg;
use crate::identity::Identity;
use crate::source::BlogSummary;

/// How close (in rows) the selection must get to the end of the list before
/// the next page is requested.
pub const PREFETCH_MARGIN: usize = 3;

pub struct App {
    /// Paginated blog list for the active category.
    pub feed: FeedLoader,
    /// Navigable categories; `"all"` is always first.
    pub categories: Vec<String>,
    /// Index into `categories` of the active category.
    pub category_index: usize,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the detail pane for the selected blog is open.
    pub show_detail: bool,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    /// Page requests waiting to be dispatched by the main loop.
    outbox: Vec<PageRequest>,
}

impl App {
    pub fn new(categories: &[String], category: &str, identity: Identity) -> Self {
        let mut all = vec![ALL_CATEGORY.to_string()];
        for c in categories {
            let c = c.trim();
            if !c.is_empty() && !all.iter().any(|known| known == c) {
                all.push(c.to_string());
            }
        }
        let category_index = match all.iter().position(|c| c == category) {
            Some(i) => i,
            None => {
                all.push(category.to_string());
                all.len() - 1
            }
        };

        Self {
            feed: FeedLoader::new(all[category_index].clone(), identity),
            categories: all,
            category_index,
            list_state: ListState::default(),
            show_detail: false,
            quit: false,
            status: "Starting…".into(),
            outbox: Vec::new(),
        }
    }

    /// Start the first feed session.  Nothing is fetched until the identity
    /// has finished loading.
    pub fn start(&mut self) {
        let request = self.feed.reset();
        self.queue(request);
    }

    /// Drain the page requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<PageRequest> {
        std::mem::take(&mut self.outbox)
    }

    fn queue(&mut self, request: Option<PageRequest>) {
        if let Some(request) = request {
            self.status = format!("Loading page {}…", request.page);
            self.outbox.push(request);
        }
    }

    pub fn items(&self) -> &[BlogSummary] {
        self.feed.items()
    }

    pub fn selected_blog(&self) -> Option<&BlogSummary> {
        self.list_state.selected().and_then(|i| self.items().get(i))
    }

    pub fn active_category(&self) -> &str {
        self.feed.category()
    }

    // -- background messages -------------------------------------------------

    pub fn handle_fetch_msg(&mut self, msg: FetchMsg) {
        match msg {
            FetchMsg::Page(result) => match self.feed.apply(result) {
                Applied::Appended { count, exhausted: false } => {
                    self.status = format!("Loaded {count} blogs");
                }
                Applied::Appended { exhausted: true, .. } => {
                    self.status = "You're all caught up".into();
                }
                Applied::Failed => {
                    self.status = "Could not load more blogs".into();
                }
                Applied::Stale => {}
            },
            FetchMsg::Identity(identity) => {
                let request = self.feed.set_identity(identity);
                if request.is_some() {
                    self.reset_selection();
                }
                self.queue(request);
            }
        }
    }

    // -- scroll trigger ------------------------------------------------------

    /// Request the next page when the selection is near the end of the list
    /// and more pages exist.
    pub fn on_scroll(&mut self) {
        let len = self.items().len();
        if len == 0 || !self.feed.has_more() {
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        if selected + PREFETCH_MARGIN >= len {
            let request = self.feed.fetch_next_page();
            self.queue(request);
        }
    }

    // -- categories ----------------------------------------------------------

    pub fn next_category(&mut self) {
        let i = (self.category_index + 1) % self.categories.len();
        self.switch_category(i);
    }

    pub fn previous_category(&mut self) {
        let len = self.categories.len();
        let i = (self.category_index + len - 1) % len;
        self.switch_category(i);
    }

    fn switch_category(&mut self, index: usize) {
        if index == self.category_index {
            return;
        }
        self.category_index = index;
        let category = self.categories[index].clone();
        self.reset_selection();
        let request = self.feed.reset_for_category(category);
        self.queue(request);
    }

    /// Drop everything loaded for this category and start over.
    pub fn refresh(&mut self) {
        self.reset_selection();
        let request = self.feed.reset();
        self.queue(request);
    }

    fn reset_selection(&mut self) {
        self.list_state.select(None);
        self.show_detail = false;
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail && self.selected_blog().is_some();
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.items().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.items().len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
        self.on_scroll();
    }

    pub fn select_previous(&mut self) {
        if self.items().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.items().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.items().is_empty() {
            self.list_state.select(Some(self.items().len() - 1));
            self.on_scroll();
        }
    }
}
