//! The feed loader: paginated, append-only blog list for one category.
//!
//! [`FeedLoader`] is a pure state machine.  It never performs I/O; instead it
//! hands out [`PageRequest`]s for the caller to run (see [`crate::fetch`])
//! and consumes the matching [`PageResult`]s.
//!
//! ```text
//!            reset / category / identity change
//!   ┌──────────────────────────────────────────────────────┐
//!   ▼                                                      │
//! Idle ──fetch──► Loading ──full page──► HasMore ──scroll──┘► Loading
//!                    │
//!                    └──error / short page──► Exhausted (terminal until reset)
//! ```
//!
//! Every reset bumps a generation counter.  Requests carry the generation
//! they were issued under, and results from an older generation are dropped,
//! so a slow response for the previous category can never leak into the new
//! list.  At most one request is in flight per generation.
//!
//! A reset clears the list *before* issuing the first request of the new
//! session, so the first page of the new session is always kept.

use crate::identity::Identity;
use crate::source::{BlogSummary, FetchError, UserId};

/// Number of blogs requested per page.
pub const PAGE_SIZE: u32 = 10;

/// Category sentinel meaning "no filter" (or "recommended" when signed in).
pub const ALL_CATEGORY: &str = "all";

/// Which source operation a request should use.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BlogQuery {
    Recommended(UserId),
    Category(String),
}

impl BlogQuery {
    /// `"all"` plus a known user selects recommendations; anything else,
    /// including `"all"` for a guest, is passed through as a category.
    pub fn select(category: &str, user: Option<&UserId>) -> Self {
        match user {
            Some(user) if category == ALL_CATEGORY => BlogQuery::Recommended(user.clone()),
            _ => BlogQuery::Category(category.to_string()),
        }
    }
}

/// One page to fetch, tagged with the session it belongs to.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PageRequest {
    pub generation: u64,
    pub query: BlogQuery,
    pub page: u32,
    pub limit: u32,
}

/// The outcome of running a [`PageRequest`].
#[derive(Debug)]
pub struct PageResult {
    pub request: PageRequest,
    pub outcome: Result<Vec<BlogSummary>, FetchError>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    Idle,
    Loading,
    HasMore,
    Exhausted,
}

/// What [`FeedLoader::apply`] did with a result.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Applied {
    /// Items were appended; `exhausted` is set when the page was short.
    Appended { count: usize, exhausted: bool },
    /// The fetch failed; the feed is now exhausted.
    Failed,
    /// The result belonged to an earlier session and was ignored.
    Stale,
}

pub struct FeedLoader {
    category: String,
    identity: Identity,
    items: Vec<BlogSummary>,
    /// Next page to request, starting at 1.
    page: u32,
    exhausted: bool,
    generation: u64,
    /// Page number of the request currently running, if any.
    in_flight: Option<u32>,
}

impl FeedLoader {
    /// Create an idle loader.  Call [`reset`](Self::reset) to issue the first
    /// request.
    pub fn new(category: impl Into<String>, identity: Identity) -> Self {
        Self {
            category: category.into(),
            identity,
            items: Vec::new(),
            page: 1,
            exhausted: false,
            generation: 0,
            in_flight: None,
        }
    }

    // -- accessors -----------------------------------------------------------

    pub fn items(&self) -> &[BlogSummary] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Inverse of the exhaustion flag; what the scroll trigger consults.
    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Loading
        } else if self.exhausted {
            Phase::Exhausted
        } else if self.page == 1 {
            Phase::Idle
        } else {
            Phase::HasMore
        }
    }

    // -- transitions ---------------------------------------------------------

    /// Request the page at the cursor, unless the identity is still loading,
    /// the feed is exhausted, or a request is already running.
    pub fn fetch_next_page(&mut self) -> Option<PageRequest> {
        if self.identity.loading || self.exhausted || self.in_flight.is_some() {
            return None;
        }

        let request = PageRequest {
            generation: self.generation,
            query: BlogQuery::select(&self.category, self.identity.user()),
            page: self.page,
            limit: PAGE_SIZE,
        };
        self.in_flight = Some(self.page);
        tracing::debug!(
            generation = request.generation,
            page = request.page,
            query = ?request.query,
            "issuing page request"
        );
        Some(request)
    }

    /// Fold a finished request into the feed.
    pub fn apply(&mut self, result: PageResult) -> Applied {
        let PageResult { request, outcome } = result;

        if request.generation != self.generation || self.in_flight != Some(request.page) {
            tracing::debug!(
                generation = request.generation,
                current = self.generation,
                page = request.page,
                "dropping stale page result"
            );
            return Applied::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(blogs) => {
                let count = blogs.len();
                let exhausted = count < request.limit as usize;
                self.items.extend(blogs);
                self.page += 1;
                if exhausted {
                    self.exhausted = true;
                    tracing::info!(
                        category = %self.category,
                        total = self.items.len(),
                        "feed exhausted"
                    );
                }
                Applied::Appended { count, exhausted }
            }
            Err(err) => {
                tracing::warn!(
                    category = %self.category,
                    page = request.page,
                    error = %err,
                    "page fetch failed, no further pages will be requested"
                );
                self.exhausted = true;
                Applied::Failed
            }
        }
    }

    /// Start a fresh session for the current category and identity: clear the
    /// list, rewind the cursor, then request page 1.
    pub fn reset(&mut self) -> Option<PageRequest> {
        self.generation += 1;
        self.items.clear();
        self.page = 1;
        self.exhausted = false;
        self.in_flight = None;
        tracing::info!(
            category = %self.category,
            identity = %self.identity.label(),
            generation = self.generation,
            "feed reset"
        );
        self.fetch_next_page()
    }

    pub fn reset_for_category(&mut self, category: impl Into<String>) -> Option<PageRequest> {
        self.category = category.into();
        self.reset()
    }

    /// Adopt a new identity.  Only an actual change resets the feed.
    pub fn set_identity(&mut self, identity: Identity) -> Option<PageRequest> {
        if identity == self.identity {
            return None;
        }
        self.identity = identity;
        self.reset()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn blog(id: &str) -> BlogSummary {
        BlogSummary {
            id: id.to_string(),
            title: format!("Blog {id}"),
            description: None,
            image: None,
            author: None,
            category: None,
            created_at: None,
        }
    }

    fn page_of(prefix: &str, n: usize) -> Vec<BlogSummary> {
        (0..n).map(|i| blog(&format!("{prefix}-{i}"))).collect()
    }

    fn ok(request: PageRequest, blogs: Vec<BlogSummary>) -> PageResult {
        PageResult {
            request,
            outcome: Ok(blogs),
        }
    }

    fn failed(request: PageRequest) -> PageResult {
        PageResult {
            request,
            outcome: Err(FetchError::Status { status: 500 }),
        }
    }

    fn guest_loader(category: &str) -> FeedLoader {
        FeedLoader::new(category, Identity::anonymous())
    }

    // -- source selection ----------------------------------------------------

    #[test]
    fn all_with_user_requests_recommendations() {
        let mut feed = FeedLoader::new("all", Identity::signed_in(UserId::new("userA")));
        let req = feed.reset().unwrap();

        assert_eq!(req.query, BlogQuery::Recommended(UserId::new("userA")));
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 10);
    }

    #[test]
    fn named_category_without_user_requests_category() {
        let mut feed = guest_loader("tech");
        let req = feed.reset().unwrap();

        assert_eq!(req.query, BlogQuery::Category("tech".into()));
        assert_eq!((req.page, req.limit), (1, 10));
    }

    #[test]
    fn all_without_user_passes_all_through() {
        let mut feed = guest_loader("all");
        let req = feed.reset().unwrap();
        assert_eq!(req.query, BlogQuery::Category("all".into()));
    }

    #[test]
    fn named_category_with_user_still_filters_by_category() {
        let mut feed = FeedLoader::new("travel", Identity::signed_in(UserId::new("u")));
        let req = feed.reset().unwrap();
        assert_eq!(req.query, BlogQuery::Category("travel".into()));
    }

    // -- pagination ----------------------------------------------------------

    #[test]
    fn new_loader_is_idle_and_empty() {
        let feed = guest_loader("all");
        assert_eq!(feed.phase(), Phase::Idle);
        assert_eq!(feed.page(), 1);
        assert!(feed.items().is_empty());
        assert!(feed.has_more());
    }

    #[test]
    fn successful_fetches_append_in_arrival_order_and_advance_cursor() {
        let mut feed = guest_loader("tech");

        let req = feed.reset().unwrap();
        assert_eq!(feed.apply(ok(req, page_of("p1", 10))), Applied::Appended { count: 10, exhausted: false });

        let req = feed.fetch_next_page().unwrap();
        assert_eq!(req.page, 2);
        feed.apply(ok(req, page_of("p2", 10)));

        let req = feed.fetch_next_page().unwrap();
        assert_eq!(req.page, 3);
        feed.apply(ok(req, page_of("p3", 10)));

        assert_eq!(feed.page(), 4, "cursor is N + 1 after N fetches");
        assert_eq!(feed.items().len(), 30);
        assert_eq!(feed.items()[0].id, "p1-0");
        assert_eq!(feed.items()[10].id, "p2-0");
        assert_eq!(feed.items()[29].id, "p3-9");
        assert_eq!(feed.phase(), Phase::HasMore);
    }

    #[test]
    fn short_page_exhausts_but_keeps_items() {
        let mut feed = guest_loader("tech");
        let req = feed.reset().unwrap();

        let applied = feed.apply(ok(req, page_of("p1", 3)));

        assert_eq!(applied, Applied::Appended { count: 3, exhausted: true });
        assert_eq!(feed.items().len(), 3);
        assert!(!feed.has_more());
        assert_eq!(feed.phase(), Phase::Exhausted);
        assert!(feed.fetch_next_page().is_none(), "no fetch once exhausted");
    }

    #[test]
    fn empty_page_exhausts() {
        let mut feed = guest_loader("tech");
        let req = feed.reset().unwrap();
        feed.apply(ok(req, page_of("p1", 10)));
        let req = feed.fetch_next_page().unwrap();

        assert_eq!(feed.apply(ok(req, vec![])), Applied::Appended { count: 0, exhausted: true });
        assert_eq!(feed.items().len(), 10);
        assert!(!feed.has_more());
    }

    #[test]
    fn failure_keeps_items_and_stops_fetching() {
        let mut feed = guest_loader("tech");
        let req = feed.reset().unwrap();
        feed.apply(ok(req, page_of("p1", 10)));

        let req = feed.fetch_next_page().unwrap();
        assert_eq!(feed.apply(failed(req)), Applied::Failed);

        assert_eq!(feed.items().len(), 10);
        assert_eq!(feed.page(), 2, "cursor does not advance on failure");
        assert!(!feed.has_more());
        assert!(feed.fetch_next_page().is_none());
        assert!(feed.fetch_next_page().is_none());
    }

    // -- re-entrancy ---------------------------------------------------------

    #[test]
    fn only_one_request_in_flight() {
        let mut feed = guest_loader("tech");
        let first = feed.reset().unwrap();

        assert_eq!(feed.phase(), Phase::Loading);
        assert!(feed.fetch_next_page().is_none());

        feed.apply(ok(first, page_of("p1", 10)));
        assert!(feed.fetch_next_page().is_some());
    }

    // -- resets --------------------------------------------------------------

    #[test]
    fn category_change_clears_items_before_new_items_arrive() {
        let mut feed = guest_loader("tech");
        let req = feed.reset().unwrap();
        feed.apply(ok(req, page_of("tech", 10)));
        let req = feed.fetch_next_page().unwrap();
        feed.apply(ok(req, page_of("tech2", 10)));

        let req = feed.reset_for_category("travel").unwrap();

        assert!(feed.items().is_empty());
        assert_eq!(feed.page(), 1);
        assert_eq!(req.page, 1);
        assert_eq!(req.query, BlogQuery::Category("travel".into()));

        feed.apply(ok(req, page_of("travel", 10)));
        assert_eq!(feed.items().len(), 10);
        assert!(feed.items().iter().all(|b| b.id.starts_with("travel")));
    }

    #[test]
    fn reset_clears_exhaustion() {
        let mut feed = guest_loader("tech");
        let req = feed.reset().unwrap();
        feed.apply(failed(req));
        assert!(!feed.has_more());

        assert!(feed.reset_for_category("art").is_some());
        assert!(feed.has_more());
    }

    #[test]
    fn stale_result_from_previous_category_is_dropped() {
        let mut feed = guest_loader("tech");
        let tech_req = feed.reset().unwrap();

        let travel_req = feed.reset_for_category("travel").unwrap();
        assert_eq!(feed.apply(ok(tech_req, page_of("tech", 10))), Applied::Stale);
        assert!(feed.items().is_empty());
        assert_eq!(feed.page(), 1);
        assert!(feed.is_loading(), "travel request still pending");

        feed.apply(ok(travel_req, page_of("travel", 4)));
        assert_eq!(feed.items().len(), 4);
    }

    #[test]
    fn stale_failure_does_not_exhaust_new_session() {
        let mut feed = guest_loader("tech");
        let tech_req = feed.reset().unwrap();
        feed.reset_for_category("travel");

        assert_eq!(feed.apply(failed(tech_req)), Applied::Stale);
        assert!(feed.has_more());
    }

    #[test]
    fn duplicate_delivery_of_same_result_is_stale() {
        let mut feed = guest_loader("tech");
        let req = feed.reset().unwrap();
        feed.apply(ok(req.clone(), page_of("p1", 10)));

        assert_eq!(feed.apply(ok(req, page_of("p1", 10))), Applied::Stale);
        assert_eq!(feed.items().len(), 10);
    }

    // -- identity ------------------------------------------------------------

    #[test]
    fn no_fetch_while_identity_loading() {
        let mut feed = FeedLoader::new("all", Identity::loading());
        assert!(feed.reset().is_none());
        assert!(feed.fetch_next_page().is_none());
        assert_eq!(feed.phase(), Phase::Idle);
    }

    #[test]
    fn identity_resolution_triggers_first_fetch() {
        let mut feed = FeedLoader::new("all", Identity::loading());
        feed.reset();

        let req = feed
            .set_identity(Identity::signed_in(UserId::new("userA")))
            .unwrap();
        assert_eq!(req.query, BlogQuery::Recommended(UserId::new("userA")));
        assert_eq!((req.page, req.limit), (1, 10));
    }

    #[test]
    fn identity_change_resets_feed() {
        let mut feed = FeedLoader::new("all", Identity::signed_in(UserId::new("userA")));
        let req = feed.reset().unwrap();
        feed.apply(ok(req, page_of("rec", 10)));

        let req = feed.set_identity(Identity::anonymous()).unwrap();

        assert!(feed.items().is_empty());
        assert_eq!(req.query, BlogQuery::Category("all".into()));
    }

    #[test]
    fn unchanged_identity_is_a_noop() {
        let mut feed = guest_loader("all");
        let req = feed.reset().unwrap();
        feed.apply(ok(req, page_of("p1", 10)));

        assert!(feed.set_identity(Identity::anonymous()).is_none());
        assert_eq!(feed.items().len(), 10);
        assert_eq!(feed.page(), 2);
    }
}
