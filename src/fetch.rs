//! Background page fetching.
//!
//! Each [`PageRequest`] handed out by the feed loader is run as its own tokio
//! task against the injected [`BlogSource`].  Results come back to the UI
//! loop over an unbounded channel, which drains it on every tick.
//!
//! Tasks are never cancelled.  When the user switches category mid-fetch the
//! old task runs to completion and its result is dropped by the loader's
//! generation check.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::feed::{BlogQuery, PageRequest, PageResult};
use crate::identity::Identity;
use crate::source::BlogSource;

/// Messages sent from background tasks to the UI loop.
#[derive(Debug)]
pub enum FetchMsg {
    /// A page request finished (successfully or not).
    Page(PageResult),
    /// The reader's identity has been resolved.
    Identity(Identity),
}

/// Runs page requests against a shared source.
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn BlogSource>,
    tx: UnboundedSender<FetchMsg>,
}

impl Fetcher {
    /// Create a fetcher and the receiver the main loop should drain.
    pub fn new(source: Arc<dyn BlogSource>) -> (Self, UnboundedReceiver<FetchMsg>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { source, tx }, rx)
    }

    /// A sender for other background tasks (e.g. identity resolution).
    pub fn sender(&self) -> UnboundedSender<FetchMsg> {
        self.tx.clone()
    }

    /// Spawn a task that runs `request` and reports its result.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, request: PageRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = run(source.as_ref(), request).await;
            // If the receiver is gone the UI has exited; nothing to do.
            let _ = tx.send(FetchMsg::Page(result));
        });
    }
}

/// Execute one request against `source`.
pub async fn run(source: &dyn BlogSource, request: PageRequest) -> PageResult {
    let outcome = match &request.query {
        BlogQuery::Recommended(user) => {
            source
                .get_recommended_blogs(user, request.page, request.limit)
                .await
        }
        BlogQuery::Category(category) => {
            source.get_blogs(category, request.page, request.limit).await
        }
    };
    PageResult { request, outcome }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
