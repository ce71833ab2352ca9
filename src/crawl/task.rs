// src/crawl/task.rs
// =============================================================================
// The recursive crawl task.
//
// How one task works (it loops until one of the checks in step 1 stops it):
// 1. Stop if the deadline has passed, if no depth is left, or if there is
//    nothing left to crawl
// 2. If there is more than one location, spawn a sibling task for every
//    location after the first, then wait for all of them to finish
// 3. Stop if the first location matches an ignored-URL pattern
// 4. Claim the location; stop if another task already claimed it
// 5. Parse it; stop if parsing fails
// 6. Add the page's word counts to the shared totals
// 7. Continue with the page's links, one hop less deep
//
// Siblings start with the same depth as the task that spawned them. Depth
// only goes down when a task moves past a page it actually parsed.
//
// Rust concepts:
// - tokio::task::JoinSet: spawn tasks onto the worker pool and wait for them
// - BoxFuture: a task spawns copies of itself, so its future type is boxed
//   to give it a fixed size
// =============================================================================

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, error, trace};

use super::state::{VisitedSet, WordCounts};
use crate::clock::Clock;
use crate::parser::PageParser;
use crate::patterns::PatternList;

/// Everything the tasks of one crawl share.
pub(super) struct CrawlContext {
    /// None when start time + timeout does not fit in an Instant
    pub deadline: Option<Instant>,
    pub clock: Arc<dyn Clock>,
    pub ignored_urls: PatternList,
    pub parser: Arc<dyn PageParser>,
    pub visited: VisitedSet,
    pub counts: WordCounts,
}

impl CrawlContext {
    fn is_past_deadline(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| self.clock.now() > deadline)
    }
}

// Runs one crawl task over `locations` until it runs out of work
//
// Parameters:
//   context: the crawl's shared state
//   locations: the pending batch, first location handled by this task
//   depth: how many more pages this task may descend through
pub(super) fn explore(
    context: Arc<CrawlContext>,
    mut locations: Vec<String>,
    mut depth: usize,
) -> BoxFuture<'static, ()> {
    async move {
        loop {
            if context.is_past_deadline() {
                debug!(pending = locations.len(), "deadline reached, stopping branch");
                return;
            }
            if depth == 0 {
                return;
            }

            let mut batch = locations.into_iter();
            let Some(location) = batch.next() else {
                return;
            };

            let mut siblings = JoinSet::new();
            for sibling in batch {
                siblings.spawn(explore(Arc::clone(&context), vec![sibling], depth));
            }
            join_all(&mut siblings).await;

            if context.ignored_urls.matches(&location) {
                trace!(url = %location, "ignored");
                return;
            }

            if !context.visited.claim(&location) {
                trace!(url = %location, "already claimed");
                return;
            }

            let page = match context.parser.parse(&location).await {
                Ok(page) => page,
                Err(err) => {
                    debug!(url = %location, error = %err, "page failed, skipping");
                    return;
                }
            };

            context.counts.merge(&page.word_counts);
            trace!(url = %location, depth, links = page.links.len(), "page merged");

            locations = page.links;
            depth -= 1;
        }
    }
    .boxed()
}

// Waits for every task in the set. A panic in any of them is re-raised here.
// Cancellation only happens when the runtime shuts down mid-crawl; the
// branch's pages are then missing from the result.
async fn join_all(tasks: &mut JoinSet<()>) {
    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined {
            if err.is_panic() {
                std::panic::resume_unwind(err.into_panic());
            }
            error!(error = %err, "crawl task was cancelled, result is incomplete");
        }
    }
}
