//! Shared crawl frontier
//!
//! The frontier owns the pending and visited URL sets. It is the only
//! state mutated by every page worker, so all operations run inside a
//! single `tokio::sync::Mutex` critical section: no two workers can ever
//! claim the same URL, and claim plus visited-insertion is one atomic
//! step.

use log::{debug, warn};
use std::collections::{HashSet, VecDeque};
use tokio::sync::Mutex;

/// State guarded by the frontier mutex.
#[derive(Debug, Default)]
struct FrontierState {
    /// Discovered, not yet claimed. The companion set gives O(1)
    /// membership checks; the deque gives pop order (unspecified by
    /// contract, FIFO in practice).
    pending: VecDeque<String>,
    pending_set: HashSet<String>,
    /// Claimed at least once and not evicted by a requeue.
    visited: HashSet<String>,
    /// Claimed and currently held by a worker.
    in_flight: HashSet<String>,
}

/// The set of discovered-but-not-yet-processed URLs plus the set already
/// claimed.
///
/// `blacklist` is static for the whole crawl; entries match exactly or as
/// prefixes.
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    blacklist: Vec<String>,
}

impl Frontier {
    /// Create a frontier seeded with the start URL.
    #[must_use]
    pub fn new(start_url: String, blacklist: Vec<String>) -> Self {
        let mut state = FrontierState::default();
        state.pending_set.insert(start_url.clone());
        state.pending.push_back(start_url);
        Self {
            state: Mutex::new(state),
            blacklist,
        }
    }

    fn is_blacklisted(&self, url: &str) -> bool {
        self.blacklist
            .iter()
            .any(|entry| !entry.is_empty() && (url == entry || url.starts_with(entry.as_str())))
    }

    /// Atomically claim one pending URL.
    ///
    /// Pops pending entries until one survives the visited and blacklist
    /// checks; the survivor is inserted into `visited` and `in_flight`
    /// before the lock is released, then returned. Returns `None` when
    /// nothing claimable is pending, which is NOT the termination signal
    /// on its own, see [`Frontier::is_exhausted`].
    pub async fn claim(&self) -> Option<String> {
        let mut state = self.state.lock().await;
        while let Some(url) = state.pending.pop_front() {
            state.pending_set.remove(&url);
            if state.visited.contains(&url) {
                continue;
            }
            if self.is_blacklisted(&url) {
                debug!("Skipping blacklisted URL: {url}");
                continue;
            }
            state.visited.insert(url.clone());
            state.in_flight.insert(url.clone());
            return Some(url);
        }
        None
    }

    /// Record that a claimed URL finished processing (successfully or
    /// terminally). The URL stays in `visited`.
    pub async fn mark_done(&self, url: &str) {
        let mut state = self.state.lock().await;
        if !state.in_flight.remove(url) {
            warn!("mark_done for URL that was not in flight: {url}");
        }
    }

    /// Evict a claimed URL from `visited` back into `pending`.
    ///
    /// Used solely by the access-denied retry path; the URL becomes
    /// eligible for a future claim by any worker.
    pub async fn requeue(&self, url: String) {
        let mut state = self.state.lock().await;
        state.in_flight.remove(&url);
        state.visited.remove(&url);
        if state.pending_set.insert(url.clone()) {
            state.pending.push_back(url);
        }
    }

    /// Insert a discovered URL unless it is already visited, pending, or
    /// blacklisted. Returns whether the URL was accepted.
    pub async fn discover(&self, url: String) -> bool {
        if self.is_blacklisted(&url) {
            return false;
        }
        let mut state = self.state.lock().await;
        if state.visited.contains(&url) || state.pending_set.contains(&url) {
            return false;
        }
        state.pending_set.insert(url.clone());
        state.pending.push_back(url);
        true
    }

    /// Number of URLs waiting to be claimed.
    pub async fn pending_len(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    /// True when nothing is pending AND no worker holds a claim.
    ///
    /// Termination must use this, never pending length alone: a sibling
    /// worker mid-navigation may be about to discover new links.
    pub async fn is_exhausted(&self) -> bool {
        let state = self.state.lock().await;
        state.pending.is_empty() && state.in_flight.is_empty()
    }

    /// Snapshot of the visited set, for end-of-crawl reporting.
    pub async fn visited(&self) -> HashSet<String> {
        self.state.lock().await.visited.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_claim_inserts_into_visited_atomically() {
        let frontier = Frontier::new("https://a.test/".into(), Vec::new());

        let url = frontier.claim().await.expect("start URL claimable");
        assert_eq!(url, "https://a.test/");

        // Same URL is never claimable twice
        assert!(frontier.claim().await.is_none());
        assert!(!frontier.discover("https://a.test/".into()).await);
    }

    #[tokio::test]
    async fn test_claim_skips_blacklisted() {
        let frontier = Frontier::new(
            "https://a.test/secret/page".into(),
            vec!["https://a.test/secret".into()],
        );
        assert!(frontier.claim().await.is_none());
        assert!(frontier.is_exhausted().await);
    }

    #[tokio::test]
    async fn test_requeue_makes_url_claimable_again() {
        let frontier = Frontier::new("https://a.test/".into(), Vec::new());

        let url = frontier.claim().await.expect("claimable");
        frontier.requeue(url).await;

        assert!(!frontier.is_exhausted().await);
        let again = frontier.claim().await.expect("requeued URL claimable");
        assert_eq!(again, "https://a.test/");
    }

    #[tokio::test]
    async fn test_exhaustion_requires_in_flight_zero() {
        let frontier = Frontier::new("https://a.test/".into(), Vec::new());

        let url = frontier.claim().await.expect("claimable");
        // Pending is empty but a worker still holds the claim
        assert_eq!(frontier.pending_len().await, 0);
        assert!(!frontier.is_exhausted().await);

        frontier.mark_done(&url).await;
        assert!(frontier.is_exhausted().await);
    }

    #[tokio::test]
    async fn test_discover_dedups_against_pending_and_visited() {
        let frontier = Frontier::new("https://a.test/".into(), Vec::new());

        assert!(frontier.discover("https://a.test/b".into()).await);
        assert!(!frontier.discover("https://a.test/b".into()).await);

        let first = frontier.claim().await.expect("claimable");
        assert!(!frontier.discover(first).await);
    }

    #[tokio::test]
    async fn test_concurrent_claims_are_mutually_exclusive() {
        use std::sync::Arc;

        let frontier = Arc::new(Frontier::new("https://a.test/0".into(), Vec::new()));
        for i in 1..100 {
            frontier.discover(format!("https://a.test/{i}")).await;
        }

        let mut handles = Vec::new();
        for _ in 0..8 {
            let frontier = Arc::clone(&frontier);
            handles.push(tokio::spawn(async move {
                let mut claimed = Vec::new();
                while let Some(url) = frontier.claim().await {
                    claimed.push(url);
                    tokio::task::yield_now().await;
                }
                claimed
            }));
        }

        let mut all = Vec::new();
        for handle in handles {
            all.extend(handle.await.expect("worker panicked"));
        }

        // Every URL claimed exactly once across all workers
        assert_eq!(all.len(), 100);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 100);
    }
}
