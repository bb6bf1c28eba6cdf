// src/crawl/queue.rs
// =============================================================================
// The crawl frontier: a breadth-first queue of pages still to visit plus the
// set of pages already handled.
//
// How it works:
// 1. The seed URL goes into the queue
// 2. The engine pops the oldest URL (FIFO = breadth-first)
// 3. Once a URL is popped it is marked visited and can never be queued again
// 4. Newly discovered links go to the back of the queue
//
// The queue is paired with a HashSet of its contents so "is this already
// queued?" is O(1) instead of a scan over the whole VecDeque.
//
// Rust concepts:
// - VecDeque: push_back/pop_front for FIFO order
// - HashSet: O(1) membership checks
// =============================================================================

use super::canonical::CanonicalUrl;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default)]
pub struct Frontier {
    pending: VecDeque<CanonicalUrl>,
    // Mirrors `pending` for membership checks
    queued: HashSet<CanonicalUrl>,
    visited: HashSet<CanonicalUrl>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    // Adds a URL to the back of the queue
    //
    // Returns false (and does nothing) if the URL was already visited or is
    // already waiting in the queue.
    pub fn enqueue(&mut self, url: CanonicalUrl) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.pending.push_back(url);
        true
    }

    // Removes the oldest queued URL
    pub fn dequeue(&mut self) -> Option<CanonicalUrl> {
        let url = self.pending.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    pub fn mark_visited(&mut self, url: CanonicalUrl) {
        self.visited.insert(url);
    }

    pub fn is_visited(&self, url: &CanonicalUrl) -> bool {
        self.visited.contains(url)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Drains whatever is still queued, oldest first.
    pub fn into_pending(self) -> Vec<CanonicalUrl> {
        self.pending.into()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why two collections for the queue?
//    - VecDeque keeps the order (who was discovered first)
//    - HashSet answers "is it in there?" without walking the whole queue
//    - Both must always hold the same URLs, so only enqueue/dequeue touch them
//
// 2. Why does dequeue() use the ? operator on an Option?
//    - `?` on None returns None from the function immediately
//    - It's a shortcut for: match x { Some(v) => v, None => return None }
//
// 3. Why does enqueue() take the URL by value?
//    - The frontier stores it, so it needs to own it
//    - We clone once for the HashSet; CanonicalUrl is just a String inside
// -----------------------------------------------------------------------------
