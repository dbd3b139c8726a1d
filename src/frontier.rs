use crate::query::PageRef;
use std::collections::{HashSet, VecDeque};

/// Visited set plus pending queue for a breadth first crawl.
///
/// Urls are marked visited when they are enqueued, so a link found on
/// several pages is only ever fetched once.
#[derive(Debug, Default)]
pub struct Frontier {
    visited: HashSet<String>,
    queue: VecDeque<PageRef>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `url` unless it has been seen before. Returns whether it was queued.
    pub fn enqueue<S: AsRef<str>>(&mut self, url: S) -> bool {
        let url = url.as_ref();
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string());
        self.queue.push_back(PageRef::new(url));
        true
    }

    pub fn next(&mut self) -> Option<PageRef> {
        self.queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn seen(&self) -> usize {
        self.visited.len()
    }
}
