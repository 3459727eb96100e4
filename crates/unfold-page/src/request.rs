#![forbid(unsafe_code)]

//! Requests queued by listeners.
//!
//! Listeners run while the page is mutably borrowed, so they cannot call back
//! into it. A listener that wants to react (typically collapsing on an
//! eligible release) queues a [`PageRequest`] through a [`PageRequests`]
//! handle obtained from [`ExpandablePage::requests`](crate::ExpandablePage::requests).
//!
//! The page applies the queue right after dispatching a release and at the
//! end of every [`tick`](crate::ExpandablePage::tick). Hosts may also call
//! [`ExpandablePage::apply_requests`](crate::ExpandablePage::apply_requests)
//! themselves.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::page::ExpandedItem;

/// A deferred call on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Expand(ExpandedItem),
    ExpandImmediately,
    Collapse(ExpandedItem),
}

/// Shared handle to a page's request queue. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct PageRequests {
    queue: Rc<RefCell<VecDeque<PageRequest>>>,
}

impl PageRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, request: PageRequest) {
        self.queue.borrow_mut().push_back(request);
    }

    pub fn expand(&self, item: ExpandedItem) {
        self.push(PageRequest::Expand(item));
    }

    pub fn expand_immediately(&self) {
        self.push(PageRequest::ExpandImmediately);
    }

    pub fn collapse(&self, item: ExpandedItem) {
        self.push(PageRequest::Collapse(item));
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Take everything queued so far. Requests pushed while the batch is
    /// being applied wait for the next batch.
    pub(crate) fn take_batch(&self) -> VecDeque<PageRequest> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_queue() {
        let requests = PageRequests::new();
        let listener_side = requests.clone();
        listener_side.collapse(ExpandedItem::at(0, 200, 300, 80));
        listener_side.expand_immediately();
        assert_eq!(requests.len(), 2);

        let batch = requests.take_batch();
        assert_eq!(
            batch,
            [
                PageRequest::Collapse(ExpandedItem::at(0, 200, 300, 80)),
                PageRequest::ExpandImmediately
            ]
        );
        assert!(listener_side.is_empty());
    }

    #[test]
    fn batch_excludes_later_pushes() {
        let requests = PageRequests::new();
        requests.expand(ExpandedItem::at(0, 0, 10, 10));
        let batch = requests.take_batch();
        requests.expand_immediately();
        assert_eq!(batch.len(), 1);
        assert_eq!(requests.len(), 1);
    }
}
