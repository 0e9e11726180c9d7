use hickory_proto::op::Message;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// The two FIFO channels between test code and the responders.
///
/// Responses flow towards the responders, observed queries flow back. The
/// queues are independent: nothing pairs an entry in one with an entry in
/// the other, so callers that need reliable pairing keep a single exchange
/// in flight at a time.
///
/// Every operation takes the lock once, so a pop either yields the oldest
/// entry or reports the queue empty; there is no separate emptiness probe
/// to race against.
#[derive(Debug, Default)]
pub struct ExchangeQueues {
    responses: Mutex<VecDeque<Message>>,
    queries: Mutex<VecDeque<Message>>,
}

impl ExchangeQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next response a responder serves for a test-domain query.
    pub fn push_response(&self, response: Message) {
        let mut responses = lock(&self.responses);
        responses.push_back(response);
        trace!(pending = responses.len(), "Scripted response queued");
    }

    /// Non-blocking pop of the oldest scripted response.
    pub fn pop_response(&self) -> Option<Message> {
        lock(&self.responses).pop_front()
    }

    /// Record a query a responder answered from the script.
    pub fn push_query(&self, query: Message) {
        let mut queries = lock(&self.queries);
        queries.push_back(query);
        trace!(pending = queries.len(), "Observed query queued");
    }

    /// Non-blocking pop of the oldest observed query.
    pub fn pop_query(&self) -> Option<Message> {
        lock(&self.queries).pop_front()
    }

    pub fn pending_responses(&self) -> usize {
        lock(&self.responses).len()
    }

    pub fn pending_queries(&self) -> usize {
        lock(&self.queries).len()
    }

    /// Drop everything left over from a previous test.
    pub fn clear(&self) {
        lock(&self.responses).clear();
        lock(&self.queries).clear();
    }
}

fn lock(queue: &Mutex<VecDeque<Message>>) -> MutexGuard<'_, VecDeque<Message>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}
