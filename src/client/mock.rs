//! Scripted in-memory [`MatchBackend`] for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{ClientError, MatchBackend, MatchParams, MatchRequest, RowMatches};

/// One scripted response for a chunk.
#[derive(Debug, Clone)]
pub enum MockReply {
    Results(Vec<RowMatches>),
    /// Simulates a transport/status failure for the chunk.
    Fail(String),
}

/// Replays queued [`MockReply`] values in order; once the queue is empty,
/// every chunk gets an empty result per submitted row.
#[derive(Debug, Default)]
pub struct MockMatchBackend {
    replies: Mutex<VecDeque<MockReply>>,
    calls: AtomicUsize,
}

impl MockMatchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push_reply(&self, reply: MockReply) {
        self.replies
            .lock()
            .expect("mock reply queue poisoned")
            .push_back(reply);
    }

    /// Number of chunks submitted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchBackend for MockMatchBackend {
    async fn match_chunk(
        &self,
        request: &MatchRequest,
        _params: &MatchParams,
    ) -> Result<Vec<RowMatches>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let reply = self
            .replies
            .lock()
            .expect("mock reply queue poisoned")
            .pop_front();

        match reply {
            Some(MockReply::Results(results)) => Ok(results),
            Some(MockReply::Fail(body)) => Err(ClientError::Status { status: 500, body }),
            None => Ok(vec![RowMatches::default(); request.rows.len()]),
        }
    }
}
