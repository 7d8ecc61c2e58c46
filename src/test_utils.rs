//! In-memory feed sources and fixtures shared by the unit tests.

use crate::error::LoadError;
use crate::source::FeedSource;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Three records: one fully bilingual, one English-only, one with an image list.
pub const SAMPLE_FEED: &str = r#"{
    "news": [
        {
            "id": 1,
            "slug": "annual-conference",
            "title": "Annual Conference",
            "title_ar": "المؤتمر السنوي",
            "description": "Opening day.\n\nClosing remarks.",
            "description_ar": ["اليوم الأول", "الختام"],
            "shortDescription": "Conference recap",
            "shortDescription_ar": "ملخص المؤتمر",
            "image": "https://cdn.example.com/conference.jpg",
            "date": "2024-03-12"
        },
        {
            "id": 2,
            "slug": "new-office",
            "title": "New Office",
            "description": ["We moved."],
            "shortDescription": "Moving day",
            "image": "https://cdn.example.com/office.jpg",
            "date": "2024-02-01"
        },
        {
            "id": "3",
            "slug": "partnership",
            "title": "Partnership",
            "title_ar": "شراكة",
            "description": "Signed.",
            "image": [
                {"url": "https://cdn.example.com/p1.jpg", "width": 1200, "height": 630},
                {"url": "https://cdn.example.com/p2.jpg", "width": 640, "height": 480}
            ],
            "date": "2023-11-20"
        }
    ]
}"#;

/// The single-record feed used by the launch scenario.
pub const LAUNCH_FEED: &str = r#"{
    "news": [
        {
            "slug": "launch-2024",
            "title": "Launch",
            "title_ar": "",
            "date": "2024-01-05",
            "image": "https://cdn/x.jpg"
        }
    ]
}"#;

/// One scripted answer from [`ScriptedSource`].
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Status(u16),
}

/// Replays canned replies and counts fetches.
///
/// The n-th fetch gets the n-th reply; once the script runs out the last
/// reply repeats.
#[derive(Debug)]
pub struct ScriptedSource {
    replies: Vec<Reply>,
    delay: Duration,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    pub fn always(body: &str) -> Self {
        Self::sequence(vec![Reply::Body(body.to_string())])
    }

    pub fn sequence(replies: Vec<Reply>) -> Self {
        assert!(!replies.is_empty(), "a scripted source needs at least one reply");
        Self {
            replies,
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl FeedSource for ScriptedSource {
    async fn fetch(&self) -> Result<String, LoadError> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.replies[n.min(self.replies.len() - 1)] {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Status(status) => Err(LoadError::Status { status: *status }),
        }
    }
}
