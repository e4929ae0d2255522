//! Observer that records every event it receives

use std::sync::Mutex;
use std::time::Duration;

use profilesync_core::SyncObserver;
use profilesync_domain::{BatchReport, SyncOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Fetched(usize),
    Outcome(SyncOutcome),
    PersistFailed(String),
    FetchFailed,
    Completed(BatchReport),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn outcomes(&self) -> Vec<SyncOutcome> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Outcome(outcome) => Some(outcome),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl SyncObserver for RecordingObserver {
    fn batch_fetched(&self, count: usize) {
        self.push(Event::Fetched(count));
    }

    fn record_outcome(&self, outcome: &SyncOutcome) {
        self.push(Event::Outcome(outcome.clone()));
    }

    fn persist_failed(&self, id: &str) {
        self.push(Event::PersistFailed(id.to_string()));
    }

    fn fetch_failed(&self) {
        self.push(Event::FetchFailed);
    }

    fn batch_completed(&self, report: &BatchReport, _elapsed: Duration) {
        self.push(Event::Completed(*report));
    }
}
