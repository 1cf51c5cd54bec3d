//! Tagged inbox for execution reports.
//!
//! A rule that reacts to report streams owns one inbox. Every order the rule
//! watches gets a sink from [`ReportInbox::slot`] that forwards its reports
//! together with a tag chosen by the rule (a side, a copy of the order
//! fields). The rule drains the inbox at the start of each check.

use parking_lot::Mutex;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use super::aggregate::ReportSink;
use super::value_objects::ExecutionReport;

/// Queue of execution reports tagged with `K`.
#[derive(Debug)]
pub struct ReportInbox<K> {
    sender: UnboundedSender<(K, ExecutionReport)>,
    receiver: Mutex<UnboundedReceiver<(K, ExecutionReport)>>,
}

impl<K: Clone + Send + 'static> ReportInbox<K> {
    /// Create an empty inbox.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// A sink that enqueues every report it receives tagged with `tag`.
    ///
    /// The sink reports itself closed once the inbox is dropped.
    #[must_use]
    pub fn slot(&self, tag: K) -> ReportSink {
        let sender = self.sender.clone();
        Box::new(move |report| sender.send((tag.clone(), report.clone())).is_ok())
    }

    /// Remove and return every report enqueued so far, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<(K, ExecutionReport)> {
        let mut receiver = self.receiver.lock();
        let mut reports = Vec::new();
        while let Ok(item) = receiver.try_recv() {
            reports.push(item);
        }
        reports
    }
}

impl<K: Clone + Send + 'static> Default for ReportInbox<K> {
    fn default() -> Self {
        Self::new()
    }
}
