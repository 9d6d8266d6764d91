use crate::error::ExtractError;
use crate::page_range::PageSet;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

/// Emitted once per processed page, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub completed: u32,
    pub total: u32,
}

impl ProgressEvent {
    /// `floor(completed / total * 100)`
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (u64::from(self.completed) * 100 / u64::from(self.total)) as u8
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub outputs: Vec<PathBuf>,
    pub pages: PageSet,
}

/// Receives the notifications of one run.
///
/// `on_progress` fires once per page; exactly one of `on_complete` and
/// `on_error` follows as the last call.
pub trait ProgressObserver {
    fn on_progress(&mut self, event: ProgressEvent);
    fn on_complete(&mut self, outcome: &Outcome);
    fn on_error(&mut self, error: &ExtractError);
}

/// Ignores everything.
impl ProgressObserver for () {
    fn on_progress(&mut self, _event: ProgressEvent) {}
    fn on_complete(&mut self, _outcome: &Outcome) {}
    fn on_error(&mut self, _error: &ExtractError) {}
}

/// Notification forwarded by [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Progress(ProgressEvent),
    Complete(Outcome),
    Error(String),
}

/// Forwards notifications from the worker to an async consumer.
///
/// A closed receiver is not an error; the run carries on regardless.
pub struct ChannelObserver {
    tx: UnboundedSender<PipelineEvent>,
}

impl ChannelObserver {
    pub fn new(tx: UnboundedSender<PipelineEvent>) -> Self {
        ChannelObserver { tx }
    }

    fn send(&self, event: PipelineEvent) {
        let _ = self.tx.send(event);
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&mut self, event: ProgressEvent) {
        self.send(PipelineEvent::Progress(event));
    }

    fn on_complete(&mut self, outcome: &Outcome) {
        self.send(PipelineEvent::Complete(outcome.clone()));
    }

    fn on_error(&mut self, error: &ExtractError) {
        self.send(PipelineEvent::Error(error.to_string()));
    }
}
