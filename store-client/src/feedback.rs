//! User feedback after a mutation settles.
//!
//! Notices and navigation requests leave the store through the [`Feedback`]
//! trait, so the store itself never depends on a UI.

use parking_lot::Mutex;
use store_core::{Action, Command};
use store_types::Entity;
use tracing::{info, warn};

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The operation succeeded.
    Success(String),
    /// The operation failed; carries the display message.
    Error(String),
}

/// Where the UI should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Back to the list of this entity kind.
    List(&'static str),
}

/// One feedback event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    /// Show a notice.
    Notice(Notice),
    /// Navigate.
    Navigate(Navigation),
}

/// Receives feedback events from a store.
pub trait Feedback: Send + Sync {
    /// Show a notice.
    fn notify(&self, notice: Notice);

    /// Navigate somewhere.
    fn navigate(&self, to: Navigation);

    /// Deliver an event to the matching method.
    fn emit(&self, event: FeedbackEvent) {
        match event {
            FeedbackEvent::Notice(notice) => self.notify(notice),
            FeedbackEvent::Navigate(to) => self.navigate(to),
        }
    }
}

/// Feedback for a command that ended with `outcome`.
///
/// Reads are silent. Successful creates and updates also send the user back
/// to the list.
pub fn feedback_for<E: Entity>(command: &Command<E>, outcome: &Action<E>) -> Vec<FeedbackEvent> {
    if let Some(message) = outcome.failure_message() {
        return match command {
            Command::List(_) | Command::Get(_) => Vec::new(),
            _ => vec![FeedbackEvent::Notice(Notice::Error(message.to_string()))],
        };
    }

    let success = |verb: &str| {
        FeedbackEvent::Notice(Notice::Success(format!("{} {} successfully", E::LABEL, verb)))
    };
    let to_list = FeedbackEvent::Navigate(Navigation::List(E::KIND));

    match command {
        Command::List(_) | Command::Get(_) => Vec::new(),
        Command::Create(_) => vec![success("created"), to_list],
        Command::Update(..) => vec![success("updated"), to_list],
        Command::Delete(_) => vec![success("deleted")],
        Command::Transition(_, transition) => vec![success(&transition.to_string())],
    }
}

/// Discards all feedback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn notify(&self, _notice: Notice) {}
    fn navigate(&self, _to: Navigation) {}
}

/// Writes feedback to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFeedback;

impl Feedback for TracingFeedback {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success(message) => info!("{}", message),
            Notice::Error(message) => warn!("{}", message),
        }
    }

    fn navigate(&self, to: Navigation) {
        match to {
            Navigation::List(kind) => info!(kind, "navigate to list"),
        }
    }
}

/// Records feedback for inspection in tests.
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    events: Mutex<Vec<FeedbackEvent>>,
}

impl RecordingFeedback {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events.lock().clone()
    }

    /// Recorded notices only.
    pub fn notices(&self) -> Vec<Notice> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                FeedbackEvent::Notice(notice) => Some(notice.clone()),
                FeedbackEvent::Navigate(_) => None,
            })
            .collect()
    }
}

impl Feedback for RecordingFeedback {
    fn notify(&self, notice: Notice) {
        self.events.lock().push(FeedbackEvent::Notice(notice));
    }

    fn navigate(&self, to: Navigation) {
        self.events.lock().push(FeedbackEvent::Navigate(to));
    }
}
