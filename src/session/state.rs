//! The submission session state machine.
//!
//! One tagged [`Phase`] replaces the flag soup a naive UI would keep
//! (submitting/processing/content/id), so impossible combinations cannot be
//! represented. [`Session::apply`] is a pure transition function: it consumes
//! an [`Event`] and answers with the [`Effect`] the driver must perform.

use log::error;

use crate::api::{ArticleContent, StatusEvent};

use super::form::FormState;

/// Where the session currently is.
///
/// Idle → Submitting → Listening → Fetching → Ready, with Errored as the
/// terminal failure phase. The article identifier travels with the phase, so
/// it exists exactly when a job does.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Listening {
        article_id: String,
    },
    Fetching {
        article_id: String,
    },
    Ready {
        article_id: String,
        content: ArticleContent,
    },
    Errored {
        article_id: String,
    },
}

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The user confirmed the submission prompt.
    SubmitConfirmed,
    /// The creation endpoint answered with an article identifier.
    SubmissionAccepted { id: String },
    /// The creation request failed (transport or service error).
    SubmissionFailed { reason: String },
    /// A message arrived on the status stream.
    StatusReceived { status: StatusEvent },
    /// The status stream broke or ended before a terminal event.
    StreamFailed { reason: String },
    /// The content fetch succeeded.
    ContentFetched { content: ArticleContent },
    /// The content fetch failed.
    FetchFailed { reason: String },
    /// The user reset the page.
    Refresh,
}

/// Side effect the driver must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Issue the creation request built from the current form.
    SubmitForm,
    /// Open a status subscription scoped to this identifier.
    OpenStream { article_id: String },
    /// Close the subscription, then fetch the article exactly once.
    FetchContent { article_id: String },
    /// Close any open subscription.
    CloseStream,
}

/// Form plus phase; the whole UI state.
#[derive(Debug, Default)]
pub struct Session {
    form: FormState,
    phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// True while a submission or wait is in flight; the submit affordance is
    /// disabled in these phases.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            Phase::Submitting | Phase::Listening { .. } | Phase::Fetching { .. }
        )
    }

    pub fn article_id(&self) -> Option<&str> {
        match &self.phase {
            Phase::Idle | Phase::Submitting => None,
            Phase::Listening { article_id }
            | Phase::Fetching { article_id }
            | Phase::Ready { article_id, .. }
            | Phase::Errored { article_id } => Some(article_id),
        }
    }

    pub fn content(&self) -> Option<&ArticleContent> {
        match &self.phase {
            Phase::Ready { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Advance the machine. Unexpected (phase, event) pairs are no-ops.
    pub fn apply(&mut self, event: Event) -> Effect {
        let phase = std::mem::take(&mut self.phase);
        let (next, effect) = match (phase, event) {
            // Starting a new submission invalidates any previous article.
            (Phase::Idle | Phase::Ready { .. } | Phase::Errored { .. }, Event::SubmitConfirmed)
                if self.form.is_submittable() =>
            {
                (Phase::Submitting, Effect::SubmitForm)
            }
            (Phase::Submitting, Event::SubmissionAccepted { id }) => (
                Phase::Listening {
                    article_id: id.clone(),
                },
                Effect::OpenStream { article_id: id },
            ),
            (Phase::Submitting, Event::SubmissionFailed { reason }) => {
                error!("submission failed: {reason}");
                (Phase::Idle, Effect::None)
            }
            (Phase::Listening { article_id }, Event::StatusReceived { status })
                if status.is_terminal() =>
            {
                (
                    Phase::Fetching {
                        article_id: article_id.clone(),
                    },
                    Effect::FetchContent { article_id },
                )
            }
            (
                Phase::Listening { article_id } | Phase::Fetching { article_id },
                Event::StreamFailed { reason },
            ) => {
                error!("status stream failed: {reason}");
                (Phase::Errored { article_id }, Effect::CloseStream)
            }
            (Phase::Fetching { article_id }, Event::ContentFetched { content }) => (
                Phase::Ready {
                    article_id,
                    content,
                },
                Effect::None,
            ),
            (Phase::Fetching { article_id }, Event::FetchFailed { reason }) => {
                error!("content fetch failed: {reason}");
                (Phase::Errored { article_id }, Effect::None)
            }
            (_, Event::Refresh) => {
                self.form.clear();
                (Phase::Idle, Effect::CloseStream)
            }
            // Non-terminal statuses, late stream messages, submits while
            // busy: all ignored.
            (phase, _) => (phase, Effect::None),
        };
        self.phase = next;
        effect
    }
}
