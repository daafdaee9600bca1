//! Drives a submission session against the article service.
//!
//! [`SubmissionFlow`] owns the session machine, the service handle and the
//! at-most-one open status subscription. It performs the [`Effect`]s the
//! machine requests and feeds the outcomes back in as events. Failures are
//! logged by the machine and leave the session in its documented phase; none
//! bubble out of here.

use chrono::{DateTime, Utc};
use log::debug;

use crate::api::{ArticleService, StatusStream};
use crate::session::{Effect, Event, FormState, Phase, Session, SessionOutcome, SessionRecord};

pub struct SubmissionFlow<S> {
    service: S,
    session: Session,
    stream: Option<StatusStream>,
    submitted_at: Option<DateTime<Utc>>,
}

impl<S: ArticleService> SubmissionFlow<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            session: Session::new(),
            stream: None,
            submitted_at: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        self.session.form_mut()
    }

    /// Confirmed submit: exactly one creation request, then the session moves
    /// to listening. On failure the session is back in idle with the form
    /// intact, and the error has been logged.
    pub async fn submit(&mut self) {
        if self.session.apply(Event::SubmitConfirmed) != Effect::SubmitForm {
            return;
        }
        // The machine only asks for a submit when the form is complete.
        let Some(request) = self.session.form().to_request() else {
            self.session.apply(Event::SubmissionFailed {
                reason: "form is incomplete".into(),
            });
            return;
        };

        match self.service.create_article(&request).await {
            Ok(resp) => {
                debug!("article accepted with id {}", resp.id);
                self.submitted_at = Some(Utc::now());
                let effect = self.session.apply(Event::SubmissionAccepted { id: resp.id });
                if let Effect::OpenStream { article_id } = effect {
                    self.open_stream(&article_id).await;
                }
            }
            Err(err) => {
                self.session.apply(Event::SubmissionFailed {
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Wait until the session leaves the listening and fetching phases.
    ///
    /// Each stream message is fed to the machine; the terminal event closes
    /// the subscription before the single content fetch. A transport error or
    /// an early end of the stream abandons the wait.
    pub async fn wait_for_article(&mut self) {
        while matches!(self.session.phase(), Phase::Listening { .. }) {
            let Some(stream) = self.stream.as_mut().filter(|s| s.is_open()) else {
                let effect = self.session.apply(Event::StreamFailed {
                    reason: "no open subscription".into(),
                });
                self.run_effect(effect).await;
                return;
            };

            let event = match stream.next_event().await {
                Ok(Some(status)) => Event::StatusReceived { status },
                Ok(None) => Event::StreamFailed {
                    reason: "stream ended before completion".into(),
                },
                Err(err) => Event::StreamFailed {
                    reason: err.to_string(),
                },
            };
            let effect = self.session.apply(event);
            self.run_effect(effect).await;
        }
    }

    /// Reset form, article and content; close any open subscription.
    pub fn refresh(&mut self) {
        if self.session.apply(Event::Refresh) == Effect::CloseStream {
            self.close_stream();
        }
        self.submitted_at = None;
    }

    /// Completion summary, available once the session reached Ready or Errored.
    pub fn record(&self) -> Option<SessionRecord> {
        let submitted_at = self.submitted_at?;
        let (article_id, outcome) = match self.session.phase() {
            Phase::Ready { article_id, .. } => (article_id.clone(), SessionOutcome::Ready),
            Phase::Errored { article_id } => (article_id.clone(), SessionOutcome::Errored),
            _ => return None,
        };
        let form = self.session.form();
        Some(SessionRecord::new(
            article_id,
            form.platform?,
            form.language?,
            outcome,
            submitted_at,
        ))
    }

    async fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::CloseStream => self.close_stream(),
            Effect::FetchContent { article_id } => {
                // At most one completion is honored: the subscription goes
                // away before the fetch starts.
                self.close_stream();
                let event = match self.service.fetch_content(&article_id).await {
                    Ok(content) => Event::ContentFetched { content },
                    Err(err) => Event::FetchFailed {
                        reason: err.to_string(),
                    },
                };
                self.session.apply(event);
            }
            Effect::None | Effect::SubmitForm | Effect::OpenStream { .. } => {}
        }
    }

    async fn open_stream(&mut self, article_id: &str) {
        // The previous subscription, if any, must be gone first.
        self.close_stream();
        match self.service.open_status_stream(article_id).await {
            Ok(stream) => self.stream = Some(stream),
            Err(err) => {
                self.session.apply(Event::StreamFailed {
                    reason: err.to_string(),
                });
            }
        }
    }

    fn close_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bytes::Bytes;
    use futures_util::stream;

    use crate::api::{
        ApiError, ArticleContent, CreateArticleRequest, CreateArticleResponse, Language, Platform,
    };

    /// Scripted stand-in for the real service.
    struct MockService {
        create_fails: bool,
        stream_body: Option<&'static str>,
        fetch_fails: bool,
        create_calls: AtomicUsize,
        fetch_calls: AtomicUsize,
        opened_for: Mutex<Vec<String>>,
        last_request: Mutex<Option<CreateArticleRequest>>,
    }

    impl MockService {
        fn with_stream(body: &'static str) -> Self {
            Self {
                create_fails: false,
                stream_body: Some(body),
                fetch_fails: false,
                create_calls: AtomicUsize::new(0),
                fetch_calls: AtomicUsize::new(0),
                opened_for: Mutex::new(Vec::new()),
                last_request: Mutex::new(None),
            }
        }

        fn failing_create() -> Self {
            let mut mock = Self::with_stream("");
            mock.create_fails = true;
            mock
        }

        fn broken_stream() -> Self {
            let mut mock = Self::with_stream("");
            mock.stream_body = None;
            mock
        }
    }

    impl ArticleService for &MockService {
        async fn create_article(
            &self,
            req: &CreateArticleRequest,
        ) -> Result<CreateArticleResponse, ApiError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(req.clone());
            if self.create_fails {
                return Err(ApiError::Status {
                    status: 500,
                    message: "boom".into(),
                });
            }
            Ok(CreateArticleResponse { id: "abc".into() })
        }

        async fn open_status_stream(&self, article_id: &str) -> Result<StatusStream, ApiError> {
            self.opened_for.lock().unwrap().push(article_id.to_string());
            let chunks: Vec<Result<Bytes, ApiError>> = match self.stream_body {
                Some(body) => vec![Ok(Bytes::from(body))],
                None => vec![Err(ApiError::Stream("connection reset".into()))],
            };
            Ok(StatusStream::new(stream::iter(chunks)))
        }

        async fn fetch_content(&self, _article_id: &str) -> Result<ArticleContent, ApiError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            if self.fetch_fails {
                return Err(ApiError::Status {
                    status: 500,
                    message: "boom".into(),
                });
            }
            Ok(ArticleContent {
                title: "T".into(),
                content: "C".into(),
            })
        }
    }

    fn flow_with_form(service: &MockService) -> SubmissionFlow<&MockService> {
        let mut flow = SubmissionFlow::new(service);
        *flow.form_mut() = FormState {
            platform: Some(Platform::Twitter),
            language: Some(Language::English),
            title: "X".into(),
        };
        flow
    }

    #[tokio::test]
    async fn happy_path_submits_listens_and_fetches_once() {
        let service =
            MockService::with_stream("data: {\"status\":\"Pending\"}\n\ndata: {\"status\":\"Completed\"}\n\n");
        let mut flow = flow_with_form(&service);

        flow.submit().await;
        assert!(matches!(flow.session().phase(), Phase::Listening { .. }));
        assert_eq!(*service.opened_for.lock().unwrap(), vec!["abc".to_string()]);

        flow.wait_for_article().await;
        match flow.session().phase() {
            Phase::Ready {
                article_id,
                content,
            } => {
                assert_eq!(article_id, "abc");
                assert_eq!(content.title, "T");
                assert_eq!(content.content, "C");
            }
            other => panic!("expected ready, got {other:?}"),
        }
        assert_eq!(service.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.fetch_calls.load(Ordering::SeqCst), 1);
        assert!(flow.stream.is_none());

        let req = service.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(req.title, "X");
        assert!(req.keywords.is_empty());
    }

    #[tokio::test]
    async fn repeated_completions_trigger_a_single_fetch() {
        let service = MockService::with_stream(
            "data: {\"status\":\"Completed\"}\n\ndata: {\"status\":\"Completed\"}\n\n",
        );
        let mut flow = flow_with_form(&service);

        flow.submit().await;
        flow.wait_for_article().await;

        assert!(matches!(flow.session().phase(), Phase::Ready { .. }));
        assert_eq!(service.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn submission_failure_returns_to_idle_without_a_subscription() {
        let service = MockService::failing_create();
        let mut flow = flow_with_form(&service);

        flow.submit().await;

        assert_eq!(*flow.session().phase(), Phase::Idle);
        assert!(service.opened_for.lock().unwrap().is_empty());
        assert!(flow.stream.is_none());
        assert!(flow.record().is_none());
    }

    #[tokio::test]
    async fn stream_error_abandons_wait_and_keeps_article_id() {
        let service = MockService::broken_stream();
        let mut flow = flow_with_form(&service);

        flow.submit().await;
        flow.wait_for_article().await;

        assert_eq!(
            *flow.session().phase(),
            Phase::Errored {
                article_id: "abc".into()
            }
        );
        assert!(flow.session().content().is_none());
        assert_eq!(service.fetch_calls.load(Ordering::SeqCst), 0);
        assert!(flow.stream.is_none());
    }

    #[tokio::test]
    async fn stream_ending_early_counts_as_failure() {
        let service = MockService::with_stream("data: {\"status\":\"Pending\"}\n\n");
        let mut flow = flow_with_form(&service);

        flow.submit().await;
        flow.wait_for_article().await;

        assert!(matches!(flow.session().phase(), Phase::Errored { .. }));
        assert_eq!(service.fetch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_failure_ends_errored() {
        let mut service = MockService::with_stream("data: {\"status\":\"Completed\"}\n\n");
        service.fetch_fails = true;
        let mut flow = flow_with_form(&service);

        flow.submit().await;
        flow.wait_for_article().await;

        assert!(matches!(flow.session().phase(), Phase::Errored { .. }));
        assert!(flow.session().content().is_none());
    }

    #[tokio::test]
    async fn refresh_clears_session_and_subscription() {
        let service = MockService::with_stream("data: {\"status\":\"Completed\"}\n\n");
        let mut flow = flow_with_form(&service);

        flow.submit().await;
        flow.wait_for_article().await;
        assert!(flow.record().is_some());

        flow.refresh();

        assert_eq!(*flow.session().phase(), Phase::Idle);
        assert_eq!(*flow.session().form(), FormState::default());
        assert!(flow.stream.is_none());
        assert!(flow.record().is_none());
    }

    #[tokio::test]
    async fn record_reflects_outcome() {
        let service = MockService::with_stream("data: {\"status\":\"Completed\"}\n\n");
        let mut flow = flow_with_form(&service);

        flow.submit().await;
        flow.wait_for_article().await;

        let record = flow.record().unwrap();
        assert_eq!(record.article_id, "abc");
        assert_eq!(record.outcome, SessionOutcome::Ready);
        assert_eq!(record.platform, Platform::Twitter);
        assert!(record.duration_ms >= 0);
    }

    #[tokio::test]
    async fn resubmission_opens_a_fresh_subscription() {
        let service = MockService::with_stream("data: {\"status\":\"Completed\"}\n\n");
        let mut flow = flow_with_form(&service);

        flow.submit().await;
        flow.wait_for_article().await;
        assert!(matches!(flow.session().phase(), Phase::Ready { .. }));

        flow.submit().await;
        flow.wait_for_article().await;

        assert_eq!(service.create_calls.load(Ordering::SeqCst), 2);
        assert_eq!(service.opened_for.lock().unwrap().len(), 2);
        assert_eq!(service.fetch_calls.load(Ordering::SeqCst), 2);
    }
}
