//! Background notification dispatcher.
//!
//! Pipelines submit a [`NotificationJob`] after their store mutation commits
//! and return immediately. The dispatcher task resolves the entry and the
//! recipient, picks the channel from the recipient's preference and delivers.
//! Failures are logged and published as [`DispatchOutcome::Failed`]; they
//! never reach the caller that triggered the notification.

use std::sync::Arc;

use lawiki_clients::{EntryService, ServiceError, UserService};
use lawiki_core::notification::{template_vars, NotificationKind};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::email::{EmailError, EmailSender, OutgoingEmail};

/// Buffer for the outcome broadcast channel.
const OUTCOME_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Jobs and outcomes
// ---------------------------------------------------------------------------

/// Who should be told about the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Recipient {
    /// The author of the entry, resolved through the entry service.
    EntryAuthor,
    /// A specific user id (the editor of a deleted version).
    User(String),
}

/// One notification to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationJob {
    pub kind: NotificationKind,
    pub entry_id: String,
    pub recipient: Recipient,
}

impl NotificationJob {
    /// Notify the entry's author that one of its versions changed.
    pub fn entry_modified(entry_id: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::EntryModified,
            entry_id: entry_id.into(),
            recipient: Recipient::EntryAuthor,
        }
    }

    /// Notify `editor` that their version was deleted.
    pub fn version_deleted(entry_id: impl Into<String>, editor: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::VersionDeleted,
            entry_id: entry_id.into(),
            recipient: Recipient::User(editor.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryChannel {
    Email,
    InApp,
}

/// Result of processing one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered {
        kind: NotificationKind,
        entry_id: String,
        user_id: String,
        channel: DeliveryChannel,
    },
    Failed {
        kind: NotificationKind,
        entry_id: String,
        reason: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Email(#[from] EmailError),
}

// ---------------------------------------------------------------------------
// NotificationQueue
// ---------------------------------------------------------------------------

/// Cheap-to-clone handle for submitting jobs to the dispatcher.
#[derive(Clone)]
pub struct NotificationQueue {
    sender: mpsc::UnboundedSender<NotificationJob>,
    outcomes: broadcast::Sender<DispatchOutcome>,
}

impl NotificationQueue {
    /// A queue with no worker attached; jobs land on the returned receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NotificationJob>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (outcomes, _) = broadcast::channel(OUTCOME_CAPACITY);
        (Self { sender, outcomes }, receiver)
    }

    /// Enqueue a job. Never blocks; a stopped dispatcher only costs a warning.
    pub fn submit(&self, job: NotificationJob) {
        if let Err(e) = self.sender.send(job) {
            tracing::warn!(
                kind = %e.0.kind,
                entry_id = %e.0.entry_id,
                "Notification dispatcher stopped, dropping job",
            );
        }
    }

    /// Observe the outcome of every job processed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<DispatchOutcome> {
        self.outcomes.subscribe()
    }
}

// ---------------------------------------------------------------------------
// NotificationDispatcher
// ---------------------------------------------------------------------------

pub struct NotificationDispatcher {
    entries: Arc<dyn EntryService>,
    users: Arc<dyn UserService>,
    email: Option<Arc<dyn EmailSender>>,
}

impl NotificationDispatcher {
    /// `email` is `None` when SMTP is not configured; users who prefer
    /// email then receive the in-app notification instead.
    pub fn new(
        entries: Arc<dyn EntryService>,
        users: Arc<dyn UserService>,
        email: Option<Arc<dyn EmailSender>>,
    ) -> Self {
        Self {
            entries,
            users,
            email,
        }
    }

    /// Start the worker. It stops when `cancel` fires or every queue handle
    /// has been dropped and the backlog is drained.
    pub fn spawn(self, cancel: CancellationToken) -> (NotificationQueue, JoinHandle<()>) {
        let (queue, receiver) = NotificationQueue::channel();
        let outcomes = queue.outcomes.clone();
        let handle = tokio::spawn(self.run(receiver, outcomes, cancel));
        (queue, handle)
    }

    async fn run(
        self,
        mut receiver: mpsc::UnboundedReceiver<NotificationJob>,
        outcomes: broadcast::Sender<DispatchOutcome>,
        cancel: CancellationToken,
    ) {
        tracing::info!(
            email_enabled = self.email.is_some(),
            "Notification dispatcher started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Notification dispatcher stopping");
                    break;
                }
                job = receiver.recv() => {
                    let Some(job) = job else {
                        tracing::info!("Notification queue closed");
                        break;
                    };
                    let outcome = self.process(job).await;
                    // No subscribers is the normal case outside tests.
                    let _ = outcomes.send(outcome);
                }
            }
        }
    }

    async fn process(&self, job: NotificationJob) -> DispatchOutcome {
        match self.dispatch(&job).await {
            Ok((user_id, channel)) => {
                tracing::debug!(
                    kind = %job.kind,
                    entry_id = %job.entry_id,
                    user_id = %user_id,
                    channel = ?channel,
                    "Notification delivered",
                );
                DispatchOutcome::Delivered {
                    kind: job.kind,
                    entry_id: job.entry_id,
                    user_id,
                    channel,
                }
            }
            Err(e) => {
                tracing::warn!(
                    kind = %job.kind,
                    entry_id = %job.entry_id,
                    error = %e,
                    "Notification delivery failed",
                );
                DispatchOutcome::Failed {
                    kind: job.kind,
                    entry_id: job.entry_id,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Deliver one job, returning the recipient id and the channel used.
    pub async fn dispatch(
        &self,
        job: &NotificationJob,
    ) -> Result<(String, DeliveryChannel), DispatchError> {
        let entry = self.entries.get_entry(&job.entry_id).await?;
        let user_id = match &job.recipient {
            Recipient::EntryAuthor => entry.author.clone(),
            Recipient::User(id) => id.clone(),
        };
        let user = self.users.get_user(&user_id).await?;

        if user.enable_mails {
            if let Some(email) = &self.email {
                let template = job.kind.email_template();
                let message = OutgoingEmail {
                    to_name: user.name.clone(),
                    to_email: user.email.clone(),
                    subject: template.subject.to_string(),
                    text: template.text.to_string(),
                    html: template.html.to_string(),
                    vars: template_vars(&user.name, &entry.title),
                };
                email.send(&message).await?;
                return Ok((user_id, DeliveryChannel::Email));
            }
            tracing::debug!(user_id = %user_id, "Email not configured, using in-app channel");
        }

        self.users
            .send_notification(&user_id, &job.kind.in_app_message(&entry.title))
            .await?;
        Ok((user_id, DeliveryChannel::InApp))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lawiki_clients::{Entry, User};
    use std::sync::Mutex;

    struct FakeEntries;

    #[async_trait]
    impl EntryService for FakeEntries {
        async fn get_entry(&self, entry_id: &str) -> Result<Entry, ServiceError> {
            if entry_id == "missing" {
                return Err(ServiceError::Status {
                    service: "entry",
                    status: 404,
                    body: "not found".into(),
                });
            }
            Ok(Entry {
                id: entry_id.into(),
                author: "author".into(),
                title: "Rust".into(),
            })
        }
    }

    #[derive(Default)]
    struct FakeUsers {
        in_app: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl UserService for FakeUsers {
        async fn get_user(&self, user_id: &str) -> Result<User, ServiceError> {
            Ok(User {
                id: user_id.into(),
                name: format!("{user_id}-name"),
                email: format!("{user_id}@example.com"),
                enable_mails: user_id.starts_with("mail"),
            })
        }

        async fn send_notification(&self, user_id: &str, message: &str) -> Result<(), ServiceError> {
            self.in_app
                .lock()
                .unwrap()
                .push((user_id.into(), message.into()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait]
    impl EmailSender for FakeMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn dispatcher(
        users: Arc<FakeUsers>,
        mailer: Option<Arc<FakeMailer>>,
    ) -> NotificationDispatcher {
        NotificationDispatcher::new(
            Arc::new(FakeEntries),
            users,
            mailer.map(|m| m as Arc<dyn EmailSender>),
        )
    }

    #[tokio::test]
    async fn entry_modified_goes_to_author_in_app() {
        let users = Arc::new(FakeUsers::default());
        let d = dispatcher(users.clone(), None);

        let (user, channel) = d.dispatch(&NotificationJob::entry_modified("e1")).await.unwrap();

        assert_eq!(user, "author");
        assert_eq!(channel, DeliveryChannel::InApp);
        let sent = users.in_app.lock().unwrap();
        assert_eq!(sent[0].1, "Your entry Rust has been modified");
    }

    #[tokio::test]
    async fn mail_preference_uses_email_with_rendered_vars() {
        let users = Arc::new(FakeUsers::default());
        let mailer = Arc::new(FakeMailer::default());
        let d = dispatcher(users.clone(), Some(mailer.clone()));

        let job = NotificationJob::version_deleted("e1", "mail-user");
        let (user, channel) = d.dispatch(&job).await.unwrap();

        assert_eq!(user, "mail-user");
        assert_eq!(channel, DeliveryChannel::Email);
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].to_email, "mail-user@example.com");
        assert!(sent[0].rendered_text().contains("Hello mail-user-name"));
        assert!(users.in_app.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mail_preference_falls_back_to_in_app_without_smtp() {
        let users = Arc::new(FakeUsers::default());
        let d = dispatcher(users.clone(), None);

        let job = NotificationJob::version_deleted("e1", "mail-user");
        let (_, channel) = d.dispatch(&job).await.unwrap();

        assert_eq!(channel, DeliveryChannel::InApp);
        assert_eq!(users.in_app.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn worker_publishes_outcomes_including_failures() {
        let users = Arc::new(FakeUsers::default());
        let cancel = CancellationToken::new();
        let (queue, handle) = dispatcher(users, None).spawn(cancel.clone());
        let mut outcomes = queue.subscribe();

        queue.submit(NotificationJob::entry_modified("missing"));
        queue.submit(NotificationJob::entry_modified("e1"));

        match outcomes.recv().await.unwrap() {
            DispatchOutcome::Failed { entry_id, reason, .. } => {
                assert_eq!(entry_id, "missing");
                assert!(reason.contains("404"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(matches!(
            outcomes.recv().await.unwrap(),
            DispatchOutcome::Delivered { channel: DeliveryChannel::InApp, .. }
        ));

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn worker_exits_when_queue_dropped() {
        let (queue, handle) =
            dispatcher(Arc::new(FakeUsers::default()), None).spawn(CancellationToken::new());
        drop(queue);
        handle.await.unwrap();
    }

    #[test]
    fn submit_after_receiver_dropped_does_not_panic() {
        let (queue, receiver) = NotificationQueue::channel();
        drop(receiver);
        queue.submit(NotificationJob::entry_modified("e1"));
    }
}
