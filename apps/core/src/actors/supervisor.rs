use crate::actors::messages::{ActorError, AppError, SupervisorMessage};
use crate::actors::traits::StoryStore;
use crate::assistant::{ChatContext, PendingOperation, Response, SimulatedChatService};
use crate::config::ChatConfig;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument, warn};

/// A handle to the chat supervisor actor.
///
/// This is the entry point for a chat session. The supervisor answers messages against a
/// fresh store snapshot, remembers the last pending bulk operation and applies or drops it
/// on request.
#[derive(Clone)]
pub struct ChatSupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
    response_timeout: Duration,
}

impl ChatSupervisorHandle {
    /// Spawns the supervisor on the current tokio runtime and returns a handle to it.
    ///
    /// # Arguments
    ///
    /// * `store` - The authoritative story collection.
    /// * `config` - Delay window and response timeout.
    pub fn new<S: StoryStore>(store: Arc<S>, config: ChatConfig) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let response_timeout = config.response_timeout();
        let runner = SupervisorRunner::new(receiver, store, SimulatedChatService::new(config));
        tokio::spawn(async move { runner.run().await });
        Self {
            sender,
            response_timeout,
        }
    }

    async fn request(
        &self,
        msg: SupervisorMessage,
        recv: oneshot::Receiver<Result<Response, AppError>>,
    ) -> Result<Response, AppError> {
        self.sender
            .send(msg)
            .await
            .map_err(|e| ActorError::Internal(e.to_string()))?;
        timeout(self.response_timeout, recv)
            .await?
            .map_err(|e| ActorError::Internal(e.to_string()))?
    }

    /// Answers a user message.
    #[instrument(skip(self))]
    pub async fn process_message(&self, content: String) -> Result<Response, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::ProcessUserMessage {
            content,
            responder: send,
        };
        self.request(msg, recv).await
    }

    /// Applies the pending bulk operation, if any.
    #[instrument(skip(self))]
    pub async fn confirm_pending(&self) -> Result<Response, AppError> {
        let (send, recv) = oneshot::channel();
        self.request(SupervisorMessage::ConfirmPending { responder: send }, recv)
            .await
    }

    /// Drops the pending bulk operation, if any.
    #[instrument(skip(self))]
    pub async fn discard_pending(&self) -> Result<Response, AppError> {
        let (send, recv) = oneshot::channel();
        self.request(SupervisorMessage::DiscardPending { responder: send }, recv)
            .await
    }

    /// Asks the supervisor loop to stop.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(SupervisorMessage::Shutdown)
            .await
            .map_err(|e| ActorError::Internal(e.to_string()))?;
        Ok(())
    }
}

// --- Actor Runner ---
pub(crate) struct SupervisorRunner<S>
where
    S: StoryStore,
{
    receiver: mpsc::Receiver<SupervisorMessage>,
    store: Arc<S>,
    service: SimulatedChatService,
    pending: Option<PendingOperation>,
}

impl<S> SupervisorRunner<S>
where
    S: StoryStore,
{
    pub(crate) fn new(
        receiver: mpsc::Receiver<SupervisorMessage>,
        store: Arc<S>,
        service: SimulatedChatService,
    ) -> Self {
        Self {
            receiver,
            store,
            service,
            pending: None,
        }
    }

    pub(crate) async fn run(mut self) {
        info!("Supervisor started");
        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, SupervisorMessage::Shutdown) {
                info!("Supervisor shutting down...");
                break;
            }
            self.handle_message(msg).await;
        }
        info!("Supervisor stopped");
    }

    async fn handle_message(&mut self, msg: SupervisorMessage) {
        match msg {
            SupervisorMessage::ProcessUserMessage { content, responder } => {
                let result = self.handle_user_message(content).await;
                if let Err(e) = &result {
                    error!("Error processing user message: {:?}", e);
                }
                let pending = match &result {
                    Ok(response) => Some(response.pending_operation.clone()),
                    Err(_) => None,
                };
                let delivered = responder.send(result).is_ok();
                self.commit_pending(pending, delivered);
            }
            SupervisorMessage::ConfirmPending { responder } => {
                let result = self.handle_confirm().await;
                if let Err(e) = &result {
                    error!("Error applying pending operation: {:?}", e);
                }
                let _ = responder.send(result);
            }
            SupervisorMessage::DiscardPending { responder } => {
                let _ = responder.send(Ok(self.handle_discard()));
            }
            SupervisorMessage::Shutdown => {}
        }
    }

    #[instrument(skip(self))]
    async fn handle_user_message(&mut self, content: String) -> Result<Response, AppError> {
        let stories = self.store.snapshot().await?;
        let response = self
            .service
            .process_message(&content, ChatContext { stories: &stories })
            .await;
        Ok(response)
    }

    /// Records the pending operation of an answered message.
    ///
    /// `answered` is `None` when the message failed, which leaves the current state alone.
    /// An answer the caller never received must not be confirmable later.
    fn commit_pending(&mut self, answered: Option<Option<PendingOperation>>, delivered: bool) {
        let Some(pending) = answered else {
            return;
        };
        if !delivered {
            warn!("Caller stopped waiting for the answer, clearing pending operation");
            self.pending = None;
            return;
        }
        // The latest answer decides what is pending; a non-bulk answer clears it.
        if self.pending.is_some() && pending.is_none() {
            info!("Dropping previous pending operation");
        }
        self.pending = pending;
    }

    async fn handle_confirm(&mut self) -> Result<Response, AppError> {
        let Some(operation) = self.pending.take() else {
            return Ok(Response::text("Es gibt keine offenen Änderungen zum Übernehmen."));
        };

        let updated = match self.store.apply(&operation).await {
            Ok(updated) => updated,
            Err(e) => {
                // Keep the operation so the user can retry or discard it.
                self.pending = Some(operation);
                return Err(e);
            }
        };
        if updated < operation.changes.len() {
            warn!(
                expected = operation.changes.len(),
                updated, "Some stories of the pending operation no longer exist"
            );
        }
        info!(field = operation.field.key(), updated, "Applied bulk operation");

        let noun = if updated == 1 { "Story" } else { "Stories" };
        Ok(Response::text(format!(
            "Erledigt: {} {} aktualisiert ({} → {}).",
            updated,
            noun,
            operation.field.display_name(),
            operation.new_value
        )))
    }

    fn handle_discard(&mut self) -> Response {
        match self.pending.take() {
            Some(operation) => {
                info!(changes = operation.changes.len(), "Discarded pending operation");
                Response::text("Die Änderungen wurden verworfen.")
            }
            None => Response::text("Es gibt keine offenen Änderungen."),
        }
    }
}
