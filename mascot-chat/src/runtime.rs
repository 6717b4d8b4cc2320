//! Async runtime for the mascot controller.
//!
//! A single tokio task owns the [`MascotController`]. Everything else talks
//! to it through a [`MascotHandle`], which queues commands on an unbounded
//! channel. The task sleeps until the controller's next deadline, so timers
//! fire without anyone polling. Because commands are handled in order,
//! [`MascotHandle::snapshot`] doubles as a barrier: its answer reflects every
//! command sent before it.
//!
//! The displayed emotion is published on a `watch` channel. Teardown happens
//! on an explicit [`MascotHandle::teardown`] or when the last handle is
//! dropped; either way every pending timer is cancelled before the task exits.

use std::sync::Arc;
use std::time::Duration;

use mascot_core::catalog::{AssetRef, EmotionCatalog};
use mascot_core::config::MascotConfig;
use mascot_core::controller::{MascotController, Snapshot};
use mascot_core::emotion::Emotion;
use mascot_core::types::Timestamp;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::ChatError;

enum Command {
    Request {
        emotion: Emotion,
        hold: Option<Duration>,
    },
    RequestRaw {
        id: String,
        hold: Option<Duration>,
    },
    Activity,
    Snapshot(oneshot::Sender<Snapshot>),
    Teardown,
}

/// Cloneable handle to a running mascot controller.
#[derive(Clone)]
pub struct MascotHandle {
    commands: mpsc::UnboundedSender<Command>,
    emotion: watch::Receiver<Emotion>,
    catalog: Arc<EmotionCatalog>,
}

impl MascotHandle {
    /// Spawn a controller built from `config` onto the current tokio runtime.
    #[must_use]
    pub fn spawn(config: &MascotConfig, catalog: Arc<EmotionCatalog>) -> Self {
        Self::start(MascotController::new(config, catalog, Timestamp::ZERO))
    }

    /// Spawn an existing controller. Its clock starts now.
    ///
    /// The controller should have been created at [`Timestamp::ZERO`].
    #[must_use]
    pub fn start(controller: MascotController) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let (publish, emotion) = watch::channel(controller.current());
        let catalog = Arc::clone(controller.catalog());

        tokio::spawn(run(controller, rx, publish, Instant::now()));

        Self {
            commands,
            emotion,
            catalog,
        }
    }

    /// Ask the mascot to show `emotion`, reverting to `idle` after `hold`.
    pub fn request_emotion(&self, emotion: Emotion, hold: Option<Duration>) {
        self.send(Command::Request { emotion, hold });
    }

    /// Ask for an emotion by identifier; unknown identifiers become `idle`.
    pub fn request_emotion_str(&self, id: &str, hold: Option<Duration>) {
        self.send(Command::RequestRaw {
            id: id.to_string(),
            hold,
        });
    }

    /// Report user activity (pointer, key, click).
    pub fn notify_user_activity(&self) {
        self.send(Command::Activity);
    }

    /// The presentation layer could not load `asset`; fall back to `idle`.
    pub fn report_asset_failure(&self, asset: &AssetRef) {
        warn!(%asset, "Animation asset failed to load, falling back to idle");
        self.request_emotion(Emotion::Idle, None);
    }

    /// Receiver that observes every change of the displayed emotion.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Emotion> {
        self.emotion.clone()
    }

    /// Most recently published emotion.
    #[must_use]
    pub fn current(&self) -> Emotion {
        *self.emotion.borrow()
    }

    /// Catalog the controller was built with.
    #[must_use]
    pub fn catalog(&self) -> &Arc<EmotionCatalog> {
        &self.catalog
    }

    /// Controller state after every previously sent command has been handled.
    ///
    /// # Errors
    /// Returns `ChatError::RuntimeStopped` once the runtime has been torn down.
    pub async fn snapshot(&self) -> Result<Snapshot, ChatError> {
        let (reply, answer) = oneshot::channel();
        self.commands
            .send(Command::Snapshot(reply))
            .map_err(|_| ChatError::RuntimeStopped)?;
        answer.await.map_err(|_| ChatError::RuntimeStopped)
    }

    /// Tear the controller down and wait for its task to exit.
    ///
    /// Safe to call more than once and from any clone.
    pub async fn teardown(&self) {
        let _ = self.commands.send(Command::Teardown);
        self.commands.closed().await;
    }

    /// Whether the controller task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!("Mascot runtime stopped, command dropped");
        }
    }
}

fn clock(epoch: Instant) -> Timestamp {
    Timestamp::from_millis(u64::try_from(epoch.elapsed().as_millis()).unwrap_or(u64::MAX))
}

async fn wait_for(epoch: Instant, deadline: Option<Timestamp>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(epoch + Duration::from_millis(at.as_millis())).await,
        None => std::future::pending::<()>().await,
    }
}

async fn run(
    mut controller: MascotController,
    mut commands: mpsc::UnboundedReceiver<Command>,
    publish: watch::Sender<Emotion>,
    epoch: Instant,
) {
    info!(greeting = %controller.current(), "Mascot runtime started");

    loop {
        let deadline = controller.next_deadline();
        tokio::select! {
            biased;

            () = wait_for(epoch, deadline) => {
                controller.tick(clock(epoch));
            }
            command = commands.recv() => {
                let now = clock(epoch);
                // the timer driver can lag the channel; replay overdue timers first
                if !matches!(command, Some(Command::Teardown) | None) {
                    controller.tick(now);
                }
                match command {
                    Some(Command::Request { emotion, hold }) => {
                        controller.request_emotion(emotion, hold, now);
                    }
                    Some(Command::RequestRaw { id, hold }) => {
                        controller.request_emotion_str(&id, hold, now);
                    }
                    Some(Command::Activity) => {
                        controller.notify_user_activity(now);
                    }
                    Some(Command::Snapshot(reply)) => {
                        let _ = reply.send(controller.snapshot());
                    }
                    Some(Command::Teardown) => {
                        controller.teardown();
                        break;
                    }
                    None => {
                        debug!("Every mascot handle dropped");
                        controller.teardown();
                        break;
                    }
                }
            }
        }

        let shown = controller.current();
        publish.send_if_modified(|published| {
            if *published == shown {
                false
            } else {
                *published = shown;
                true
            }
        });
    }

    info!(displayed = %controller.current(), "Mascot runtime stopped");
}
