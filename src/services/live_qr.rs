// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Live QR view runtime.
//!
//! Drives a [`QrController`] from a single task that owns it outright:
//! - a one-second tick recomputes the countdown and rotates lapsed codes
//! - a slower resync re-reads the server's active code as a backstop
//! - operator commands start, refresh or stop the code
//!
//! Requests are polled inside the same task, so dropping the task (via
//! [`LiveQrHandle`]) also drops both timers and every in-flight request.

use crate::config::Config;
use crate::error::{ErrorKind, Result};
use crate::models::{Id, QrCode};
use crate::services::api::ApiClient;
use crate::services::qr::{Applied, FetchTicket, QrController, RequestId};
use crate::services::scan::scan_url;
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Server operations the live view needs.
pub trait QrBackend: Send + Sync + 'static {
    fn fetch_active(&self, event_id: Id) -> impl Future<Output = Result<QrCode>> + Send;
    fn generate(&self, event_id: Id) -> impl Future<Output = Result<QrCode>> + Send;
    fn deactivate(&self, event_id: Id) -> impl Future<Output = Result<()>> + Send;
}

impl QrBackend for ApiClient {
    async fn fetch_active(&self, event_id: Id) -> Result<QrCode> {
        self.active_qr(event_id).await
    }

    async fn generate(&self, event_id: Id) -> Result<QrCode> {
        self.generate_qr(event_id).await
    }

    async fn deactivate(&self, event_id: Id) -> Result<()> {
        self.deactivate_qr(event_id).await.map(|_| ())
    }
}

/// Timing and display settings for a live view.
#[derive(Debug, Clone)]
pub struct LiveQrOptions {
    pub tick_interval: Duration,
    pub resync_interval: Duration,
    pub retry_delay: Duration,
    /// Origin of the check-in page encoded into the QR code
    pub frontend_url: String,
}

impl LiveQrOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            resync_interval: config.qr_resync_interval,
            retry_delay: config.qr_retry_delay,
            frontend_url: config.frontend_url.clone(),
        }
    }
}

/// What the view shows at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct QrSnapshot {
    pub event_id: Id,
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub seconds_remaining: i64,
    /// Check-in URL to encode in the QR image
    pub scan_url: Option<String>,
    /// A generate request is outstanding
    pub generating: bool,
    /// Last operator-facing failure, cleared by the next successful change
    pub notice: Option<String>,
}

impl QrSnapshot {
    fn empty(event_id: Id) -> Self {
        Self {
            event_id,
            token: None,
            expires_at: None,
            active: false,
            seconds_remaining: 0,
            scan_url: None,
            generating: false,
            notice: None,
        }
    }
}

/// Operator actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrCommand {
    /// Start showing a code, or force an early rotation
    Refresh,
    /// Deactivate and hide the code
    Stop,
}

/// Owner of a running live view. Dropping it stops the view.
pub struct LiveQrHandle {
    commands: mpsc::Sender<QrCommand>,
    snapshots: watch::Receiver<QrSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl LiveQrHandle {
    /// Start a live view for `event_id`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<B: QrBackend>(backend: Arc<B>, event_id: Id, options: LiveQrOptions) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (snapshot_tx, snapshot_rx) = watch::channel(QrSnapshot::empty(event_id));

        let controller = QrController::new(event_id, options.retry_delay);
        let task = tokio::spawn(run(backend, controller, options, command_rx, snapshot_tx));

        tracing::info!(event_id, "Live QR view started");
        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            task: Some(task),
        }
    }

    /// Request a new code (start or force refresh).
    pub async fn refresh(&self) {
        self.send(QrCommand::Refresh).await;
    }

    /// Deactivate the current code.
    pub async fn stop(&self) {
        self.send(QrCommand::Stop).await;
    }

    /// Latest published state.
    pub fn snapshot(&self) -> QrSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<QrSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the view and wait until its task is gone.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            tracing::info!("Live QR view stopped");
        }
    }

    async fn send(&self, command: QrCommand) {
        if self.commands.send(command).await.is_err() {
            tracing::warn!(?command, "Live QR view is no longer running");
        }
    }
}

impl Drop for LiveQrHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Finished request, tagged for the controller.
enum Completion {
    Fetched(FetchTicket, Result<QrCode>),
    Generated(RequestId, Result<QrCode>),
    Deactivated(RequestId, Result<()>),
}

async fn run<B: QrBackend>(
    backend: Arc<B>,
    mut controller: QrController,
    options: LiveQrOptions,
    mut commands: mpsc::Receiver<QrCommand>,
    snapshots: watch::Sender<QrSnapshot>,
) {
    let event_id = controller.event_id();
    let mut pending: FuturesUnordered<BoxFuture<'static, Completion>> = FuturesUnordered::new();
    let mut notice: Option<String> = None;
    let mut fetch_pending = true;

    let mut tick = tokio::time::interval(options.tick_interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut resync = tokio::time::interval_at(
        Instant::now() + options.resync_interval,
        options.resync_interval,
    );
    resync.set_missed_tick_behavior(MissedTickBehavior::Skip);

    pending.push(fetch(&backend, event_id, controller.begin_fetch_active()));

    loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Some(id) = controller.tick(Utc::now()) {
                    pending.push(generate(&backend, event_id, id));
                }
            }
            _ = resync.tick() => {
                if !fetch_pending {
                    fetch_pending = true;
                    pending.push(fetch(&backend, event_id, controller.begin_fetch_active()));
                }
            }
            Some(done) = pending.next(), if !pending.is_empty() => {
                let now = Utc::now();
                let applied = match done {
                    Completion::Fetched(ticket, result) => {
                        fetch_pending = false;
                        controller.apply_fetch_active(ticket, result, now)
                    }
                    Completion::Generated(id, result) => controller.apply_generate(id, result, now),
                    Completion::Deactivated(id, result) => controller.apply_deactivate(id, result),
                };
                match applied {
                    Applied::Failed(e) => notice = Some(e.user_message()),
                    Applied::Updated => notice = None,
                    Applied::Stale => {}
                }
            }
            command = commands.recv() => match command {
                Some(QrCommand::Refresh) => match controller.begin_generate() {
                    Some(id) => pending.push(generate(&backend, event_id, id)),
                    None => notice = Some("A new code is already being generated".to_string()),
                },
                Some(QrCommand::Stop) => {
                    let id = controller.begin_deactivate();
                    pending.push(deactivate(&backend, event_id, id));
                }
                None => {
                    tracing::debug!(event_id, "All live view handles dropped");
                    break;
                }
            },
        }

        publish(&snapshots, &controller, &notice, &options.frontend_url);
    }
}

fn fetch<B: QrBackend>(
    backend: &Arc<B>,
    event_id: Id,
    ticket: FetchTicket,
) -> BoxFuture<'static, Completion> {
    let backend = Arc::clone(backend);
    Box::pin(async move { Completion::Fetched(ticket, backend.fetch_active(event_id).await) })
}

fn generate<B: QrBackend>(
    backend: &Arc<B>,
    event_id: Id,
    id: RequestId,
) -> BoxFuture<'static, Completion> {
    let backend = Arc::clone(backend);
    Box::pin(async move { Completion::Generated(id, backend.generate(event_id).await) })
}

fn deactivate<B: QrBackend>(
    backend: &Arc<B>,
    event_id: Id,
    id: RequestId,
) -> BoxFuture<'static, Completion> {
    let backend = Arc::clone(backend);
    Box::pin(async move {
        let result = match backend.deactivate(event_id).await {
            // Nothing active on the server is the state we asked for.
            Err(e) if e.kind() == ErrorKind::NoActiveResource => Ok(()),
            other => other,
        };
        Completion::Deactivated(id, result)
    })
}

fn publish(
    snapshots: &watch::Sender<QrSnapshot>,
    controller: &QrController,
    notice: &Option<String>,
    frontend_url: &str,
) {
    let next = QrSnapshot {
        event_id: controller.event_id(),
        token: controller.token().map(str::to_string),
        expires_at: controller.expires_at(),
        active: controller.is_active(),
        seconds_remaining: controller.seconds_remaining(),
        scan_url: controller.token().map(|t| scan_url(frontend_url, t)),
        generating: controller.is_generating(),
        notice: notice.clone(),
    };

    snapshots.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}
