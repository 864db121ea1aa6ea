//! Readiness snapshot aggregation over the network, location and contacts feeds.
//!
//! All three feeds run inside one scope. Re-binding the identity tears the
//! whole scope down before the next one starts, and every write is tagged
//! with the generation of the scope that produced it so a late write from a
//! torn-down scope is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use sheguard_core::model::{
    DocPath, OnboardingStatus, ReadinessSnapshot, Session, UserIdentity, location_enabled,
};
use storage::repository::DocumentStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ShellConfig;
use crate::contacts::contacts_configured;
use crate::error::SensorError;
use crate::sensors::{ConnectivityFeed, ConnectivitySensor, LocationSensor};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusConfig {
    pub app_id: String,
    pub location_poll_interval: Duration,
}

impl From<&ShellConfig> for StatusConfig {
    fn from(config: &ShellConfig) -> Self {
        Self {
            app_id: config.app_id.clone(),
            location_poll_interval: config.location_poll_interval,
        }
    }
}

struct StatusScope {
    generation: u64,
    tasks: Vec<JoinHandle<()>>,
}

impl Drop for StatusScope {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        tracing::debug!(generation = self.generation, "status scope released");
    }
}

/// Write access to the snapshot for one scope generation.
#[derive(Clone)]
struct ScopedWriter {
    generation: u64,
    current: Arc<AtomicU64>,
    snapshot: watch::Sender<ReadinessSnapshot>,
}

impl ScopedWriter {
    fn update(&self, apply: impl FnOnce(&mut ReadinessSnapshot)) -> bool {
        self.snapshot.send_if_modified(|snapshot| {
            if self.current.load(Ordering::Acquire) != self.generation {
                return false;
            }
            let before = *snapshot;
            apply(snapshot);
            *snapshot != before
        })
    }
}

pub struct StatusAggregator {
    location: Arc<dyn LocationSensor>,
    connectivity: Arc<dyn ConnectivitySensor>,
    documents: Arc<dyn DocumentStore>,
    config: StatusConfig,
    snapshot: watch::Sender<ReadinessSnapshot>,
    generation: Arc<AtomicU64>,
    scope: Mutex<Option<StatusScope>>,
    follower: Mutex<Option<JoinHandle<()>>>,
}

impl StatusAggregator {
    #[must_use]
    pub fn new(
        location: Arc<dyn LocationSensor>,
        connectivity: Arc<dyn ConnectivitySensor>,
        documents: Arc<dyn DocumentStore>,
        config: StatusConfig,
    ) -> Self {
        let (snapshot, _) = watch::channel(ReadinessSnapshot::default());
        Self {
            location,
            connectivity,
            documents,
            config,
            snapshot,
            generation: Arc::new(AtomicU64::new(0)),
            scope: Mutex::new(None),
            follower: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ReadinessSnapshot> {
        self.snapshot.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> ReadinessSnapshot {
        *self.snapshot.borrow()
    }

    /// Tear down the current scope and start a new one for `identity`.
    ///
    /// `contacts_configured` is reset to false before this returns. The
    /// contacts feed only runs for registered identities. Must be called
    /// inside a tokio runtime.
    pub fn bind_identity(&self, identity: Option<&UserIdentity>) {
        let Ok(mut scope) = self.scope.lock() else {
            return;
        };
        drop(scope.take());

        let mut generation = 0;
        self.snapshot.send_if_modified(|snapshot| {
            generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            let changed = snapshot.contacts_configured;
            snapshot.contacts_configured = false;
            changed
        });
        let writer = ScopedWriter {
            generation,
            current: Arc::clone(&self.generation),
            snapshot: self.snapshot.clone(),
        };

        let mut tasks = vec![
            tokio::spawn(watch_network(self.connectivity.subscribe(), writer.clone())),
            tokio::spawn(poll_location(
                Arc::clone(&self.location),
                self.config.location_poll_interval,
                writer.clone(),
            )),
        ];

        if let Some(identity) = identity.filter(|id| id.is_registered()) {
            match DocPath::emergency_contacts(&self.config.app_id, identity.uid()) {
                Ok(path) => tasks.push(tokio::spawn(watch_contacts(
                    Arc::clone(&self.documents),
                    path,
                    writer,
                ))),
                Err(err) => tracing::warn!(error = %err, "cannot track contacts for user"),
            }
        }

        tracing::info!(
            generation,
            uid = ?identity.map(UserIdentity::uid),
            "status tracking bound"
        );
        *scope = Some(StatusScope { generation, tasks });
    }

    /// Re-bind whenever the session's identity changes. Replaces any previous
    /// follower. Must be called inside a tokio runtime.
    pub fn follow(self: &Arc<Self>, sessions: watch::Receiver<Session>) {
        let handle = tokio::spawn(follow_sessions(Arc::downgrade(self), sessions));
        self.replace_follower(handle);
    }

    /// Like [`StatusAggregator::follow`], but nothing is tracked until the
    /// onboarding gate has left `Checking`. If the gate goes away first,
    /// tracking never starts.
    pub fn follow_after_gate(
        self: &Arc<Self>,
        mut gate: watch::Receiver<OnboardingStatus>,
        sessions: watch::Receiver<Session>,
    ) {
        let this = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            let resolved = gate
                .wait_for(|status| *status != OnboardingStatus::Checking)
                .await
                .map(|status| *status);
            match resolved {
                Ok(status) => {
                    tracing::debug!(?status, "onboarding gate resolved; starting status tracking");
                    follow_sessions(this, sessions).await;
                }
                Err(_) => tracing::debug!("onboarding gate dropped before resolving"),
            }
        });
        self.replace_follower(handle);
    }

    fn replace_follower(&self, handle: JoinHandle<()>) {
        if let Ok(mut follower) = self.follower.lock() {
            if let Some(previous) = follower.replace(handle) {
                previous.abort();
            }
        }
    }

    /// Release every feed. The last snapshot stays readable.
    pub fn shutdown(&self) {
        if let Ok(mut follower) = self.follower.lock() {
            if let Some(handle) = follower.take() {
                handle.abort();
            }
        }
        if let Ok(mut scope) = self.scope.lock() {
            drop(scope.take());
        }
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

impl Drop for StatusAggregator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn follow_sessions(this: Weak<StatusAggregator>, mut sessions: watch::Receiver<Session>) {
    let mut bound: Option<Option<UserIdentity>> = None;
    loop {
        let identity = sessions.borrow_and_update().identity.clone();
        if bound.as_ref() != Some(&identity) {
            let Some(aggregator) = this.upgrade() else {
                break;
            };
            aggregator.bind_identity(identity.as_ref());
            bound = Some(identity);
        }
        if sessions.changed().await.is_err() {
            break;
        }
    }
}

async fn watch_network(mut feed: ConnectivityFeed, writer: ScopedWriter) {
    while let Some(event) = feed.next().await {
        let online = event.is_online();
        writer.update(|s| s.network_online = online);
    }
}

async fn poll_location(sensor: Arc<dyn LocationSensor>, every: Duration, writer: ScopedWriter) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match read_location(sensor.as_ref()).await {
            Ok(enabled) => {
                writer.update(|s| s.location_enabled = enabled);
            }
            Err(err) => tracing::debug!(error = %err, "location poll failed; keeping last value"),
        }
    }
}

async fn read_location(sensor: &dyn LocationSensor) -> Result<bool, SensorError> {
    let permission = sensor.permission().await?;
    let service = sensor.service_enabled().await?;
    Ok(location_enabled(permission, service))
}

async fn watch_contacts(documents: Arc<dyn DocumentStore>, path: DocPath, writer: ScopedWriter) {
    let mut subscription = match documents.subscribe(&path).await {
        Ok(subscription) => subscription,
        Err(err) => {
            tracing::warn!(error = %err, %path, "contacts subscription failed");
            return;
        }
    };
    while let Some(delivery) = subscription.next().await {
        match delivery {
            Ok(snapshot) => {
                let configured = contacts_configured(&snapshot);
                writer.update(|s| s.contacts_configured = configured);
            }
            Err(err) => tracing::warn!(error = %err, %path, "contacts read failed; keeping last value"),
        }
    }
}
