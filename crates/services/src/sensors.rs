//! Device status sensors: location permission/service state and connectivity.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sheguard_core::model::{ConnectivityEvent, LocationPermission};
use tokio::net::{TcpStream, UdpSocket};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::SensorError;

#[async_trait]
pub trait LocationSensor: Send + Sync {
    /// # Errors
    ///
    /// Returns `SensorError` if the permission state cannot be read.
    async fn permission(&self) -> Result<LocationPermission, SensorError>;

    /// # Errors
    ///
    /// Returns `SensorError` if the service state cannot be read.
    async fn service_enabled(&self) -> Result<bool, SensorError>;
}

/// Push-based connectivity source.
pub trait ConnectivitySensor: Send + Sync {
    fn subscribe(&self) -> ConnectivityFeed;
}

/// One subscriber's view of a connectivity source: the current state first,
/// then every change in source order. Bursts may coalesce to the latest event.
/// Dropping the feed unsubscribes.
pub struct ConnectivityFeed {
    rx: watch::Receiver<ConnectivityEvent>,
    delivered_initial: bool,
}

impl ConnectivityFeed {
    #[must_use]
    pub fn new(rx: watch::Receiver<ConnectivityEvent>) -> Self {
        Self {
            rx,
            delivered_initial: false,
        }
    }

    /// Next event, or `None` once the source is gone.
    pub async fn next(&mut self) -> Option<ConnectivityEvent> {
        if self.delivered_initial {
            self.rx.changed().await.ok()?;
        }
        self.delivered_initial = true;
        Some(*self.rx.borrow_and_update())
    }
}

/// Location sensor with externally set state.
#[derive(Default)]
pub struct StaticLocationSensor {
    state: Mutex<StaticLocationState>,
}

#[derive(Default, Clone, Copy)]
struct StaticLocationState {
    permission: LocationPermission,
    service_enabled: bool,
    failing: bool,
}

impl StaticLocationSensor {
    #[must_use]
    pub fn new(permission: LocationPermission, service_enabled: bool) -> Self {
        Self {
            state: Mutex::new(StaticLocationState {
                permission,
                service_enabled,
                failing: false,
            }),
        }
    }

    pub fn set_permission(&self, permission: LocationPermission) {
        self.update(|s| s.permission = permission);
    }

    pub fn set_service_enabled(&self, enabled: bool) {
        self.update(|s| s.service_enabled = enabled);
    }

    /// Make every read fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.update(|s| s.failing = failing);
    }

    fn update(&self, f: impl FnOnce(&mut StaticLocationState)) {
        if let Ok(mut guard) = self.state.lock() {
            f(&mut guard);
        }
    }

    fn read(&self) -> Result<StaticLocationState, SensorError> {
        let state = *self
            .state
            .lock()
            .map_err(|e| SensorError::Unavailable(e.to_string()))?;
        if state.failing {
            return Err(SensorError::Unavailable("location provider not responding".into()));
        }
        Ok(state)
    }
}

#[async_trait]
impl LocationSensor for StaticLocationSensor {
    async fn permission(&self) -> Result<LocationPermission, SensorError> {
        self.read().map(|s| s.permission)
    }

    async fn service_enabled(&self) -> Result<bool, SensorError> {
        self.read().map(|s| s.service_enabled)
    }
}

/// Connectivity source driven by hand.
pub struct ManualConnectivity {
    tx: watch::Sender<ConnectivityEvent>,
}

impl ManualConnectivity {
    #[must_use]
    pub fn new(initial: ConnectivityEvent) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn set(&self, event: ConnectivityEvent) {
        self.tx.send_replace(event);
    }

    /// Number of live feeds.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl ConnectivitySensor for ManualConnectivity {
    fn subscribe(&self) -> ConnectivityFeed {
        ConnectivityFeed::new(self.tx.subscribe())
    }
}

/// Connectivity source that periodically checks for a route and a TCP
/// connection to `target`, publishing only on change.
pub struct ReachabilitySensor {
    tx: watch::Sender<ConnectivityEvent>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ReachabilitySensor {
    /// Start checking. Must be called inside a tokio runtime.
    #[must_use]
    pub fn start(target: String, interval: Duration, timeout: Duration) -> Arc<Self> {
        let (tx, _) = watch::channel(ConnectivityEvent {
            is_connected: false,
            is_internet_reachable: None,
        });
        let sensor = Arc::new(Self {
            tx: tx.clone(),
            task: Mutex::new(None),
        });
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let event = check_reachability(&target, timeout).await;
                tx.send_if_modified(|current| {
                    if *current == event {
                        return false;
                    }
                    tracing::info!(online = event.is_online(), "connectivity changed");
                    *current = event;
                    true
                });
            }
        });
        if let Ok(mut guard) = sensor.task.lock() {
            *guard = Some(handle);
        }
        sensor
    }
}

impl ConnectivitySensor for ReachabilitySensor {
    fn subscribe(&self) -> ConnectivityFeed {
        ConnectivityFeed::new(self.tx.subscribe())
    }
}

impl Drop for ReachabilitySensor {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.task.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

async fn check_reachability(target: &str, timeout: Duration) -> ConnectivityEvent {
    // A UDP connect only resolves a route; nothing is sent.
    let has_route = match UdpSocket::bind("0.0.0.0:0").await {
        Ok(socket) => socket.connect(target).await.is_ok(),
        Err(_) => false,
    };
    if !has_route {
        return ConnectivityEvent {
            is_connected: false,
            is_internet_reachable: Some(false),
        };
    }
    let reachable = matches!(
        tokio::time::timeout(timeout, TcpStream::connect(target)).await,
        Ok(Ok(_))
    );
    tracing::debug!(host = target, reachable, "reachability check");
    ConnectivityEvent {
        is_connected: true,
        is_internet_reachable: Some(reachable),
    }
}
