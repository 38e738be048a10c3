//! Online/offline status tracking
//!
//! The platform layer (browser events, OS reachability, a CLI flag) feeds
//! transitions in via `set_status`; the UI and the sync engine observe them
//! through `subscribe`. Purely event-driven, no polling; the only
//! synchronous read is the initial state at construction.

use std::sync::Arc;

use tokio::sync::watch;

/// Observed network state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Online,
    Offline,
}

impl NetworkStatus {
    #[must_use]
    pub const fn from_online(online: bool) -> Self {
        if online {
            Self::Online
        } else {
            Self::Offline
        }
    }
}

/// Cloneable handle to the shared connectivity state
#[derive(Clone)]
pub struct ConnectivityMonitor {
    sender: Arc<watch::Sender<NetworkStatus>>,
}

impl ConnectivityMonitor {
    /// Create a monitor seeded with the platform's initial state
    #[must_use]
    pub fn new(initial: NetworkStatus) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Last observed state
    #[must_use]
    pub fn current_status(&self) -> NetworkStatus {
        *self.sender.borrow()
    }

    /// True when the last observed state is online
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.current_status() == NetworkStatus::Online
    }

    /// Record a platform transition event
    ///
    /// Subscribers are notified only when the state actually changes;
    /// repeated events for the current state are ignored.
    pub fn set_status(&self, status: NetworkStatus) {
        let changed = self.sender.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            *current = status;
            true
        });

        if changed {
            match status {
                NetworkStatus::Online => tracing::info!("Network: online"),
                NetworkStatus::Offline => tracing::warn!("Network: offline"),
            }
        }
    }

    pub fn set_online(&self) {
        self.set_status(NetworkStatus::Online);
    }

    pub fn set_offline(&self) {
        self.set_status(NetworkStatus::Offline);
    }

    /// Subscribe to state-change notifications
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NetworkStatus> {
        self.sender.subscribe()
    }
}
