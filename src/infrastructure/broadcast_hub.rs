use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

use crate::domain::alert::Alert;

type SubscriberId = u64;

struct Subscriber {
    id: SubscriberId,
    sink: mpsc::Sender<Alert>,
}

/// Publish point feeding live subscribers and, separately, the notifier
/// fanout. Subscriber set is behind a lock held only for pointer-level work;
/// sends happen outside the lock so one slow subscriber can't stall others.
/// Generalizes the teacher's synchronous `EventBus` listener callback into a
/// per-subscriber channel with detach-on-send-error, matching the original
/// server's WebSocketManager pruning behavior.
pub struct BroadcastHub {
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
    history: RwLock<VecDeque<Alert>>,
    history_capacity: usize,
}

impl BroadcastHub {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            history: RwLock::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
        }
    }

    /// Attaches a new subscriber and returns its handle plus the receiving
    /// end the caller should forward to its transport (e.g. a websocket).
    pub async fn attach(&self) -> (SubscriberHandle, mpsc::Receiver<Alert>) {
        let (tx, rx) = mpsc::channel(128);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.write().await.push(Subscriber { id, sink: tx });
        (SubscriberHandle { id }, rx)
    }

    pub async fn detach(&self, handle: &SubscriberHandle) {
        let mut subs = self.subscribers.write().await;
        subs.retain(|s| s.id != handle.id);
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    pub async fn recent(&self, limit: usize) -> Vec<Alert> {
        let history = self.history.read().await;
        history.iter().take(limit).cloned().collect()
    }

    pub async fn history_len(&self) -> usize {
        self.history.read().await.len()
    }

    /// Sends to every subscriber attached at snapshot time. A subscriber
    /// whose channel is closed or full is detached rather than awaited on,
    /// so one slow subscriber can't stall the others. Also pushes into the
    /// newest-first recent-history ring.
    pub async fn broadcast(&self, alert: Alert) {
        {
            let mut history = self.history.write().await;
            history.push_front(alert.clone());
            while history.len() > self.history_capacity {
                history.pop_back();
            }
        }

        let snapshot: Vec<(SubscriberId, mpsc::Sender<Alert>)> = {
            let subs = self.subscribers.read().await;
            subs.iter().map(|s| (s.id, s.sink.clone())).collect()
        };

        let mut dead = Vec::new();
        for (id, sink) in snapshot {
            match sink.try_send(alert.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(subscriber = id, "subscriber queue full, detaching");
                    dead.push(id);
                }
                Err(TrySendError::Closed(_)) => dead.push(id),
            }
        }

        if !dead.is_empty() {
            let mut subs = self.subscribers.write().await;
            subs.retain(|s| !dead.contains(&s.id));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberHandle {
    id: SubscriberId,
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(100)
    }
}
