use crate::{Client, Error, ErrorContext, Executor, Order, Result, send_value};
use std::{
    collections::{BTreeSet, HashMap},
    env,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::{
    sync::{broadcast, oneshot, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Time between two cycles.
    pub interval: Duration,
    /// Number of most recent orders fetched each cycle.
    pub window: u32,
    /// Store whose orders are followed, every store when `None`.
    pub store_id: Option<Uuid>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            window: 100,
            store_id: None,
        }
    }
}

impl SyncConfig {
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn window(mut self, window: u32) -> Self {
        self.window = window;
        self
    }

    pub fn store_id(mut self, store_id: impl Into<Option<Uuid>>) -> Self {
        self.store_id = store_id.into();
        self
    }

    /// Defaults overridden by `COMANDA_SYNC_INTERVAL_MS` and `COMANDA_SYNC_WINDOW`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(value) = env::var("COMANDA_SYNC_INTERVAL_MS") {
            let millis = value
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid COMANDA_SYNC_INTERVAL_MS `{}`", value))?;
            if millis == 0 {
                return Err(Error::msg("COMANDA_SYNC_INTERVAL_MS must be greater than zero"));
            }
            config.interval = Duration::from_millis(millis);
        }
        if let Ok(value) = env::var("COMANDA_SYNC_WINDOW") {
            config.window = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid COMANDA_SYNC_WINDOW `{}`", value))?;
        }
        Ok(config)
    }
}

/// Last known orders and whether the baseline was established.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncState {
    pub previous: Arc<[Order]>,
    pub primed: bool,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            previous: Arc::new([]),
            primed: false,
        }
    }
}

/// Changes between two consecutive snapshots.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    /// How many more orders the current snapshot has.
    pub new_order_count: usize,
    /// Orders present in both snapshots that became ready.
    pub ready_transitions: BTreeSet<String>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.new_order_count == 0 && self.ready_transitions.is_empty()
    }
}

pub fn diff(previous: &[Order], current: &[Order]) -> Delta {
    let before = previous
        .iter()
        .map(|v| (v.id.as_str(), &v.status))
        .collect::<HashMap<_, _>>();
    Delta {
        new_order_count: current.len().saturating_sub(previous.len()),
        ready_transitions: current
            .iter()
            .filter(|v| v.status.is_ready())
            .filter(|v| before.get(v.id.as_str()).is_some_and(|s| !s.is_ready()))
            .map(|v| v.id.clone())
            .collect(),
    }
}

#[derive(Debug, Clone)]
pub enum SyncEvent {
    NewOrders { count: usize },
    OrdersReady { ids: BTreeSet<String> },
    Failed { error: Arc<Error> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// First successful cycle, the snapshot became the baseline.
    Primed { orders: usize },
    Synced(Delta),
    /// Another cycle was in flight.
    Skipped,
}

struct Inner<E: Executor> {
    client: Client<E>,
    config: SyncConfig,
    state: tokio::sync::Mutex<SyncState>,
    snapshot: watch::Sender<Arc<[Order]>>,
    events: broadcast::Sender<SyncEvent>,
}

impl<E: Executor + 'static> Inner<E> {
    async fn cycle(&self) -> Result<CycleOutcome> {
        let Ok(mut state) = self.state.try_lock() else {
            log::debug!("Order synchronization still in flight, cycle skipped");
            return Ok(CycleOutcome::Skipped);
        };
        let current: Arc<[Order]> = match self
            .client
            .recent_orders(self.config.store_id, self.config.window)
            .await
        {
            Ok(v) => v.into(),
            Err(e) => {
                log::warn!("Order synchronization failed: {:#}", e);
                let message = format!("{:#}", e);
                send_value!(self.events, SyncEvent::Failed { error: Arc::new(e) });
                return Err(Error::msg(message));
            }
        };
        let outcome = if state.primed {
            let delta = diff(&state.previous, &current);
            if delta.new_order_count > 0 {
                send_value!(
                    self.events,
                    SyncEvent::NewOrders {
                        count: delta.new_order_count
                    }
                );
            }
            if !delta.ready_transitions.is_empty() {
                send_value!(
                    self.events,
                    SyncEvent::OrdersReady {
                        ids: delta.ready_transitions.clone()
                    }
                );
            }
            CycleOutcome::Synced(delta)
        } else {
            state.primed = true;
            CycleOutcome::Primed {
                orders: current.len(),
            }
        };
        state.previous = current.clone();
        self.snapshot.send_replace(current);
        Ok(outcome)
    }

    async fn run(self: Arc<Self>, mut stop: oneshot::Receiver<()>) {
        let mut interval =
            tokio::time::interval(self.config.interval.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = interval.tick() => {
                    tokio::select! {
                        _ = &mut stop => break,
                        _ = self.cycle() => {}
                    }
                }
            }
        }
        log::info!("Order synchronization stopped");
    }
}

struct Running {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Keeps a local copy of the most recent orders in line with the store.
///
/// Each cycle fetches the latest orders, compares them with the previous snapshot and
/// publishes the changes as [`SyncEvent`]s. The first successful cycle only sets the
/// baseline. A failed cycle leaves the snapshot untouched, a cycle that starts while
/// another is in flight is skipped.
pub struct OrderSync<E: Executor> {
    inner: Arc<Inner<E>>,
    task: Mutex<Option<Running>>,
}

impl<E: Executor + 'static> OrderSync<E> {
    pub fn new(client: Client<E>, config: SyncConfig) -> Self {
        let (snapshot, _) = watch::channel(Arc::<[Order]>::from([]));
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Inner {
                client,
                config,
                state: Default::default(),
                snapshot,
                events,
            }),
            task: Default::default(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    /// Orders of the last successful cycle, most recent first.
    pub fn snapshot(&self) -> Arc<[Order]> {
        self.inner.snapshot.borrow().clone()
    }

    /// Receiver notified every time a cycle replaces the snapshot.
    pub fn watch(&self) -> watch::Receiver<Arc<[Order]>> {
        self.inner.snapshot.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    /// Copy of the internal state, waits for the cycle in flight if any.
    pub async fn state(&self) -> SyncState {
        self.inner.state.lock().await.clone()
    }

    /// Runs one cycle right away.
    pub async fn sync_now(&self) -> Result<CycleOutcome> {
        self.inner.cycle().await
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|v| !v.handle.is_finished())
    }

    /// Spawns the periodic loop on the current tokio runtime, no effect if already running.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.as_ref().is_some_and(|v| !v.handle.is_finished()) {
            return;
        }
        let (stop, receiver) = oneshot::channel();
        let handle = tokio::spawn(self.inner.clone().run(receiver));
        log::info!(
            "Order synchronization started, every {:?} over the last {} orders",
            self.inner.config.interval,
            self.inner.config.window
        );
        *task = Some(Running { stop, handle });
    }

    /// Stops the loop, interrupting the cycle in flight, and waits for it to exit.
    pub async fn stop(&self) {
        let running = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(Running { stop, handle }) = running {
            let _ = stop.send(());
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    log::error!("Order synchronization task failed: {}", e);
                }
            }
        }
    }
}

impl<E: Executor> Drop for OrderSync<E> {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(running) = task.take() {
            running.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderStatus;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: id.into(),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn new_and_ready() {
        let previous = [order("1", OrderStatus::Preparing)];
        let current = [
            order("2", OrderStatus::Received),
            order("1", OrderStatus::Ready),
        ];
        let delta = diff(&previous, &current);
        assert_eq!(delta.new_order_count, 1);
        assert_eq!(delta.ready_transitions, BTreeSet::from(["1".to_string()]));
    }

    #[test]
    fn ready_needs_a_previous_non_ready() {
        let previous = [order("1", OrderStatus::Ready)];
        let current = [
            order("3", OrderStatus::Ready),
            order("1", OrderStatus::Ready),
        ];
        let delta = diff(&previous, &current);
        assert_eq!(delta.new_order_count, 1);
        assert!(delta.ready_transitions.is_empty());
    }

    #[test]
    fn shrinking_window() {
        let previous = [
            order("2", OrderStatus::Received),
            order("1", OrderStatus::Canceled),
        ];
        let current = [order("2", OrderStatus::Ready)];
        let delta = diff(&previous, &current);
        assert_eq!(delta.new_order_count, 0);
        assert_eq!(delta.ready_transitions, BTreeSet::from(["2".to_string()]));
        assert!(!delta.is_empty());
        assert!(diff(&current, &current).is_empty());
    }

    #[test]
    fn config_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.window, 100);
        let config = config
            .interval(Duration::from_millis(250))
            .window(20)
            .store_id(Uuid::nil());
        assert_eq!(config.interval, Duration::from_millis(250));
        assert_eq!(config.window, 20);
        assert_eq!(config.store_id, Some(Uuid::nil()));
    }
}
