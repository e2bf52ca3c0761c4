// Redraw coordination: many producers (input callbacks, sampler ticks, a
// safety-net timer) collapse into one wake-up for the render loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, mpsc};
use tokio::time::Instant;

/// Which widgets a data update concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// cpu / memory / thermal / fan series.
    Metrics,
    /// clock / network / battery text.
    Status,
}

/// Why the render loop woke up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Trigger,
    Updated(Topic),
    Timeout,
}

/// Per-topic "data updated" notifications. Repeated notifications before
/// the render loop gets to them coalesce into one.
#[derive(Debug, Default)]
pub struct Updates {
    metrics: Notify,
    status: Notify,
}

impl Updates {
    pub fn notify(&self, topic: Topic) {
        self.get(topic).notify_one();
    }

    fn get(&self, topic: Topic) -> &Notify {
        match topic {
            Topic::Metrics => &self.metrics,
            Topic::Status => &self.status,
        }
    }
}

/// Cheap handle for anything outside the render loop that wants a redraw.
#[derive(Debug, Clone)]
pub struct RedrawTrigger {
    tx: mpsc::Sender<()>,
    threshold: usize,
}

impl RedrawTrigger {
    /// Never blocks. The trigger is dropped once half the queue is taken;
    /// returns whether it was queued.
    pub fn trigger(&self) -> bool {
        if self.pending() >= self.threshold {
            return false;
        }
        self.tx.try_send(()).is_ok()
    }

    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }
}

pub struct RedrawCoordinator {
    rx: mpsc::Receiver<()>,
    trigger: RedrawTrigger,
    updates: Arc<Updates>,
    max_delay: Duration,
    deadline: Instant,
}

impl RedrawCoordinator {
    /// `capacity` below 2 is raised to 2 so the half-full rule leaves room for one trigger.
    pub fn new(capacity: usize, max_delay: Duration) -> Self {
        let capacity = capacity.max(2);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            rx,
            trigger: RedrawTrigger {
                tx,
                threshold: capacity / 2,
            },
            updates: Arc::new(Updates::default()),
            max_delay,
            deadline: Instant::now() + max_delay,
        }
    }

    pub fn trigger_handle(&self) -> RedrawTrigger {
        self.trigger.clone()
    }

    pub fn updates(&self) -> Arc<Updates> {
        self.updates.clone()
    }

    /// Suspends until a queued trigger, a topic update, or the max delay
    /// since the previous wake. Queued triggers are drained together.
    pub async fn wait(&mut self) -> Wake {
        let wake = tokio::select! {
            Some(()) = self.rx.recv() => Wake::Trigger,
            _ = self.updates.metrics.notified() => Wake::Updated(Topic::Metrics),
            _ = self.updates.status.notified() => Wake::Updated(Topic::Status),
            _ = tokio::time::sleep_until(self.deadline) => Wake::Timeout,
        };
        if wake == Wake::Trigger {
            while self.rx.try_recv().is_ok() {}
        }
        self.deadline = Instant::now() + self.max_delay;
        wake
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn flood_of_triggers_is_capped_at_half_capacity() {
        let mut coordinator = RedrawCoordinator::new(10, Duration::from_secs(20));
        let trigger = coordinator.trigger_handle();
        let queued = (0..100).filter(|_| trigger.trigger()).count();
        assert_eq!(queued, 5);
        assert_eq!(trigger.pending(), 5);

        assert_eq!(coordinator.wait().await, Wake::Trigger);
        assert_eq!(trigger.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_without_signals() {
        let mut coordinator = RedrawCoordinator::new(10, Duration::from_secs(20));
        let start = Instant::now();
        assert_eq!(coordinator.wait().await, Wake::Timeout);
        assert!(start.elapsed() >= Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_updates_coalesce() {
        let mut coordinator = RedrawCoordinator::new(10, Duration::from_secs(20));
        let updates = coordinator.updates();
        updates.notify(Topic::Status);
        updates.notify(Topic::Status);
        assert_eq!(coordinator.wait().await, Wake::Updated(Topic::Status));
        assert_eq!(coordinator.wait().await, Wake::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn update_from_another_task_wakes_the_loop() {
        let mut coordinator = RedrawCoordinator::new(4, Duration::from_secs(20));
        let updates = coordinator.updates();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            updates.notify(Topic::Metrics);
        });
        assert_eq!(coordinator.wait().await, Wake::Updated(Topic::Metrics));
    }
}
