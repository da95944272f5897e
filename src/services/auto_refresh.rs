use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::debug;

/// A single repeating timer. Re-arming replaces the running task, so at most
/// one is ever scheduled. Dropping the timer cancels it.
pub struct AutoRefreshTimer {
    handle: Mutex<Option<JoinHandle<()>>>,
    generation: AtomicU64,
}

impl AutoRefreshTimer {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Cancel any running timer and start a new one that calls `on_tick`
    /// every `period` (first call one full period from now). The timer stops
    /// itself when `on_tick` returns false.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm<F>(&self, period: Duration, mut on_tick: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let mut slot = self.handle.lock();
        if let Some(old) = slot.take() {
            old.abort();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("⏰ Arming auto-refresh timer #{} every {:?}", generation, period);

        *slot = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !on_tick() {
                    debug!("⏰ Auto-refresh timer #{} stopped", generation);
                    break;
                }
            }
        }));
    }

    pub fn cancel(&self) {
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// How many times the timer has been (re)armed
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl Default for AutoRefreshTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AutoRefreshTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.get_mut().take() {
            handle.abort();
        }
    }
}
