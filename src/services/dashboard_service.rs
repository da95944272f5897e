//! Client-side orchestration of the surge dashboard.
//!
//! [`DashboardService`] owns one cache record per [`Group`], the active
//! group, the global loading/refreshing/error state, the ticker search state
//! and the auto-refresh timer. Every operation is an `async fn` that finishes
//! when its request resolves; callers that do not want to wait spawn it.
//!
//! Ordering rules:
//! - Results are always written to the group the request was issued for,
//!   never to whichever group is active when it completes.
//! - Within a group the most recently *issued* request owns the prediction
//!   fields; older stragglers are discarded. Scan info only ever comes from
//!   a forced refresh.
//! - Searches never touch group state and vice versa.
//! - After [`shutdown`](DashboardService::shutdown) nothing is written.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::DashboardSettings;
use crate::external::prediction_api::PredictionApi;
use crate::models::{Group, ScanInfo, SummaryStats};
use crate::services::auto_refresh::AutoRefreshTimer;
use crate::services::group_cache::{GroupCache, GroupSnapshot};
use crate::services::search::{normalize_ticker, SearchRecord, SearchState};

/// Counts one in-flight operation for as long as it is alive, so the flag is
/// released on every exit path.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

struct Inner {
    api: Arc<dyn PredictionApi>,
    settings: DashboardSettings,
    active: RwLock<Group>,
    cache: GroupCache,
    loading: AtomicUsize,
    refreshing: AtomicUsize,
    searching: AtomicUsize,
    error: Mutex<Option<String>>,
    search: Mutex<SearchRecord>,
    timer: AutoRefreshTimer,
    disposed: AtomicBool,
}

#[derive(Clone)]
pub struct DashboardService {
    inner: Arc<Inner>,
}

/// Compact per-group line for tabs
#[derive(Debug, Clone, Serialize)]
pub struct GroupOverview {
    pub group: Group,
    pub label: &'static str,
    pub loaded: bool,
    pub prediction_count: usize,
    pub stats: SummaryStats,
    pub last_update: Option<DateTime<Utc>>,
}

/// Everything the presentation layer needs for one render
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub active_group: Group,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
    pub active: GroupSnapshot,
    pub groups: Vec<GroupOverview>,
    pub searching: bool,
    pub search: SearchState,
}

impl DashboardService {
    pub fn new(api: Arc<dyn PredictionApi>, settings: DashboardSettings) -> Self {
        let active = settings.initial_group;
        Self {
            inner: Arc::new(Inner {
                api,
                settings,
                active: RwLock::new(active),
                cache: GroupCache::new(),
                loading: AtomicUsize::new(0),
                refreshing: AtomicUsize::new(0),
                searching: AtomicUsize::new(0),
                error: Mutex::new(None),
                search: Mutex::new(SearchRecord::default()),
                timer: AutoRefreshTimer::new(),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    /// Arms the auto-refresh timer and kicks off the first load of the
    /// active group. Must be called from within a tokio runtime.
    pub fn start(&self) -> JoinHandle<()> {
        let group = self.active_group();
        info!("🚀 Starting dashboard on {} ({})", group.label(), group);
        self.arm_auto_refresh();

        let service = self.clone();
        tokio::spawn(async move { service.load_group(group).await })
    }

    /// Stops the timer. Requests still in flight finish but their results
    /// are dropped.
    pub fn shutdown(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.timer.cancel();
        info!("🛑 Dashboard shut down");
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    pub fn active_group(&self) -> Group {
        *self.inner.active.read()
    }

    /// Switch tabs: the other groups keep their cached data, the timer is
    /// re-pointed at the new group and a load is issued for it.
    pub async fn select_group(&self, group: Group) {
        if self.switch_to(group) {
            self.load_group(group).await;
        }
    }

    /// The synchronous half of [`select_group`](Self::select_group): make
    /// `group` active and re-arm the timer, without loading. Returns false
    /// after shutdown.
    pub fn switch_to(&self, group: Group) -> bool {
        if self.is_disposed() {
            return false;
        }
        *self.inner.active.write() = group;
        info!("📂 Selected group {}", group);
        self.arm_auto_refresh();
        true
    }

    /// Plain, cache-preferring load. Failures are never surfaced: with no
    /// prior data the group stays empty, otherwise the last good snapshot
    /// stays on screen.
    pub async fn load_group(&self, group: Group) {
        if self.is_disposed() {
            return;
        }
        let _loading = InFlight::enter(&self.inner.loading);
        self.inner.error.lock().take();

        let ticket = self.inner.cache.issue_ticket(group);
        let settings = &self.inner.settings;
        let result = self
            .inner
            .api
            .list_predictions(group, settings.prediction_limit, settings.min_score)
            .await;

        if self.is_disposed() {
            debug!("Dropping load result for {} after shutdown", group);
            return;
        }

        match result {
            Ok(resp) => {
                let count = resp.predictions.len();
                let applied = self
                    .inner
                    .cache
                    .update(group, |record| record.apply_load(ticket, resp, Utc::now()));
                if applied {
                    info!("✓ Loaded {} predictions for {}", count, group);
                } else {
                    debug!("Discarded superseded load for {} ({:?})", group, ticket);
                }
            }
            Err(e) => {
                if self.inner.cache.read(group, |r| r.is_loaded()) {
                    warn!("Load for {} failed, keeping last snapshot: {}", group, e);
                } else {
                    info!("No data yet for {}: {}", group, e);
                }
            }
        }
    }

    /// Forced rescan of the active group. A failure leaves the cached data
    /// alone and raises the global error banner.
    pub async fn force_refresh(&self) {
        if self.is_disposed() {
            return;
        }
        let group = self.active_group();
        let _refreshing = InFlight::enter(&self.inner.refreshing);
        self.inner.error.lock().take();

        let ticket = self.inner.cache.issue_ticket(group);
        let result = self
            .inner
            .api
            .force_refresh(group, self.inner.settings.refresh_workers)
            .await;

        if self.is_disposed() {
            debug!("Dropping refresh result for {} after shutdown", group);
            return;
        }

        match result {
            Ok(resp) => {
                if let Some(scan) = &resp.scan_info {
                    info!(
                        "✓ Refreshed {}: {} analyzed, {} failed of {} candidates in {:.1}s",
                        group, scan.analyzed, scan.failed, scan.total_candidates, scan.elapsed_seconds
                    );
                }
                let applied = self
                    .inner
                    .cache
                    .update(group, |record| record.apply_refresh(ticket, resp, Utc::now()));
                if !applied {
                    debug!("Refresh for {} completed after a newer request; predictions kept", group);
                }
            }
            Err(e) => {
                warn!("❌ Refresh for {} failed: {}", group, e);
                *self.inner.error.lock() = Some(format!(
                    "Refreshing {} failed ({}). Rescanning a large universe can take several minutes; please try again shortly.",
                    group.label(),
                    e
                ));
            }
        }
    }

    /// Analyze one ticker on demand. Blank input is ignored.
    pub async fn search(&self, raw: &str) {
        if self.is_disposed() {
            return;
        }
        let Some(ticker) = normalize_ticker(raw) else {
            return;
        };
        let _searching = InFlight::enter(&self.inner.searching);
        let ticket = self.inner.search.lock().begin(&ticker);

        let result = self.inner.api.analyze_ticker(&ticker).await;

        if self.is_disposed() {
            return;
        }

        let mut search = self.inner.search.lock();
        match result {
            Ok(prediction) => {
                if search.complete(ticket, prediction) {
                    info!("🔍 Search result for {}", ticker);
                }
            }
            Err(e) => {
                let message = if e.is_not_found() {
                    format!("No analysis available for {}", ticker)
                } else {
                    format!("Failed to analyze {}: {}", ticker, e)
                };
                if search.fail(ticket, message) {
                    warn!("Search for {} failed: {}", ticker, e);
                }
            }
        }
    }

    pub fn clear_search(&self) {
        self.inner.search.lock().clear();
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst) > 0
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.refreshing.load(Ordering::SeqCst) > 0
    }

    pub fn is_searching(&self) -> bool {
        self.inner.searching.load(Ordering::SeqCst) > 0
    }

    pub fn error(&self) -> Option<String> {
        self.inner.error.lock().clone()
    }

    pub fn search_state(&self) -> SearchState {
        self.inner.search.lock().state().clone()
    }

    pub fn group_snapshot(&self, group: Group) -> GroupSnapshot {
        self.inner.cache.snapshot(group)
    }

    pub fn effective_stats(&self, group: Group) -> SummaryStats {
        self.inner.cache.read(group, |r| r.effective_stats())
    }

    pub fn scan_info(&self, group: Group) -> Option<ScanInfo> {
        self.inner.cache.read(group, |r| r.scan_info().cloned())
    }

    pub fn has_auto_refresh_timer(&self) -> bool {
        self.inner.timer.is_armed()
    }

    pub fn timer_generation(&self) -> u64 {
        self.inner.timer.generation()
    }

    pub fn view(&self) -> DashboardView {
        let active_group = self.active_group();
        let groups = Group::ALL
            .iter()
            .map(|&group| {
                self.inner.cache.read(group, |r| GroupOverview {
                    group,
                    label: group.label(),
                    loaded: r.is_loaded(),
                    prediction_count: r.predictions().len(),
                    stats: r.effective_stats(),
                    last_update: r.last_update(),
                })
            })
            .collect();

        DashboardView {
            active_group,
            loading: self.is_loading(),
            refreshing: self.is_refreshing(),
            error: self.error(),
            active: self.group_snapshot(active_group),
            groups,
            searching: self.is_searching(),
            search: self.search_state(),
        }
    }

    fn arm_auto_refresh(&self) {
        // The timer holds a weak handle and reads the active group at fire
        // time, so one timer serves whichever tab is current.
        let weak = Arc::downgrade(&self.inner);
        self.inner
            .timer
            .arm(self.inner.settings.auto_refresh_period, move || {
                let Some(inner) = weak.upgrade() else {
                    return false;
                };
                let service = DashboardService { inner };
                if service.is_disposed() {
                    return false;
                }
                let group = service.active_group();
                debug!("⏰ Auto-refresh tick for {}", group);
                tokio::spawn(async move { service.load_group(group).await });
                true
            });

        // shutdown() may have run between the caller's disposed check and
        // the arm above; its cancel() then missed this timer.
        if self.is_disposed() {
            self.inner.timer.cancel();
        }
    }
}
