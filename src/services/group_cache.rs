use std::sync::Arc;
use chrono::{DateTime, Local, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::models::{Group, PredictionsResponse, ScanInfo, StockPrediction, SummaryStats};

/// Issuance order of a request against one group. Loads and refreshes of the
/// same group draw from the same counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Last-known state of one group for the current session
#[derive(Debug, Clone, Default)]
pub struct GroupCacheRecord {
    predictions: Vec<StockPrediction>,
    stats: Option<SummaryStats>,
    scan_info: Option<ScanInfo>,
    total_analyzed: usize,
    last_update: Option<DateTime<Utc>>,
    loaded: bool,
    message: Option<String>,

    issued: u64,
    applied: u64,
    scan_applied: u64,
}

impl GroupCacheRecord {
    pub fn issue_ticket(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Merge a plain-load response. Returns false when a newer request has
    /// already been applied and this response was discarded.
    ///
    /// Scan info is never touched by a plain load.
    pub fn apply_load(
        &mut self,
        ticket: RequestTicket,
        resp: PredictionsResponse,
        now: DateTime<Utc>,
    ) -> bool {
        self.loaded = true;
        if ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;

        self.total_analyzed = resp.total_analyzed.unwrap_or(resp.predictions.len());
        self.stats = resp.stats;
        self.predictions = resp.predictions;
        self.message = resp.message;
        self.last_update = Some(now);
        true
    }

    /// Merge a forced-refresh response. The scan info is taken whenever this
    /// is the newest refresh to complete; predictions follow the same
    /// last-issued rule as [`apply_load`](Self::apply_load).
    pub fn apply_refresh(
        &mut self,
        ticket: RequestTicket,
        resp: PredictionsResponse,
        now: DateTime<Utc>,
    ) -> bool {
        self.loaded = true;
        if ticket.0 > self.scan_applied {
            if let Some(scan) = &resp.scan_info {
                self.scan_info = Some(scan.clone());
                self.scan_applied = ticket.0;
            }
        }
        if ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;

        self.total_analyzed = resp
            .scan_info
            .as_ref()
            .map(|s| s.analyzed)
            .unwrap_or(resp.predictions.len());
        self.stats = resp.stats;
        self.predictions = resp.predictions;
        self.message = resp.message;
        self.last_update = Some(now);
        true
    }

    pub fn predictions(&self) -> &[StockPrediction] {
        &self.predictions
    }

    pub fn server_stats(&self) -> Option<SummaryStats> {
        self.stats
    }

    pub fn scan_info(&self) -> Option<&ScanInfo> {
        self.scan_info.as_ref()
    }

    pub fn total_analyzed(&self) -> usize {
        self.total_analyzed
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Server-provided stats verbatim, otherwise derived from the cached
    /// predictions with the same thresholds.
    pub fn effective_stats(&self) -> SummaryStats {
        self.stats
            .unwrap_or_else(|| SummaryStats::from_predictions(&self.predictions))
    }

    pub fn snapshot(&self, group: Group) -> GroupSnapshot {
        GroupSnapshot {
            group,
            label: group.label(),
            loaded: self.loaded,
            predictions: self.predictions.clone(),
            stats: self.effective_stats(),
            stats_derived: self.stats.is_none(),
            scan_info: self.scan_info.clone(),
            total_analyzed: self.total_analyzed,
            last_update: self.last_update,
            last_update_display: self
                .last_update
                .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()),
            message: self.message.clone(),
        }
    }
}

/// Read-only view of one group handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct GroupSnapshot {
    pub group: Group,
    pub label: &'static str,
    pub loaded: bool,
    pub predictions: Vec<StockPrediction>,
    pub stats: SummaryStats,
    pub stats_derived: bool,
    pub scan_info: Option<ScanInfo>,
    pub total_analyzed: usize,
    pub last_update: Option<DateTime<Utc>>,
    pub last_update_display: Option<String>,
    pub message: Option<String>,
}

/// One record per known group, created empty up front and never removed.
/// Each group is locked independently.
#[derive(Clone)]
pub struct GroupCache {
    records: Arc<DashMap<Group, GroupCacheRecord>>,
}

impl GroupCache {
    pub fn new() -> Self {
        let records = DashMap::new();
        for group in Group::ALL {
            records.insert(group, GroupCacheRecord::default());
        }
        Self { records: Arc::new(records) }
    }

    pub fn issue_ticket(&self, group: Group) -> RequestTicket {
        self.records.entry(group).or_default().issue_ticket()
    }

    /// Run `f` with exclusive access to one group's record
    pub fn update<R>(&self, group: Group, f: impl FnOnce(&mut GroupCacheRecord) -> R) -> R {
        let mut entry = self.records.entry(group).or_default();
        f(entry.value_mut())
    }

    pub fn read<R>(&self, group: Group, f: impl FnOnce(&GroupCacheRecord) -> R) -> R {
        match self.records.get(&group) {
            Some(entry) => f(entry.value()),
            None => f(&GroupCacheRecord::default()),
        }
    }

    pub fn snapshot(&self, group: Group) -> GroupSnapshot {
        self.read(group, |r| r.snapshot(group))
    }
}

impl Default for GroupCache {
    fn default() -> Self {
        Self::new()
    }
}
