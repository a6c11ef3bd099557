use chrono::{DateTime, Utc};
use linemon_common::id::AlertId;
use linemon_common::types::{Alert, AlertCounts, AlertDraft};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Default number of alerts retained by the ledger.
pub const DEFAULT_RETENTION: usize = 50;

struct LedgerState {
    alerts: VecDeque<Alert>,
    last_seq: u64,
}

/// Bounded, in-memory store of emitted alerts.
///
/// Identifiers come from a counter that only ever increases; trimming old
/// alerts never renumbers survivors or frees identifiers for reuse. Every
/// operation runs under one lock, so readers never see a half-applied batch
/// or trim.
pub struct AlertLedger {
    retention: usize,
    state: Mutex<LedgerState>,
}

impl Default for AlertLedger {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl AlertLedger {
    pub fn new(retention: usize) -> Self {
        Self {
            retention,
            state: Mutex::new(LedgerState {
                alerts: VecDeque::with_capacity(retention),
                last_seq: 0,
            }),
        }
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records a single draft as its own batch.
    pub fn record(&self, draft: AlertDraft) -> Alert {
        let now = Utc::now();
        let mut state = self.lock();
        let alert = Self::append(&mut state, draft, now);
        self.trim(&mut state);
        alert
    }

    /// Records drafts in order, then applies retention once for the batch.
    pub fn record_batch(&self, drafts: Vec<AlertDraft>) -> Vec<Alert> {
        if drafts.is_empty() {
            return Vec::new();
        }
        let now = Utc::now();
        let mut state = self.lock();
        let recorded = drafts
            .into_iter()
            .map(|draft| Self::append(&mut state, draft, now))
            .collect();
        self.trim(&mut state);
        recorded
    }

    fn append(state: &mut LedgerState, draft: AlertDraft, now: DateTime<Utc>) -> Alert {
        state.last_seq += 1;
        let alert = Alert::from_draft(AlertId::new(state.last_seq), draft, now);
        state.alerts.push_back(alert.clone());
        alert
    }

    fn trim(&self, state: &mut LedgerState) {
        let excess = state.alerts.len().saturating_sub(self.retention);
        if excess > 0 {
            state.alerts.drain(..excess);
            tracing::debug!(
                trimmed = excess,
                retained = state.alerts.len(),
                "Alert ledger trimmed"
            );
        }
    }

    /// Unresolved alerts, oldest first.
    pub fn active_alerts(&self) -> Vec<Alert> {
        self.lock()
            .alerts
            .iter()
            .filter(|a| !a.resolved)
            .cloned()
            .collect()
    }

    /// Every retained alert, resolved or not, oldest first.
    pub fn all_alerts(&self) -> Vec<Alert> {
        self.lock().alerts.iter().cloned().collect()
    }

    pub fn get(&self, id: AlertId) -> Option<Alert> {
        self.lock().alerts.iter().find(|a| a.id == id).cloned()
    }

    /// Counts unresolved alerts by severity.
    pub fn counts_by_severity(&self) -> AlertCounts {
        let state = self.lock();
        let mut counts = AlertCounts::default();
        for alert in state.alerts.iter().filter(|a| !a.resolved) {
            counts.add(alert.severity);
        }
        counts
    }

    /// Marks an alert acknowledged. Returns `false` if the ledger does not
    /// hold `id`.
    pub fn acknowledge(&self, id: AlertId) -> bool {
        self.update(id, |alert| alert.acknowledged = true)
    }

    /// Marks an alert resolved. Returns `false` if the ledger does not hold
    /// `id`.
    pub fn resolve(&self, id: AlertId) -> bool {
        self.update(id, |alert| alert.resolved = true)
    }

    fn update(&self, id: AlertId, f: impl FnOnce(&mut Alert)) -> bool {
        let mut state = self.lock();
        match state.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                f(alert);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().alerts.is_empty()
    }
}
