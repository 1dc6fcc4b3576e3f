//! Reconciliation of incoming trackable sets against the per-file store.
//!
//! Two operations, mirroring the two sources of trackables:
//! - `reconcile_with_new_analysis`: a fresh local analysis replaces the
//!   current set; matched findings keep their history, unmatched incoming
//!   findings become leaks, disappeared findings drop.
//! - `reconcile_with_baseline`: an authoritative snapshot relabels the
//!   server-side metadata of the current set without adding or removing
//!   anything.

use crate::matcher::match_trackables;
use crate::models::{now_millis, Trackable};
use crate::store::TrackableStore;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, trace};

/// Orchestrator combining the matcher and the per-file store.
pub struct Tracker<C> {
    store: Arc<TrackableStore<C>>,
}

impl<C: Clone> Tracker<C> {
    pub fn new(store: Arc<TrackableStore<C>>) -> Self {
        Tracker { store }
    }

    /// The store this tracker writes to, for read access by a presentation
    /// layer.
    pub fn store(&self) -> &TrackableStore<C> {
        &self.store
    }

    /// Reconcile a fresh analysis result for `file_id`.
    ///
    /// On the very first run for a file the raw trackables are stored
    /// verbatim: nothing is marked as a leak, no field is rewritten. An
    /// entire first analysis must not show up as "all new".
    ///
    /// On every later run the current set is matched against `raw`. A matched
    /// pair is the same issue, possibly moved or reworded: the result keeps
    /// the incoming identity fields and carries over `creation_date`,
    /// `server_issue_key`, `resolved` and `assignee` from the stored side.
    /// Unmatched incoming trackables are leaks: they get `creation_date` of
    /// now and their server metadata is reset, whatever values they arrived
    /// with. Unmatched stored trackables disappeared and are dropped. The
    /// result preserves the analyzer's input order.
    pub fn reconcile_with_new_analysis(&self, file_id: &str, raw: Vec<Trackable<C>>) {
        self.store.update(file_id, |slot| {
            let next = match slot.as_ref() {
                None => {
                    debug!(file_id, count = raw.len(), "first run, storing verbatim");
                    raw
                }
                Some(old) => {
                    let matching = match_trackables(old, &raw);
                    debug!(
                        file_id,
                        matched = matching.pairs.len(),
                        leaked = matching.unmatched_new.len(),
                        dropped = matching.unmatched_old.len(),
                        "reconciled analysis"
                    );
                    let by_new = matching.old_for_new();
                    let now = now_millis();
                    raw.into_iter()
                        .enumerate()
                        .map(|(ni, mut n)| {
                            match by_new.get(&ni) {
                                Some(&oi) => {
                                    let o = &old[oi];
                                    n.creation_date = o.creation_date;
                                    n.server_issue_key = o.server_issue_key.clone();
                                    n.resolved = o.resolved;
                                    n.assignee = o.assignee.clone();
                                }
                                None => {
                                    // a raw finding never arrives pre-resolved
                                    // or pre-assigned
                                    n.creation_date = Some(now);
                                    n.server_issue_key = None;
                                    n.resolved = false;
                                    n.assignee = String::new();
                                }
                            }
                            n
                        })
                        .collect()
                }
            };
            *slot = Some(next);
        });
    }

    /// Reconcile an authoritative baseline snapshot for `file_id`.
    ///
    /// Matched current trackables take `server_issue_key`, `resolved` and
    /// `assignee` from the baseline side in place; their `creation_date` and
    /// identity fields are untouched. Unmatched current trackables lose their
    /// server link and are reset. The current set is never added to or
    /// removed from. Unknown or empty files are a safe no-op.
    pub fn reconcile_with_baseline(&self, file_id: &str, baseline: &[Trackable<C>]) {
        self.store.update(file_id, |slot| {
            let current = match slot.as_mut() {
                Some(c) if !c.is_empty() => c,
                _ => {
                    trace!(file_id, "no local trackables, ignoring baseline");
                    return;
                }
            };
            let matching = match_trackables(current, baseline);
            debug!(
                file_id,
                matched = matching.pairs.len(),
                unlinked = matching.unmatched_old.len(),
                "reconciled baseline"
            );
            for &(ci, bi) in &matching.pairs {
                let b = &baseline[bi];
                let c = &mut current[ci];
                c.server_issue_key = b.server_issue_key.clone();
                c.resolved = b.resolved;
                c.assignee = b.assignee.clone();
            }
            for &ci in &matching.unmatched_old {
                let c = &mut current[ci];
                c.server_issue_key = None;
                c.resolved = false;
                c.assignee = String::new();
            }
        });
    }
}

impl<C: Clone + Send + Sync> Tracker<C> {
    /// Reconcile analysis results for many files at once. Files are
    /// independent in the store, so the batch fans out across the rayon pool.
    pub fn reconcile_all(&self, batch: Vec<(String, Vec<Trackable<C>>)>) {
        batch.into_par_iter().for_each(|(file_id, raw)| {
            self.reconcile_with_new_analysis(&file_id, raw);
        });
    }
}
