//! Matching session
//!
//! Wires the selection engine and the auto-matcher together for one bank
//! statement line. The auto-match pass runs exactly once per session, either
//! inline during start-up or on a worker thread so the caller can render
//! immediately and pick the result up later.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::audit::{AuditEntry, AuditLogger, SessionEvent};
use crate::error::{MatchError, MatchResult};
use crate::models::{ItemId, MatchItem, Money, SessionId};

use super::auto_match::{AutoMatchOutcome, AutoMatcher, MatchConfig};
use super::selection::{SelectionEngine, SelectionState, ToggleResult};

/// What became of the one-shot auto-match pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoMatchReport {
    pub outcome: AutoMatchOutcome,
    /// False when nothing matched or the user had already started selecting
    pub applied: bool,
}

/// Progress of the auto-match pass as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoMatchStatus {
    /// Still searching in the background
    Pending,
    /// Cancelled by the caller; no auto-match will be applied
    Cancelled,
    Complete(AutoMatchReport),
}

enum AutoMatchSlot {
    Pending {
        receiver: Receiver<AutoMatchOutcome>,
        cancel: Arc<AtomicBool>,
        worker: JoinHandle<()>,
    },
    Cancelled,
    Complete(AutoMatchReport),
}

/// Builder for a [`Session`]
pub struct SessionBuilder {
    target: Money,
    candidates: Vec<MatchItem>,
    config: MatchConfig,
    audit: Option<AuditLogger>,
    background: bool,
}

impl SessionBuilder {
    pub fn config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Record session events to the given log
    pub fn audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Run the auto-match pass on a worker thread
    pub fn background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }

    /// Create the session
    ///
    /// Fails with `EmptyCatalog` or `DuplicateItem`; no partially
    /// initialized session is ever returned.
    pub fn start(self) -> MatchResult<Session> {
        let engine = SelectionEngine::initialize(self.target, self.candidates)?;
        let matcher = AutoMatcher::new(self.config.clone());

        let mut session = Session {
            id: SessionId::new(),
            engine,
            config: self.config,
            auto_match: AutoMatchSlot::Cancelled,
            audit: self.audit,
            audit_error: None,
        };

        session.record(
            AuditEntry::new(session.id, SessionEvent::Started)
                .with_remaining(self.target, self.target)
                .with_detail(format!(
                    "target {} over {} candidates",
                    self.target,
                    session.engine.state().candidates().len()
                )),
        );

        if self.background {
            let candidates = session.engine.state().shared_candidates();
            let cancel = Arc::new(AtomicBool::new(false));
            let worker_cancel = Arc::clone(&cancel);
            let (sender, receiver) = mpsc::channel();
            let target = self.target;

            let worker = thread::spawn(move || {
                let outcome = matcher.find_with_cancel(&candidates, target, &worker_cancel);
                // The session may be gone; a late result is simply dropped
                let _ = sender.send(outcome);
            });

            session.auto_match = AutoMatchSlot::Pending {
                receiver,
                cancel,
                worker,
            };
        } else {
            let outcome = matcher.find(session.engine.state().candidates(), self.target);
            session.settle(outcome);
        }

        Ok(session)
    }
}

/// One interactive matching session for a single target amount
///
/// All mutation goes through `&mut self`, so calls are serialized by the
/// borrow checker; there is no internal locking.
pub struct Session {
    id: SessionId,
    engine: SelectionEngine,
    config: MatchConfig,
    auto_match: AutoMatchSlot,
    audit: Option<AuditLogger>,
    audit_error: Option<MatchError>,
}

impl Session {
    pub fn builder(target: Money, candidates: Vec<MatchItem>) -> SessionBuilder {
        SessionBuilder {
            target,
            candidates,
            config: MatchConfig::default(),
            audit: None,
            background: false,
        }
    }

    /// Start a session and apply the auto-match result before returning
    pub fn start(target: Money, candidates: Vec<MatchItem>, config: MatchConfig) -> MatchResult<Self> {
        Self::builder(target, candidates).config(config).start()
    }

    /// Start a session whose auto-match pass runs in the background
    pub fn start_background(
        target: Money,
        candidates: Vec<MatchItem>,
        config: MatchConfig,
    ) -> MatchResult<Self> {
        Self::builder(target, candidates)
            .config(config)
            .background(true)
            .start()
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn target(&self) -> Money {
        self.engine.state().target()
    }

    /// Current version of the selection, for rendering and diffing
    pub fn state(&self) -> &SelectionState {
        self.engine.state()
    }

    pub fn selected_items(&self) -> Vec<&MatchItem> {
        self.engine.selected_items()
    }

    pub fn query_remaining(&self) -> Money {
        self.engine.remaining()
    }

    pub fn query_can_select(&self, id: &ItemId) -> MatchResult<bool> {
        self.engine.can_select(id)
    }

    /// Select or deselect an item
    ///
    /// A rejected toggle leaves the remaining amount and the selection
    /// exactly as they were.
    pub fn toggle_item(&mut self, id: &ItemId, select: bool) -> MatchResult<ToggleResult> {
        let before = self.engine.remaining();

        match self.engine.toggle(id, select) {
            Ok(result) => {
                if result.changed {
                    let event = if select {
                        SessionEvent::Selected
                    } else {
                        SessionEvent::Deselected
                    };
                    self.record(
                        AuditEntry::new(self.id, event)
                            .with_item(id)
                            .with_remaining(before, result.new_remaining),
                    );
                }
                Ok(result)
            }
            Err(err) => {
                self.record(
                    AuditEntry::new(self.id, SessionEvent::Rejected)
                        .with_item(id)
                        .with_remaining(before, before)
                        .with_detail(err.to_string()),
                );
                Err(err)
            }
        }
    }

    /// Poll the auto-match pass without blocking
    ///
    /// The first time a background result is observed it is applied (if no
    /// toggle has succeeded since start, even one later undone) and the
    /// status becomes `Complete`.
    pub fn query_auto_match_result(&mut self) -> AutoMatchStatus {
        let received = match &self.auto_match {
            AutoMatchSlot::Pending { receiver, .. } => match receiver.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => return AutoMatchStatus::Pending,
                Err(TryRecvError::Disconnected) => Some(AutoMatchOutcome::Cancelled),
            },
            _ => None,
        };

        if let Some(outcome) = received {
            self.finish_worker();
            self.settle(outcome);
        }
        self.auto_match_status()
    }

    /// Block until the auto-match pass finishes
    pub fn wait_for_auto_match(&mut self) -> AutoMatchStatus {
        let received = match &self.auto_match {
            AutoMatchSlot::Pending { receiver, .. } => {
                Some(receiver.recv().unwrap_or(AutoMatchOutcome::Cancelled))
            }
            _ => None,
        };

        if let Some(outcome) = received {
            self.finish_worker();
            self.settle(outcome);
        }
        self.auto_match_status()
    }

    /// Stop waiting for the auto-match pass; a late result is ignored
    pub fn cancel_auto_match(&mut self) {
        if let AutoMatchSlot::Pending { cancel, .. } = &self.auto_match {
            cancel.store(true, Ordering::Relaxed);
            self.auto_match = AutoMatchSlot::Cancelled;
        }
    }

    /// Take the last audit write failure, if any
    ///
    /// Audit failures never undo a state transition, so they are parked here
    /// instead of being returned from the call that caused them.
    pub fn take_audit_error(&mut self) -> Option<MatchError> {
        self.audit_error.take()
    }

    fn auto_match_status(&self) -> AutoMatchStatus {
        match &self.auto_match {
            AutoMatchSlot::Pending { .. } => AutoMatchStatus::Pending,
            AutoMatchSlot::Cancelled => AutoMatchStatus::Cancelled,
            AutoMatchSlot::Complete(report) => AutoMatchStatus::Complete(report.clone()),
        }
    }

    fn finish_worker(&mut self) {
        let slot = std::mem::replace(&mut self.auto_match, AutoMatchSlot::Cancelled);
        if let AutoMatchSlot::Pending { worker, .. } = slot {
            // The worker has already sent or hung up, so this cannot block long
            let _ = worker.join();
        }
    }

    /// Apply a finished outcome as one atomic transition
    ///
    /// Only version 0 counts as untouched: a select followed by a deselect
    /// still discards the result even though the selection looks empty.
    fn settle(&mut self, outcome: AutoMatchOutcome) {
        if outcome == AutoMatchOutcome::Cancelled {
            self.auto_match = AutoMatchSlot::Cancelled;
            return;
        }

        let before = self.engine.remaining();
        let untouched = self.engine.state().version() == 0;

        let applied = match outcome.matched_ids() {
            Some(ids) if untouched => match self.engine.apply_auto_match(ids) {
                Ok(changed) => changed,
                Err(err) => {
                    self.audit_error = Some(err);
                    false
                }
            },
            _ => false,
        };

        let entry = match (&outcome, applied) {
            (AutoMatchOutcome::Matched(ids), true) => {
                AuditEntry::new(self.id, SessionEvent::AutoMatched)
                    .with_items(ids)
                    .with_remaining(before, self.engine.remaining())
            }
            (AutoMatchOutcome::Matched(ids), false) => {
                AuditEntry::new(self.id, SessionEvent::AutoMatchDiscarded)
                    .with_items(ids)
                    .with_detail("selection changed before the result arrived")
            }
            (AutoMatchOutcome::SearchBudgetExceeded { explored }, _) => {
                AuditEntry::new(self.id, SessionEvent::AutoMatchUnmatched)
                    .with_detail(format!("search budget exceeded after {} steps", explored))
            }
            _ => AuditEntry::new(self.id, SessionEvent::AutoMatchUnmatched)
                .with_detail("no match found"),
        };
        self.record(entry);

        self.auto_match = AutoMatchSlot::Complete(AutoMatchReport { outcome, applied });
    }

    fn record(&mut self, entry: AuditEntry) {
        if let Some(logger) = &self.audit {
            if let Err(err) = logger.log(&entry) {
                self.audit_error = Some(err);
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let AutoMatchSlot::Pending { cancel, .. } = &self.auto_match {
            cancel.store(true, Ordering::Relaxed);
        }
    }
}
