//! Save workflow for one document:
//!
//! ```text
//! Idle ──request──▶ Validating ──clean──▶ Saving ──ok────▶ Success
//!                        │                   └──error──▶ Failed
//!                        └──violations──────────────────▶ Failed
//! Success / Failed ──acknowledge──▶ Idle
//! Saving ──abandon──▶ Failed(Cancelled)
//! ```
//!
//! A request while `Validating` or `Saving` is rejected, never queued.
//! A request from `Success` or `Failed` acknowledges implicitly, so the
//! user can retry straight away. The coordinator never edits the
//! document beyond marking the transmitted revision as saved.

use tracing::{info, warn};

use crate::editor::document::ResumeDocument;
use crate::editor::validation::{validate, Violation};
use crate::errors::EditorError;
use crate::gateway::GatewayError;
use crate::models::resume::{ResumePayload, ResumeSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum SaveFailure {
    /// The document was not sent.
    Invalid(Vec<Violation>),
    /// The gateway call failed; the message is meant for the user.
    Transport(String),
    /// The request was dropped before the gateway answered.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveState {
    Idle,
    Validating,
    Saving { ticket: u64, revision: u64 },
    Success,
    Failed(SaveFailure),
}

/// A validated payload on its way to the gateway. Hand it back to
/// [`SaveCoordinator::complete`] together with the gateway's answer.
#[derive(Debug)]
pub struct PendingSave {
    ticket: u64,
    revision: u64,
    payload: ResumePayload,
}

impl PendingSave {
    pub fn payload(&self) -> &ResumePayload {
        &self.payload
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

#[derive(Debug)]
pub struct SaveCoordinator {
    state: SaveState,
    next_ticket: u64,
}

impl Default for SaveCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl SaveCoordinator {
    pub fn new() -> Self {
        Self {
            state: SaveState::Idle,
            next_ticket: 1,
        }
    }

    pub fn state(&self) -> &SaveState {
        &self.state
    }

    /// True while a request is being validated or is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, SaveState::Validating | SaveState::Saving { .. })
    }

    /// Validates `doc` and, if clean, snapshots it for the gateway.
    ///
    /// On violations the state becomes `Failed` and nothing is returned
    /// to send; the document is untouched either way.
    pub fn request(&mut self, doc: &ResumeDocument) -> Result<PendingSave, EditorError> {
        if self.is_busy() {
            warn!("Save requested while another save is in progress; rejected");
            return Err(EditorError::SaveInProgress);
        }

        self.state = SaveState::Validating;
        let violations = validate(doc);
        if !violations.is_empty() {
            info!("Save blocked by {} validation violation(s)", violations.len());
            self.state = SaveState::Failed(SaveFailure::Invalid(violations.clone()));
            return Err(EditorError::Invalid(violations));
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let revision = doc.revision();
        self.state = SaveState::Saving { ticket, revision };

        Ok(PendingSave {
            ticket,
            revision,
            payload: doc.snapshot_for_save(),
        })
    }

    /// Applies the gateway's answer for `pending`.
    ///
    /// On success the transmitted revision is marked saved and the server's
    /// representation is returned so the caller may re-hydrate from it. On
    /// failure the document is left exactly as it was.
    pub fn complete(
        &mut self,
        pending: PendingSave,
        result: Result<ResumeSnapshot, GatewayError>,
        doc: &mut ResumeDocument,
    ) -> Result<ResumeSnapshot, EditorError> {
        match self.state {
            SaveState::Saving { ticket, .. } if ticket == pending.ticket => {}
            _ => {
                warn!("Save result for ticket {} arrived out of turn; ignored", pending.ticket);
                return Err(EditorError::SaveInProgress);
            }
        }

        match result {
            Ok(snapshot) => {
                doc.mark_saved(pending.revision);
                info!("Resume {} saved at revision {}", snapshot.id, pending.revision);
                self.state = SaveState::Success;
                Ok(snapshot)
            }
            Err(e) => {
                warn!("Resume save failed: {e}");
                self.state = SaveState::Failed(SaveFailure::Transport(e.to_string()));
                Err(EditorError::Transport(e))
            }
        }
    }

    /// Gives up on `ticket` if it is still the one in flight, so a new
    /// request can be made. A late `complete` for it is then out of turn.
    pub fn abandon(&mut self, ticket: u64) {
        if matches!(self.state, SaveState::Saving { ticket: current, .. } if current == ticket) {
            warn!("Save ticket {ticket} abandoned before the gateway answered");
            self.state = SaveState::Failed(SaveFailure::Cancelled);
        }
    }

    /// `Success`/`Failed` → `Idle`. Does nothing in other states.
    pub fn acknowledge(&mut self) {
        if matches!(self.state, SaveState::Success | SaveState::Failed(_)) {
            self.state = SaveState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::document::ScalarField;
    use crate::editor::entities::{Skill, SkillField};
    use crate::editor::validation::Rule;
    use chrono::Utc;

    fn saved(payload: &ResumePayload) -> ResumeSnapshot {
        ResumeSnapshot {
            id: "1".into(),
            resume: payload.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn valid_doc() -> ResumeDocument {
        let mut doc = ResumeDocument::new();
        doc.set_scalar(ScalarField::Title, "Platform Engineer").unwrap();
        doc
    }

    #[test]
    fn test_invalid_document_never_reaches_saving() {
        let mut coordinator = SaveCoordinator::new();
        let mut doc = ResumeDocument::new();
        let id = doc.add(Skill::default());
        doc.update(id, SkillField::Name, "Go").unwrap();
        doc.update(id, SkillField::Level, 3).unwrap();
        let before = doc.snapshot_for_save();

        let err = coordinator.request(&doc).unwrap_err();

        let violations = err.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "title");
        assert_eq!(violations[0].rule, Rule::Required);
        assert!(matches!(
            coordinator.state(),
            SaveState::Failed(SaveFailure::Invalid(v)) if v.len() == 1
        ));
        assert_eq!(doc.snapshot_for_save(), before);
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_successful_save_marks_clean() {
        let mut coordinator = SaveCoordinator::new();
        let mut doc = valid_doc();

        let pending = coordinator.request(&doc).unwrap();
        assert!(coordinator.is_busy());
        assert_eq!(pending.payload().title, "Platform Engineer");

        let result = Ok(saved(pending.payload()));
        coordinator.complete(pending, result, &mut doc).unwrap();

        assert_eq!(coordinator.state(), &SaveState::Success);
        assert!(!doc.is_dirty());
        coordinator.acknowledge();
        assert_eq!(coordinator.state(), &SaveState::Idle);
    }

    #[test]
    fn test_second_request_while_saving_is_rejected() {
        let mut coordinator = SaveCoordinator::new();
        let doc = valid_doc();
        let _pending = coordinator.request(&doc).unwrap();

        assert!(matches!(
            coordinator.request(&doc),
            Err(EditorError::SaveInProgress)
        ));
        assert!(matches!(coordinator.state(), SaveState::Saving { .. }));
    }

    #[test]
    fn test_transport_failure_keeps_document() {
        let mut coordinator = SaveCoordinator::new();
        let mut doc = valid_doc();
        let before = doc.snapshot_for_save();

        let pending = coordinator.request(&doc).unwrap();
        let err = coordinator
            .complete(
                pending,
                Err(GatewayError::Api {
                    status: 500,
                    message: "database unavailable".into(),
                }),
                &mut doc,
            )
            .unwrap_err();

        assert_eq!(err.code(), "TRANSPORT_ERROR");
        match coordinator.state() {
            SaveState::Failed(SaveFailure::Transport(msg)) => {
                assert!(msg.contains("database unavailable"))
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert_eq!(doc.snapshot_for_save(), before);
        assert!(doc.is_dirty());

        // retry without re-entering anything
        let pending = coordinator.request(&doc).unwrap();
        let result = Ok(saved(pending.payload()));
        coordinator.complete(pending, result, &mut doc).unwrap();
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_edits_during_flight_stay_dirty() {
        let mut coordinator = SaveCoordinator::new();
        let mut doc = valid_doc();

        let pending = coordinator.request(&doc).unwrap();
        doc.set_scalar(ScalarField::Summary, "Edited meanwhile").unwrap();
        let result = Ok(saved(pending.payload()));
        coordinator.complete(pending, result, &mut doc).unwrap();

        assert!(doc.is_dirty());
    }

    #[test]
    fn test_acknowledge_is_noop_while_idle_or_busy() {
        let mut coordinator = SaveCoordinator::new();
        coordinator.acknowledge();
        assert_eq!(coordinator.state(), &SaveState::Idle);

        let _pending = coordinator.request(&valid_doc()).unwrap();
        coordinator.acknowledge();
        assert!(coordinator.is_busy());
    }

    #[test]
    fn test_abandoned_ticket_frees_the_coordinator() {
        let mut coordinator = SaveCoordinator::new();
        let mut doc = valid_doc();
        let stale = coordinator.request(&doc).unwrap();

        coordinator.abandon(stale.ticket() + 1);
        assert!(coordinator.is_busy());

        coordinator.abandon(stale.ticket());
        assert_eq!(coordinator.state(), &SaveState::Failed(SaveFailure::Cancelled));

        let fresh = coordinator.request(&doc).unwrap();
        let late = Ok(saved(stale.payload()));
        assert!(matches!(
            coordinator.complete(stale, late, &mut doc),
            Err(EditorError::SaveInProgress)
        ));
        assert!(matches!(coordinator.state(), SaveState::Saving { ticket, .. } if *ticket == fresh.ticket()));

        let result = Ok(saved(fresh.payload()));
        coordinator.complete(fresh, result, &mut doc).unwrap();
        assert!(!doc.is_dirty());
    }
}
