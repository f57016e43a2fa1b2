//! One editing session: one document, one save coordinator, one gateway.
//!
//! Sessions live on the host's single-threaded event loop, so state sits
//! in an `Rc<RefCell<..>>` and is never borrowed across an await. The
//! future returned by [`EditorSession::save`] holds only a weak handle:
//! if the session is closed while the gateway call is outstanding, the
//! answer is dropped without touching anything.

use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::editor::document::ResumeDocument;
use crate::errors::EditorError;
use crate::gateway::ResumeGateway;
use crate::models::resume::ResumeSnapshot;
use crate::save::coordinator::{SaveCoordinator, SaveState};

#[derive(Debug)]
pub enum SaveOutcome {
    /// The server's representation after the save.
    Saved(ResumeSnapshot),
    /// The session was closed before the gateway answered.
    Discarded,
}

struct SessionState {
    resume_id: Option<String>,
    document: ResumeDocument,
    coordinator: SaveCoordinator,
}

pub struct EditorSession {
    session_id: Uuid,
    state: Rc<RefCell<SessionState>>,
    gateway: Arc<dyn ResumeGateway>,
}

impl EditorSession {
    /// Fetches résumé `resume_id` and opens it for editing.
    pub async fn open(gateway: Arc<dyn ResumeGateway>, resume_id: &str) -> Result<Self, EditorError> {
        let snapshot = gateway.fetch(resume_id).await?;
        Ok(Self::from_snapshot(gateway, &snapshot))
    }

    pub fn from_snapshot(gateway: Arc<dyn ResumeGateway>, snapshot: &ResumeSnapshot) -> Self {
        Self::start(gateway, Some(snapshot.id.clone()), ResumeDocument::hydrate(snapshot))
    }

    /// A new résumé; the first successful save creates it on the server.
    pub fn draft(gateway: Arc<dyn ResumeGateway>) -> Self {
        Self::start(gateway, None, ResumeDocument::new())
    }

    fn start(gateway: Arc<dyn ResumeGateway>, resume_id: Option<String>, document: ResumeDocument) -> Self {
        let session_id = Uuid::new_v4();
        info!(%session_id, resume_id = ?resume_id, "Editor session opened");
        Self {
            session_id,
            state: Rc::new(RefCell::new(SessionState {
                resume_id,
                document,
                coordinator: SaveCoordinator::new(),
            })),
            gateway,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Server id, `None` until a draft has been saved once.
    pub fn resume_id(&self) -> Option<String> {
        self.state.borrow().resume_id.clone()
    }

    /// Read access for rendering. `f` must not call back into the session.
    pub fn read<R>(&self, f: impl FnOnce(&ResumeDocument) -> R) -> R {
        f(&self.state.borrow().document)
    }

    /// Write access for UI events. Legal while a save is in flight.
    /// `f` must not call back into the session.
    pub fn edit<R>(&self, f: impl FnOnce(&mut ResumeDocument) -> R) -> R {
        f(&mut self.state.borrow_mut().document)
    }

    pub fn save_state(&self) -> SaveState {
        self.state.borrow().coordinator.state().clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.borrow().document.is_dirty()
    }

    pub fn acknowledge(&self) {
        self.state.borrow_mut().coordinator.acknowledge();
    }

    /// Replaces the document with a server representation, typically the
    /// one returned by a successful save. Ids handed out earlier stay dead.
    /// Refused while a save is running.
    pub fn reload(&self, snapshot: &ResumeSnapshot) -> Result<(), EditorError> {
        let mut state = self.state.borrow_mut();
        if state.coordinator.is_busy() {
            return Err(EditorError::SaveInProgress);
        }
        state.document.reload(snapshot);
        state.resume_id = Some(snapshot.id.clone());
        Ok(())
    }

    /// Validates and saves the document.
    ///
    /// The returned future does not borrow the session. Validation and the
    /// state transition happen on its first poll; a second save polled
    /// while this one is outstanding fails with `SaveInProgress`.
    pub fn save(&self) -> impl Future<Output = Result<SaveOutcome, EditorError>> + 'static {
        let span = info_span!("resume_save", session_id = %self.session_id);
        run_save(Rc::downgrade(&self.state), Arc::clone(&self.gateway)).instrument(span)
    }

    /// Ends the session, discarding the document. An outstanding save
    /// still reaches the server but its answer is ignored.
    pub fn close(self) {
        info!(session_id = %self.session_id, dirty = self.is_dirty(), "Editor session closed");
    }
}

async fn run_save(
    state: Weak<RefCell<SessionState>>,
    gateway: Arc<dyn ResumeGateway>,
) -> Result<SaveOutcome, EditorError> {
    let (pending, resume_id) = {
        let cell = state.upgrade().ok_or(EditorError::SessionClosed)?;
        let mut guard = cell.borrow_mut();
        let SessionState {
            resume_id,
            document,
            coordinator,
        } = &mut *guard;
        let pending = coordinator.request(document)?;
        let resume_id = resume_id.clone();
        (pending, resume_id)
    };

    let _cancel = CancelOnDrop {
        state: state.clone(),
        ticket: pending.ticket(),
    };

    let result = match resume_id.as_deref() {
        Some(id) => gateway.update(id, pending.payload()).await,
        None => gateway.create(pending.payload()).await,
    };

    let Some(cell) = state.upgrade() else {
        debug!("Session closed before the save finished; result dropped");
        return Ok(SaveOutcome::Discarded);
    };
    let mut guard = cell.borrow_mut();
    let SessionState {
        resume_id,
        document,
        coordinator,
    } = &mut *guard;
    let snapshot = coordinator.complete(pending, result, document)?;
    if resume_id.is_none() {
        *resume_id = Some(snapshot.id.clone());
    }
    Ok(SaveOutcome::Saved(snapshot))
}

/// Frees the coordinator if the save future is dropped mid-flight.
/// After `complete` the ticket is no longer current and this does nothing.
struct CancelOnDrop {
    state: Weak<RefCell<SessionState>>,
    ticket: u64,
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(cell) = self.state.upgrade() {
            if let Ok(mut guard) = cell.try_borrow_mut() {
                guard.coordinator.abandon(self.ticket);
            }
        }
    }
}
