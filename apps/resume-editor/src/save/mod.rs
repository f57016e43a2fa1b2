pub mod coordinator;
pub mod session;

pub use coordinator::{PendingSave, SaveCoordinator, SaveFailure, SaveState};
pub use session::{EditorSession, SaveOutcome};
