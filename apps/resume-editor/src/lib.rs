//! Résumé editing engine.
//!
//! An editor session hydrates a [`ResumeDocument`] from the server, lets
//! the host UI mutate it through keyed collections, validates it as a
//! whole and sends it back through a [`ResumeGateway`] only when it is
//! completely valid.

pub mod config;
pub mod editor;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod save;
pub mod telemetry;

pub use config::Config;
pub use editor::{EntityCollection, EntityId, ResumeDocument, Violation};
pub use errors::EditorError;
pub use gateway::{GatewayError, HttpResumeGateway, ResumeGateway};
pub use save::{EditorSession, SaveCoordinator, SaveOutcome, SaveState};
