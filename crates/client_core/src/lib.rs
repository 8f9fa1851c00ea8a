//! Cart client core: remote store access, observable state and the controller
//! that keeps the two in step.

pub mod controller;
pub mod reconcile;
pub mod state;
pub mod store;

pub use controller::{CommitOutcome, Controller, ControllerError, EventOutcome, Renderer, UiEvent};
pub use state::{Snapshot, StateContainer};
pub use store::{HttpRemoteStore, RemoteStore, DEFAULT_STORE_URL};
