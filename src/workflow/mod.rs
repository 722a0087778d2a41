pub mod session;
pub mod setup;
pub mod turn_controller;

pub use session::Session;
pub use setup::SetupForm;
pub use turn_controller::{ControllerState, PendingTurn, ResolvedTurn, TurnController, TurnOutcome};
