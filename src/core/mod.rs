pub mod fleet_store;
pub mod forecast;
pub mod ingest;
pub mod refresh;
pub mod registration;
pub mod search;
pub mod selection;
pub mod session_gate;

pub use fleet_store::{FleetStore, LoadOutcome, LoadReport, LoadTicket, StatusSummary};
pub use search::SearchIndex;
pub use selection::{DetailSelection, DetailView};
pub use session_gate::{GateState, Landing, SessionGate};
