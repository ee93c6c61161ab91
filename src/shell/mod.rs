pub mod controller;
pub mod gateway;
pub mod simulated;

pub use controller::{CloseOutcome, WindowController};
pub use gateway::{WindowError, WindowEvent, WindowGateway};
pub use simulated::SimulatedWindow;
