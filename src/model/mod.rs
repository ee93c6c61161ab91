pub mod config;
pub mod task;
pub mod window;

pub use config::*;
pub use task::*;
pub use window::*;
