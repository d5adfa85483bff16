pub mod controller;
pub mod loop_worker;
pub mod session;

pub use controller::MonitorController;
pub use session::{MonitorOutput, MonitoringSession};
