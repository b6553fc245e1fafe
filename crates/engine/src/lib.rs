pub mod monitor;

pub use monitor::{Backends, Monitor, MonitorOutcome, MonitorRequest};
