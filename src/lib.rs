//! Report Portal reporting for test runs.
//!
//! A [`LifecycleAdapter`] receives the runner's lifecycle callbacks and
//! mirrors the test tree into a Report Portal launch, forwarding the log
//! output of each running leaf along the way.

pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod state;
pub mod time;

pub use config::{ConfigurationProvider, FileConfigurationProvider, PortalConfig};
pub use error::{ConfigError, ReportError};
pub use report::{ForwarderLayer, ForwarderSlot, LifecycleAdapter, RemoteReportingClient};
pub use state::{BlockMode, NodeKind, Outcome, OutcomeKind, RunInfo, TestNode};
