// Report module - Report Portal lifecycle reporting

pub mod adapter;
pub mod classifier;
pub mod forwarder;
pub mod streaming;
pub mod types;

use anyhow::Result;
pub use adapter::LifecycleAdapter;
pub use classifier::classify;
pub use forwarder::{ForwarderLayer, ForwarderSlot, LogForwarder, Severity};
pub use streaming::JsonLinesClient;
pub use types::{
    Issue, IssueType, ItemFinish, ItemHandle, ItemStart, ItemStatus, ItemType, LaunchHandle,
    LaunchMode, LaunchStart, LogEntry, LogLevel,
};

/// Report Portal service as seen by the adapter.
///
/// Implementations own transport, queueing and retries. Calls may return
/// before the service acknowledged them; `terminate` must drain whatever is
/// still pending.
pub trait RemoteReportingClient: Send + Sync {
    /// Open the launch for the whole run
    fn start_launch(&self, launch: LaunchStart) -> Result<LaunchHandle>;

    /// Open a test item under the most recently opened one
    fn start_item(&self, item: ItemStart) -> Result<ItemHandle>;

    /// Close the most recently opened test item
    fn finish_item(&self, finish: ItemFinish) -> Result<()>;

    /// Close the launch
    fn finish_launch(&self, end_time: String) -> Result<()>;

    /// Flush pending calls and release the connection
    fn terminate(&self) -> Result<()>;

    /// Attach a log line to the currently open test item
    fn log(&self, entry: LogEntry) -> Result<()>;
}
