use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use super::RemoteReportingClient;
use super::types::{ItemFinish, ItemHandle, ItemStart, LaunchHandle, LaunchStart, LogEntry};

/// Writes every reporting call as one JSON object per line.
///
/// Stands in for a Report Portal server on dry runs; handles are random
/// uuids.
pub struct JsonLinesClient {
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonLinesClient {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    fn emit(&self, event: &str, payload: impl Serialize) -> Result<()> {
        let mut line = serde_json::to_value(payload).context("Failed to serialize call")?;
        line["event"] = json!(event);

        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{}", line).with_context(|| format!("Failed to write {} event", event))
    }
}

impl RemoteReportingClient for JsonLinesClient {
    fn start_launch(&self, launch: LaunchStart) -> Result<LaunchHandle> {
        let handle = LaunchHandle(Uuid::new_v4().to_string());
        self.emit(
            "start_launch",
            json!({ "launch": launch, "handle": handle }),
        )?;
        Ok(handle)
    }

    fn start_item(&self, item: ItemStart) -> Result<ItemHandle> {
        let handle = ItemHandle(Uuid::new_v4().to_string());
        self.emit("start_item", json!({ "item": item, "handle": handle }))?;
        Ok(handle)
    }

    fn finish_item(&self, finish: ItemFinish) -> Result<()> {
        self.emit("finish_item", finish)
    }

    fn finish_launch(&self, end_time: String) -> Result<()> {
        self.emit("finish_launch", json!({ "end_time": end_time }))
    }

    fn terminate(&self) -> Result<()> {
        self.emit("terminate", json!({}))?;
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.flush().context("Failed to flush output")
    }

    fn log(&self, entry: LogEntry) -> Result<()> {
        self.emit("log", entry)
    }
}
