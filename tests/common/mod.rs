// Recording stand-in for the Report Portal service

#![allow(dead_code)]

use anyhow::{Result, bail};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use reportportal_adapter::report::{
    ItemFinish, ItemHandle, ItemStart, LaunchHandle, LaunchStart, LogEntry, LogLevel,
};
use reportportal_adapter::time::FixedClock;
use reportportal_adapter::{ForwarderSlot, LifecycleAdapter, RemoteReportingClient};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    StartLaunch(LaunchStart),
    StartItem(ItemStart),
    FinishItem(ItemFinish),
    FinishLaunch(String),
    Terminate,
    Log(LogEntry),
}

#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    next_handle: AtomicUsize,
    fail_logs: AtomicBool,
    trace_logs: AtomicBool,
}

impl RecordingClient {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn fail_logs(&self, fail: bool) {
        self.fail_logs.store(fail, Ordering::SeqCst);
    }

    /// Make `log` emit a tracing event of its own, like a queueing client would
    pub fn trace_logs(&self, trace: bool) {
        self.trace_logs.store(trace, Ordering::SeqCst);
    }

    pub fn item_starts(&self) -> Vec<ItemStart> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::StartItem(item) => Some(item),
                _ => None,
            })
            .collect()
    }

    pub fn item_finishes(&self) -> Vec<ItemFinish> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::FinishItem(finish) => Some(finish),
                _ => None,
            })
            .collect()
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Log(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    pub fn logs_at(&self, level: LogLevel) -> Vec<LogEntry> {
        self.logs().into_iter().filter(|e| e.level == level).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn handle(&self) -> String {
        format!("item-{}", self.next_handle.fetch_add(1, Ordering::SeqCst))
    }
}

impl RemoteReportingClient for RecordingClient {
    fn start_launch(&self, launch: LaunchStart) -> Result<LaunchHandle> {
        self.record(Call::StartLaunch(launch));
        Ok(LaunchHandle("launch".to_string()))
    }

    fn start_item(&self, item: ItemStart) -> Result<ItemHandle> {
        self.record(Call::StartItem(item));
        Ok(ItemHandle(self.handle()))
    }

    fn finish_item(&self, finish: ItemFinish) -> Result<()> {
        self.record(Call::FinishItem(finish));
        Ok(())
    }

    fn finish_launch(&self, end_time: String) -> Result<()> {
        self.record(Call::FinishLaunch(end_time));
        Ok(())
    }

    fn terminate(&self) -> Result<()> {
        self.record(Call::Terminate);
        Ok(())
    }

    fn log(&self, entry: LogEntry) -> Result<()> {
        if self.trace_logs.load(Ordering::SeqCst) {
            tracing::debug!(target: "rp_client", "queued log line");
        }
        if self.fail_logs.load(Ordering::SeqCst) {
            bail!("connection reset by peer");
        }
        self.record(Call::Log(entry));
        Ok(())
    }
}

/// Adapter over a fresh recording client with the clock pinned at 123
pub fn adapter_with(slot: ForwarderSlot) -> (LifecycleAdapter, Arc<RecordingClient>) {
    let client = Arc::new(RecordingClient::default());
    let adapter =
        LifecycleAdapter::new(client.clone(), slot).with_clock(Arc::new(FixedClock(123)));
    (adapter, client)
}

pub fn adapter() -> (LifecycleAdapter, Arc<RecordingClient>) {
    adapter_with(ForwarderSlot::default())
}
