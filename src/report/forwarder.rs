// Log forwarding - ships log records of the running leaf to Report Portal

use std::cell::Cell;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use super::RemoteReportingClient;
use super::types::{LogEntry, LogLevel};
use crate::config::ForwardFailurePolicy;
use crate::error::{ReportError, Result};
use crate::time::Clock;

/// Severity of a log record on the producer side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Remote level this severity is shipped with
    pub fn level(&self) -> LogLevel {
        match self {
            Severity::Debug => LogLevel::Debug,
            Severity::Info => LogLevel::Info,
            Severity::Warning => LogLevel::Warn,
            Severity::Error | Severity::Critical => LogLevel::Error,
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warning,
            Level::INFO => Severity::Info,
            // TRACE and DEBUG
            _ => Severity::Debug,
        }
    }
}

/// Sends individual log records to the reporting client
pub struct LogForwarder {
    client: Arc<dyn RemoteReportingClient>,
    clock: Arc<dyn Clock>,
}

impl LogForwarder {
    pub fn new(client: Arc<dyn RemoteReportingClient>, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }

    pub fn forward(&self, severity: Severity, message: &str) -> anyhow::Result<()> {
        self.client.log(LogEntry {
            time: self.clock.timestamp(),
            message: message.to_string(),
            level: severity.level(),
        })
    }
}

#[derive(Default)]
struct SlotState {
    active: Option<Arc<LogForwarder>>,
    policy: ForwardFailurePolicy,
    fault: Option<String>,
}

/// Holds the forwarder of the leaf currently running.
///
/// Cloning shares the slot; the adapter and the tracing layer hold clones of
/// the same slot. At most one forwarder is attached at a time.
#[derive(Clone, Default)]
pub struct ForwarderSlot {
    inner: Arc<Mutex<SlotState>>,
}

impl ForwarderSlot {
    pub fn new(policy: ForwardFailurePolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SlotState {
                policy,
                ..SlotState::default()
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SlotState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn policy(&self) -> ForwardFailurePolicy {
        self.state().policy
    }

    pub fn attach(&self, forwarder: LogForwarder) -> Result<()> {
        let mut state = self.state();
        if state.active.is_some() {
            return Err(ReportError::OutOfSequence(
                "a log forwarder is already attached".to_string(),
            ));
        }
        state.active = Some(Arc::new(forwarder));
        Ok(())
    }

    /// Remove the attached forwarder, returning whether one was attached
    pub fn detach(&self) -> bool {
        self.state().active.take().is_some()
    }

    pub fn is_attached(&self) -> bool {
        self.state().active.is_some()
    }

    /// Fault left behind by a failed forward under the abort policy
    pub fn take_fault(&self) -> Option<String> {
        self.state().fault.take()
    }

    /// Ship a record on behalf of the adapter.
    ///
    /// Under the abort policy the failure is returned right away.
    pub fn emit(&self, severity: Severity, message: &str) -> Result<()> {
        match self.forward(severity, message) {
            Some(fault) if self.policy() == ForwardFailurePolicy::Abort => {
                Err(ReportError::Forwarding(fault))
            }
            _ => Ok(()),
        }
    }

    /// Ship a record captured from the process log.
    ///
    /// Under the abort policy the failure is kept until the adapter's next
    /// callback picks it up.
    pub fn capture(&self, severity: Severity, message: &str) {
        if let Some(fault) = self.forward(severity, message) {
            let mut state = self.state();
            if state.policy == ForwardFailurePolicy::Abort && state.fault.is_none() {
                state.fault = Some(fault);
            }
        }
    }

    // The lock is released before calling the client, which may log itself.
    fn forward(&self, severity: Severity, message: &str) -> Option<String> {
        let _guard = ForwardingGuard::enter()?;
        let forwarder = self.state().active.clone()?;
        let result = forwarder.forward(severity, message);

        result.err().map(|e| {
            let fault = format!("{:#}", e);
            eprintln!("Failed to forward log record to Report Portal: {}", fault);
            fault
        })
    }
}

thread_local! {
    static FORWARDING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as shipping a record until dropped
struct ForwardingGuard;

impl ForwardingGuard {
    /// `None` when a record is already being shipped on this thread
    fn enter() -> Option<Self> {
        if FORWARDING.with(|busy| busy.replace(true)) {
            None
        } else {
            Some(Self)
        }
    }

    fn active() -> bool {
        FORWARDING.with(Cell::get)
    }
}

impl Drop for ForwardingGuard {
    fn drop(&mut self) {
        FORWARDING.with(|busy| busy.set(false));
    }
}

/// Tracing layer feeding process log events into a [`ForwarderSlot`].
///
/// Events of this crate are skipped, so are events raised while a record is
/// already being shipped on the same thread.
pub struct ForwarderLayer {
    slot: ForwarderSlot,
}

impl ForwarderLayer {
    pub fn new(slot: ForwarderSlot) -> Self {
        Self { slot }
    }
}

impl<S: Subscriber> Layer<S> for ForwarderLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(env!("CARGO_CRATE_NAME"))
            || ForwardingGuard::active()
            || !self.slot.is_attached()
        {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.slot.capture(Severity::from(*metadata.level()), &visitor.finish());
    }
}

/// Renders the event message followed by its other fields
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", field.name(), value);
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field, format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.push_field(field, format_args!("{:?}", value));
        }
    }
}
