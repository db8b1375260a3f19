// Lifecycle adapter - turns runner callbacks into Report Portal calls

use anyhow::Context;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::RemoteReportingClient;
use super::classifier::classify;
use super::forwarder::{ForwarderSlot, LogForwarder, Severity};
use super::types::{
    Issue, ItemFinish, ItemHandle, ItemStart, ItemStatus, ItemType, LaunchHandle, LaunchMode,
    LaunchStart,
};
use crate::config::{ConfigurationProvider, PortalConfig};
use crate::error::{ReportError, Result};
use crate::state::{Outcome, OutcomeKind, RunInfo, TestNode};
use crate::time::{Clock, system_clock};

const UNEXPECTED_SUCCESS_MESSAGE: &str = "The test was supposed to fail, but instead it has passed";

/// Pending state of the leaf between its start and finish
struct OpenLeaf {
    node_id: String,
    outcome: Option<OutcomeKind>,
    comments: Vec<String>,
}

/// Reports one test run to Report Portal.
///
/// The runner calls the methods in tree order: composites open before and
/// close after their children, and leaves never overlap. Each leaf gets
/// exactly one finish call, issued by [`LifecycleAdapter::finish_leaf`];
/// outcome callbacks only annotate it.
pub struct LifecycleAdapter {
    client: Arc<dyn RemoteReportingClient>,
    clock: Arc<dyn Clock>,
    slot: ForwarderSlot,
    root_id: Option<String>,
    launch: Option<LaunchHandle>,
    items: Vec<ItemHandle>,
    leaf: Option<OpenLeaf>,
}

impl LifecycleAdapter {
    pub fn new(client: Arc<dyn RemoteReportingClient>, slot: ForwarderSlot) -> Self {
        Self {
            client,
            clock: system_clock(),
            slot,
            root_id: None,
            launch: None,
            items: Vec::new(),
            leaf: None,
        }
    }

    /// Load configuration and connect.
    ///
    /// Fails as a whole when the configuration is unusable; `connect` is not
    /// called in that case.
    pub fn from_provider<P, F>(provider: &P, connect: F) -> Result<Self>
    where
        P: ConfigurationProvider + ?Sized,
        F: FnOnce(&PortalConfig) -> anyhow::Result<Arc<dyn RemoteReportingClient>>,
    {
        let config = provider.load()?;
        let client = connect(&config).with_context(|| {
            format!(
                "Failed to connect to {} (project {})",
                config.endpoint, config.project
            )
        })?;

        Ok(Self::new(client, ForwarderSlot::new(config.on_log_failure)))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Slot to bind a [`super::ForwarderLayer`] to
    pub fn slot(&self) -> &ForwarderSlot {
        &self.slot
    }

    /// Called once before any test runs
    pub fn start_run(&mut self, root: &TestNode, run: &RunInfo) -> Result<()> {
        let (name, mode) = match run.run_name.as_deref() {
            Some(name) if !name.is_empty() => (name.to_string(), LaunchMode::Default),
            _ => (root.type_name.clone(), LaunchMode::Debug),
        };

        let description = match run.tags_pattern.as_deref() {
            Some(pattern) if !pattern.is_empty() => Some(pattern.to_string()),
            _ => root.description.clone(),
        };

        info!(launch = %name, mode = %mode, "starting launch");
        let launch = self
            .client
            .start_launch(LaunchStart {
                name,
                start_time: self.clock.timestamp(),
                description,
                mode,
            })
            .context("start_launch")?;

        self.root_id = Some(root.id.clone());
        self.launch = Some(launch);
        Ok(())
    }

    /// Called when a suite or flow is about to run
    pub fn start_composite(&mut self, node: &TestNode) -> Result<()> {
        self.check_forwarding()?;
        if self.is_root(node) {
            return Ok(());
        }

        self.open_item(node, node.description.clone(), ItemType::Suite)
    }

    /// Called after every child of a suite or flow finished
    pub fn finish_composite(&mut self, node: &TestNode) -> Result<()> {
        self.check_forwarding()?;
        if self.is_root(node) {
            return Ok(());
        }

        let status = if node.success == Some(true) {
            ItemStatus::Passed
        } else {
            ItemStatus::Failed
        };

        self.close_item(&node.name, status, None)
    }

    /// Called when a case or block is about to run
    pub fn start_leaf(&mut self, node: &TestNode) -> Result<()> {
        self.check_forwarding()?;
        if let Some(open) = &self.leaf {
            return Err(ReportError::OutOfSequence(format!(
                "leaf {} started while {} is still open",
                node.id, open.node_id
            )));
        }

        let description = match (node.mode, node.description.as_deref()) {
            (Some(mode), Some(text)) => Some(format!("|{}| {}", mode.label(), text)),
            (Some(mode), None) => Some(format!("|{}| ", mode.label())),
            (None, text) => text.map(str::to_string),
        };

        self.open_item(node, description, ItemType::Step)?;
        self.leaf = Some(OpenLeaf {
            node_id: node.id.clone(),
            outcome: None,
            comments: Vec::new(),
        });

        self.slot
            .attach(LogForwarder::new(self.client.clone(), self.clock.clone()))?;

        let work_dir =
            std::path::absolute(&node.work_dir).unwrap_or_else(|_| node.work_dir.clone());
        self.slot
            .emit(Severity::Info, &format!("work dir:\n{}", work_dir.display()))
    }

    /// Record an outcome of the open leaf. May be called more than once;
    /// the last outcome decides the leaf's status.
    pub fn record_outcome(&mut self, node: &TestNode, outcome: Outcome) -> Result<()> {
        self.check_forwarding()?;
        let leaf = self.open_leaf(node)?;

        leaf.outcome = Some(outcome.kind());
        if let Some(comment) = outcome.comment() {
            leaf.comments.push(comment);
        }

        debug!(node = %node.name, outcome = ?outcome.kind(), "outcome recorded");
        if outcome.kind() == OutcomeKind::UnexpectedSuccess {
            self.slot.emit(Severity::Error, UNEXPECTED_SUCCESS_MESSAGE)?;
        }

        Ok(())
    }

    pub fn add_success(&mut self, node: &TestNode) -> Result<()> {
        self.record_outcome(node, Outcome::Success)
    }

    pub fn add_skip(&mut self, node: &TestNode, reason: &str) -> Result<()> {
        self.record_outcome(node, Outcome::Skipped(reason.to_string()))
    }

    pub fn add_failure(&mut self, node: &TestNode, exception: &str) -> Result<()> {
        self.record_outcome(node, Outcome::Failure(exception.to_string()))
    }

    pub fn add_error(&mut self, node: &TestNode, exception: &str) -> Result<()> {
        self.record_outcome(node, Outcome::Error(exception.to_string()))
    }

    pub fn add_expected_failure(&mut self, node: &TestNode, exception: &str) -> Result<()> {
        self.record_outcome(node, Outcome::ExpectedFailure(exception.to_string()))
    }

    pub fn add_unexpected_success(&mut self, node: &TestNode) -> Result<()> {
        self.record_outcome(node, Outcome::UnexpectedSuccess)
    }

    /// Close the open leaf. Called once per leaf after its outcomes.
    pub fn finish_leaf(&mut self, node: &TestNode) -> Result<()> {
        self.slot.detach();
        self.check_forwarding()?;
        self.open_leaf(node)?;
        let Some(leaf) = self.leaf.take() else {
            return Ok(());
        };

        let kind = leaf.outcome.unwrap_or(OutcomeKind::Unknown);
        let (status, issue_type) = classify(kind);
        let issue = issue_type.map(|issue_type| Issue {
            issue_type,
            comment: leaf.comments.join("\n"),
        });

        self.close_item(&node.name, status, issue)
    }

    /// Called once after every test ran
    pub fn finish_run(&mut self) -> Result<()> {
        if !self.items.is_empty() {
            warn!(open_items = self.items.len(), "finishing launch with open items");
        }

        self.client
            .finish_launch(self.clock.timestamp())
            .context("finish_launch")?;
        self.client.terminate().context("terminate")?;

        if let Some(launch) = self.launch.take() {
            info!(launch = %launch.0, "launch finished");
        }
        Ok(())
    }

    fn is_root(&self, node: &TestNode) -> bool {
        self.root_id.as_deref() == Some(node.id.as_str())
    }

    fn open_leaf(&mut self, node: &TestNode) -> Result<&mut OpenLeaf> {
        match self.leaf.as_mut() {
            Some(leaf) if leaf.node_id == node.id => Ok(leaf),
            Some(leaf) => Err(ReportError::OutOfSequence(format!(
                "callback for leaf {} while {} is open",
                node.id, leaf.node_id
            ))),
            None => Err(ReportError::OutOfSequence(format!(
                "callback for leaf {} which is not open",
                node.id
            ))),
        }
    }

    fn check_forwarding(&self) -> Result<()> {
        match self.slot.take_fault() {
            Some(fault) => Err(ReportError::Forwarding(fault)),
            None => Ok(()),
        }
    }

    fn open_item(
        &mut self,
        node: &TestNode,
        description: Option<String>,
        item_type: ItemType,
    ) -> Result<()> {
        let handle = self
            .client
            .start_item(ItemStart {
                name: node.name.clone(),
                description,
                tags: node.tags.clone(),
                start_time: self.clock.timestamp(),
                item_type,
            })
            .with_context(|| format!("start_item {}", node.name))?;

        debug!(item = %node.name, handle = %handle.0, item_type = %item_type, "item started");
        self.items.push(handle);
        Ok(())
    }

    fn close_item(&mut self, name: &str, status: ItemStatus, issue: Option<Issue>) -> Result<()> {
        let Some(handle) = self.items.pop() else {
            return Err(ReportError::OutOfSequence(format!(
                "finish for {} without an open item",
                name
            )));
        };

        self.client
            .finish_item(ItemFinish {
                end_time: self.clock.timestamp(),
                status,
                issue,
            })
            .with_context(|| format!("finish_item {}", name))?;

        debug!(item = %name, handle = %handle.0, status = %status, "item finished");
        Ok(())
    }
}
