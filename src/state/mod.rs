// State module - Runner-supplied descriptors
// Nodes of the test tree and the outcomes recorded against them

pub mod result;

pub use result::{Outcome, OutcomeKind};

use serde::Serialize;
use std::path::PathBuf;

/// Whether a node contains children or is an atomic unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Composite,
    Leaf,
}

/// Execution criticality of an atomic unit inside a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockMode {
    Critical,
    Optional,
    Finally,
}

impl BlockMode {
    /// Label rendered in front of the item description
    pub fn label(&self) -> &'static str {
        match self {
            BlockMode::Critical => "Critical",
            BlockMode::Optional => "Optional",
            BlockMode::Finally => "Finally",
        }
    }
}

/// Test tree node as described by the runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestNode {
    /// Identity used to recognise the run root
    pub id: String,
    pub name: String,
    /// Name of the node's test type, used for ad-hoc launch names
    pub type_name: String,
    /// Documentation or short description
    pub description: Option<String>,
    /// `None` when the node declares no tags at all
    pub tags: Option<Vec<String>>,
    pub mode: Option<BlockMode>,
    pub kind: NodeKind,
    pub work_dir: PathBuf,
    /// Aggregated by the runner once every child completed
    pub success: Option<bool>,
}

impl TestNode {
    /// Create a composite node (suite, flow)
    pub fn composite(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Composite)
    }

    /// Create a leaf node (case, block)
    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Leaf)
    }

    fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            type_name: name.clone(),
            name,
            description: None,
            tags: None,
            mode: None,
            kind,
            work_dir: PathBuf::from("."),
            success: None,
        }
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_mode(mut self, mode: BlockMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }
}

/// Run-level data the runner was started with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunInfo {
    pub run_name: Option<String>,
    /// Tags filter expression selecting the tests of this run
    pub tags_pattern: Option<String>,
}

impl RunInfo {
    pub fn named(run_name: impl Into<String>) -> Self {
        Self {
            run_name: Some(run_name.into()),
            tags_pattern: None,
        }
    }

    pub fn with_tags_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.tags_pattern = Some(pattern.into());
        self
    }
}
