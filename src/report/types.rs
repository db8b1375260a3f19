// Vocabulary shared with the Report Portal service

use serde::Serialize;
use std::fmt;

/// Launch mode. Named runs are public, ad-hoc runs go to the debug tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LaunchMode {
    Default,
    Debug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemType {
    #[serde(rename = "Suite")]
    Suite,
    #[serde(rename = "STEP")]
    Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemStatus {
    Passed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    ProductBug,
    AutomationBug,
    NoDefect,
    ToInvestigate,
}

/// Levels accepted by the remote log endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LaunchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchMode::Default => "DEFAULT",
            LaunchMode::Debug => "DEBUG",
        }
    }
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Suite => "Suite",
            ItemType::Step => "STEP",
        }
    }
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Passed => "PASSED",
            ItemStatus::Failed => "FAILED",
            ItemStatus::Skipped => "SKIPPED",
        }
    }
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::ProductBug => "PRODUCT_BUG",
            IssueType::AutomationBug => "AUTOMATION_BUG",
            IssueType::NoDefect => "NO_DEFECT",
            IssueType::ToInvestigate => "TO_INVESTIGATE",
        }
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(LaunchMode, ItemType, ItemStatus, IssueType, LogLevel);

/// Defect classification attached to a finished item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub issue_type: IssueType,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchStart {
    pub name: String,
    pub start_time: String,
    pub description: Option<String>,
    pub mode: LaunchMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemStart {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub start_time: String,
    pub item_type: ItemType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFinish {
    pub end_time: String,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<Issue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub time: String,
    pub message: String,
    pub level: LogLevel,
}

/// Opaque reference to the launch returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchHandle(pub String);

/// Opaque reference to a started test item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemHandle(pub String);
