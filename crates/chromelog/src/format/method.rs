use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conf::StyleCategory;

/// Console API methods a row may target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConsoleMethod {
    #[default]
    Log,
    Info,
    Warn,
    Error,
    Debug,
    Trace,
    Dir,
    Dirxml,
    Table,
    Group,
    GroupCollapsed,
    GroupEnd,
    Assert,
    Count,
    CountReset,
    Time,
    TimeLog,
    TimeEnd,
    TimeStamp,
    Profile,
    ProfileEnd,
    Clear,
}

impl ConsoleMethod {
    pub const ALL: [ConsoleMethod; 22] = [
        ConsoleMethod::Log,
        ConsoleMethod::Info,
        ConsoleMethod::Warn,
        ConsoleMethod::Error,
        ConsoleMethod::Debug,
        ConsoleMethod::Trace,
        ConsoleMethod::Dir,
        ConsoleMethod::Dirxml,
        ConsoleMethod::Table,
        ConsoleMethod::Group,
        ConsoleMethod::GroupCollapsed,
        ConsoleMethod::GroupEnd,
        ConsoleMethod::Assert,
        ConsoleMethod::Count,
        ConsoleMethod::CountReset,
        ConsoleMethod::Time,
        ConsoleMethod::TimeLog,
        ConsoleMethod::TimeEnd,
        ConsoleMethod::TimeStamp,
        ConsoleMethod::Profile,
        ConsoleMethod::ProfileEnd,
        ConsoleMethod::Clear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleMethod::Log => "log",
            ConsoleMethod::Info => "info",
            ConsoleMethod::Warn => "warn",
            ConsoleMethod::Error => "error",
            ConsoleMethod::Debug => "debug",
            ConsoleMethod::Trace => "trace",
            ConsoleMethod::Dir => "dir",
            ConsoleMethod::Dirxml => "dirxml",
            ConsoleMethod::Table => "table",
            ConsoleMethod::Group => "group",
            ConsoleMethod::GroupCollapsed => "groupCollapsed",
            ConsoleMethod::GroupEnd => "groupEnd",
            ConsoleMethod::Assert => "assert",
            ConsoleMethod::Count => "count",
            ConsoleMethod::CountReset => "countReset",
            ConsoleMethod::Time => "time",
            ConsoleMethod::TimeLog => "timeLog",
            ConsoleMethod::TimeEnd => "timeEnd",
            ConsoleMethod::TimeStamp => "timeStamp",
            ConsoleMethod::Profile => "profile",
            ConsoleMethod::ProfileEnd => "profileEnd",
            ConsoleMethod::Clear => "clear",
        }
    }

    /// Resolve a row's `type` value; names are case-sensitive like the console API.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == name)
    }

    /// Methods whose arguments get a generated substitution pattern
    pub fn takes_pattern(&self) -> bool {
        matches!(
            self,
            ConsoleMethod::Log
                | ConsoleMethod::Info
                | ConsoleMethod::Warn
                | ConsoleMethod::Error
                | ConsoleMethod::Group
                | ConsoleMethod::GroupCollapsed
        )
    }

    /// Style category used for string arguments of this method
    pub fn style_category(&self) -> Option<StyleCategory> {
        match self {
            ConsoleMethod::Log => Some(StyleCategory::Log),
            ConsoleMethod::Info => Some(StyleCategory::Info),
            ConsoleMethod::Warn => Some(StyleCategory::Warn),
            ConsoleMethod::Error => Some(StyleCategory::Error),
            ConsoleMethod::Debug => Some(StyleCategory::Debug),
            ConsoleMethod::Group | ConsoleMethod::GroupCollapsed => Some(StyleCategory::Group),
            _ => None,
        }
    }

    pub fn opens_group(&self) -> bool {
        matches!(self, ConsoleMethod::Group | ConsoleMethod::GroupCollapsed)
    }
}

impl fmt::Display for ConsoleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown console method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for ConsoleMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownMethod(s.to_string()))
    }
}
