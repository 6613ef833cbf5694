//! Relay operation enum.

use std::fmt;

/// All operations the relay forwards upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayOperation {
    /// Submit an image-to-video generation task.
    SubmitTask,
    /// Fetch the status/result of a previously submitted task.
    GetTaskResult,
}

impl RelayOperation {
    /// Every operation, in routing order.
    pub const ALL: [Self; 2] = [Self::SubmitTask, Self::GetTaskResult];

    /// Returns the operation name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubmitTask => "SubmitTask",
            Self::GetTaskResult => "GetTaskResult",
        }
    }

    /// Returns the upstream API action signed into the request.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::SubmitTask => "CVSync2AsyncSubmitTask",
            Self::GetTaskResult => "CVSync2AsyncGetResult",
        }
    }

    /// Returns the inbound path that triggers this operation.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::SubmitTask => "/generate-video",
            Self::GetTaskResult => "/get-video",
        }
    }

    /// Resolve an operation from an inbound request path.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.path() == path)
    }
}

impl fmt::Display for RelayOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
