// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build stages.

use tracing::debug;

/// Progress of a single `build` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Stage {
    #[default]
    Uninitialized,
    ParametersResolved,
    NamespaceOpened,
    RecordMerged,
    Finalized,
}

impl Stage {
    /// The stage that follows this one, `None` once finalized.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Uninitialized => Some(Self::ParametersResolved),
            Self::ParametersResolved => Some(Self::NamespaceOpened),
            Self::NamespaceOpened => Some(Self::RecordMerged),
            Self::RecordMerged => Some(Self::Finalized),
            Self::Finalized => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finalized)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::ParametersResolved => "parameters_resolved",
            Self::NamespaceOpened => "namespace_opened",
            Self::RecordMerged => "record_merged",
            Self::Finalized => "finalized",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Walks a build through its stages, each exactly once and in order.
#[derive(Debug, Default)]
pub(crate) struct StageTracker {
    stage: Stage,
}

impl StageTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) const fn current(&self) -> Stage {
        self.stage
    }

    /// Move to the next stage and return it.
    pub(crate) fn advance(&mut self) -> Stage {
        let Some(next) = self.stage.next() else {
            return self.stage;
        };
        debug!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
        next
    }
}
