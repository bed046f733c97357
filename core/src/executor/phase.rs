//! Scheduler lifecycle: `Idle → Dispatching → Collecting → Done`.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    Idle,
    Dispatching,
    Collecting,
    Done,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: SchedulerPhase,
        to: SchedulerPhase,
    },
    #[error("Cannot transition from terminal state {state:?}")]
    FromTerminalState { state: SchedulerPhase },
}

impl SchedulerPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Dispatching),
            Self::Dispatching => Some(Self::Collecting),
            Self::Collecting => Some(Self::Done),
            Self::Done => None,
        }
    }

    pub fn validate(from: Self, to: Self) -> Result<(), TransitionError> {
        if from.is_terminal() {
            return Err(TransitionError::FromTerminalState { state: from });
        }
        if from.next() == Some(to) {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from, to })
        }
    }
}

/// Tracks the phase of one scheduler run.
#[derive(Debug)]
pub struct PhaseTracker {
    current: SchedulerPhase,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            current: SchedulerPhase::Idle,
        }
    }

    pub fn current(&self) -> SchedulerPhase {
        self.current
    }

    pub fn advance(&mut self, to: SchedulerPhase) -> Result<(), TransitionError> {
        SchedulerPhase::validate(self.current, to)?;
        tracing::debug!(from = ?self.current, to = ?to, "scheduler phase");
        self.current = to;
        Ok(())
    }
}
