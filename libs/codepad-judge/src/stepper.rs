//! Line cursor for the editor's simulated step debugger.
//!
//! Each step is a fresh, complete execution carrying `startAtLine` /
//! `stopAtLine` hints. The judge has no notion of pausing, so the hints do
//! not change what runs; this only tracks where the editor's cursor goes.

use codepad_common::types::ExecutionRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugCursor {
    breakpoints: Vec<u32>,
    line_count: u32,
}

/// Where the next simulated step starts and stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub start_at_line: Option<u32>,
    pub stop_at_line: u32,
    /// The cursor reached the last line
    pub finished: bool,
}

impl DebugCursor {
    /// Breakpoints are 1-based; zero entries are dropped
    pub fn new(mut breakpoints: Vec<u32>, line_count: u32) -> Self {
        breakpoints.retain(|&line| line > 0);
        breakpoints.sort_unstable();
        breakpoints.dedup();
        Self {
            breakpoints,
            line_count: line_count.max(1),
        }
    }

    pub fn breakpoints(&self) -> &[u32] {
        &self.breakpoints
    }

    /// First stop: the earliest breakpoint, or line 1
    pub fn start(&self) -> StepPlan {
        let stop = self.breakpoints.first().copied().unwrap_or(1);
        self.plan(None, stop)
    }

    /// Next stop after `current`: the next breakpoint past it, else the following line
    pub fn step(&self, current: u32) -> StepPlan {
        let stop = self
            .breakpoints
            .iter()
            .copied()
            .find(|&bp| bp > current)
            .unwrap_or(current.saturating_add(1));
        self.plan(Some(current), stop)
    }

    fn plan(&self, start_at_line: Option<u32>, stop_at_line: u32) -> StepPlan {
        StepPlan {
            start_at_line,
            stop_at_line,
            finished: stop_at_line >= self.line_count,
        }
    }
}

impl StepPlan {
    /// Copy of `request` carrying this plan's line hints
    pub fn apply(&self, request: &ExecutionRequest) -> ExecutionRequest {
        let mut request = request.clone();
        request.options.start_at_line = self.start_at_line;
        request.options.stop_at_line = Some(self.stop_at_line);
        request
    }
}
