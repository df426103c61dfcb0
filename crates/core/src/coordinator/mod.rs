use crate::{BarValue, Lane, LaneStatus, Renderer, Result, RunReport, Scheduler};

/// Reports from both lanes of a dual run.
#[derive(Debug, Clone, PartialEq)]
pub struct DualReport {
    pub first: RunReport,
    pub second: RunReport,
}

/// Two independent lanes driven side by side.
///
/// Both runs share the caller's task, so they interleave only at pacing
/// holds. `run_both` is a join barrier: it resolves after the slower lane.
#[derive(Debug)]
pub struct Coordinator<R, V = i64> {
    first: Lane<R, V>,
    second: Lane<R, V>,
}

impl<R: Renderer, V: BarValue> Coordinator<R, V> {
    pub fn new(first: Lane<R, V>, second: Lane<R, V>) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &Lane<R, V> {
        &self.first
    }

    pub fn second(&self) -> &Lane<R, V> {
        &self.second
    }

    pub fn first_mut(&mut self) -> &mut Lane<R, V> {
        &mut self.first
    }

    pub fn second_mut(&mut self) -> &mut Lane<R, V> {
        &mut self.second
    }

    pub fn all_done(&self) -> bool {
        self.first.status() == LaneStatus::Done && self.second.status() == LaneStatus::Done
    }

    pub async fn run_both(&mut self, scheduler: &Scheduler) -> Result<DualReport> {
        self.run_both_with(scheduler, scheduler).await
    }

    /// Runs each lane under its own scheduler and waits for both, even when
    /// one of them fails. The first lane's error wins if both fail.
    pub async fn run_both_with(&mut self, first: &Scheduler, second: &Scheduler) -> Result<DualReport> {
        tracing::debug!(
            first = %self.first.algorithm(),
            second = %self.second.algorithm(),
            "dual run started"
        );
        let (first, second) = tokio::join!(first.run(&mut self.first), second.run(&mut self.second));
        let report = DualReport {
            first: first?,
            second: second?,
        };
        tracing::debug!(
            first_ms = report.first.elapsed.as_millis() as u64,
            second_ms = report.second.elapsed.as_millis() as u64,
            "dual run joined"
        );
        Ok(report)
    }
}
