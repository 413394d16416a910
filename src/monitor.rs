//! Run lifecycle monitoring
//!
//! Polls a run until it reaches a terminal life-cycle state, then classifies
//! the outcome: TERMINATED with SUCCESS returns normally, every other terminal
//! state is a [`JobError::RemoteJobFailed`]. Polls are strictly sequential and
//! separated by a cancellable wait.

use std::time::Duration;

use chrono::{DateTime, Utc};
use dbx_protocol::{GetRunResponse, RunId, RunState, TerminalState};
use tracing::info;

use crate::cancel::{CancelToken, WaitOutcome};
use crate::error::{JobError, JobResult};
use crate::host::JobsClient;

/// Anything that can report a run's state.
pub trait RunStatusSource {
    fn get_run(&self, run_id: &RunId) -> JobResult<GetRunResponse>;

    /// Fallback link when the status response carries none.
    fn run_page_url(&self, run_id: &RunId) -> String;
}

impl RunStatusSource for JobsClient {
    fn get_run(&self, run_id: &RunId) -> JobResult<GetRunResponse> {
        JobsClient::get_run(self, run_id)
    }

    fn run_page_url(&self, run_id: &RunId) -> String {
        self.get_run_page_url(run_id)
    }
}

/// One non-terminal observation, handed to the observer.
#[derive(Debug, Clone)]
pub struct RunObservation {
    pub run_id: RunId,
    /// 1-based poll number
    pub poll: u32,
    pub state: RunState,
    pub run_page_url: String,
    pub observed_at: DateTime<Utc>,
}

/// A run that terminated successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub final_state: RunState,
    /// Status queries made, the terminal one included
    pub polls: u32,
    pub run_page_url: String,
}

/// Polls runs to completion.
#[derive(Debug, Clone)]
pub struct LifecycleMonitor {
    poll_interval: Duration,
    cancel: CancelToken,
}

impl Default for LifecycleMonitor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_POLL_INTERVAL)
    }
}

impl LifecycleMonitor {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            cancel: CancelToken::new(),
        }
    }

    /// Share an existing cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Poll until terminal.
    pub fn watch(
        &self,
        source: &dyn RunStatusSource,
        job_name: &str,
        run_id: &RunId,
    ) -> JobResult<RunOutcome> {
        self.watch_with(source, job_name, run_id, |_| {})
    }

    /// Poll until terminal, reporting every non-terminal observation.
    pub fn watch_with<F>(
        &self,
        source: &dyn RunStatusSource,
        job_name: &str,
        run_id: &RunId,
        mut observer: F,
    ) -> JobResult<RunOutcome>
    where
        F: FnMut(&RunObservation),
    {
        let mut polls = 0;

        loop {
            if self.cancel.is_cancelled() {
                return Err(JobError::Cancelled {
                    run_id: run_id.clone(),
                });
            }

            let run = source.get_run(run_id)?;
            polls += 1;
            let run_page_url = run
                .run_page_url
                .clone()
                .unwrap_or_else(|| source.run_page_url(run_id));

            if run.state.is_terminal() {
                if run.state.is_successful() {
                    info!(job = job_name, %run_id, polls, "{} completed successfully.", job_name);
                    return Ok(RunOutcome {
                        run_id: run_id.clone(),
                        final_state: run.state,
                        polls,
                        run_page_url,
                    });
                }
                return Err(JobError::RemoteJobFailed {
                    job_name: job_name.to_string(),
                    run_id: run_id.clone(),
                    state: run.state,
                });
            }

            info!(job = job_name, %run_id, state = %run.state, "{} in run state: {}", job_name, run.state);
            info!("View run status, Spark UI, and logs at {}", run_page_url);
            observer(&RunObservation {
                run_id: run_id.clone(),
                poll: polls,
                state: run.state,
                run_page_url,
                observed_at: Utc::now(),
            });

            info!("Sleeping for {:?}.", self.poll_interval);
            if self.cancel.wait(self.poll_interval) == WaitOutcome::Cancelled {
                return Err(JobError::Cancelled {
                    run_id: run_id.clone(),
                });
            }
        }
    }
}
