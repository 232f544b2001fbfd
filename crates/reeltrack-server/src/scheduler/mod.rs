//! Background job scheduler.
//!
//! Registers the daily poll of every active post at `DAILY_RUN_HOUR:00`
//! server-local time.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::poll::Poller;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    poller: Arc<Poller>,
    daily_run_hour: u32,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_daily_poll_job(&scheduler, poller, daily_run_hour).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Six-field cron expression (with seconds) firing once a day at `hour:00:00`.
fn daily_cron(hour: u32) -> String {
    format!("0 0 {hour} * * *")
}

async fn register_daily_poll_job(
    scheduler: &JobScheduler,
    poller: Arc<Poller>,
    daily_run_hour: u32,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async_tz(
        daily_cron(daily_run_hour).as_str(),
        chrono::Local,
        move |_uuid, _lock| {
            let poller = Arc::clone(&poller);

            Box::pin(async move {
                tracing::info!("scheduler: starting daily poll");
                match poller.poll_all_active().await {
                    Ok(polled) => tracing::info!(polled, "scheduler: daily poll complete"),
                    Err(e) => tracing::error!(error = %e, "scheduler: daily poll failed"),
                }
            })
        },
    )?;

    scheduler.add(job).await?;
    tracing::info!(hour = daily_run_hour, "scheduler: daily poll registered");
    Ok(())
}
