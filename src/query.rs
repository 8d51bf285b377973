use std::time::{Duration, Instant};

use futures::future::join_all;
use net::{transport, Client, ClientError, ServerInfo};
use tokio::time::timeout;

use crate::{error::ReportableError, logging::PingLogger, target::Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingReport {
    pub payload: i64,
    pub latency: Duration,
}

#[derive(Debug)]
pub struct StatusReport {
    pub info: ServerInfo,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct SweepEntry {
    pub label: String,
    pub target: Target,
    pub outcome: Result<StatusReport, ReportableError>,
}

pub async fn ping(target: &Target, deadline: Duration) -> Result<PingReport, ReportableError> {
    run("ping", target, deadline, |client| {
        let started = Instant::now();
        let payload = client.ping(None)?;
        Ok(PingReport {
            payload,
            latency: started.elapsed(),
        })
    })
    .await
}

pub async fn status(target: &Target, deadline: Duration) -> Result<StatusReport, ReportableError> {
    let started = Instant::now();
    let info = run("status", target, deadline, Client::status).await?;
    Ok(StatusReport {
        info,
        elapsed: started.elapsed(),
    })
}

/// Queries every target concurrently, one blocking worker each.
pub async fn sweep(targets: Vec<(String, Target)>, deadline: Duration) -> Vec<SweepEntry> {
    let queries = targets.into_iter().map(|(label, target)| async move {
        let outcome = status(&target, deadline).await;
        SweepEntry {
            label,
            target,
            outcome,
        }
    });
    let entries = join_all(queries).await;

    let online = entries.iter().filter(|entry| entry.outcome.is_ok()).count();
    PingLogger::sweep_finished(entries.len(), online);
    entries
}

/// Runs a blocking client operation under `deadline`.
///
/// Connect, read and write each carry the same deadline on the socket, so a
/// worker abandoned by the timeout ends within a few deadlines of it.
async fn run<T, F>(
    kind: &'static str,
    target: &Target,
    deadline: Duration,
    op: F,
) -> Result<T, ReportableError>
where
    T: Send + 'static,
    F: FnOnce(Client) -> Result<T, ClientError> + Send + 'static,
{
    PingLogger::query_started(kind, target);
    let started = Instant::now();

    let host = target.host.clone();
    let port = target.port;
    let task = tokio::task::spawn_blocking(move || {
        let stream = transport::connect_timeout(&host, port, deadline)?;
        stream.set_read_timeout(Some(deadline))?;
        stream.set_write_timeout(Some(deadline))?;
        op(Client::with_transport(host, port, stream))
    });

    let result = match timeout(deadline, task).await {
        Err(elapsed) => {
            PingLogger::query_timeout(kind, target, deadline);
            return Err(elapsed.into());
        }
        Ok(joined) => joined?.map_err(ReportableError::from),
    };

    match &result {
        Ok(_) => PingLogger::query_completed(kind, target, started.elapsed()),
        Err(err) => PingLogger::query_failed(kind, target, err),
    }
    result
}
