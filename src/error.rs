use net::ClientError;

#[derive(thiserror::Error, Debug)]
pub enum ReportableError {
    #[error("Request timeout (re::rt)")]
    Timeout(#[from] tokio::time::error::Elapsed),
    #[error("Query failed - {0} (re::qf)")]
    Client(#[from] ClientError),
    #[error("Worker task failed (re::wt)")]
    Join(#[from] tokio::task::JoinError),
}

impl ReportableError {
    /// Short status word for tabular output.
    pub const fn label(&self) -> &'static str {
        match self {
            ReportableError::Timeout(_) => "timeout",
            ReportableError::Client(ClientError::Io(_)) => "unreachable",
            ReportableError::Client(ClientError::Proto(_)) => "protocol error",
            ReportableError::Client(ClientError::Status(_)) => "bad status",
            ReportableError::Join(_) => "internal error",
        }
    }
}
