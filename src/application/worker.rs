//! Background execution of backend requests.
//!
//! The UI thread never blocks on the network: each request runs on its own
//! thread and its outcome is handed back over a channel that the event loop
//! drains between redraws.

use crate::domain::{
    AnalysisResult, AnalyzeRequest, Operation, RewriteRequest, RewrittenBullet, UploadResponse,
};
use crate::infrastructure::{ApiResult, MatcherApi};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

/// A validated request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingRequest {
    Upload { path: PathBuf },
    Analyze(AnalyzeRequest),
    Rewrite(RewriteRequest),
}

/// The result of a finished request, tagged by operation.
#[derive(Debug)]
pub enum RequestOutcome {
    Uploaded(ApiResult<UploadResponse>),
    Analyzed(ApiResult<AnalysisResult>),
    Rewritten(ApiResult<Vec<RewrittenBullet>>),
}

impl PendingRequest {
    pub fn operation(&self) -> Operation {
        match self {
            PendingRequest::Upload { .. } => Operation::Upload,
            PendingRequest::Analyze(_) => Operation::Analyze,
            PendingRequest::Rewrite(_) => Operation::Rewrite,
        }
    }

    /// Runs the request against `api`, blocking until it completes.
    pub fn execute(&self, api: &dyn MatcherApi) -> RequestOutcome {
        match self {
            PendingRequest::Upload { path } => RequestOutcome::Uploaded(api.upload_resume(path)),
            PendingRequest::Analyze(request) => RequestOutcome::Analyzed(api.analyze(request)),
            PendingRequest::Rewrite(request) => {
                RequestOutcome::Rewritten(api.rewrite_bullets(request))
            }
        }
    }
}

impl RequestOutcome {
    pub fn operation(&self) -> Operation {
        match self {
            RequestOutcome::Uploaded(_) => Operation::Upload,
            RequestOutcome::Analyzed(_) => Operation::Analyze,
            RequestOutcome::Rewritten(_) => Operation::Rewrite,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            RequestOutcome::Uploaded(result) => result.is_ok(),
            RequestOutcome::Analyzed(result) => result.is_ok(),
            RequestOutcome::Rewritten(result) => result.is_ok(),
        }
    }
}

/// Runs requests on background threads and collects their outcomes.
pub struct RequestWorker {
    api: Arc<dyn MatcherApi>,
    sender: Sender<RequestOutcome>,
    receiver: Receiver<RequestOutcome>,
}

impl RequestWorker {
    pub fn new(api: Arc<dyn MatcherApi>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            api,
            sender,
            receiver,
        }
    }

    /// Starts `request` on a new thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread could not be spawned; the request was
    /// not sent in that case.
    pub fn submit(&self, request: PendingRequest) -> io::Result<()> {
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();
        let operation = request.operation();

        tracing::info!(?operation, "dispatching request");
        thread::Builder::new()
            .name(format!("jobfit-{:?}", operation).to_lowercase())
            .spawn(move || {
                let outcome = request.execute(api.as_ref());
                if outcome.is_success() {
                    tracing::info!(?operation, "request completed");
                } else {
                    tracing::warn!(?operation, "request failed");
                }
                // The receiver only goes away when the UI is shutting down.
                let _ = sender.send(outcome);
            })?;
        Ok(())
    }

    /// Returns a finished outcome if one is waiting.
    pub fn try_recv(&self) -> Option<RequestOutcome> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for the next outcome.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RequestOutcome> {
        self.receiver.recv_timeout(timeout).ok()
    }
}
