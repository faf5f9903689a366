//! Error callback for the polling loop and for failed replies.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use teloxide::{error_handlers::ErrorHandler, ApiError, RequestError};

use ubot_core::{fault::TransportFault, Error};

/// Translate a teloxide error into the messenger-neutral fault.
///
/// teloxide decodes API rejections into named variants; the HTTP-style code is
/// reconstructed from the variant.
pub fn fault_from_request(e: &RequestError) -> TransportFault {
    match e {
        RequestError::Api(api) => TransportFault::api(api_error_code(api), api.to_string()),
        RequestError::RetryAfter(_) => TransportFault::api(429, e.to_string()),
        other => TransportFault::other(other.to_string()),
    }
}

fn api_error_code(api: &ApiError) -> u16 {
    match api {
        ApiError::NotFound => 401,
        ApiError::BotBlocked | ApiError::BotKicked => 403,
        ApiError::TerminatedByOtherGetUpdates => 409,
        _ => 400,
    }
}

/// Logs each fault and resumes.
///
/// The same instance serves the update listener and the dispatcher. Polling
/// failures wait out the backoff before the next `getUpdates`; a failed reply
/// is only logged, so the chat's worker and Ctrl-C shutdown are never held up.
#[derive(Clone, Debug)]
pub struct BackoffErrorHandler {
    backoff: Duration,
}

impl BackoffErrorHandler {
    pub fn new(backoff: Duration) -> Arc<Self> {
        Arc::new(Self { backoff })
    }

    pub fn report(&self, fault: &TransportFault) {
        tracing::error!("{fault}");
    }

    pub async fn report_and_wait(&self, fault: TransportFault) {
        self.report(&fault);
        if self.backoff.is_zero() {
            return;
        }
        tracing::warn!("Waiting {} seconds before retry", self.backoff.as_secs());
        tokio::time::sleep(self.backoff).await;
    }
}

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

impl ErrorHandler<RequestError> for BackoffErrorHandler {
    fn handle_error(self: Arc<Self>, error: RequestError) -> BoxFuture {
        let fault = fault_from_request(&error);
        Box::pin(async move { self.report_and_wait(fault).await })
    }
}

impl ErrorHandler<Error> for BackoffErrorHandler {
    fn handle_error(self: Arc<Self>, error: Error) -> BoxFuture {
        let fault = match error {
            Error::Transport(fault) => fault,
            other => TransportFault::other(other.to_string()),
        };
        self.report(&fault);
        Box::pin(async {})
    }
}
