use std::future::Future;

use tally_finance::ServiceError;

/// Run an async service call to completion from synchronous pipeline code.
///
/// Inside a multi-thread runtime this uses `block_in_place`; otherwise a
/// fresh runtime is built for the call.
pub fn block_on<T>(fut: impl Future<Output = Result<T, ServiceError>>) -> Result<T, ServiceError> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        tokio::task::block_in_place(|| handle.block_on(fut))
    } else {
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| ServiceError::Transport(format!("create tokio runtime: {e}")))?;
        rt.block_on(fut)
    }
}

/// Read a response body, turning a non-success status into an error.
pub async fn success_body(resp: reqwest::Response) -> Result<String, ServiceError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| ServiceError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
