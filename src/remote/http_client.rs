use super::*;

/// A wire-level failure plus the retryability decision for it.
pub(super) struct ApiError {
    pub(super) retryable: bool,
    pub(super) error: anyhow::Error,
}

impl ApiError {
    pub(super) fn transport(err: reqwest::Error) -> Self {
        // Rate-limit, transport-level conflict and server-side unavailability
        // are retryable; a request that never completed is too.
        let retryable = match err.status() {
            Some(s) => {
                s == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || s == reqwest::StatusCode::CONFLICT
                    || s.is_server_error()
            }
            None => true,
        };
        Self {
            retryable,
            error: anyhow::Error::new(err),
        }
    }

    pub(super) fn fatal(error: anyhow::Error) -> Self {
        Self {
            retryable: false,
            error,
        }
    }
}

pub(super) fn with_retries<T>(label: &str, mut f: impl FnMut() -> Result<T, ApiError>) -> Result<T> {
    const ATTEMPTS: usize = 4;
    let mut last: Option<anyhow::Error> = None;
    for i in 0..ATTEMPTS {
        match f() {
            Ok(v) => return Ok(v),
            Err(err) => {
                let retry = err.retryable && i + 1 < ATTEMPTS;
                last = Some(err.error);
                if !retry {
                    break;
                }
                let delay = std::time::Duration::from_millis(200 * (1 << i));
                tracing::debug!(label, attempt = i + 1, ?delay, "retrying gateway call");
                std::thread::sleep(delay);
            }
        }
    }
    Err(last
        .unwrap_or_else(|| anyhow::anyhow!("unknown error"))
        .context(label.to_string()))
}

impl RemoteClient {
    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::fatal(anyhow::anyhow!(
                "unauthorized (token invalid or expired)"
            )));
        }
        resp.error_for_status().map_err(|e| {
            let mut err = ApiError::transport(e);
            err.error = err.error.context(format!("{label} status"));
            err
        })
    }

    pub(super) fn auth(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
