use std::time::Duration;

use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;

/// Builds a `reqwest` client wrapped with the teacher's retry middleware
/// stack, reused here for outbound calls to notifier/AI endpoints that
/// benefit from transient-failure retry (collectors use a plain client
/// instead, since they already implement their own poll-cycle backoff).
pub fn build_retrying_client(max_retries: u32) -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
    reqwest_middleware::ClientBuilder::new(
        reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("reqwest client"),
    )
    .with(RetryTransientMiddleware::new_with_policy(retry_policy))
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_client_without_panicking() {
        let _client = build_retrying_client(3);
    }
}
