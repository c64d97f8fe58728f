//! ECP dispatcher. Sends External Control Protocol commands to a device on
//! port 8060 and reduces the outcome to a success flag (actions) or the raw
//! response body (queries).

use std::time::Duration;

use tracing::{debug, info, warn};

use super::command::EcpCommand;
use super::types::{DispatchResult, QueryError};

/// Sends one ECP request per call over a freshly built HTTP client.
///
/// Holds no connection state, only where and how long to wait. Every call
/// builds its own `reqwest::Client` and drops it before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcpDispatcher {
    port: u16,
    timeout: Duration,
}

impl Default for EcpDispatcher {
    fn default() -> Self {
        Self {
            port: Self::PORT,
            timeout: Self::TIMEOUT,
        }
    }
}

impl EcpDispatcher {
    pub const PORT: u16 = 8060;
    pub const TIMEOUT: Duration = Duration::from_secs(5);

    /// Dispatcher aimed at a non-standard port, used against simulated devices
    #[cfg(test)]
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    pub fn url(&self, ip: &str, path: &str) -> String {
        format!("http://{}:{}/{}", ip, self.port, path)
    }

    fn client(&self) -> reqwest::Result<reqwest::Client> {
        // ECP devices live on the LAN; never route through an env proxy
        reqwest::Client::builder()
            .timeout(self.timeout)
            .no_proxy()
            .build()
    }

    /// POST an action command with an empty body. 2xx is `Success`, anything
    /// else (status, transport error, client error) is `Failure`.
    pub async fn send_action(&self, ip: &str, command: &EcpCommand) -> DispatchResult {
        let path = command.path();
        let url = self.url(ip, &path);

        let client = match self.client() {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to create HTTP client for {}: {}", url, e);
                return DispatchResult::Failure;
            }
        };

        debug!("POST {}", url);
        match client.post(&url).body("").send().await {
            Ok(response) => {
                if response.status().is_success() {
                    info!("Successfully sent ECP command: {}", path);
                    DispatchResult::Success
                } else {
                    warn!("ECP command {} to {} returned status: {}", path, ip, response.status());
                    DispatchResult::Failure
                }
            }
            Err(e) => {
                warn!("Failed to send ECP command {} to {}: {}", path, ip, e);
                DispatchResult::Failure
            }
        }
    }

    /// GET a query command and return the response body verbatim on 2xx
    pub async fn send_query(&self, ip: &str, command: &EcpCommand) -> Result<String, QueryError> {
        let path = command.path();
        let url = self.url(ip, &path);

        let client = self.client().map_err(|e| QueryError::Client(e.to_string()))?;

        debug!("GET {}", url);
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default().to_string(),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| QueryError::Body(e.to_string()))
    }
}
