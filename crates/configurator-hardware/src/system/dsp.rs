//! DSP detection service client.

use crate::traits::DspService;
use crate::types::DspInfo;
use configurator_core::constants::DSP_DETECT_PATH;
use std::time::Duration;
use tracing::{debug, error, warn};

/// HTTP client for the DSP detection service.
///
/// Connection refusals, timeouts, non-200 answers and malformed JSON all
/// count as "service unavailable".
#[derive(Debug, Clone)]
pub struct HttpDspService {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpDspService {
    /// Create a client for the service at `base_url` (e.g. `http://localhost:13141`).
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}{}", base_url.trim_end_matches('/'), DSP_DETECT_PATH),
            timeout,
        }
    }

    /// Endpoint queried by this client.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DspService for HttpDspService {
    async fn detect_dsp(&self) -> Option<DspInfo> {
        let response = match self.client.get(&self.url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() => {
                debug!("DSP service not available (connection refused)");
                return None;
            }
            Err(e) if e.is_timeout() => {
                warn!(
                    "DSP service request timed out after {}ms",
                    self.timeout.as_millis()
                );
                return None;
            }
            Err(e) => {
                error!("Error communicating with DSP service: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("DSP service returned status code {}", response.status());
            return None;
        }

        match response.json::<DspInfo>().await {
            Ok(info) => {
                debug!("DSP detection response: {:?}", info);
                Some(info)
            }
            Err(e) => {
                error!("Failed to parse DSP detection response: {}", e);
                None
            }
        }
    }
}
