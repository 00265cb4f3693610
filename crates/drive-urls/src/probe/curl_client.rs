//! Default [`HttpClient`] backed by libcurl (`curl` crate).

use std::str;
use std::time::Duration;

use super::headers::parse_header_lines;
use super::{HttpClient, ProbeRequest, ProbeResponse};
use crate::config::{ProbeConfig, ProbeMethod};
use crate::error::TransportError;

/// Blocking curl client. One easy handle per request; safe to share across threads.
///
/// Response bodies are never read: a GET stops as soon as the first body bytes arrive.
#[derive(Debug, Clone)]
pub struct CurlClient {
    connect_timeout: Duration,
    timeout: Duration,
    max_redirects: u32,
    user_agent: Option<String>,
}

impl Default for CurlClient {
    fn default() -> Self {
        Self::from_config(&ProbeConfig::default())
    }
}

impl CurlClient {
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            timeout: config.timeout(),
            max_redirects: u32::try_from(config.max_redirects).unwrap_or(u32::MAX),
            user_agent: config.user_agent.clone(),
        }
    }

    fn perform(&self, req: &ProbeRequest<'_>) -> Result<ProbeResponse, curl::Error> {
        let mut lines: Vec<String> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(req.url)?;
        match req.method {
            ProbeMethod::Head => easy.nobody(true)?,
            ProbeMethod::Get => easy.get(true)?,
        }
        easy.follow_location(req.follow_redirects)?;
        if req.follow_redirects {
            easy.max_redirections(self.max_redirects)?;
        }
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }

        let mut body_refused = false;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    lines.push(s.trim_end().to_string());
                }
                true
            })?;
            // Headers are all we need: refusing the first body chunk ends the
            // transfer, so a large download never runs into the timeout.
            transfer.write_function(|_| {
                body_refused = true;
                Ok(0)
            })?;
            transfer.perform()
        };
        match performed {
            Ok(()) => {}
            Err(e) if body_refused && e.is_write_error() => {}
            Err(e) => return Err(e),
        }

        let status = easy.response_code()?;
        let final_url = easy
            .effective_url()?
            .map(str::to_string)
            .unwrap_or_else(|| req.url.to_string());

        Ok(ProbeResponse {
            status,
            headers: parse_header_lines(&lines),
            final_url,
        })
    }
}

impl HttpClient for CurlClient {
    fn request(&self, req: &ProbeRequest<'_>) -> Result<ProbeResponse, TransportError> {
        self.perform(req).map_err(|e| classify_curl_error(&e))
    }
}

/// Map a curl error onto the transport failure kinds the probe distinguishes.
pub(crate) fn classify_curl_error(e: &curl::Error) -> TransportError {
    let msg = e.to_string();
    if e.is_operation_timedout() {
        return TransportError::Timeout(msg);
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
    {
        return TransportError::Connection(msg);
    }
    TransportError::Other(msg)
}
