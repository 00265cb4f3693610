//! Accessibility probe.
//!
//! The network is reached only through [`HttpClient`], so callers can inject a fake in tests
//! or share one client across threads. [`resolve_url`] never lets the client follow redirects:
//! it walks the chain itself so a hop to a sign-in page is seen before it is fetched.

mod curl_client;
mod headers;

pub use curl_client::CurlClient;

use crate::config::{ProbeConfig, ProbeMethod};
use crate::error::{AccessDenial, DriveUrlError, TransportError, UnresolvedCause};

/// One outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRequest<'a> {
    pub method: ProbeMethod,
    pub url: &'a str,
    pub follow_redirects: bool,
}

/// What came back: status, headers, and the URL that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u32,
    pub headers: Vec<(String, String)>,
    /// Equal to the request URL unless the client followed redirects.
    pub final_url: String,
}

impl ProbeResponse {
    /// First header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Capability to perform a single HTTP request.
pub trait HttpClient {
    fn request(&self, req: &ProbeRequest<'_>) -> Result<ProbeResponse, TransportError>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn request(&self, req: &ProbeRequest<'_>) -> Result<ProbeResponse, TransportError> {
        (**self).request(req)
    }
}

fn is_redirect(status: u32) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Servers that refuse HEAD answer 405 or 501; the hop is repeated with GET.
fn rejects_head(status: u32) -> bool {
    matches!(status, 405 | 501)
}

fn host_of(url: &url::Url) -> &str {
    url.host_str().unwrap_or("")
}

/// Follows `url` hop by hop and returns the URL that finally answers 2xx.
///
/// - a hop onto a login host, or a 2xx served from or landing on one, is `NotPubliclyAccessible`
/// - a HEAD hop answered with 405/501 is retried once with GET
/// - any other non-2xx, non-redirect status is `NotPubliclyAccessible`
/// - transport failures, broken redirects and redirect loops are `Unresolved`
pub fn resolve_url(
    client: &dyn HttpClient,
    url: &str,
    config: &ProbeConfig,
) -> Result<String, DriveUrlError> {
    let start = url.to_string();
    let unresolved = |cause: UnresolvedCause| DriveUrlError::Unresolved {
        url: start.clone(),
        cause,
    };
    let not_public = |denial: AccessDenial| DriveUrlError::NotPubliclyAccessible {
        url: start.clone(),
        denial,
    };

    let mut current = url::Url::parse(url)
        .map_err(|_| unresolved(UnresolvedCause::BadLocation(url.to_string())))?;
    let mut hops = 0usize;

    loop {
        let send = |method: ProbeMethod| -> Result<ProbeResponse, DriveUrlError> {
            let req = ProbeRequest {
                method,
                url: current.as_str(),
                follow_redirects: false,
            };
            tracing::debug!("probe hop {}: {:?} {}", hops, req.method, req.url);
            let resp = client
                .request(&req)
                .map_err(|e| unresolved(UnresolvedCause::Transport(e)))?;
            tracing::debug!("probe hop {}: HTTP {}", hops, resp.status);
            Ok(resp)
        };

        let mut resp = send(config.method)?;
        if config.method == ProbeMethod::Head && rejects_head(resp.status) {
            resp = send(ProbeMethod::Get)?;
        }

        match resp.status {
            200..=299 => {
                // A client that followed redirects on its own reports where it landed.
                let landed = Some(resp.final_url.trim())
                    .filter(|u| !u.is_empty())
                    .and_then(|u| current.join(u).ok())
                    .unwrap_or_else(|| current.clone());
                for url in [&current, &landed] {
                    if config.is_login_host(host_of(url)) {
                        return Err(not_public(AccessDenial::LoginRedirect(url.to_string())));
                    }
                }
                return Ok(landed.to_string());
            }
            status if is_redirect(status) => {
                let location = resp
                    .header("location")
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .ok_or_else(|| unresolved(UnresolvedCause::MissingLocation(status)))?;
                let next = current
                    .join(location)
                    .map_err(|_| unresolved(UnresolvedCause::BadLocation(location.to_string())))?;
                if config.is_login_host(host_of(&next)) {
                    return Err(not_public(AccessDenial::LoginRedirect(next.to_string())));
                }
                hops += 1;
                if hops > config.max_redirects {
                    return Err(unresolved(UnresolvedCause::TooManyRedirects(config.max_redirects)));
                }
                current = next;
            }
            status => return Err(not_public(AccessDenial::Status(status))),
        }
    }
}
