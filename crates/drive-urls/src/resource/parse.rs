//! Share URL recognition.

use super::{is_id_token, DocumentType, HostingKind};
use crate::error::{DriveUrlError, ParseFailure};

const DOCS_HOST: &str = "docs.google.com";
const DRIVE_HOST: &str = "drive.google.com";

/// Extracts hosting kind and id from a share URL.
///
/// Accepted paths, optionally prefixed by a Workspace domain `/a/<domain>`:
/// - docs.google.com: `/{document|presentation|spreadsheets}/d/<id>[/...]`
/// - drive.google.com: `/file/d/<id>[/...]`
pub(super) fn parse_share_url(share_url: &str) -> Result<(HostingKind, String), DriveUrlError> {
    let fail = |reason| DriveUrlError::Parse {
        url: share_url.to_string(),
        reason,
    };

    let parsed = url::Url::parse(share_url.trim()).map_err(|_| fail(ParseFailure::InvalidUrl))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(fail(ParseFailure::UnsupportedScheme(other.to_string()))),
    }
    let host = parsed
        .host_str()
        .ok_or_else(|| fail(ParseFailure::UnknownHost(String::new())))?
        .to_ascii_lowercase();

    let mut segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.collect())
        .unwrap_or_default();
    // Workspace (Google Apps) URLs carry `/a/<domain>/` before the kind.
    if segments.len() >= 2 && segments[0] == "a" && is_workspace_domain(segments[1]) {
        segments.drain(..2);
    }

    let kind_segment = segments.first().copied().unwrap_or("");
    let hosting_kind = match host.as_str() {
        DOCS_HOST => DocumentType::from_path_segment(kind_segment).map(HostingKind::Document),
        DRIVE_HOST => (kind_segment == "file").then_some(HostingKind::File),
        _ => return Err(fail(ParseFailure::UnknownHost(host.clone()))),
    }
    .ok_or_else(|| fail(ParseFailure::UnknownPattern))?;

    if segments.get(1).copied() != Some("d") {
        return Err(fail(ParseFailure::UnknownPattern));
    }
    let id = match segments.get(2).copied() {
        None | Some("") => return Err(fail(ParseFailure::MissingId)),
        Some(id) => id,
    };
    if !is_id_token(id) {
        return Err(fail(ParseFailure::MalformedId(id.to_string())));
    }

    Ok((hosting_kind, id.to_string()))
}

fn is_workspace_domain(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
}
