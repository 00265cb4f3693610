//! Resource descriptor: hosting kind + resource id, and the access URL built from them.
//!
//! A descriptor comes either from a share URL ([`ResourceDescriptor::parse`]) or from a
//! known id and kind ([`ResourceDescriptor::new`]). It is immutable once built.

mod parse;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ProbeConfig;
use crate::error::DriveUrlError;
use crate::probe::{self, HttpClient};

/// Download template for files stored as-is in Drive.
const FILE_ACCESS_URL: &str = "https://drive.google.com/uc?export=download&id=";

/// Native Google Docs editors. Each has its own export endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Document,
    Presentation,
    Spreadsheets,
}

impl DocumentType {
    /// Path segment used by docs.google.com for this editor.
    pub fn path_segment(self) -> &'static str {
        match self {
            DocumentType::Document => "document",
            DocumentType::Presentation => "presentation",
            DocumentType::Spreadsheets => "spreadsheets",
        }
    }

    fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "document" => Some(DocumentType::Document),
            "presentation" => Some(DocumentType::Presentation),
            "spreadsheets" => Some(DocumentType::Spreadsheets),
            _ => None,
        }
    }
}

/// Where the resource is hosted, which decides the access URL template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostingKind {
    /// Native document on docs.google.com, exported on download.
    Document(DocumentType),
    /// Uploaded file on drive.google.com, downloaded as stored.
    File,
}

impl fmt::Display for HostingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostingKind::Document(t) => f.write_str(t.path_segment()),
            HostingKind::File => f.write_str("file"),
        }
    }
}

/// Export format requested for native documents. Ignored for [`HostingKind::File`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Docx,
    Png,
    Xlsx,
    Pptx,
    Csv,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Png => "png",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pptx => "pptx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            "png" => Ok(ExportFormat::Png),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "pptx" => Ok(ExportFormat::Pptx),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

/// Validated, non-empty resource identifier (ASCII letters, digits, `-`, `_`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Result<Self, DriveUrlError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DriveUrlError::Validation {
                id,
                reason: "resource id is empty",
            });
        }
        if !is_id_token(&id) {
            return Err(DriveUrlError::Validation {
                id,
                reason: "resource id may only contain letters, digits, '-' and '_'",
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn is_id_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// A hosted resource addressed by kind and id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceDescriptor {
    hosting_kind: HostingKind,
    resource_id: ResourceId,
    export_format: ExportFormat,
}

impl ResourceDescriptor {
    /// Builds a descriptor from a known id and kind. Fails if the id is empty or malformed.
    pub fn new(resource_id: impl Into<String>, hosting_kind: HostingKind) -> Result<Self, DriveUrlError> {
        Ok(Self {
            hosting_kind,
            resource_id: ResourceId::new(resource_id)?,
            export_format: ExportFormat::default(),
        })
    }

    /// Parses a Drive or Docs share URL.
    ///
    /// # Examples
    ///
    /// - `http://drive.google.com/file/d/foo/` → file `foo`
    /// - `https://docs.google.com/a/example.org/spreadsheets/d/abc/edit` → spreadsheet `abc`
    pub fn parse(share_url: &str) -> Result<Self, DriveUrlError> {
        let (hosting_kind, id) = parse::parse_share_url(share_url)?;
        Ok(Self {
            hosting_kind,
            resource_id: ResourceId(id),
            export_format: ExportFormat::default(),
        })
    }

    /// Same descriptor with a different export format.
    pub fn with_export_format(&self, export_format: ExportFormat) -> Self {
        Self {
            export_format,
            ..self.clone()
        }
    }

    pub fn hosting_kind(&self) -> HostingKind {
        self.hosting_kind
    }

    pub fn resource_id(&self) -> &str {
        self.resource_id.as_str()
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export_format
    }

    /// Direct download / export URL for this resource. No I/O.
    pub fn access_url(&self) -> String {
        let id = self.resource_id.as_str();
        let fmt = self.export_format.as_str();
        match self.hosting_kind {
            HostingKind::File => format!("{}{}", FILE_ACCESS_URL, id),
            HostingKind::Document(DocumentType::Document) => {
                format!("https://docs.google.com/document/d/{}/export?format={}", id, fmt)
            }
            HostingKind::Document(DocumentType::Presentation) => {
                format!("https://docs.google.com/presentation/d/{}/export/{}", id, fmt)
            }
            HostingKind::Document(DocumentType::Spreadsheets) => {
                format!("https://docs.google.com/spreadsheets/d/{}/export?format={}", id, fmt)
            }
        }
    }

    /// Checks that the access URL is reachable without signing in, using default probe settings.
    pub fn verify_public(&self, client: &dyn HttpClient) -> Result<(), DriveUrlError> {
        self.verify_public_with(client, &ProbeConfig::default())
    }

    pub fn verify_public_with(
        &self,
        client: &dyn HttpClient,
        config: &ProbeConfig,
    ) -> Result<(), DriveUrlError> {
        self.resolve_public(client, config).map(|_| ())
    }

    /// Follows the access URL's redirect chain and returns where the content actually lives.
    pub fn resolve_public(
        &self,
        client: &dyn HttpClient,
        config: &ProbeConfig,
    ) -> Result<String, DriveUrlError> {
        let access_url = self.access_url();
        let span = tracing::debug_span!("verify_public", kind = %self.hosting_kind, id = %self.resource_id);
        let _enter = span.enter();
        match probe::resolve_url(client, &access_url, config) {
            Ok(final_url) => {
                tracing::info!("{} is public, content at {}", access_url, final_url);
                Ok(final_url)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Err(e)
            }
        }
    }
}

impl FromStr for ResourceDescriptor {
    type Err = DriveUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
