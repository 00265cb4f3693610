//! Turn Google Drive / Google Docs share URLs into direct access URLs and
//! check that the resource behind them is actually public.
//!
//! ```no_run
//! use drive_urls::{CurlClient, ResourceDescriptor};
//!
//! let resource = ResourceDescriptor::parse("https://drive.google.com/file/d/foo/view")?;
//! assert_eq!(
//!     resource.access_url(),
//!     "https://drive.google.com/uc?export=download&id=foo"
//! );
//! resource.verify_public(&CurlClient::default())?;
//! # Ok::<(), drive_urls::DriveUrlError>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod probe;
pub mod resource;

pub use config::{ProbeConfig, ProbeMethod};
pub use error::{AccessDenial, DriveUrlError, ParseFailure, TransportError, UnresolvedCause};
pub use probe::{resolve_url, CurlClient, HttpClient, ProbeRequest, ProbeResponse};
pub use resource::{DocumentType, ExportFormat, HostingKind, ResourceDescriptor, ResourceId};
