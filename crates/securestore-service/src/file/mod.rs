//! File lifecycle services.
//!
//! A file record moves `pending → uploaded` exactly once, or is deleted while
//! still `pending`. [`FileService`] owns every transition; its methods are
//! split across submodules by flow.

pub mod download;
pub mod reconcile;
pub mod service;
pub mod upload;

pub use reconcile::SweepReport;
pub use service::{FileService, FileServiceSettings};
pub use upload::PresignedUpload;
