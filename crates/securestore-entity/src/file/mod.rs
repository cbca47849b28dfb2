//! File domain entities.

pub mod content;
pub mod model;
pub mod status;

pub use content::DownloadContent;
pub use model::{CreateFile, File};
pub use status::FileStatus;
