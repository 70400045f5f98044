//! Provider-independent image model.
//!
//! An image resource owns one [`ImageArtifact`] slot per [`ImageSize`] and a
//! single [`ImageMetadata`] value, both held in an [`ImageRecord`]. Provider
//! types implement [`ImageResource`] on top of that record.

mod artifact;
mod metadata;
mod record;
mod resource;
mod size;

pub use artifact::ImageArtifact;
pub use metadata::ImageMetadata;
pub use record::ImageRecord;
pub use resource::ImageResource;
pub use size::{ImageSize, ParseImageSizeError};
