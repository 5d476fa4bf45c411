//! Object storage for QR artifacts

pub mod firebase;
pub mod publisher;
pub mod traits;

pub use firebase::FirebaseStorage;
pub use publisher::{ArtifactPublisher, DOWNLOAD_TOKEN_METADATA_KEY, PNG_CONTENT_TYPE};
pub use traits::{ObjectMetadata, ObjectStorage};
