//! Request extractors that reject with the shared [`crate::AppError`] body.

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
