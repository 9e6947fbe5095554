//! Request extractors.

mod json;
mod validated_json;

pub use json::AppJson;
pub use validated_json::ValidatedJson;
