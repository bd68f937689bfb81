//! DTOs shared across features: the response envelope and pagination.

pub mod api_response;
pub mod pagination;
pub mod timestamps;

pub use api_response::ApiResponse;
pub use pagination::{Page, PageMeta, PageQuery, PageRequest};
pub use timestamps::to_utc;
