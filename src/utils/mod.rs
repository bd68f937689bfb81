//! Request validation helpers.

pub mod request_body;
pub mod shape;
pub mod string_utils;
