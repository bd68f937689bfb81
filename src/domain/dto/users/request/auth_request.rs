use serde::Deserialize;
use validator::Validate;

use crate::utils::request_body::BodySchema;
use crate::utils::shape::Shape;

/// `POST /login` body.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub const SCHEMA: BodySchema = BodySchema {
        required: &["email", "password"],
        shape: Shape::Object(&[("email", Shape::String), ("password", Shape::String)]),
        missing_message: "Email and password are required",
        invalid_message: "Email and password must be strings",
    };
}
