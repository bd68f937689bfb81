use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::request_body::BodySchema;
use crate::utils::shape::Shape;

/// `POST /user` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(nested)]
    pub profile: ProfileRequest,
}

/// Identity profile submitted with a new user. `identity_number` is plain
/// text here and encrypted before it is stored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[validate(length(min = 1, message = "Identity type is required"))]
    pub identity_type: String,

    #[validate(length(min = 1, message = "Identity number is required"))]
    pub identity_number: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
}

impl CreateUserRequest {
    pub const SCHEMA: BodySchema = BodySchema {
        required: &["name", "email", "password", "profile"],
        shape: Shape::Object(&[
            ("name", Shape::String),
            ("email", Shape::String),
            ("password", Shape::String),
            (
                "profile",
                Shape::Object(&[
                    ("identityType", Shape::String),
                    ("identityNumber", Shape::String),
                    ("address", Shape::String),
                ]),
            ),
        ]),
        missing_message: "Failed to add user, all fields are required.",
        invalid_message: "Failed to add user, invalid data type.",
    };
}
