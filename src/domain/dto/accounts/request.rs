use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::utils::request_body::BodySchema;
use crate::utils::shape::Shape;

/// `POST /account` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,

    #[validate(length(min = 1, max = 100, message = "bankName must be between 1 and 100 characters"))]
    pub bank_name: String,

    #[validate(length(min = 1, max = 34, message = "bankAccountNumber must be between 1 and 34 characters"))]
    pub bank_account_number: String,

    /// Opening balance.
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_opening_balance"))]
    pub balance: Decimal,
}

fn validate_opening_balance(balance: &Decimal) -> Result<(), ValidationError> {
    if balance.is_sign_negative() && !balance.is_zero() {
        return Err(ValidationError::new("negative_balance")
            .with_message("Balance must be 0 or greater".into()));
    }
    Ok(())
}

impl CreateAccountRequest {
    pub const SCHEMA: BodySchema = BodySchema {
        required: &["userId", "bankName", "bankAccountNumber", "balance"],
        shape: Shape::Object(&[
            ("userId", Shape::String),
            ("bankName", Shape::String),
            ("bankAccountNumber", Shape::String),
            ("balance", Shape::Number),
        ]),
        missing_message: "Failed to add account, all fields are required.",
        invalid_message: "Failed to add account, invalid data type.",
    };
}
