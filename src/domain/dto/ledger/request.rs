//! Ledger operation requests.
//!
//! Amounts must be strictly positive and carry at most two decimal places;
//! the precision rule is enforced when converting to minor units.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::utils::request_body::BodySchema;
use crate::utils::shape::Shape;

fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(ValidationError::new("non_positive_amount")
            .with_message("Amount must be greater than 0".into()));
    }
    Ok(())
}

/// `POST /deposit` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    #[validate(length(min = 1))]
    pub account_id: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,
}

impl DepositRequest {
    pub const SCHEMA: BodySchema = BodySchema {
        required: &["accountId", "amount"],
        shape: Shape::Object(&[("accountId", Shape::String), ("amount", Shape::Number)]),
        missing_message: "Account ID and amount are required",
        invalid_message: "Failed to create deposit, invalid data type.",
    };
}

/// `POST /withdrawal` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    #[validate(length(min = 1))]
    pub account_id: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,
}

impl WithdrawalRequest {
    pub const SCHEMA: BodySchema = BodySchema {
        required: &["accountId", "amount"],
        shape: Shape::Object(&[("accountId", Shape::String), ("amount", Shape::Number)]),
        missing_message: "Account ID and amount are required",
        invalid_message: "Failed to create withdrawal, invalid data type.",
    };
}

/// `POST /transaction` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[validate(length(min = 1))]
    pub source_account_id: String,

    #[validate(length(min = 1))]
    pub destination_account_id: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,
}

impl TransferRequest {
    pub const SCHEMA: BodySchema = BodySchema {
        required: &["sourceAccountId", "destinationAccountId", "amount"],
        shape: Shape::Object(&[
            ("sourceAccountId", Shape::String),
            ("destinationAccountId", Shape::String),
            ("amount", Shape::Number),
        ]),
        missing_message: "Failed to add transaction, all fields are required.",
        invalid_message: "Failed to add transaction, data type mismatch.",
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::request_body::parse_body;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_fractional_amount_parses_exactly() {
        let request: DepositRequest =
            parse_body(json!({ "accountId": "a", "amount": 10.25 }), &DepositRequest::SCHEMA).unwrap();
        assert_eq!(request.amount, Decimal::from_str("10.25").unwrap());
    }

    #[test]
    fn test_zero_and_negative_amounts_rejected() {
        assert!(parse_body::<DepositRequest>(json!({ "accountId": "a", "amount": 0 }), &DepositRequest::SCHEMA).is_err());
        assert!(parse_body::<WithdrawalRequest>(json!({ "accountId": "a", "amount": -5 }), &WithdrawalRequest::SCHEMA).is_err());
        assert!(parse_body::<TransferRequest>(
            json!({ "sourceAccountId": "a", "destinationAccountId": "b", "amount": -1 }),
            &TransferRequest::SCHEMA
        )
        .is_err());
    }

    #[test]
    fn test_string_amount_rejected() {
        let err = parse_body::<TransferRequest>(
            json!({ "sourceAccountId": "a", "destinationAccountId": "b", "amount": "10" }),
            &TransferRequest::SCHEMA,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Failed to add transaction, data type mismatch.");
    }
}
