// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Matricula Gateway

//! Local request validation.
//!
//! Shape checks performed before any upstream call: required-field presence,
//! email format, CPF format (11 digits after stripping punctuation), and
//! wallet address format (`0x` + 40 hex characters). A failure here
//! short-circuits with a 400 envelope carrying per-field messages — it never
//! reaches an upstream.

use serde_json::Value;

use crate::error::ApiError;

/// Number of digits in a CPF and in a matrícula ID.
const ID_DIGITS: usize = 11;

/// Hex characters in a wallet address, excluding the `0x` prefix.
const WALLET_HEX_CHARS: usize = 40;

/// Collects per-field validation messages against a JSON request body.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-empty string field.
    pub fn require(&mut self, body: &Value, field: &str) {
        let _ = self.present(body, field);
    }

    /// Require a well-formed email address.
    pub fn email(&mut self, body: &Value, field: &str) {
        if let Some(value) = self.present(body, field) {
            if !is_valid_email(value) {
                self.errors.push(format!("{field} must be a valid email"));
            }
        }
    }

    /// Require a CPF that contains exactly 11 digits once punctuation is
    /// stripped.
    pub fn cpf(&mut self, body: &Value, field: &str) {
        self.numeric_id(body, field);
    }

    /// Require a matrícula ID (same fixed-length numeric format as a CPF).
    pub fn matricula(&mut self, body: &Value, field: &str) {
        self.numeric_id(body, field);
    }

    fn numeric_id(&mut self, body: &Value, field: &str) {
        if let Some(value) = self.present(body, field) {
            if normalize_numeric_id(value).is_none() {
                self.errors
                    .push(format!("{field} must contain exactly {ID_DIGITS} digits"));
            }
        }
    }

    /// Non-empty string lookup that records "{field} is required" on a miss.
    fn present<'a>(&mut self, body: &'a Value, field: &str) -> Option<&'a str> {
        match body.get(field).and_then(Value::as_str) {
            Some(value) if !value.trim().is_empty() => Some(value),
            _ => {
                self.errors.push(format!("{field} is required"));
                None
            }
        }
    }

    /// Require a `0x`-prefixed 40-hex-character wallet address.
    pub fn wallet(&mut self, body: &Value, field: &str) {
        if let Some(value) = self.present(body, field) {
            if !is_valid_wallet_address(value) {
                self.errors.push(wallet_format_message(field));
            }
        }
    }

    /// Validate a wallet address only when the field is present.
    pub fn wallet_optional(&mut self, body: &Value, field: &str) {
        if let Some(value) = body.get(field).and_then(Value::as_str) {
            if !value.trim().is_empty() && !is_valid_wallet_address(value) {
                self.errors.push(wallet_format_message(field));
            }
        }
    }

    /// Succeed, or short-circuit with the collected 400 envelope.
    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.errors))
        }
    }
}

/// Standard local-part@domain check. Deliberately superficial — real
/// deliverability is the Orchestrator's problem.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if value.contains(char::is_whitespace) {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Strip non-digits and accept exactly 11 remaining digits. Shared by CPF
/// and matrícula ID validation.
pub fn normalize_numeric_id(value: &str) -> Option<String> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    (digits.len() == ID_DIGITS).then_some(digits)
}

/// `0x` followed by exactly 40 hex characters.
pub fn is_valid_wallet_address(value: &str) -> bool {
    let Some(hex) = value.strip_prefix("0x") else {
        return false;
    };
    hex.len() == WALLET_HEX_CHARS && hex.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn wallet_format_message(field: &str) -> String {
    format!("{field} must be a 0x-prefixed 40-hex-character address")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const GOOD_WALLET: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12";

    #[test]
    fn email_accepts_standard_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@no-local.com"));
        assert!(!is_valid_email("no-domain@"));
        assert!(!is_valid_email("no-dot@domain"));
        assert!(!is_valid_email("trailing-dot@domain."));
        assert!(!is_valid_email("two@@signs.com"));
        assert!(!is_valid_email("spa ce@domain.com"));
    }

    #[test]
    fn numeric_id_strips_punctuation() {
        assert_eq!(
            normalize_numeric_id("123.456.789-01").as_deref(),
            Some("12345678901")
        );
        assert_eq!(
            normalize_numeric_id("12345678901").as_deref(),
            Some("12345678901")
        );
    }

    #[test]
    fn numeric_id_rejects_wrong_lengths() {
        assert!(normalize_numeric_id("123456789").is_none());
        assert!(normalize_numeric_id("123.456.789-012").is_none());
        assert!(normalize_numeric_id("").is_none());
    }

    #[test]
    fn wallet_accepts_checksummed_and_lowercase() {
        assert!(is_valid_wallet_address(GOOD_WALLET));
        assert!(is_valid_wallet_address(&GOOD_WALLET.to_lowercase()));
    }

    #[test]
    fn wallet_rejects_bad_formats() {
        // Too short.
        assert!(!is_valid_wallet_address("0x742d35Cc"));
        // Missing prefix.
        assert!(!is_valid_wallet_address(
            "742d35Cc6634C0532925a3b844Bc9e7595f4aB12aa"
        ));
        // Non-hex character.
        assert!(!is_valid_wallet_address(
            "0x742d35Cc6634C0532925a3b844Bc9e7595f4aBZZ"
        ));
        // Too long.
        assert!(!is_valid_wallet_address(
            "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB1234"
        ));
        assert!(!is_valid_wallet_address(""));
    }

    #[test]
    fn validator_collects_all_field_messages() {
        let body = json!({ "email": "not-an-email", "password": "" });
        let mut v = Validator::new();
        v.email(&body, "email");
        v.require(&body, "password");
        v.cpf(&body, "cpf");

        let err = v.finish().unwrap_err();
        let errors = err.errors.unwrap();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("email")));
        assert!(errors.iter().any(|e| e.contains("password")));
        assert!(errors.iter().any(|e| e.contains("cpf")));
    }

    #[test]
    fn validator_optional_wallet_ignores_absence() {
        let body = json!({ "name": "x" });
        let mut v = Validator::new();
        v.wallet_optional(&body, "walletAddress");
        assert!(v.finish().is_ok());

        let body = json!({ "walletAddress": "0xshort" });
        let mut v = Validator::new();
        v.wallet_optional(&body, "walletAddress");
        assert!(v.finish().is_err());
    }
}
