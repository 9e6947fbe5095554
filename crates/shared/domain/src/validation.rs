//! Field validation shared by registration, admin user creation and store
//! creation.

use validator::{ValidateEmail, ValidateLength};

use crate::constants::{
    MAX_ADDRESS_LENGTH, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_STORE_NAME_LENGTH,
    MIN_NAME_LENGTH,
};
use crate::error::{DomainError, DomainResult};

/// User display name: 20-60 characters.
pub fn validate_user_name(name: &str) -> DomainResult<()> {
    if name.validate_length(Some(MIN_NAME_LENGTH as u64), Some(MAX_NAME_LENGTH as u64), None) {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "Name must be {}-{} characters long",
            MIN_NAME_LENGTH, MAX_NAME_LENGTH
        )))
    }
}

/// RFC-shaped address with an alphabetic top-level domain, short enough for
/// the email columns.
pub fn validate_email(email: &str) -> DomainResult<()> {
    if !email.validate_length(None, Some(MAX_EMAIL_LENGTH as u64), None) {
        return Err(DomainError::validation(format!(
            "Email must be at most {} characters long",
            MAX_EMAIL_LENGTH
        )));
    }

    if email.validate_email() && has_top_level_domain(email) {
        Ok(())
    } else {
        Err(DomainError::validation("Invalid email format"))
    }
}

fn has_top_level_domain(email: &str) -> bool {
    email
        .rsplit_once('@')
        .and_then(|(_, domain)| domain.rsplit_once('.'))
        .is_some_and(|(host, tld)| {
            !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        })
}

pub fn validate_address(address: &str) -> DomainResult<()> {
    if address.validate_length(None, Some(MAX_ADDRESS_LENGTH as u64), None) {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "Address must be at most {} characters long",
            MAX_ADDRESS_LENGTH
        )))
    }
}

pub fn validate_store_name(name: &str) -> DomainResult<()> {
    if name
        .trim()
        .validate_length(Some(1), Some(MAX_STORE_NAME_LENGTH as u64), None)
    {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "Store name must be 1-{} characters long",
            MAX_STORE_NAME_LENGTH
        )))
    }
}
