// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use rand::Rng;

use super::error::code::ErrorCode;

pub mod shutdown;

#[macro_export]
macro_rules! bulkmailer_version {
    () => {
        env!("CARGO_PKG_VERSION")
    };
}

#[macro_export]
macro_rules! utc_now {
    () => {{
        use chrono::Utc;
        Utc::now().timestamp_millis()
    }};
}

#[macro_export]
macro_rules! raise_error {
    ($msg:expr, $code:expr) => {
        $crate::modules::error::BulkMailerError::Generic {
            message: $msg,
            location: snafu::Location::default(),
            code: $code,
        }
    };
}

#[macro_export]
macro_rules! validate_email {
    ($email:expr) => {{
        $crate::modules::utils::validate_email($email)
    }};
}

pub fn validate_email(email: &str) -> crate::modules::error::BulkMailerResult<()> {
    use std::str::FromStr;
    let email_address = email_address::EmailAddress::from_str(email).map_err(|_| {
        raise_error!(
            format!("Invalid email format : {}", email),
            ErrorCode::InvalidParameter
        )
    })?;
    if email != email_address.email() {
        return Err(raise_error!(
            format!("Invalid email format: {}", email),
            ErrorCode::InvalidParameter
        ));
    }
    Ok(())
}

pub fn generate_message_id() -> String {
    // Generate 16 random bytes
    let random_bytes: [u8; 16] = rand::rng().random();
    // Convert to hex
    let random_id = hex::encode(random_bytes);
    // Get current timestamp in milliseconds
    let timestamp_millis = utc_now!();
    // Format the message ID
    format!("<{}.{}@bulkmailer>", timestamp_millis, random_id)
}

#[cfg(test)]
mod test {
    use crate::modules::utils::{generate_message_id, validate_email};

    #[test]
    fn test1() {
        println!("{}", generate_message_id());
    }

    #[test]
    fn rejects_mangled_addresses() {
        assert!(validate_email("ok@example.com").is_ok());
        assert!(validate_email("not-an-address").is_err());
        assert!(validate_email("two@@example.com").is_err());
    }
}
