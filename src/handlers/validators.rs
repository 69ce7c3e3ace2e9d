//! Shared request-field validation helpers.

use rust_decimal::Decimal;

/// Minimal email shape check: exactly one '@' with non-empty sides and a
/// dot somewhere in the domain.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && domain.contains('.')
        }
        _ => false,
    }
}

/// Password policy carried over from the legacy backend: length only.
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= 6
}

/// Phone numbers are stored as 10 ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_price(price: Decimal) -> bool {
    price > Decimal::ZERO
}

pub fn is_valid_rating(rating: i32) -> bool {
    (1..=5).contains(&rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+tag@sub.example.co"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn password_minimum_length() {
        assert!(is_valid_password("secret"));
        assert!(!is_valid_password("short"));
    }

    #[test]
    fn phone_is_ten_digits() {
        assert!(is_valid_phone("0812345678"));
        assert!(!is_valid_phone("081234567"));
        assert!(!is_valid_phone("08123456789"));
        assert!(!is_valid_phone("081234567a"));
    }

    #[test]
    fn price_must_be_positive() {
        assert!(is_valid_price(Decimal::from_str("0.01").unwrap()));
        assert!(!is_valid_price(Decimal::ZERO));
        assert!(!is_valid_price(Decimal::from_str("-1").unwrap()));
    }

    #[test]
    fn rating_range() {
        assert!(is_valid_rating(1));
        assert!(is_valid_rating(5));
        assert!(!is_valid_rating(0));
        assert!(!is_valid_rating(6));
    }
}
