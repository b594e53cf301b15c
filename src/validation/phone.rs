//! Phone number normalization

/// Keeps only ASCII digits and `+`, preserving order.
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Number of digits in a phone string, ignoring everything else.
pub fn digit_count(phone: &str) -> usize {
    phone.chars().filter(char::is_ascii_digit).count()
}
