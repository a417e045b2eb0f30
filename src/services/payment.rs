use regex::Regex;

/// Card numbers need at least this many digits to be accepted. Digit
/// counting is the whole check; there is no gateway behind the form.
pub const MIN_CARD_DIGITS: usize = 16;

/// Normalize a typed card number: strip everything but digits, take the
/// first run of 4–16 of them, and regroup in space-separated blocks of
/// four. Input that yields no such run comes back unchanged.
pub fn format_card_number(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let re = Regex::new(r"\d{4,16}").unwrap();
    let Some(m) = re.find(&digits) else {
        return input.to_string();
    };
    m.as_str()
        .as_bytes()
        .chunks(4)
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A card "passes" when it carries enough digits, nothing more.
pub fn card_number_is_valid(input: &str) -> bool {
    input.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_CARD_DIGITS
}

/// Signup phone formatting: the first ten digits become `(XXX) XXX-XXXX`,
/// shorter input keeps the partial shape.
pub fn format_phone_number(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(10)
        .collect();
    let mut formatted = String::new();
    if !digits.is_empty() {
        formatted.push('(');
        formatted.push_str(&digits[..digits.len().min(3)]);
    }
    if digits.len() > 3 {
        formatted.push_str(") ");
        formatted.push_str(&digits[3..digits.len().min(6)]);
    }
    if digits.len() > 6 {
        formatted.push('-');
        formatted.push_str(&digits[6..]);
    }
    formatted
}

/// Leading integer of a displayed price: "2500₽" -> 2500.
pub fn parse_price_amount(price: &str) -> Option<i64> {
    let digits: String = price
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
