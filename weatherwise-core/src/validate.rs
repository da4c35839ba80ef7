/// Check that `candidate` looks like a city name.
///
/// Accepts ASCII letters, spaces, hyphens and apostrophes only, with at least
/// two characters once trimmed. Leading or trailing spaces are allowed as long
/// as the rest of the string passes.
pub fn is_valid_city_name(candidate: &str) -> bool {
    if candidate.trim().chars().count() < 2 {
        return false;
    }

    if candidate.chars().all(char::is_whitespace) {
        return false;
    }

    candidate.chars().all(is_city_char)
}

fn is_city_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '-' | '\'') || c.is_whitespace()
}
