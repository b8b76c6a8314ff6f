//! Extracting a board coordinate from free-form completion text.

use log::debug;

use crate::core::Position;

/// Find the first `<letter><1-2 digits>` token in `text` whose letter
/// satisfies `accept`. Digits are taken greedily, so `A100` reads as `A10`.
fn find_token(text: &str, accept: impl Fn(char) -> bool) -> Option<(char, usize)> {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        let letter = b as char;
        if !b.is_ascii() || !accept(letter) {
            continue;
        }
        let digits: String = bytes[i + 1..]
            .iter()
            .take(2)
            .take_while(|d| d.is_ascii_digit())
            .map(|&d| d as char)
            .collect();
        if digits.is_empty() {
            continue;
        }
        if let Ok(number) = digits.parse() {
            return Some((letter, number));
        }
    }
    None
}

fn is_board_letter(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'A'..='J')
}

/// Parse the first coordinate in a completion, e.g. `"I'd go with j10"`.
///
/// The first `A`–`J` letter followed by digits decides; a row outside
/// 1–10 fails rather than searching further. If no such token exists any
/// letter-digits token is tried, which still has to name a real square.
pub fn parse_coordinate(text: &str) -> Option<Position> {
    if let Some((letter, number)) = find_token(text, is_board_letter) {
        return Position::from_letter_number(letter, number);
    }
    debug!("no standard coordinate in {:?}", text);
    let (letter, number) = find_token(text, |c| c.is_ascii_alphabetic())?;
    Position::from_letter_number(letter, number)
}
