// ✡️ Hebrew Date Parser - free-form OCR phrase → day / month / year
// "נפ' י"א סיון תשע"ט" → { day: 11, month: סיון (3), year: 5779 }
//
// Best effort: tokens that mean nothing are skipped, every field may stay empty,
// and the raw text is always kept for display.

use crate::gematria::{decode, has_numeral_mark, is_numeral_mark, letter_value, normalize_year};
use crate::months::{self, ADAR};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// HEBREW DATE INFO
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HebrewDateInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,

    /// Month as written in the inscription (display only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,

    /// 1=Nisan … 12=Adar / Adar I, 13=Adar II
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_numeric: Option<u32>,

    /// Absolute year, e.g. 5785
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    pub raw_text: String,
}

impl HebrewDateInfo {
    /// Nothing parsed, raw text kept
    pub fn empty(raw_text: &str) -> Self {
        HebrewDateInfo {
            day: None,
            month: None,
            month_numeric: None,
            year: None,
            raw_text: raw_text.to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.day.is_some() && self.month_numeric.is_some() && self.year.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.day.is_none() && self.month_numeric.is_none() && self.year.is_none()
    }
}

// ============================================================================
// TOKEN CLASSIFICATION
// ============================================================================

/// Standalone words dropped before classification.
/// Prepositions ב/ל and death formulas, which would otherwise decode as numerals
/// (נפטר = 339, ביום = 58).
const SKIPPED_WORDS: [&str; 7] = ["ב", "ל", "נפטר", "נפטרה", "נפטרו", "יום", "ביום"];

/// Separators OCR leaves around tokens (quote marks are kept: they are geresh)
const TOKEN_PUNCTUATION: [char; 12] = [',', '.', ';', ':', '(', ')', '[', ']', '-', '–', '—', '/'];

/// Era letters: a numeral containing ת or ש is a year even when it sums to ≤ 31
const YEAR_LETTERS: [char; 2] = ['ת', 'ש'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numeral {
    Day(u32),
    Year(i32),
}

fn tokenize(phrase: &str) -> impl Iterator<Item = &str> {
    phrase
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| TOKEN_PUNCTUATION.contains(&c)))
        .filter(|token| !token.is_empty())
}

fn is_skipped(token: &str) -> bool {
    if SKIPPED_WORDS.contains(&token) {
        return true;
    }

    // נפ' / נפ׳ abbreviation
    let letters: String = token.chars().filter(|c| !is_numeral_mark(*c)).collect();
    has_numeral_mark(token) && letters == "נפ"
}

/// Tokens left after dropping skipped words. A bare ב right after אדר is the
/// Adar II qualifier, not the preposition.
fn significant_tokens(phrase: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();

    for token in tokenize(phrase) {
        let qualifies_adar = tokens
            .last()
            .is_some_and(|previous| months::resolve(previous) == Some(ADAR));

        if !is_skipped(token) || (qualifies_adar && months::is_adar_qualifier(token)) {
            tokens.push(token);
        }
    }

    tokens
}

/// ה'תשפ"ד → תשפ"ד: the 5 (thousands) prefix is added back by year normalization
fn strip_millennium_marker(token: &str) -> &str {
    let mut chars = token.char_indices();

    match (chars.next(), chars.next()) {
        (Some((_, 'ה')), Some((mark_at, mark))) if is_numeral_mark(mark) => {
            let rest = &token[mark_at + mark.len_utf8()..];
            if rest.chars().any(|c| letter_value(c).is_some()) {
                rest
            } else {
                token
            }
        }
        _ => token,
    }
}

fn classify_numeral(token: &str) -> Option<Numeral> {
    let token = strip_millennium_marker(token);
    let value = decode(token)?;

    if value > 31 || token.contains(YEAR_LETTERS) {
        let value = i32::try_from(value).ok()?;
        Some(Numeral::Year(normalize_year(value)))
    } else if (1..=30).contains(&value) {
        Some(Numeral::Day(value))
    } else {
        None
    }
}

/// First candidate wins, but a token written with geresh / gershayim beats a
/// bare word that merely happens to decode (משה = 345).
#[derive(Debug, Default)]
struct Picks {
    marked_day: Option<u32>,
    plain_day: Option<u32>,
    marked_year: Option<i32>,
    plain_year: Option<i32>,
}

impl Picks {
    fn offer(&mut self, numeral: Numeral, marked: bool) {
        let (day_slot, year_slot) = if marked {
            (&mut self.marked_day, &mut self.marked_year)
        } else {
            (&mut self.plain_day, &mut self.plain_year)
        };

        match numeral {
            Numeral::Day(day) => {
                day_slot.get_or_insert(day);
            }
            Numeral::Year(year) => {
                year_slot.get_or_insert(year);
            }
        }
    }

    fn day(&self) -> Option<u32> {
        self.marked_day.or(self.plain_day)
    }

    fn year(&self) -> Option<i32> {
        self.marked_year.or(self.plain_year)
    }
}

// ============================================================================
// PARSER
// ============================================================================

/// Parses Hebrew date phrases as they come out of tombstone OCR
#[derive(Debug, Clone, Default)]
pub struct HebrewDateParser;

impl HebrewDateParser {
    pub fn new() -> Self {
        HebrewDateParser
    }

    /// Parse a phrase into a best-effort date. Never fails.
    ///
    /// Month names are tried before numerals (אב would otherwise read as 3).
    /// An אדר followed by א/ב is read as Adar I / Adar II when the phrase has
    /// another day token; otherwise the letter is the day.
    pub fn parse(&self, phrase: &str) -> HebrewDateInfo {
        let tokens = significant_tokens(phrase);

        let day_like: Vec<bool> = tokens
            .iter()
            .map(|t| {
                months::resolve(t).is_none() && matches!(classify_numeral(t), Some(Numeral::Day(_)))
            })
            .collect();

        let mut info = HebrewDateInfo::empty(phrase);
        let mut picks = Picks::default();
        let mut i = 0;

        while i < tokens.len() {
            let token = tokens[i];

            if let Some(month) = months::resolve(token) {
                let (month, shown, consumed) = if month == ADAR {
                    resolve_adar(&tokens, &day_like, i)
                } else {
                    (month, token.to_string(), 1)
                };

                debug!(token = %shown, month, "month token");
                if info.month_numeric.is_none() {
                    info.month_numeric = Some(month);
                    info.month = Some(shown);
                }

                i += consumed;
                continue;
            }

            match classify_numeral(token) {
                Some(numeral) => {
                    debug!(token, ?numeral, "numeral token");
                    picks.offer(numeral, has_numeral_mark(token));
                }
                None => debug!(token, "unrecognized token skipped"),
            }

            i += 1;
        }

        info.day = picks.day();
        info.year = picks.year();
        info
    }
}

/// אדר at `at`, possibly qualified by the next token
fn resolve_adar(tokens: &[&str], day_like: &[bool], at: usize) -> (u32, String, usize) {
    let plain = (ADAR, tokens[at].to_string(), 1);

    let Some(next) = tokens.get(at + 1) else {
        return plain;
    };
    if !months::is_adar_qualifier(next) {
        return plain;
    }

    let other_day = day_like
        .iter()
        .enumerate()
        .any(|(j, &is_day)| is_day && j != at + 1);

    if day_like[at + 1] && !other_day {
        return plain;
    }

    let merged = format!("{} {}", tokens[at], next);
    match months::resolve(&merged) {
        Some(month) => (month, merged, 2),
        None => plain,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gematria::encode;
    use crate::months::month_name;

    fn parse(phrase: &str) -> HebrewDateInfo {
        HebrewDateParser::new().parse(phrase)
    }

    #[test]
    fn test_full_date() {
        let info = parse("י\"א סיון תשע\"ט");

        assert_eq!(info.day, Some(11));
        assert_eq!(info.month.as_deref(), Some("סיון"));
        assert_eq!(info.month_numeric, Some(3));
        assert_eq!(info.year, Some(5779));
        assert_eq!(info.raw_text, "י\"א סיון תשע\"ט");
        assert!(info.is_complete());
    }

    #[test]
    fn test_prefixes_and_death_words_are_dropped() {
        let info = parse("נפ' י\"א סיון תשע\"ט");
        assert_eq!(info.day, Some(11));
        assert_eq!(info.year, Some(5779));

        let info = parse("נפטר ביום ט״ו באב תש״פ");
        assert_eq!(info.day, Some(15));
        assert_eq!(info.month_numeric, Some(5));
        assert_eq!(info.year, Some(5780));

        let info = parse("ב ניסן ל תשפ\"ד");
        assert_eq!(info.day, None);
        assert_eq!(info.month_numeric, Some(1));
        assert_eq!(info.year, Some(5784));
    }

    #[test]
    fn test_single_letter_year() {
        let info = parse("ש׳");
        assert_eq!(info.year, Some(5300));
        assert_eq!(info.day, None);
    }

    #[test]
    fn test_millennium_prefix() {
        assert_eq!(parse("ה'תשפ\"ד").year, Some(5784));
        assert_eq!(parse("ה׳תשע״ט").year, Some(5779));
        // alone it is just the 5th
        assert_eq!(parse("ה'").day, Some(5));
    }

    #[test]
    fn test_spaced_he_geresh_before_year() {
        // with a day already present the ה׳ cannot win
        let info = parse("י׳ חשון ה׳ תשפ״ד");
        assert_eq!(info.day, Some(10));
        assert_eq!(info.year, Some(5784));

        // alone it reads as the 5th, same as ה׳ חשון תשפ״ד
        let info = parse("חשון ה׳ תשפ״ד");
        assert_eq!(info.day, Some(5));
        assert_eq!(info.day, parse("ה׳ חשון תשפ״ד").day);
    }

    #[test]
    fn test_adar_one_and_two() {
        let info = parse("כ\"ה אדר ב' תשפ\"ד");
        assert_eq!(info.day, Some(25));
        assert_eq!(info.month_numeric, Some(13));
        assert_eq!(info.month.as_deref(), Some("אדר ב'"));
        assert_eq!(info.year, Some(5784));

        let info = parse("י\"ד אדר א׳ תשפ\"ד");
        assert_eq!(info.month_numeric, Some(12));
        assert_eq!(info.day, Some(14));

        let info = parse("אדר שני תשפ\"ד");
        assert_eq!(info.month_numeric, Some(13));
        assert_eq!(info.day, None);
    }

    #[test]
    fn test_unmarked_adar_qualifiers() {
        let info = parse("כ\"ה אדר ב תשפ\"ד");
        assert_eq!(info.day, Some(25));
        assert_eq!(info.month_numeric, Some(13));
        assert_eq!(info.month.as_deref(), Some("אדר ב"));
        assert_eq!(info.year, Some(5784));

        let info = parse("כ\"ה אדר א תשפ\"ד");
        assert_eq!(info.month_numeric, Some(12));
        assert_eq!(info.month.as_deref(), Some("אדר א"));

        // elsewhere a bare ב is still the preposition
        let info = parse("כ\"ה ב אדר תשפ\"ג");
        assert_eq!(info.day, Some(25));
        assert_eq!(info.month_numeric, Some(12));
    }

    #[test]
    fn test_adar_followed_by_lone_day() {
        // no other day in the phrase: ב׳ is the day
        let info = parse("אדר ב׳ תשפ\"ג");
        assert_eq!(info.month_numeric, Some(12));
        assert_eq!(info.day, Some(2));
    }

    #[test]
    fn test_marked_numerals_beat_plain_words() {
        let info = parse("משה ט״ו אב תש״פ");
        assert_eq!(info.year, Some(5780));
        assert_eq!(info.day, Some(15));
    }

    #[test]
    fn test_unparseable_input_keeps_raw_text() {
        let info = parse("hello world");
        assert!(info.is_empty());
        assert_eq!(info.raw_text, "hello world");

        let info = parse("");
        assert!(info.is_empty());
        assert_eq!(info.raw_text, "");
    }

    #[test]
    fn test_two_days_no_year() {
        let info = parse("ג׳ ה׳");
        assert_eq!(info.day, Some(3));
        assert_eq!(info.year, None);
    }

    #[test]
    fn test_thirty_one_is_not_a_day() {
        let info = parse("ל\"א תמוז");
        assert_eq!(info.day, None);
        assert_eq!(info.year, None);
        assert_eq!(info.month_numeric, Some(4));
    }

    #[test]
    fn test_second_month_token_is_not_a_numeral() {
        // אב must not turn into day 3
        let info = parse("ט׳ תמוז אב");
        assert_eq!(info.month_numeric, Some(4));
        assert_eq!(info.day, Some(9));
    }

    #[test]
    fn test_punctuation_around_tokens() {
        let info = parse("(י\"א סיון, תשע\"ט).");
        assert_eq!(info.day, Some(11));
        assert_eq!(info.month_numeric, Some(3));
        assert_eq!(info.year, Some(5779));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = HebrewDateParser::new();
        let phrase = "כ\"ג חשון תשמ\"ב";
        assert_eq!(parser.parse(phrase), parser.parse(phrase));
    }

    #[test]
    fn test_day_month_order_independence() {
        let parser = HebrewDateParser::new();

        for month in 1..=13 {
            let name = month_name(month).unwrap();
            for day in 1..=30 {
                let day_token = encode(day).unwrap();

                let forward = parser.parse(&format!("{} {} תשפ״ד", day_token, name));
                let backward = parser.parse(&format!("{} {} תשפ״ד", name, day_token));

                assert_eq!(forward.day, Some(day), "{} {}", day_token, name);
                assert_eq!(forward.month_numeric, Some(month), "{} {}", day_token, name);
                assert_eq!(forward.day, backward.day, "{} {}", name, day_token);
                assert_eq!(
                    forward.month_numeric, backward.month_numeric,
                    "{} {}",
                    name, day_token
                );
            }
        }
    }

    #[test]
    fn test_serializes_camel_case_and_omits_missing() {
        let json = serde_json::to_value(parse("סיון")).unwrap();
        assert_eq!(json["monthNumeric"], 3);
        assert_eq!(json["rawText"], "סיון");
        assert!(json.get("day").is_none());
        assert!(json.get("year").is_none());
    }
}
