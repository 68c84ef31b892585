// 🔢 Gematria - Hebrew letter numerals
// Decodes numerals like י"א / תשע"ט by plain summation, and renders numbers back
// into letters for display (ט״ו, תש״פ).

// ============================================================================
// LETTER VALUES
// ============================================================================

/// Geresh / gershayim and the quote characters OCR substitutes for them
const NUMERAL_MARKS: [char; 9] = ['\'', '"', '׳', '״', '‘', '’', '“', '”', '`'];

const HUNDREDS: [(u32, char); 3] = [(300, 'ש'), (200, 'ר'), (100, 'ק')];

const TENS: [char; 9] = ['י', 'כ', 'ל', 'מ', 'נ', 'ס', 'ע', 'פ', 'צ'];

const UNITS: [char; 9] = ['א', 'ב', 'ג', 'ד', 'ה', 'ו', 'ז', 'ח', 'ט'];

/// Numeric value of a single Hebrew letter (final forms count like regular forms)
pub fn letter_value(c: char) -> Option<u32> {
    let value = match c {
        'א' => 1,
        'ב' => 2,
        'ג' => 3,
        'ד' => 4,
        'ה' => 5,
        'ו' => 6,
        'ז' => 7,
        'ח' => 8,
        'ט' => 9,
        'י' => 10,
        'כ' | 'ך' => 20,
        'ל' => 30,
        'מ' | 'ם' => 40,
        'נ' | 'ן' => 50,
        'ס' => 60,
        'ע' => 70,
        'פ' | 'ף' => 80,
        'צ' | 'ץ' => 90,
        'ק' => 100,
        'ר' => 200,
        'ש' => 300,
        'ת' => 400,
        _ => return None,
    };
    Some(value)
}

pub fn is_numeral_mark(c: char) -> bool {
    NUMERAL_MARKS.contains(&c)
}

/// True if the token carries a geresh / gershayim (or an OCR stand-in for one)
pub fn has_numeral_mark(token: &str) -> bool {
    token.chars().any(is_numeral_mark)
}

// ============================================================================
// DECODING
// ============================================================================

/// Decode a Hebrew numeral token by summing its letter values.
///
/// Marks and whitespace are stripped first. Returns `None` when nothing is left
/// or no character is a Hebrew letter. No letter is worth 0, so `Some(0)` never
/// happens.
///
/// # Examples:
/// ```
/// use memorial_dates::gematria::decode;
/// assert_eq!(decode("י\"א"), Some(11));
/// assert_eq!(decode("כ\"ג"), Some(23));
/// assert_eq!(decode("abc"), None);
/// ```
pub fn decode(token: &str) -> Option<u32> {
    let cleaned: String = token
        .chars()
        .filter(|c| !is_numeral_mark(*c) && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let mut total = 0;
    let mut recognized = false;

    for c in cleaned.chars() {
        if let Some(value) = letter_value(c) {
            total += value;
            recognized = true;
        }
    }

    recognized.then_some(total)
}

/// Decode a year-like token and place it in the 6th millennium (779 → 5779)
pub fn parse_hebrew_year_like(token: &str) -> Option<i32> {
    let value = i32::try_from(decode(token)?).ok()?;
    Some(normalize_year(value))
}

/// Years written without the thousands (short form) are assumed to be 5xxx
pub fn normalize_year(value: i32) -> i32 {
    if value < 1000 {
        value + 5000
    } else {
        value
    }
}

// ============================================================================
// ENCODING (display only)
// ============================================================================

/// Render 1..=999 as Hebrew letters with geresh / gershayim.
///
/// 15 and 16 use ט״ו / ט״ז instead of the divine-name spellings.
pub fn encode(value: u32) -> Option<String> {
    if value == 0 || value > 999 {
        return None;
    }

    let mut letters = String::new();
    let mut rest = value;

    while rest >= 400 {
        letters.push('ת');
        rest -= 400;
    }

    for (amount, letter) in HUNDREDS {
        if rest >= amount {
            letters.push(letter);
            rest -= amount;
        }
    }

    match rest {
        15 => letters.push_str("טו"),
        16 => letters.push_str("טז"),
        _ => {
            if rest >= 10 {
                letters.push(TENS[(rest / 10 - 1) as usize]);
            }
            if rest % 10 > 0 {
                letters.push(UNITS[(rest % 10 - 1) as usize]);
            }
        }
    }

    Some(punctuate(&letters))
}

/// Hebrew year without the thousands, e.g. 5780 → תש״פ
pub fn format_hebrew_year(year: i32) -> Option<String> {
    let short = u32::try_from(year.rem_euclid(1000)).ok()?;
    encode(short)
}

fn punctuate(letters: &str) -> String {
    let chars: Vec<char> = letters.chars().collect();

    match chars.split_last() {
        None => String::new(),
        Some((last, [])) => format!("{}׳", last),
        Some((last, init)) => {
            let head: String = init.iter().collect();
            format!("{}״{}", head, last)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
