// 🗓️ Hebrew Month Names - variant spellings → month index
// Numbering starts at Nisan: 1=Nisan … 6=Elul, 7=Tishrei … 12=Adar (Adar I), 13=Adar II

use crate::gematria::is_numeral_mark;

pub const NISAN: u32 = 1;
pub const TISHREI: u32 = 7;
pub const ADAR: u32 = 12;
pub const ADAR_II: u32 = 13;

// ============================================================================
// VARIANT TABLE
// ============================================================================

/// Known spellings, normalized (no geresh, single spaces).
///
/// Order matters: the fuzzy fallback walks this slice top to bottom and the
/// first hit wins, so longer Adar variants sit before plain אדר.
const MONTH_VARIANTS: &[(&str, u32)] = &[
    ("ניסן", 1),
    ("נסן", 1),
    ("אייר", 2),
    ("איר", 2),
    ("סיון", 3),
    ("סיוון", 3),
    ("תמוז", 4),
    ("מנחם אב", 5),
    ("אב", 5),
    ("אלול", 6),
    ("תשרי", 7),
    ("מרחשוון", 8),
    ("מרחשון", 8),
    ("חשוון", 8),
    ("חשון", 8),
    ("כסלו", 9),
    ("כסליו", 9),
    ("טבת", 10),
    ("שבט", 11),
    ("אדר ראשון", 12),
    ("אדר א", 12),
    ("אדר שני", 13),
    ("אדר ב", 13),
    ("אדר", 12),
];

const CANONICAL_NAMES: [&str; 13] = [
    "ניסן", "אייר", "סיון", "תמוז", "אב", "אלול", "תשרי", "חשון", "כסלו", "טבת", "שבט", "אדר",
    "אדר ב׳",
];

/// Single-letter prefixes ("in", "to", "and") glued onto month names
const ATTACHED_PREFIXES: [char; 3] = ['ב', 'ל', 'ו'];

/// Shortest token the containment fallback will look at
const MIN_FUZZY_LEN: usize = 3;

// ============================================================================
// RESOLUTION
// ============================================================================

/// Resolve a month-name token to its index (1..=13).
///
/// Exact lookup first, then the same lookup with an attached ב/ל/ו prefix
/// removed, then bidirectional containment against the table. Numeral-looking
/// tokens (anything carrying a geresh) and very short tokens never reach the
/// containment step, otherwise א or י"א would match אב / אייר.
pub fn resolve(token: &str) -> Option<u32> {
    let normalized = normalize(token);
    if normalized.is_empty() {
        return None;
    }

    if let Some(month) = exact(&normalized) {
        return Some(month);
    }

    if let Some(rest) = strip_attached_prefix(&normalized) {
        if let Some(month) = exact(rest) {
            return Some(month);
        }
    }

    if has_mark(token) || normalized.chars().count() < MIN_FUZZY_LEN {
        return None;
    }

    fuzzy(&normalized)
}

/// Canonical display name for a month index
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    CANONICAL_NAMES.get(index).copied()
}

/// Display name that distinguishes Adar I from plain Adar in leap years
pub fn display_name(month: u32, leap_year: bool) -> Option<&'static str> {
    if month == ADAR && leap_year {
        return Some("אדר א׳");
    }
    month_name(month)
}

/// Qualifier that turns a following אדר into Adar I or Adar II
pub fn is_adar_qualifier(token: &str) -> bool {
    matches!(normalize(token).as_str(), "א" | "ב" | "ראשון" | "שני")
}

fn exact(normalized: &str) -> Option<u32> {
    MONTH_VARIANTS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, month)| *month)
}

/// Single-word keys only: אדר שני must not make a bare שני ("Monday") a month
fn fuzzy(normalized: &str) -> Option<u32> {
    MONTH_VARIANTS
        .iter()
        .filter(|(name, _)| !name.contains(' '))
        .find(|(name, _)| {
            name.contains(normalized)
                || (name.chars().count() >= MIN_FUZZY_LEN && normalized.contains(name))
        })
        .map(|(_, month)| *month)
}

fn strip_attached_prefix(normalized: &str) -> Option<&str> {
    let first = normalized.chars().next()?;
    if !ATTACHED_PREFIXES.contains(&first) {
        return None;
    }
    let rest = &normalized[first.len_utf8()..];
    (!rest.is_empty()).then_some(rest)
}

fn has_mark(token: &str) -> bool {
    token.chars().any(is_numeral_mark)
}

/// Drop marks and surrounding punctuation, collapse whitespace
fn normalize(token: &str) -> String {
    let without_marks: String = token.chars().filter(|c| !is_numeral_mark(*c)).collect();

    without_marks
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// TESTS
// ============================================================================
