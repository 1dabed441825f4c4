//! S3 object key validation.
//!
//! Every character of a candidate key is classified into exactly one
//! [`CharClass`]. Non-printable and "avoid" characters disqualify the key;
//! special-handling and extended characters only produce recommendations.
//! Length, trailing period, relative path and space checks are applied on
//! top of the character scan.

use serde::Serialize;

pub mod report;
pub mod scanner;

#[cfg(test)]
mod key_check_properties;

pub use report::{ReportSummary, generate_json, generate_report};
pub use scanner::scan_directory;

/// Maximum UTF-8 byte length of an S3 object key.
pub const MAX_KEY_BYTES: usize = 1024;

/// Revision of the character class tables below.
///
/// The tables are hand-enumerated and must only change together with this
/// number.
pub const CHARACTER_TABLE_VERSION: u32 = 1;

/// Characters that may cause issues with various tools and protocols.
pub const AVOID_CHARS: &[char] = &[
    '\\', '{', '}', '^', '%', '`', ']', '"', '>', ' ', '[', '~', '<', '#', '|',
];

/// Characters that usually need URL encoding.
pub const SPECIAL_HANDLING_CHARS: &[char] = &['&', '$', '@', '=', ';', '/', ':', '+', ',', '?'];

const ISSUE_EMPTY_KEY: &str = "empty key";
const RECOMMENDATION_TRAILING_PERIOD: &str =
    "ends with a period: may be truncated in the S3 console";
const RECOMMENDATION_RELATIVE_PATH: &str = "contains relative path elements: ensure proper handling";
const RECOMMENDATION_SPACES: &str = "contains spaces: may need special handling in URLs";

/// Safety class of a single character, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Code points 0-31 and 127. Disqualifying.
    NonPrintable,
    /// Disqualifying.
    Avoid,
    /// Needs URL encoding. Recommendation only.
    SpecialHandling,
    /// Code points 128-255. Recommendation only.
    Extended,
    Safe,
}

impl CharClass {
    pub fn is_disqualifying(&self) -> bool {
        matches!(self, CharClass::NonPrintable | CharClass::Avoid)
    }

    fn finding(&self) -> &'static str {
        match self {
            CharClass::NonPrintable => "contains non-printable characters",
            CharClass::Avoid => "contains characters that should be avoided",
            CharClass::SpecialHandling => "contains characters that may need URL encoding",
            CharClass::Extended => "contains extended ASCII characters that may cause issues",
            CharClass::Safe => "",
        }
    }
}

/// Classify a single character. First match wins.
pub fn classify(c: char) -> CharClass {
    let code_point = c as u32;
    if code_point < 32 || code_point == 127 {
        CharClass::NonPrintable
    } else if AVOID_CHARS.contains(&c) {
        CharClass::Avoid
    } else if SPECIAL_HANDLING_CHARS.contains(&c) {
        CharClass::SpecialHandling
    } else if (128..=255).contains(&code_point) {
        CharClass::Extended
    } else {
        CharClass::Safe
    }
}

/// Outcome of validating one candidate key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub key: String,
    /// Local path the key was derived from, when scanned from disk.
    pub path: Option<String>,
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ValidationResult {
    fn new(key: &str, path: Option<String>) -> Self {
        Self {
            key: key.to_string(),
            path,
            is_valid: true,
            issues: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    fn add_issue(&mut self, issue: String) {
        self.issues.push(issue);
        self.is_valid = false;
    }

    /// Valid and nothing to recommend.
    pub fn is_clean(&self) -> bool {
        self.is_valid && self.recommendations.is_empty()
    }

    /// Valid, but with at least one recommendation.
    pub fn has_warnings(&self) -> bool {
        self.is_valid && !self.recommendations.is_empty()
    }
}

/// Distinct characters of one class, in first-seen order.
#[derive(Default)]
struct CharBucket(Vec<char>);

impl CharBucket {
    fn insert(&mut self, c: char) {
        if !self.0.contains(&c) {
            self.0.push(c);
        }
    }

    fn describe(&self, class: CharClass) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let chars = self
            .0
            .iter()
            .map(|c| format!("'{}'", c.escape_debug()))
            .collect::<Vec<_>>()
            .join(", ");
        Some(format!("{}: [{chars}]", class.finding()))
    }
}

/// Validate a candidate object key.
///
/// Never panics. An empty or whitespace-only key yields a single
/// `empty key` issue (plus the length issue, which cannot co-occur).
///
/// ```
/// use s3kit::key_check::validate_key;
///
/// let result = validate_key("weird@file#name.pdf");
/// assert!(!result.is_valid);
/// assert_eq!(result.issues.len(), 1);
/// assert_eq!(result.recommendations.len(), 1);
/// ```
pub fn validate_key(key: &str) -> ValidationResult {
    validate(key, None)
}

/// Validate a key that was derived from a local file path.
pub fn validate_path(key: &str, path: &str) -> ValidationResult {
    validate(key, Some(path.to_string()))
}

fn validate(key: &str, path: Option<String>) -> ValidationResult {
    let mut result = ValidationResult::new(key, path);

    let key_bytes = key.len();
    if key_bytes > MAX_KEY_BYTES {
        result.add_issue(format!(
            "key too long: {key_bytes} bytes (max {MAX_KEY_BYTES})"
        ));
    }

    if key.trim().is_empty() {
        result.add_issue(ISSUE_EMPTY_KEY.to_string());
        return result;
    }

    let mut non_printable = CharBucket::default();
    let mut avoid = CharBucket::default();
    let mut special = CharBucket::default();
    let mut extended = CharBucket::default();

    for c in key.chars() {
        match classify(c) {
            CharClass::NonPrintable => non_printable.insert(c),
            CharClass::Avoid => avoid.insert(c),
            CharClass::SpecialHandling => special.insert(c),
            CharClass::Extended => extended.insert(c),
            CharClass::Safe => {}
        }
    }

    if let Some(issue) = non_printable.describe(CharClass::NonPrintable) {
        result.add_issue(issue);
    }
    if let Some(issue) = avoid.describe(CharClass::Avoid) {
        result.add_issue(issue);
    }
    if let Some(recommendation) = special.describe(CharClass::SpecialHandling) {
        result.recommendations.push(recommendation);
    }
    if let Some(recommendation) = extended.describe(CharClass::Extended) {
        result.recommendations.push(recommendation);
    }

    if key.ends_with('.') {
        result
            .recommendations
            .push(RECOMMENDATION_TRAILING_PERIOD.to_string());
    }
    // "../" always contains "./"
    if key.contains("./") {
        result
            .recommendations
            .push(RECOMMENDATION_RELATIVE_PATH.to_string());
    }
    if key.contains(' ') {
        result.recommendations.push(RECOMMENDATION_SPACES.to_string());
    }

    result
}
