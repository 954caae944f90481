use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Error returned by the explicit rule-loading APIs.
///
/// The default rule set never surfaces this; see [`RuleSet::load_or_fallback`].
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule file could not be read.
    #[error("failed to read rule file: {0}")]
    Io(#[from] std::io::Error),
    /// The rule document was not valid JSON or had the wrong shape.
    #[error("failed to parse rule file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk representation of a rule document. Any field may be absent.
#[derive(Default, Deserialize)]
struct RuleFile {
    #[serde(default)]
    profanity_words: Vec<String>,
    #[serde(default)]
    mild_ok_words: Vec<String>,
    #[serde(default)]
    ok_phrases: Vec<String>,
    #[serde(default)]
    bad_phrases: Vec<String>,
    #[serde(default)]
    false_positives: Vec<String>,
    #[serde(default)]
    leet_map: FxHashMap<String, String>,
}

/// An immutable collection of word and phrase rules, plus a leet-speak
/// substitution table.
///
/// All entries are stored lowercase and probes are lowercased before lookup,
/// so every rule is case-insensitive. A `RuleSet` never changes after
/// construction and can be shared freely across threads; to change the rules,
/// build a new one.
///
/// Most users want the process-wide default set (see
/// [`default_rules`][crate::default_rules]). Custom sets can be built with
/// the `with_*` methods or loaded from a JSON document:
///
/// ```json
/// {
///     "profanity_words": ["badword"],
///     "mild_ok_words": ["heck"],
///     "ok_phrases": ["trusted context"],
///     "bad_phrases": ["you are a"],
///     "false_positives": ["scunthorpe"],
///     "leet_map": {"3": "e"}
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    /// Words profane on exact or compound match.
    pub(crate) profanity: FxHashSet<String>,
    /// Words flagged at low confidence, below the censor threshold.
    pub(crate) mild: FxHashSet<String>,
    /// Substrings whose presence clears the whole message.
    pub(crate) ok_phrases: FxHashSet<String>,
    /// Substrings always classified profane, ahead of every other rule.
    pub(crate) bad_phrases: FxHashSet<String>,
    /// Whole words excluded from triggering any profanity match.
    pub(crate) false_positives: FxHashSet<String>,
    /// Single-character substitutions applied during detection only.
    pub(crate) leet_map: FxHashMap<char, char>,
}

impl RuleSet {
    /// Creates a rule set with no rules at all. Useful as a starting point
    /// for the `with_*` methods.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds words considered profane on exact match, or on substring match
    /// inside longer words (compound detection).
    pub fn with_profanity<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.profanity.extend(lowercased(words));
        self
    }

    /// Adds words flagged at a confidence below the censor threshold.
    pub fn with_mild<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.mild.extend(lowercased(words));
        self
    }

    /// Adds phrases that clear a message outright when present.
    pub fn with_ok_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ok_phrases.extend(lowercased(phrases));
        self
    }

    /// Adds phrases that are always classified profane when present.
    pub fn with_bad_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.bad_phrases.extend(lowercased(phrases));
        self
    }

    /// Adds whole words that never trigger a profanity match, even when they
    /// contain a profanity entry as a substring.
    pub fn with_false_positives<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.false_positives.extend(lowercased(words));
        self
    }

    /// Adds single-character leet substitutions, e.g. `('3', 'e')`.
    pub fn with_leet<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (char, char)>,
    {
        self.leet_map.extend(entries);
        self
    }

    /// Parses a rule document from a JSON string. Any of the six fields may
    /// be absent. Leet entries whose key or value is not exactly one
    /// character are skipped individually.
    pub fn from_json_str(json: &str) -> Result<Self, RuleError> {
        let file: RuleFile = serde_json::from_str(json)?;
        Ok(Self::from_file(file))
    }

    /// Reads and parses a rule document from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Parses a rule document, substituting [`RuleSet::fallback`] on any
    /// failure so that filtering degrades instead of disappearing. Never
    /// fails; the failure is logged at warn level.
    pub fn load_or_fallback(json: &str) -> Self {
        match Self::from_json_str(json) {
            Ok(rules) => {
                info!(words = rules.profanity.len(), "loaded profanity rules");
                rules
            }
            Err(err) => {
                warn!(%err, "failed to load profanity rules, using fallback list");
                Self::fallback()
            }
        }
    }

    /// The minimal hardcoded rule set used when a rule document cannot be
    /// loaded.
    pub fn fallback() -> Self {
        Self::empty()
            .with_profanity([
                "fuck", "shit", "bitch", "cunt", "nigger", "dick", "pussy", "asshole", "cock",
                "faggot",
            ])
            .with_leet([
                ('0', 'o'),
                ('1', 'i'),
                ('3', 'e'),
                ('4', 'a'),
                ('5', 's'),
                ('7', 't'),
                ('8', 'b'),
                ('@', 'a'),
                ('$', 's'),
                ('!', 'i'),
            ])
    }

    fn from_file(file: RuleFile) -> Self {
        let mut rules = Self::empty()
            .with_profanity(file.profanity_words)
            .with_mild(file.mild_ok_words)
            .with_ok_phrases(file.ok_phrases)
            .with_bad_phrases(file.bad_phrases)
            .with_false_positives(file.false_positives);
        for (key, value) in file.leet_map {
            let mut keys = key.chars();
            let mut values = value.chars();
            match (keys.next(), keys.next(), values.next(), values.next()) {
                (Some(k), None, Some(v), None) => {
                    rules.leet_map.insert(k, v);
                }
                _ => warn!(%key, %value, "ignoring malformed leet entry"),
            }
        }
        rules
    }
}

fn lowercased<I, S>(entries: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries.into_iter().map(|s| s.as_ref().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let rules = RuleSet::from_json_str(
            r#"{
                "profanity_words": ["FUCK", "shit"],
                "mild_ok_words": ["Damn"],
                "ok_phrases": ["Class Assignment"],
                "bad_phrases": ["you are trash"],
                "false_positives": ["Scunthorpe"],
                "leet_map": {"3": "e", "@": "a"}
            }"#,
        )
        .unwrap();

        assert!(rules.profanity.contains("fuck"));
        assert!(rules.profanity.contains("shit"));
        assert!(rules.mild.contains("damn"));
        assert!(rules.ok_phrases.contains("class assignment"));
        assert!(rules.bad_phrases.contains("you are trash"));
        assert!(rules.false_positives.contains("scunthorpe"));
        assert_eq!(rules.leet_map.get(&'3'), Some(&'e'));
        assert_eq!(rules.leet_map.get(&'@'), Some(&'a'));
    }

    #[test]
    fn absent_fields_are_empty() {
        let rules = RuleSet::from_json_str("{}").unwrap();
        assert!(rules.profanity.is_empty());
        assert!(rules.mild.is_empty());
        assert!(rules.ok_phrases.is_empty());
        assert!(rules.bad_phrases.is_empty());
        assert!(rules.false_positives.is_empty());
        assert!(rules.leet_map.is_empty());
    }

    #[test]
    fn malformed_leet_entries_are_skipped_individually() {
        let rules = RuleSet::from_json_str(
            r#"{"leet_map": {"ab": "c", "1": "xy", "": "z", "3": "e"}}"#,
        )
        .unwrap();
        assert_eq!(rules.leet_map.len(), 1);
        assert_eq!(rules.leet_map.get(&'3'), Some(&'e'));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(
            RuleSet::from_json_str("not json"),
            Err(RuleError::Parse(_))
        ));
        assert!(matches!(
            RuleSet::from_json_str(r#"{"profanity_words": "not a list"}"#),
            Err(RuleError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            RuleSet::from_path("/does/not/exist.json"),
            Err(RuleError::Io(_))
        ));
    }

    #[test]
    fn load_or_fallback_never_fails() {
        let rules = RuleSet::load_or_fallback("definitely not json");
        assert_eq!(rules.profanity.len(), 10);
        assert!(rules.profanity.contains("fuck"));
        assert_eq!(rules.leet_map.get(&'3'), Some(&'e'));

        let rules = RuleSet::load_or_fallback(r#"{"profanity_words": ["badword"]}"#);
        assert!(rules.profanity.contains("badword"));
    }

    #[test]
    fn builder_lowercases_entries() {
        let rules = RuleSet::empty()
            .with_profanity(["BadWord"])
            .with_false_positives(["ScunThorpe"]);
        assert!(rules.profanity.contains("badword"));
        assert!(rules.false_positives.contains("scunthorpe"));
    }
}
