use crate::normalize::{extract_words, normalize_leet};
use crate::rules::RuleSet;
use itertools::Itertools;
use tracing::debug;

/// Confidence assigned to bad-phrase (directed insult) matches.
const INSULT_CONFIDENCE: f64 = 0.95;
/// Confidence assigned to exact and compound profanity matches.
const PROFANITY_CONFIDENCE: f64 = 0.85;
/// Confidence assigned to mild-word matches, below the censor threshold.
const MILD_CONFIDENCE: f64 = 0.4;
/// Confidence reported when an ok phrase clears a message.
const OK_PHRASE_CONFIDENCE: f64 = 0.1;
/// Confidence reported for clean and false-positive-cleared messages.
const CLEAN_CONFIDENCE: f64 = 0.05;
/// Token-level detections must exceed this confidence to be masked.
const CENSOR_THRESHOLD: f64 = 0.5;

/// Words shorter than this never match any word-level rule.
const MIN_WORD_LEN: usize = 3;
/// Minimum word length for the compound scan.
const MIN_COMPOUND_LEN: usize = 5;
/// Minimum profanity entry length considered by the compound scan.
const MIN_COMPOUND_ENTRY_LEN: usize = 4;

/// The result of analyzing a single message.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Whether the message should be treated as profane.
    pub profane: bool,
    /// Confidence in the classification, in `[0, 1]`.
    pub confidence: f64,
    /// Which rule fired, e.g. `"profanity:fuck"`. Useful in logs, but not a
    /// stable contract.
    pub reason: String,
}

impl Detection {
    fn profane(confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            profane: true,
            confidence,
            reason: reason.into(),
        }
    }

    fn clean(confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            profane: false,
            confidence,
            reason: reason.into(),
        }
    }
}

/// Stateless detection and censoring over a borrowed [`RuleSet`].
///
/// A `Detector` holds no state of its own. [`check`][Self::check] and
/// [`sanitize`][Self::sanitize] are pure functions of the text and the
/// rules, total over every input string, and safe to call concurrently.
///
/// ```
/// use wordwash::{Detector, RuleSet};
///
/// let rules = RuleSet::empty().with_profanity(["badword"]);
/// let detector = Detector::new(&rules);
/// assert!(detector.check("badword").profane);
/// assert_eq!(detector.sanitize("badword here"), "******* here");
/// ```
#[derive(Clone, Copy)]
pub struct Detector<'a> {
    rules: &'a RuleSet,
}

impl<'a> Detector<'a> {
    /// Creates a detector over the given rules.
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Classifies `text`, short-circuiting on the first rule that fires.
    ///
    /// Stages, in order: bad phrases, ok phrases, false-positive words,
    /// then a word scan over the union of the original words and their
    /// leet-normalized forms (exact profanity, mild words, compound
    /// profanity). Empty or whitespace-only input is clean at zero
    /// confidence.
    pub fn check(&self, text: &str) -> Detection {
        if text.trim().is_empty() {
            return Detection::clean(0.0, "empty");
        }

        let lowered = text.to_lowercase();

        // Directed insults outrank every other rule, including ok phrases.
        for phrase in &self.rules.bad_phrases {
            if lowered.contains(phrase.as_str()) {
                return Detection::profane(INSULT_CONFIDENCE, format!("insult:{phrase}"));
            }
        }

        // A trusted context phrase suppresses all word-level stages, even
        // when it embeds a banned word.
        for phrase in &self.rules.ok_phrases {
            if lowered.contains(phrase.as_str()) {
                return Detection::clean(OK_PHRASE_CONFIDENCE, format!("ok:{phrase}"));
            }
        }

        let words = extract_words(text);

        // A single known-safe word clears the whole message. Runs before
        // leet normalization so a safe word cannot be distorted into a
        // match.
        if let Some(word) = words
            .iter()
            .find(|word| self.rules.false_positives.contains(word.as_str()))
        {
            return Detection::clean(CLEAN_CONFIDENCE, format!("safe:{word}"));
        }

        let normalized = normalize_leet(&lowered, self.rules);
        let normalized_words = extract_words(&normalized);

        // Original words first, then normalized-only words, first
        // occurrence kept.
        for word in words.iter().chain(&normalized_words).unique() {
            if word.chars().count() < MIN_WORD_LEN {
                continue;
            }

            if self.rules.profanity.contains(word.as_str()) {
                return Detection::profane(PROFANITY_CONFIDENCE, format!("profanity:{word}"));
            }

            if self.rules.mild.contains(word.as_str()) {
                return Detection::profane(MILD_CONFIDENCE, format!("mild:{word}"));
            }

            if word.chars().count() >= MIN_COMPOUND_LEN {
                for entry in &self.rules.profanity {
                    if entry.chars().count() >= MIN_COMPOUND_ENTRY_LEN
                        && word.contains(entry.as_str())
                        && !self.rules.false_positives.contains(word.as_str())
                    {
                        return Detection::profane(
                            PROFANITY_CONFIDENCE,
                            format!("profanity:{word}→{entry}"),
                        );
                    }
                }
            }
        }

        Detection::clean(CLEAN_CONFIDENCE, "clean")
    }

    /// Censors profane tokens in `text`, masking each with a run of `*` of
    /// the token's length. Clean input is returned unchanged.
    ///
    /// Tokens are split on literal spaces only, so tabs, newlines, and
    /// punctuation stay attached to their token and the join reconstructs
    /// the original layout. Each token is re-checked independently and only
    /// masked above the censor threshold, so mild matches survive even when
    /// the message as a whole was flagged.
    pub fn sanitize(&self, text: &str) -> String {
        if !self.check(text).profane {
            return text.to_owned();
        }

        text.split(' ')
            .map(|token| {
                let detection = self.check(token);
                if detection.profane && detection.confidence > CENSOR_THRESHOLD {
                    debug!(reason = %detection.reason, "censored token");
                    "*".repeat(token.chars().count())
                } else {
                    token.to_owned()
                }
            })
            .join(" ")
    }

    /// Sanitizes `text` and reports whether anything changed, invoking
    /// `on_filtered` with a diagnostic line only on change.
    ///
    /// The callback is the sole integration point for hosting event
    /// systems; the detector knows nothing about how messages arrive or
    /// where the diagnostic goes.
    pub fn process_message<F: FnOnce(&str)>(&self, text: &str, on_filtered: F) -> (String, bool) {
        let sanitized = self.sanitize(text);
        let filtered = sanitized != text;
        if filtered {
            on_filtered("filtered profanity from chat message");
        }
        (sanitized, filtered)
    }
}
