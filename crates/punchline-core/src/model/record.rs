use serde::Serialize;

use crate::text::normalize_key;

/// One lyric excerpt and the comparison it expresses.
///
/// Display fields are kept verbatim. Matching reads the separate key
/// fields, which are computed once at construction and cannot drift
/// from the display text because neither is mutable after that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimileRecord {
    artist: String,
    song: String,
    line: String,

    /// The subject being described ("eyes" in "eyes like ice").
    signified: Option<String>,
    /// What the subject is compared to ("ice" in "eyes like ice").
    signifier: Option<String>,

    #[serde(skip)]
    line_key: String,
    #[serde(skip)]
    signified_key: Option<String>,
    #[serde(skip)]
    signifier_key: Option<String>,
}

impl SimileRecord {
    #[must_use]
    pub fn new(
        artist: impl Into<String>,
        song: impl Into<String>,
        line: impl Into<String>,
    ) -> Self {
        let line = line.into();
        Self {
            artist: artist.into(),
            song: song.into(),
            line_key: normalize_key(&line),
            line,
            signified: None,
            signifier: None,
            signified_key: None,
            signifier_key: None,
        }
    }

    #[must_use]
    pub fn with_signified(mut self, signified: impl Into<String>) -> Self {
        let signified = signified.into();
        self.signified_key = Some(normalize_key(&signified));
        self.signified = Some(signified);
        self
    }

    #[must_use]
    pub fn with_signifier(mut self, signifier: impl Into<String>) -> Self {
        let signifier = signifier.into();
        self.signifier_key = Some(normalize_key(&signifier));
        self.signifier = Some(signifier);
        self
    }

    #[must_use]
    pub fn with_comparison(
        self,
        signified: impl Into<String>,
        signifier: impl Into<String>,
    ) -> Self {
        self.with_signified(signified).with_signifier(signifier)
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn song(&self) -> &str {
        &self.song
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn signified(&self) -> Option<&str> {
        self.signified.as_deref()
    }

    pub fn signifier(&self) -> Option<&str> {
        self.signifier.as_deref()
    }

    pub fn line_key(&self) -> &str {
        &self.line_key
    }

    pub fn signified_key(&self) -> Option<&str> {
        self.signified_key.as_deref()
    }

    pub fn signifier_key(&self) -> Option<&str> {
        self.signifier_key.as_deref()
    }

    /// Whether the record carries a signified/signifier pair. Records from
    /// line-only files do not.
    pub fn has_comparison(&self) -> bool {
        self.signified.is_some() || self.signifier.is_some()
    }

    /// The keys the semantic match policies compare against: both
    /// comparison fields when present, otherwise the line.
    pub fn semantic_keys(&self) -> Vec<&str> {
        if self.has_comparison() {
            self.signified_key
                .iter()
                .chain(self.signifier_key.iter())
                .map(String::as_str)
                .collect()
        } else {
            vec![self.line_key.as_str()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_new_keeps_display_verbatim() {
        let record = SimileRecord::new("MF DOOM", "Accordion", "  Living Off Borrowed Time ");
        assert_eq!(record.line(), "  Living Off Borrowed Time ");
        assert_eq!(record.line_key(), "living off borrowed time");
        assert_eq!(record.artist(), "MF DOOM");
        assert_eq!(record.song(), "Accordion");
        assert!(!record.has_comparison());
    }

    #[test]
    fn test_record_comparison_keys() {
        let record = SimileRecord::new("Nas", "N.Y. State of Mind", "eyes like ICE")
            .with_comparison(" Eyes", "ICE ");
        assert_eq!(record.signified(), Some(" Eyes"));
        assert_eq!(record.signified_key(), Some("eyes"));
        assert_eq!(record.signifier(), Some("ICE "));
        assert_eq!(record.signifier_key(), Some("ice"));
        assert!(record.has_comparison());
    }

    #[test]
    fn test_semantic_keys_prefer_comparison_fields() {
        let record = SimileRecord::new("a", "s", "cold like ice").with_comparison("heart", "ice");
        assert_eq!(record.semantic_keys(), vec!["heart", "ice"]);
    }

    #[test]
    fn test_semantic_keys_fall_back_to_line() {
        let record = SimileRecord::new("a", "s", "Cold Like Ice");
        assert_eq!(record.semantic_keys(), vec!["cold like ice"]);
    }

    #[test]
    fn test_signified_equal_to_signifier_is_allowed() {
        let record = SimileRecord::new("a", "s", "me like me").with_comparison("me", "me");
        assert_eq!(record.semantic_keys(), vec!["me", "me"]);
    }

    #[test]
    fn test_serialize_skips_keys() {
        let record = SimileRecord::new("a", "s", "Line").with_signifier("Ice");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["line"], "Line");
        assert_eq!(json["signifier"], "Ice");
        assert!(json.get("line_key").is_none());
    }
}
