use unicode_segmentation::UnicodeSegmentation;

/// Minimum-length predicate applied to debounced keywords.
///
/// Length is measured in extended grapheme clusters, so `"é"` written with a
/// combining accent counts as one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordGate {
    minimum_length: usize,
}

impl KeywordGate {
    pub const fn new(minimum_length: usize) -> Self {
        Self { minimum_length }
    }

    pub const fn minimum_length(&self) -> usize {
        self.minimum_length
    }

    /// `length(keyword) >= minimum_length`.
    pub fn accepts(&self, keyword: &str) -> bool {
        if self.minimum_length == 0 {
            return true;
        }
        // Stop counting once the threshold is reached.
        keyword.graphemes(true).take(self.minimum_length).count() >= self.minimum_length
    }
}
