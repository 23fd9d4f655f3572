use std::fmt;

/// How a search term was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermSource {
    Typed,
    Spoken,
}

/// A normalized, non-empty search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    text: String,
    source: TermSource,
}

impl SearchTerm {
    /// Normalize typed input; `None` for blank input
    pub fn typed(input: &str) -> Option<Self> {
        let text = collapse_whitespace(input);
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text,
            source: TermSource::Typed,
        })
    }

    /// Normalize a speech-recognition transcript; `None` if nothing usable remains
    pub fn spoken(transcript: &str) -> Option<Self> {
        let collapsed = collapse_whitespace(transcript);
        let trimmed = collapsed.trim_end_matches(['.', '?', '!', ',']).trim_end();
        if trimmed.is_empty() {
            return None;
        }

        // Dictation capitalizes the first word; only undo that for one-word terms
        let text = if trimmed.contains(' ') {
            trimmed.to_string()
        } else {
            let mut chars = trimmed.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => String::new(),
            }
        };

        Some(Self {
            text,
            source: TermSource::Spoken,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> TermSource {
        self.source
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_normalizes_whitespace() {
        let term = SearchTerm::typed("  the   lord of\tthe rings ").unwrap();
        assert_eq!(term.as_str(), "the lord of the rings");
        assert_eq!(term.source(), TermSource::Typed);
    }

    #[test]
    fn test_blank_input_rejected() {
        assert!(SearchTerm::typed("   ").is_none());
        assert!(SearchTerm::spoken(" ... ").is_none());
    }

    #[test]
    fn test_spoken_strips_trailing_punctuation() {
        let term = SearchTerm::spoken("The Hobbit.").unwrap();
        assert_eq!(term.as_str(), "The Hobbit");
        assert_eq!(term.source(), TermSource::Spoken);
    }

    #[test]
    fn test_spoken_single_word_is_lowercased() {
        assert_eq!(SearchTerm::spoken("Dragons!").unwrap().as_str(), "dragons");
    }

    #[test]
    fn test_typed_keeps_punctuation() {
        assert_eq!(SearchTerm::typed("Why?").unwrap().as_str(), "Why?");
    }
}
