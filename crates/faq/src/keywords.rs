//! Keyword extraction for FAQ questions.

/// Words dropped before keywords are taken.
pub const STOP_WORDS: [&str; 17] = [
    "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "what", "how", "are", "for",
    "to", "of", "in",
];

/// Maximum number of keywords stored per entry.
pub const MAX_KEYWORDS: usize = 5;

/// Tokens must be longer than this many characters to count as keywords.
const MIN_KEYWORD_CHARS: usize = 3;

/// Extract up to [`MAX_KEYWORDS`] keywords from free text.
///
/// The text is lowercased and split on whitespace; tokens of more than three
/// characters that are not stop words are kept in order of appearance.
/// Repeated tokens are kept as they occur and no stemming is applied, so
/// punctuation stays attached (`"policy?"`).
pub fn extract_keywords(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_KEYWORD_CHARS && !is_stop_word(word))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handbook_question() {
        assert_eq!(
            extract_keywords("What is the attendance policy for students"),
            vec!["attendance", "policy", "students"]
        );
    }

    #[test]
    fn test_truncates_to_five_in_order() {
        let keywords = extract_keywords(
            "Scholarship renewal requires maintaining grades above eighty percent every semester",
        );
        assert_eq!(
            keywords,
            vec!["scholarship", "renewal", "requires", "maintaining", "grades"]
        );
    }

    #[test]
    fn test_empty_and_stopword_only_input() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   \n\t ").is_empty());
        assert!(extract_keywords("what is the and or but").is_empty());
    }

    #[test]
    fn test_short_tokens_dropped_and_case_folded() {
        assert_eq!(
            extract_keywords("Can I get my ID card REPLACED"),
            vec!["card", "replaced"]
        );
    }

    #[test]
    fn test_repeats_kept_punctuation_attached() {
        assert_eq!(
            extract_keywords("grades, grades and more grades?"),
            vec!["grades,", "grades", "more", "grades?"]
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // "café" is four characters but five bytes
        assert_eq!(extract_keywords("café día"), vec!["café"]);
    }

    #[test]
    fn test_properties_hold_for_varied_inputs() {
        let inputs = [
            "How are the fees for the summer term computed and when are they due",
            "On which day is the graduation ceremony held at the main campus",
            "a an the of in to",
            "Attendance attendance attendance attendance attendance attendance attendance",
        ];

        for input in inputs {
            let keywords = extract_keywords(input);
            assert!(keywords.len() <= MAX_KEYWORDS);
            for keyword in &keywords {
                assert!(keyword.chars().count() > 3);
                assert!(!STOP_WORDS.contains(&keyword.as_str()));
                assert_eq!(keyword, &keyword.to_lowercase());
            }

            // Order of first appearance is preserved
            let lowered = input.to_lowercase();
            let tokens: Vec<&str> = lowered.split_whitespace().collect();
            let mut cursor = 0;
            for keyword in &keywords {
                let pos = tokens[cursor..]
                    .iter()
                    .position(|t| *t == keyword.as_str())
                    .expect("keyword comes from the input");
                cursor += pos + 1;
            }
        }
    }
}
