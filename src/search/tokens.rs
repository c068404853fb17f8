use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").unwrap();
}

/// Distinct lowercase words of `text`, in order of first appearance.
pub fn word_tokens(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for word in WORD.find_iter(text) {
        let word = word.as_str().to_lowercase();
        if !tokens.contains(&word) {
            tokens.push(word);
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokens() {
        assert_eq!(
            word_tokens("Let it be, let IT be!"),
            vec!["let", "it", "be"]
        );
        assert_eq!(word_tokens("Привет, мир"), vec!["привет", "мир"]);
        assert!(word_tokens(" ,.! ").is_empty());
    }
}
