// ✍️ Name Normalization - free text → canonical display name
//
// "mince-meat!!" → "Mince Meat"
//
// Only applied to names typed as free text. Registry keys and required-item
// references are matched exactly and never pass through here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("no valid characters in '{0}'")]
    NoValidCharacters(String),
}

/// Clean up a hand-typed name.
///
/// - `-` and `_` separate words
/// - anything other than ASCII letters and spaces is dropped
/// - each word is capitalized, words are joined by a single space
pub fn normalize_name(text: &str) -> Result<String, NameError> {
    let cleaned: String = text
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .collect::<String>()
        .to_lowercase();

    let words: Vec<String> = cleaned.split_whitespace().map(capitalize).collect();

    if words.is_empty() {
        return Err(NameError::NoValidCharacters(text.to_string()));
    }

    Ok(words.join(" "))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
