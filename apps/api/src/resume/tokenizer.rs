use unicode_segmentation::UnicodeSegmentation;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits text into words on whitespace and punctuation.
/// Word segments are split again on inner punctuation, so `python's` gives
/// `python` and `s`, and `node.js` gives `node` and `js`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words()
        .flat_map(|word| word.split(|c: char| !is_word_char(c)))
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
