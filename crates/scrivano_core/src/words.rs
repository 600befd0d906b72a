//! Word counting.

/// Count words by splitting on whitespace and dropping empty tokens.
///
/// This single rule defines `words_written` and `total_words` everywhere:
/// live progress display and completion accounting must agree on it.
///
/// # Examples
///
/// ```
/// use scrivano_core::count_words;
///
/// assert_eq!(count_words("one  two\nthree"), 3);
/// assert_eq!(count_words(""), 0);
/// ```
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
