//! Readability scoring
//!
//! Implements the SMOG grade: roughly the years of schooling needed to
//! understand a text. Lower is easier to read.

/// Minimum number of sentences SMOG needs to produce a meaningful grade
const MIN_SENTENCES: usize = 3;

/// Computes the SMOG index of `text`, rounded to one decimal place
///
/// Returns `0.0` when the text has fewer than three sentences.
///
/// # Example
///
/// ```
/// use koala::text::smog_index;
///
/// assert_eq!(smog_index("Too short."), 0.0);
/// ```
pub fn smog_index(text: &str) -> f64 {
    let sentences = count_sentences(text);
    if sentences < MIN_SENTENCES {
        return 0.0;
    }

    let polysyllables = count_polysyllables(text);
    let grade = 1.043 * (30.0 * polysyllables as f64 / sentences as f64).sqrt() + 3.1291;

    (grade * 10.0).round() / 10.0
}

/// Counts sentences made of more than two words
///
/// Sentences end at `.`, `!` or `?`. Fragments of one or two words (list
/// bullets, headings, abbreviations) are ignored. Never returns zero for
/// non-empty text.
pub fn count_sentences(text: &str) -> usize {
    let counted = text
        .split(['.', '!', '?'])
        .filter(|fragment| words(fragment).count() > 2)
        .count();

    if counted == 0 && words(text).next().is_some() {
        1
    } else {
        counted
    }
}

/// Counts words with three or more syllables
pub fn count_polysyllables(text: &str) -> usize {
    words(text)
        .filter(|word| count_syllables(word) >= 3)
        .count()
}

/// Estimates the syllables in a single word by counting vowel groups
///
/// A trailing silent `e` is discounted unless it forms `-le` after a
/// consonant. Every word has at least one syllable.
pub fn count_syllables(word: &str) -> usize {
    let word: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();

    if word.is_empty() {
        return 0;
    }

    let mut syllables = 0;
    let mut previous_was_vowel = false;
    for &c in &word {
        let vowel = is_vowel(c);
        if vowel && !previous_was_vowel {
            syllables += 1;
        }
        previous_was_vowel = vowel;
    }

    let len = word.len();
    if len > 2 && word[len - 1] == 'e' && !is_vowel(word[len - 2]) {
        let silent = !(word[len - 2] == 'l' && !is_vowel(word[len - 3]));
        if silent && syllables > 1 {
            syllables -= 1;
        }
    }

    syllables.max(1)
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Splits text into words that contain at least one letter
fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|word| word.chars().any(char::is_alphabetic))
}
