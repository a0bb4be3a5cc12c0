//! Text processing
//!
//! Pure functions applied to fetched policy pages:
//! - [`extract_text`] turns HTML into cleaned plain text
//! - [`smog_index`] scores plain text for readability

mod extract;
mod readability;

pub use extract::extract_text;
pub use readability::{count_polysyllables, count_sentences, count_syllables, smog_index};
