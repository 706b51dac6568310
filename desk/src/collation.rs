//! Vietnamese collation for attendee names.
//!
//! Letters are compared by their position in the Vietnamese alphabet
//! (`a ă â b c d đ e ê g ... o ô ơ ... u ư v x y`), ignoring case. Tone marks
//! are a secondary key: they only decide between names whose letters are
//! identical, in the order level, grave, hook, tilde, acute, dot below.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const BREVE: char = '\u{0306}';
const CIRCUMFLEX: char = '\u{0302}';
const HORN: char = '\u{031B}';

const GRAVE: char = '\u{0300}';
const HOOK: char = '\u{0309}';
const TILDE: char = '\u{0303}';
const ACUTE: char = '\u{0301}';
const DOT_BELOW: char = '\u{0323}';

/// Sort key for a name under Vietnamese collation
///
/// Keys compare letters first and fall back to tones only when every letter
/// matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    letters: Vec<u32>,
    tones: Vec<u8>,
}

impl CollationKey {
    /// Build the key for `text`
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut key = Self::default();

        for c in text.to_lowercase().nfd() {
            if is_combining_mark(c) {
                key.apply_mark(c);
            } else {
                key.push_letter(c);
            }
        }

        key
    }

    fn push_letter(&mut self, c: char) {
        // đ has no decomposition; it sorts right after d.
        let weight = if c == 'đ' { letter_weight('d') + 1 } else { letter_weight(c) };
        self.letters.push(weight);
        self.tones.push(0);
    }

    fn apply_mark(&mut self, mark: char) {
        let (Some(letter), Some(tone)) = (self.letters.last_mut(), self.tones.last_mut()) else {
            return;
        };
        match mark {
            BREVE => *letter += 1,
            CIRCUMFLEX => *letter += 2,
            HORN => *letter += 3,
            GRAVE => *tone = 1,
            HOOK => *tone = 2,
            TILDE => *tone = 3,
            ACUTE => *tone = 4,
            DOT_BELOW => *tone = 5,
            _ => {},
        }
    }
}

// Four slots per base letter leave room for the breve, circumflex and horn
// variants between a letter and the next one.
fn letter_weight(c: char) -> u32 {
    u32::from(c) * 4
}

/// Compare two strings under Vietnamese collation
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}
