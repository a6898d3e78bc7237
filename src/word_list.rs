//! Loading and normalizing the vocabulary a grid is filled from.
//!
//! The input format is one word per line. Every word is trimmed and uppercased, blank lines are
//! skipped, and the resulting list is deduplicated and sorted by length, then alphabetically, so
//! that a `WordId` is stable for a given input no matter how the file was ordered.

use std::collections::HashMap;
use std::ops::Index;
use std::path::Path;

use smallvec::SmallVec;

use crate::MAX_SLOT_LENGTH;

/// An identifier for a given word, based on its index in the `WordList`'s `words` field.
pub type WordId = usize;

/// A struct representing a word that can be chosen for a given variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,

    /// The letters of `string`, indexable by cell.
    pub glyphs: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    /// Length in letters (not bytes).
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WordListError {
    #[error("could not read word list: {0}")]
    Io(#[from] std::io::Error),
}

/// The full vocabulary, normalized and addressable by `WordId`.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    pub words: Vec<Word>,
    ids_by_string: HashMap<String, WordId>,
}

fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl WordList {
    /// Build a word list from any collection of strings.
    pub fn new<I, S>(raw_words: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut strings: Vec<String> = raw_words
            .into_iter()
            .map(|raw| normalize(raw.as_ref()))
            .filter(|word| !word.is_empty())
            .collect();

        // `dedup` only removes adjacent duplicates, so sort alphabetically first.
        strings.sort();
        strings.dedup();
        strings.sort_by_cached_key(|word| word.chars().count());

        let words: Vec<Word> = strings
            .into_iter()
            .map(|string| Word { glyphs: string.chars().collect(), string })
            .collect();

        let ids_by_string = words
            .iter()
            .enumerate()
            .map(|(id, word)| (word.string.clone(), id))
            .collect();

        WordList { words, ids_by_string }
    }

    /// Parse a word list from an in-memory string, one word per line.
    pub fn parse_from_str(contents: &str) -> WordList {
        WordList::new(contents.lines())
    }

    /// Native-only convenience method: read from a file path and parse.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<WordList, WordListError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Ok(WordList::parse_from_str(&contents))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, id: WordId) -> Option<&Word> {
        self.words.get(id)
    }

    /// Look up a word by its text. The lookup is normalized the same way the list was, so
    /// `id_of("cat")` finds `CAT`.
    pub fn id_of(&self, word: &str) -> Option<WordId> {
        self.ids_by_string.get(&normalize(word)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WordId, &Word)> {
        self.words.iter().enumerate()
    }
}

impl Index<WordId> for WordList {
    type Output = Word;

    fn index(&self, id: WordId) -> &Self::Output {
        &self.words[id]
    }
}
