//! Alphabetic call signs stored as letter offsets

use serde::{Deserialize, Serialize};

const ALPHABET_LEN: u8 = 26;

/// Call sign such as "KSC" kept as `[10, 18, 2]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationIdentity {
    letters: Option<Vec<u8>>,
    text: String,
}

impl StationIdentity {
    /// Identity with `len` characters, all 'A'
    pub fn with_len(len: usize) -> Self {
        Self::from_letters(vec![0; len])
    }

    /// Values outside 0..=25 are folded back into range
    pub fn from_letters(letters: Vec<u8>) -> Self {
        let letters = letters.into_iter().map(|v| v % ALPHABET_LEN).collect();
        let mut identity = Self {
            letters: Some(letters),
            text: String::new(),
        };
        identity.build();
        identity
    }

    /// Parse a call sign; non-letters are skipped, case is ignored
    pub fn parse(call_sign: &str) -> Self {
        Self::from_letters(
            call_sign
                .chars()
                .filter(|c| c.is_ascii_alphabetic())
                .map(|c| c.to_ascii_uppercase() as u8 - b'A')
                .collect(),
        )
    }

    /// Rebuild and return the text form
    pub fn build(&mut self) -> &str {
        self.text = self
            .letters
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|v| char::from(b'A' + v))
            .collect();
        &self.text
    }

    pub fn increment(&mut self, index: usize) {
        self.step(index, 1);
    }

    pub fn decrement(&mut self, index: usize) {
        self.step(index, ALPHABET_LEN - 1);
    }

    fn step(&mut self, index: usize, delta: u8) {
        let Some(slot) = self.letters.as_mut().and_then(|l| l.get_mut(index)) else {
            return;
        };
        *slot = (*slot + delta) % ALPHABET_LEN;
        self.build();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn letters(&self) -> &[u8] {
        self.letters.as_deref().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.letters().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for StationIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
