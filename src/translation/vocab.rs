//! Newline-delimited vocabulary tables.

use std::collections::HashMap;
use std::path::Path;

use crate::constants::{BOS_ID, EOS_ID, SUBWORD_MARKER, UNK_ID};
use crate::error::TranslationError;

/// Token list where the line number is the token id.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    tokens: Vec<String>,
    ids: HashMap<String, i64>,
}

impl Vocabulary {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .collect();
        let mut ids = HashMap::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            // First occurrence wins for duplicated lines.
            ids.entry(token.clone()).or_insert(i as i64);
        }
        Self { tokens, ids }
    }

    pub fn load(path: &Path) -> Result<Self, TranslationError> {
        let content = std::fs::read_to_string(path).map_err(|source| TranslationError::Vocabulary {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_lines(content.lines()))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn id_of(&self, token: &str) -> i64 {
        self.ids.get(token).copied().unwrap_or(UNK_ID)
    }

    pub fn token_of(&self, id: i64) -> Option<&str> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.tokens.get(i))
            .map(String::as_str)
    }

    /// `[BOS, ids..., EOS]`
    pub fn encode(&self, tokens: &[String]) -> Vec<i64> {
        let mut ids = Vec::with_capacity(tokens.len() + 2);
        ids.push(BOS_ID);
        ids.extend(tokens.iter().map(|t| self.id_of(t)));
        ids.push(EOS_ID);
        ids
    }

    /// Decode model output up to the first EOS. Reserved and out-of-range ids are
    /// dropped; sub-word markers become spaces and whitespace is collapsed.
    pub fn decode(&self, ids: &[i64]) -> String {
        let joined = ids
            .iter()
            .take_while(|&&id| id != EOS_ID)
            .filter(|&&id| id > EOS_ID)
            .filter_map(|&id| self.token_of(id))
            .collect::<Vec<_>>()
            .join(" ")
            .replace(SUBWORD_MARKER, " ");

        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::from_lines([
            "<pad>",
            "<unk>",
            "<s>",
            "</s>",
            "今",
            "天",
            "\u{2581}Today",
            "\u{2581}go",
            "od",
        ])
    }

    #[test]
    fn unknown_tokens_map_to_unk() {
        let v = vocab();
        let ids = v.encode(&["今".to_string(), "雨".to_string()]);
        assert_eq!(ids, vec![BOS_ID, 4, UNK_ID, EOS_ID]);
    }

    #[test]
    fn decode_stops_at_eos_and_normalizes_markers() {
        let v = vocab();
        assert_eq!(v.decode(&[BOS_ID, 6, 7, 8, EOS_ID, 4]), "Today go od");
        assert_eq!(v.decode(&[6, 999, -1, 7]), "Today go");
        assert_eq!(v.decode(&[EOS_ID, 6]), "");
    }

    #[test]
    fn lines_are_trimmed() {
        let v = Vocabulary::from_lines(["a ", " b"]);
        assert_eq!(v.id_of("b"), 1);
        assert_eq!(v.len(), 2);
    }
}
