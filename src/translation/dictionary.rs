//! Phrase dictionary used when the translation model is unavailable.

use std::path::Path;

/// Direction of substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Source phrases are replaced by their targets.
    Forward,
    /// Target phrases are replaced by their sources.
    Reverse,
}

const BUILTIN: [(&str, &str); 15] = [
    ("今天", "Today"),
    ("天气", "weather"),
    ("真", "really"),
    ("好", "good"),
    ("昨天", "Yesterday"),
    ("不错", "nice"),
    ("谢谢", "Thank you"),
    ("你好", "Hello"),
    ("电脑", "computer"),
    ("图片", "image"),
    ("识别", "recognize"),
    ("翻译", "translate"),
    ("钉图", "Pinned Image"),
    ("OCR", "OCR"),
    ("Snipaste", "Snipaste"),
];

/// Ordered (source, target) table.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: Vec<(String, String)>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Dictionary {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|(s, t)| (s.to_string(), t.to_string()))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Append `source<TAB>target` lines. Blank lines and `#` comments are skipped.
    /// Returns the number of entries added.
    pub fn extend_from_tsv(&mut self, content: &str) -> usize {
        let before = self.entries.len();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((source, target)) = line.split_once('\t') {
                let (source, target) = (source.trim(), target.trim());
                if !source.is_empty() && !target.is_empty() {
                    self.entries.push((source.to_string(), target.to_string()));
                }
            }
        }
        self.entries.len() - before
    }

    pub fn extend_from_file(&mut self, path: &Path) -> std::io::Result<usize> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.extend_from_tsv(&content))
    }

    /// Replace every dictionary phrase found in `text`.
    ///
    /// Scans left to right; at each position the longest matching phrase wins and
    /// earlier entries break ties. Replaced output is never rescanned.
    pub fn substitute(&self, text: &str, direction: Direction) -> String {
        let pairs: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(s, t)| match direction {
                Direction::Forward => (s.as_str(), t.as_str()),
                Direction::Reverse => (t.as_str(), s.as_str()),
            })
            .filter(|(from, _)| !from.is_empty())
            .collect();

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(c) = rest.chars().next() {
            let hit = pairs
                .iter()
                .filter(|(from, _)| rest.starts_with(from))
                .fold(None::<&(&str, &str)>, |best, pair| match best {
                    Some(b) if b.0.len() >= pair.0.len() => Some(b),
                    _ => Some(pair),
                });

            match hit {
                Some((from, to)) => {
                    out.push_str(to);
                    rest = &rest[from.len()..];
                }
                None => {
                    out.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_phrase_beats_contained_character() {
        let d = Dictionary::builtin();
        assert_eq!(d.substitute("你好", Direction::Forward), "Hello");
    }

    #[test]
    fn reverse_uses_the_same_table() {
        let d = Dictionary::builtin();
        assert_eq!(d.substitute("Today good", Direction::Reverse), "今天 好");
    }

    #[test]
    fn unknown_text_passes_through() {
        let d = Dictionary::builtin();
        assert_eq!(d.substitute("今天下雨", Direction::Forward), "Today下雨");
        assert_eq!(d.substitute("", Direction::Forward), "");
    }

    #[test]
    fn tsv_entries_are_appended() {
        let mut d = Dictionary::builtin();
        let added = d.extend_from_tsv("# comment\n下雨\train\n\nbroken line\n");
        assert_eq!(added, 1);
        assert_eq!(d.substitute("今天下雨", Direction::Forward), "Todayrain");
    }
}
