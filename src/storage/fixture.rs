//! Generation of demo and benchmark databases.
//!
//! Generated records use lorem ipsum text and always pass validation.
//! Randomness is drawn from v4 UUIDs; it does not need to be uniform.

use std::{
    collections::{HashSet, VecDeque},
    path::PathBuf,
};

use uuid::Uuid;

use crate::{
    domain::{
        identity::canonical_stem, Definition, DefinitionType, Record, RecordKind, Requirement,
        ValidationError, ValidationStatus,
    },
    storage::{DatabaseError, DirectoryPolicy},
};

const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in",
    "reprehenderit", "voluptate", "velit", "esse", "cillum", "eu", "fugiat", "nulla", "pariatur",
    "excepteur", "sint", "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui",
    "officia", "deserunt", "mollit", "anim", "id", "est", "laborum",
];

const FOLDER_NAME_LENGTH: usize = 8;
const FOLDER_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Longest generated title, leaving room for one more word under any
/// title bound.
const MAX_TITLE_LENGTH: usize = 60;
const MAX_DESCRIPTION_LENGTH: usize = 800;

/// Write `file_count` valid records of `kind` into the policy's folder,
/// spread over `folder_count` new, randomly nested subfolders.
pub(crate) fn generate(
    policy: &DirectoryPolicy,
    kind: RecordKind,
    file_count: usize,
    folder_count: usize,
) -> Result<Vec<PathBuf>, DatabaseError> {
    let mut entropy = Entropy::default();

    let mut folders = vec![policy.root().to_path_buf()];
    if policy.allows_subfolders() {
        for _ in 0..folder_count {
            let parent = &folders[entropy.below(folders.len())];
            let folder = parent.join(entropy.folder_name());
            std::fs::create_dir_all(&folder).map_err(|source| DatabaseError::Io {
                path: folder.clone(),
                source,
            })?;
            folders.push(folder);
        }
    } else if folder_count > 0 {
        tracing::warn!(
            "Subfolders are not allowed in {}, ignoring {folder_count} requested folders",
            policy.root().display()
        );
    }

    let mut stems = HashSet::new();
    let mut written = Vec::with_capacity(file_count);
    for _ in 0..file_count {
        let record = random_record(&mut entropy, kind, &mut stems)?;
        let folder = &folders[entropy.below(folders.len())];
        let path = record.save(folder)?;
        tracing::debug!("Generated {}", path.display());
        written.push(path);
    }

    tracing::info!(
        "Generated {} {kind} files in {} folders under {}",
        written.len(),
        folders.len(),
        policy.root().display()
    );
    Ok(written)
}

fn random_record(
    entropy: &mut Entropy,
    kind: RecordKind,
    stems: &mut HashSet<String>,
) -> Result<Record, ValidationError> {
    let title = unique_title(entropy, kind, stems);
    let description = entropy.text(kind.max_description_length().min(MAX_DESCRIPTION_LENGTH));

    let record = match kind {
        RecordKind::Requirement => Requirement::from_parts(
            title,
            description,
            entropy.sentence(),
            ValidationStatus::default(),
        )?
        .into(),
        RecordKind::Definition => Definition::from_parts(
            title,
            description,
            entropy.sentence(),
            vec![entropy.word().to_string()],
            DefinitionType::default(),
            ValidationStatus::default(),
        )?
        .into(),
    };
    Ok(record)
}

fn unique_title(entropy: &mut Entropy, kind: RecordKind, stems: &mut HashSet<String>) -> String {
    let bounds = kind.title_bounds();
    let mut extra = 0;
    loop {
        let target = bounds.min + entropy.below(MAX_TITLE_LENGTH - bounds.min) + extra;
        let title = entropy.title(target.min(bounds.max), bounds.max);
        if stems.insert(canonical_stem(&title)) {
            return title;
        }
        extra += 1;
    }
}

/// A stream of pseudo-random bytes taken from v4 UUIDs.
#[derive(Default)]
struct Entropy {
    bytes: VecDeque<u8>,
}

impl Entropy {
    fn byte(&mut self) -> u8 {
        if self.bytes.is_empty() {
            self.bytes.extend(Uuid::new_v4().into_bytes());
        }
        self.bytes.pop_front().unwrap_or_default()
    }

    /// A number in `0..n`; `n` must be non-zero.
    fn below(&mut self, n: usize) -> usize {
        let value = u32::from_le_bytes([self.byte(), self.byte(), self.byte(), self.byte()]);
        value as usize % n
    }

    fn word(&mut self) -> &'static str {
        LOREM[self.below(LOREM.len())]
    }

    /// Upper-case first letter, words separated by single spaces, at least
    /// `target` characters unless that would exceed `max`.
    fn title(&mut self, target: usize, max: usize) -> String {
        let mut title = String::new();
        while title.len() < target {
            let word = self.word();
            let separator = usize::from(!title.is_empty());
            if title.len() + separator + word.len() > max {
                break;
            }
            if separator == 1 {
                title.push(' ');
            }
            title.push_str(word);
        }
        capitalise(&title)
    }

    fn sentence(&mut self) -> String {
        let count = 4 + self.below(8);
        let words: Vec<_> = (0..count).map(|_| self.word()).collect();
        format!("{}.", capitalise(&words.join(" ")))
    }

    /// Paragraphs of sentences, at most `max` characters long.
    fn text(&mut self, max: usize) -> String {
        let paragraphs = 1 + self.below(3);
        let mut text = String::new();
        'outer: for p in 0..paragraphs {
            if p > 0 {
                text.push_str("\n\n");
            }
            for s in 0..2 + self.below(4) {
                let sentence = self.sentence();
                if text.len() + sentence.len() + 1 > max {
                    break 'outer;
                }
                if s > 0 {
                    text.push(' ');
                }
                text.push_str(&sentence);
            }
        }
        text.trim_end().to_string()
    }

    fn folder_name(&mut self) -> String {
        (0..FOLDER_NAME_LENGTH)
            .map(|_| char::from(FOLDER_ALPHABET[self.below(FOLDER_ALPHABET.len())]))
            .collect()
    }
}

fn capitalise(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::domain::validators;

    #[test]
    fn titles_are_valid_for_every_kind() {
        let mut entropy = Entropy::default();
        for kind in [RecordKind::Requirement, RecordKind::Definition] {
            let mut stems = HashSet::new();
            for _ in 0..200 {
                let title = unique_title(&mut entropy, kind, &mut stems);
                validators::title("title", &title, kind.title_bounds()).unwrap();
            }
            assert_eq!(stems.len(), 200);
        }
    }

    #[test]
    fn text_respects_the_bound() {
        let mut entropy = Entropy::default();
        for _ in 0..50 {
            let text = entropy.text(300);
            assert!(!text.is_empty());
            assert!(text.chars().count() <= 300);
        }
    }

    #[test]
    fn folder_names_are_lowercase_alphanumeric() {
        let name = Entropy::default().folder_name();
        assert_eq!(name.len(), FOLDER_NAME_LENGTH);
        assert!(name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn subfolders_are_skipped_when_forbidden() {
        let tmp = TempDir::new().unwrap();
        let policy = DirectoryPolicy::new(tmp.path(), false, false).unwrap();

        let written = generate(&policy, RecordKind::Requirement, 10, 3).unwrap();

        assert_eq!(written.len(), 10);
        assert!(policy.list_subdirectories().is_empty());
        assert!(written.iter().all(|p| p.parent() == Some(tmp.path())));
    }
}
