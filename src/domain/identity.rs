//! Derivation of a record's canonical file name from its title.

use std::path::{Path, PathBuf};

/// Extension used when writing record files.
pub const DEFAULT_EXTENSION: &str = "yml";

/// Extensions accepted when reading record files (compared
/// case-insensitively).
pub const ACCEPTED_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// The file stem a record with the given title must be stored under.
///
/// Every space is replaced with an underscore. Nothing else changes: titles
/// are already free of punctuation and accents.
#[must_use]
pub fn canonical_stem(title: &str) -> String {
    title.replace(' ', "_")
}

/// Whether the stem of `candidate` equals the canonical stem of `title`.
///
/// The comparison is case-sensitive and ignores the extension.
#[must_use]
pub fn is_conformant_name(title: &str, candidate: &Path) -> bool {
    candidate
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem == canonical_stem(title))
}

/// The path a record with the given title must be stored at inside
/// `directory`.
#[must_use]
pub fn conformant_file_path(title: &str, directory: &Path) -> PathBuf {
    directory.join(format!("{}.{DEFAULT_EXTENSION}", canonical_stem(title)))
}

/// Whether `path` has one of the `extensions`, ignoring case.
#[must_use]
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("Valid Title", "Valid_Title"; "single space")]
    #[test_case("A  Double  Space", "A__Double__Space"; "double spaces")]
    #[test_case("NoSpaces", "NoSpaces"; "unchanged")]
    fn stem_replaces_spaces(title: &str, expected: &str) {
        assert_eq!(canonical_stem(title), expected);
    }

    #[test]
    fn conformant_path_is_always_conformant() {
        for title in ["Valid Title", "API", "Some Longer Title 42"] {
            let path = conformant_file_path(title, Path::new("/db/sub"));
            assert!(is_conformant_name(title, &path));
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("yml"));
        }
    }

    #[test]
    fn name_comparison_is_case_sensitive() {
        assert!(!is_conformant_name("Valid Title", Path::new("valid_title.yml")));
        assert!(is_conformant_name("Valid Title", Path::new("Valid_Title.yaml")));
    }

    #[test]
    fn stale_name_is_not_conformant() {
        assert!(!is_conformant_name("Valid Title", Path::new("wrong_name.yml")));
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(has_extension(Path::new("a.YML"), ACCEPTED_EXTENSIONS));
        assert!(has_extension(Path::new("a.yaml"), ACCEPTED_EXTENSIONS));
        assert!(!has_extension(Path::new("a.md"), ACCEPTED_EXTENSIONS));
        assert!(!has_extension(Path::new("yml"), ACCEPTED_EXTENSIONS));
    }
}
