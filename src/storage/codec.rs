//! Reading and writing record files.
//!
//! Record files are YAML documents with one field per top-level key. Reading
//! accepts every extension in [`ACCEPTED_EXTENSIONS`]; writing only ever
//! produces [`DEFAULT_EXTENSION`].

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde_yaml::{Mapping, Value};

use crate::{
    domain::{
        identity::{has_extension, ACCEPTED_EXTENSIONS, DEFAULT_EXTENSION},
        ValidationError,
    },
    storage::NotFoundError,
};

/// Decode a record file into a mapping.
///
/// # Errors
///
/// - [`CodecError::NotFound`] if `path` is not an existing file
/// - [`CodecError::Extension`] if the extension is not accepted
/// - [`CodecError::Parse`] if the content is not UTF-8 or not a YAML mapping
/// - [`CodecError::Io`] if the file cannot be read
pub fn decode(path: &Path) -> Result<Mapping, CodecError> {
    if !path.is_file() {
        return Err(NotFoundError::file(path).into());
    }
    if !has_extension(path, ACCEPTED_EXTENSIONS) {
        return Err(CodecError::Extension {
            path: path.to_path_buf(),
            allowed: ACCEPTED_EXTENSIONS,
        });
    }

    let bytes = std::fs::read(path).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |message: String| CodecError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let content = String::from_utf8(bytes).map_err(|e| parse_error(e.to_string()))?;

    match serde_yaml::from_str::<Value>(&content).map_err(|e| parse_error(e.to_string()))? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Err(parse_error("the file is empty".to_string())),
        _ => Err(parse_error(
            "expected a mapping of field names to values".to_string(),
        )),
    }
}

/// Encode a mapping into a record file, returning the path written.
///
/// Strings containing a newline are written in literal block style. The
/// parent directory must already exist.
///
/// # Errors
///
/// - [`CodecError::Extension`] if the extension is not exactly
///   [`DEFAULT_EXTENSION`]
/// - [`CodecError::Serialize`] if the mapping cannot be written as YAML
/// - [`CodecError::Io`] if the file cannot be written
pub fn encode(mapping: &Mapping, path: &Path) -> Result<PathBuf, CodecError> {
    if path.extension().and_then(|e| e.to_str()) != Some(DEFAULT_EXTENSION) {
        return Err(CodecError::Extension {
            path: path.to_path_buf(),
            allowed: &[DEFAULT_EXTENSION],
        });
    }

    let content = serde_yaml::to_string(mapping).map_err(|source| CodecError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let io_error = |source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(io_error)?;

    tracing::debug!("Wrote {}", path.display());
    Ok(path.to_path_buf())
}

/// Errors that can occur when decoding or encoding a record file.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The file does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The file extension is not permitted for this operation.
    #[error("the file '{}' does not have an allowed extension (i.e. {})", path.display(), allowed.join(", "))]
    Extension {
        /// The offending path.
        path: PathBuf,
        /// The permitted extensions.
        allowed: &'static [&'static str],
    },

    /// The file content is not a valid record document.
    #[error("impossible to parse the YAML file '{}': {message}", path.display())]
    Parse {
        /// The offending path.
        path: PathBuf,
        /// The underlying parse failure.
        message: String,
    },

    /// The mapping could not be serialized.
    #[error("failed to serialize '{}': {source}", path.display())]
    Serialize {
        /// The file that was being written.
        path: PathBuf,
        /// The underlying serializer error.
        source: serde_yaml::Error,
    },

    /// The file could not be read or written.
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

/// Errors that can occur when loading a record from a file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The file was decoded but does not describe a valid record.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
