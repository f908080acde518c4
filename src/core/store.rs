// Whole-document save/load of JSON mappings; saves replace the target atomically.
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::format::{Durability, SaveOptions, encode_document};
use crate::json::parse;

/// String-keyed JSON object; iteration follows insertion order.
pub type Mapping = Map<String, Value>;

const TEMP_PREFIX: &str = ".jsonmap-";
const TEMP_SUFFIX: &str = ".tmp";

pub fn save(mapping: &Mapping, path: impl AsRef<Path>) -> Result<(), Error> {
    save_with(mapping, path, &SaveOptions::default())
}

/// Encodes `mapping` in memory, then swaps it into place via a sibling temp file.
///
/// An encoding failure never touches `path`. An I/O failure before the final
/// rename leaves any previous file at `path` intact.
pub fn save_with(
    mapping: &Mapping,
    path: impl AsRef<Path>,
    options: &SaveOptions,
) -> Result<(), Error> {
    let path = path.as_ref();
    let bytes = encode_document(mapping, options).map_err(|err| err.with_path(path))?;
    write_atomic(path, &bytes, options.durability)?;
    debug!(
        path = %path.display(),
        keys = mapping.len(),
        bytes = bytes.len(),
        "saved mapping"
    );
    Ok(())
}

pub fn save_serializable<T: Serialize + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
) -> Result<(), Error> {
    save_serializable_with(value, path, &SaveOptions::default())
}

/// Saves any `Serialize` value whose JSON form is an object.
pub fn save_serializable_with<T: Serialize + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
    options: &SaveOptions,
) -> Result<(), Error> {
    let path = path.as_ref();
    let value = serde_json::to_value(value).map_err(|err| {
        Error::new(ErrorKind::Serialization)
            .with_message("value cannot be represented as JSON")
            .with_path(path)
            .with_source(err)
    })?;
    match value {
        Value::Object(mapping) => save_with(&mapping, path, options),
        other => Err(Error::new(ErrorKind::Serialization)
            .with_message(format!(
                "top-level value must be a JSON object, found {}",
                parse::value_kind(&other)
            ))
            .with_path(path)),
    }
}

pub fn load(path: impl AsRef<Path>) -> Result<Mapping, Error> {
    let path = path.as_ref();
    let bytes = read_file(path)?;
    let text = decode_utf8(&bytes, "load").map_err(|err| err.with_path(path))?;
    let mapping = decode_mapping(text, "load").map_err(|err| err.with_path(path))?;
    debug!(
        path = %path.display(),
        keys = mapping.len(),
        bytes = bytes.len(),
        "loaded mapping"
    );
    Ok(mapping)
}

/// Loads the document at `path` straight into `T`.
pub fn load_as<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, Error> {
    let path = path.as_ref();
    let bytes = read_file(path)?;
    let text = decode_utf8(&bytes, "load_as").map_err(|err| err.with_path(path))?;
    let value = parse::from_str(text).map_err(|err| parse_error(err, "load_as").with_path(path))?;
    debug!(path = %path.display(), bytes = bytes.len(), "loaded typed document");
    Ok(value)
}

/// Parses in-memory JSON text with the same rules `load` applies to files.
pub fn parse_mapping(text: &str) -> Result<Mapping, Error> {
    decode_mapping(text, "parse")
}

fn read_file(path: &Path) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|err| Error::from_io(err, path).with_message("failed to read file"))
}

fn decode_utf8<'a>(bytes: &'a [u8], context: &str) -> Result<&'a str, Error> {
    std::str::from_utf8(bytes).map_err(|err| {
        let category = parse::categorize_message(&err.to_string());
        Error::new(ErrorKind::Parse)
            .with_message("document is not valid UTF-8")
            .with_hint(parse::hint_for_category(category, context))
            .with_source(err)
    })
}

fn decode_mapping(text: &str, context: &str) -> Result<Mapping, Error> {
    let value: Value = parse::from_str(text).map_err(|err| parse_error(err, context))?;
    match value {
        Value::Object(mapping) => Ok(mapping),
        other => {
            let message = format!(
                "top-level value must be a JSON object, found {}",
                parse::value_kind(&other)
            );
            let category = parse::categorize_message(&message);
            Err(Error::new(ErrorKind::Parse)
                .with_hint(parse::hint_for_category(category, context))
                .with_message(message))
        }
    }
}

fn parse_error(err: serde_json::Error, context: &str) -> Error {
    let category = parse::categorize_error(&err);
    let mut out = Error::new(ErrorKind::Parse)
        .with_message(format!("invalid JSON ({})", category.label()))
        .with_hint(parse::hint_for_error(&err, context));
    if err.line() > 0 {
        out = out.with_position(err.line(), err.column());
    }
    out.with_source(err)
}

fn write_atomic(path: &Path, bytes: &[u8], durability: Durability) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = create_temp(path, dir).map_err(|err| {
        Error::from_io(err, path).with_message("failed to create temporary file")
    })?;
    temp.write_all(bytes)
        .and_then(|()| temp.flush())
        .map_err(|err| Error::from_io(err, path).with_message("failed to write file"))?;
    if durability == Durability::Flush {
        temp.as_file()
            .sync_all()
            .map_err(|err| Error::from_io(err, path).with_message("failed to sync file"))?;
    }

    // Dropping `temp` on any error above removes the temporary file.
    temp.persist(path).map_err(|err| {
        Error::from_io(err.error, path).with_message("failed to replace file")
    })?;
    Ok(())
}

fn create_temp(path: &Path, dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(TEMP_PREFIX).suffix(TEMP_SUFFIX);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Keep the mode of the file being replaced; new files get 0666 minus umask.
        let permissions = fs::metadata(path)
            .map(|meta| meta.permissions())
            .unwrap_or_else(|_| fs::Permissions::from_mode(0o666));
        builder.permissions(permissions);
    }
    #[cfg(not(unix))]
    let _ = path;
    builder.tempfile_in(dir)
}
