//! `key=value` metadata file parser (`gameinfo.ini`, `seqinfo.ini`).

use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Parsed `key=value` metadata file.
///
/// The first line is a section header and is skipped:
/// ```ini
/// [Sequence]
/// name=SNMOT-060
/// imDir=img1
/// frameRate=25
/// seqLength=750
/// imWidth=1920
/// imHeight=1080
/// imExt=.jpg
/// ```
///
/// Values are kept as raw strings; typed accessors fall back to defaults for
/// absent keys but fail on values that do not parse.
#[derive(Debug, Clone)]
pub struct InformationFile {
    path: String,
    entries: HashMap<String, String>,
}

impl InformationFile {
    /// Read and parse the file at `file_path`.
    pub fn new<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file_path = file_path.as_ref();
        if !file_path.is_file() {
            return Err(Error::MissingFile(file_path.to_path_buf()));
        }
        let text = std::fs::read_to_string(file_path)?;
        Self::parse(file_path.to_string_lossy(), &text)
    }

    /// Parse metadata text. `path` only labels error messages.
    ///
    /// Each non-blank line after the header is split on its first `=`; key and
    /// value are trimmed. A later duplicate key overrides an earlier one.
    pub fn parse(path: impl Into<String>, text: &str) -> Result<Self> {
        let path = path.into();
        let mut entries = HashMap::new();

        for (line_no, line) in text.lines().enumerate().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| Error::MalformedConfig {
                path: path.clone(),
                message: format!("line {} has no '=' separator: '{}'", line_no + 1, line),
            })?;
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Search for a variable, failing if it is absent.
    pub fn search(&self, variable_name: &str) -> Result<&str> {
        self.entries
            .get(variable_name)
            .map(String::as_str)
            .ok_or_else(|| Error::MalformedConfig {
                path: self.path.clone(),
                message: format!("couldn't find '{}'", variable_name),
            })
    }

    /// Raw value of a variable, if present.
    pub fn get(&self, variable_name: &str) -> Option<&str> {
        self.entries.get(variable_name).map(String::as_str)
    }

    /// String value, or an empty string when absent.
    pub fn string_or_default(&self, variable_name: &str) -> String {
        self.get(variable_name).unwrap_or_default().to_string()
    }

    /// Numeric value, or `T::default()` (zero) when absent.
    pub fn number_or_default<T>(&self, variable_name: &str) -> Result<T>
    where
        T: FromStr + Default,
        T::Err: std::fmt::Display,
    {
        match self.get(variable_name) {
            None => Ok(T::default()),
            Some(value) => value.parse().map_err(|e: T::Err| Error::MalformedConfig {
                path: self.path.clone(),
                message: format!("value for '{}' is not a number: '{}' ({})", variable_name, value, e),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
