//! File selections handed to the menu builder and the runner

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::paths::split_file_name;

/// One selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// Display name reported in progress messages
    pub name: String,
    /// Lowercased extension, if the file has one
    pub extension: Option<String>,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let extension = file_extension(&path);
        Self {
            path,
            name,
            extension,
        }
    }
}

/// Lowercased extension of `path`, or `None` when it has none.
///
/// A hidden file such as `.wav` counts as a `wav` file.
pub fn file_extension(path: &Path) -> Option<String> {
    let (_, extension) = split_file_name(path);
    let extension = extension?;
    extension
        .to_str()
        .filter(|e| !e.is_empty())
        .map(str::to_lowercase)
}

/// Ordered list of files chosen by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    files: Vec<SelectedFile>,
}

impl Selection {
    pub fn new(files: Vec<SelectedFile>) -> Self {
        Self { files }
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: paths.into_iter().map(SelectedFile::new).collect(),
        }
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Distinct extensions of the files that have one.
    pub fn extensions(&self) -> BTreeSet<String> {
        self.files
            .iter()
            .filter_map(|f| f.extension.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        let file = SelectedFile::new("/tmp/Take.WAV");
        assert_eq!(file.extension.as_deref(), Some("wav"));
        assert_eq!(file.name, "Take.WAV");
    }

    #[test]
    fn missing_extension_is_none() {
        assert_eq!(SelectedFile::new("/tmp/README").extension, None);
        assert_eq!(SelectedFile::new("/tmp/take.").extension, None);
    }

    #[test]
    fn hidden_file_uses_its_name_as_extension() {
        assert_eq!(SelectedFile::new("/tmp/.wav").extension.as_deref(), Some("wav"));
        assert_eq!(SelectedFile::new("/tmp/.Hidden").extension.as_deref(), Some("hidden"));
    }

    #[test]
    fn extensions_are_distinct() {
        let sel = Selection::from_paths(["a.wav", "b.WAV", "c.pcm"]);
        let exts: Vec<String> = sel.extensions().into_iter().collect();
        assert_eq!(exts, ["pcm", "wav"]);
    }
}
