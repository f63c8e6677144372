//! Output path derivation
//!
//! Outputs live next to their inputs. The file stem carries the preset
//! suffix (`song.wav` -> `song_r16000_c1_i16.wav`), a suffix left by an
//! earlier conversion is replaced rather than stacked, and an existing file
//! is never overwritten: a `_1`, `_2`, ... disambiguator is inserted instead.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Compute the output path for `input` with `suffix` and `new_extension`.
///
/// When `suffix` is non-empty, every previously applied preset suffix
/// (`_r<4-5 digits>_c<digit>_i<1-2 digits>`) is removed from the stem first.
/// Stems that are not valid UTF-8 are kept byte for byte and never stripped.
/// The parent directory is kept as-is.
pub fn derive_output_path(input: &Path, suffix: &str, new_extension: &str) -> PathBuf {
    let (stem, _) = split_file_name(input);

    let mut file_name = match stem.to_str() {
        Some(text) if !suffix.is_empty() => OsString::from(strip_preset_suffixes(text)),
        _ => stem,
    };
    file_name.push(suffix);
    file_name.push(".");
    file_name.push(new_extension);

    match input.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Return `candidate` if nothing exists there, otherwise the first free
/// `<stem>_<n>.<ext>` for n = 1, 2, ...
///
/// Existence is checked, not reserved: a file created between this call and
/// the conversion is not detected.
pub fn find_available_path(candidate: &Path) -> PathBuf {
    if !candidate.exists() {
        return candidate.to_path_buf();
    }

    let (stem, extension) = split_file_name(candidate);

    (1u64..)
        .map(|n| {
            let mut name = stem.clone();
            name.push(format!("_{n}"));
            if let Some(ext) = &extension {
                name.push(".");
                name.push(ext);
            }
            candidate.with_file_name(name)
        })
        .find(|path| !path.exists())
        .unwrap_or_else(|| candidate.to_path_buf())
}

/// Split a file name at its last dot.
///
/// Unlike [`Path::file_stem`], a leading dot counts: `.wav` has an empty
/// stem and the extension `wav`.
pub(crate) fn split_file_name(path: &Path) -> (OsString, Option<OsString>) {
    let Some(name) = path.file_name() else {
        return (OsString::new(), None);
    };

    match name.to_str() {
        Some(text) => match text.rsplit_once('.') {
            Some((stem, ext)) => (stem.into(), Some(ext.into())),
            None => (text.into(), None),
        },
        None => (
            path.file_stem().unwrap_or(name).to_os_string(),
            path.extension().map(OsStr::to_os_string),
        ),
    }
}

/// Remove every `_r<4-5 digits>_c<digit>_<i|u><1-2 digits>` run from `stem`.
///
/// Matches are found left to right without overlap, like a global regex
/// substitution.
pub fn strip_preset_suffixes(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let mut out = String::with_capacity(stem.len());
    let mut copied = 0;
    let mut index = 0;

    while index < bytes.len() {
        match match_preset_suffix(&bytes[index..]) {
            Some(len) => {
                out.push_str(&stem[copied..index]);
                index += len;
                copied = index;
            }
            None => index += 1,
        }
    }

    out.push_str(&stem[copied..]);
    out
}

/// Length of the preset suffix starting at `bytes[0]`, if any.
fn match_preset_suffix(bytes: &[u8]) -> Option<usize> {
    let mut pos = 0;

    eat(bytes, &mut pos, b"_r")?;
    let rate = digits(bytes, &mut pos, 5);
    if !(4..=5).contains(&rate) {
        return None;
    }

    eat(bytes, &mut pos, b"_c")?;
    if digits(bytes, &mut pos, 1) != 1 {
        return None;
    }

    eat(bytes, &mut pos, b"_")?;
    // encoding marker: i, u, or a stray ','
    match bytes.get(pos) {
        Some(b'i' | b'u' | b',') => pos += 1,
        _ => return None,
    }
    if digits(bytes, &mut pos, 2) == 0 {
        return None;
    }

    Some(pos)
}

fn eat(bytes: &[u8], pos: &mut usize, literal: &[u8]) -> Option<()> {
    if bytes[*pos..].starts_with(literal) {
        *pos += literal.len();
        Some(())
    } else {
        None
    }
}

/// Consume up to `max` ASCII digits, returning how many were consumed.
fn digits(bytes: &[u8], pos: &mut usize, max: usize) -> usize {
    let count = bytes[*pos..]
        .iter()
        .take(max)
        .take_while(|b| b.is_ascii_digit())
        .count();
    *pos += count;
    count
}
