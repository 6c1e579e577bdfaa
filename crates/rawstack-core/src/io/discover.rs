use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::consts::{DNG_EXTENSION, RAW_EXTENSIONS, STRIPPED_SUFFIX, TEMP_DNG};
use crate::error::{Result, StackError};
use crate::frame::Frame;

/// Whether `path` has one of the supported raw extensions.
pub fn is_raw_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| RAW_EXTENSIONS.iter().any(|raw| ext.eq_ignore_ascii_case(raw)))
        .unwrap_or(false)
}

/// Find the raw frames in `dir`, sorted by file name.
///
/// Skipped:
/// - the pipeline's own temporaries (`temp.dng`, `*-temp.dng`),
/// - earlier stack outputs (`<stem>-stack<N>_<operator>.dng`),
/// - DNGs that sit beside a non-DNG raw of the same stem, since those are the
///   normalized copies written by an earlier run.
///
/// Two remaining files with the same stem (`A.cr2`, `A.nef`) are rejected with
/// [`StackError::DuplicateStem`].
pub fn discover_frames(dir: &Path) -> Result<Vec<Frame>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_raw_file(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let converted_stems: HashSet<String> = paths
        .iter()
        .filter(|p| !has_dng_extension(p))
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();

    let frames = paths
        .into_iter()
        .filter(|path| {
            if !has_dng_extension(path) {
                return true;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            !(name.eq_ignore_ascii_case(TEMP_DNG)
                || stem.ends_with(STRIPPED_SUFFIX)
                || is_stack_output(&stem)
                || converted_stems.contains(&stem))
        })
        .map(Frame::new)
        .collect::<Vec<_>>();
    check_unique_stems(&frames)?;
    Ok(frames)
}

/// Fail if two frames would normalize to the same `<stem>.dng` and `<stem>.tif`.
pub fn check_unique_stems(frames: &[Frame]) -> Result<()> {
    let mut seen: HashMap<(String, &Path), &Path> = HashMap::new();
    for frame in frames {
        let stem = frame.stem();
        if let Some(first) = seen.insert((stem.clone(), frame.directory()), frame.source()) {
            return Err(StackError::DuplicateStem {
                stem,
                first: first.to_path_buf(),
                second: frame.source().to_path_buf(),
            });
        }
    }
    Ok(())
}

fn has_dng_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(DNG_EXTENSION))
        .unwrap_or(false)
}

/// Matches `<anything>-stack<digits>_<operator>`.
fn is_stack_output(stem: &str) -> bool {
    let Some(pos) = stem.rfind("-stack") else {
        return false;
    };
    let rest = &stem[pos + "-stack".len()..];
    let Some((count, operator)) = rest.split_once('_') else {
        return false;
    };
    !count.is_empty()
        && count.chars().all(|c| c.is_ascii_digit())
        && operator.parse::<crate::stack::StackOperator>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_extensions_match_case_insensitively() {
        assert!(is_raw_file(Path::new("a.CR2")));
        assert!(is_raw_file(Path::new("a.nef")));
        assert!(is_raw_file(Path::new("a.3FR")));
        assert!(!is_raw_file(Path::new("a.jpg")));
        assert!(!is_raw_file(Path::new("a.tif")));
        assert!(!is_raw_file(Path::new("nef")));
    }

    #[test]
    fn stack_output_names_are_recognised() {
        assert!(is_stack_output("A-stack3_median"));
        assert!(is_stack_output("my-shot-stack12_mean"));
        assert!(!is_stack_output("A-stack_median"));
        assert!(!is_stack_output("A-stack3_average"));
        assert!(!is_stack_output("haystack"));
    }
}
