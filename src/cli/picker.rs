//! Interactive profile picker.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `agri --pick` and choose a saved farm" UX
//!
//! The picker searches for `*.json` files under the current working directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default directory recursion depth for finding profile files.
const DEFAULT_SEARCH_DEPTH: usize = 3;

/// Prompt the user to select a profile JSON from the current directory tree.
///
/// Behavior:
/// - list discovered `*.json` files
/// - accept either a number (from the list) or an explicit path
/// - `q` cancels
pub fn prompt_for_profile_path() -> Result<PathBuf, AppError> {
    let files = discover_profile_files();
    if files.is_empty() {
        return Err(AppError::input(
            "No .json profiles found. Save one with `agri profile --out farm.json`.",
        ));
    }

    println!("Found {} profile(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, pretty_path(path));
    }

    loop {
        print!("Select a profile by number (1-{}) or type a path (q to quit): ", files.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::input(format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::input(format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::input(
                "No input received. Provide a profile with `--profile <file.json>`.",
            ));
        }

        match parse_choice(input.trim(), &files) {
            Selection::Quit => return Err(AppError::input("Canceled.")),
            Selection::Path(path) => match validate_profile_path(&path) {
                Ok(path) => return Ok(path),
                Err(err) => println!("{err}"),
            },
            Selection::OutOfRange(n) => {
                println!("Invalid choice: {n}. Enter a number between 1 and {}.", files.len());
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum Selection {
    Quit,
    Path(PathBuf),
    OutOfRange(usize),
}

fn parse_choice(input: &str, files: &[PathBuf]) -> Selection {
    if input.eq_ignore_ascii_case("q") {
        return Selection::Quit;
    }
    if let Ok(n) = input.parse::<usize>() {
        return if (1..=files.len()).contains(&n) {
            Selection::Path(files[n - 1].clone())
        } else {
            Selection::OutOfRange(n)
        };
    }
    Selection::Path(PathBuf::from(input))
}

/// Validate the provided path points to a `.json` file.
pub fn validate_profile_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::input(format!("Profile file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::input(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if !has_json_extension(path) {
        return Err(AppError::input(format!(
            "Expected a .json profile (got: {}).",
            path.display()
        )));
    }

    Ok(path.to_path_buf())
}

/// Discover `*.json` files under the current directory (deterministic order).
pub fn discover_profile_files() -> Vec<PathBuf> {
    find_profile_files(Path::new("."), DEFAULT_SEARCH_DEPTH)
}

fn find_profile_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_profile_files_inner(root, 0, max_depth, &mut out);
    out.sort_by(|a, b| pretty_path(a).cmp(&pretty_path(b)));
    out
}

fn find_profile_files_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                find_profile_files_inner(&path, depth + 1, max_depth, out);
            }
            continue;
        }

        if file_type.is_file() && has_json_extension(&path) {
            out.push(path);
        }
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        == Some(true)
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_json_files_and_skips_target() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.JSON"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target").join("skip.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("farms")).unwrap();
        fs::write(dir.path().join("farms").join("north.json"), "{}").unwrap();

        let names: Vec<String> = find_profile_files(dir.path(), 2)
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"a.JSON".to_string()));
        assert!(names.iter().any(|n| n.ends_with("north.json")));
        assert!(!names.iter().any(|n| n.contains("skip")));
    }

    #[test]
    fn choices_resolve_numbers_paths_and_quit() {
        let files = vec![PathBuf::from("a.json"), PathBuf::from("b.json")];
        assert_eq!(parse_choice("Q", &files), Selection::Quit);
        assert_eq!(parse_choice("2", &files), Selection::Path(PathBuf::from("b.json")));
        assert_eq!(parse_choice("3", &files), Selection::OutOfRange(3));
        assert_eq!(parse_choice("x/y.json", &files), Selection::Path(PathBuf::from("x/y.json")));
    }

    #[test]
    fn validate_rejects_missing_and_non_json() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("farm.txt");
        fs::write(&txt, "").unwrap();
        assert!(validate_profile_path(&dir.path().join("missing.json")).is_err());
        assert!(validate_profile_path(&txt).is_err());
        assert!(validate_profile_path(dir.path()).is_err());
    }
}
