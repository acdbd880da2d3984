use reqwest::Url;
use std::path::PathBuf;

/// Interpret a bracketed paste as files dropped onto the terminal
///
/// Terminals deliver a drop as the absolute paths (or `file://` URIs) of the
/// dropped files. Returns `None`, meaning the paste is ordinary text, unless
/// every entry is one of those and names an existing regular file.
pub fn parse_dropped_paths(pasted: &str) -> Option<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for line in pasted.lines().map(str::trim).filter(|l| !l.is_empty()) {
        // a single unquoted path containing spaces
        if let Some(path) = resolve(line) {
            paths.push(path);
            continue;
        }
        for word in split_words(line) {
            paths.push(resolve(&word)?);
        }
    }

    if paths.is_empty() {
        None
    } else {
        Some(paths)
    }
}

fn resolve(candidate: &str) -> Option<PathBuf> {
    let path = if candidate.starts_with("file://") {
        Url::parse(candidate).ok()?.to_file_path().ok()?
    } else {
        PathBuf::from(candidate)
    };
    // Relative names are words someone typed, not drops
    (path.is_absolute() && path.is_file()).then_some(path)
}

/// Shell-style word splitting: quotes group, backslash escapes one character
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fixture(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn test_split_words() {
        assert_eq!(
            split_words(r#"a 'b c' "d e" f\ g"#),
            vec!["a", "b c", "d e", "f g"]
        );
        assert_eq!(split_words("''"), vec![""]);
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn test_plain_text_is_not_a_drop() {
        assert_eq!(parse_dropped_paths("hello world"), None);
        assert_eq!(parse_dropped_paths(""), None);
        assert_eq!(parse_dropped_paths("fn main() {}\n"), None);
    }

    #[test]
    fn test_single_path_with_spaces() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir, "my notes.txt");
        let pasted = path.display().to_string();
        assert_eq!(parse_dropped_paths(&pasted), Some(vec![path]));
    }

    #[test]
    fn test_escaped_and_quoted_paths() {
        let dir = TempDir::new().unwrap();
        let a = fixture(&dir, "a b.png");
        let c = fixture(&dir, "c.txt");
        let pasted = format!(
            "{} '{}'",
            a.display().to_string().replace(' ', "\\ "),
            c.display()
        );
        assert_eq!(parse_dropped_paths(&pasted), Some(vec![a, c]));
    }

    #[test]
    fn test_one_path_per_line() {
        let dir = TempDir::new().unwrap();
        let a = fixture(&dir, "one.txt");
        let b = fixture(&dir, "two.txt");
        let pasted = format!("{}\n{}\n", a.display(), b.display());
        assert_eq!(parse_dropped_paths(&pasted), Some(vec![a, b]));
    }

    #[test]
    fn test_file_uri() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir, "space name.md");
        let uri = Url::from_file_path(&path).unwrap();
        assert_eq!(parse_dropped_paths(uri.as_str()), Some(vec![path]));
    }

    #[test]
    fn test_any_missing_entry_makes_it_text() {
        let dir = TempDir::new().unwrap();
        let a = fixture(&dir, "real.txt");
        let pasted = format!("{} {}", a.display(), dir.path().join("ghost.txt").display());
        assert_eq!(parse_dropped_paths(&pasted), None);

        // directories cannot be uploaded
        assert_eq!(parse_dropped_paths(&dir.path().display().to_string()), None);
    }

    #[test]
    fn test_relative_names_are_text() {
        // both exist relative to the working directory of the test run
        assert!(std::path::Path::new("Cargo.toml").is_file());
        assert_eq!(parse_dropped_paths("Cargo.toml"), None);
        assert_eq!(parse_dropped_paths("./Cargo.toml"), None);
        assert_eq!(parse_dropped_paths("Cargo.toml src/main.rs"), None);

        let dir = TempDir::new().unwrap();
        let a = fixture(&dir, "abs.txt");
        let pasted = format!("{} Cargo.toml", a.display());
        assert_eq!(parse_dropped_paths(&pasted), None);
    }
}
