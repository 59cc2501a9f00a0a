use std::path::{Path, PathBuf};

use xshell::Shell;

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap().to_path_buf()
}

fn rust_files(sh: &Shell, dir: &Path, acc: &mut Vec<PathBuf>) {
    for path in sh.read_dir(dir).unwrap() {
        if path.is_dir() {
            rust_files(sh, &path, acc);
        } else if path.extension().map_or(false, |it| it == "rs") {
            acc.push(path);
        }
    }
}

fn sources(sh: &Shell) -> Vec<(PathBuf, String)> {
    let root = project_root();
    let mut files = Vec::new();
    for dir in ["src", "tests"] {
        rust_files(sh, &root.join(dir), &mut files);
    }
    assert!(!files.is_empty());
    files
        .into_iter()
        .map(|path| {
            let text = sh.read_file(&path).unwrap();
            (path, text)
        })
        .collect()
}

#[test]
fn no_trailing_whitespace() {
    let sh = Shell::new().unwrap();
    let mut bad = Vec::new();
    for (path, text) in sources(&sh) {
        for (i, line) in text.lines().enumerate() {
            if line.ends_with(' ') || line.contains('\t') {
                bad.push(format!("{}:{}", path.display(), i + 1));
            }
        }
    }
    assert!(bad.is_empty(), "trailing whitespace or tabs:\n{}", bad.join("\n"));
}

#[test]
fn no_debug_leftovers() {
    let sh = Shell::new().unwrap();
    let needles = [concat!("dbg", "!("), concat!("todo", "!("), concat!("print", "ln!(")];
    let mut bad = Vec::new();
    for (path, text) in sources(&sh) {
        for (i, line) in text.lines().enumerate() {
            if needles.iter().any(|it| line.contains(it)) {
                bad.push(format!("{}:{}", path.display(), i + 1));
            }
        }
    }
    assert!(bad.is_empty(), "debugging leftovers:\n{}", bad.join("\n"));
}

#[test]
fn library_code_does_not_panic_on_input() {
    let sh = Shell::new().unwrap();
    let root = project_root().join("src");
    let mut bad = Vec::new();
    for (path, text) in sources(&sh) {
        if !path.starts_with(&root) {
            continue;
        }
        // Unit tests live at the bottom of each module.
        let code = text.split("#[cfg(test)]").next().unwrap_or_default();
        for (i, line) in code.lines().enumerate() {
            if line.contains(".unwrap()") || line.contains(".expect(") {
                bad.push(format!("{}:{}", path.display(), i + 1));
            }
        }
    }
    assert!(bad.is_empty(), "unwrap in library code:\n{}", bad.join("\n"));
}
