use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use vascal_core::lang::{builtins, keywords};
use vascal_syntax::lexer;
use vascal_syntax::token::TokenKind;

/// The lexer must recognize every registered keyword, in any case, as something other than an identifier.
#[test]
fn lexer_uses_keyword_registry() {
    for kw in keywords::KEYWORDS {
        for spelling in [kw.canonical.to_string(), kw.canonical.to_ascii_lowercase()] {
            let tokens = lexer::lex(&spelling).unwrap_or_else(|e| panic!("{spelling}: {e:?}"));
            assert_ne!(tokens[0].kind(), TokenKind::Identifier, "{spelling} lexed as an identifier");
        }
    }
}

/// Guardrail against reintroducing stringly-typed vocabulary checks.
///
/// This is intentionally a **coarse** safety net. It looks for suspicious patterns like `== "BEGIN"` or
/// `"READ" => ...` in Rust source files where we expect callers to go through `vascal_core::lang` registries instead.
///
/// Notes:
/// - We allow occurrences in `crates/vascal_core/src/lang/**` (registries themselves) and in tests.
/// - This is not meant to be perfect; it's meant to catch "oops I added a string match".
#[test]
fn no_new_stringly_vocab_checks_in_rust_sources() {
    let root = repo_root();
    let spellings = spellings();
    let mut offenders: Vec<(PathBuf, usize, String)> = Vec::new();

    let targets = [root.join("src"), root.join("crates")];
    for dir in targets {
        if dir.exists() {
            scan_dir(&root, &dir, &spellings, &mut offenders);
        }
    }

    if !offenders.is_empty() {
        let mut msg = String::new();
        msg.push_str("Found potential stringly-typed vocabulary checks. Prefer vascal_core registries.\n\n");
        for (path, line_no, line) in offenders.into_iter().take(80) {
            msg.push_str(&format!(
                "- {}:{}: {}\n",
                path.strip_prefix(&root).unwrap_or(&path).display(),
                line_no,
                line.trim()
            ));
        }
        panic!("{msg}");
    }
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn spellings() -> Vec<&'static str> {
    let mut set = BTreeSet::new();
    for kw in keywords::KEYWORDS {
        set.insert(kw.canonical);
    }
    for b in builtins::BUILTIN_PROCEDURES {
        set.insert(b.canonical);
    }
    set.into_iter().collect()
}

fn is_allowed_file(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
    if !rel.ends_with(".rs") {
        return true;
    }
    // Registries define the spellings; allow them.
    if rel.starts_with("crates/vascal_core/src/lang/") {
        return true;
    }
    // Unit tests beside the code can mention spellings directly.
    if rel.ends_with("/tests.rs") {
        return true;
    }
    false
}

fn scan_dir(root: &Path, dir: &Path, spellings: &[&'static str], offenders: &mut Vec<(PathBuf, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(root, &path, spellings, offenders);
            continue;
        }
        if is_allowed_file(root, &path) {
            continue;
        }
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in contents.lines().enumerate() {
            if is_suspicious_line(line, spellings) {
                offenders.push((path.clone(), idx + 1, line.to_string()));
            }
        }
    }
}

fn is_suspicious_line(line: &str, spellings: &[&'static str]) -> bool {
    // Avoid false positives in comments/docstrings.
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") {
        return false;
    }

    for s in spellings {
        let eq = format!("== \"{s}\"");
        let arm = format!("\"{s}\" =>");
        if line.contains(&eq) || line.contains(&arm) {
            return true;
        }
    }

    false
}
