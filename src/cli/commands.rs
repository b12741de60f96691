//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use vascal_syntax::grammar::parse_table;
use vascal_syntax::{Reporter, lexer};

use crate::compile::compile_with_reporter;
use crate::config::CompileOptions;

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (100 MB) to prevent memory exhaustion
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read a source file with size validation.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be accessed or read
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &str) -> CliResult<String> {
    // Check file size before reading
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Tokenize and display tokens.
pub fn lex_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = match lexer::lex(&source) {
        Ok(toks) => toks,
        Err(errs) => {
            let msg: Vec<String> = errs.iter().map(ToString::to_string).collect();
            return Err(CliError::failure(msg.join("\n")));
        }
    };

    for tok in &tokens {
        println!("{}", tok);
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the parse table and the production list.
pub fn print_tables() -> CliResult<ExitCode> {
    print!("{}", parse_table().render());
    Ok(ExitCode::SUCCESS)
}

/// Translate a source file.
///
/// Diagnostics go to stderr as they were reported, followed by the fatal error if there is one. The listing goes to
/// `output`, or stdout.
/// Any diagnostic makes the exit code nonzero, even though a listing is still produced.
pub fn compile_file(file_path: &str, options: &CompileOptions, output: Option<&Path>) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let mut reporter = Reporter::new();
    let result = compile_with_reporter(&source, options, &mut reporter);

    for diagnostic in reporter.diagnostics() {
        eprintln!("{}", diagnostic);
    }
    let compilation = result.map_err(|e| CliError::failure(format!("{:?}", miette::Report::new(e))))?;

    if let Some(symbols) = &compilation.symbols {
        println!("{}", symbols.trim_end());
        println!();
    }
    match output {
        Some(path) => fs::write(path, &compilation.code)
            .map_err(|e| CliError::failure(format!("Error writing '{}': {}", path.display(), e)))?,
        None => print!("{}", compilation.code),
    }

    if compilation.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source("definitely/not/here.vas").unwrap_err();
        assert!(err.message.starts_with("Cannot access file"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_compile_file_writes_output() {
        let dir = std::env::temp_dir().join(format!("vascal_cli_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let src = dir.join("prog.vas");
        let out = dir.join("prog.txt");
        fs::write(&src, "PROGRAM t(input, output);\nVAR a: INTEGER;\nBEGIN a := 5 END.").unwrap();

        let code = compile_file(&src.to_string_lossy(), &CompileOptions::default(), Some(&out)).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(fs::read_to_string(&out).unwrap().starts_with("CODE\n"));

        fs::write(&src, "PROGRAM t(input, output);\nBEGIN a := 5 END.").unwrap();
        let code = compile_file(&src.to_string_lossy(), &CompileOptions::default(), Some(&out)).unwrap();
        assert_eq!(code, ExitCode::FAILURE);

        fs::write(&src, "PROGRAM t(input, output);\nBEGIN a := 1 # 2 END.").unwrap();
        let err = compile_file(&src.to_string_lossy(), &CompileOptions::default(), Some(&out)).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(!err.message.is_empty());

        let _ = fs::remove_dir_all(&dir);
    }
}
