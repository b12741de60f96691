//! Integration tests for the Vascal translator

use std::fs;
use std::path::Path;

use vascal::{Compilation, CompileOptions, ParseError, compile, compile_with_options};
use vascal_core::DiagnosticCode;

/// Helper to run the full pipeline on a source file
fn compile_file(path: &Path) -> Result<Compilation, String> {
    let source = fs::read_to_string(path).map_err(|e| e.to_string())?;
    compile(&source).map_err(|e| e.to_string())
}

fn program(body: &str) -> String {
    format!("PROGRAM t(input, output);\n{body}")
}

fn codes(compilation: &Compilation) -> Vec<DiagnosticCode> {
    compilation.diagnostics.iter().map(|d| d.code).collect()
}

/// Test that all valid fixtures translate without diagnostics
#[test]
fn test_valid_fixtures() {
    let fixtures_dir = Path::new("tests/fixtures/valid");
    if !fixtures_dir.exists() {
        return; // Skip if fixtures not present
    }

    for entry in fs::read_dir(fixtures_dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|e| e == "vas") {
            let compilation = compile_file(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
            assert!(
                compilation.is_clean(),
                "Expected {} to translate cleanly, got: {:?}",
                path.display(),
                compilation.diagnostics
            );
            assert!(compilation.code.ends_with("PROCEND\n"));
        }
    }
}

/// Test that invalid fixtures produce errors
#[test]
fn test_invalid_fixtures() {
    let fixtures_dir = Path::new("tests/fixtures/invalid");
    if !fixtures_dir.exists() {
        return; // Skip if fixtures not present
    }

    for entry in fs::read_dir(fixtures_dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|e| e == "vas") {
            match compile_file(&path) {
                Ok(compilation) => assert!(
                    !compilation.is_clean(),
                    "Expected {} to report a diagnostic",
                    path.display()
                ),
                Err(_) => {}
            }
        }
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_simple_assignment() {
    let compilation = compile(&program("VAR A: INTEGER; BEGIN A := 5 END.")).unwrap();
    assert!(compilation.is_clean());
    assert_eq!(
        compilation.code,
        "CODE\n\
         1: call, main, 0\n\
         2: exit\n\
         3: PROCBEGIN, main\n\
         4: alloc, 2\n\
         5: move, 5, _1\n\
         6: move, _1, _0\n\
         7: free, 2\n\
         8: PROCEND\n"
    );
}

#[test]
fn test_duplicate_declaration_reported_once() {
    let compilation = compile(&program("VAR A: INTEGER; A: REAL; BEGIN A := 5 END.")).unwrap();
    assert_eq!(codes(&compilation), vec![DiagnosticCode::MultiplyDeclaredVariable]);
    // A kept its INTEGER entry, so no coercion is emitted
    assert!(!compilation.code.contains("ltof"));
    assert!(compilation.code.contains("move, _1, _0\n"));
}

#[test]
fn test_declaration_group_offsets() {
    let compilation = compile(&program("VAR A, B: INTEGER; BEGIN B := 7 END.")).unwrap();
    assert!(compilation.is_clean());
    // the last name of a group takes the first offset
    assert_eq!(
        compilation.code,
        "CODE\n\
         1: call, main, 0\n\
         2: exit\n\
         3: PROCBEGIN, main\n\
         4: alloc, 3\n\
         5: move, 7, _2\n\
         6: move, _2, _0\n\
         7: free, 3\n\
         8: PROCEND\n"
    );
}

#[test]
fn test_parameter_miscount_emits_no_call() {
    let source = program(
        "VAR a: INTEGER;\n\
         PROCEDURE pair(x, y: INTEGER); BEGIN x := y END;\n\
         BEGIN pair(a, a, a) END.",
    );
    let compilation = compile(&source).unwrap();
    assert_eq!(codes(&compilation), vec![DiagnosticCode::ParameterMiscount]);
    assert_eq!(
        compilation.diagnostics[0].message,
        "Wrong number of parameters in call to PAIR: expected 2, found 3"
    );
    assert!(!compilation.code.contains("call, pair"));
    assert!(!compilation.code.contains("param"));
}

#[test]
fn test_missing_semicolon_recovers() {
    let source = program("VAR x, y: INTEGER;\nBEGIN\n  x := 1\n  y := 2\nEND.");
    let compilation = compile(&source).unwrap();
    assert_eq!(codes(&compilation), vec![DiagnosticCode::UnmatchedTerminals]);
    assert_eq!(compilation.diagnostics[0].line, 5);
    // both assignments are still translated
    assert!(compilation.code.contains("move, _2, _1\n"));
    assert!(compilation.code.contains("move, _3, _0\n"));
}

#[test]
fn test_diagnostic_rendering() {
    let compilation = compile(&program("BEGIN\n  q := 1\nEND.")).unwrap();
    assert_eq!(
        compilation.diagnostics[0].to_string(),
        ">>> ERROR AT LINE 3:   q := 1\n>>> Undeclared variable Q"
    );
}

// ============================================================================
// CONTROL FLOW
// ============================================================================

#[test]
fn test_if_else_listing() {
    let compilation = compile(&program("VAR a, b: INTEGER;\nBEGIN IF a < b THEN a := 1 ELSE b := 2 END.")).unwrap();
    assert!(compilation.is_clean());
    let expected = "4: alloc, 4\n\
                    5: blt, _1, _0, 7\n\
                    6: goto, 10\n\
                    7: move, 1, _2\n\
                    8: move, _2, _1\n\
                    9: goto, 12\n\
                    10: move, 2, _3\n\
                    11: move, _3, _0\n\
                    12: free, 4\n\
                    13: PROCEND\n";
    assert!(compilation.code.ends_with(expected), "{}", compilation.code);
}

#[test]
fn test_while_listing() {
    let source = program("VAR i: INTEGER; x: REAL;\nBEGIN WHILE i < 10 DO BEGIN x := x + i; i := i + 1 END END.");
    let compilation = compile(&source).unwrap();
    assert!(compilation.is_clean());
    let expected = "4: alloc, 7\n\
                    5: move, 10, _2\n\
                    6: blt, _0, _2, 8\n\
                    7: goto, 15\n\
                    8: ltof, _0, _3\n\
                    9: fadd, _1, _3, _4\n\
                    10: move, _4, _1\n\
                    11: move, 1, _5\n\
                    12: add, _0, _5, _6\n\
                    13: move, _6, _0\n\
                    14: goto, 5\n\
                    15: free, 7\n\
                    16: PROCEND\n";
    assert!(compilation.code.ends_with(expected), "{}", compilation.code);
}

#[test]
fn test_nested_control_flow_resolves_every_jump() {
    let source = fs::read_to_string("tests/fixtures/valid/control.vas").unwrap();
    let compilation = compile(&source).unwrap();
    assert!(compilation.is_clean());
    for quad in compilation.quadruples.iter() {
        assert!(
            !quad.operands.iter().any(|op| op == "_"),
            "unresolved jump in {quad:?}"
        );
    }
}

// ============================================================================
// CALLS AND ARRAYS
// ============================================================================

#[test]
fn test_procedure_with_array_argument() {
    let source = program(
        "VAR v: ARRAY[1..3] OF INTEGER;\n\
         PROCEDURE show(n: INTEGER); BEGIN WRITE(n) END;\n\
         BEGIN v[2] := 7; show(v[2]) END.",
    );
    let compilation = compile(&source).unwrap();
    assert!(compilation.is_clean(), "{:?}", compilation.diagnostics);
    let expected = "CODE\n\
                    1: call, main, 0\n\
                    2: exit\n\
                    3: PROCBEGIN, show\n\
                    4: alloc, 1\n\
                    5: print, \"N = \"\n\
                    6: outp, ^0\n\
                    7: free, 1\n\
                    8: PROCEND\n\
                    9: PROCBEGIN, main\n\
                    10: alloc, 9\n\
                    11: move, 2, _3\n\
                    12: blt, _3, 1, 15\n\
                    13: bgt, _3, 3, 15\n\
                    14: goto, 17\n\
                    15: print, \"Array index out of bounds\"\n\
                    16: exit\n\
                    17: sub, _3, 1, _4\n\
                    18: move, 7, _5\n\
                    19: stor, _5, _4, _0\n\
                    20: move, 2, _6\n\
                    21: blt, _6, 1, 24\n\
                    22: bgt, _6, 3, 24\n\
                    23: goto, 26\n\
                    24: print, \"Array index out of bounds\"\n\
                    25: exit\n\
                    26: sub, _6, 1, _7\n\
                    27: load, _0, _7, _8\n\
                    28: param, @_8\n\
                    29: call, show, 1\n\
                    30: free, 9\n\
                    31: PROCEND\n";
    assert_eq!(compilation.code, expected);
}

#[test]
fn test_whole_array_argument() {
    let source = program(
        "VAR v: ARRAY[1..3] OF INTEGER; w: ARRAY[1..4] OF INTEGER;\n\
         PROCEDURE q(u: ARRAY[1..3] OF INTEGER); BEGIN u[1] := 0 END;\n\
         BEGIN q(v); q(w) END.",
    );
    let compilation = compile(&source).unwrap();
    assert_eq!(codes(&compilation), vec![DiagnosticCode::ArrayParameterError]);
    assert!(compilation.code.contains(": param, @_0\n"));
    assert_eq!(compilation.code.matches(": call, q, 1\n").count(), 1);
}

#[test]
fn test_calls_fixture_uses_every_call_form() {
    let source = fs::read_to_string("tests/fixtures/valid/calls.vas").unwrap();
    let compilation = compile(&source).unwrap();
    assert!(compilation.is_clean(), "{:?}", compilation.diagnostics);
    assert!(compilation.code.contains(": PROCBEGIN, fact\n"));
    assert!(compilation.code.contains(": PROCBEGIN, fill\n"));
    assert!(compilation.code.contains(": call, fact, 1\n"));
    assert!(compilation.code.contains(": call, fill, 2\n"));
    assert!(compilation.code.contains(": print, \"N ? \"\n"));
    assert!(compilation.code.contains(": print, \"<value> = \"\n"));
}

// ============================================================================
// FATAL ERRORS AND OPTIONS
// ============================================================================

#[test]
fn test_lexical_error_is_fatal() {
    let result = compile(&program("VAR a: INTEGER;\nBEGIN a := 1 # 2 END."));
    assert!(matches!(result, Err(ParseError::Lexical(_))), "{result:?}");
}

#[test]
fn test_parser_quit() {
    let result = compile(&program("VAR a: INTEGER;\nBEGIN\n  a := ;\n  a := 2\nEND."));
    assert!(matches!(result, Err(ParseError::ParserQuit { .. })), "{result:?}");
}

#[test]
fn test_symbol_dump_option() {
    let options = CompileOptions::new().with_dump_symbols(true);
    let compilation = compile_with_options(&program("VAR a: INTEGER; BEGIN a := 5 END."), &options).unwrap();
    let symbols = compilation.symbols.unwrap();
    assert!(symbols.contains("Name    : MAIN"));
    assert!(symbols.contains("Name    : A"));

    let compilation = compile(&program("VAR a: INTEGER; BEGIN a := 5 END.")).unwrap();
    assert!(compilation.symbols.is_none());
}

#[test]
fn test_temp_prefix_option_keeps_listing() {
    let source = program("VAR a: INTEGER; BEGIN a := 5 END.");
    let options = CompileOptions::new().with_temp_prefix("tmp");
    let renamed = compile_with_options(&source, &options).unwrap();
    assert_eq!(renamed.code, compile(&source).unwrap().code);
}
