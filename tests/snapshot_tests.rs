//! Golden snapshot tests for generated quadruples
//!
//! Each test translates a small program and compares the whole listing against an inline snapshot, so any change
//! to the emitted code shows up in review.
//!
//! Run with: `cargo test --test snapshot_tests`
//! Review changes: `cargo insta review`

use vascal::compile;

/// Translate a program body and return the listing
fn listing(body: &str) -> String {
    let source = format!("PROGRAM t(input, output);\n{body}");
    let compilation = compile(&source).expect("translation failed");
    assert!(compilation.is_clean(), "{:?}", compilation.diagnostics);
    compilation.code.trim_end().to_string()
}

#[test]
fn test_function_call_listing() {
    let code = listing(
        "VAR r: INTEGER;\n\
         FUNCTION sq(k: INTEGER): RESULT INTEGER;\n\
         BEGIN sq := k * k END;\n\
         BEGIN r := sq(3) END.",
    );
    insta::assert_snapshot!(code, @r"
    CODE
    1: call, main, 0
    2: exit
    3: PROCBEGIN, sq
    4: alloc, 2
    5: mul, ^0, ^0, %1
    6: move, %1, _1
    7: free, 2
    8: PROCEND
    9: PROCBEGIN, main
    10: alloc, 4
    11: move, 3, _2
    12: param, @_2
    13: call, sq, 1
    14: move, _1, _3
    15: move, _3, _0
    16: free, 4
    17: PROCEND
    ");
}

#[test]
fn test_or_listing() {
    let code = listing("VAR a, b, c: INTEGER;\nBEGIN IF (a < b) OR (b < c) THEN a := 1 END.");
    insta::assert_snapshot!(code, @r"
    CODE
    1: call, main, 0
    2: exit
    3: PROCBEGIN, main
    4: alloc, 4
    5: blt, _2, _1, 9
    6: goto, 7
    7: blt, _1, _0, 9
    8: goto, 11
    9: move, 1, _3
    10: move, _3, _2
    11: free, 4
    12: PROCEND
    ");
}

#[test]
fn test_mod_listing() {
    let code = listing("VAR a, b, c: INTEGER;\nBEGIN c := a MOD b END.");
    insta::assert_snapshot!(code, @r#"
    CODE
    1: call, main, 0
    2: exit
    3: PROCBEGIN, main
    4: alloc, 6
    5: ble, _2, 0, 8
    6: ble, _1, 0, 8
    7: goto, 10
    8: print, "Modulus operand must be positive"
    9: exit
    10: div, _2, _1, _3
    11: mul, _3, _1, _4
    12: sub, _2, _4, _5
    13: move, _5, _0
    14: free, 6
    15: PROCEND
    "#);
}

#[test]
fn test_read_write_listing() {
    let code = listing("VAR a: INTEGER; x: REAL;\nBEGIN READ(a, x); WRITE(x, a) END.");
    insta::assert_snapshot!(code, @r#"
    CODE
    1: call, main, 0
    2: exit
    3: PROCBEGIN, main
    4: alloc, 2
    5: print, "A ? "
    6: inp, _0
    7: print, "X ? "
    8: finp, _1
    9: print, "X = "
    10: foutp, _1
    11: print, "A = "
    12: outp, _0
    13: free, 2
    14: PROCEND
    "#);
}

#[test]
fn test_local_scope_listing() {
    let code = listing(
        "VAR x: REAL;\n\
         PROCEDURE neg(y: REAL);\n\
         VAR z: REAL;\n\
         BEGIN z := -y; x := z END;\n\
         BEGIN neg(x) END.",
    );
    insta::assert_snapshot!(code, @r"
    CODE
    1: call, main, 0
    2: exit
    3: PROCBEGIN, neg
    4: alloc, 3
    5: fuminus, ^0, %2
    6: move, %2, %1
    7: move, %1, _0
    8: free, 3
    9: PROCEND
    10: PROCBEGIN, main
    11: alloc, 1
    12: param, @_0
    13: call, neg, 1
    14: free, 1
    15: PROCEND
    ");
}
