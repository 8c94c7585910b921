#![no_main]

use libfuzzer_sys::fuzz_target;
use testduel::engine::discover;
use testduel::{lexer, parser};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else { return };
    // Discovery must accept anything, and every body it finds must lex and parse without panicking.
    for test in discover(s).tests {
        let _ = parser::parse_source(&test.body);
    }
    if let Ok(tokens) = lexer::lex(s) {
        let _ = parser::parse(&tokens);
    }
});
