//! Parser fuzz target: feed arbitrary text to the descriptor parser.
//! The parser must not panic, and every descriptor it accepts must print to a
//! canonical form that parses back to the same value and prints identically.
//! Build with: cargo fuzz run parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    if let Ok(ty) = quantdsl::parse(s) {
        let printed = quantdsl::print(&ty);
        let back = quantdsl::parse(&printed).expect("canonical form must parse");
        assert_eq!(back, ty);
        assert_eq!(quantdsl::print(&back), printed);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parser_fuzz");
}
