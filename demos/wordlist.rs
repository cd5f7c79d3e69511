//! Example: building and querying a byte-string dictionary automaton.
//!
//! Shows the full lifecycle: sort the keys into the required order, feed them
//! to the builder, query the compact automaton with lookups and cursors, and
//! enumerate the accepted keys.
//!
//! Run with: cargo run --example wordlist

use libfsa::fsa::{Automaton, ByteString};

fn main() -> libfsa::fsa::Result<()> {
    let words = ["bake", "baked", "baker", "cake", "caked", "fake", "lake"];

    // ByteString's ordering puts "baked" and "baker" before their prefix
    // "bake", which is the order the builder requires.
    let mut keys: Vec<ByteString> = words.into_iter().map(ByteString::from).collect();
    keys.sort();

    let mut automaton = Automaton::new();
    for key in &keys {
        automaton.insert_sorted(key)?;
    }
    let fsa = automaton.build_fsa();

    // Word lookup
    println!("Word lookup:");
    for word in ["bake", "baker", "bakes", "cake", "lake", "make"] {
        println!("  {word}: {}", if fsa.lookup(word)? { "yes" } else { "no" });
    }

    // Prefix checking with a cursor
    println!("\nPrefix checking:");
    for prefix in ["ba", "cak", "ma", "fak"] {
        let mut cursor = fsa.start();
        cursor.consume(prefix)?;
        println!("  {prefix}*: {}", if cursor.is_valid() { "yes" } else { "no" });
    }

    // List all words
    println!("\nAll words:");
    for word in fsa.dictionary() {
        println!("  {word}");
    }
    Ok(())
}
