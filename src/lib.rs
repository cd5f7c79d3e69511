//! # libfsa
//!
//! A fast, memory-efficient [MA-FSA](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! (minimal acyclic finite-state automaton) library for Rust.
//!
//! The automaton recognizes a finite set of byte-string keys, sharing both
//! prefixes and suffixes so that large dictionaries compress well. Construction
//! follows the incremental algorithm of
//! [Daciuk et al. (1998)](https://aclanthology.org/J00-1002/): keys are fed in
//! sorted order and the graph is kept minimal after every insertion.
//!
//! The crate splits the work in two. An [`Automaton`](fsa::Automaton) builder
//! ingests sorted keys and maintains the minimal graph; from it a compact
//! [`Fsa`](fsa::Fsa) is produced, which packs every transition into two
//! parallel arrays for O(key length) queries, prefix traversal with cheap
//! cursors, and persistence to a small binary file format.
//!
//! ## Quick start
//!
//! ```
//! use libfsa::fsa::Automaton;
//!
//! # fn main() -> libfsa::fsa::Result<()> {
//! let mut automaton = Automaton::new();
//! for key in ["bake", "cake", "fake", "lake", "make"] {
//!     automaton.insert_sorted(key)?;
//! }
//! let fsa = automaton.build_fsa();
//!
//! assert!(fsa.lookup("cake")?);
//! assert!(!fsa.lookup("rake")?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Key order
//!
//! Keys must arrive in the order defined by [`ByteString`](fsa::ByteString):
//! unsigned byte-wise lexicographic, except that of two keys where one is a
//! strict prefix of the other, the *longer* comes first. Sorting a
//! `Vec<ByteString>` yields exactly the required insertion order:
//!
//! ```
//! use libfsa::fsa::{Automaton, ByteString};
//!
//! # fn main() -> libfsa::fsa::Result<()> {
//! let mut keys: Vec<ByteString> =
//!     ["ball", "ballpark", "bat"].into_iter().map(ByteString::from).collect();
//! keys.sort();
//! assert_eq!(keys[0].as_str(), Some("ballpark"));
//!
//! let mut automaton = Automaton::new();
//! for key in &keys {
//!     automaton.insert_sorted(key)?;
//! }
//! let fsa = automaton.build_fsa();
//! assert!(fsa.lookup("ball")? && fsa.lookup("ballpark")? && fsa.lookup("bat")?);
//! assert!(!fsa.lookup("ballp")?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Reserved bytes
//!
//! The bytes `0x00` and `0xff` are reserved by the packed representation and
//! may not appear in keys. Neither byte occurs in valid UTF-8, so text keys
//! are always admissible.

#![warn(missing_docs)]

/// Core FSA functionality: byte strings, the builder, the compact automaton.
pub mod fsa;
