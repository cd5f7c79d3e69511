use hashbrown::HashMap;
use smallvec::SmallVec;

use super::byte_string::ByteString;
use super::compact::Fsa;
use super::error::{Error, Result};
use super::pack::Packer;
use super::state::{State, StateId, Transition, EMPTY_SLOT, FINAL_SYMBOL};

/// Incremental builder for a minimal acyclic finite-state automaton.
///
/// Implements the sorted-input algorithm of Daciuk et al., "Incremental
/// Construction of Minimal Acyclic Finite-State Automata" (1998). Keys must
/// be inserted in the order defined by [`ByteString`]; after each insertion
/// the automaton restricted to registered states is minimal for the keys
/// seen so far.
///
/// States live in an arena (a plain vector of records addressed by index),
/// which sidesteps ownership questions around the shared sink and the many
/// states reachable from multiple parents. Finality is encoded as a
/// transition on the reserved symbol `0xff` to a single shared sink state;
/// there is no explicit final flag.
///
/// The builder is strictly single-threaded. Dropping it aborts construction;
/// [`build_fsa`](Self::build_fsa) produces a compact [`Fsa`] that owns its
/// memory independently, after which the builder can be released.
pub struct Automaton {
    /// Arena of state records. A state replaced by a registered equivalent
    /// stays in the arena but becomes unreachable.
    states: Vec<State>,
    /// Register of canonical states, keyed by transition-list signature.
    /// Signature targets are themselves registered, so positional equality
    /// is equivalent to right-language equivalence.
    register: HashMap<Box<[Transition]>, StateId>,
    q_start: StateId,
    /// The shared sink entered by every `0xff` transition. Created lazily,
    /// never registered; it has no outgoing transitions.
    q_final: Option<StateId>,
    previous_input: Option<ByteString>,
    finalized: bool,
}

impl Automaton {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Automaton {
            states: vec![State::default()],
            register: HashMap::new(),
            q_start: StateId(0),
            q_final: None,
            previous_input: None,
            finalized: false,
        }
    }

    fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id.index()]
    }

    fn alloc_state(&mut self) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(State::default());
        id
    }

    /// Inserts a key.
    ///
    /// Keys must arrive in ascending [`ByteString`] order. A key equal to the
    /// previous one is dropped silently. The empty key is legal and makes the
    /// start state final.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedByte`] if the key contains `0x00` or `0xff`,
    /// [`Error::OrderViolation`] if the key sorts before the previously
    /// accepted one, and [`Error::Finalized`] if [`finalize`](Self::finalize)
    /// has already run. In every case the rejection happens before any
    /// mutation, so the builder remains usable.
    pub fn insert_sorted(&mut self, input: impl Into<ByteString>) -> Result<()> {
        let input = input.into();

        if let Some(&byte) = input
            .iter()
            .find(|&&b| b == EMPTY_SLOT || b == FINAL_SYMBOL)
        {
            return Err(Error::ReservedByte(byte));
        }
        if let Some(previous) = &self.previous_input {
            match previous.cmp(&input) {
                std::cmp::Ordering::Equal => return Ok(()),
                std::cmp::Ordering::Greater => {
                    return Err(Error::OrderViolation {
                        previous: previous.clone(),
                        input,
                    })
                }
                std::cmp::Ordering::Less => {}
            }
        }
        if self.finalized {
            return Err(Error::Finalized);
        }

        let (prefix_len, prefix_last) = self.common_prefix(&input);
        self.replace_or_register(prefix_last);
        self.add_suffix(prefix_last, &input[prefix_len..]);
        self.previous_input = Some(input);
        Ok(())
    }

    /// Walks the longest path from the start state labeled by a prefix of
    /// `input`; returns its length and the last state reached.
    fn common_prefix(&self, input: &[u8]) -> (usize, StateId) {
        let mut state = self.q_start;
        for (i, &byte) in input.iter().enumerate() {
            match self.state(state).child(byte) {
                Some(next) => state = next,
                None => return (i, state),
            }
        }
        (input.len(), state)
    }

    /// Canonicalizes the rightmost spine below `state`, bottom-up.
    ///
    /// Every state strictly below `state` on the spine can no longer be
    /// extended (the next key diverges above it), so its right language is
    /// frozen. Each spine state is either unified with an equivalent
    /// registered state (by rewiring its parent's last transition) or
    /// published in the register. The spine is walked with an explicit stack
    /// rather than recursion; its depth is bounded by the key length.
    fn replace_or_register(&mut self, state: StateId) {
        let mut spine: SmallVec<[StateId; 32]> = SmallVec::new();
        spine.push(state);
        while let Some(child) = self.state(spine[spine.len() - 1]).last_child() {
            spine.push(child);
        }

        for i in (1..spine.len()).rev() {
            let child = spine[i];
            let parent = spine[i - 1];
            match self.register.get(self.state(child).transitions()).copied() {
                Some(other) => self.state_mut(parent).update_last_child(other),
                None => {
                    let signature = self.state(child).signature();
                    self.register.insert(signature, child);
                }
            }
        }
    }

    /// Appends fresh states for `suffix` below `state` and marks the end of
    /// the key with a `0xff` transition to the shared sink.
    fn add_suffix(&mut self, state: StateId, suffix: &[u8]) {
        let mut current = state;
        for &byte in suffix {
            let child = self.alloc_state();
            self.state_mut(current).add_child(byte, child);
            current = child;
        }

        let sink = match self.q_final {
            Some(sink) => sink,
            None => {
                let sink = self.alloc_state();
                self.q_final = Some(sink);
                sink
            }
        };
        self.state_mut(current).add_child(FINAL_SYMBOL, sink);
    }

    /// Finalizes (minimizes) the automaton; no further keys can be inserted.
    ///
    /// Registers every remaining state on the last key's spine, then the
    /// start state itself. Idempotent.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.replace_or_register(self.q_start);
        let signature = self.state(self.q_start).signature();
        self.register.insert(signature, self.q_start);
        self.finalized = true;
    }

    /// Packs the minimized automaton into its compact double-array form.
    ///
    /// Finalizes first if necessary. The resulting [`Fsa`] owns its memory;
    /// the builder can be dropped afterwards. The packing does not guarantee
    /// a minimal layout, but the fill ratio is typically over 99%.
    pub fn build_fsa(&mut self) -> Fsa {
        self.finalize();

        let mut packer = Packer::new(self.states.len());
        for &id in self.register.values() {
            packer.place(id, self.state(id).transitions());
        }
        packer.into_fsa(&self.states, self.q_start)
    }

    /// Number of registered (canonical) states. Meaningful after
    /// [`finalize`](Self::finalize); before that, states on the current
    /// key's prefix spine are not yet counted.
    pub fn node_count(&self) -> usize {
        self.register.len()
    }

    /// Returns every key the automaton accepts, in [`ByteString`] order.
    ///
    /// Enumerates the builder graph directly, so it works both before and
    /// after finalization. Note that for large automata the dictionary can
    /// be far larger than the automaton itself.
    pub fn dictionary(&self) -> Vec<ByteString> {
        let mut words = Vec::new();
        let mut word = Vec::new();
        self.collect_words(self.q_start, &mut word, &mut words);
        words
    }

    fn collect_words(&self, state: StateId, word: &mut Vec<u8>, out: &mut Vec<ByteString>) {
        for t in self.state(state).transitions() {
            if t.symbol == FINAL_SYMBOL {
                out.push(ByteString::from(word.as_slice()));
            } else {
                word.push(t.symbol);
                self.collect_words(t.target, word, out);
                word.pop();
            }
        }
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Automaton::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn build(keys: &[&str]) -> Automaton {
        let mut automaton = Automaton::new();
        for key in keys {
            automaton.insert_sorted(*key).unwrap();
        }
        automaton
    }

    #[test]
    fn out_of_order_key_is_rejected_without_side_effects() {
        let mut automaton = build(&["b"]);
        let err = automaton.insert_sorted("a").unwrap_err();
        assert!(matches!(err, Error::OrderViolation { .. }));

        // The offending key left no trace.
        let fsa = automaton.build_fsa();
        assert!(fsa.lookup("b").unwrap());
        assert!(!fsa.lookup("a").unwrap());
        assert_eq!(fsa.dictionary(), [ByteString::from("b")]);
    }

    #[test]
    fn only_the_sorted_permutation_is_accepted() {
        use itertools::Itertools;
        const SORTED_KEYS: [&str; 4] = ["alfa", "bravo", "charlie", "delta"];

        let mut sorted_count = 0;
        for keys in SORTED_KEYS.iter().cloned().permutations(SORTED_KEYS.len()) {
            let mut automaton = Automaton::new();
            let result: Result<()> = keys
                .iter()
                .try_for_each(|key| automaton.insert_sorted(*key));
            let is_sorted = keys == SORTED_KEYS;
            assert_eq!(result.is_ok(), is_sorted, "{keys:?}");
            sorted_count += is_sorted as i32;
        }
        assert_eq!(sorted_count, 1);
    }

    #[test]
    fn duplicate_adjacent_keys_are_dropped_silently() {
        let mut automaton = build(&["alfa", "alfa", "bravo", "bravo"]);
        automaton.finalize();
        assert_eq!(
            automaton.dictionary(),
            ["alfa", "bravo"].map(ByteString::from)
        );
    }

    #[test]
    fn insert_after_finalize_is_rejected() {
        let mut automaton = build(&["alfa"]);
        automaton.finalize();
        let err = automaton.insert_sorted("bravo").unwrap_err();
        assert!(matches!(err, Error::Finalized));
    }

    #[test]
    fn reserved_bytes_are_rejected() {
        let mut automaton = Automaton::new();
        let err = automaton.insert_sorted(vec![b'a', 0x00, b'b']).unwrap_err();
        assert!(matches!(err, Error::ReservedByte(0x00)));
        let err = automaton.insert_sorted(vec![0xff]).unwrap_err();
        assert!(matches!(err, Error::ReservedByte(0xff)));

        // Neither rejection committed anything.
        automaton.insert_sorted("ok").unwrap();
        assert_eq!(automaton.dictionary(), [ByteString::from("ok")]);
    }

    #[test]
    fn shared_suffixes_do_not_add_states() {
        let mut lone = build(&["bat"]);
        lone.finalize();

        let mut pair = build(&["bat", "cat"]);
        pair.finalize();

        // The right languages below 'b' and 'c' are identical, so the whole
        // "at" chain is shared and only the start state differs in shape.
        assert_eq!(lone.node_count(), pair.node_count());
    }

    #[test]
    fn equal_key_sets_register_equally_many_states() {
        let keys = ["bake", "baked", "cake", "caked"];
        let mut sorted: Vec<ByteString> = keys.into_iter().map(ByteString::from).collect();
        sorted.sort();

        let mut plain = Automaton::new();
        let mut with_duplicates = Automaton::new();
        for key in &sorted {
            plain.insert_sorted(key).unwrap();
            with_duplicates.insert_sorted(key).unwrap();
            with_duplicates.insert_sorted(key).unwrap();
        }
        plain.finalize();
        with_duplicates.finalize();

        assert_eq!(plain.node_count(), with_duplicates.node_count());
        assert_eq!(plain.dictionary(), with_duplicates.dictionary());
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut automaton = build(&["alfa", "bravo"]);
        automaton.finalize();
        let count = automaton.node_count();
        automaton.finalize();
        assert_eq!(automaton.node_count(), count);

        let first = automaton.build_fsa();
        let second = automaton.build_fsa();
        assert_eq!(first.symbols, second.symbols);
        assert_eq!(first.targets, second.targets);
        assert_eq!(first.start, second.start);
    }

    #[test]
    fn prefix_keys_are_distinct_members() {
        let mut automaton = build(&["ballpark", "ball"]);
        let fsa = automaton.build_fsa();
        assert!(fsa.lookup("ball").unwrap());
        assert!(fsa.lookup("ballpark").unwrap());
        assert!(!fsa.lookup("ballp").unwrap());
        assert!(!fsa.lookup("ba").unwrap());
    }
}
