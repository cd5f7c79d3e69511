use super::compact::Fsa;
use super::state::{State, StateId, Transition, EMPTY_SLOT};

/// Backwards search window when looking for a free base offset. Different
/// values have been tested; increasing this beyond 512 does not give a
/// significant reduction in size, while every extra slot costs scan time.
const SEARCH_OFFSET: usize = 512;

/// A growable bit set. `len` is one past the highest set bit, mirroring the
/// probe window the packer scans from.
#[derive(Default)]
struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    fn get(&self, i: usize) -> bool {
        match self.words.get(i / 64) {
            Some(word) => (word >> (i % 64)) & 1 == 1,
            None => false,
        }
    }

    fn set(&mut self, i: usize) {
        let word = i / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (i % 64);
        self.len = self.len.max(i + 1);
    }

    /// One past the highest set bit ever observed.
    fn len(&self) -> usize {
        self.len
    }
}

/// Lays registered states out in the shared double-array representation.
///
/// Each state gets a base offset such that all its transition slots
/// `base + symbol` are unoccupied, and no two states share a base. At any
/// populated slot `i` exactly one state `S` has `base(S) + s == i` for one of
/// its symbols `s`, so `sym[i] == s` identifies the owner during probing.
pub(crate) struct Packer {
    /// Slots claimed by some state's transition.
    slot_used: BitSet,
    /// Offsets claimed as a state's base.
    origin_used: BitSet,
    /// Base offset per arena index; -1 marks states that were never placed
    /// (the shared sink and states replaced during minimization).
    offsets: Vec<i32>,
    /// Placed states, in placement order.
    placed: Vec<StateId>,
    last_offset: i32,
}

impl Packer {
    pub(crate) fn new(state_count: usize) -> Self {
        Packer {
            slot_used: BitSet::default(),
            origin_used: BitSet::default(),
            offsets: vec![-1; state_count],
            placed: Vec::new(),
            last_offset: 0,
        }
    }

    /// Finds the lowest collision-free base for a state within the search
    /// window and claims its slots.
    pub(crate) fn place(&mut self, id: StateId, transitions: &[Transition]) {
        let mut offset = self.slot_used.len().saturating_sub(SEARCH_OFFSET);
        loop {
            if !self.origin_used.get(offset)
                && transitions
                    .iter()
                    .all(|t| !self.slot_used.get(offset + t.symbol as usize))
            {
                break;
            }
            offset += 1;
        }

        for t in transitions {
            self.slot_used.set(offset + t.symbol as usize);
        }
        self.origin_used.set(offset);
        self.offsets[id.index()] = offset as i32;
        self.placed.push(id);
        self.last_offset = self.last_offset.max(offset as i32);
    }

    /// Emits the two arrays. Slots of `0xff` transitions receive the target
    /// -1: the sink is never placed, and the runtime only ever consults the
    /// symbol half of those slots.
    pub(crate) fn into_fsa(self, states: &[State], start: StateId) -> Fsa {
        let len = self.last_offset as usize + 256;
        let mut symbols = vec![EMPTY_SLOT; len];
        let mut targets = vec![0i32; len];

        for &id in &self.placed {
            let offset = self.offsets[id.index()] as usize;
            for t in states[id.index()].transitions() {
                let slot = offset + t.symbol as usize;
                symbols[slot] = t.symbol;
                targets[slot] = self.offsets[t.target.index()];
            }
        }

        Fsa::new(symbols, targets, self.offsets[start.index()])
    }
}

#[cfg(test)]
mod test {
    use super::super::state::FINAL_SYMBOL;
    use super::*;

    #[test]
    fn bitset_tracks_bits_and_length() {
        let mut bits = BitSet::default();
        assert!(!bits.get(0));
        assert!(!bits.get(1000));
        assert_eq!(bits.len(), 0);

        bits.set(0);
        bits.set(63);
        bits.set(64);
        bits.set(517);
        assert!(bits.get(0) && bits.get(63) && bits.get(64) && bits.get(517));
        assert!(!bits.get(1) && !bits.get(516) && !bits.get(518));
        assert_eq!(bits.len(), 518);
    }

    fn state_with(symbols: &[u8]) -> State {
        let mut state = State::default();
        for &s in symbols {
            state.add_child(s, StateId(0));
        }
        state
    }

    #[test]
    fn bases_are_distinct_and_slots_never_collide() {
        // All states use overlapping symbol sets to force probing.
        let symbol_sets: [&[u8]; 6] = [&[1, 2], &[1], &[2], &[1, 2, 3], &[3], &[1, FINAL_SYMBOL]];
        let shapes: Vec<State> = symbol_sets.iter().map(|s| state_with(s)).collect();

        let mut packer = Packer::new(shapes.len());
        for (i, state) in shapes.iter().enumerate() {
            packer.place(StateId(i as u32), state.transitions());
        }

        let mut origins = std::collections::HashSet::new();
        let mut slots = std::collections::HashSet::new();
        for (i, state) in shapes.iter().enumerate() {
            let base = packer.offsets[i];
            assert!(base >= 0);
            assert!(origins.insert(base), "duplicate base {base}");
            for t in state.transitions() {
                let slot = base + t.symbol as i32;
                assert!(slots.insert(slot), "slot collision at {slot}");
            }
        }
    }

    #[test]
    fn emitted_arrays_cover_every_base_plus_symbol() {
        let shapes: Vec<State> = (0u8..8).map(|i| state_with(&[i + 1, 250])).collect();
        let mut packer = Packer::new(shapes.len());
        for (i, state) in shapes.iter().enumerate() {
            packer.place(StateId(i as u32), state.transitions());
        }
        let fsa = packer.into_fsa(&shapes, StateId(0));
        assert_eq!(fsa.symbols.len(), fsa.targets.len());
        assert!(fsa.symbols.len() >= 256);

        // Every populated slot names its symbol; unpopulated slots are empty.
        let populated = fsa.symbols.iter().filter(|&&s| s != EMPTY_SLOT).count();
        assert_eq!(populated, shapes.len() * 2);
    }
}
