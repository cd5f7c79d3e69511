use smallvec::SmallVec;

/// Transition symbol marking final (accepting) states. `0xff` is usable as an
/// in-band marker because it never occurs in valid UTF-8.
pub const FINAL_SYMBOL: u8 = 0xff;

/// Slot content marking an unoccupied cell in the packed symbol array. Like
/// `0xff`, the byte `0x00` never occurs in valid UTF-8.
pub const EMPTY_SLOT: u8 = 0x00;

/// Handle to a state record in the builder's arena. Handles are assigned
/// monotonically, which gives registered states a stable identity for
/// signature comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct StateId(pub(crate) u32);

impl StateId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single outgoing transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Transition {
    pub(crate) symbol: u8,
    pub(crate) target: StateId,
}

/// A state under construction: an ordered list of outgoing transitions.
///
/// Keys arrive sorted, so transitions are only ever appended in strictly
/// ascending symbol order, with a `FINAL_SYMBOL` transition (if any) last.
/// Once every target is itself registered, the list doubles as the state's
/// register signature: positional equality of `(symbol, target)` pairs is
/// then equivalent to right-language equivalence.
#[derive(Clone, Debug, Default)]
pub(crate) struct State {
    transitions: SmallVec<[Transition; 4]>,
}

impl State {
    /// Returns the target reached on `symbol`, if such a transition exists.
    pub(crate) fn child(&self, symbol: u8) -> Option<StateId> {
        self.transitions
            .iter()
            .find(|t| t.symbol == symbol)
            .map(|t| t.target)
    }

    /// Returns the most recently appended child, ignoring a trailing
    /// `FINAL_SYMBOL` transition; that one leads to the shared sink, which
    /// has no outgoing transitions and is never descended into.
    pub(crate) fn last_child(&self) -> Option<StateId> {
        match self.transitions.last() {
            Some(t) if t.symbol != FINAL_SYMBOL => Some(t.target),
            _ => None,
        }
    }

    /// Redirects the last transition to `target`. The symbol is unchanged.
    pub(crate) fn update_last_child(&mut self, target: StateId) {
        if let Some(t) = self.transitions.last_mut() {
            t.target = target;
        }
    }

    /// Appends a transition. Callers must append in ascending symbol order.
    pub(crate) fn add_child(&mut self, symbol: u8, target: StateId) {
        debug_assert!(
            self.transitions.last().is_none_or(|t| t.symbol < symbol),
            "transitions must be appended in ascending symbol order"
        );
        self.transitions.push(Transition { symbol, target });
    }

    /// True if the state carries a `FINAL_SYMBOL` transition.
    pub(crate) fn is_final(&self) -> bool {
        self.child(FINAL_SYMBOL).is_some()
    }

    /// The ordered transition list.
    pub(crate) fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Materializes the transition list as an owned register key.
    pub(crate) fn signature(&self) -> Box<[Transition]> {
        self.transitions.as_slice().into()
    }
}
