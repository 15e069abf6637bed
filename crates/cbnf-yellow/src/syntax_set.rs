use crate::SyntaxKind;

/// A `const`-constructible set of kinds, used for FIRST and recovery sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyntaxSet {
    bits: u64,
}

impl SyntaxSet {
    pub const EMPTY: Self = Self { bits: 0 };

    const fn mask(kind: SyntaxKind) -> u64 {
        let kind = kind as u16;
        debug_assert!(kind < u64::BITS as u16, "kind does not fit into a `SyntaxSet`");
        1u64 << kind
    }

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut bits = 0;

        let mut i = 0;
        while i < kinds.len() {
            bits |= Self::mask(kinds[i]);
            i += 1;
        }

        Self { bits }
    }

    pub const fn union(self, other: Self) -> Self {
        Self { bits: self.bits | other.bits }
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        self.bits & Self::mask(kind) != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}
