//! Read-only position snapshot.

use ahash::AHashMap;
use kestrel_core::SymbolId;
use kestrel_proto::PositionEntry;

/// Signed position per symbol. Absent symbols are flat.
#[derive(Clone, Debug, Default)]
pub struct PositionSnapshot {
    positions: AHashMap<SymbolId, i64>,
}

impl PositionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from boundary records. A repeated symbol keeps its last entry.
    pub fn from_entries(entries: &[PositionEntry]) -> Self {
        entries
            .iter()
            .map(|entry| (SymbolId(entry.symbol_id), entry.position))
            .collect()
    }

    /// Set the position for `symbol`.
    pub fn insert(&mut self, symbol: SymbolId, position: i64) {
        self.positions.insert(symbol, position);
    }

    /// Position for `symbol`, 0 if absent.
    #[inline]
    pub fn get(&self, symbol: SymbolId) -> i64 {
        self.positions.get(&symbol).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<(SymbolId, i64)> for PositionSnapshot {
    fn from_iter<I: IntoIterator<Item = (SymbolId, i64)>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}
