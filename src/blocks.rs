//! Block kinds, per-kind supply and candidate placements.
//!
//! Kinds are listed in search order: every enumeration over kinds walks
//! Reflect, then Opaque, then Refract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Cell;

/// Number of distinct block kinds.
pub const NUM_KINDS: usize = 3;

/// What a block does to a beam that crosses into its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockKind {
    /// Bounces the beam (`A` in puzzle files).
    Reflect,
    /// Absorbs the beam (`B`).
    Opaque,
    /// Lets the beam through and also reflects a copy (`C`).
    Refract,
}

impl BlockKind {
    /// All kinds in search order.
    pub const ALL: [BlockKind; NUM_KINDS] =
        [BlockKind::Reflect, BlockKind::Opaque, BlockKind::Refract];

    /// Position of this kind in [`BlockKind::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            BlockKind::Reflect => 0,
            BlockKind::Opaque => 1,
            BlockKind::Refract => 2,
        }
    }

    /// Puzzle-file letter for this kind.
    pub const fn symbol(self) -> char {
        match self {
            BlockKind::Reflect => 'A',
            BlockKind::Opaque => 'B',
            BlockKind::Refract => 'C',
        }
    }

    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'A' => Some(BlockKind::Reflect),
            'B' => Some(BlockKind::Opaque),
            'C' => Some(BlockKind::Refract),
            _ => None,
        }
    }
}

/// How many movable blocks of each kind the puzzle provides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSupply {
    pub reflect: usize,
    pub opaque: usize,
    pub refract: usize,
}

impl BlockSupply {
    pub const fn new(reflect: usize, opaque: usize, refract: usize) -> Self {
        Self {
            reflect,
            opaque,
            refract,
        }
    }

    pub const fn count(&self, kind: BlockKind) -> usize {
        match kind {
            BlockKind::Reflect => self.reflect,
            BlockKind::Opaque => self.opaque,
            BlockKind::Refract => self.refract,
        }
    }

    pub fn set(&mut self, kind: BlockKind, count: usize) {
        match kind {
            BlockKind::Reflect => self.reflect = count,
            BlockKind::Opaque => self.opaque = count,
            BlockKind::Refract => self.refract = count,
        }
    }

    /// Total number of movable blocks across all kinds.
    pub const fn total(&self) -> usize {
        self.reflect + self.opaque + self.refract
    }
}

/// A block pinned to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedBlock {
    pub cell: Cell,
    pub kind: BlockKind,
}

impl PlacedBlock {
    pub const fn new(cell: Cell, kind: BlockKind) -> Self {
        Self { cell, kind }
    }
}

/// Movable blocks assigned to open cells for one search candidate.
///
/// Keys are unique cells. Serialized as a list of [`PlacedBlock`] in cell
/// order so the JSON form does not need string map keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PlacedBlock>", into = "Vec<PlacedBlock>")]
pub struct Placement {
    blocks: BTreeMap<Cell, BlockKind>,
}

impl Placement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a block into `cell`, returning the kind it replaced, if any.
    pub fn insert(&mut self, cell: Cell, kind: BlockKind) -> Option<BlockKind> {
        self.blocks.insert(cell, kind)
    }

    pub fn get(&self, cell: Cell) -> Option<BlockKind> {
        self.blocks.get(&cell).copied()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over placed blocks in cell order.
    pub fn iter(&self) -> impl Iterator<Item = PlacedBlock> + '_ {
        self.blocks
            .iter()
            .map(|(&cell, &kind)| PlacedBlock::new(cell, kind))
    }

    /// Counts placed blocks per kind.
    pub fn supply(&self) -> BlockSupply {
        let mut supply = BlockSupply::default();
        for kind in self.blocks.values() {
            supply.set(*kind, supply.count(*kind) + 1);
        }
        supply
    }
}

impl FromIterator<PlacedBlock> for Placement {
    fn from_iter<I: IntoIterator<Item = PlacedBlock>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().map(|b| (b.cell, b.kind)).collect(),
        }
    }
}

impl From<Vec<PlacedBlock>> for Placement {
    fn from(blocks: Vec<PlacedBlock>) -> Self {
        blocks.into_iter().collect()
    }
}

impl From<Placement> for Vec<PlacedBlock> {
    fn from(placement: Placement) -> Self {
        placement.iter().collect()
    }
}
