//! Ship definitions, per-ship hit tracking and the fleet.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::board::Position;
use crate::core::config::{NUM_SHIPS, SHIPS};

/// Canonical ship types, one per fleet slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipId {
    Carrier,
    Battleship,
    Cruiser,
    Submarine,
    Destroyer,
}

impl ShipId {
    /// Index into the canonical fleet order.
    pub fn index(self) -> usize {
        match self {
            ShipId::Carrier => 0,
            ShipId::Battleship => 1,
            ShipId::Cruiser => 2,
            ShipId::Submarine => 3,
            ShipId::Destroyer => 4,
        }
    }

    pub fn def(self) -> ShipDef {
        SHIPS[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.def().name()
    }

    pub fn size(self) -> usize {
        self.def().length()
    }
}

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type of ship: identifier, name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipDef {
    id: ShipId,
    name: &'static str,
    length: usize,
}

impl ShipDef {
    pub const fn new(id: ShipId, name: &'static str, length: usize) -> Self {
        Self { id, name, length }
    }

    pub fn id(&self) -> ShipId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship and the segments of it that have been struck.
///
/// `hits` always has one entry per segment; `positions` is empty until the
/// ship is placed and then parallel to `hits`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    def: ShipDef,
    positions: Vec<Position>,
    horizontal: bool,
    placed: bool,
    hits: Vec<bool>,
}

impl Ship {
    /// An unplaced ship with no hits.
    pub fn new(def: ShipDef) -> Self {
        Self {
            def,
            positions: Vec::new(),
            horizontal: true,
            placed: false,
            hits: vec![false; def.length()],
        }
    }

    pub fn id(&self) -> ShipId {
        self.def.id()
    }

    pub fn name(&self) -> &'static str {
        self.def.name()
    }

    pub fn size(&self) -> usize {
        self.def.length()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn is_horizontal(&self) -> bool {
        self.horizontal
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn hits(&self) -> &[bool] {
        &self.hits
    }

    /// Sunk once every segment has been struck.
    pub fn is_sunk(&self) -> bool {
        self.hits.iter().all(|&h| h)
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    pub(crate) fn placed_at(&self, positions: Vec<Position>, horizontal: bool) -> Self {
        Ship {
            def: self.def,
            positions,
            horizontal,
            placed: true,
            hits: vec![false; self.def.length()],
        }
    }

    /// Record a strike on `pos`. Returns `false` if the ship is not there.
    pub(crate) fn strike(&mut self, pos: Position) -> bool {
        match self.positions.iter().position(|&p| p == pos) {
            Some(i) => {
                self.hits[i] = true;
                true
            }
            None => false,
        }
    }
}

/// The five canonical ships owned by one side, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fleet {
    ships: [Ship; NUM_SHIPS],
}

impl Fleet {
    /// Create the canonical fleet with nothing placed.
    pub fn new() -> Self {
        Fleet {
            ships: std::array::from_fn(|i| Ship::new(SHIPS[i])),
        }
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship(&self, id: ShipId) -> &Ship {
        &self.ships[id.index()]
    }

    pub(crate) fn ship_mut(&mut self, id: ShipId) -> &mut Ship {
        &mut self.ships[id.index()]
    }

    /// Copy of the fleet with `ship` replacing the entry of the same type.
    pub fn with_ship(&self, ship: Ship) -> Self {
        let mut fleet = self.clone();
        let id = ship.id();
        fleet.ships[id.index()] = ship;
        fleet
    }

    pub fn ship_at(&self, pos: Position) -> Option<&Ship> {
        self.ships.iter().find(|s| s.occupies(pos))
    }

    pub fn all_placed(&self) -> bool {
        self.ships.iter().all(Ship::is_placed)
    }

    pub fn all_sunk(&self) -> bool {
        self.ships.iter().all(Ship::is_sunk)
    }

    /// Names of sunk ships in canonical order.
    pub fn sunk_names(&self) -> Vec<&'static str> {
        self.ships
            .iter()
            .filter(|s| s.is_sunk())
            .map(Ship::name)
            .collect()
    }
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new()
    }
}
