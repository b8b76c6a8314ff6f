use super::ship::{ShipDef, ShipId};

pub const BOARD_SIZE: usize = 10;
pub const NUM_SHIPS: usize = 5;
pub const SHIPS: [ShipDef; NUM_SHIPS] = [
    ShipDef::new(ShipId::Carrier, "Carrier", 5),
    ShipDef::new(ShipId::Battleship, "Battleship", 4),
    ShipDef::new(ShipId::Cruiser, "Cruiser", 3),
    ShipDef::new(ShipId::Submarine, "Submarine", 3),
    ShipDef::new(ShipId::Destroyer, "Destroyer", 2),
];

/// Random draws per ship before randomised placement falls back to a scan.
pub const PLACEMENT_ATTEMPTS: usize = 100;
