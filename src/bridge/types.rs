//! Core types for the bridge monitor
//!
//! These are plain value types shared by the monitor, the admission policies
//! and the participant simulation.

use std::fmt;

/// Direction a car is heading when it crosses the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::North => write!(f, "north"),
            Direction::South => write!(f, "south"),
        }
    }
}

/// The unit of mutual exclusion on the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Cars heading north
    CarNorth,
    /// Cars heading south
    CarSouth,
    /// Pedestrians (either way)
    Pedestrian,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::CarNorth, Kind::CarSouth, Kind::Pedestrian];

    pub fn car(direction: Direction) -> Kind {
        match direction {
            Direction::North => Kind::CarNorth,
            Direction::South => Kind::CarSouth,
        }
    }

    /// Direction of travel, `None` for pedestrians
    pub fn direction(self) -> Option<Direction> {
        match self {
            Kind::CarNorth => Some(Direction::North),
            Kind::CarSouth => Some(Direction::South),
            Kind::Pedestrian => None,
        }
    }

    pub fn is_car(self) -> bool {
        self.direction().is_some()
    }

    /// The two kinds this one excludes from the bridge
    pub fn others(self) -> [Kind; 2] {
        match self {
            Kind::CarNorth => [Kind::CarSouth, Kind::Pedestrian],
            Kind::CarSouth => [Kind::CarNorth, Kind::Pedestrian],
            Kind::Pedestrian => [Kind::CarNorth, Kind::CarSouth],
        }
    }

    /// Stable slot used to index per-kind condition variables
    pub(crate) fn index(self) -> usize {
        match self {
            Kind::CarNorth => 0,
            Kind::CarSouth => 1,
            Kind::Pedestrian => 2,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::CarNorth => write!(f, "north-bound cars"),
            Kind::CarSouth => write!(f, "south-bound cars"),
            Kind::Pedestrian => write!(f, "pedestrians"),
        }
    }
}

/// A unique identifier for a simulated crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartyId(pub u32);

/// One crossing attempt: a car heading some direction, or a pedestrian
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Party {
    pub id: PartyId,
    pub kind: Kind,
}

impl Party {
    pub fn car(id: u32, direction: Direction) -> Self {
        Self {
            id: PartyId(id),
            kind: Kind::car(direction),
        }
    }

    pub fn pedestrian(id: u32) -> Self {
        Self {
            id: PartyId(id),
            kind: Kind::Pedestrian,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.direction() {
            Some(direction) => write!(f, "car {} heading {}", self.id.0, direction),
            None => write!(f, "pedestrian {}", self.id.0),
        }
    }
}
