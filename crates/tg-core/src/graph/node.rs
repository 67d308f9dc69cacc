//! Placed graph entities
//!
//! A node is a room or a hallway occupying exactly one grid cell. Nodes
//! live in an arena owned by the graph and reference each other through
//! [`NodeId`] indices, so the link structure carries no ownership cycles.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::pos::GridPos;

/// Index of a node in the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Connection direction out of a room
///
/// Declaration order is the order the direction selector enumerates and
/// is relied on for deterministic tie-breaking in the priority queue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumIter,
)]
#[repr(u8)]
pub enum Direction {
    Left = 0,
    Up = 1,
    Right = 2,
    Down = 3,
}

impl Direction {
    /// Unit offset of this direction. Up decreases y.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }

    /// Index into a room's link array
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The opposite direction
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }
}

bitflags! {
    /// Role flags for a room
    ///
    /// Origin, end, and special are mutually exclusive in practice (the
    /// tagging passes never stack them) but not enforced by the type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RoomFlags: u8 {
        const ORIGIN = 0x01;
        const END = 0x02;
        const SPECIAL = 0x04;
    }
}

// Manual serde impl for RoomFlags
impl Serialize for RoomFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RoomFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(RoomFlags::from_bits_truncate(bits))
    }
}

/// A room placed on the grid
///
/// Links point at the child rooms grown from this room during the
/// depth-first pass, one per direction. Supplemental hallways never add
/// links, so the link structure stays a tree rooted at the origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Grid cell this room occupies
    pub pos: GridPos,
    /// Upper bound on directional connections
    pub max_connections: u32,
    /// Role flags
    pub flags: RoomFlags,
    links: [Option<NodeId>; 4],
}

impl Room {
    /// Create an unlinked, unflagged room
    pub fn new(pos: GridPos, max_connections: u32) -> Self {
        Self {
            pos,
            max_connections,
            flags: RoomFlags::empty(),
            links: [None; 4],
        }
    }

    /// Child room in the given direction, if one was attached
    pub fn link(&self, dir: Direction) -> Option<NodeId> {
        self.links[dir.index()]
    }

    /// Attach a child room in the given direction
    pub fn set_link(&mut self, dir: Direction, child: NodeId) {
        self.links[dir.index()] = Some(child);
    }

    /// Present children in direction order
    pub fn links(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.links.iter().flatten().copied()
    }

    pub fn is_origin(&self) -> bool {
        self.flags.contains(RoomFlags::ORIGIN)
    }

    pub fn is_end(&self) -> bool {
        self.flags.contains(RoomFlags::END)
    }

    pub fn is_special(&self) -> bool {
        self.flags.contains(RoomFlags::SPECIAL)
    }

    /// Display character; origin wins over end wins over special
    pub fn symbol(&self) -> char {
        if self.is_origin() {
            'O'
        } else if self.is_end() {
            'E'
        } else if self.is_special() {
            'S'
        } else {
            'R'
        }
    }
}

/// A hallway cell between two rooms placed two cells apart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hallway {
    /// Midpoint grid cell between the two linked rooms
    pub pos: GridPos,
    pub origin: Option<NodeId>,
    pub end: Option<NodeId>,
}

/// A placed entity occupying one grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Room(Room),
    Hallway(Hallway),
}

impl Node {
    /// Grid cell this node occupies
    pub fn pos(&self) -> GridPos {
        match self {
            Node::Room(room) => room.pos,
            Node::Hallway(hall) => hall.pos,
        }
    }

    pub fn is_room(&self) -> bool {
        matches!(self, Node::Room(_))
    }

    pub fn as_room(&self) -> Option<&Room> {
        match self {
            Node::Room(room) => Some(room),
            Node::Hallway(_) => None,
        }
    }

    pub fn as_room_mut(&mut self) -> Option<&mut Room> {
        match self {
            Node::Room(room) => Some(room),
            Node::Hallway(_) => None,
        }
    }

    pub fn as_hallway(&self) -> Option<&Hallway> {
        match self {
            Node::Room(_) => None,
            Node::Hallway(hall) => Some(hall),
        }
    }

    /// Display character for the text dump
    pub fn symbol(&self) -> char {
        match self {
            Node::Room(room) => room.symbol(),
            Node::Hallway(_) => 'H',
        }
    }
}
