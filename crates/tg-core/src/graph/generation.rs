//! Layout generation engine
//!
//! Depth-first recursive room placement with quadrant balancing, followed
//! by supplemental hallway insertion, end-room selection, and
//! breadth-first special-room tagging. One engine instance owns its grid,
//! registries, and RNG; a full `generate_map` call runs to completion and
//! regeneration discards the previous graph entirely.

use core::fmt;
use std::collections::{BinaryHeap, VecDeque};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::rng::MapRng;

use super::balance::{self, Half};
use super::errors::GraphError;
use super::grid::Grid;
use super::node::{Direction, Hallway, Node, NodeId, Room, RoomFlags};
use super::pos::GridPos;

/// Default number of directional connections a room may grow
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Tunable generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub width: i32,
    pub height: i32,
    /// Depth bound of one depth-first expansion path
    pub max_rooms_per_branch: u32,
    /// Per room pair, chance of a supplemental hallway
    pub extra_halls_chance: f64,
    /// Upper bound on special-room tags
    pub max_special_rooms: u32,
    /// Per BFS dequeue, chance of a special-room tag
    pub special_rooms_chance: f64,
}

impl GraphConfig {
    /// Check the dimension preconditions
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.width < 3 {
            return Err(GraphError::WidthTooSmall(self.width));
        }
        if self.height < 3 {
            return Err(GraphError::HeightTooSmall(self.height));
        }
        Ok(())
    }

    /// Center cell of the grid, the conventional start position
    pub fn center(&self) -> GridPos {
        GridPos::new(self.width / 2, self.height / 2)
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 11,
            height: 11,
            max_rooms_per_branch: 7,
            extra_halls_chance: 0.15,
            max_special_rooms: 2,
            special_rooms_chance: 0.3,
        }
    }
}

/// The placed layout graph and its generation engine
///
/// Nodes live in an arena indexed by [`NodeId`]; the grid and the room and
/// hallway registries reference into it. Registries keep insertion order,
/// which is the documented tie-break order for end-room selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGraph {
    config: GraphConfig,
    rng: MapRng,
    nodes: Vec<Node>,
    grid: Grid,
    rooms: Vec<NodeId>,
    halls: Vec<NodeId>,
    start_pos: Option<GridPos>,
}

impl TileGraph {
    /// Create an engine for the given configuration.
    /// Fails if the grid is smaller than 3x3 on either axis.
    pub fn new(config: GraphConfig, rng: MapRng) -> Result<Self, GraphError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height);
        Ok(Self {
            config,
            rng,
            nodes: Vec::new(),
            grid,
            rooms: Vec::new(),
            halls: Vec::new(),
            start_pos: None,
        })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Seed of the RNG driving this engine
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn hall_count(&self) -> usize {
        self.halls.len()
    }

    /// Node by arena id
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Node occupying a grid cell, if any
    pub fn node_at(&self, pos: GridPos) -> Option<&Node> {
        self.grid.get(pos).map(|id| &self.nodes[id.0])
    }

    /// Whether a cell is on the grid and unoccupied
    pub fn is_empty(&self, pos: GridPos) -> bool {
        self.grid.is_empty(pos)
    }

    /// Start position of the last generation run
    pub fn start_position(&self) -> Option<GridPos> {
        self.start_pos
    }

    /// Rooms in registry (insertion) order
    pub fn rooms(&self) -> impl Iterator<Item = (NodeId, &Room)> + '_ {
        self.rooms.iter().map(|&id| {
            let room = self.nodes[id.0]
                .as_room()
                .unwrap_or_else(|| unreachable!("room registry holds only rooms"));
            (id, room)
        })
    }

    /// Hallways in registry (insertion) order
    pub fn halls(&self) -> impl Iterator<Item = (NodeId, &Hallway)> + '_ {
        self.halls.iter().map(|&id| {
            let hall = self.nodes[id.0]
                .as_hallway()
                .unwrap_or_else(|| unreachable!("hall registry holds only hallways"));
            (id, hall)
        })
    }

    /// The room flagged as origin
    pub fn origin_room(&self) -> Option<NodeId> {
        self.rooms().find(|(_, r)| r.is_origin()).map(|(id, _)| id)
    }

    /// The room flagged as the end room
    pub fn end_room(&self) -> Option<NodeId> {
        self.rooms().find(|(_, r)| r.is_end()).map(|(id, _)| id)
    }

    /// Rooms reachable from the origin via directional links, in BFS order
    pub fn connected_rooms(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(origin) = self.origin_room() else {
            return out;
        };

        let mut queue = VecDeque::new();
        queue.push_back(origin);
        while let Some(id) = queue.pop_front() {
            out.push(id);
            if let Some(room) = self.nodes[id.0].as_room() {
                queue.extend(room.links());
            }
        }
        out
    }

    /// Build a full layout starting from `start`.
    ///
    /// Fails if `start` is off the grid. Any previously generated graph is
    /// discarded first; the engine keeps nothing between runs beyond its
    /// configuration and RNG stream.
    pub fn generate_map(&mut self, start: GridPos) -> Result<(), GraphError> {
        if !self.grid.in_bounds(start) {
            return Err(GraphError::StartOutOfBounds {
                start,
                width: self.config.width,
                height: self.config.height,
            });
        }

        self.reset();
        self.start_pos = Some(start);

        let penalty_safety = (self.config.max_rooms_per_branch as f64 * 0.75) as u32;
        if let Some(origin) = self.try_generate_from(start, 0, penalty_safety)
            && let Some(room) = self.nodes[origin.0].as_room_mut()
        {
            room.flags |= RoomFlags::ORIGIN;
        }

        self.add_halls();
        self.set_end_room();
        self.set_special_rooms();
        Ok(())
    }

    /// Recursive depth-first expansion.
    ///
    /// Attempt-then-commit: nothing is allocated unless the room at `pos`
    /// is actually placed, so a failed attempt leaves no state behind.
    /// Success means "this room is part of the graph"; a room that grew
    /// zero children is still a success.
    fn try_generate_from(
        &mut self,
        pos: GridPos,
        rooms_generated: u32,
        penalty_safety: u32,
    ) -> Option<NodeId> {
        let max = self.config.max_rooms_per_branch;
        if rooms_generated >= max {
            return None;
        }
        if !self.grid.in_bounds(pos) {
            return None;
        }
        if !self.grid.is_empty(pos) {
            return None;
        }

        let id = self.insert_room(Room::new(pos, DEFAULT_MAX_CONNECTIONS));

        // Randomize the order the directions are tried in, biased toward
        // the emptiest half of the map. The x100 gap keeps favored
        // directions an order of magnitude ahead of unfavored ones while
        // still letting any direction win a zero roll.
        let mut queue: BinaryHeap<(i64, Direction)> = BinaryHeap::new();
        for direction in Direction::iter() {
            let least = self.least_populated_half();
            let multiplier = 1.0 - rooms_generated as f64 * 0.03 * self.rng.unit();
            let weight = if least.favors(direction) {
                (self.rng.rn2(4) as f64 * multiplier * 100.0) as i64
            } else {
                self.rng.rn2(4) as i64
            };
            queue.push((weight, direction));
        }

        // Decide how many connections to grow, shrinking with depth
        let falloff = 1.0 - rooms_generated as f64 / max as f64;
        let max_connections = match self.nodes[id.0].as_room() {
            Some(room) => room.max_connections,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let mut used =
            (max_connections as f64 * falloff).ceil() as i64 + (self.rng.rn2(2) as i64 - 1);
        if rooms_generated > penalty_safety {
            used = (used as f64 * falloff).floor() as i64;
        }

        let mut connections = 0i64;
        while connections < used {
            let Some((_, direction)) = queue.pop() else {
                break;
            };

            if rooms_generated < max - 1 {
                let child_pos = pos.offset(direction, 2);
                if let Some(child) =
                    self.try_generate_from(child_pos, rooms_generated + 1, penalty_safety)
                {
                    let midpoint = pos.offset(direction, 1);
                    self.place_hall(midpoint, Some(id), Some(child));
                    if let Some(room) = self.nodes[id.0].as_room_mut() {
                        room.set_link(direction, child);
                    }
                    connections += 1;
                }
            }
        }

        Some(id)
    }

    /// Supplemental hallway pass.
    ///
    /// For every unordered pair of registered rooms exactly two cells
    /// apart on one axis, roll `extra_halls_chance` and place a hallway at
    /// the midpoint. Collisions are silently ignored; the midpoint may
    /// already hold a hallway from the primary pass. O(n^2) in room count,
    /// which stays small. Directional links are not touched, so the link
    /// tree stays a tree.
    fn add_halls(&mut self) {
        let chance = self.config.extra_halls_chance;

        for i in 0..self.rooms.len() {
            for j in (i + 1)..self.rooms.len() {
                if !self.rng.chance(chance) {
                    continue;
                }

                let a = self.rooms[i];
                let b = self.rooms[j];
                let pa = self.nodes[a.0].pos();
                let pb = self.nodes[b.0].pos();
                let dx = pa.x - pb.x;
                let dy = pa.y - pb.y;

                if dx.abs() == 2 && dy == 0 {
                    let midpoint = GridPos::new(pa.x - dx / 2, pa.y);
                    self.place_hall(midpoint, Some(a), Some(b));
                } else if dy.abs() == 2 && dx == 0 {
                    let midpoint = GridPos::new(pa.x, pa.y - dy / 2);
                    self.place_hall(midpoint, Some(a), Some(b));
                }
            }
        }
    }

    /// Tag the end room: the dead end farthest (Euclidean) from the start
    /// position. Ties go to the first dead end met in registry order; the
    /// fallback candidate is whatever sits at the start cell, so a layout
    /// with no distant dead end tags the origin.
    fn set_end_room(&mut self) {
        let Some(start) = self.start_pos else {
            return;
        };

        let mut farthest = self.grid.get(start);
        let mut farthest_distance = 0.0;

        for &id in &self.rooms {
            let pos = self.nodes[id.0].pos();
            if !self.is_dead_end(pos) {
                continue;
            }
            let distance = start.distance(pos);
            if distance > farthest_distance {
                farthest = Some(id);
                farthest_distance = distance;
            }
        }

        if let Some(id) = farthest
            && let Some(room) = self.nodes[id.0].as_room_mut()
        {
            room.flags |= RoomFlags::END;
        }
    }

    /// Probabilistic special-room tagging, breadth-first from the origin.
    ///
    /// Follows directional links only, never hallway hops. No visited set:
    /// the links form a tree by construction (each room gains at most one
    /// parent during the depth-first pass and supplemental halls never
    /// link). Revisit that assumption before ever letting links share
    /// children.
    fn set_special_rooms(&mut self) {
        let Some(origin) = self.origin_room() else {
            return;
        };

        let mut queue = VecDeque::new();
        queue.push_back(origin);
        let mut tagged = 0;

        while tagged < self.config.max_special_rooms {
            let Some(id) = queue.pop_front() else {
                break;
            };

            // One draw per dequeued room, taken before the flag check
            let draw = self.rng.unit();
            if draw < self.config.special_rooms_chance
                && let Some(room) = self.nodes[id.0].as_room_mut()
                && !room
                    .flags
                    .intersects(RoomFlags::SPECIAL | RoomFlags::END | RoomFlags::ORIGIN)
            {
                room.flags |= RoomFlags::SPECIAL;
                tagged += 1;
            }

            if let Some(room) = self.nodes[id.0].as_room() {
                for dir in [
                    Direction::Left,
                    Direction::Right,
                    Direction::Up,
                    Direction::Down,
                ] {
                    if let Some(child) = room.link(dir) {
                        queue.push_back(child);
                    }
                }
            }
        }
    }

    /// A room is a dead end iff exactly one of its four unit-offset
    /// neighbor cells is occupied. Under the two-cell spacing convention
    /// those neighbors are hallway midpoints, never rooms.
    fn is_dead_end(&self, pos: GridPos) -> bool {
        pos.neighbors()
            .iter()
            .filter(|&&n| self.grid.get(n).is_some())
            .count()
            == 1
    }

    fn least_populated_half(&self) -> Half {
        let positions: Vec<GridPos> = self.rooms.iter().map(|&id| self.nodes[id.0].pos()).collect();
        balance::least_populated_half(&positions, self.config.width, self.config.height)
    }

    /// Insert a room whose cell has already been checked empty
    fn insert_room(&mut self, room: Room) -> NodeId {
        let pos = room.pos;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Room(room));
        let placed = self.grid.place(id, pos);
        debug_assert!(placed, "occupancy is checked before a room is created");
        self.rooms.push(id);
        id
    }

    /// Place a hallway iff its cell is free; reports the outcome
    fn place_hall(&mut self, pos: GridPos, origin: Option<NodeId>, end: Option<NodeId>) -> bool {
        if !self.grid.is_empty(pos) {
            return false;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Hallway(Hallway { pos, origin, end }));
        let placed = self.grid.place(id, pos);
        debug_assert!(placed);
        self.halls.push(id);
        true
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.grid.clear();
        self.rooms.clear();
        self.halls.clear();
        self.start_pos = None;
    }
}

/// Text dump of the grid: one row per y, `O`/`E`/`S`/`R`/`H` for nodes,
/// space for empty cells
impl fmt::Display for TileGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.config.height {
            for x in 0..self.config.width {
                let symbol = match self.grid.get(GridPos::new(x, y)) {
                    Some(id) => self.nodes[id.0].symbol(),
                    None => ' ',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(seed: u64) -> TileGraph {
        TileGraph::new(GraphConfig::default(), MapRng::new(seed)).unwrap()
    }

    #[test]
    fn test_config_validation() {
        let too_narrow = GraphConfig {
            width: 2,
            ..GraphConfig::default()
        };
        assert_eq!(too_narrow.validate(), Err(GraphError::WidthTooSmall(2)));

        let too_short = GraphConfig {
            height: 0,
            ..GraphConfig::default()
        };
        assert_eq!(too_short.validate(), Err(GraphError::HeightTooSmall(0)));

        assert!(GraphConfig::default().validate().is_ok());
    }

    #[test]
    fn test_start_position_validation() {
        let mut g = graph(42);
        assert!(matches!(
            g.generate_map(GridPos::new(-1, -1)),
            Err(GraphError::StartOutOfBounds { .. })
        ));
        // On-boundary is out of range for a 0-indexed grid
        assert!(matches!(
            g.generate_map(GridPos::new(11, 11)),
            Err(GraphError::StartOutOfBounds { .. })
        ));
        assert!(g.generate_map(GridPos::new(5, 5)).is_ok());
    }

    #[test]
    fn test_origin_is_placed_at_start() {
        let mut g = graph(42);
        g.generate_map(GridPos::new(5, 5)).unwrap();

        let origin = g.origin_room().unwrap();
        assert_eq!(g.node(origin).pos(), GridPos::new(5, 5));
        assert_eq!(g.start_position(), Some(GridPos::new(5, 5)));
    }

    #[test]
    fn test_exactly_one_origin_and_one_end() {
        for seed in 0..50 {
            let mut g = graph(seed);
            g.generate_map(GridPos::new(5, 5)).unwrap();

            let origins = g.rooms().filter(|(_, r)| r.is_origin()).count();
            let ends = g.rooms().filter(|(_, r)| r.is_end()).count();
            assert_eq!(origins, 1, "seed {seed}");
            assert_eq!(ends, 1, "seed {seed}");
        }
    }

    #[test]
    fn test_special_rooms_bounded_and_exclusive() {
        for seed in 0..50 {
            let mut g = graph(seed);
            g.generate_map(GridPos::new(5, 5)).unwrap();

            let specials: Vec<_> = g.rooms().filter(|(_, r)| r.is_special()).collect();
            assert!(specials.len() <= g.config().max_special_rooms as usize);
            for (_, room) in specials {
                assert!(!room.is_origin());
                assert!(!room.is_end());
            }
        }
    }

    #[test]
    fn test_determinism_same_seed_same_dump() {
        let mut a = graph(12345);
        let mut b = graph(12345);
        a.generate_map(GridPos::new(5, 5)).unwrap();
        b.generate_map(GridPos::new(5, 5)).unwrap();

        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.room_count(), b.room_count());
        assert_eq!(a.hall_count(), b.hall_count());
    }

    #[test]
    fn test_regeneration_discards_previous_graph() {
        let mut g = graph(7);
        g.generate_map(GridPos::new(5, 5)).unwrap();
        let first_rooms = g.room_count();
        assert!(first_rooms >= 1);

        g.generate_map(GridPos::new(3, 3)).unwrap();
        let origins = g.rooms().filter(|(_, r)| r.is_origin()).count();
        assert_eq!(origins, 1);
        assert_eq!(g.node(g.origin_room().unwrap()).pos(), GridPos::new(3, 3));

        // Every cell holds a node from the new run only
        let mut occupied = 0;
        for y in 0..11 {
            for x in 0..11 {
                if g.node_at(GridPos::new(x, y)).is_some() {
                    occupied += 1;
                }
            }
        }
        assert_eq!(occupied, g.room_count() + g.hall_count());
    }

    #[test]
    fn test_blocked_origin_still_succeeds_alone() {
        // A 3x3 grid started in a corner: the only ±2 offsets in bounds
        // can still collide or miss, and with a single-room branch budget
        // no children are possible at all. Placement alone is success.
        let config = GraphConfig {
            width: 3,
            height: 3,
            max_rooms_per_branch: 1,
            ..GraphConfig::default()
        };
        let mut g = TileGraph::new(config, MapRng::new(9)).unwrap();
        g.generate_map(GridPos::new(1, 1)).unwrap();

        assert_eq!(g.room_count(), 1);
        assert_eq!(g.hall_count(), 0);
        let (_, room) = g.rooms().next().unwrap();
        assert!(room.is_origin());
        // With no occupied neighbors the origin itself is the fallback end
        assert!(room.is_end());
    }

    #[test]
    fn test_scenario_11x11_seed_fixed() {
        let mut g = graph(20260826);
        g.generate_map(GridPos::new(5, 5)).unwrap();

        assert!(g.room_count() >= 1);
        // Rooms share the start cell's parity on both axes, so an 11x11
        // grid holds at most 6x6 of them.
        assert!(g.room_count() <= 36);
        assert_eq!(g.rooms().filter(|(_, r)| r.is_end()).count(), 1);
        assert_eq!(g.node(g.origin_room().unwrap()).pos(), GridPos::new(5, 5));

        let dump = g.to_string();
        let mut again = graph(20260826);
        again.generate_map(GridPos::new(5, 5)).unwrap();
        assert_eq!(dump, again.to_string());
    }

    #[test]
    fn test_connectivity_via_links() {
        for seed in 0..50 {
            let mut g = graph(seed);
            g.generate_map(GridPos::new(5, 5)).unwrap();

            let reachable = g.connected_rooms();
            assert_eq!(reachable.len(), g.room_count(), "seed {seed}");
        }
    }

    #[test]
    fn test_hallway_spacing_invariant() {
        for seed in 0..50 {
            let mut g = graph(seed);
            g.generate_map(GridPos::new(5, 5)).unwrap();

            for (_, hall) in g.halls() {
                let origin = hall.origin.expect("generated halls link two rooms");
                let end = hall.end.expect("generated halls link two rooms");
                let po = g.node(origin).pos();
                let pe = g.node(end).pos();

                let dx = (po.x - pe.x).abs();
                let dy = (po.y - pe.y).abs();
                assert!(
                    (dx == 2 && dy == 0) || (dx == 0 && dy == 2),
                    "linked rooms must be 2 apart on one axis, got {po} and {pe}"
                );
                assert_eq!(hall.pos.distance(po), 1.0);
                assert_eq!(hall.pos.distance(pe), 1.0);
            }
        }
    }

    #[test]
    fn test_dump_symbols() {
        let mut g = graph(99);
        g.generate_map(GridPos::new(5, 5)).unwrap();

        let dump = g.to_string();
        assert_eq!(dump.lines().count(), 11);
        for line in dump.lines() {
            assert_eq!(line.chars().count(), 11);
            for c in line.chars() {
                assert!(matches!(c, 'O' | 'E' | 'S' | 'R' | 'H' | ' '), "bad symbol {c:?}");
            }
        }
        // The end tag can fall back onto the origin when no distant dead
        // end exists; the origin symbol wins, so E shows at most once.
        assert_eq!(dump.matches('O').count(), 1);
        assert!(dump.matches('E').count() <= 1);
    }

    #[test]
    fn test_extra_halls_never_break_occupancy() {
        // Max out the supplemental pass to stress midpoint collisions
        let config = GraphConfig {
            extra_halls_chance: 1.0,
            ..GraphConfig::default()
        };
        let mut g = TileGraph::new(config, MapRng::new(4242)).unwrap();
        g.generate_map(GridPos::new(5, 5)).unwrap();

        let mut occupied = 0;
        for y in 0..11 {
            for x in 0..11 {
                if g.node_at(GridPos::new(x, y)).is_some() {
                    occupied += 1;
                }
            }
        }
        assert_eq!(occupied, g.room_count() + g.hall_count());
    }
}
