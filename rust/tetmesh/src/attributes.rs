// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-simplex attribute records.
//!
//! Every simplex carries a small record of mutable state. Nodes, edges and
//! faces pack their boolean state into a single flag word whose layout is
//! private to this module; callers only see named accessors. Nodes also carry
//! their current position and the destination they are being moved towards.
//! Tetrahedra carry a region label.
//!
//! | Kind | Bit 0 | Bit 1 | Bit 2 | Bit 3 | Bit 4 |
//! |------|-------|-------|-------|-------|-------|
//! | Node, Edge | crossing | boundary | interface | | |
//! | Face | locked | boundary | processed | interface | error |

use nalgebra::Point3;

/// Packed boolean flags. Setting one bit never disturbs another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
struct FlagWord(u8);

impl FlagWord {
    #[inline]
    fn get(self, bit: u8) -> bool {
        self.0 & (1 << bit) != 0
    }

    #[inline]
    fn set(&mut self, bit: u8, on: bool) {
        if on {
            self.0 |= 1 << bit;
        } else {
            self.0 &= !(1 << bit);
        }
    }
}

const CROSSING: u8 = 0;
const NODE_BOUNDARY: u8 = 1;
const NODE_INTERFACE: u8 = 2;

const LOCKED: u8 = 0;
const FACE_BOUNDARY: u8 = 1;
const PROCESSED: u8 = 2;
const FACE_INTERFACE: u8 = 3;
const ERROR: u8 = 4;

/// State of a node: position, destination and crossing/boundary/interface flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeAttributes {
    position: Point3<f64>,
    destination: Point3<f64>,
    flags: FlagWord,
}

impl NodeAttributes {
    /// Creates a node record at `position` with no pending displacement.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            destination: position,
            flags: FlagWord::default(),
        }
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn set_position(&mut self, position: Point3<f64>) {
        self.position = position;
    }

    /// Target location of the node during deformation.
    pub fn destination(&self) -> Point3<f64> {
        self.destination
    }

    pub fn set_destination(&mut self, destination: Point3<f64>) {
        self.destination = destination;
    }

    /// Copies position, destination and all flags from `other`.
    pub fn set(&mut self, other: &NodeAttributes) {
        *self = *other;
    }

    pub fn is_crossing(&self) -> bool {
        self.flags.get(CROSSING)
    }

    pub fn is_boundary(&self) -> bool {
        self.flags.get(NODE_BOUNDARY)
    }

    pub fn is_interface(&self) -> bool {
        self.flags.get(NODE_INTERFACE)
    }

    pub fn set_crossing(&mut self, on: bool) {
        self.flags.set(CROSSING, on);
    }

    pub fn set_boundary(&mut self, on: bool) {
        self.flags.set(NODE_BOUNDARY, on);
    }

    pub fn set_interface(&mut self, on: bool) {
        self.flags.set(NODE_INTERFACE, on);
    }
}

impl Default for NodeAttributes {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}

/// State of an edge. Edges have no geometry of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EdgeAttributes {
    flags: FlagWord,
}

impl EdgeAttributes {
    pub fn is_crossing(&self) -> bool {
        self.flags.get(CROSSING)
    }

    pub fn is_boundary(&self) -> bool {
        self.flags.get(NODE_BOUNDARY)
    }

    pub fn is_interface(&self) -> bool {
        self.flags.get(NODE_INTERFACE)
    }

    pub fn set_crossing(&mut self, on: bool) {
        self.flags.set(CROSSING, on);
    }

    pub fn set_boundary(&mut self, on: bool) {
        self.flags.set(NODE_BOUNDARY, on);
    }

    pub fn set_interface(&mut self, on: bool) {
        self.flags.set(NODE_INTERFACE, on);
    }
}

/// State of a face: locked, boundary, processed, interface and error flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FaceAttributes {
    flags: FlagWord,
}

impl FaceAttributes {
    pub fn is_locked(&self) -> bool {
        self.flags.get(LOCKED)
    }

    pub fn is_boundary(&self) -> bool {
        self.flags.get(FACE_BOUNDARY)
    }

    pub fn is_processed(&self) -> bool {
        self.flags.get(PROCESSED)
    }

    pub fn is_interface(&self) -> bool {
        self.flags.get(FACE_INTERFACE)
    }

    pub fn is_error(&self) -> bool {
        self.flags.get(ERROR)
    }

    pub fn set_locked(&mut self, on: bool) {
        self.flags.set(LOCKED, on);
    }

    pub fn set_boundary(&mut self, on: bool) {
        self.flags.set(FACE_BOUNDARY, on);
    }

    pub fn set_processed(&mut self, on: bool) {
        self.flags.set(PROCESSED, on);
    }

    pub fn set_interface(&mut self, on: bool) {
        self.flags.set(FACE_INTERFACE, on);
    }

    pub fn set_error(&mut self, on: bool) {
        self.flags.set(ERROR, on);
    }
}

/// State of a tetrahedron: the label of the region it belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TetAttributes {
    pub label: u32,
}

impl TetAttributes {
    pub fn new(label: u32) -> Self {
        Self { label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type FaceFlag = (fn(&FaceAttributes) -> bool, fn(&mut FaceAttributes, bool));

    fn face_flags() -> [FaceFlag; 5] {
        [
            (FaceAttributes::is_locked, FaceAttributes::set_locked),
            (FaceAttributes::is_boundary, FaceAttributes::set_boundary),
            (FaceAttributes::is_processed, FaceAttributes::set_processed),
            (FaceAttributes::is_interface, FaceAttributes::set_interface),
            (FaceAttributes::is_error, FaceAttributes::set_error),
        ]
    }

    #[test]
    fn new_node_has_no_pending_displacement() {
        let node = NodeAttributes::new(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(node.position(), node.destination());
        assert!(!node.is_crossing());
        assert!(!node.is_boundary());
        assert!(!node.is_interface());
    }

    #[test]
    fn node_destination_is_independent_of_position() {
        let mut node = NodeAttributes::new(Point3::origin());
        node.set_destination(Point3::new(0.5, 0.0, 0.0));
        assert_eq!(node.position(), Point3::origin());

        node.set_position(Point3::new(0.25, 0.0, 0.0));
        assert_eq!(node.destination(), Point3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn node_set_copies_full_state() {
        let mut src = NodeAttributes::new(Point3::new(1.0, 0.0, 0.0));
        src.set_destination(Point3::new(2.0, 0.0, 0.0));
        src.set_boundary(true);
        src.set_interface(true);

        let mut dst = NodeAttributes::default();
        dst.set_crossing(true);
        dst.set(&src);

        assert_eq!(dst, src);
        assert!(!dst.is_crossing());
    }

    #[test]
    fn setting_face_flag_never_touches_others() {
        let flags = face_flags();
        for (i, (get_i, set_i)) in flags.iter().enumerate() {
            let mut face = FaceAttributes::default();
            set_i(&mut face, true);
            assert!(get_i(&face));
            for (j, (get_j, _)) in flags.iter().enumerate() {
                if i != j {
                    assert!(!get_j(&face), "setting flag {i} toggled flag {j}");
                }
            }

            // Clearing a single flag with every other flag set.
            let mut all = FaceAttributes::default();
            for (_, set) in &flags {
                set(&mut all, true);
            }
            set_i(&mut all, false);
            for (j, (get_j, _)) in flags.iter().enumerate() {
                assert_eq!(get_j(&all), i != j);
            }
        }
    }

    #[test]
    fn face_flag_set_then_clear_restores_word() {
        let mut face = FaceAttributes::default();
        face.set_processed(true);
        let before = face;

        face.set_error(true);
        face.set_error(false);
        assert_eq!(face, before);
    }

    #[test]
    fn edge_flags_are_independent() {
        let mut edge = EdgeAttributes::default();
        edge.set_interface(true);
        assert!(edge.is_interface());
        assert!(!edge.is_boundary());
        assert!(!edge.is_crossing());

        edge.set_crossing(true);
        edge.set_interface(false);
        assert!(edge.is_crossing());
        assert!(!edge.is_interface());

        edge.set_crossing(false);
        assert_eq!(edge, EdgeAttributes::default());
    }

    #[test]
    fn node_flag_round_trip() {
        let mut node = NodeAttributes::new(Point3::origin());
        let before = node;
        node.set_boundary(true);
        assert!(node.is_boundary());
        assert!(!node.is_crossing());
        node.set_boundary(false);
        assert_eq!(node, before);
    }

    #[test]
    fn tetrahedron_label_defaults_to_zero() {
        assert_eq!(TetAttributes::default().label, 0);
        assert_eq!(TetAttributes::new(7).label, 7);
    }
}
