//! # Quadtree Spatial Index
//!
//! Capacity-bounded recursive quad-partition over a bounded region.
//!
//! Entities are stored as a point plus a caller-supplied payload (usually
//! an index into an entity list). A query returns every payload whose
//! point lies inside the query rectangle; it does NOT consider the
//! entity's own extent, so callers run their exact overlap test on the
//! candidate set afterwards.
//!
//! The tree is rebuilt from scratch each tick rather than updated in
//! place; build cost is linear in the (small) live entity count.

use crate::math::{Aabb, Vec2};

/// Deepest subdivision level; past this a node holds any overflow.
///
/// Caps recursion when many points share one location.
const MAX_DEPTH: u8 = 8;

/// A quadtree node storing point entities with `Copy` payloads.
#[derive(Clone, Debug)]
pub struct Quadtree<T> {
    /// Region this node covers.
    boundary: Aabb,
    /// Points held directly by this node.
    points: Vec<(Vec2, T)>,
    /// Maximum points before subdivision.
    capacity: usize,
    /// Subdivision level of this node.
    depth: u8,
    /// Child quadrants, in NE/NW/SE/SW order once subdivided.
    children: Option<Box<[Quadtree<T>; 4]>>,
}

impl<T: Copy> Quadtree<T> {
    /// Creates an empty tree covering `boundary`.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn new(boundary: Aabb, capacity: usize) -> Self {
        Self {
            boundary,
            points: Vec::new(),
            capacity: capacity.max(1),
            depth: 0,
            children: None,
        }
    }

    /// Region covered by this tree.
    #[must_use]
    pub const fn boundary(&self) -> Aabb {
        self.boundary
    }

    /// Inserts a point entity.
    ///
    /// Returns `false` (and stores nothing) if the point lies outside
    /// this tree's boundary.
    pub fn insert(&mut self, point: Vec2, value: T) -> bool {
        if !self.boundary.contains_point(point) {
            return false;
        }
        if self.points.len() < self.capacity || self.depth >= MAX_DEPTH {
            self.points.push((point, value));
            return true;
        }
        if self.children.is_none() {
            self.subdivide();
        }
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.insert(point, value) {
                    return true;
                }
            }
        }
        // Half-open quadrants tile the parent exactly, so a contained
        // point always lands in some child.
        false
    }

    /// Collects every payload whose point lies inside `area`.
    pub fn query_into(&self, area: &Aabb, out: &mut Vec<T>) {
        if !self.boundary.overlaps(area) {
            return;
        }
        for (point, value) in &self.points {
            if area.contains_point(*point) {
                out.push(*value);
            }
        }
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.query_into(area, out);
            }
        }
    }

    /// Convenience wrapper around [`Quadtree::query_into`].
    #[must_use]
    pub fn query(&self, area: &Aabb) -> Vec<T> {
        let mut out = Vec::new();
        self.query_into(area, &mut out);
        out
    }

    /// Total number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut total = self.points.len();
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                total += child.len();
            }
        }
        total
    }

    /// Whether the tree holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn subdivide(&mut self) {
        let center = self.boundary.center();
        let min = self.boundary.min;
        let max = self.boundary.max;
        let child = |quadrant: Aabb| Self {
            boundary: quadrant,
            points: Vec::new(),
            capacity: self.capacity,
            depth: self.depth + 1,
            children: None,
        };
        self.children = Some(Box::new([
            // NE
            child(Aabb::new(Vec2::new(center.x, min.y), Vec2::new(max.x, center.y))),
            // NW
            child(Aabb::new(min, center)),
            // SE
            child(Aabb::new(center, max)),
            // SW
            child(Aabb::new(Vec2::new(min.x, center.y), Vec2::new(center.x, max.y))),
        ]));
    }
}
