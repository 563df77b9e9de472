//! Geometry kernel: rectangles, triangles and the circle-vs-spike test
//!
//! All coordinates are world units with y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `2 * half` centered on `center`
    pub fn centered(center: Vec2, half: f32) -> Self {
        Self::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Strict AABB overlap; rectangles that only share an edge do not overlap
#[inline]
pub fn rect_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// A triangle given by its three corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Vec2,
    pub b: Vec2,
    pub c: Vec2,
}

impl Triangle {
    pub const fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self { a, b, c }
    }

    /// Bounding box as (min, max) corners
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (
            self.a.min(self.b).min(self.c),
            self.a.max(self.b).max(self.c),
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        point_in_triangle(p, self.a, self.b, self.c)
    }

    /// The three edges in winding order
    pub fn edges(&self) -> [(Vec2, Vec2); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }
}

/// Which side of the line through `a`-`b` the point `p` is on
#[inline]
fn edge_sign(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
}

/// Sign-of-cross-product containment test
///
/// A point counts as inside when all three edge signs agree on `< 0`. Points
/// exactly on an edge produce a zero sign and are resolved the same way every
/// time, for either winding.
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let b0 = edge_sign(p, a, b) < 0.0;
    let b1 = edge_sign(p, b, c) < 0.0;
    let b2 = edge_sign(p, c, a) < 0.0;
    b0 == b1 && b1 == b2
}

/// Distance from `p` to the closest point of segment `s1`-`s2`
pub fn distance_point_to_segment(p: Vec2, s1: Vec2, s2: Vec2) -> f32 {
    let seg = s2 - s1;
    let to_p = p - s1;

    let c1 = seg.dot(to_p);
    if c1 <= 0.0 {
        return p.distance(s1);
    }

    let c2 = seg.length_squared();
    if c2 <= c1 {
        return p.distance(s2);
    }

    let t = c1 / c2;
    p.distance(s1 + seg * t)
}

/// Does a circle touch or overlap a triangle?
///
/// Center-in-triangle alone misses circles grazing a thin spike, so every
/// edge is also checked against the radius.
pub fn circle_hits_triangle(center: Vec2, radius: f32, triangle: &Triangle) -> bool {
    let (min, max) = triangle.bounds();
    if center.x < min.x - radius
        || center.x > max.x + radius
        || center.y < min.y - radius
        || center.y > max.y + radius
    {
        return false;
    }

    if triangle.contains(center) {
        return true;
    }

    triangle
        .edges()
        .iter()
        .any(|&(s1, s2)| distance_point_to_segment(center, s1, s2) <= radius)
}
