//! Edge label placement by iterative candidate search. Starting from the
//! preferred offset along the edge normal, widening rings of candidates are
//! tried (normal, opposite normal, tangent, opposite tangent, diagonal
//! blends) until one clears every node rectangle and every label placed so
//! far. When nothing clears, the label stays at the edge midpoint.

use super::types::{Point, Rect, rects_intersect};

pub(super) struct LabelPlacer {
    obstacles: Vec<Rect>,
    placed: Vec<Rect>,
}

impl LabelPlacer {
    pub fn new(obstacles: Vec<Rect>) -> Self {
        Self {
            obstacles,
            placed: Vec::new(),
        }
    }

    /// Finds a center point for a `width` x `height` label near `mid`.
    /// `normal` and `tangent` are unit vectors for the owning edge.
    pub fn place(
        &mut self,
        mid: Point,
        normal: Point,
        tangent: Point,
        width: f32,
        height: f32,
        base_gap: f32,
        attempts: usize,
    ) -> Point {
        let inv_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        let directions: [Point; 8] = [
            normal,
            (-normal.0, -normal.1),
            tangent,
            (-tangent.0, -tangent.1),
            (
                (normal.0 + tangent.0) * inv_sqrt2,
                (normal.1 + tangent.1) * inv_sqrt2,
            ),
            (
                (normal.0 - tangent.0) * inv_sqrt2,
                (normal.1 - tangent.1) * inv_sqrt2,
            ),
            (
                (tangent.0 - normal.0) * inv_sqrt2,
                (tangent.1 - normal.1) * inv_sqrt2,
            ),
            (
                (-normal.0 - tangent.0) * inv_sqrt2,
                (-normal.1 - tangent.1) * inv_sqrt2,
            ),
        ];

        for ring in 1..=attempts {
            let offset = base_gap + (ring as f32 - 1.0) * base_gap * 0.8;
            for dir in directions {
                let center = (mid.0 + dir.0 * offset, mid.1 + dir.1 * offset);
                let rect = (center.0 - width / 2.0, center.1 - height / 2.0, width, height);
                if self.is_free(rect) {
                    self.placed.push(rect);
                    return center;
                }
            }
        }

        // Every candidate collided; accept the midpoint as-is.
        let rect = (mid.0 - width / 2.0, mid.1 - height / 2.0, width, height);
        self.placed.push(rect);
        mid
    }

    fn is_free(&self, rect: Rect) -> bool {
        self.obstacles
            .iter()
            .chain(self.placed.iter())
            .all(|other| !rects_intersect(rect, *other))
    }
}
