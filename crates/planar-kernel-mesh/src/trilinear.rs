//! Trilinear transfinite interpolation on three-sided patches.

use planar_kernel_math::{area2, Point2};

use crate::{orient_and_dedup, MeshError, MeshGenerator, PatchMesh, Result};

const DEGENERATE_AREA: f64 = 1e-12;

/// Structured triangle mesh blended from the three equal sides of a patch.
///
/// Nodes are packed into a triangular array: row `i` holds `(i, 0) ..= (i, n - i)`.
#[derive(Debug, Clone, Default)]
pub struct TransfinTrilinear {
    n: usize,
}

impl TransfinTrilinear {
    /// A generator with no loop configuration.
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, i: usize, j: usize) -> usize {
        i * (2 * self.n - i + 3) / 2 + j
    }
}

fn lerp(a: &Point2, b: &Point2, u: f64) -> Point2 {
    a + (b - a) * u
}

impl MeshGenerator for TransfinTrilinear {
    fn name(&self) -> &'static str {
        "transfinite trilinear"
    }

    fn set_loops(&mut self, loops: &[Vec<usize>]) -> bool {
        self.n = 0;
        let [sides] = loops else {
            return false;
        };
        let [s0, s1, s2] = sides.as_slice() else {
            return false;
        };
        if s0 != s1 || s0 != s2 || *s0 == 0 {
            return false;
        }
        self.n = *s0;
        true
    }

    fn generate_mesh(&self, boundary: &[Point2]) -> Result<PatchMesh> {
        let n = self.n;
        if n == 0 {
            return Err(MeshError::NotConfigured(self.name()));
        }
        if boundary.len() != 3 * n {
            return Err(MeshError::BoundaryCountMismatch {
                expected: 3 * n,
                found: boundary.len(),
            });
        }

        let mut pts = vec![Point2::origin(); (n + 1) * (n + 2) / 2];

        // Sides: (0,0)->(0,n), then (0,n)->(n,0) along i + j = n, then (n,0)->(0,0).
        let mut k = 0;
        for j in 0..n {
            pts[self.node(0, j)] = boundary[k];
            k += 1;
        }
        for i in 0..n {
            pts[self.node(i, n - i)] = boundary[k];
            k += 1;
        }
        for i in (1..=n).rev() {
            pts[self.node(i, 0)] = boundary[k];
            k += 1;
        }

        for i in 1..n {
            for j in 1..(n - i) {
                let p1 = lerp(
                    &pts[self.node(0, j)],
                    &pts[self.node(n - j, j)],
                    i as f64 / (n - j) as f64,
                );
                let p2 = lerp(
                    &pts[self.node(i, 0)],
                    &pts[self.node(i, n - i)],
                    j as f64 / (n - i) as f64,
                );
                let p3 = lerp(
                    &pts[self.node(0, i + j)],
                    &pts[self.node(i + j, 0)],
                    i as f64 / (i + j) as f64,
                );
                pts[self.node(i, j)] = Point2::from((p1.coords + p2.coords + p3.coords) / 3.0);
            }
        }

        let mut tris = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..(n - i) {
                tris.push([self.node(i, j), self.node(i, j + 1), self.node(i + 1, j)]);
            }
        }
        for i in 0..n.saturating_sub(1) {
            for j in 0..(n - i - 1) {
                tris.push([self.node(i + 1, j), self.node(i + 1, j + 1), self.node(i, j + 1)]);
            }
        }

        let reference = area2(
            &pts[self.node(0, 0)],
            &pts[self.node(0, n)],
            &pts[self.node(n, 0)],
        );
        let sign = if reference >= 0.0 { 1.0 } else { -1.0 };
        let elements = orient_and_dedup(&pts, &tris, sign, DEGENERATE_AREA);

        log::debug!(
            "transfinite trilinear mesh: {} nodes, {} triangles",
            pts.len(),
            elements.len()
        );
        Ok(PatchMesh {
            points: pts,
            elements,
        })
    }
}
