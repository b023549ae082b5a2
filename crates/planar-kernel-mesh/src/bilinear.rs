//! Bilinear transfinite interpolation on four-sided patches.

use planar_kernel_math::Point2;

use crate::{Element, MeshError, MeshGenerator, PatchMesh, Result};

/// Structured quad mesh blended from the four sides of a patch.
///
/// Nodes live on a logical `(nv + 1) x (nu + 1)` grid indexed
/// `i * (nu + 1) + j`, where `i` runs across the `nv` direction.
#[derive(Debug, Clone, Default)]
pub struct TransfinBilinear {
    nu: usize,
    nv: usize,
}

impl TransfinBilinear {
    /// A generator with no loop configuration.
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, i: usize, j: usize) -> usize {
        i * (self.nu + 1) + j
    }
}

impl MeshGenerator for TransfinBilinear {
    fn name(&self) -> &'static str {
        "transfinite bilinear"
    }

    fn set_loops(&mut self, loops: &[Vec<usize>]) -> bool {
        self.nu = 0;
        self.nv = 0;
        let [sides] = loops else {
            return false;
        };
        let [s0, s1, s2, s3] = sides.as_slice() else {
            return false;
        };
        if s0 != s2 || s1 != s3 || *s0 == 0 || *s1 == 0 {
            return false;
        }
        self.nu = *s0;
        self.nv = *s1;
        true
    }

    fn generate_mesh(&self, boundary: &[Point2]) -> Result<PatchMesh> {
        let (nu, nv) = (self.nu, self.nv);
        if nu == 0 || nv == 0 {
            return Err(MeshError::NotConfigured(self.name()));
        }
        let expected = 2 * (nu + nv);
        if boundary.len() != expected {
            return Err(MeshError::BoundaryCountMismatch {
                expected,
                found: boundary.len(),
            });
        }

        let mut pts = vec![Point2::origin(); (nu + 1) * (nv + 1)];

        // Walk the boundary counter-clockwise from corner (0, 0).
        let mut k = 0;
        for j in 0..nu {
            pts[self.node(0, j)] = boundary[k];
            k += 1;
        }
        for i in 0..nv {
            pts[self.node(i, nu)] = boundary[k];
            k += 1;
        }
        for j in (1..=nu).rev() {
            pts[self.node(nv, j)] = boundary[k];
            k += 1;
        }
        for i in (1..=nv).rev() {
            pts[self.node(i, 0)] = boundary[k];
            k += 1;
        }

        let c00 = pts[self.node(0, 0)].coords;
        let c0n = pts[self.node(0, nu)].coords;
        let cn0 = pts[self.node(nv, 0)].coords;
        let cnn = pts[self.node(nv, nu)].coords;

        for i in 1..nv {
            let v = i as f64 / nv as f64;
            for j in 1..nu {
                let u = j as f64 / nu as f64;
                let rows = pts[self.node(0, j)].coords * (1.0 - v) + pts[self.node(nv, j)].coords * v;
                let cols = pts[self.node(i, 0)].coords * (1.0 - u) + pts[self.node(i, nu)].coords * u;
                let corners = c00 * ((1.0 - u) * (1.0 - v))
                    + c0n * (u * (1.0 - v))
                    + cn0 * ((1.0 - u) * v)
                    + cnn * (u * v);
                pts[self.node(i, j)] = Point2::from(rows + cols - corners);
            }
        }

        let mut elements = Vec::with_capacity(nu * nv);
        for i in 0..nv {
            for j in 0..nu {
                elements.push(Element::Quad([
                    self.node(i, j),
                    self.node(i, j + 1),
                    self.node(i + 1, j + 1),
                    self.node(i + 1, j),
                ]));
            }
        }

        log::debug!(
            "transfinite bilinear mesh: {} nodes, {} quads",
            pts.len(),
            elements.len()
        );
        Ok(PatchMesh {
            points: pts,
            elements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_boundary() -> Vec<Point2> {
        [
            (0.0, 0.0),
            (0.5, 0.0),
            (1.0, 0.0),
            (1.0, 0.5),
            (1.0, 1.0),
            (0.5, 1.0),
            (0.0, 1.0),
            (0.0, 0.5),
        ]
        .iter()
        .map(|&(x, y)| Point2::new(x, y))
        .collect()
    }

    #[test]
    fn test_set_loops_shape() {
        let mut g = TransfinBilinear::new();
        assert!(g.set_loops(&[vec![2, 3, 2, 3]]));
        assert!(!g.set_loops(&[vec![2, 3, 2, 4]]));
        assert!(!g.set_loops(&[vec![2, 2, 2]]));
        assert!(!g.set_loops(&[vec![2, 2, 2, 2], vec![1, 1, 1, 1]]));
        assert!(!g.set_loops(&[]));
    }

    #[test]
    fn test_unit_square_two_by_two() {
        let mut g = TransfinBilinear::new();
        assert!(g.set_loops(&[vec![2, 2, 2, 2]]));
        let mesh = g.generate_mesh(&square_boundary()).unwrap();
        assert_eq!(mesh.num_points(), 9);
        assert_eq!(mesh.num_elements(), 4);
        let center = mesh.points[g.node(1, 1)];
        assert_relative_eq!(center.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(center.y, 0.5, epsilon = 1e-12);
        assert_relative_eq!(mesh.area(), 1.0, epsilon = 1e-12);
        for e in &mesh.elements {
            assert!(mesh.element_area(e) > 0.0);
        }
    }

    #[test]
    fn test_boundary_count_mismatch() {
        let mut g = TransfinBilinear::new();
        assert!(g.set_loops(&[vec![2, 2, 2, 2]]));
        let err = g.generate_mesh(&square_boundary()[..7]).unwrap_err();
        assert_eq!(
            err,
            MeshError::BoundaryCountMismatch {
                expected: 8,
                found: 7
            }
        );
    }

    #[test]
    fn test_unconfigured_generator_fails() {
        let g = TransfinBilinear::new();
        assert!(matches!(
            g.generate_mesh(&square_boundary()),
            Err(MeshError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_rectangular_grid_interior() {
        // 3 x 1 grid on a 3 x 1 rectangle: interior nodes stay on the sides.
        let boundary: Vec<Point2> = [
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (3.0, 1.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (0.0, 1.0),
        ]
        .iter()
        .map(|&(x, y)| Point2::new(x, y))
        .collect();
        let mut g = TransfinBilinear::new();
        assert!(g.set_loops(&[vec![3, 1, 3, 1]]));
        let mesh = g.generate_mesh(&boundary).unwrap();
        assert_eq!(mesh.num_elements(), 3);
        assert_relative_eq!(mesh.area(), 3.0, epsilon = 1e-12);
    }
}
