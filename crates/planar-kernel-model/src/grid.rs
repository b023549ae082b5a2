//! Snapping grid for interactive input.

/// A rectangular grid with optional snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Spacing along x.
    pub dx: f64,
    /// Spacing along y.
    pub dy: f64,
    /// Whether input points are moved onto grid nodes.
    pub snap: bool,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            dx: 1.0,
            dy: 1.0,
            snap: false,
        }
    }
}

/// Nearest multiple of `step`, rounding halves towards zero.
fn snap_coord(v: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return v;
    }
    let fp = v / step;
    let ip = fp.trunc();
    let frac = fp - ip;
    let k = if frac > 0.5 {
        ip + 1.0
    } else if frac < -0.5 {
        ip - 1.0
    } else {
        ip
    };
    k * step
}

impl Grid {
    /// A grid with the given spacing and snapping on.
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy, snap: true }
    }

    /// Move `(x, y)` onto the nearest grid node when snapping is on.
    pub fn snap_to(&self, x: f64, y: f64) -> (f64, f64) {
        if !self.snap {
            return (x, y);
        }
        (snap_coord(x, self.dx), snap_coord(y, self.dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to() {
        let grid = Grid::new(0.5, 2.0);
        assert_eq!(grid.snap_to(0.8, 2.9), (1.0, 2.0));
        assert_eq!(grid.snap_to(-0.8, -3.1), (-1.0, -4.0));
        assert_eq!(grid.snap_to(0.2, 0.9), (0.0, 0.0));
    }

    #[test]
    fn test_halves_round_towards_zero() {
        let grid = Grid::new(1.0, 1.0);
        assert_eq!(grid.snap_to(2.5, -2.5), (2.0, -2.0));
    }

    #[test]
    fn test_snapping_off() {
        let grid = Grid {
            snap: false,
            ..Grid::new(1.0, 1.0)
        };
        assert_eq!(grid.snap_to(0.3, 0.7), (0.3, 0.7));
    }
}
