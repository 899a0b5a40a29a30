//! Straight segments, concatenation, and sub-path views

use std::sync::Arc;

use crate::autodiff::{Arclength, DualNum};
use crate::geometry::{Vector2, Vector2Dual};
use crate::paths::PositionPath;

/// Straight segment parameterized by arc length
#[derive(Debug, Clone, Copy)]
pub struct Line {
    pub begin: Vector2,
    pub dir: Vector2,
    length: f64,
}

impl Line {
    pub fn new(begin: Vector2, end: Vector2) -> Self {
        let diff = end - begin;
        let length = diff.norm();
        assert!(length > 0.0, "line requires distinct begin and end points");
        Self {
            begin,
            dir: diff / length,
            length,
        }
    }
}

impl PositionPath<Arclength> for Line {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, s: f64, n: usize) -> Vector2Dual<Arclength> {
        DualNum::variable(s, n) * self.dir + self.begin
    }
}

/// Concatenation of position paths laid end to end.
///
/// Queries past either end clamp to the boundary value with zero
/// derivatives. At an interior join [`PositionPath::get`] evaluates the
/// later piece and [`PositionPath::get_left`] the earlier one; they only
/// disagree when the pieces meet discontinuously.
#[derive(Clone)]
pub struct CompositePositionPath {
    pub paths: Vec<Arc<dyn PositionPath<Arclength>>>,
    pub offsets: Vec<f64>,
    length: f64,
}

impl CompositePositionPath {
    pub fn new(paths: Vec<Arc<dyn PositionPath<Arclength>>>) -> Self {
        assert!(!paths.is_empty());
        let mut offsets = vec![0.0];
        for path in &paths {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + path.length());
        }
        let length = offsets[offsets.len() - 1];
        Self {
            paths,
            offsets,
            length,
        }
    }
}

impl PositionPath<Arclength> for CompositePositionPath {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, s: f64, n: usize) -> Vector2Dual<Arclength> {
        if s > self.length {
            let last = &self.paths[self.paths.len() - 1];
            return Vector2Dual::constant(last.end(1).value(), n);
        }

        for (i, path) in self.paths.iter().enumerate().rev() {
            let offset = self.offsets[i];
            if s >= offset {
                return path.get(s - offset, n);
            }
        }

        Vector2Dual::constant(self.paths[0].begin(1).value(), n)
    }

    fn get_left(&self, s: f64, n: usize) -> Vector2Dual<Arclength> {
        if s > self.length {
            let last = &self.paths[self.paths.len() - 1];
            return Vector2Dual::constant(last.end(1).value(), n);
        }

        for (i, path) in self.paths.iter().enumerate().rev() {
            let offset = self.offsets[i];
            if s > offset || (i == 0 && s >= offset) {
                return path.get_left(s - offset, n);
            }
        }

        Vector2Dual::constant(self.paths[0].begin(1).value(), n)
    }
}

/// View of a sub-interval of a shared position path
#[derive(Clone)]
pub struct PositionPathView {
    pub path: Arc<dyn PositionPath<Arclength>>,
    pub offset: f64,
    length: f64,
}

impl PositionPathView {
    pub fn new(path: Arc<dyn PositionPath<Arclength>>, offset: f64, length: f64) -> Self {
        Self {
            path,
            offset,
            length,
        }
    }
}

impl PositionPath<Arclength> for PositionPathView {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, s: f64, n: usize) -> Vector2Dual<Arclength> {
        self.path.get(self.offset + s, n)
    }

    fn get_left(&self, s: f64, n: usize) -> Vector2Dual<Arclength> {
        self.path.get_left(self.offset + s, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_unit_speed() {
        let line = Line::new(Vector2::new(1.0, 1.0), Vector2::new(4.0, 5.0));
        assert!((line.length() - 5.0).abs() < 1e-12);

        let p = line.get(2.5, 3);
        assert!((p.value() - Vector2::new(2.5, 3.0)).norm() < 1e-12);
        assert!((p.drop_first(1).value().norm() - 1.0).abs() < 1e-12);
        assert!(p.drop_first(2).value().norm() < 1e-12);
    }

    #[test]
    fn test_composite_dispatch_and_clamp() {
        let composite = CompositePositionPath::new(vec![
            Arc::new(Line::new(Vector2::new(0.0, 0.0), Vector2::new(2.0, 0.0))),
            Arc::new(Line::new(Vector2::new(2.0, 0.0), Vector2::new(2.0, 3.0))),
        ]);
        assert!((composite.length() - 5.0).abs() < 1e-12);
        assert_eq!(composite.offsets, vec![0.0, 2.0, 5.0]);

        // inside first and second segment
        assert!((composite.get(1.0, 1).value() - Vector2::new(1.0, 0.0)).norm() < 1e-12);
        assert!((composite.get(3.0, 1).value() - Vector2::new(2.0, 1.0)).norm() < 1e-12);

        // clamped past the end with zero derivatives
        let past = composite.get(7.0, 2);
        assert!((past.value() - Vector2::new(2.0, 3.0)).norm() < 1e-12);
        assert!(past.drop_first(1).value().norm() < 1e-12);
    }

    #[test]
    fn test_left_sided_query_at_join() {
        // tangent flips at s = 5; get takes the later piece, get_left the
        // earlier one
        let composite = CompositePositionPath::new(vec![
            Arc::new(Line::new(Vector2::new(0.0, 0.0), Vector2::new(5.0, 0.0))),
            Arc::new(Line::new(Vector2::new(5.0, 0.0), Vector2::new(0.0, 0.0))),
        ]);
        let right = composite.get(5.0, 2).drop_first(1).value();
        let left = composite.get_left(5.0, 2).drop_first(1).value();
        assert!((right - Vector2::new(-1.0, 0.0)).norm() < 1e-12);
        assert!((left - Vector2::new(1.0, 0.0)).norm() < 1e-12);

        // away from the join the two sides agree
        let a = composite.get(2.0, 2);
        let b = composite.get_left(2.0, 2);
        assert!((a.value() - b.value()).norm() < 1e-12);
        assert!((a.drop_first(1).value() - b.drop_first(1).value()).norm() < 1e-12);

        // clamps match get's
        assert!((composite.get_left(12.0, 1).value() - Vector2::new(0.0, 0.0)).norm() < 1e-12);
        assert!((composite.get_left(0.0, 1).value() - Vector2::new(0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_view_offsets_queries() {
        let base: Arc<dyn PositionPath<Arclength>> =
            Arc::new(Line::new(Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)));
        let view = PositionPathView::new(base, 4.0, 3.0);
        assert!((view.length() - 3.0).abs() < 1e-12);
        assert!((view.get(1.0, 1).value() - Vector2::new(5.0, 0.0)).norm() < 1e-12);
    }
}
