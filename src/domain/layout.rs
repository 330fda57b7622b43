// ============================================================
// Layer 3 - Layout Spec
// ============================================================
// Describes a reordering of tensor axes. Entry k names the
// SOURCE axis that becomes target axis k:
//
//   source shape (7, 7, 1, 4), layout [3, 0, 1, 2]
//   target shape (4, 7, 7, 1)
//
// A layout is only meaningful for a tensor of the same rank and
// must be a permutation of 0..rank. Construction stores the axes
// as given; `validate` is called by the reshaper before use so a
// bad layout surfaces as a ShapeMismatch with full context.

use crate::domain::error::{ExportError, ExportResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSpec {
    axes: Vec<usize>,
}

impl LayoutSpec {
    pub fn from_axes(axes: impl Into<Vec<usize>>) -> Self {
        Self { axes: axes.into() }
    }

    /// Layout that leaves every axis in place
    pub fn identity(rank: usize) -> Self {
        Self { axes: (0..rank).collect() }
    }

    pub fn axes(&self) -> &[usize] {
        &self.axes
    }

    /// Check this layout is a bijection over 0..rank.
    pub fn validate(&self, rank: usize) -> ExportResult<()> {
        if self.axes.len() != rank {
            return Err(ExportError::shape(
                format!("layout {:?} length vs tensor rank", self.axes),
                &[rank],
                &[self.axes.len()],
            ));
        }

        let mut seen = vec![false; rank];
        for &axis in &self.axes {
            if axis >= rank || seen[axis] {
                return Err(ExportError::shape(
                    format!("layout is not a permutation of 0..{rank}"),
                    &(0..rank).collect::<Vec<_>>(),
                    &self.axes,
                ));
            }
            seen[axis] = true;
        }
        Ok(())
    }

    /// The layout that undoes this one: inverse[axes[k]] = k
    pub fn inverse(&self) -> ExportResult<Self> {
        self.validate(self.axes.len())?;
        let mut inverse = vec![0usize; self.axes.len()];
        for (k, &axis) in self.axes.iter().enumerate() {
            inverse[axis] = k;
        }
        Ok(Self { axes: inverse })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_permutation() {
        assert!(LayoutSpec::from_axes([3, 0, 1, 2]).validate(4).is_ok());
        assert!(LayoutSpec::identity(0).validate(0).is_ok());
    }

    #[test]
    fn test_rejects_duplicate_axis() {
        let err = LayoutSpec::from_axes([0, 0, 2]).validate(3).unwrap_err();
        assert!(matches!(err, ExportError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_rejects_out_of_range_axis() {
        assert!(LayoutSpec::from_axes([0, 3, 1]).validate(3).is_err());
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(LayoutSpec::from_axes([1, 0]).validate(3).is_err());
    }

    #[test]
    fn test_inverse() {
        let p = LayoutSpec::from_axes([3, 0, 1, 2]);
        assert_eq!(p.inverse().unwrap().axes(), &[1, 2, 3, 0]);
    }

    #[test]
    fn test_inverse_of_invalid_layout_fails() {
        assert!(LayoutSpec::from_axes([1, 1]).inverse().is_err());
    }
}
