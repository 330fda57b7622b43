// ============================================================
// Layer 3 - Tensor Domain Type
// ============================================================
// An owned, immutable rank-N array of f32 values.
//
//   shape   ordered list of positive dimensions
//   values  flat buffer, row-major (last axis varies fastest)
//
// The buffer length always equals the product of the shape.
// This is checked once at construction, including when a tensor
// is deserialised from a model file, so every other module can
// index without re-checking.
//
// Example: shape [2, 3]
//   values [a, b, c, d, e, f]  →  [[a, b, c],
//                                  [d, e, f]]
//   offset([1, 2]) = 1 * 3 + 2 = 5  →  f

use serde::{Deserialize, Serialize};

use crate::domain::error::{ExportError, ExportResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTensor", into = "RawTensor")]
pub struct Tensor {
    shape:  Vec<usize>,
    values: Vec<f32>,
}

/// Wire form of a tensor in the model file, validated into a Tensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTensor {
    pub shape:  Vec<usize>,
    pub values: Vec<f32>,
}

impl TryFrom<RawTensor> for Tensor {
    type Error = ExportError;

    fn try_from(raw: RawTensor) -> ExportResult<Self> {
        Tensor::new(raw.shape, raw.values)
    }
}

impl From<Tensor> for RawTensor {
    fn from(t: Tensor) -> Self {
        RawTensor { shape: t.shape, values: t.values }
    }
}

impl Tensor {
    /// Build a tensor, rejecting zero-sized dimensions and buffers
    /// whose length disagrees with the shape.
    pub fn new(shape: Vec<usize>, values: Vec<f32>) -> ExportResult<Self> {
        if shape.iter().any(|&d| d == 0) {
            return Err(ExportError::shape(
                "tensor shape (dimensions must be positive)",
                &[],
                &shape,
            ));
        }
        let expected = element_count(&shape).ok_or_else(|| overflow(&shape))?;
        if values.len() != expected {
            return Err(ExportError::shape(
                format!("tensor buffer for shape {shape:?}"),
                &[expected],
                &[values.len()],
            ));
        }
        Ok(Self { shape, values })
    }

    /// Rank-0 tensor holding a single value
    pub fn scalar(value: f32) -> Self {
        Self { shape: Vec::new(), values: vec![value] }
    }

    /// Build a tensor whose value at each index is `f(index)`.
    /// Handy for tests that need to know where every value came from.
    pub fn from_fn(shape: Vec<usize>, mut f: impl FnMut(&[usize]) -> f32) -> ExportResult<Self> {
        let total = element_count(&shape).ok_or_else(|| overflow(&shape))?;
        let mut values = Vec::with_capacity(total);
        let mut index  = vec![0usize; shape.len()];
        for _ in 0..total {
            values.push(f(&index));
            advance(&mut index, &shape);
        }
        Self::new(shape, values)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Row-major strides: stride[k] = product of shape[k+1..]
    pub fn strides(&self) -> Vec<usize> {
        row_major_strides(&self.shape)
    }

    /// Flat offset of a multi-index, or None if it is out of bounds
    pub fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0usize;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        Some(offset)
    }

    pub fn get(&self, index: &[usize]) -> Option<f32> {
        self.offset(index).map(|o| self.values[o])
    }

    /// Reinterpret the same row-major buffer under a new shape.
    /// The element count must not change.
    pub fn reshaped(self, shape: Vec<usize>) -> ExportResult<Self> {
        let total = element_count(&shape).ok_or_else(|| overflow(&shape))?;
        if total != self.values.len() {
            return Err(ExportError::shape(
                format!("reshape of {:?} into {shape:?}", self.shape),
                &[self.values.len()],
                &[total],
            ));
        }
        Self::new(shape, self.values)
    }

    /// Position of the first NaN or infinite value, if any
    pub fn first_non_finite(&self) -> Option<usize> {
        self.values.iter().position(|v| !v.is_finite())
    }
}

/// Number of elements a shape holds, or None if it does not fit in usize
pub fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

fn overflow(shape: &[usize]) -> ExportError {
    ExportError::shape("tensor shape (element count overflows usize)", &[], shape)
}

/// Strides of a row-major buffer with the given shape
pub fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; shape.len()];
    for k in (0..shape.len().saturating_sub(1)).rev() {
        strides[k] = strides[k + 1] * shape[k + 1];
    }
    strides
}

/// Step a multi-index to its row-major successor (odometer order).
/// Wraps to all zeros after the last index.
pub fn advance(index: &mut [usize], shape: &[usize]) {
    for k in (0..shape.len()).rev() {
        index[k] += 1;
        if index[k] < shape[k] {
            return;
        }
        index[k] = 0;
    }
}
