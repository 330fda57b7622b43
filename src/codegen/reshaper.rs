// ============================================================
// Layer 4 - Tensor Reshaper
// ============================================================
// Reorders framework-layout tensors into the iteration order of
// the C inference kernel. Everything here is a pure function
// over owned values; nothing aliases the source tensor.
//
// Generic permutation:
//   out.shape[k] = in.shape[layout[k]]
//   out[i0..ik]  = in[j]   where j[layout[k]] = i[k]
//
// Convolution weights:
//   (kr, kc, 1, F)  --[3,0,1,2]-->  (F, kr, kc, 1)  -->  (F, kr, kc)
//   out[f][r][c] = in[r][c][0][f]
//
// Dense weights (flatten order fix):
//   the framework flattened (pr, pc, F) with filters innermost,
//   the kernel flattens with filters outermost.
//   (pr*pc*F, D) → (pr, pc, F, D) --[2,0,1,3]--> (F, pr, pc, D) → (F*pr*pc, D)
//   out[f*pr*pc + i*pc + j] = in[i*pc*F + j*F + f]

use crate::domain::error::{ExportError, ExportResult};
use crate::domain::geometry::NetworkGeometry;
use crate::domain::layout::LayoutSpec;
use crate::domain::tensor::{advance, Tensor};

/// Permute the axes of `tensor` according to `layout`.
pub fn reshape(tensor: &Tensor, layout: &LayoutSpec) -> ExportResult<Tensor> {
    layout.validate(tensor.rank())?;

    let src_strides = tensor.strides();
    let axes        = layout.axes();

    let out_shape: Vec<usize> = axes.iter().map(|&a| tensor.shape()[a]).collect();
    // Stride in the source buffer for one step along each target axis
    let walk: Vec<usize> = axes.iter().map(|&a| src_strides[a]).collect();

    let src       = tensor.values();
    let mut out   = Vec::with_capacity(src.len());
    let mut index = vec![0usize; out_shape.len()];
    for _ in 0..src.len() {
        let offset: usize = index.iter().zip(&walk).map(|(i, s)| i * s).sum();
        out.push(src[offset]);
        advance(&mut index, &out_shape);
    }

    Tensor::new(out_shape, out)
}

/// Geometry of the flatten step that feeds the dense layer.
/// Passed explicitly so the dense transform never depends on globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenGeometry {
    pub pool_rows: usize,
    pub pool_cols: usize,
    pub filters:   usize,
}

impl FlattenGeometry {
    pub fn flat_size(&self) -> usize {
        self.pool_rows * self.pool_cols * self.filters
    }
}

impl From<&NetworkGeometry> for FlattenGeometry {
    fn from(g: &NetworkGeometry) -> Self {
        Self {
            pool_rows: g.pooled_rows(),
            pool_cols: g.pooled_cols(),
            filters:   g.filters,
        }
    }
}

/// (kernel_rows, kernel_cols, 1, filters) → (filters, kernel_rows, kernel_cols)
pub fn conv_weights(weights: &Tensor) -> ExportResult<Tensor> {
    let shape = weights.shape();
    if shape.len() != 4 || shape[2] != 1 {
        let expected = match shape {
            [kr, kc, _, f] => vec![*kr, *kc, 1, *f],
            _ => Vec::new(),
        };
        return Err(ExportError::ShapeMismatch {
            context:  "convolution weights (kernel_rows, kernel_cols, 1, filters)".to_string(),
            expected,
            actual:   shape.to_vec(),
        });
    }
    let (kr, kc, f) = (shape[0], shape[1], shape[3]);

    let permuted = reshape(weights, &LayoutSpec::from_axes([3, 0, 1, 2]))?;
    permuted.reshaped(vec![f, kr, kc])
}

/// (pool_rows * pool_cols * filters, dense) with filters innermost
/// → same shape with filters outermost.
pub fn dense_weights(weights: &Tensor, geometry: FlattenGeometry) -> ExportResult<Tensor> {
    let shape = weights.shape();
    let flat  = geometry.flat_size();
    if shape.len() != 2 || shape[0] != flat {
        let dense = shape.get(1).copied().unwrap_or(0);
        return Err(ExportError::ShapeMismatch {
            context: format!(
                "dense weights flattened from ({}, {}, {})",
                geometry.pool_rows, geometry.pool_cols, geometry.filters
            ),
            expected: vec![flat, dense],
            actual:   shape.to_vec(),
        });
    }
    let dense = shape[1];

    let FlattenGeometry { pool_rows, pool_cols, filters } = geometry;
    let volume   = weights.clone().reshaped(vec![pool_rows, pool_cols, filters, dense])?;
    let permuted = reshape(&volume, &LayoutSpec::from_axes([2, 0, 1, 3]))?;
    permuted.reshaped(vec![flat, dense])
}
