// ============================================================
// Layer 3 - Network Geometry
// ============================================================
// The fixed dimensions the hand-written inference kernel was
// compiled against. They become the base constants of
// definitions.h and are the explicit parameters of the dense
// weight transform.
//
//   image      input_rows × input_cols (single channel)
//   conv       kernel_rows × kernel_cols, `filters` output maps,
//              "same" output thanks to (kernel - 1) zero padding
//   pool       pool_rows × pool_cols, non-overlapping
//   flatten    filters × pooled_rows × pooled_cols
//   dense      dense_size outputs (one per class)

use serde::{Deserialize, Serialize};

use crate::domain::error::{ExportError, ExportResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkGeometry {
    pub input_rows:  usize,
    pub input_cols:  usize,
    pub kernel_rows: usize,
    pub kernel_cols: usize,
    pub filters:     usize,
    pub pool_rows:   usize,
    pub pool_cols:   usize,
    pub dense_size:  usize,
}

impl Default for NetworkGeometry {
    fn default() -> Self {
        Self {
            input_rows:  28,
            input_cols:  28,
            kernel_rows: 7,
            kernel_cols: 7,
            filters:     4,
            pool_rows:   2,
            pool_cols:   2,
            dense_size:  10,
        }
    }
}

impl NetworkGeometry {
    /// Reject geometries the inference kernel cannot run.
    pub fn validate(&self) -> ExportResult<()> {
        let fields = [
            ("input_rows",  self.input_rows),
            ("input_cols",  self.input_cols),
            ("kernel_rows", self.kernel_rows),
            ("kernel_cols", self.kernel_cols),
            ("filters",     self.filters),
            ("pool_rows",   self.pool_rows),
            ("pool_cols",   self.pool_cols),
            ("dense_size",  self.dense_size),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(ExportError::InvalidConfig(format!("{name} must be greater than 0")));
            }
        }

        // The kernel pads by (KRN - 1) split evenly on both sides
        if self.kernel_rows % 2 == 0 || self.kernel_cols % 2 == 0 {
            return Err(ExportError::InvalidConfig(format!(
                "kernel dimensions must be odd, got {}x{}",
                self.kernel_rows, self.kernel_cols
            )));
        }

        if self.input_rows % self.pool_rows != 0 || self.input_cols % self.pool_cols != 0 {
            return Err(ExportError::InvalidConfig(format!(
                "input {}x{} is not divisible by pool {}x{}",
                self.input_rows, self.input_cols, self.pool_rows, self.pool_cols
            )));
        }

        // FLAT_SIZE and the dense weight matrix must be addressable
        let dense_elements = self
            .filters
            .checked_mul(self.pooled_rows())
            .and_then(|n| n.checked_mul(self.pooled_cols()))
            .and_then(|n| n.checked_mul(self.dense_size));
        if dense_elements.is_none() {
            return Err(ExportError::InvalidConfig(format!(
                "flattened size {} x {}x{} with {} outputs overflows usize",
                self.filters,
                self.pooled_rows(),
                self.pooled_cols(),
                self.dense_size
            )));
        }

        Ok(())
    }

    pub fn pooled_rows(&self) -> usize {
        self.input_rows / self.pool_rows
    }

    pub fn pooled_cols(&self) -> usize {
        self.input_cols / self.pool_cols
    }

    /// Length of the flattened pooling output fed to the dense layer
    pub fn flat_size(&self) -> usize {
        self.filters * self.pooled_rows() * self.pooled_cols()
    }

    /// Zero padding applied on each side before the convolution
    pub fn padding(&self) -> (usize, usize) {
        (self.kernel_rows / 2, self.kernel_cols / 2)
    }
}
