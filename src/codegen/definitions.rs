// ============================================================
// Layer 4 - definitions.h Builder
// ============================================================
// Manifest constants shared by the inference kernel and the
// weight headers. Only base sizes are literals; everything that
// can be derived is written as preprocessor arithmetic so that
// editing a base constant and recompiling stays consistent.

use crate::codegen::header::{Declaration, Dim};
use crate::domain::geometry::NetworkGeometry;

pub const DEFINITIONS_FILE: &str = "definitions.h";

// Names the C kernel is written against
pub const IMG_ROWS:      &str = "IMG_ROWS";
pub const IMG_COLS:      &str = "IMG_COLS";
pub const KRN_ROWS:      &str = "KRN_ROWS";
pub const KRN_COLS:      &str = "KRN_COLS";
pub const FILTERS:       &str = "FILTERS";
pub const POOL_ROWS:     &str = "POOL_ROWS";
pub const POOL_COLS:     &str = "POOL_COLS";
pub const POOL_IMG_ROWS: &str = "POOL_IMG_ROWS";
pub const POOL_IMG_COLS: &str = "POOL_IMG_COLS";
pub const FLAT_SIZE:     &str = "FLAT_SIZE";
pub const DENSE_SIZE:    &str = "DENSE_SIZE";

/// Declarations of definitions.h, in emission order.
pub fn definitions(g: &NetworkGeometry) -> Vec<Declaration> {
    vec![
        Declaration::derived("number of output classes", "DIGITS", format!("({DENSE_SIZE})")),
        // Image.
        Declaration::constant("input image rows", IMG_ROWS, g.input_rows),
        Declaration::constant("input image columns", IMG_COLS, g.input_cols),
        // Padding.
        Declaration::derived("padding rows", "PAD_ROWS", format!("({KRN_ROWS} - 1)")),
        Declaration::derived("padding columns", "PAD_COLS", format!("({KRN_COLS} - 1)")),
        Declaration::derived("padded image rows", "PAD_IMG_ROWS", format!("({IMG_ROWS} + PAD_ROWS)")),
        Declaration::derived("padded image columns", "PAD_IMG_COLS", format!("({IMG_COLS} + PAD_COLS)")),
        // Convolution.
        Declaration::constant("convolution kernel rows", KRN_ROWS, g.kernel_rows),
        Declaration::constant("convolution kernel columns", KRN_COLS, g.kernel_cols),
        Declaration::constant("convolution filters", FILTERS, g.filters),
        // Pooling.
        Declaration::constant("pool window rows", POOL_ROWS, g.pool_rows),
        Declaration::constant("pool window columns", POOL_COLS, g.pool_cols),
        Declaration::derived("pooled image rows", POOL_IMG_ROWS, format!("({IMG_ROWS} / {POOL_ROWS})")),
        Declaration::derived("pooled image columns", POOL_IMG_COLS, format!("({IMG_COLS} / {POOL_COLS})")),
        // Flatten.
        Declaration::derived(
            "flattened size",
            FLAT_SIZE,
            format!("({FILTERS} * {POOL_IMG_ROWS} * {POOL_IMG_COLS})"),
        ),
        // Dense.
        Declaration::constant("dense layer outputs", DENSE_SIZE, g.dense_size),
    ]
}

/// Symbolic dimensions of the transformed convolution arrays
pub fn conv_dims() -> (Vec<Dim>, Vec<Dim>) {
    (
        vec![named(FILTERS), named(KRN_ROWS), named(KRN_COLS)],
        vec![named(FILTERS)],
    )
}

/// Symbolic dimensions of the transformed dense arrays
pub fn dense_dims() -> (Vec<Dim>, Vec<Dim>) {
    (vec![named(FLAT_SIZE), named(DENSE_SIZE)], vec![named(DENSE_SIZE)])
}

fn named(name: &str) -> Dim {
    Dim::Named(name.to_string())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::header::ConstValue;

    fn value_of<'a>(decls: &'a [Declaration], wanted: &str) -> &'a ConstValue {
        decls
            .iter()
            .find_map(|d| match d {
                Declaration::ConstantDef { name, value, .. } if name == wanted => Some(value),
                _ => None,
            })
            .unwrap_or_else(|| panic!("missing {wanted}"))
    }

    #[test]
    fn test_base_constants_are_literals() {
        let decls = definitions(&NetworkGeometry::default());
        assert_eq!(value_of(&decls, "IMG_ROWS"), &ConstValue::Int(28));
        assert_eq!(value_of(&decls, "KRN_COLS"), &ConstValue::Int(7));
        assert_eq!(value_of(&decls, "FILTERS"), &ConstValue::Int(4));
        assert_eq!(value_of(&decls, "DENSE_SIZE"), &ConstValue::Int(10));
    }

    #[test]
    fn test_derived_constants_are_expressions() {
        let decls = definitions(&NetworkGeometry::default());
        for name in ["DIGITS", "PAD_ROWS", "PAD_IMG_COLS", "POOL_IMG_ROWS", "FLAT_SIZE"] {
            assert!(
                matches!(value_of(&decls, name), ConstValue::Expr(_)),
                "{name} should be derived"
            );
        }
        assert_eq!(
            value_of(&decls, "FLAT_SIZE"),
            &ConstValue::Expr("(FILTERS * POOL_IMG_ROWS * POOL_IMG_COLS)".into())
        );
    }

    #[test]
    fn test_names_are_unique() {
        let decls = definitions(&NetworkGeometry::default());
        let mut names: Vec<&str> = decls.iter().map(Declaration::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), decls.len());
    }
}
