// ============================================================
// Layer 4 - Array Formatter
// ============================================================
// Renders a tensor as a C brace initializer.
//
//   rank 0   1.5
//   rank 1   { 1.0, 2.0, 3.0 }
//   rank 2   {
//            	{ 1.0, 2.0 },
//            	{ 3.0, 4.0 }
//            }
//
// Higher ranks nest the same way, one indent level per depth.
// The last element at every level has no trailing comma.
// Output depends only on the values, the indent unit and the
// base depth, so regenerated headers diff cleanly.

use std::fmt::Write;

use crate::domain::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct ArrayFormatter {
    /// One level of indentation ("\t" by default)
    indent: String,
    /// Depth of the opening brace; closing braces line up with it
    base_depth: usize,
}

impl Default for ArrayFormatter {
    fn default() -> Self {
        Self::new("\t")
    }
}

impl ArrayFormatter {
    pub fn new(indent: impl Into<String>) -> Self {
        Self { indent: indent.into(), base_depth: 0 }
    }

    pub fn with_base_depth(mut self, depth: usize) -> Self {
        self.base_depth = depth;
        self
    }

    /// Render `tensor` into a fresh string.
    pub fn format<F>(&self, tensor: &Tensor, element: F) -> String
    where
        F: Fn(f32) -> String,
    {
        let mut out = String::with_capacity(tensor.len() * 16);
        self.format_into(&mut out, tensor, &element);
        out
    }

    /// Append the rendering of `tensor` to `out`.
    pub fn format_into<F>(&self, out: &mut String, tensor: &Tensor, element: &F)
    where
        F: Fn(f32) -> String,
    {
        self.render(out, tensor.shape(), tensor.values(), self.base_depth, element);
    }

    fn render<F>(&self, out: &mut String, shape: &[usize], values: &[f32], depth: usize, element: &F)
    where
        F: Fn(f32) -> String,
    {
        match shape {
            [] => out.push_str(&element(values[0])),
            [_] => {
                out.push_str("{ ");
                for (i, &v) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&element(v));
                }
                out.push_str(" }");
            }
            [outer, inner @ ..] => {
                let slice_len = inner.iter().product::<usize>();
                out.push_str("{\n");
                for (i, slice) in values.chunks(slice_len).enumerate() {
                    self.push_indent(out, depth + 1);
                    self.render(out, inner, slice, depth + 1, element);
                    if i + 1 < *outer {
                        out.push(',');
                    }
                    out.push('\n');
                }
                self.push_indent(out, depth);
                out.push('}');
            }
        }
    }

    fn push_indent(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str(&self.indent);
        }
    }
}

/// C literal for an f32: the shortest decimal that reads back as the
/// same f32, never in exponent form, always with a fractional part.
pub fn c_float(value: f32) -> String {
    let mut s = String::new();
    // Writing to a String cannot fail
    let _ = write!(s, "{value}");
    if value.is_finite() && !s.contains('.') {
        s.push_str(".0");
    }
    s
}
