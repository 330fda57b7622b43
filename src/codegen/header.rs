// ============================================================
// Layer 4 - Header Emitter
// ============================================================
// Turns a GeneratedFile (an ordered list of declarations) into
// the text of a C header:
//
//   /*
//    * <provenance>
//    */
//
//   #pragma once                  (or #ifndef / #define guard)
//
//   #include "definitions.h"
//
//   // Conv layer weights.
//   float conv_weights[FILTERS][KRN_ROWS][KRN_COLS] = {
//   	...
//   };
//
// Every declaration is emitted, in order, with a comment line
// built from its label. A file with no declarations is still a
// valid header.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the generated header protects against double inclusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeGuard {
    #[default]
    PragmaOnce,
    /// #ifndef NAME_H / #define NAME_H / #endif
    Macro,
}

/// Right-hand side of a #define
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstValue {
    Int(usize),
    /// Preprocessor arithmetic over other constants, e.g. "(IMG_ROWS / POOL_ROWS)"
    Expr(String),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(v)  => write!(f, "{v}"),
            ConstValue::Expr(e) => f.write_str(e),
        }
    }
}

/// One array dimension: a constant's name or a literal size
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dim {
    Named(String),
    Literal(usize),
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Named(n)   => f.write_str(n),
            Dim::Literal(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    ConstantDef {
        label: String,
        name:  String,
        value: ConstValue,
    },
    ArrayDecl {
        label: String,
        name:  String,
        dims:  Vec<Dim>,
        /// Initializer text produced by the ArrayFormatter
        body:  String,
    },
}

impl Declaration {
    pub fn constant(label: impl Into<String>, name: impl Into<String>, value: usize) -> Self {
        Declaration::ConstantDef {
            label: label.into(),
            name:  name.into(),
            value: ConstValue::Int(value),
        }
    }

    pub fn derived(label: impl Into<String>, name: impl Into<String>, expr: impl Into<String>) -> Self {
        Declaration::ConstantDef {
            label: label.into(),
            name:  name.into(),
            value: ConstValue::Expr(expr.into()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Declaration::ConstantDef { label, .. } | Declaration::ArrayDecl { label, .. } => label,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Declaration::ConstantDef { name, .. } | Declaration::ArrayDecl { name, .. } => name,
        }
    }
}

/// A header assembled in memory, ready to be emitted and written once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the output directory, e.g. "conv_weights.h"
    pub file_name:    String,
    pub provenance:   String,
    pub includes:     Vec<String>,
    pub declarations: Vec<Declaration>,
}

impl GeneratedFile {
    pub fn new(file_name: impl Into<String>, provenance: impl Into<String>) -> Self {
        Self {
            file_name:    file_name.into(),
            provenance:   provenance.into(),
            includes:     Vec::new(),
            declarations: Vec::new(),
        }
    }

    pub fn include(mut self, header: impl Into<String>) -> Self {
        self.includes.push(header.into());
        self
    }

    pub fn push(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }
}

// ─── HeaderEmitter ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEmitter {
    guard: IncludeGuard,
}

impl HeaderEmitter {
    pub fn new(guard: IncludeGuard) -> Self {
        Self { guard }
    }

    pub fn emit(&self, file: &GeneratedFile) -> String {
        let body_len: usize = file
            .declarations
            .iter()
            .map(|d| match d {
                Declaration::ArrayDecl { body, .. } => body.len() + 64,
                Declaration::ConstantDef { .. } => 64,
            })
            .sum();
        let mut out = String::with_capacity(body_len + 256);
        self.emit_into(&mut out, file);
        out
    }

    /// Append the complete header text for `file` to `out`.
    pub fn emit_into(&self, out: &mut String, file: &GeneratedFile) {
        out.push_str("/*\n");
        for line in file.provenance.lines() {
            if line.is_empty() {
                out.push_str(" *\n");
            } else {
                out.push_str(" * ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str(" */\n\n");

        let macro_name = guard_macro(&file.file_name);
        match self.guard {
            IncludeGuard::PragmaOnce => out.push_str("#pragma once\n"),
            IncludeGuard::Macro => {
                out.push_str(&format!("#ifndef {macro_name}\n#define {macro_name}\n"));
            }
        }

        if !file.includes.is_empty() {
            out.push('\n');
            for header in &file.includes {
                out.push_str(&format!("#include \"{header}\"\n"));
            }
        }

        for declaration in &file.declarations {
            out.push('\n');
            out.push_str(&format!("// {}.\n", capitalize(declaration.label())));
            match declaration {
                Declaration::ConstantDef { name, value, .. } => {
                    out.push_str(&format!("#define {name} {value}\n"));
                }
                Declaration::ArrayDecl { name, dims, body, .. } => {
                    out.push_str("float ");
                    out.push_str(name);
                    for dim in dims {
                        out.push_str(&format!("[{dim}]"));
                    }
                    out.push_str(" = ");
                    out.push_str(body);
                    out.push_str(";\n");
                }
            }
        }

        if self.guard == IncludeGuard::Macro {
            out.push_str(&format!("\n#endif /* {macro_name} */\n"));
        }
    }
}

/// "conv layer weights" → "Conv layer weights"
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "conv_weights.h" → "CONV_WEIGHTS_H"
fn guard_macro(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}
