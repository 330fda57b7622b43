// ============================================================
// Layer 2 - Parameter Export Pipeline
// ============================================================
// Pulls the selected layers out of a trained model and turns
// them into the header set the C inference kernel includes.
//
//   Step 1: validate geometry and selectors
//   Step 2: resolve every selector against the model
//   Step 3: reorder weights for the kernel   (Layer 4 - reshaper)
//   Step 4: check shapes, padding and pooling against the geometry
//   Step 5: format arrays, emit headers      (Layer 4 - formatter, header)
//   Step 6: write all headers                (Layer 5 - header_writer)
//
// Steps 1 to 5 happen entirely in memory. Nothing reaches the
// output directory unless every selector succeeded, so a failed
// run leaves the previous generation of headers in place.

use serde::{Deserialize, Serialize};
use std::{fmt, path::{Path, PathBuf}};

use crate::codegen::{
    definitions::{conv_dims, definitions, dense_dims, DEFINITIONS_FILE},
    formatter::{c_float, ArrayFormatter},
    header::{Declaration, Dim, GeneratedFile, HeaderEmitter},
    reshaper::{conv_weights, dense_weights, FlattenGeometry},
};
use crate::domain::{
    error::{ExportError, ExportResult},
    geometry::NetworkGeometry,
    model::{Layer, LayerKind, NamedParameterSet},
    tensor::Tensor,
    traits::TrainedModel,
};
use crate::infra::header_writer::HeaderWriter;

pub const DEFAULT_PROVENANCE: &str =
    "This file is auto-generated by cnn-param-export.\nDo not edit it by hand.";

// ─── Layer Selectors ──────────────────────────────────────────────────────────
/// Where a selector looks for its layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerRef {
    Index(usize),
    Name(String),
}

impl fmt::Display for LayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerRef::Index(i) => write!(f, "index {i}"),
            LayerRef::Name(n)  => write!(f, "name '{n}'"),
        }
    }
}

/// Names one parameterised layer to export and where its arrays go.
///
/// `label` becomes the C identifiers `<label>_weights` and
/// `<label>_biases`. An `optional` selector whose layer is missing
/// is skipped instead of failing the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSelector {
    pub layer: LayerRef,
    pub kind:  LayerKind,
    pub label: String,
    pub file:  String,
    #[serde(default)]
    pub optional: bool,
}

impl LayerSelector {
    pub fn new(
        layer: LayerRef,
        kind:  LayerKind,
        label: impl Into<String>,
        file:  impl Into<String>,
    ) -> Self {
        Self { layer, kind, label: label.into(), file: file.into(), optional: false }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// The layers of the reference network: convolution at index 1,
/// dense at index 4.
pub fn default_selectors() -> Vec<LayerSelector> {
    vec![
        LayerSelector::new(LayerRef::Index(1), LayerKind::Convolution, "conv", "conv_weights.h"),
        LayerSelector::new(LayerRef::Index(4), LayerKind::Dense, "dense", "dense_weights.h"),
    ]
}

/// Reject selector sets that could not produce a compilable header set.
pub fn validate_selectors(selectors: &[LayerSelector]) -> ExportResult<()> {
    let mut labels: Vec<&str> = Vec::with_capacity(selectors.len());

    for s in selectors {
        if !is_c_identifier(&s.label) {
            return Err(ExportError::InvalidConfig(format!(
                "selector label '{}' is not a valid C identifier",
                s.label
            )));
        }
        if labels.contains(&s.label.as_str()) {
            return Err(ExportError::InvalidConfig(format!(
                "selector label '{}' is used more than once",
                s.label
            )));
        }
        labels.push(&s.label);

        if !s.kind.has_parameters() {
            return Err(ExportError::InvalidConfig(format!(
                "selector '{}' expects a {} layer, which has no parameters",
                s.label, s.kind
            )));
        }

        if !s.file.ends_with(".h") || s.file.len() <= 2 || s.file.contains(['/', '\\']) {
            return Err(ExportError::InvalidConfig(format!(
                "selector '{}' targets '{}', expected a plain .h file name",
                s.label, s.file
            )));
        }
        if s.file == DEFINITIONS_FILE {
            return Err(ExportError::InvalidConfig(format!(
                "selector '{}' cannot target {DEFINITIONS_FILE}",
                s.label
            )));
        }
    }
    Ok(())
}

fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// ─── Export Report ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path:         PathBuf,
    pub declarations: usize,
    pub bytes:        usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSelector {
    pub label:    String,
    pub selector: String,
    pub reason:   String,
}

/// What an export run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub output_dir: PathBuf,
    pub files:      Vec<FileReport>,
    pub skipped:    Vec<SkippedSelector>,
}

/// Headers rendered in memory, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHeaders {
    /// (file name, header text, declaration count), definitions.h first
    pub files:   Vec<(String, String, usize)>,
    pub skipped: Vec<SkippedSelector>,
}

// ─── ParamExportPipeline ──────────────────────────────────────────────────────
pub struct ParamExportPipeline {
    geometry:   NetworkGeometry,
    formatter:  ArrayFormatter,
    emitter:    HeaderEmitter,
    provenance: String,
}

impl ParamExportPipeline {
    pub fn new(geometry: NetworkGeometry) -> Self {
        Self {
            geometry,
            formatter:  ArrayFormatter::default(),
            emitter:    HeaderEmitter::default(),
            provenance: DEFAULT_PROVENANCE.to_string(),
        }
    }

    pub fn with_formatter(mut self, formatter: ArrayFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_emitter(mut self, emitter: HeaderEmitter) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn with_provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = provenance.into();
        self
    }

    /// Render every header and write the set into `output_dir`.
    pub fn export<M: TrainedModel>(
        &self,
        model:      &M,
        selectors:  &[LayerSelector],
        output_dir: &Path,
    ) -> ExportResult<ExportReport> {
        let rendered = self.render(model, selectors)?;

        let contents: Vec<(String, String)> = rendered
            .files
            .iter()
            .map(|(name, text, _)| (name.clone(), text.clone()))
            .collect();
        let written = HeaderWriter::new(output_dir).write_all(&contents)?;

        let files = written
            .into_iter()
            .zip(&rendered.files)
            .map(|(w, (_, _, declarations))| FileReport {
                path:         w.path,
                declarations: *declarations,
                bytes:        w.bytes,
            })
            .collect();

        Ok(ExportReport {
            output_dir: output_dir.to_path_buf(),
            files,
            skipped: rendered.skipped,
        })
    }

    /// Build the text of every header without touching the filesystem.
    pub fn render<M: TrainedModel>(
        &self,
        model:     &M,
        selectors: &[LayerSelector],
    ) -> ExportResult<RenderedHeaders> {
        self.geometry.validate()?;
        validate_selectors(selectors)?;

        let mut defs = GeneratedFile::new(DEFINITIONS_FILE, &self.provenance);
        for d in definitions(&self.geometry) {
            defs.push(d);
        }
        let mut groups: Vec<GeneratedFile> = vec![defs];
        let mut skipped = Vec::new();

        for selector in selectors {
            let Some(layer) = resolve(model, &selector.layer) else {
                if selector.optional {
                    tracing::warn!(
                        "Skipping optional selector '{}': no layer at {}",
                        selector.label, selector.layer
                    );
                    skipped.push(SkippedSelector {
                        label:    selector.label.clone(),
                        selector: selector.layer.to_string(),
                        reason:   "layer not found".to_string(),
                    });
                    continue;
                }
                return Err(ExportError::LayerNotFound {
                    label:    selector.label.clone(),
                    selector: selector.layer.to_string(),
                });
            };

            let [weights, biases] = self.declarations_for(layer, selector)?;

            let group = match groups.iter().position(|g| g.file_name == selector.file) {
                Some(i) => &mut groups[i],
                None => {
                    groups.push(
                        GeneratedFile::new(&selector.file, &self.provenance).include(DEFINITIONS_FILE),
                    );
                    let last = groups.len() - 1;
                    &mut groups[last]
                }
            };
            group.push(weights);
            group.push(biases);
        }

        self.check_structure(model)?;

        let files = groups
            .iter()
            .map(|g| (g.file_name.clone(), self.emitter.emit(g), g.declarations.len()))
            .collect();

        Ok(RenderedHeaders { files, skipped })
    }

    /// Weight and bias declarations for one selected layer.
    fn declarations_for(&self, layer: &Layer, selector: &LayerSelector) -> ExportResult<[Declaration; 2]> {
        let label = &selector.label;

        if layer.kind() != selector.kind {
            return Err(ExportError::LayerKindMismatch {
                label:    label.clone(),
                selector: selector.layer.to_string(),
                expected: selector.kind,
                actual:   layer.kind(),
            });
        }
        let Some((weights, biases)) = layer.parameters() else {
            return Err(ExportError::InvalidConfig(format!(
                "layer '{}' selected for '{label}' has no parameters",
                layer.name()
            )));
        };
        let set = NamedParameterSet::new(label.as_str(), weights, biases)?;
        tracing::info!(
            "Resolved '{}' to layer '{}' ({}) at {}",
            label, layer.name(), layer.kind(), selector.layer
        );

        let g = &self.geometry;
        let (out, (weight_dims, bias_dims), expected_weights, expected_biases) = match selector.kind {
            LayerKind::Convolution => (
                conv_weights(&set.weights)?,
                conv_dims(),
                vec![g.filters, g.kernel_rows, g.kernel_cols],
                vec![g.filters],
            ),
            LayerKind::Dense => (
                dense_weights(&set.weights, FlattenGeometry::from(g))?,
                dense_dims(),
                vec![g.flat_size(), g.dense_size],
                vec![g.dense_size],
            ),
            other => {
                return Err(ExportError::InvalidConfig(format!(
                    "no weight transform for {other} layers"
                )))
            }
        };

        if out.shape() != expected_weights.as_slice() {
            return Err(ExportError::shape(format!("{label} weights"), &expected_weights, out.shape()));
        }
        if set.biases.shape() != expected_biases.as_slice() {
            return Err(ExportError::shape(format!("{label} biases"), &expected_biases, set.biases.shape()));
        }
        tracing::debug!(
            "'{}' weights {:?} -> {:?}, biases {:?}",
            label, set.weights.shape(), out.shape(), set.biases.shape()
        );

        Ok([
            self.array(format!("{label} layer weights"), format!("{label}_weights"), weight_dims, &out),
            self.array(format!("{label} layer biases"), format!("{label}_biases"), bias_dims, &set.biases),
        ])
    }

    /// Padding and pooling layers must match the geometry the headers declare.
    fn check_structure<M: TrainedModel>(&self, model: &M) -> ExportResult<()> {
        let g = &self.geometry;
        for layer in model.layers() {
            match layer {
                Layer::ZeroPadding { name, padding } => {
                    let (rows, cols) = g.padding();
                    if *padding != rows || *padding != cols {
                        return Err(ExportError::shape(
                            format!("layer '{name}' padding per side"),
                            &[rows, cols],
                            &[*padding, *padding],
                        ));
                    }
                }
                Layer::Pooling { name, pool_rows, pool_cols } => {
                    if (*pool_rows, *pool_cols) != (g.pool_rows, g.pool_cols) {
                        return Err(ExportError::shape(
                            format!("layer '{name}' pool window"),
                            &[g.pool_rows, g.pool_cols],
                            &[*pool_rows, *pool_cols],
                        ));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn array(&self, label: String, name: String, dims: Vec<Dim>, tensor: &Tensor) -> Declaration {
        Declaration::ArrayDecl { label, name, dims, body: self.formatter.format(tensor, c_float) }
    }
}

fn resolve<'m, M: TrainedModel>(model: &'m M, layer: &LayerRef) -> Option<&'m Layer> {
    match layer {
        LayerRef::Index(i) => model.layer_at(*i),
        LayerRef::Name(n)  => model.layer_named(n),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::header::IncludeGuard;
    use crate::domain::model::SequentialModel;
    use std::fs;
    use tempfile::tempdir;

    /// 4x4 input, 3x3 kernel, 2 filters, 2x2 pool, 3 outputs → flat size 8
    fn small_geometry() -> NetworkGeometry {
        NetworkGeometry {
            input_rows:  4,
            input_cols:  4,
            kernel_rows: 3,
            kernel_cols: 3,
            filters:     2,
            pool_rows:   2,
            pool_cols:   2,
            dense_size:  3,
        }
    }

    fn conv_layer() -> Layer {
        Layer::Convolution {
            name:    "convolution_layer".into(),
            weights: Tensor::from_fn(vec![3, 3, 1, 2], |i| (i[3] * 100 + i[0] * 10 + i[1]) as f32)
                .unwrap(),
            biases:  Tensor::new(vec![2], vec![0.5, -0.5]).unwrap(),
        }
    }

    fn dense_layer() -> Layer {
        Layer::Dense {
            name:    "dense_layer".into(),
            weights: Tensor::from_fn(vec![8, 3], |i| (i[0] * 10 + i[1]) as f32).unwrap(),
            biases:  Tensor::new(vec![3], vec![0.25, 0.0, -1.0]).unwrap(),
        }
    }

    fn small_model() -> SequentialModel {
        SequentialModel::new(vec![
            Layer::ZeroPadding { name: "padding_layer".into(), padding: 1 },
            conv_layer(),
            Layer::Pooling { name: "max_pooling_layer".into(), pool_rows: 2, pool_cols: 2 },
            Layer::Flatten { name: "flatten_layer".into() },
            dense_layer(),
        ])
    }

    fn pipeline() -> ParamExportPipeline {
        ParamExportPipeline::new(small_geometry())
    }

    #[test]
    fn test_export_writes_definitions_then_groups() {
        let dir    = tempdir().unwrap();
        let report = pipeline().export(&small_model(), &default_selectors(), dir.path()).unwrap();

        let names: Vec<String> = report
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["definitions.h", "conv_weights.h", "dense_weights.h"]);
        assert_eq!(report.files[0].declarations, 16);
        assert_eq!(report.files[1].declarations, 2);
        assert!(report.skipped.is_empty());

        let defs = fs::read_to_string(dir.path().join("definitions.h")).unwrap();
        assert!(defs.contains("#pragma once\n"));
        assert!(defs.contains("#define FILTERS 2\n"));
        assert!(defs.contains("#define FLAT_SIZE (FILTERS * POOL_IMG_ROWS * POOL_IMG_COLS)\n"));
    }

    #[test]
    fn test_conv_header_content() {
        let dir = tempdir().unwrap();
        pipeline().export(&small_model(), &default_selectors(), dir.path()).unwrap();
        let text = fs::read_to_string(dir.path().join("conv_weights.h")).unwrap();

        assert!(text.contains("#include \"definitions.h\"\n"));
        assert!(text.contains(
            "// Conv layer weights.\nfloat conv_weights[FILTERS][KRN_ROWS][KRN_COLS] = {\n\
             \t{\n\t\t{ 0.0, 1.0, 2.0 },\n\t\t{ 10.0, 11.0, 12.0 },"
        ));
        // Second filter starts with in[0][0][0][1]
        assert!(text.contains("\t{\n\t\t{ 100.0, 101.0, 102.0 },"));
        assert!(text.contains("// Conv layer biases.\nfloat conv_biases[FILTERS] = { 0.5, -0.5 };\n"));
    }

    #[test]
    fn test_dense_header_rows_are_filter_major() {
        let dir = tempdir().unwrap();
        pipeline().export(&small_model(), &default_selectors(), dir.path()).unwrap();
        let text = fs::read_to_string(dir.path().join("dense_weights.h")).unwrap();

        assert!(text.contains("float dense_weights[FLAT_SIZE][DENSE_SIZE] = {\n"));
        // Output row 1 (f=0, i=0, j=1) comes from input row 2
        assert!(text.contains("\t{ 0.0, 1.0, 2.0 },\n\t{ 20.0, 21.0, 22.0 },\n"));
        assert!(text.contains("float dense_biases[DENSE_SIZE] = { 0.25, 0.0, -1.0 };\n"));
    }

    #[test]
    fn test_export_is_idempotent() {
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        pipeline().export(&small_model(), &default_selectors(), a.path()).unwrap();
        pipeline().export(&small_model(), &default_selectors(), b.path()).unwrap();
        pipeline().export(&small_model(), &default_selectors(), b.path()).unwrap();

        for name in ["definitions.h", "conv_weights.h", "dense_weights.h"] {
            assert_eq!(
                fs::read(a.path().join(name)).unwrap(),
                fs::read(b.path().join(name)).unwrap(),
                "{name} differs"
            );
        }
    }

    #[test]
    fn test_kind_mismatch_leaves_previous_generation() {
        let dir = tempdir().unwrap();
        pipeline().export(&small_model(), &default_selectors(), dir.path()).unwrap();
        let before = fs::read_to_string(dir.path().join("conv_weights.h")).unwrap();

        let stale = vec![
            LayerSelector::new(LayerRef::Index(4), LayerKind::Dense, "dense", "dense_weights.h"),
            LayerSelector::new(LayerRef::Index(2), LayerKind::Convolution, "conv", "conv_weights.h"),
        ];
        let err = ParamExportPipeline::new(small_geometry())
            .with_provenance("next generation")
            .export(&small_model(), &stale, dir.path())
            .unwrap_err();

        match err {
            ExportError::LayerKindMismatch { expected, actual, .. } => {
                assert_eq!(expected, LayerKind::Convolution);
                assert_eq!(actual, LayerKind::Pooling);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_to_string(dir.path().join("conv_weights.h")).unwrap(), before);
        let defs = fs::read_to_string(dir.path().join("definitions.h")).unwrap();
        assert!(!defs.contains("next generation"));
    }

    #[test]
    fn test_kind_mismatch_into_empty_dir_writes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("Headers");
        let selectors =
            vec![LayerSelector::new(LayerRef::Index(4), LayerKind::Convolution, "conv", "conv_weights.h")];
        assert!(pipeline().export(&small_model(), &selectors, &out).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_required_layer() {
        let dir = tempdir().unwrap();
        let selectors =
            vec![LayerSelector::new(LayerRef::Index(9), LayerKind::Dense, "dense", "dense_weights.h")];
        let err = pipeline().export(&small_model(), &selectors, dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::LayerNotFound { .. }));
    }

    #[test]
    fn test_missing_optional_layer_is_skipped() {
        let dir = tempdir().unwrap();
        let mut selectors = default_selectors();
        selectors.push(
            LayerSelector::new(LayerRef::Name("dense_2".into()), LayerKind::Dense, "dense2", "dense2_weights.h")
                .optional(),
        );
        let report = pipeline().export(&small_model(), &selectors, dir.path()).unwrap();

        assert_eq!(report.files.len(), 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].label, "dense2");
        assert_eq!(report.skipped[0].selector, "name 'dense_2'");
        assert!(!dir.path().join("dense2_weights.h").exists());
    }

    #[test]
    fn test_select_by_name_and_share_a_file() {
        let selectors = vec![
            LayerSelector::new(LayerRef::Name("dense_layer".into()), LayerKind::Dense, "dense", "weights.h"),
            LayerSelector::new(LayerRef::Name("convolution_layer".into()), LayerKind::Convolution, "conv", "weights.h"),
        ];
        let rendered = pipeline().render(&small_model(), &selectors).unwrap();

        assert_eq!(rendered.files.len(), 2);
        let (name, text, count) = &rendered.files[1];
        assert_eq!(name, "weights.h");
        assert_eq!(*count, 4);
        let dense_at = text.find("float dense_weights").unwrap();
        let conv_at  = text.find("float conv_weights").unwrap();
        assert!(dense_at < conv_at);
    }

    #[test]
    fn test_geometry_disagreement_is_shape_mismatch() {
        let geometry = NetworkGeometry { kernel_rows: 5, kernel_cols: 5, ..small_geometry() };
        let err = ParamExportPipeline::new(geometry)
            .render(&small_model(), &default_selectors())
            .unwrap_err();
        match err {
            ExportError::ShapeMismatch { context, expected, actual } => {
                assert_eq!(context, "conv weights");
                assert_eq!(expected, vec![2, 5, 5]);
                assert_eq!(actual, vec![2, 3, 3]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pool_window_must_match_geometry() {
        let mut model = small_model();
        model.layers[2] = Layer::Pooling { name: "max_pooling_layer".into(), pool_rows: 3, pool_cols: 3 };
        let dir = tempdir().unwrap();
        let err = pipeline().export(&model, &default_selectors(), dir.path()).unwrap_err();
        match err {
            ExportError::ShapeMismatch { context, expected, actual } => {
                assert_eq!(context, "layer 'max_pooling_layer' pool window");
                assert_eq!(expected, vec![2, 2]);
                assert_eq!(actual, vec![3, 3]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("definitions.h").exists());
    }

    #[test]
    fn test_padding_must_match_kernel() {
        let mut model = small_model();
        model.layers[0] = Layer::ZeroPadding { name: "padding_layer".into(), padding: 2 };
        let err = pipeline().render(&model, &default_selectors()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::ShapeMismatch { ref context, .. } if context == "layer 'padding_layer' padding per side"
        ));
    }

    #[test]
    fn test_non_finite_weight_rejected() {
        let mut model = small_model();
        model.layers[4] = Layer::Dense {
            name:    "dense_layer".into(),
            weights: Tensor::from_fn(vec![8, 3], |i| if i[0] == 5 && i[1] == 1 { f32::INFINITY } else { 0.0 })
                .unwrap(),
            biases:  Tensor::new(vec![3], vec![0.0; 3]).unwrap(),
        };
        let err = pipeline().render(&model, &default_selectors()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::NonFiniteValue { tensor: "weights", index: 16, .. }
        ));
    }

    #[test]
    fn test_macro_guard_and_custom_indent() {
        let rendered = ParamExportPipeline::new(small_geometry())
            .with_emitter(HeaderEmitter::new(IncludeGuard::Macro))
            .with_formatter(ArrayFormatter::new("    "))
            .render(&small_model(), &default_selectors())
            .unwrap();
        let (_, text, _) = &rendered.files[2];
        assert!(text.contains("#ifndef DENSE_WEIGHTS_H\n"));
        assert!(text.contains("\n    { 0.0, 1.0, 2.0 },\n"));
        assert!(text.ends_with("#endif /* DENSE_WEIGHTS_H */\n"));
    }

    #[test]
    fn test_report_serialises() {
        let dir    = tempdir().unwrap();
        let report = pipeline().export(&small_model(), &default_selectors(), dir.path()).unwrap();
        let json   = serde_json::to_value(&report).unwrap();
        assert_eq!(json["files"].as_array().unwrap().len(), 3);
        assert_eq!(json["files"][2]["declarations"], 2);
    }

    #[test]
    fn test_selector_validation() {
        let ok = |label: &str, kind, file: &str| {
            validate_selectors(&[LayerSelector::new(LayerRef::Index(1), kind, label, file)])
        };
        assert!(ok("conv", LayerKind::Convolution, "conv_weights.h").is_ok());
        assert!(ok("1conv", LayerKind::Convolution, "conv_weights.h").is_err());
        assert!(ok("conv-1", LayerKind::Convolution, "conv_weights.h").is_err());
        assert!(ok("pool", LayerKind::Pooling, "pool.h").is_err());
        assert!(ok("conv", LayerKind::Convolution, "conv_weights.c").is_err());
        assert!(ok("conv", LayerKind::Convolution, "definitions.h").is_err());
        assert!(ok("conv", LayerKind::Convolution, "../conv.h").is_err());

        let dup = vec![
            LayerSelector::new(LayerRef::Index(1), LayerKind::Convolution, "conv", "a.h"),
            LayerSelector::new(LayerRef::Index(4), LayerKind::Dense, "conv", "b.h"),
        ];
        assert!(matches!(validate_selectors(&dup), Err(ExportError::InvalidConfig(_))));
    }

    #[test]
    fn test_selector_json_accepts_index_or_name() {
        let json = r#"[
            { "layer": 1, "kind": "convolution", "label": "conv", "file": "conv_weights.h" },
            { "layer": "dense_layer", "kind": "dense", "label": "dense",
              "file": "dense_weights.h", "optional": true }
        ]"#;
        let selectors: Vec<LayerSelector> = serde_json::from_str(json).unwrap();
        assert_eq!(selectors[0].layer, LayerRef::Index(1));
        assert!(!selectors[0].optional);
        assert_eq!(selectors[1].layer, LayerRef::Name("dense_layer".into()));
        assert!(selectors[1].optional);
    }
}
