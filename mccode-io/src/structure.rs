//! NeXus structure descriptors for the file-writer histogram module.
//!
//! The file writer subscribes to a topic and writes each streamed
//! histogram into a dataset. Its configuration names the topic and source,
//! the serialisation module, the element types, and one edge descriptor per
//! histogram axis.

use mccode_core::{DimensionDescriptor, Schema};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Source name shared by every histogram from this converter.
pub const DEFAULT_SOURCE: &str = "mccode-to-kafka";

/// Element type of a streamed array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Uint32,
    Uint64,
    Float,
    Double,
}

/// One axis of the writer-module shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    /// Number of bins.
    pub size: usize,
    pub label: String,
    pub unit: String,
    /// `size + 1` bin edges.
    pub edges: Vec<f64>,
    /// Dataset written for this axis.
    pub dataset_name: String,
}

impl EdgeDescriptor {
    /// Uses the computed bin boundaries of a parsed axis as its edges.
    #[must_use]
    pub fn from_dimension(dimension: &DimensionDescriptor, dataset_name: impl Into<String>) -> Self {
        Self {
            size: dimension.length,
            label: dimension.label.clone(),
            unit: dimension.unit.clone(),
            edges: dimension.bin_boundaries.clone(),
            dataset_name: dataset_name.into(),
        }
    }
}

/// Builds an axis with `bins + 1` edges spanning `[lower, upper]`.
#[must_use]
pub fn edge(
    bins: usize,
    lower: f64,
    upper: f64,
    label: &str,
    unit: &str,
    dataset_name: &str,
) -> EdgeDescriptor {
    EdgeDescriptor {
        size: bins,
        label: label.to_string(),
        unit: unit.to_string(),
        edges: Array1::linspace(lower, upper, bins + 1).to_vec(),
        dataset_name: dataset_name.to_string(),
    }
}

/// Writer-module configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramConfig {
    pub topic: String,
    pub source: String,
    pub data_type: ElementType,
    pub error_type: ElementType,
    pub edge_type: ElementType,
    pub shape: Vec<EdgeDescriptor>,
}

/// Module entry in the NeXus structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NexusStructure {
    pub module: Schema,
    pub config: HistogramConfig,
}

/// Builds the NeXus structure entry for a histogram stream.
///
/// McCode files always hold floating point text and are read as `f64`, so
/// every element type is `double`.
#[must_use]
pub fn nexus_structure(
    topic: &str,
    shape: Vec<EdgeDescriptor>,
    source: Option<&str>,
    module: Option<Schema>,
) -> NexusStructure {
    NexusStructure {
        module: module.unwrap_or_default(),
        config: HistogramConfig {
            topic: topic.to_string(),
            source: source.unwrap_or(DEFAULT_SOURCE).to_string(),
            data_type: ElementType::Double,
            error_type: ElementType::Double,
            edge_type: ElementType::Double,
            shape,
        },
    }
}

/// Options for deriving a structure from parsed dimension metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureOptions {
    pub topic: String,
    pub source: Option<String>,
    pub module: Schema,
    /// Prefix of the per-axis dataset names, e.g. `x_axis`.
    pub dataset_prefix: Option<String>,
}

impl StructureOptions {
    /// Options for `topic` with default source, module and dataset names.
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            source: None,
            module: Schema::default(),
            dataset_prefix: None,
        }
    }

    /// Set the source name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the serialisation module.
    #[must_use]
    pub fn with_module(mut self, module: Schema) -> Self {
        self.module = module;
        self
    }

    /// Set the dataset name prefix.
    #[must_use]
    pub fn with_dataset_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dataset_prefix = Some(prefix.into());
        self
    }
}

/// Builds the structure entry for parsed axes, named `x_axis`, `y_axis`.
#[must_use]
pub fn structure_for_dimensions(
    dimensions: &[DimensionDescriptor],
    options: &StructureOptions,
) -> NexusStructure {
    let shape = dimensions
        .iter()
        .zip(["x", "y"])
        .map(|(dimension, axis)| {
            let name = match &options.dataset_prefix {
                Some(prefix) => format!("{prefix}_{axis}_axis"),
                None => format!("{axis}_axis"),
            };
            EdgeDescriptor::from_dimension(dimension, name)
        })
        .collect();
    nexus_structure(
        &options.topic,
        shape,
        options.source.as_deref(),
        Some(options.module),
    )
}
