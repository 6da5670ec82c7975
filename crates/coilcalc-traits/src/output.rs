//! Node Output: the value produced by one strategy evaluation.

use serde::{Deserialize, Serialize};

/// The numeric payload of a [`NodeOutput`].
///
/// A strategy may produce a single number, a 1-D series (e.g. a quantity
/// indexed only by frequency), or a 2-D table (e.g. several labeled
/// columns aligned on a shared frequency axis).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeData {
    /// A single scalar value.
    Scalar(f64),
    /// A dense 1-D series.
    Array1(Vec<f64>),
    /// A dense 2-D table, row-major: `rows[i]` is the i-th row across all
    /// columns named in `labels`.
    Array2(Vec<Vec<f64>>),
}

/// The result of one strategy evaluation: a value plus the labels and
/// units describing its columns.
///
/// `labels` and `units` are carried through verbatim; the engine never
/// interprets them. Equality is structural and used only by tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOutput {
    data: NodeData,
    labels: Vec<String>,
    units: Vec<String>,
}

impl NodeOutput {
    /// Builds a scalar output. `labels`/`units` are typically a single
    /// entry each, but are not required to be.
    pub fn scalar(value: f64, labels: Vec<String>, units: Vec<String>) -> Self {
        Self {
            data: NodeData::Scalar(value),
            labels,
            units,
        }
    }

    /// Builds a 1-D series output.
    pub fn array1(values: Vec<f64>, labels: Vec<String>, units: Vec<String>) -> Self {
        Self {
            data: NodeData::Array1(values),
            labels,
            units,
        }
    }

    /// Builds a 2-D table output.
    pub fn array2(rows: Vec<Vec<f64>>, labels: Vec<String>, units: Vec<String>) -> Self {
        Self {
            data: NodeData::Array2(rows),
            labels,
            units,
        }
    }

    /// The payload.
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Column labels, in order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Column units, in order, aligned with `labels`.
    pub fn units(&self) -> &[String] {
        &self.units
    }

    /// Convenience accessor for the common case of a scalar-valued
    /// output; returns `None` if `data` is not [`NodeData::Scalar`].
    pub fn as_scalar(&self) -> Option<f64> {
        match self.data {
            NodeData::Scalar(v) => Some(v),
            _ => None,
        }
    }
}
