//! Testcase manifest model
//!
//! The manifest (served as `testcase_header`) lists every input and output
//! file of a problem together with its declared size.

use serde::{Deserialize, Deserializer, Serialize};

/// One input or output file declared by the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDescriptor {
    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,
    /// Expected size in bytes; the only integrity check performed
    #[serde(rename = "Size", alias = "size", default)]
    pub size: i64,
}

/// Per-problem test data manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "ID", alias = "id", default)]
    pub id: String,
    #[serde(rename = "Available", alias = "available", default)]
    pub available: i64,
    #[serde(
        rename = "Input",
        alias = "input",
        default,
        deserialize_with = "null_as_default"
    )]
    pub inputs: Vec<CaseDescriptor>,
    #[serde(
        rename = "Output",
        alias = "output",
        default,
        deserialize_with = "null_as_default"
    )]
    pub outputs: Vec<CaseDescriptor>,
    #[serde(rename = "case_mapping", default, deserialize_with = "null_as_default")]
    pub case_mapping: Vec<String>,
}

impl Manifest {
    /// Decode a manifest from the raw response body
    pub fn from_slice(raw: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(raw)
    }

    /// Number of usable cases; zero unless the problem is marked available
    pub fn len(&self) -> usize {
        if self.available > 0 {
            self.inputs.len()
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descriptor of case `index` in the given direction
    pub fn descriptor(&self, index: usize, direction: Direction) -> Option<&CaseDescriptor> {
        self.descriptors(direction).get(index)
    }

    pub fn descriptors(&self, direction: Direction) -> &[CaseDescriptor] {
        match direction {
            Direction::Input => &self.inputs,
            Direction::Output => &self.outputs,
        }
    }

    /// Number of complete input/output pairs
    pub fn pair_count(&self) -> usize {
        self.inputs.len().min(self.outputs.len())
    }
}

/// Whether a case stream is the program's input or its expected output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// Value of the `type` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Direction::Input => "in",
            Direction::Output => "out",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
