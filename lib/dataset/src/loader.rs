//! JSON file loading
//!
//! Reads the files produced by the record source:
//!
//! - params: `{ "<task>": [ { "<field>": <value>, ... }, ... ], ... }`
//! - scores: `{ "<task>": [ <score>, ... ], ... }` (numbers or numeric strings)
//! - qualities: `{ "<task>": { "<quality>": <value>, ... }, ... }`
//! - description: a list of field descriptions, or an OpenML flow document
//!   `{ "flow": { "parameter": [ ... ] } }`
//! - vectors: `[ [ <f64>, ... ], ... ]`

use paramvec_core::{Error, RecordBatch, Result, Value, Vector};
use paramvec_schema::FieldDescription;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Scores per task, one per run, in run order
pub type Scores = BTreeMap<String, Vec<f64>>;

/// Dataset qualities per task
pub type Qualities = BTreeMap<String, BTreeMap<String, Value>>;

#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptionDocument {
    Fields(Vec<FieldDescription>),
    Flow { flow: FlowDocument },
}

#[derive(Deserialize)]
struct FlowDocument {
    parameter: Vec<FieldDescription>,
}

fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading JSON");
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

pub fn load_records<P: AsRef<Path>>(path: P) -> Result<RecordBatch> {
    read_json(path)
}

pub fn load_scores<P: AsRef<Path>>(path: P) -> Result<Scores> {
    let raw: BTreeMap<String, Vec<Value>> = read_json(path)?;
    raw.into_iter()
        .map(|(task, values)| {
            let scores = values
                .iter()
                .map(|v| {
                    v.as_number().ok_or_else(|| Error::InvalidNumber {
                        field: format!("score of task {}", task),
                        value: v.to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok((task, scores))
        })
        .collect()
}

pub fn load_qualities<P: AsRef<Path>>(path: P) -> Result<Qualities> {
    read_json(path)
}

pub fn load_description<P: AsRef<Path>>(path: P) -> Result<Vec<FieldDescription>> {
    let document: DescriptionDocument = read_json(path)?;
    Ok(match document {
        DescriptionDocument::Fields(fields) => fields,
        DescriptionDocument::Flow { flow } => flow.parameter,
    })
}

pub fn load_vectors<P: AsRef<Path>>(path: P) -> Result<Vec<Vector>> {
    read_json(path)
}
