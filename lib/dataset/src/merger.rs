//! Training set assembly
//!
//! Joins every run's parameter vector with the standardized qualities of
//! the task it ran on, and pairs it with the run's score.

use crate::loader::{Qualities, Scores};
use paramvec_core::{Error, RecordBatch, Result, Vector};
use paramvec_schema::{Converter, EncodingConfig, FieldDescription, NumericCodec};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Inputs `x` and targets `y`, one row per run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSet {
    pub x: Vec<Vector>,
    pub y: Vec<f64>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Width of every input row
    pub fn input_dim(&self) -> usize {
        self.x.first().map_or(0, Vector::dim)
    }
}

#[derive(Debug, Clone)]
pub struct Merger {
    converter: Converter,
    /// (task, number of runs) in batch order
    tasks: Vec<(String, usize)>,
    quality_columns: Vec<String>,
    /// Standardized quality row per task, aligned with `tasks`
    quality_rows: Vec<Vector>,
    scores: Vec<f64>,
}

impl Merger {
    pub fn new(
        params: &RecordBatch,
        description: &[FieldDescription],
        scores: &Scores,
        qualities: &Qualities,
    ) -> Result<Self> {
        Self::with_config(params, description, scores, qualities, EncodingConfig::default())
    }

    pub fn with_config(
        params: &RecordBatch,
        description: &[FieldDescription],
        scores: &Scores,
        qualities: &Qualities,
        config: EncodingConfig,
    ) -> Result<Self> {
        let converter = Converter::with_config(params, description, config)?;

        let tasks: Vec<(String, usize)> = params
            .groups()
            .map(|(task, runs)| (task.to_string(), runs.len()))
            .collect();

        let mut flat_scores = Vec::with_capacity(params.len());
        for (task, runs) in &tasks {
            let task_scores = scores
                .get(task)
                .ok_or_else(|| Error::GroupNotFound(task.clone()))?;
            if task_scores.len() != *runs {
                return Err(Error::InvalidDimension {
                    expected: *runs,
                    actual: task_scores.len(),
                });
            }
            flat_scores.extend_from_slice(task_scores);
        }

        let (quality_columns, quality_rows) = standardize_qualities(&tasks, qualities)?;

        info!(
            tasks = tasks.len(),
            runs = flat_scores.len(),
            quality_columns = quality_columns.len(),
            "Merger ready"
        );

        Ok(Self {
            converter,
            tasks,
            quality_columns,
            quality_rows,
            scores: flat_scores,
        })
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Quality columns kept after dropping incomplete ones, in row order
    pub fn quality_columns(&self) -> &[String] {
        &self.quality_columns
    }

    /// Build `(x, y)`: parameter vector followed by the task's qualities
    pub fn merge(&self) -> Result<TrainingSet> {
        let vectors = self.converter.get_vectors()?;

        let quality_per_run = self
            .tasks
            .iter()
            .zip(&self.quality_rows)
            .flat_map(|((_, runs), row)| std::iter::repeat(row).take(*runs));

        let x = vectors
            .iter()
            .zip(quality_per_run)
            .map(|(params, quality)| params.concat(quality))
            .collect();

        Ok(TrainingSet {
            x,
            y: self.scores.clone(),
        })
    }
}

/// Keep quality columns that are numeric for every task, then standardize
/// each column over the tasks
fn standardize_qualities(
    tasks: &[(String, usize)],
    qualities: &Qualities,
) -> Result<(Vec<String>, Vec<Vector>)> {
    let rows = tasks
        .iter()
        .map(|(task, _)| {
            qualities
                .get(task)
                .ok_or_else(|| Error::GroupNotFound(task.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let all_columns: BTreeSet<&String> = rows.iter().flat_map(|row| row.keys()).collect();

    let mut columns = Vec::new();
    let mut values: Vec<Vec<f64>> = Vec::new();
    for column in all_columns {
        let column_values: Option<Vec<f64>> = rows
            .iter()
            .map(|row| row.get(column).and_then(|v| v.as_number()))
            .collect();
        match column_values {
            Some(v) => {
                columns.push(column.clone());
                values.push(v);
            }
            None => debug!(column = %column, "dropping quality column with missing values"),
        }
    }

    let codecs: Vec<NumericCodec> = values.iter().map(|v| NumericCodec::fit(v)).collect();

    let quality_rows = (0..rows.len())
        .map(|task| {
            Vector::new(
                values
                    .iter()
                    .zip(&codecs)
                    .map(|(column, codec)| codec.transform(column[task]))
                    .collect(),
            )
        })
        .collect();

    Ok((columns, quality_rows))
}
