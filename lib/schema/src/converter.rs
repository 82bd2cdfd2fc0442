//! Record <-> vector converter
//!
//! Fitted once from a record batch and a field description list, then
//! reused for any number of forward and inverse calls.
//!
//! The pipeline is:
//! 1. Build the ordered [`Schema`]
//! 2. Default and cast every record ([`preprocess_batch`])
//! 3. Collect distinct values per field ([`Catalog`])
//! 4. Fit one [`FieldCodec`] per encoded field
//! 5. Derive the [`GroupSizes`] from the codecs
//!
//! Assembly and reconstruction both walk the same fitted field list, so
//! slot offsets always line up.

use crate::catalog::Catalog;
use crate::codec::FieldCodec;
use crate::config::EncodingConfig;
use crate::groups::GroupSizes;
use crate::preprocess::{preprocess_batch, preprocess_record, PreparedRecord};
use crate::schema::{FieldDescription, Schema};
use paramvec_core::{Error, Record, RecordBatch, Result, Vector};
use rayon::prelude::*;
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct FittedField {
    name: String,
    /// Position in schema order
    position: usize,
    codec: FieldCodec,
}

/// Bidirectional converter between records and flat vectors
#[derive(Debug, Clone)]
pub struct Converter {
    schema: Schema,
    config: EncodingConfig,
    fields: Vec<FittedField>,
    group_sizes: GroupSizes,
    rows: Vec<PreparedRecord>,
}

impl Converter {
    /// Fit with the default configuration
    pub fn new(batch: &RecordBatch, descriptions: &[FieldDescription]) -> Result<Self> {
        Self::with_config(batch, descriptions, EncodingConfig::default())
    }

    pub fn with_config(
        batch: &RecordBatch,
        descriptions: &[FieldDescription],
        config: EncodingConfig,
    ) -> Result<Self> {
        config.validate()?;
        let schema = Schema::from_descriptions(descriptions)?;

        if batch.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let rows = preprocess_batch(&schema, &config, batch.records())?;
        let catalog = Catalog::from_rows(&schema, &rows);

        let mut fields = Vec::new();
        for (position, field) in schema.fields().iter().enumerate() {
            if !batch.records().any(|r| r.contains_field(&field.name)) {
                debug!(field = %field.name, "field absent from fitting batch, not encoded");
                continue;
            }

            let distinct = catalog
                .get(&field.name)
                .ok_or_else(|| Error::SchemaMismatch(field.name.clone()))?;
            let codec = FieldCodec::fit(field, distinct, &config)?;

            if !codec.is_encoded() {
                debug!(
                    field = %field.name,
                    data_type = field.data_type.as_str(),
                    "field carries no encoding"
                );
                continue;
            }
            if let FieldCodec::Numeric(numeric) = &codec {
                if numeric.is_degenerate() {
                    debug!(
                        field = %field.name,
                        mean = numeric.mean(),
                        "zero-variance numeric field, centering only"
                    );
                }
            }

            fields.push(FittedField {
                name: field.name.clone(),
                position,
                codec,
            });
        }

        let group_sizes =
            GroupSizes::from_codecs(fields.iter().map(|f| (f.name.as_str(), &f.codec)));

        info!(
            records = rows.len(),
            fields = fields.len(),
            vector_dim = group_sizes.total(),
            "Converter fitted"
        );

        Ok(Self {
            schema,
            config,
            fields,
            group_sizes,
            rows,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    pub fn group_sizes(&self) -> &GroupSizes {
        &self.group_sizes
    }

    /// Length of every vector
    pub fn vector_dim(&self) -> usize {
        self.group_sizes.total()
    }

    /// Encoded fields, in vector order
    pub fn encoded_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn codec(&self, field: &str) -> Option<&FieldCodec> {
        self.fields.iter().find(|f| f.name == field).map(|f| &f.codec)
    }

    /// Vectors of the fitting batch, in batch order
    pub fn get_vectors(&self) -> Result<Vec<Vector>> {
        self.rows.iter().map(|row| self.assemble(row)).collect()
    }

    /// Records recovered from the fitting batch's own vectors
    pub fn get_params(&self) -> Result<Vec<Record>> {
        self.get_vectors()?
            .iter()
            .map(|vector| self.decode_vector(vector))
            .collect()
    }

    /// Encode one record
    pub fn encode_record(&self, record: &Record) -> Result<Vector> {
        let row = preprocess_record(&self.schema, &self.config, record)?;
        self.assemble(&row)
    }

    /// Encode a batch; each record succeeds or fails on its own
    pub fn transform(&self, records: &[Record]) -> Vec<Result<Vector>> {
        if records.len() >= self.config.parallel_threshold {
            records.par_iter().map(|r| self.encode_record(r)).collect()
        } else {
            records.iter().map(|r| self.encode_record(r)).collect()
        }
    }

    /// Decode one vector back into a record
    ///
    /// The result has one entry per encoded field; values that were not
    /// supplied come back as `Missing`.
    pub fn decode_vector(&self, vector: &Vector) -> Result<Record> {
        let expected = self.vector_dim();
        if vector.dim() != expected {
            return Err(Error::InvalidDimension {
                expected,
                actual: vector.dim(),
            });
        }

        let data = vector.as_slice();
        let mut record = Record::new();
        for (field, (name, span)) in self.fields.iter().zip(self.group_sizes.spans()) {
            debug_assert_eq!(field.name, name);
            let value = field.codec.decode(&field.name, &data[span])?;
            record.insert(field.name.clone(), value);
        }
        Ok(record)
    }

    /// Decode a batch; each vector succeeds or fails on its own
    pub fn reconstruct(&self, vectors: &[Vector]) -> Vec<Result<Record>> {
        if vectors.len() >= self.config.parallel_threshold {
            vectors.par_iter().map(|v| self.decode_vector(v)).collect()
        } else {
            vectors.iter().map(|v| self.decode_vector(v)).collect()
        }
    }

    /// Apply every field codec to a prepared row and flatten
    fn assemble(&self, row: &PreparedRecord) -> Result<Vector> {
        let mut data = Vec::with_capacity(self.vector_dim());
        for field in &self.fields {
            field
                .codec
                .encode(&field.name, row.cell(field.position), &mut data)?;
        }
        debug_assert_eq!(data.len(), self.vector_dim());
        Ok(Vector::new(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::LOGICAL_UNKNOWN;
    use paramvec_core::Value;

    fn create_test_descriptions() -> Vec<FieldDescription> {
        vec![
            FieldDescription::numeric("a"),
            FieldDescription::discrete("b"),
            FieldDescription::logical("c"),
        ]
    }

    fn create_test_batch() -> RecordBatch {
        RecordBatch::from_records(
            "1",
            vec![
                Record::new().with("a", 1.0).with("b", "x").with("c", "TRUE"),
                Record::new().with("a", 2.0).with("b", "y").with("c", "FALSE"),
                Record::new().with("a", 3.0).with("b", "x").with("c", "TRUE"),
            ],
        )
    }

    #[test]
    fn test_worked_example() {
        let converter = Converter::new(&create_test_batch(), &create_test_descriptions()).unwrap();
        let record = Record::new().with("a", 2.0).with("b", "y").with("c", "TRUE");

        let vector = converter.encode_record(&record).unwrap();
        assert_eq!(vector.as_slice(), &[0.0, 0.0, 1.0, 1.0]);

        let decoded = converter.decode_vector(&vector).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_group_sizes_follow_schema_order() {
        let converter = Converter::new(&create_test_batch(), &create_test_descriptions()).unwrap();
        let spans: Vec<_> = converter.group_sizes().spans().collect();
        assert_eq!(spans, vec![("a", 0..1), ("b", 1..3), ("c", 3..4)]);
        assert_eq!(converter.vector_dim(), 4);
    }

    #[test]
    fn test_fitting_vectors_have_uniform_width() {
        let converter = Converter::new(&create_test_batch(), &create_test_descriptions()).unwrap();
        let vectors = converter.get_vectors().unwrap();
        assert_eq!(vectors.len(), 3);
        assert!(vectors.iter().all(|v| v.dim() == converter.group_sizes().total()));
    }

    #[test]
    fn test_get_params_recovers_fitting_batch() {
        let batch = create_test_batch();
        let converter = Converter::new(&batch, &create_test_descriptions()).unwrap();
        let params = converter.get_params().unwrap();

        assert_eq!(params.len(), 3);
        for (decoded, original) in params.iter().zip(batch.records()) {
            let (Value::Number(x), Value::Number(y)) = (decoded.get("a"), original.get("a")) else {
                panic!("expected numbers for a");
            };
            assert!((x - y).abs() < 1e-9);
            assert_eq!(decoded.get("b"), original.get("b"));
            assert_eq!(decoded.get("c"), original.get("c"));
        }
    }

    #[test]
    fn test_boolean_logical_field_round_trip() {
        let batch = RecordBatch::from_records(
            "1",
            vec![
                Record::new().with("c", true).with("b", "x"),
                Record::new().with("c", false).with("b", "y"),
                Record::new().with("b", "y"),
            ],
        );
        let descriptions = vec![FieldDescription::discrete("b"), FieldDescription::logical("c")];
        let converter = Converter::new(&batch, &descriptions).unwrap();

        let params = converter.get_params().unwrap();
        for (decoded, original) in params.iter().zip(batch.records()) {
            assert_eq!(decoded.get("c"), original.get("c"));
            assert_eq!(decoded.get("b"), original.get("b"));
        }
        assert_eq!(params[0].get("c"), &Value::Bool(true));
        assert_eq!(params[1].get("c"), &Value::Bool(false));
    }

    #[test]
    fn test_missing_field_round_trip() {
        let mut batch = create_test_batch();
        batch.insert("2", vec![Record::new().with("b", "y")]);
        let converter = Converter::new(&batch, &create_test_descriptions()).unwrap();

        let record = Record::new().with("b", "y");
        let vector = converter.encode_record(&record).unwrap();

        let a = converter.codec("a").unwrap();
        let FieldCodec::Numeric(numeric) = a else {
            panic!("expected numeric codec");
        };
        assert_eq!(vector.as_slice()[0], numeric.transform(-1.0));
        assert_eq!(vector.as_slice()[3], LOGICAL_UNKNOWN);

        let decoded = converter.decode_vector(&vector).unwrap();
        assert_eq!(decoded.get("a"), &Value::Missing);
        assert_eq!(decoded.get("b"), &Value::text("y"));
        assert_eq!(decoded.get("c"), &Value::Missing);
    }

    #[test]
    fn test_empty_batch() {
        let result = Converter::new(&RecordBatch::new(), &create_test_descriptions());
        assert!(matches!(result, Err(Error::EmptyBatch)));
    }

    #[test]
    fn test_undeclared_field_aborts_construction() {
        let batch = RecordBatch::from_records("1", vec![Record::new().with("zzz", 1.0)]);
        let result = Converter::new(&batch, &create_test_descriptions());
        assert!(matches!(result, Err(Error::SchemaMismatch(ref f)) if f == "zzz"));
    }

    #[test]
    fn test_unused_and_untyped_fields_are_excluded() {
        let mut descriptions = create_test_descriptions();
        descriptions.push(FieldDescription::untyped("seed"));
        descriptions.push(FieldDescription::numeric("never.seen"));

        let mut batch = create_test_batch();
        batch.insert("2", vec![Record::new().with("seed", "42")]);

        let converter = Converter::new(&batch, &descriptions).unwrap();
        assert_eq!(converter.encoded_fields().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(converter.codec("seed").is_none());
        assert!(converter.codec("never.seen").is_none());

        let decoded = converter
            .decode_vector(&converter.encode_record(&Record::new().with("seed", "7")).unwrap())
            .unwrap();
        assert!(!decoded.contains_field("seed"));
    }

    #[test]
    fn test_per_record_errors() {
        let converter = Converter::new(&create_test_batch(), &create_test_descriptions()).unwrap();
        let records = vec![
            Record::new().with("a", 1.0).with("b", "x"),
            Record::new().with("a", 1.0).with("b", "unseen"),
            Record::new().with("a", "oops"),
            Record::new().with("a", 3.0).with("b", "y").with("c", "FALSE"),
        ];

        let results = converter.transform(&records);
        assert_eq!(results.len(), 4);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::UnseenCategory { .. })));
        assert!(matches!(results[2], Err(Error::InvalidNumber { .. })));
        assert!(results[3].is_ok());
    }

    #[test]
    fn test_reconstruct_reports_per_vector() {
        let converter = Converter::new(&create_test_batch(), &create_test_descriptions()).unwrap();
        let vectors = vec![
            Vector::new(vec![0.0, 1.0, 0.0, 1.0]),
            Vector::new(vec![0.0, 1.0, 1.0, 1.0]),
            Vector::new(vec![0.0, 1.0]),
        ];

        let results = converter.reconstruct(&vectors);
        assert_eq!(results[0].as_ref().unwrap().get("b"), &Value::text("x"));
        assert!(matches!(results[1], Err(Error::MalformedEncoding { active: 2, .. })));
        assert!(matches!(
            results[2],
            Err(Error::InvalidDimension { expected: 4, actual: 2 })
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential =
            Converter::new(&create_test_batch(), &create_test_descriptions()).unwrap();
        let parallel = Converter::with_config(
            &create_test_batch(),
            &create_test_descriptions(),
            EncodingConfig {
                parallel_threshold: 1,
                ..Default::default()
            },
        )
        .unwrap();

        let records: Vec<Record> = create_test_batch().records().cloned().collect();
        let a: Vec<Vector> = sequential
            .transform(&records)
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();
        let b: Vec<Vector> = parallel
            .transform(&records)
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(a, b);

        let ra: Vec<Record> = sequential
            .reconstruct(&a)
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();
        let rb: Vec<Record> = parallel
            .reconstruct(&b)
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(ra, rb);

        for (decoded, original) in ra.iter().zip(&records) {
            let (Value::Number(x), Value::Number(y)) = (decoded.get("a"), original.get("a")) else {
                panic!("expected numbers");
            };
            assert!((x - y).abs() < 1e-9);
            assert_eq!(decoded.get("b"), original.get("b"));
            assert_eq!(decoded.get("c"), original.get("c"));
        }
    }

    #[test]
    fn test_invalid_config_aborts_construction() {
        let config = EncodingConfig {
            missing_number: f64::NAN,
            ..Default::default()
        };
        let result =
            Converter::with_config(&create_test_batch(), &create_test_descriptions(), config);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
