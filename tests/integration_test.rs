// Integration tests for paramvec
use paramvec::io::{load_description, load_qualities, load_records, load_scores};
use paramvec::{
    Converter, EncodingConfig, Error, FieldCodec, FieldDescription, Merger, Record, RecordBatch,
    Value, Vector,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

const SPLITRULES: [&str; 3] = ["gini", "extratrees", "hellinger"];
const LOGICALS: [&str; 2] = ["TRUE", "FALSE"];

fn ranger_descriptions() -> Vec<FieldDescription> {
    vec![
        FieldDescription::integer("num.trees"),
        FieldDescription::numeric("sample.fraction"),
        FieldDescription::discrete("splitrule"),
        FieldDescription::logical("replace"),
        FieldDescription::untyped("seed"),
    ]
}

/// Random records drawn from a fixed domain; each field is missing 1 time in 5
fn random_records(rng: &mut StdRng, n: usize) -> Vec<Record> {
    (0..n)
        .map(|_| {
            let mut record = Record::new();
            if rng.random_range(0..5) > 0 {
                record.insert("num.trees", f64::from(rng.random_range(1..=20) * 50));
            }
            if rng.random_range(0..5) > 0 {
                record.insert("sample.fraction", format!("{:.3}", rng.random_range(0.1..1.0)));
            }
            if rng.random_range(0..5) > 0 {
                record.insert("splitrule", SPLITRULES[rng.random_range(0..SPLITRULES.len())]);
            }
            if rng.random_range(0..5) > 0 {
                record.insert("replace", LOGICALS[rng.random_range(0..LOGICALS.len())]);
            }
            record.insert("seed", f64::from(rng.random_range(0..1000)));
            record
        })
        .collect()
}

fn fitted_converter(seed: u64, n: usize) -> (Converter, Vec<Record>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let records = random_records(&mut rng, n);
    let batch = RecordBatch::from_records("31", records.clone());
    let converter = Converter::new(&batch, &ranger_descriptions()).unwrap();
    (converter, records)
}

fn assert_same_encoded_fields(converter: &Converter, decoded: &Record, original: &Record) {
    for field in converter.encoded_fields() {
        match (decoded.get(field), original.get(field)) {
            (Value::Number(x), Value::Number(y)) => {
                assert!((x - y).abs() < 1e-9, "field {}: {} != {}", field, x, y)
            }
            (Value::Number(x), Value::Text(y)) => {
                let y: f64 = y.parse().unwrap();
                assert!((x - y).abs() < 1e-9, "field {}: {} != {}", field, x, y)
            }
            (a, b) => assert_eq!(a, b, "field {}", field),
        }
    }
}

#[test]
fn test_round_trip_over_fitting_domain() {
    let (converter, records) = fitted_converter(7, 300);

    let vectors = converter.get_vectors().unwrap();
    assert_eq!(vectors.len(), records.len());

    for (vector, original) in vectors.iter().zip(&records) {
        let decoded = converter.decode_vector(vector).unwrap();
        assert_same_encoded_fields(&converter, &decoded, original);
    }
}

#[test]
fn test_width_invariant() {
    let (converter, _) = fitted_converter(11, 200);
    let total: usize = converter.group_sizes().iter().map(|g| g.width).sum();

    // 1 + 1 + (3 rules + default) + 1
    assert_eq!(total, 7);
    for vector in converter.get_vectors().unwrap() {
        assert_eq!(vector.dim(), total);
    }
}

#[test]
fn test_one_hot_exactness() {
    let (converter, _) = fitted_converter(13, 200);
    let (_, span) = converter
        .group_sizes()
        .spans()
        .find(|(field, _)| *field == "splitrule")
        .unwrap();

    for vector in converter.get_vectors().unwrap() {
        let block = &vector.as_slice()[span.clone()];
        assert_eq!(block.iter().filter(|&&x| x == 1.0).count(), 1);
        assert_eq!(block.iter().filter(|&&x| x == 0.0).count(), block.len() - 1);
    }
}

#[test]
fn test_logical_three_way() {
    let (converter, _) = fitted_converter(17, 100);
    let (_, span) = converter
        .group_sizes()
        .spans()
        .find(|(field, _)| *field == "replace")
        .unwrap();
    let slot = span.start;

    let encode = |value: Option<&str>| {
        let mut record = Record::new();
        if let Some(v) = value {
            record.insert("replace", v);
        }
        converter.encode_record(&record).unwrap().as_slice()[slot]
    };
    assert_eq!(encode(Some("TRUE")), 1.0);
    assert_eq!(encode(Some("FALSE")), 0.0);
    assert_eq!(encode(Some("maybe")), 0.5);
    assert_eq!(encode(None), 0.5);

    let mut vector = converter.get_vectors().unwrap()[0].clone().into_inner();
    for (x, expected) in [
        (1.0, Value::text("TRUE")),
        (0.0, Value::text("FALSE")),
        (0.5, Value::Missing),
    ] {
        vector[slot] = x;
        let decoded = converter.decode_vector(&Vector::new(vector.clone())).unwrap();
        assert_eq!(decoded.get("replace"), &expected);
    }
}

#[test]
fn test_default_propagation() {
    let (converter, _) = fitted_converter(19, 200);

    let vector = converter.encode_record(&Record::new()).unwrap();
    let decoded = converter.decode_vector(&vector).unwrap();

    for field in ["num.trees", "sample.fraction", "splitrule", "replace"] {
        assert!(decoded.contains_field(field));
        assert_eq!(decoded.get(field), &Value::Missing, "field {}", field);
    }
}

#[test]
fn test_worked_example() {
    let descriptions = vec![
        FieldDescription::numeric("a"),
        FieldDescription::discrete("b"),
        FieldDescription::logical("c"),
    ];
    let batch = RecordBatch::from_records(
        "1",
        vec![
            Record::new().with("a", 1.0).with("b", "x").with("c", "TRUE"),
            Record::new().with("a", 2.0).with("b", "y").with("c", "FALSE"),
            Record::new().with("a", 3.0).with("b", "y").with("c", "FALSE"),
        ],
    );
    let converter = Converter::new(&batch, &descriptions).unwrap();

    let record = Record::new().with("a", 2.0).with("b", "y").with("c", "TRUE");
    let vector = converter.encode_record(&record).unwrap();
    assert_eq!(vector.as_slice(), &[0.0, 0.0, 1.0, 1.0]);
    assert_eq!(converter.decode_vector(&vector).unwrap(), record);

    // Missing `a` is encoded as z(-1.0): extrapolated, still invertible
    let missing_a = Record::new().with("b", "y").with("c", "TRUE");
    let vector = converter.encode_record(&missing_a).unwrap();
    let Some(FieldCodec::Numeric(a)) = converter.codec("a") else {
        panic!("expected numeric codec for a");
    };
    assert_eq!(vector.as_slice()[0], a.transform(-1.0));
    assert_eq!(converter.decode_vector(&vector).unwrap().get("a"), &Value::Missing);
}

#[test]
fn test_degenerate_numeric_field_round_trip() {
    let descriptions = vec![
        FieldDescription::numeric("alpha"),
        FieldDescription::discrete("kind"),
    ];
    let batch = RecordBatch::from_records(
        "1",
        vec![
            Record::new().with("alpha", 0.5).with("kind", "a"),
            Record::new().with("alpha", 0.5).with("kind", "b"),
        ],
    );
    let converter = Converter::new(&batch, &descriptions).unwrap();

    let Some(FieldCodec::Numeric(alpha)) = converter.codec("alpha") else {
        panic!("expected numeric codec");
    };
    assert!(alpha.is_degenerate());

    for vector in converter.get_vectors().unwrap() {
        assert!(vector.as_slice().iter().all(|x| x.is_finite()));
        let decoded = converter.decode_vector(&vector).unwrap();
        assert_eq!(decoded.get("alpha"), &Value::Number(0.5));
    }
}

#[test]
fn test_unseen_values_reported_per_record() {
    let (converter, _) = fitted_converter(23, 100);
    let records = vec![
        Record::new().with("splitrule", "gini"),
        Record::new().with("splitrule", "variance"),
        Record::new().with("unknown.param", 1.0),
        Record::new().with("num.trees", 5000.0),
    ];

    let results = converter.transform(&records);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(Error::UnseenCategory { .. })));
    assert!(matches!(results[2], Err(Error::SchemaMismatch(_))));

    // Out-of-domain numbers extrapolate and still invert
    let vector = results[3].as_ref().unwrap();
    let decoded = converter.decode_vector(vector).unwrap();
    assert_eq!(decoded.get("num.trees"), &Value::Number(5000.0));
}

#[test]
fn test_declared_defaults_policy() {
    let descriptions = vec![
        FieldDescription::integer("num.trees").with_default("500"),
        FieldDescription::logical("replace").with_default("TRUE"),
    ];
    let batch = RecordBatch::from_records(
        "1",
        vec![
            Record::new().with("num.trees", "100"),
            Record::new().with("replace", "FALSE"),
        ],
    );
    let config = EncodingConfig {
        use_declared_defaults: true,
        ..Default::default()
    };
    let converter = Converter::with_config(&batch, &descriptions, config).unwrap();

    let decoded = converter.get_params().unwrap();
    assert_eq!(decoded[0].get("replace"), &Value::text("TRUE"));
    assert_eq!(decoded[1].get("num.trees"), &Value::Number(500.0));
}

fn write_json(dir: &TempDir, name: &str, value: serde_json::Value) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{}", value).unwrap();
    path
}

#[test]
fn test_files_to_training_set() {
    let dir = tempfile::tempdir().unwrap();
    let params = write_json(
        &dir,
        "params.json",
        json!({
            "31": [
                {"num.trees": "500", "splitrule": "gini", "replace": "TRUE"},
                {"num.trees": "100", "splitrule": "extratrees"}
            ],
            "37": [
                {"num.trees": "250", "replace": "FALSE", "seed": "1"}
            ]
        }),
    );
    let description = write_json(
        &dir,
        "flow.json",
        json!({"flow": {"parameter": [
            {"name": "num.trees", "data_type": "integer", "default_value": "500"},
            {"name": "splitrule", "data_type": "discrete"},
            {"name": "replace", "data_type": "logical", "default_value": "TRUE"},
            {"name": "seed", "data_type": "untyped"}
        ]}}),
    );
    let scores = write_json(&dir, "scores.json", json!({"31": ["0.91", "0.88"], "37": [0.75]}));
    let qualities = write_json(
        &dir,
        "qualities.json",
        json!({
            "31": {"NumberOfInstances": 3196.0, "NumberOfClasses": 2.0},
            "37": {"NumberOfInstances": 768.0, "NumberOfClasses": 2.0, "Dimensionality": 0.01}
        }),
    );

    let params = load_records(params).unwrap();
    let description = load_description(description).unwrap();
    let scores = load_scores(scores).unwrap();
    let qualities = load_qualities(qualities).unwrap();

    let merger = Merger::new(&params, &description, &scores, &qualities).unwrap();
    let set = merger.merge().unwrap();

    // num.trees (1) + splitrule {default, extratrees, gini} (3) + replace (1)
    assert_eq!(merger.converter().vector_dim(), 5);
    // Dimensionality is incomplete and dropped; NumberOfClasses is constant
    assert_eq!(
        merger.quality_columns(),
        &["NumberOfClasses".to_string(), "NumberOfInstances".to_string()]
    );
    assert_eq!(set.len(), 3);
    assert_eq!(set.input_dim(), 7);
    assert_eq!(set.y, vec![0.91, 0.88, 0.75]);
    assert!(set.x.iter().flat_map(|v| v.as_slice()).all(|x| x.is_finite()));
}
