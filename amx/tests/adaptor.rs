//! End-to-end adaptor tests over a 100x100 dataset containing NaN values

use amx::{
    decode_frame, AdaptorError, AnnotationTable, Axis, Column, ColumnType, Dataset, DenseMatrix,
    MatrixAdaptor, MatrixData,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

const N: usize = 100;

fn build_adaptor() -> MatrixAdaptor {
    let mut rng = StdRng::seed_from_u64(42);

    let mut values: Vec<f64> = (0..N * N).map(|_| rng.gen_range(-1.0..1.0)).collect();
    values[0] = -0.171_469_51;
    values[3 * N + 3] = f64::NAN;
    let matrix = MatrixData::Dense(DenseMatrix::new(N, N, values).unwrap());

    let clusters = ["B cells", "T cells", "NK cells"];
    let obs = AnnotationTable::new(N)
        .with_column(
            "cell_id",
            Column::Str((0..N).map(|i| Some(format!("cell_{i}"))).collect()),
        )
        .unwrap()
        .with_column(
            "n_genes",
            Column::Int((0..N).map(|_| rng.gen_range(200..2000)).collect()),
        )
        .unwrap()
        .with_column(
            "percent_mito",
            Column::Float(
                (0..N)
                    .map(|i| if i == 0 { f64::NAN } else { rng.gen_range(0.0..0.2) })
                    .collect(),
            ),
        )
        .unwrap()
        .with_column(
            "n_counts",
            Column::Float((0..N).map(|_| rng.gen_range(1000.0..5000.0)).collect()),
        )
        .unwrap()
        .with_column(
            "louvain",
            Column::Str((0..N).map(|i| Some(clusters[i % 3].to_string())).collect()),
        )
        .unwrap();

    let var = AnnotationTable::new(N)
        .with_column(
            "gene_id",
            Column::Str((0..N).map(|i| Some(format!("gene_{i}"))).collect()),
        )
        .unwrap()
        .with_column(
            "n_cells",
            Column::Int((0..N).map(|_| rng.gen_range(1..100)).collect()),
        )
        .unwrap()
        .with_column(
            "var_with_nans",
            Column::Float(
                (0..N)
                    .map(|i| if i == 0 { f64::NAN } else { rng.gen_range(0.0..1.0) })
                    .collect(),
            ),
        )
        .unwrap();

    MatrixAdaptor::new(Dataset::new(matrix, obs, var, "cell_id", "gene_id").unwrap())
}

#[test]
fn test_schema_matches_matrix_dimensions() {
    let adaptor = build_adaptor();
    let schema = adaptor.schema();
    assert_eq!(schema.row_count, N);
    assert_eq!(schema.col_count, N);

    assert_eq!(schema.obs.index, "cell_id");
    let names: Vec<&str> = schema.obs.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["cell_id", "n_genes", "percent_mito", "n_counts", "louvain"]
    );

    let louvain = schema.obs.column("louvain").unwrap();
    assert_eq!(louvain.value_type, ColumnType::Categorical);
    assert_eq!(
        louvain.categories.as_deref().unwrap(),
        &[
            "B cells".to_string(),
            "T cells".to_string(),
            "NK cells".to_string()
        ]
    );

    assert!(schema.obs.column("percent_mito").unwrap().nullable);
    assert!(!schema.obs.column("cell_id").unwrap().nullable);
}

#[test]
fn test_var_dataframe_unfiltered() {
    let adaptor = build_adaptor();
    let bytes = adaptor.data_frame(None, Axis::Var).unwrap();
    let frame = decode_frame(&bytes).unwrap();

    assert_eq!(frame.row_count, N);
    assert_eq!(frame.col_count, N);
    assert_eq!(frame.columns[5].name, "gene_5");

    let first = frame.columns[0].values.as_f64().unwrap();
    assert!((first[0] - -0.171_469_51).abs() < 5e-6);

    // the NaN planted at matrix position (3, 3) survives encoding
    let third = frame.columns[3].values.as_f64().unwrap();
    assert!(third[3].is_nan());
    assert_eq!(third[3].to_bits(), f64::NAN.to_bits());
}

#[test]
fn test_obs_dataframe_is_unsupported() {
    let adaptor = build_adaptor();
    let err = adaptor.data_frame(None, Axis::Obs).unwrap_err();
    assert!(matches!(err, AdaptorError::Unsupported(_)));
}

#[test]
fn test_malformed_filters_rejected() {
    let adaptor = build_adaptor();

    let err = adaptor
        .data_frame(Some(&json!("an erroneous filter")), Axis::Var)
        .unwrap_err();
    assert!(matches!(err, AdaptorError::Filter(_)));

    // 100-row axis: the range [200, 300) is out of bounds
    let filter = json!({ "obs": { "index": [1, 99, [200, 300]] } });
    let err = adaptor.data_frame(Some(&filter), Axis::Var).unwrap_err();
    assert!(matches!(err, AdaptorError::Filter(_)));
}

#[test]
fn test_filtered_dataframe_is_canonicalized() {
    let adaptor = build_adaptor();

    // out-of-order, duplicated rows and a column range
    let filter = json!({
        "obs": { "index": [5, 3, 3, 1] },
        "var": { "index": [[10, 13]] }
    });
    let bytes = adaptor.data_frame(Some(&filter), Axis::Var).unwrap();
    let frame = decode_frame(&bytes).unwrap();

    assert_eq!(frame.row_count, 3);
    assert_eq!(frame.column_names(), vec!["gene_10", "gene_11", "gene_12"]);

    let matrix = adaptor.dataset().matrix();
    let selected_rows = [1usize, 3, 5];
    for (j, col) in (10..13).enumerate() {
        let values = frame.columns[j].values.as_f64().unwrap();
        for (k, &row) in selected_rows.iter().enumerate() {
            assert_eq!(values[k].to_bits(), matrix.get(row, col).to_bits());
        }
    }
}

#[test]
fn test_annotation_frames_roundtrip() {
    let adaptor = build_adaptor();

    let obs = decode_frame(&adaptor.annotation_frame(Axis::Obs).unwrap()).unwrap();
    assert_eq!(obs.row_count, N);
    assert_eq!(
        obs.column_names(),
        vec!["cell_id", "n_genes", "percent_mito", "n_counts", "louvain"]
    );
    let mito = obs.column("percent_mito").unwrap().values.as_f64().unwrap();
    assert!(mito[0].is_nan());

    let louvain = obs.column("louvain").unwrap();
    assert_eq!(louvain.category_of(0), Some("B cells"));
    assert_eq!(louvain.category_of(1), Some("T cells"));

    let var = decode_frame(&adaptor.annotation_frame(Axis::Var).unwrap()).unwrap();
    assert_eq!(var.row_count, N);
    assert_eq!(
        var.column_names(),
        vec!["gene_id", "n_cells", "var_with_nans"]
    );
    let nans = var
        .column("var_with_nans")
        .unwrap()
        .values
        .as_f64()
        .unwrap();
    assert!(nans[0].is_nan());
}

#[test]
fn test_decoded_categories_match_schema_domain() {
    let adaptor = build_adaptor();
    let obs = decode_frame(&adaptor.annotation_frame(Axis::Obs).unwrap()).unwrap();

    let schema_domain = adaptor
        .schema()
        .obs
        .column("louvain")
        .unwrap()
        .categories
        .clone()
        .unwrap();

    match &obs.column("louvain").unwrap().values {
        amx::DecodedValues::Categorical { categories, .. } => {
            assert_eq!(categories, &schema_domain);
        }
        other => panic!("expected categorical values, got {other:?}"),
    }
}

#[test]
fn test_encoding_is_deterministic() {
    let adaptor = build_adaptor();

    assert_eq!(
        adaptor.annotation_frame(Axis::Obs).unwrap(),
        adaptor.annotation_frame(Axis::Obs).unwrap()
    );

    let filter = json!({ "obs": { "index": [[0, 50]] } });
    assert_eq!(
        adaptor.data_frame(Some(&filter), Axis::Var).unwrap(),
        adaptor.data_frame(Some(&filter), Axis::Var).unwrap()
    );
}

#[test]
fn test_empty_selection_encodes_empty_frame() {
    let adaptor = build_adaptor();
    let filter = json!({
        "obs": { "annotation_value": [{ "name": "louvain", "values": [] }] }
    });
    let bytes = adaptor.data_frame(Some(&filter), Axis::Var).unwrap();
    let frame = decode_frame(&bytes).unwrap();
    assert_eq!(frame.row_count, 0);
    assert_eq!(frame.col_count, N);
}

#[test]
fn test_schema_serializes_for_introspection() {
    let adaptor = build_adaptor();
    let schema = serde_json::to_value(adaptor.schema()).unwrap();

    assert_eq!(schema["row_count"], N);
    assert_eq!(schema["obs"]["index"], "cell_id");
    assert_eq!(schema["obs"]["columns"][4]["value_type"], "categorical");
    assert_eq!(schema["matrix_type"], "F64");
}
