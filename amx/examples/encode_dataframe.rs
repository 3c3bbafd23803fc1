//! Build a small annotated dataset, encode it, and read the frames back

use amx::{
    decode_frame, AnnotationTable, Axis, Column, Dataset, DenseMatrix, MatrixAdaptor, MatrixData,
};
use serde_json::json;

fn main() -> amx::Result<()> {
    // 4 cells x 3 genes with one NaN expression value
    let values = vec![
        0.5, 0.0, 1.25, //
        0.0, 2.0, 0.0, //
        f64::NAN, 0.75, 0.0, //
        1.0, 0.0, 3.5,
    ];
    let matrix = MatrixData::Dense(DenseMatrix::new(4, 3, values)?);

    let obs = AnnotationTable::new(4)
        .with_column(
            "cell_id",
            Column::Str(vec![
                Some("c0".into()),
                Some("c1".into()),
                Some("c2".into()),
                Some("c3".into()),
            ]),
        )?
        .with_column("n_genes", Column::Int(vec![3, 1, 2, 2]))?
        .with_column(
            "cluster",
            Column::Str(vec![
                Some("B cells".into()),
                Some("T cells".into()),
                None,
                Some("B cells".into()),
            ]),
        )?;

    let var = AnnotationTable::new(3).with_column(
        "gene_id",
        Column::Str(vec![Some("ACTB".into()), Some("CD3D".into()), Some("NKG7".into())]),
    )?;

    let adaptor = MatrixAdaptor::new(Dataset::new(matrix, obs, var, "cell_id", "gene_id")?);

    println!("schema: {}", serde_json::to_string_pretty(adaptor.schema()).unwrap());

    // whole obs annotation table
    let bytes = adaptor.annotation_frame(Axis::Obs)?;
    let frame = decode_frame(&bytes)?;
    println!(
        "obs annotations: {} rows, columns {:?} ({} bytes)",
        frame.row_count,
        frame.column_names(),
        bytes.len()
    );

    // filtered matrix slice: two cells, genes 0..2
    let filter = json!({
        "obs": { "annotation_value": [{ "name": "cluster", "values": ["B cells"] }] },
        "var": { "index": [[0, 2]] }
    });
    let bytes = adaptor.data_frame(Some(&filter), Axis::Var)?;
    let frame = decode_frame(&bytes)?;
    println!(
        "filtered dataframe: {} rows, columns {:?} ({} bytes)",
        frame.row_count,
        frame.column_names(),
        bytes.len()
    );

    Ok(())
}
