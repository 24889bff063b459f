#![allow(clippy::float_cmp)]
use approx::assert_relative_eq;
use mccode_core::{build_payload, DatFile, Error, HistogramSource, PayloadOptions, Schema};

fn one_d(rows: usize) -> String {
    let mut text = String::from(
        "# Format: McCode with text headers\n\
         # component: monitor\n\
         # type: array_1d(5)\n\
         # variables: I I_err N\n\
         # xlabel: x [m]\n\
         # xlimits: 0 4\n\
         # Param: sample=vanadium\n",
    );
    for i in 0..rows {
        text.push_str(&format!("{} {} {}\n", i * 10, i, i + 1));
    }
    text
}

fn two_d(variables: &str, blocks: usize) -> String {
    let mut text = format!(
        "# type: array_2d(3,2)\n\
         # variables: {variables}\n\
         # xlabel: X position [cm]\n\
         # ylabel: Y position [cm]\n\
         # xylimits: -1 1 0 10\n"
    );
    for block in 0..blocks {
        text.push_str(&format!("# Block {block}: values\n"));
        if block == 2 {
            text.push_str("0 0 0\n0 0 0\n");
        } else {
            text.push_str(&format!("{b}1 {b}2 {b}3\n{b}4 {b}5 {b}6\n", b = block + 1));
        }
    }
    text
}

#[test]
fn test_one_d_scenario() {
    let file = DatFile::from_text("/sim/monitor.dat", &one_d(5)).unwrap();
    assert_eq!(file.data().shape(), &[3, 5]);

    let payload = file
        .to_payload(Schema::Hs01, &PayloadOptions::new().with_timestamp(7))
        .unwrap();
    assert_eq!(payload.current_shape, vec![5]);
    assert_eq!(payload.dim_metadata.len(), 1);

    let x = &payload.dim_metadata[0];
    assert_eq!(x.length, 5);
    assert_eq!(x.label, "x");
    assert_eq!(x.unit, "m");
    assert_eq!(x.bin_boundaries.len(), 6);
    assert_relative_eq!(x.bin_boundaries[0], -0.5, epsilon = 1e-12);
    assert_relative_eq!(x.bin_boundaries[5], 4.5, epsilon = 1e-12);
    assert_eq!(payload.data.as_slice().unwrap(), &[0.0, 10.0, 20.0, 30.0, 40.0]);
}

#[test]
fn test_one_d_shape_mismatch() {
    let err = DatFile::from_text("/sim/monitor.dat", &one_d(4)).unwrap_err();
    match err {
        Error::ShapeMismatch {
            expected,
            found,
            declared,
            variables,
        } => {
            assert_eq!(expected, vec![5, 3]);
            assert_eq!(found, vec![4, 3]);
            assert_eq!(declared, "array_1d(5)");
            assert_eq!(variables, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_two_d_canonical_shape() {
    let file = DatFile::from_text("/sim/psd.dat", &two_d("I I_err", 2)).unwrap();
    assert_eq!(file.ndim(), 2);
    assert_eq!(file.data().shape(), &[2, 2, 3]);
    assert_eq!(file.variable("I").unwrap()[[1, 0]], 14.0);
    assert_eq!(file.variable("I_err").unwrap()[[0, 2]], 23.0);

    let payload = build_payload(&file, &PayloadOptions::new()).unwrap();
    assert_eq!(payload.current_shape, vec![2, 3]);

    let dims = &payload.dim_metadata;
    assert_eq!(dims.len(), 2);
    assert_eq!(dims[0].length, 3);
    assert_eq!(dims[0].label, "X position");
    assert_eq!(dims[1].length, 2);
    assert_relative_eq!(dims[0].bin_boundaries[0], -1.5, epsilon = 1e-12);
    assert_relative_eq!(dims[1].bin_boundaries[2], 15.0, epsilon = 1e-12);
}

#[test]
fn test_two_d_shape_mismatch() {
    let err = DatFile::from_text("/sim/psd.dat", &two_d("I I_err N", 2)).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}

#[test]
fn test_two_d_normalise_zero_monitor() {
    let file = DatFile::from_text("/sim/psd.dat", &two_d("I I_err N", 3)).unwrap();
    let options = PayloadOptions::new().with_normalise(true);
    let payload = build_payload(&file, &options).unwrap();

    assert_eq!(payload.current_shape, vec![2, 3]);
    assert!(payload.data.iter().all(|v| v.is_infinite()));
    assert!(payload.errors.iter().all(|v| v.is_infinite()));
}

#[test]
fn test_unsupported_dimensionality() {
    let text = "# type: array_3d(2,2,2)\n# variables: I\n1 2\n";
    let err = DatFile::from_text("cube.dat", text).unwrap_err();
    assert!(matches!(err, Error::Dimensionality(3)));
}

#[test]
fn test_degenerate_axis() {
    let text = "# type: array_1d(1)\n# variables: I I_err\n# xlabel: x [m]\n# xlimits: 0 0\n3 1\n";
    let file = DatFile::from_text("single.dat", text).unwrap();
    let err = build_payload(&file, &PayloadOptions::new()).unwrap_err();
    assert!(matches!(err, Error::DegenerateAxis { length: 1, .. }));
}

#[test]
fn test_parameter_lookup() {
    let file = DatFile::from_text("/sim/monitor.dat", &one_d(5)).unwrap();
    assert_eq!(file.text("sample").unwrap(), "vanadium");
    assert_eq!(file.text("component").unwrap(), "monitor");
    assert_eq!(file.header().parameters().len(), 1);
}
