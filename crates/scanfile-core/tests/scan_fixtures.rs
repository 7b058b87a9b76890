use scanfile_core::header::schema::HeaderSchema;
use scanfile_core::{LoaderConfig, PropertyValue, ScanLoader};
use std::path::{Path, PathBuf};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[test]
fn angle_scan_fixture_extracts_full_header() {
    let loaded = ScanLoader::new(LoaderConfig::default())
        .load_index(&fixture_dir(), 12)
        .expect("fixture 12 should load");
    let properties = loaded.properties();

    assert_eq!(
        properties.get("info"),
        Some(&PropertyValue::Text(
            "ascan stt 20.0 22.0 0.5 det_preset 60".to_string()
        ))
    );
    assert_eq!(properties.get("dct1"), Some(&PropertyValue::Float(12.5)));
    assert_eq!(properties.get("dct2"), Some(&PropertyValue::Float(-3.25)));
    assert_eq!(properties.get("dct3"), Some(&PropertyValue::Float(0.0)));
    assert_eq!(properties.get("dct4"), Some(&PropertyValue::Unused));
    assert_eq!(properties.get("dct5"), Some(&PropertyValue::Unused));
    assert_eq!(properties.get("sth_st"), Some(&PropertyValue::Float(41.75)));
    assert_eq!(properties.get("sty"), Some(&PropertyValue::Float(-1.25)));
    assert_eq!(properties.get("sgy"), Some(&PropertyValue::Float(-0.2)));
    assert_eq!(properties.get("stt"), Some(&PropertyValue::Scanned));
    assert_eq!(properties.get("ss1_height"), Some(&PropertyValue::Float(20.0)));
    assert_eq!(properties.get("ss2_centre_y"), Some(&PropertyValue::Float(-0.1)));
    assert_eq!(properties.len(), HeaderSchema::instrument().expected_keys().len());

    let raw = loaded.header().raw();
    assert_eq!(
        raw.get("det_preset"),
        Some(&PropertyValue::Text("60.0 s".to_string()))
    );
    assert!(!raw.contains_key("ss3_centre_x"));
    assert!(!raw.contains_key("ms2_status"));

    let diagnostics = loaded.header().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].key.as_deref(), Some("dct4"));
    assert_eq!(diagnostics[0].line_number, 8);
}

#[test]
fn angle_scan_fixture_repairs_series() {
    let loaded = ScanLoader::default()
        .load_path(&fixture_dir().join("15315_00012.dat"))
        .expect("fixture 12 should load");
    let series = loaded.series();

    assert!(series.is_valid());
    assert_eq!(series.real_counts(), &[6497, 6237, 6107, 5977, 5847, 5717]);

    let repaired_third = (20.5 + 21.0005) / 2.0;
    let repaired_fourth = (repaired_third + 21.0006) / 2.0;
    let expected = [20.0, 20.5, repaired_fourth, 21.0006, 21.5, 22.0];
    assert_eq!(series.len(), expected.len());
    for (actual, expected) in series.x_data().iter().zip(expected) {
        assert!(
            (actual - expected).abs() < 1.0e-9,
            "position {actual} should be {expected}"
        );
    }
}

#[test]
fn count_fixture_is_not_a_scan_but_keeps_metadata() {
    let loaded = ScanLoader::default()
        .load_index(&fixture_dir(), 13)
        .expect("fixture 13 should load");

    assert!(!loaded.series().is_valid());
    assert!(loaded.series().is_empty());
    assert!(loaded.header().scan_variable().is_none());
    assert_eq!(
        loaded.properties().get("dct5"),
        Some(&PropertyValue::Float(1.5))
    );
    assert_eq!(
        loaded.properties().get("ss1_centre_x"),
        Some(&PropertyValue::Unused)
    );
    assert!(loaded.properties().iter().all(|(_, value)| !value.is_scanned()));
    assert_eq!(loaded.header().diagnostics().len(), 1);
}

#[test]
fn independent_loads_can_run_on_worker_threads() {
    let loader = ScanLoader::default();
    let directory = fixture_dir();

    let results: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = [12, 13, 12, 13]
            .into_iter()
            .map(|index| {
                let loader = &loader;
                let directory = &directory;
                scope.spawn(move || {
                    loader
                        .load_index(directory, index)
                        .expect("fixture should load")
                        .series()
                        .is_valid()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker should not panic"))
            .collect()
    });

    assert_eq!(results, vec![true, false, true, false]);
}
