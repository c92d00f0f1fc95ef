use std::fs;
use std::path::Path;

use metatab::output::{write_matrix, write_table};
use metatab::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

const SAMPLES: &str = "\
sample-id\tsite\tdepth
#q2:types\tcategorical\tnumeric
# collected 2024
s1\tgut\t1.5
s2\tskin\t3
s3\tgut\t4.25
s4\tskin\t2
";

const EXTRA: &str = "\
sample-id,ph
s1,6.5
s2,7
s3,
s4,7.25
";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn merge_then_write_then_reload() {
    let dir = tempdir().unwrap();
    let samples = MetadataTable::from_file(&write(dir.path(), "samples.tsv", SAMPLES)).unwrap();
    let extra = MetadataTable::from_file(&write(dir.path(), "extra.csv", EXTRA)).unwrap();

    let merged = merge_all(&[samples, extra]).unwrap();
    assert_eq!(merged.column_names(), vec!["site", "depth", "ph"]);
    assert_eq!(merged.get("s4", "ph"), Some(Value::Numeric(7.25)));
    assert_eq!(merged.get("s3", "ph"), None);

    let out = dir.path().join("out").join("merged.tsv");
    write_table(out.to_str().unwrap(), &merged).unwrap();
    let reloaded = MetadataTable::from_file(&out).unwrap();
    assert_eq!(reloaded, merged);
}

#[test]
fn distance_from_loaded_table() {
    let dir = tempdir().unwrap();
    let table = MetadataTable::from_file(&write(dir.path(), "samples.tsv", SAMPLES)).unwrap();

    let dm = distance_matrix(&table.column("depth").unwrap()).unwrap();
    assert_eq!(dm.ids(), table.ids());
    assert_eq!(dm.distance("s1", "s3"), Some(2.75));
    assert_eq!(dm.distance("s4", "s4"), Some(0.0));

    let out = dir.path().join("depth.tsv");
    write_matrix(out.to_str().unwrap(), "tsv", &dm, "metatab distance").unwrap();
    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("Sample\ts1\ts2\ts3\ts4"));

    // Categorical text cannot be compared
    assert!(matches!(
        distance_matrix(&table.column("site").unwrap()),
        Err(MetadataError::NonNumeric { .. })
    ));
}

#[test]
fn random_groups_preserve_sizes_and_ids() {
    let dir = tempdir().unwrap();
    let table = MetadataTable::from_file(&write(dir.path(), "samples.tsv", SAMPLES)).unwrap();
    let site = table.column("site").unwrap();

    let mut rng = StdRng::seed_from_u64(2024);
    let groups = random_groups(&site, &RandomGroupsOptions::default(), &mut rng).unwrap();
    assert_eq!(groups.ids(), table.ids());
    assert_eq!(groups.id_header(), "sample-id");
    assert_eq!(groups.n_columns(), 3);
    for column in groups.columns() {
        let values = column.data.to_strings();
        let zeros = values.iter().filter(|v| v.as_deref() == Some("fake-group-0")).count();
        let ones = values.iter().filter(|v| v.as_deref() == Some("fake-group-1")).count();
        assert_eq!((zeros, ones), (2, 2));
    }
}

#[test]
fn tabulate_merged_tables() {
    let dir = tempdir().unwrap();
    let samples = MetadataTable::from_file(&write(dir.path(), "samples.tsv", SAMPLES)).unwrap();
    let extra = MetadataTable::from_file(&write(dir.path(), "extra.csv", EXTRA)).unwrap();
    let merged = merge(&samples, &extra).unwrap();

    let view = dir.path().join("view");
    tabulate(&merged, 2, &view).unwrap();

    let html = fs::read_to_string(view.join("index.html")).unwrap();
    assert!(html.contains("pageLength: 2"));
    assert!(html.contains("\"sample-id\""));
    assert!(html.contains("[\"ph\",\"numeric\"]"));
    assert!(html.contains("null"));
    assert!(view.join("js").join("tabulate.js").exists());

    assert!(matches!(
        tabulate(&merged, 0, &dir.path().join("never")),
        Err(MetadataError::Configuration(_))
    ));
    assert!(!dir.path().join("never").exists());
}
