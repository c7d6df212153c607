use melodi_manifest::store::{FsManifestStore, MANIFEST_KEY, ManifestStore};

#[test]
fn put_creates_parent_directories_and_writes_content() {
    let temp = tempfile::tempdir().unwrap();
    let store = FsManifestStore::new(temp.path());

    store.put(MANIFEST_KEY, "[{\"name\": \"DS1\"}]".as_bytes()).unwrap();

    let written = std::fs::read_to_string(temp.path().join(MANIFEST_KEY)).unwrap();
    assert_eq!(written, "[{\"name\": \"DS1\"}]");
}

#[test]
fn put_replaces_prior_content() {
    let temp = tempfile::tempdir().unwrap();
    let store = FsManifestStore::new(temp.path());

    store.put(MANIFEST_KEY, b"first run").unwrap();
    store.put(MANIFEST_KEY, b"second run").unwrap();

    let written = std::fs::read_to_string(temp.path().join(MANIFEST_KEY)).unwrap();
    assert_eq!(written, "second run");
}

#[test]
fn utf8_survives_the_round_trip() {
    let temp = tempfile::tempdir().unwrap();
    let store = FsManifestStore::new(temp.path());

    store.put("manifest.json", "« Économie »".as_bytes()).unwrap();

    let written = std::fs::read_to_string(temp.path().join("manifest.json")).unwrap();
    assert_eq!(written, "« Économie »");
}
