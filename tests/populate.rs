//! Integration tests for random file generation.

mod common;

use common::TestTree;
use rand::SeedableRng;
use rand::rngs::StdRng;
use s3kit::config::PopulateConfig;
use s3kit::populate::{PopulateEvent, populate};
use s3kit::types::error::{S3kitError, find_s3kit_error};

fn config(num_files: u32, num_folders: u32, distribute_files: bool) -> PopulateConfig {
    PopulateConfig {
        num_files,
        min_size: 16,
        max_size: 64,
        num_folders,
        max_depth: 2,
        distribute_files,
        ..Default::default()
    }
}

#[test]
fn files_land_in_target_root() {
    let tree = TestTree::new();
    let mut rng = StdRng::seed_from_u64(7);

    let summary = populate(&config(3, 0, false), tree.root(), &mut rng, |_| {}).unwrap();

    assert_eq!(
        tree.names_in(""),
        vec![
            "random_file_0001.txt",
            "random_file_0002.txt",
            "random_file_0003.txt"
        ]
    );
    assert_eq!(
        summary.total_bytes,
        summary.files.iter().map(|f| f.size).sum::<u64>()
    );
}

#[test]
fn recorded_sizes_match_disk() {
    let tree = TestTree::new();
    let mut rng = StdRng::seed_from_u64(11);

    let summary = populate(&config(20, 5, true), tree.root(), &mut rng, |_| {}).unwrap();

    assert_eq!(summary.files.len(), 20);
    for file in &summary.files {
        let len = std::fs::metadata(&file.path).unwrap().len();
        assert_eq!(len, file.size);
        assert!((16..=64).contains(&len));
        assert!(file.path.starts_with(tree.root()));
    }
}

#[test]
fn folders_respect_max_depth() {
    let tree = TestTree::new();
    let mut rng = StdRng::seed_from_u64(3);

    let summary = populate(&config(1, 30, false), tree.root(), &mut rng, |_| {}).unwrap();

    assert!(!summary.folders.is_empty());
    for folder in &summary.folders {
        let depth = folder.strip_prefix(tree.root()).unwrap().components().count();
        assert!((1..=2).contains(&depth), "{folder:?} has depth {depth}");
        assert!(folder.is_dir());
    }
}

#[test]
fn events_follow_creation_order() {
    let tree = TestTree::new();
    let mut rng = StdRng::seed_from_u64(5);
    let mut folders_seen = 0;
    let mut files_seen = Vec::new();

    let summary = populate(&config(4, 2, true), tree.root(), &mut rng, |event| match event {
        PopulateEvent::FolderCreated(_) => {
            assert!(files_seen.is_empty());
            folders_seen += 1;
        }
        PopulateEvent::FileCreated { index, total, .. } => {
            assert_eq!(total, 4);
            files_seen.push(index);
        }
    })
    .unwrap();

    assert_eq!(folders_seen, summary.folders.len());
    assert_eq!(files_seen, vec![1, 2, 3, 4]);
}

#[test]
fn target_directory_is_created() {
    let tree = TestTree::new();
    let target = tree.root().join("new").join("dir");
    let mut rng = StdRng::seed_from_u64(1);

    populate(&config(1, 0, false), &target, &mut rng, |_| {}).unwrap();

    assert!(target.join("random_file_0001.txt").is_file());
}

#[test]
fn invalid_configuration_creates_nothing() {
    let tree = TestTree::new();
    let mut rng = StdRng::seed_from_u64(1);
    let config = PopulateConfig {
        min_size: 100,
        max_size: 10,
        ..Default::default()
    };

    let err = populate(&config, tree.root(), &mut rng, |_| {}).unwrap_err();

    assert!(matches!(
        find_s3kit_error(&err),
        Some(S3kitError::InvalidConfig(_))
    ));
    assert!(tree.names_in("").is_empty());
}
