#![allow(dead_code)]

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use vehicle_insurance_predictor::config::{AppConfig, ArtifactsConfig};
use vehicle_insurance_predictor::models::{
    Classifier, DecisionTree, ModelBundle, ModelLoader, Preprocessor, Remainder,
};
use vehicle_insurance_predictor::storage::ObjectStore;
use vehicle_insurance_predictor::VehicleData;

pub const RELATIVE: &str = "model_trainer/trained_model/model.pkl";

/// Bundle that answers `label` for every row of an 11-column frame
pub fn constant_bundle(label: i64) -> ModelBundle {
    let weights = if label == 1 { vec![0.0, 1.0] } else { vec![1.0, 0.0] };
    ModelBundle::new(
        Preprocessor::new(vec![], Remainder::Passthrough),
        Classifier::RandomForest {
            classes: vec![0, 1],
            n_features: 11,
            trees: vec![DecisionTree::leaf(weights)],
        },
    )
}

pub fn write_run(root: &Path, run: &str, bundle: &ModelBundle) -> PathBuf {
    let path = root.join(run).join(RELATIVE);
    ModelLoader::new().save_object(&path, bundle).unwrap();
    path
}

/// Set a directory's modification time to `secs_ago` seconds in the past
pub fn age_dir(dir: &Path, secs_ago: u64) {
    set_dir_mtime(dir, SystemTime::now() - Duration::from_secs(secs_ago));
}

pub fn set_dir_mtime(dir: &Path, when: SystemTime) {
    File::open(dir).unwrap().set_modified(when).unwrap();
}

pub fn config_for(root: &Path) -> AppConfig {
    AppConfig {
        artifacts: ArtifactsConfig {
            root_dir: root.to_path_buf(),
            ..ArtifactsConfig::default()
        },
        ..AppConfig::default()
    }
}

pub fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn both_credentials() -> HashMap<String, String> {
    env(&[
        ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
        ("AWS_SECRET_ACCESS_KEY", "secret"),
    ])
}

pub fn sample_record() -> VehicleData {
    VehicleData::new(1, 44, 1, 28.0, 0, 40454.0, 26.0, 217, 0, 1, 1)
}

/// In-memory bucket contents
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub objects: HashMap<(String, String), Vec<u8>>,
}

impl MemoryStore {
    pub fn with_bundle(bucket: &str, key: &str, bundle: &ModelBundle) -> Self {
        let mut objects = HashMap::new();
        objects.insert(
            (bucket.to_string(), key.to_string()),
            serde_json::to_vec(bundle).unwrap(),
        );
        Self { objects }
    }
}

impl ObjectStore for MemoryStore {
    fn get_object(&self, bucket: &str, key: &str) -> anyhow::Result<Vec<u8>> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such object {}/{}", bucket, key))
    }

    fn object_exists(&self, bucket: &str, key: &str) -> anyhow::Result<bool> {
        Ok(self
            .objects
            .contains_key(&(bucket.to_string(), key.to_string())))
    }
}
