//! Model bundle kept in remote object storage

use crate::models::bundle::ModelBundle;
use crate::models::loader::ModelLoader;
use crate::storage::ObjectStore;
use crate::types::frame::DataFrame;
use anyhow::{Context, Result};
use std::cell::OnceCell;
use tracing::info;

/// Remote counterpart of a local artifact: fetched on first use, then kept
/// for the lifetime of this value only.
pub struct RemoteModel {
    store: Box<dyn ObjectStore>,
    bucket: String,
    key: String,
    loader: ModelLoader,
    loaded: OnceCell<ModelBundle>,
}

impl RemoteModel {
    pub fn new(store: Box<dyn ObjectStore>, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            key: key.into(),
            loader: ModelLoader::new(),
            loaded: OnceCell::new(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the object exists in the bucket
    pub fn is_model_present(&self) -> Result<bool> {
        self.store
            .object_exists(&self.bucket, &self.key)
            .with_context(|| format!("Failed to check for s3://{}/{}", self.bucket, self.key))
    }

    /// Download and deserialize the bundle
    pub fn load_model(&self) -> Result<ModelBundle> {
        info!(bucket = %self.bucket, key = %self.key, "Loading model from remote storage");

        let bytes = self
            .store
            .get_object(&self.bucket, &self.key)
            .with_context(|| format!("Failed to download s3://{}/{}", self.bucket, self.key))?;

        self.loader
            .load_from_bytes(&bytes, &format!("s3://{}/{}", self.bucket, self.key))
    }

    /// Predict with the remote bundle, loading it on first call
    pub fn predict(&self, frame: &DataFrame) -> Result<Vec<i64>> {
        let bundle = match self.loaded.get() {
            Some(bundle) => bundle,
            None => {
                let bundle = self.load_model()?;
                self.loaded.get_or_init(|| bundle)
            }
        };

        bundle.predict(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::predictor::{Classifier, DecisionTree};
    use crate::models::preprocess::{Preprocessor, Remainder};
    use crate::types::frame::{Column, Value};
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingStore {
        body: Vec<u8>,
        fetches: Rc<Cell<usize>>,
    }

    impl ObjectStore for CountingStore {
        fn get_object(&self, _bucket: &str, _key: &str) -> Result<Vec<u8>> {
            self.fetches.set(self.fetches.get() + 1);
            Ok(self.body.clone())
        }

        fn object_exists(&self, _bucket: &str, key: &str) -> Result<bool> {
            Ok(key == "model.pkl")
        }
    }

    fn body() -> Vec<u8> {
        let bundle = ModelBundle::new(
            Preprocessor::new(vec![], Remainder::Passthrough),
            Classifier::RandomForest {
                classes: vec![0, 1],
                n_features: 1,
                trees: vec![DecisionTree::stump(0, 30.0, vec![1.0, 0.0], vec![0.0, 1.0])],
            },
        );
        serde_json::to_vec(&bundle).unwrap()
    }

    #[test]
    fn test_predict_fetches_once_per_instance() {
        let fetches = Rc::new(Cell::new(0));
        let model = RemoteModel::new(
            Box::new(CountingStore {
                body: body(),
                fetches: fetches.clone(),
            }),
            "bucket",
            "model.pkl",
        );
        let frame = DataFrame::from_columns(vec![Column::new(
            "Age",
            vec![Value::Int(25), Value::Int(45)],
        )])
        .unwrap();

        assert_eq!(model.predict(&frame).unwrap(), vec![0, 1]);
        assert_eq!(model.predict(&frame).unwrap(), vec![0, 1]);
        assert_eq!(fetches.get(), 1);
    }

    #[test]
    fn test_is_model_present() {
        let store = || {
            Box::new(CountingStore {
                body: body(),
                fetches: Rc::new(Cell::new(0)),
            })
        };
        assert!(RemoteModel::new(store(), "bucket", "model.pkl")
            .is_model_present()
            .unwrap());
        assert!(!RemoteModel::new(store(), "bucket", "other.pkl")
            .is_model_present()
            .unwrap());
    }
}
