//! Demo Artifact Writer
//!
//! Writes a small fitted model bundle into a fresh training run directory so
//! the prediction CLI can be exercised without the training pipeline.

use chrono::Utc;
use std::path::PathBuf;
use tracing::info;
use vehicle_insurance_predictor::config::ArtifactsConfig;
use vehicle_insurance_predictor::models::{
    Classifier, ColumnScaler, DecisionTree, ModelBundle, ModelLoader, Preprocessor, Remainder,
    Scaler,
};

// Feature positions after preprocessing: scaled columns first, then the
// remaining inputs in record order.
const AGE: usize = 0;
const PREVIOUSLY_INSURED: usize = 6;
const VEHICLE_DAMAGE_YES: usize = 10;
const N_FEATURES: usize = 11;

fn demo_bundle() -> ModelBundle {
    let preprocessing = Preprocessor::new(
        vec![
            ColumnScaler::new("Age", Scaler::Standard { mean: 38.8, scale: 15.5 }),
            ColumnScaler::new("Vintage", Scaler::Standard { mean: 154.3, scale: 83.7 }),
            ColumnScaler::new(
                "Annual_Premium",
                Scaler::MinMax { min: -0.004, scale: 1.848e-6 },
            ),
        ],
        Remainder::Passthrough,
    );

    let model = Classifier::RandomForest {
        classes: vec![0, 1],
        n_features: N_FEATURES,
        trees: vec![
            DecisionTree::stump(PREVIOUSLY_INSURED, 0.5, vec![35.0, 65.0], vec![999.0, 1.0]),
            DecisionTree::stump(VEHICLE_DAMAGE_YES, 0.5, vec![95.0, 5.0], vec![30.0, 70.0]),
            DecisionTree::stump(AGE, -0.8, vec![90.0, 10.0], vec![55.0, 45.0]),
        ],
    };

    ModelBundle::new(preprocessing, model)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("write_demo_artifact=info".parse()?)
                .add_directive("vehicle_insurance_predictor=info".parse()?),
        )
        .init();

    let layout = ArtifactsConfig::default();
    let args: Vec<String> = std::env::args().collect();
    let root = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| layout.root_dir.clone());

    let run = Utc::now().format("%m_%d_%Y_%H_%M_%S").to_string();
    let path = root.join(&run).join(&layout.model_relative_path);

    ModelLoader::new().save_object(&path, &demo_bundle())?;
    info!(run = %run, path = %path.display(), "Demo artifact written");

    Ok(())
}
