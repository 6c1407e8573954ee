//! Model bundle, its fitted components, and model resolution

pub mod bundle;
pub mod loader;
pub mod predictor;
pub mod preprocess;
pub mod resolver;

pub use bundle::{ModelBundle, Predict, Transform};
pub use loader::ModelLoader;
pub use predictor::{Classifier, DecisionTree};
pub use preprocess::{ColumnScaler, Preprocessor, Remainder, Scaler};
pub use resolver::{find_latest_model, ModelResolver, ModelSource};
