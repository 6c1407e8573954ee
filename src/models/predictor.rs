//! Trained classifiers that can be serialized inside a model bundle

use crate::error::FrameError;
use crate::models::bundle::Predict;
use anyhow::{anyhow, bail, Context, Result};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn default_threshold() -> f64 {
    0.5
}

/// Binary decision tree stored as parallel node arrays.
///
/// Node `i` is a leaf when `children_left[i] < 0`; otherwise rows with
/// `x[feature[i]] <= threshold[i]` go left. `value[i]` holds the class
/// weights seen at that node during training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    /// Single leaf returning fixed class weights
    pub fn leaf(value: Vec<f64>) -> Self {
        Self {
            children_left: vec![-1],
            children_right: vec![-1],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![value],
        }
    }

    /// One split on `feature` at `threshold` with two leaves
    pub fn stump(feature: usize, threshold: f64, left: Vec<f64>, right: Vec<f64>) -> Self {
        let root: Vec<f64> = left.iter().zip(&right).map(|(l, r)| l + r).collect();
        Self {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![feature as i64, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![root, left, right],
        }
    }

    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Check the node arrays describe a usable tree over `n_features` inputs
    /// with `n_classes` weights per node
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<()> {
        let nodes = self.node_count();
        if nodes == 0 {
            bail!("tree has no nodes");
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != nodes)
        {
            bail!(
                "tree arrays disagree on node count: children_left {}, children_right {}, feature {}, threshold {}, value {}",
                nodes,
                self.children_right.len(),
                self.feature.len(),
                self.threshold.len(),
                self.value.len()
            );
        }

        for node in 0..nodes {
            if self.value[node].len() != n_classes {
                bail!(
                    "node {} has {} class weights, expected {}",
                    node,
                    self.value[node].len(),
                    n_classes
                );
            }
            if self.children_left[node] < 0 {
                continue;
            }
            for child in [self.children_left[node], self.children_right[node]] {
                if child < 0 || child as usize >= nodes {
                    bail!("node {} points to missing child {}", node, child);
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                bail!("node {} splits on feature {} of {}", node, feature, n_features);
            }
        }
        Ok(())
    }

    fn node<T: Copy>(values: &[T], node: usize) -> Result<T> {
        values
            .get(node)
            .copied()
            .ok_or_else(|| anyhow!("tree references missing node {}", node))
    }

    /// Walk from the root to the leaf this row lands in
    fn find_leaf(&self, row: ArrayView1<f64>) -> Result<usize> {
        let mut node = 0usize;

        // a well-formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..=self.node_count() {
            let left = Self::node(&self.children_left, node)?;
            if left < 0 {
                return Ok(node);
            }

            let feature = Self::node(&self.feature, node)?;
            let x = usize::try_from(feature)
                .ok()
                .and_then(|f| row.get(f).copied())
                .ok_or_else(|| anyhow!("tree splits on feature {} of {}", feature, row.len()))?;

            let next = if x <= Self::node(&self.threshold, node)? {
                left
            } else {
                Self::node(&self.children_right, node)?
            };
            node = usize::try_from(next)
                .map_err(|_| anyhow!("node {} points to missing child {}", node, next))?;
        }

        bail!("tree contains a cycle")
    }

    /// Normalized class probabilities for one row
    pub fn predict_proba_row(&self, row: ArrayView1<f64>) -> Result<Vec<f64>> {
        let leaf = self.find_leaf(row)?;
        let weights = self
            .value
            .get(leaf)
            .ok_or_else(|| anyhow!("tree references missing node {}", leaf))?;
        if weights.is_empty() {
            bail!("leaf {} has no class weights", leaf);
        }
        let total: f64 = weights.iter().sum();

        if total <= 0.0 {
            return Ok(vec![1.0 / weights.len() as f64; weights.len()]);
        }
        Ok(weights.iter().map(|w| w / total).collect())
    }
}

/// Trained model object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Classifier {
    /// Averaged probabilities of independent trees
    RandomForest {
        classes: Vec<i64>,
        n_features: usize,
        trees: Vec<DecisionTree>,
    },
    /// Binary logistic regression
    Logistic {
        classes: Vec<i64>,
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
}

impl Classifier {
    /// Class labels, indexed like the probability columns
    pub fn classes(&self) -> &[i64] {
        match self {
            Classifier::RandomForest { classes, .. } => classes,
            Classifier::Logistic { classes, .. } => classes,
        }
    }

    /// Number of input features the model was trained on
    pub fn n_features(&self) -> usize {
        match self {
            Classifier::RandomForest { n_features, .. } => *n_features,
            Classifier::Logistic { coefficients, .. } => coefficients.len(),
        }
    }

    /// Reject model objects that deserialized but cannot predict
    pub fn validate(&self) -> Result<()> {
        let n_classes = self.classes().len();
        if n_classes == 0 {
            bail!("classifier has no classes");
        }

        match self {
            Classifier::RandomForest {
                n_features, trees, ..
            } => {
                if trees.is_empty() {
                    bail!("random forest has no trees");
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(*n_features, n_classes)
                        .with_context(|| format!("tree {} is malformed", i))?;
                }
            }
            Classifier::Logistic { .. } => {
                if n_classes != 2 {
                    bail!("logistic model needs exactly 2 classes, has {}", n_classes);
                }
            }
        }
        Ok(())
    }

    /// Probability per row and class
    pub fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        self.validate()?;

        let expected = self.n_features();
        if features.ncols() != expected {
            return Err(FrameError::FeatureCount {
                expected,
                actual: features.ncols(),
            }
            .into());
        }

        let n_classes = self.classes().len();
        let mut proba = Array2::zeros((features.nrows(), n_classes));

        match self {
            Classifier::RandomForest { trees, .. } => {
                for (i, row) in features.axis_iter(Axis(0)).enumerate() {
                    for tree in trees {
                        let tree_proba = tree.predict_proba_row(row)?;
                        if tree_proba.len() != n_classes {
                            bail!(
                                "tree reports {} classes, forest has {}",
                                tree_proba.len(),
                                n_classes
                            );
                        }
                        for (k, p) in tree_proba.into_iter().enumerate() {
                            proba[[i, k]] += p / trees.len() as f64;
                        }
                    }
                }
            }
            Classifier::Logistic {
                coefficients,
                intercept,
                ..
            } => {
                for (i, row) in features.axis_iter(Axis(0)).enumerate() {
                    let z: f64 = row.iter().zip(coefficients).map(|(x, w)| x * w).sum::<f64>()
                        + intercept;
                    let p = 1.0 / (1.0 + (-z).exp());
                    proba[[i, 0]] = 1.0 - p;
                    proba[[i, 1]] = p;
                }
            }
        }

        Ok(proba)
    }
}

impl Predict for Classifier {
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<i64>> {
        let proba = self.predict_proba(features)?;
        let classes = self.classes();

        let labels: Vec<i64> = match self {
            Classifier::Logistic { threshold, .. } => proba
                .axis_iter(Axis(0))
                .map(|row| if row[1] >= *threshold { classes[1] } else { classes[0] })
                .collect(),
            Classifier::RandomForest { .. } => proba
                .axis_iter(Axis(0))
                .map(|row| classes[argmax(row)])
                .collect(),
        };

        debug!(rows = labels.len(), "Classifier predictions complete");
        Ok(labels)
    }
}

/// Index of the first maximum
fn argmax(row: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, &p) in row.iter().enumerate() {
        if p > row[best] {
            best = i;
        }
    }
    best
}
