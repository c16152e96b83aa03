use crate::classifiers::predictive_model_builder::{
    BuilderConfig, PredictiveModelBuilder, config_bool, config_f64, config_str, config_usize,
};
use crate::classifiers::tree::nodes::{Branch, Leaf, Node, SplitPredicate};
use crate::classifiers::tree::scorers::{Scorer, ScorerKind};
use crate::classifiers::tree::{
    AttributeStatisticsBuilder, AttributeStats, ClassificationCounter, DecisionTree,
    TermStatistics,
};
use crate::core::attributes::{AttributeFamily, MissingValuePolicy};
use crate::core::instances::{AttributeValue, Instance};
use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::marker::PhantomData;
use tracing::{debug, info, instrument};

pub const MAX_DEPTH: &str = "maxDepth";
pub const MIN_LEAF_WEIGHT: &str = "minLeafWeight";
pub const MIN_SCORE: &str = "minScore";
pub const SCORER: &str = "scorer";
pub const NUMERIC_SPLIT_CANDIDATES: &str = "numericSplitCandidates";
pub const PARALLEL_ATTRIBUTE_STATS: &str = "parallelAttributeStats";
pub const ACCEPT_MISSING_NOMINAL: &str = "acceptMissingNominal";
pub const ACCEPT_MISSING_NUMERIC: &str = "acceptMissingNumeric";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionTreeConfig {
    pub max_depth: usize,
    pub min_leaf_weight: f64,
    /// A split must score strictly above this to be taken.
    pub min_score: f64,
    pub scorer: ScorerKind,
    pub numeric_split_candidates: usize,
    pub missing_value_policy: MissingValuePolicy,
    pub parallel: bool,
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 16,
            min_leaf_weight: 1.0,
            min_score: 1e-9,
            scorer: ScorerKind::Gini,
            numeric_split_candidates: 16,
            missing_value_policy: MissingValuePolicy::accept_all(),
            parallel: true,
        }
    }
}

impl DecisionTreeConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_leaf_weight(mut self, min_leaf_weight: f64) -> Self {
        self.min_leaf_weight = min_leaf_weight;
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_scorer(mut self, scorer: ScorerKind) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_numeric_split_candidates(mut self, candidates: usize) -> Self {
        self.numeric_split_candidates = candidates;
        self
    }

    pub fn with_missing_value_policy(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_value_policy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_leaf_weight.is_finite() || self.min_leaf_weight < 0.0 {
            return Err(ModelError::invalid_config(
                MIN_LEAF_WEIGHT,
                format!("must be finite and >= 0, got {}", self.min_leaf_weight),
            ));
        }
        if !self.min_score.is_finite() {
            return Err(ModelError::invalid_config(
                MIN_SCORE,
                format!("must be finite, got {}", self.min_score),
            ));
        }
        if self.numeric_split_candidates == 0 {
            return Err(ModelError::invalid_config(
                NUMERIC_SPLIT_CANDIDATES,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Greedy top-down builder of binary [`DecisionTree`]s.
#[derive(Debug, Clone)]
pub struct DecisionTreeBuilder<TS = ClassificationCounter> {
    config: DecisionTreeConfig,
    _statistics: PhantomData<fn() -> TS>,
}

impl<TS: TermStatistics> Default for DecisionTreeBuilder<TS> {
    fn default() -> Self {
        Self {
            config: DecisionTreeConfig::default(),
            _statistics: PhantomData,
        }
    }
}

impl<TS: TermStatistics> DecisionTreeBuilder<TS> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecisionTreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            _statistics: PhantomData,
        })
    }

    pub fn config(&self) -> &DecisionTreeConfig {
        &self.config
    }
}

impl<TS: TermStatistics> PredictiveModelBuilder for DecisionTreeBuilder<TS> {
    type Model = DecisionTree<TS>;

    #[instrument(skip_all, fields(n_instances = training_data.len(), max_depth = self.config.max_depth))]
    fn build_predictive_model(&mut self, training_data: &[Instance]) -> Result<DecisionTree<TS>> {
        if training_data.is_empty() {
            return Err(ModelError::InvalidTrainingData {
                reason: "no training instances".to_string(),
            });
        }
        let grower = TreeGrower {
            config: &self.config,
            scorer: self.config.scorer.scorer(),
            stats_builder: AttributeStatisticsBuilder::new(self.config.missing_value_policy),
        };
        let instances: Vec<&Instance> = training_data.iter().collect();
        let tree = DecisionTree::new(grower.grow::<TS>(&instances, 0));

        info!(
            nodes = tree.size(),
            mean_leaf_depth = tree.mean_leaf_depth(),
            scorer = grower.scorer.name(),
            "decision tree trained"
        );
        Ok(tree)
    }

    fn update_builder_config(&mut self, config: &BuilderConfig) -> Result<()> {
        let mut next = self.config.clone();
        if let Some(v) = config_usize(config, MAX_DEPTH)? {
            next.max_depth = v;
        }
        if let Some(v) = config_f64(config, MIN_LEAF_WEIGHT)? {
            next.min_leaf_weight = v;
        }
        if let Some(v) = config_f64(config, MIN_SCORE)? {
            next.min_score = v;
        }
        if let Some(name) = config_str(config, SCORER)? {
            next.scorer = name.parse().map_err(|_| {
                ModelError::invalid_config(SCORER, format!("unknown scorer '{name}'"))
            })?;
        }
        if let Some(v) = config_usize(config, NUMERIC_SPLIT_CANDIDATES)? {
            next.numeric_split_candidates = v;
        }
        if let Some(v) = config_bool(config, PARALLEL_ATTRIBUTE_STATS)? {
            next.parallel = v;
        }
        if let Some(v) = config_bool(config, ACCEPT_MISSING_NOMINAL)? {
            next.missing_value_policy.accept_nominal = v;
        }
        if let Some(v) = config_bool(config, ACCEPT_MISSING_NUMERIC)? {
            next.missing_value_policy.accept_numeric = v;
        }
        next.validate()?;
        self.config = next;
        Ok(())
    }
}

struct SplitCandidate {
    attribute: String,
    predicate: SplitPredicate,
    score: f64,
}

struct TreeGrower<'c> {
    config: &'c DecisionTreeConfig,
    scorer: Box<dyn Scorer>,
    stats_builder: AttributeStatisticsBuilder,
}

impl TreeGrower<'_> {
    fn grow<TS: TermStatistics>(&self, instances: &[&Instance], depth: usize) -> Node<TS> {
        let mut statistics = TS::for_value(None);
        for instance in instances {
            statistics.add_instance(instance);
        }
        let weight = statistics.total_weight();

        if depth >= self.config.max_depth
            || statistics.is_pure()
            || weight < 2.0 * self.config.min_leaf_weight
        {
            return Node::Leaf(Leaf::new(statistics, depth));
        }

        let Some(split) = self.best_split::<TS>(instances) else {
            return Node::Leaf(Leaf::new(statistics, depth));
        };

        let (true_side, false_side): (Vec<&Instance>, Vec<&Instance>) = instances
            .iter()
            .copied()
            .partition(|i| split.predicate.decide(i.attribute(&split.attribute)));
        if true_side.is_empty() || false_side.is_empty() {
            return Node::Leaf(Leaf::new(statistics, depth));
        }

        let true_weight: f64 = true_side.iter().map(|i| i.weight()).sum();
        let probability_of_true_child = if weight > 0.0 {
            (true_weight / weight).clamp(0.0, 1.0)
        } else {
            true_side.len() as f64 / instances.len() as f64
        };

        debug!(
            depth,
            attribute = %split.attribute,
            score = split.score,
            probability_of_true_child,
            "split {}",
            split.predicate.describe(&split.attribute, false)
        );

        let true_child = self.grow(&true_side, depth + 1);
        let false_child = self.grow(&false_side, depth + 1);
        Node::Branch(Branch::new(
            split.attribute,
            split.predicate,
            probability_of_true_child,
            split.score,
            statistics,
            depth,
            true_child,
            false_child,
        ))
    }

    fn best_split<TS: TermStatistics>(&self, instances: &[&Instance]) -> Option<SplitCandidate> {
        let names: BTreeSet<&str> = instances
            .iter()
            .flat_map(|i| i.attributes().keys().map(String::as_str))
            .collect();
        let attributes: Vec<(String, AttributeFamily)> = names
            .into_iter()
            .map(|name| {
                let family = AttributeFamily::infer(instances.iter().copied(), name);
                (name.to_string(), family)
            })
            .collect();

        let all_stats: Vec<AttributeStats<TS>> =
            self.stats_builder
                .attribute_stats_for_all(instances, &attributes, self.config.parallel);

        let mut best: Option<SplitCandidate> = None;
        for ((_, family), stats) in attributes.iter().zip(&all_stats) {
            let candidate = match family {
                AttributeFamily::Nominal => self.best_categorical_split(stats),
                AttributeFamily::Numeric => self.best_numeric_split(stats),
            };
            if let Some(c) = candidate
                && c.score > self.config.min_score
                && best.as_ref().is_none_or(|b| c.score > b.score)
            {
                best = Some(c);
            }
        }
        best
    }

    /// Buckets ordered by how likely they make the reference label; every
    /// proper prefix of that order is tried as the true set.
    fn best_categorical_split<TS: TermStatistics>(
        &self,
        stats: &AttributeStats<TS>,
    ) -> Option<SplitCandidate> {
        if stats.stats().len() < 2 {
            return None;
        }
        let reference = stats.aggregate().labels().into_iter().next()?;
        let mut order: Vec<&TS> = stats.stats().iter().collect();
        order.sort_by(|a, b| {
            b.point_estimate(&reference)
                .total_cmp(&a.point_estimate(&reference))
        });

        let mut best: Option<SplitCandidate> = None;
        for prefix in 1..order.len() {
            let chosen: Vec<Option<&AttributeValue>> =
                order[..prefix].iter().map(|b| b.attribute_value()).collect();
            let split = stats.binary_split(|b| chosen.contains(&b.attribute_value()));
            if !self.sides_heavy_enough(&split) {
                continue;
            }
            let score = split.score(self.scorer.as_ref());
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(SplitCandidate {
                    attribute: stats.attribute().to_string(),
                    predicate: SplitPredicate::Categorical {
                        true_set: chosen.iter().flatten().map(|v| (*v).clone()).collect(),
                        missing_is_true: chosen.contains(&None),
                    },
                    score,
                });
            }
        }
        best
    }

    /// Thresholds at midpoints between distinct observed values. Missing
    /// values always fall on the false side.
    fn best_numeric_split<TS: TermStatistics>(
        &self,
        stats: &AttributeStats<TS>,
    ) -> Option<SplitCandidate> {
        let values: Vec<f64> = stats
            .stats()
            .iter()
            .filter_map(|b| b.attribute_value().and_then(AttributeValue::as_f64))
            .collect();
        if values.len() < 2 {
            return None;
        }
        let midpoints: Vec<f64> = values
            .windows(2)
            .map(|w| w[0] + (w[1] - w[0]) / 2.0)
            .collect();

        let mut best: Option<SplitCandidate> = None;
        for threshold in evenly_spaced(&midpoints, self.config.numeric_split_candidates) {
            let split = stats.binary_split(|b| {
                b.attribute_value()
                    .and_then(AttributeValue::as_f64)
                    .is_some_and(|x| x > threshold)
            });
            if !self.sides_heavy_enough(&split) {
                continue;
            }
            let score = split.score(self.scorer.as_ref());
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(SplitCandidate {
                    attribute: stats.attribute().to_string(),
                    predicate: SplitPredicate::Numeric {
                        threshold,
                        missing_is_true: false,
                    },
                    score,
                });
            }
        }
        best
    }

    fn sides_heavy_enough<TS: TermStatistics>(&self, split: &AttributeStats<TS>) -> bool {
        split.stats().iter().all(|side| {
            side.total_weight() > 0.0 && side.total_weight() >= self.config.min_leaf_weight
        })
    }
}

fn evenly_spaced(values: &[f64], count: usize) -> Vec<f64> {
    if values.len() <= count {
        return values.to_vec();
    }
    if count == 1 {
        return vec![values[values.len() / 2]];
    }
    (0..count)
        .map(|i| values[i * (values.len() - 1) / (count - 1)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::Classifier;
    use crate::core::instances::AttributesMap;
    use serde_json::json;
    use std::collections::HashSet;

    const EPS: f64 = 1e-12;

    fn inst(pairs: &[(&str, AttributeValue)], label: &str, weight: f64) -> Instance {
        let attrs: AttributesMap = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Instance::new(attrs, label, weight).unwrap()
    }

    fn colors() -> Vec<Instance> {
        let mut data = Vec::new();
        for _ in 0..4 {
            data.push(inst(&[("color", "red".into())], "A", 1.0));
            data.push(inst(&[("color", "blue".into())], "B", 1.0));
        }
        data.push(inst(&[("color", "green".into())], "B", 2.0));
        data
    }

    fn attrs(pairs: &[(&str, AttributeValue)]) -> AttributesMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn cfg(v: serde_json::Value) -> BuilderConfig {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn separates_nominal_values() {
        let mut builder = DecisionTreeBuilder::<ClassificationCounter>::new();
        let tree = builder.build_predictive_model(&colors()).unwrap();
        assert_eq!(tree.size(), 3);

        let Node::Branch(root) = tree.root() else {
            panic!("expected a branch at the root");
        };
        assert_eq!(root.attribute(), "color");
        assert!((root.probability_of_true_child() - 4.0 / 10.0).abs() < EPS);

        let red = attrs(&[("color", "red".into())]);
        let green = attrs(&[("color", "green".into())]);
        assert!((tree.probability(&red, &"A".into()) - 1.0).abs() < EPS);
        assert!((tree.probability(&green, &"B".into()) - 1.0).abs() < EPS);
        // unseen values and missing attributes still reach a leaf
        assert_eq!(tree.predict(&attrs(&[("color", "purple".into())])).len(), 1);
        assert_eq!(tree.predict(&AttributesMap::new()).len(), 1);
    }

    #[test]
    fn numeric_split_uses_midpoint_threshold() {
        let data: Vec<Instance> = (1..=10)
            .map(|x| {
                let label = if x > 5 { "high" } else { "low" };
                inst(&[("x", (x as f64).into())], label, 1.0)
            })
            .collect();
        let mut builder = DecisionTreeBuilder::<ClassificationCounter>::new();
        let tree = builder.build_predictive_model(&data).unwrap();

        let Node::Branch(root) = tree.root() else {
            panic!("expected a branch at the root");
        };
        assert_eq!(
            root.predicate(),
            &SplitPredicate::Numeric {
                threshold: 5.5,
                missing_is_true: false
            }
        );
        assert!((tree.probability(&attrs(&[("x", 7.2.into())]), &"high".into()) - 1.0).abs() < EPS);
        // missing numeric values go to the false side
        assert!((tree.probability(&AttributesMap::new(), &"low".into()) - 1.0).abs() < EPS);
    }

    #[test]
    fn zero_depth_yields_a_single_leaf() {
        let config = DecisionTreeConfig::default().with_max_depth(0);
        let mut builder = DecisionTreeBuilder::<ClassificationCounter>::with_config(config).unwrap();
        let tree = builder.build_predictive_model(&colors()).unwrap();
        assert_eq!(tree.size(), 1);
        assert!(tree.root().is_leaf());
        assert!((tree.probability(&AttributesMap::new(), &"A".into()) - 4.0 / 10.0).abs() < EPS);
    }

    #[test]
    fn rejects_empty_training_data() {
        let mut builder = DecisionTreeBuilder::<ClassificationCounter>::new();
        let err = builder.build_predictive_model(&[]).unwrap_err();
        assert!(err.is_invalid_training_data());
    }

    #[test]
    fn equal_scores_prefer_earlier_attribute_names() {
        let data: Vec<Instance> = (0..6)
            .map(|i| {
                let v: AttributeValue = if i % 2 == 0 { "x".into() } else { "y".into() };
                let label = if i % 2 == 0 { "A" } else { "B" };
                inst(&[("zeta", v.clone()), ("alpha", v)], label, 1.0)
            })
            .collect();
        let mut builder = DecisionTreeBuilder::<ClassificationCounter>::new();
        let tree = builder.build_predictive_model(&data).unwrap();
        let Node::Branch(root) = tree.root() else {
            panic!("expected a branch at the root");
        };
        assert_eq!(root.attribute(), "alpha");
    }

    #[test]
    fn min_leaf_weight_blocks_light_splits() {
        let data = vec![
            inst(&[("color", "red".into())], "A", 1.0),
            inst(&[("color", "blue".into())], "B", 5.0),
        ];
        let config = DecisionTreeConfig::default().with_min_leaf_weight(2.0);
        let mut builder = DecisionTreeBuilder::<ClassificationCounter>::with_config(config).unwrap();
        let tree = builder.build_predictive_model(&data).unwrap();
        assert_eq!(tree.size(), 1);
    }

    #[test]
    fn parallel_and_sequential_growth_agree() {
        let mut data = colors();
        for x in 0..20 {
            let label = if x % 3 == 0 { "A" } else { "B" };
            data.push(inst(
                &[("size", (x as f64).into()), ("color", "red".into())],
                label,
                1.0 + x as f64 / 10.0,
            ));
        }
        let seq_config = DecisionTreeConfig::default().with_parallel(false);
        let mut sequential = DecisionTreeBuilder::<ClassificationCounter>::with_config(seq_config).unwrap();
        let mut parallel = DecisionTreeBuilder::<ClassificationCounter>::new();
        assert_eq!(
            sequential.build_predictive_model(&data).unwrap(),
            parallel.build_predictive_model(&data).unwrap()
        );
    }

    #[test]
    fn ignoring_the_root_attribute_returns_the_prior() {
        let mut builder = DecisionTreeBuilder::<ClassificationCounter>::new();
        let tree = builder.build_predictive_model(&colors()).unwrap();
        let ignore: HashSet<String> = ["color".to_string()].into();
        let p = tree.probability_without_attributes(
            &attrs(&[("color", "red".into())]),
            &"A".into(),
            &ignore,
        );
        assert!((p - 4.0 / 10.0).abs() < EPS);
    }

    #[test]
    fn trees_round_trip_through_json() {
        let mut builder = DecisionTreeBuilder::<ClassificationCounter>::new();
        let tree = builder.build_predictive_model(&colors()).unwrap();
        let text = serde_json::to_string(&tree).unwrap();
        let back: DecisionTree = serde_json::from_str(&text).unwrap();
        assert_eq!(tree, back);

        let mut numeric = Vec::new();
        for i in 0..5 {
            let x = AttributeValue::from(i as f64);
            numeric.push(Instance::new(attrs(&[("x", x)]), 0.0, 1.0).unwrap());
            let x = AttributeValue::from(10.0 + i as f64);
            numeric.push(Instance::new(attrs(&[("x", x)]), 1.0, 1.0).unwrap());
        }
        let tree = builder.build_predictive_model(&numeric).unwrap();
        let text = serde_json::to_string(&tree).unwrap();
        let back: DecisionTree = serde_json::from_str(&text).unwrap();
        assert_eq!(tree, back);
        let high = attrs(&[("x", 12.0.into())]);
        assert_eq!(back.probability(&high, &1.0.into()), 1.0);
        assert_eq!(back.probability(&high, &"1.0".into()), 0.0);
    }

    #[test]
    fn update_builder_config_applies_known_keys() {
        let mut builder = DecisionTreeBuilder::<ClassificationCounter>::new();
        builder
            .update_builder_config(&cfg(json!({
                "maxDepth": 3,
                "minLeafWeight": 0.5,
                "scorer": "entropy",
                "acceptMissingNumeric": false,
                "minorityInstanceProportion": 0.2
            })))
            .unwrap();
        let c = builder.config();
        assert_eq!(c.max_depth, 3);
        assert_eq!(c.min_leaf_weight, 0.5);
        assert_eq!(c.scorer, ScorerKind::Entropy);
        assert!(c.missing_value_policy.accept_nominal);
        assert!(!c.missing_value_policy.accept_numeric);
    }

    #[test]
    fn update_builder_config_rejects_bad_values_atomically() {
        let mut builder = DecisionTreeBuilder::<ClassificationCounter>::new();
        let before = builder.config().clone();

        for bad in [
            json!({"maxDepth": 2, "scorer": "variance"}),
            json!({"maxDepth": "deep"}),
            json!({"minLeafWeight": -1.0}),
            json!({"numericSplitCandidates": 0}),
        ] {
            let err = builder.update_builder_config(&cfg(bad)).unwrap_err();
            assert!(matches!(err, ModelError::InvalidConfiguration { .. }));
            assert_eq!(builder.config(), &before);
        }
    }

    #[test]
    fn evenly_spaced_keeps_the_ends() {
        let values: Vec<f64> = (0..10).map(|v| v as f64).collect();
        assert_eq!(evenly_spaced(&values, 20), values);
        assert_eq!(evenly_spaced(&values, 3), vec![0.0, 4.0, 9.0]);
        assert_eq!(evenly_spaced(&values, 1), vec![5.0]);
    }
}
