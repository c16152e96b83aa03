use crate::classifiers::{Classifier, PredictionMap};
use crate::core::instances::{AttributeValue, Instance};

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionMapResult {
    prediction: PredictionMap,
    label: AttributeValue,
    weight: f64,
}

impl PredictionMapResult {
    pub fn new(prediction: PredictionMap, label: AttributeValue, weight: f64) -> Self {
        Self {
            prediction,
            label,
            weight,
        }
    }

    pub fn prediction(&self) -> &PredictionMap {
        &self.prediction
    }

    pub fn label(&self) -> &AttributeValue {
        &self.label
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn prediction_for_label(&self) -> f64 {
        self.prediction.probability(&self.label)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionMapResults {
    results: Vec<PredictionMapResult>,
}

impl PredictionMapResults {
    pub fn new(results: Vec<PredictionMapResult>) -> Self {
        Self { results }
    }

    pub fn from_classifier<C: Classifier + ?Sized>(classifier: &C, instances: &[Instance]) -> Self {
        instances
            .iter()
            .map(|i| {
                PredictionMapResult::new(
                    classifier.predict(i.attributes()),
                    i.label().clone(),
                    i.weight(),
                )
            })
            .collect()
    }

    pub fn push(&mut self, result: PredictionMapResult) {
        self.results.push(result);
    }

    pub fn total_weight(&self) -> f64 {
        self.results.iter().map(|r| r.weight).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictionMapResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl FromIterator<PredictionMapResult> for PredictionMapResults {
    fn from_iter<T: IntoIterator<Item = PredictionMapResult>>(iter: T) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PredictionMapResults {
    type Item = &'a PredictionMapResult;
    type IntoIter = std::slice::Iter<'a, PredictionMapResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
