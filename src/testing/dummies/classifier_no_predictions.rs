use crate::classifiers::{Classifier, PredictionMap};
use crate::core::instances::AttributesMap;

#[derive(Default)]
pub struct ClassifierNoPredictions;

impl Classifier for ClassifierNoPredictions {
    fn predict(&self, _attributes: &AttributesMap) -> PredictionMap {
        PredictionMap::new()
    }
}
