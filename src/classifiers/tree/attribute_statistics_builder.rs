use crate::classifiers::tree::{AttributeStats, TermStatistics};
use crate::core::attributes::{AttributeFamily, MissingValuePolicy};
use crate::core::instances::{AttributeValue, Instance};
use rayon::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeStatisticsBuilder {
    missing_value_policy: MissingValuePolicy,
}

impl AttributeStatisticsBuilder {
    pub fn new(missing_value_policy: MissingValuePolicy) -> Self {
        Self {
            missing_value_policy,
        }
    }

    pub fn missing_value_policy(&self) -> MissingValuePolicy {
        self.missing_value_policy
    }

    pub fn attribute_stats<'a, TS, I>(&self, instances: I, attribute: &str) -> AttributeStats<TS>
    where
        TS: TermStatistics,
        I: IntoIterator<Item = &'a Instance>,
        I::IntoIter: Clone,
    {
        let iter = instances.into_iter();
        let family = AttributeFamily::infer(iter.clone(), attribute);
        self.attribute_stats_for_family(iter, attribute, family)
    }

    /// One bucket per distinct observed value, in value order, followed by the
    /// MISSING bucket when any instance lacks the attribute and `family`
    /// accepts missing values. Instances lacking it otherwise are skipped.
    pub fn attribute_stats_for_family<'a, TS, I>(
        &self,
        instances: I,
        attribute: &str,
        family: AttributeFamily,
    ) -> AttributeStats<TS>
    where
        TS: TermStatistics,
        I: IntoIterator<Item = &'a Instance>,
    {
        let accepts_missing = self.missing_value_policy.accepts(family);
        let mut by_value: BTreeMap<AttributeValue, TS> = BTreeMap::new();
        let mut missing: Option<TS> = None;
        let mut aggregate = TS::for_value(None);

        for instance in instances {
            let bucket = match instance.attribute(attribute) {
                Some(value) => by_value
                    .entry(value.clone())
                    .or_insert_with(|| TS::for_value(Some(value.clone()))),
                None if accepts_missing => missing.get_or_insert_with(|| TS::for_value(None)),
                None => continue,
            };
            bucket.add_instance(instance);
            aggregate.add_instance(instance);
        }

        let mut stats: Vec<TS> = by_value.into_values().collect();
        stats.extend(missing);
        AttributeStats::new(stats, aggregate, attribute)
    }

    pub fn attribute_stats_for_all<TS>(
        &self,
        instances: &[&Instance],
        attributes: &[(String, AttributeFamily)],
        parallel: bool,
    ) -> Vec<AttributeStats<TS>>
    where
        TS: TermStatistics,
    {
        let one = |(name, family): &(String, AttributeFamily)| {
            self.attribute_stats_for_family(instances.iter().copied(), name, *family)
        };
        if parallel {
            attributes.par_iter().map(one).collect()
        } else {
            attributes.iter().map(one).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::tree::ClassificationCounter;
    use crate::core::instances::AttributesMap;

    fn inst(pairs: &[(&str, AttributeValue)], label: &str, weight: f64) -> Instance {
        let attrs: AttributesMap = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Instance::new(attrs, label, weight).unwrap()
    }

    fn assert_conserves_weight(stats: &AttributeStats<ClassificationCounter>) {
        let mut summed = ClassificationCounter::new();
        for s in stats.stats() {
            summed.merge(s);
        }
        assert_eq!(summed.counts(), stats.aggregate().counts());
    }

    #[test]
    fn red_blue_scenario() {
        let data = vec![
            inst(&[("color", "red".into())], "A", 1.0),
            inst(&[("color", "blue".into())], "B", 3.0),
        ];
        let builder = AttributeStatisticsBuilder::default();
        let stats: AttributeStats<ClassificationCounter> = builder.attribute_stats(&data, "color");

        assert_eq!(stats.attribute(), "color");
        assert_eq!(stats.stats().len(), 2);
        let blue = &stats.stats()[0];
        let red = &stats.stats()[1];
        assert_eq!(blue.attribute_value(), Some(&AttributeValue::from("blue")));
        assert_eq!(blue.counts().len(), 1);
        assert_eq!(blue.count(&"B".into()), 3.0);
        assert_eq!(red.attribute_value(), Some(&AttributeValue::from("red")));
        assert_eq!(red.counts().len(), 1);
        assert_eq!(red.count(&"A".into()), 1.0);

        assert_eq!(stats.aggregate().count(&"A".into()), 1.0);
        assert_eq!(stats.aggregate().count(&"B".into()), 3.0);
        assert_conserves_weight(&stats);
    }

    #[test]
    fn missing_values_land_in_their_own_bucket() {
        let data = vec![
            inst(&[("color", "red".into())], "A", 1.0),
            inst(&[], "B", 2.0),
            inst(&[("size", 3.0.into())], "A", 0.5),
        ];
        let builder = AttributeStatisticsBuilder::default();
        let stats: AttributeStats<ClassificationCounter> = builder.attribute_stats(&data, "color");

        assert_eq!(stats.stats().len(), 2);
        let missing = stats.stats().last().unwrap();
        assert_eq!(missing.attribute_value(), None);
        assert_eq!(missing.count(&"B".into()), 2.0);
        assert_eq!(missing.count(&"A".into()), 0.5);
        assert_eq!(stats.aggregate().total(), 3.5);
        assert_conserves_weight(&stats);
    }

    #[test]
    fn rejected_missing_values_are_skipped_for_that_attribute_only() {
        let data = vec![
            inst(&[("color", "red".into()), ("size", 1.0.into())], "A", 1.0),
            inst(&[("size", 2.0.into())], "B", 2.0),
        ];
        let policy = MissingValuePolicy {
            accept_nominal: false,
            accept_numeric: true,
        };
        let builder = AttributeStatisticsBuilder::new(policy);

        let color: AttributeStats<ClassificationCounter> = builder.attribute_stats(&data, "color");
        assert_eq!(color.stats().len(), 1);
        assert_eq!(color.aggregate().total(), 1.0);
        assert_conserves_weight(&color);

        let size: AttributeStats<ClassificationCounter> = builder.attribute_stats(&data, "size");
        assert_eq!(size.stats().len(), 2);
        assert_eq!(size.aggregate().total(), 3.0);
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let data: Vec<Instance> = (0..200)
            .map(|i| {
                inst(
                    &[
                        ("a", AttributeValue::from(format!("v{}", i % 7))),
                        ("b", AttributeValue::from((i % 5) as f64)),
                    ],
                    if i % 3 == 0 { "yes" } else { "no" },
                    1.0 + (i % 4) as f64,
                )
            })
            .collect();
        let refs: Vec<&Instance> = data.iter().collect();
        let attributes = vec![
            ("a".to_string(), AttributeFamily::Nominal),
            ("b".to_string(), AttributeFamily::Numeric),
            ("c".to_string(), AttributeFamily::Nominal),
        ];
        let builder = AttributeStatisticsBuilder::default();

        let seq: Vec<AttributeStats<ClassificationCounter>> =
            builder.attribute_stats_for_all(&refs, &attributes, false);
        let par: Vec<AttributeStats<ClassificationCounter>> =
            builder.attribute_stats_for_all(&refs, &attributes, true);

        assert_eq!(seq, par);
        assert_eq!(seq[0].stats().len(), 7);
        assert_eq!(seq[1].stats().len(), 5);
        // every instance lacks "c"
        assert_eq!(seq[2].stats().len(), 1);
        for s in &seq {
            assert_conserves_weight(s);
        }
    }
}
