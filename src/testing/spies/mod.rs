mod train_spy_builder;

pub use train_spy_builder::{TrainSpyBuilder, TrainSpyHandle};
