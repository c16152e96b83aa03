pub mod loss;
mod prediction_map_result;

pub use prediction_map_result::{PredictionMapResult, PredictionMapResults};
