mod arff_file_stream;
mod parser;

pub use arff_file_stream::{ArffFileStream, load_instances};
