use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::streams::Stream;
use crate::streams::arff::parser::{is_comment_or_empty, parse_header, parse_instance};
use std::fs::File;
use std::io::{BufRead, BufReader, Error, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug)]
pub struct ArffFileStream {
    path: PathBuf,
    reader: BufReader<File>,
    header: InstanceHeader,
    data_start_pos: u64,
    next_line: Option<String>,
    finished: bool,
    skipped: usize,
}

impl Stream for ArffFileStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        !self.finished || self.next_line.is_some()
    }

    fn next_instance(&mut self) -> Option<Instance> {
        loop {
            let line = self.next_line.take()?;
            if let Err(e) = self.fill_next_line() {
                warn!(error = %e, "stopped reading ARFF data");
                self.finished = true;
                self.next_line = None;
            }

            match parse_instance(&self.header, &line) {
                Ok(instance) => return Some(instance),
                Err(e) => {
                    self.skipped += 1;
                    warn!(line = %line, error = %e, "skipping invalid ARFF row");
                }
            }
        }
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.reader = BufReader::new(File::open(&self.path)?);
        self.reader.seek(SeekFrom::Start(self.data_start_pos))?;
        self.finished = false;
        self.next_line = None;
        self.skipped = 0;
        self.fill_next_line()?;
        Ok(())
    }
}

impl ArffFileStream {
    pub fn new(path: PathBuf, class_index: Option<usize>) -> Result<Self, Error> {
        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);

        let (header, data_start_pos) = parse_header(&mut reader, class_index)?;

        let mut stream = ArffFileStream {
            path,
            reader,
            header,
            data_start_pos,
            next_line: None,
            finished: false,
            skipped: 0,
        };

        stream.fill_next_line()?;
        Ok(stream)
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn fill_next_line(&mut self) -> Result<(), Error> {
        if self.finished {
            self.next_line = None;
            return Ok(());
        }
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.reader.read_line(&mut line)?;
            if n == 0 {
                self.finished = true;
                self.next_line = None;
                return Ok(());
            }
            if !is_comment_or_empty(&line) {
                self.next_line = Some(line.trim().to_string());
                return Ok(());
            }
        }
    }
}

pub fn load_instances(path: &Path, class_index: Option<usize>) -> Result<Vec<Instance>, Error> {
    let mut stream = ArffFileStream::new(path.to_path_buf(), class_index)?;
    let instances = stream.read_remaining();
    info!(
        path = %path.display(),
        relation = stream.header().relation_name(),
        n_instances = instances.len(),
        skipped = stream.skipped(),
        "dataset loaded"
    );
    Ok(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instances::AttributeValue;
    use std::fs;
    use std::io::ErrorKind;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn write_arff(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().expect("tempfile");
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    const WEATHER: &str = r#"%
@relation weather
@attribute outlook {sunny, overcast, rainy}
@attribute temperature numeric
@attribute humidity numeric
@attribute windy {TRUE, FALSE}
@attribute play {yes, no}
@data
sunny,85,85,FALSE,no
sunny,80,90,TRUE,no, {3}
overcast,83,86,FALSE,yes
% comment between rows
rainy,70,96,FALSE,yes
?,75,?,TRUE,yes
"#;

    #[test]
    fn reads_header_and_instances() {
        let tf = write_arff(WEATHER);
        let mut stream = ArffFileStream::new(tf.path().to_path_buf(), None).expect("open");
        let h = stream.header();
        assert_eq!(h.relation_name(), "weather");
        assert_eq!(h.number_of_attributes(), 5);
        assert_eq!(h.class_index(), 4);

        let first = stream.next_instance().expect("first");
        assert_eq!(first.label(), &AttributeValue::from("no"));
        assert_eq!(first.attributes().len(), 4);

        let second = stream.next_instance().unwrap();
        assert_eq!(second.weight(), 3.0);

        let _ = stream.next_instance().unwrap();
        let _ = stream.next_instance().unwrap();

        let last = stream.next_instance().unwrap();
        assert!(last.attribute("outlook").is_none());
        assert!(last.attribute("humidity").is_none());
        assert!(!stream.has_more_instances());
        assert!(stream.next_instance().is_none());

        stream.restart().unwrap();
        assert_eq!(stream.next_instance().unwrap(), first);
    }

    #[test]
    fn load_instances_reads_everything() {
        let tf = write_arff(WEATHER);
        let instances = load_instances(tf.path(), Some(4)).unwrap();
        assert_eq!(instances.len(), 5);
        assert_eq!(instances.iter().map(|i| i.weight()).sum::<f64>(), 7.0);
    }

    #[test]
    fn new_missing_file_returns_err_not_found() {
        let err = ArffFileStream::new("no/such/file.arff".into(), Some(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn nominal_domain_without_closing_brace_errors() {
        let tf = write_arff("@relation r\n@attribute outlook {sunny, rainy\n@data\nsunny\n");
        let err = ArffFileStream::new(tf.path().to_path_buf(), Some(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let tf = write_arff(
            "@relation r\n@attribute x numeric\n@attribute y {a, b}\n@data\nabc,a\n1\n2,b\n3,c\n",
        );
        let mut stream = ArffFileStream::new(tf.path().to_path_buf(), None).unwrap();
        let instances = stream.read_remaining();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].attribute("x"), Some(&2.0.into()));
        assert_eq!(stream.skipped(), 3);
    }

    #[test]
    fn only_malformed_rows_yield_none() {
        let tf = write_arff("@relation r\n@attribute x numeric\n@data\nabc\n");
        let mut stream = ArffFileStream::new(tf.path().to_path_buf(), Some(0)).unwrap();
        assert!(stream.next_instance().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn read_errors_finish_the_stream() {
        let tf = write_arff("@relation r\n@attribute a numeric\n@data\n1\n2\n");
        let mut s = ArffFileStream::new(tf.path().to_path_buf(), Some(0)).unwrap();
        let _ = s.next_instance().unwrap();
        let dir = tempdir().unwrap();
        s.reader = BufReader::new(File::open(dir.path()).unwrap());
        let _ = s.next_instance();
        assert!(s.finished);
        assert!(!s.has_more_instances());
    }

    #[test]
    #[cfg(not(windows))]
    fn restart_after_file_removed_returns_err() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.arff");
        fs::write(&path, "@relation r\n@attribute x numeric\n@data\n1\n").unwrap();
        let mut stream = ArffFileStream::new(path.clone(), Some(0)).unwrap();
        fs::remove_file(&path).unwrap();
        let err = stream.restart().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
