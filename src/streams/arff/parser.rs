use crate::core::instance_header::{AttributeDomain, HeaderAttribute, InstanceHeader};
use crate::core::instances::{AttributeValue, AttributesMap, Instance};
use crate::utils::file_parsing::{split_csv_preserving_quotes, strip_surrounding_quotes};
use std::fs::File;
use std::io::{BufRead, BufReader, Error, ErrorKind, Seek};

pub(super) fn is_comment_or_empty(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.starts_with('%')
}

pub(super) fn parse_header(
    reader: &mut BufReader<File>,
    class_index: Option<usize>,
) -> Result<(InstanceHeader, u64), Error> {
    let mut relation: Option<String> = None;
    let mut attributes: Vec<HeaderAttribute> = Vec::new();
    let mut line = String::new();
    let mut pending_line: Option<String> = None;

    loop {
        line.clear();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                "ARFF file ended before @data",
            ));
        }
        if is_comment_or_empty(&line) {
            continue;
        }

        let low = line.to_lowercase();
        if low.starts_with("@relation") {
            let raw = line.trim()[9..].trim();
            relation = Some(strip_surrounding_quotes(raw).to_string());
            break;
        } else if low.starts_with("@attribute") || low.starts_with("@data") {
            pending_line = Some(line.clone());
            break;
        }
    }

    let data_start_pos: u64;
    loop {
        if let Some(pending) = pending_line.take() {
            line = pending;
        } else {
            line.clear();
            let n = reader.read_line(&mut line)?;
            if n == 0 {
                return Err(Error::new(
                    ErrorKind::UnexpectedEof,
                    "ARFF file ended before @data",
                ));
            }
        }

        if is_comment_or_empty(&line) {
            continue;
        }

        let low = line.to_lowercase();
        if low.starts_with("@attribute") {
            attributes.push(parse_attribute_line(&line)?);
        } else if low.starts_with("@data") {
            data_start_pos = reader.stream_position()?;
            break;
        } else {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("Unsupported header directive: {}", line.trim()),
            ));
        }
    }

    if attributes.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidData,
            "ARFF header declares no attributes",
        ));
    }
    let class_index = class_index.unwrap_or(attributes.len() - 1);
    if class_index >= attributes.len() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "Class index {class_index} out of range for {} attributes",
                attributes.len()
            ),
        ));
    }

    let header = InstanceHeader::new(
        relation.unwrap_or_else(|| "unnamed_relation".to_string()),
        attributes,
        class_index,
    );

    Ok((header, data_start_pos))
}

pub(super) fn parse_attribute_line(line: &str) -> Result<HeaderAttribute, Error> {
    let rest = {
        let l = line.trim();
        let low = l.to_ascii_lowercase();
        if !low.starts_with("@attribute") {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "Line is not '@attribute'",
            ));
        }
        l["@attribute".len()..].trim()
    };

    let (name, after_name) = match rest.chars().next() {
        Some(quote @ ('\'' | '"')) => {
            let end = rest
                .char_indices()
                .skip(1)
                .find(|&(_, c)| c == quote)
                .map(|(i, _)| i)
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::InvalidData,
                        "Attribute name without closing quote marks",
                    )
                })?;
            (rest[1..end].to_string(), rest[end + 1..].trim())
        }
        _ => {
            let mut it = rest.splitn(2, char::is_whitespace);
            let name = it.next().unwrap_or_default().to_string();
            let after = it
                .next()
                .ok_or_else(|| Error::new(ErrorKind::InvalidData, "Attribute type is missing"))?;
            (name, after.trim())
        }
    };

    let low = after_name.to_ascii_lowercase();
    if low.starts_with("numeric") || low.starts_with("real") || low.starts_with("integer") {
        return Ok(HeaderAttribute::numeric(name));
    }

    if after_name.starts_with('{') {
        let close = after_name
            .rfind('}')
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "Nominal set without closing '}'"))?;

        let values = after_name[1..close]
            .split(',')
            .map(|s| strip_surrounding_quotes(s.trim()).to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        if values.is_empty() {
            return Err(Error::new(ErrorKind::InvalidData, "Empty nominal domain"));
        }

        return Ok(HeaderAttribute::nominal(name, values));
    }

    Err(Error::new(
        ErrorKind::InvalidData,
        format!("Attribute kind not supported: {after_name}"),
    ))
}

/// Parses one data row. `?` leaves the attribute absent from the map; an
/// extra trailing `{w}` column sets the instance weight.
pub(super) fn parse_instance(header: &InstanceHeader, line: &str) -> Result<Instance, Error> {
    let mut tokens = split_csv_preserving_quotes(line);
    let n_attributes = header.number_of_attributes();

    let mut weight = 1.0;
    if tokens.len() == n_attributes + 1 {
        let raw = tokens.pop().unwrap_or_default();
        let raw = raw.trim();
        let inner = raw
            .strip_prefix('{')
            .and_then(|r| r.strip_suffix('}'))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidData,
                    format!("Expected an instance weight like {{2.5}}, got '{raw}'"),
                )
            })?;
        weight = inner.trim().parse().map_err(|_| {
            Error::new(
                ErrorKind::InvalidData,
                format!("Invalid instance weight '{inner}'"),
            )
        })?;
    }

    if tokens.len() != n_attributes {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!(
                "Number of columns ({}) differs from number of attributes ({})",
                tokens.len(),
                n_attributes
            ),
        ));
    }

    let mut attributes = AttributesMap::new();
    let mut label: Option<AttributeValue> = None;
    for (idx, (raw, attr)) in tokens.iter().zip(&header.attributes).enumerate() {
        let raw = raw.trim();
        if raw == "?" {
            continue;
        }

        let value = match &attr.domain {
            AttributeDomain::Numeric => {
                let v: f64 = raw.parse().map_err(|_| {
                    Error::new(
                        ErrorKind::InvalidData,
                        format!("Invalid numeric value '{raw}' for attribute #{idx}"),
                    )
                })?;
                AttributeValue::Numeric(v)
            }
            AttributeDomain::Nominal(_) => {
                let key = strip_surrounding_quotes(raw);
                if !attr.accepts_nominal(key) {
                    return Err(Error::new(
                        ErrorKind::InvalidData,
                        format!("Nominal value '{key}' not found in domain of attribute #{idx}"),
                    ));
                }
                AttributeValue::Nominal(key.to_string())
            }
        };

        if idx == header.class_index() {
            label = Some(value);
        } else {
            attributes.insert(attr.name.clone(), value);
        }
    }

    let label = label.ok_or_else(|| Error::new(ErrorKind::InvalidData, "Missing class value"))?;
    Instance::new(attributes, label, weight)
        .map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::{BufReader, ErrorKind, Write};
    use tempfile::NamedTempFile;

    fn hdr(attrs: Vec<HeaderAttribute>, class_index: usize) -> InstanceHeader {
        InstanceHeader::new("r".into(), attrs, class_index)
    }

    fn weather() -> InstanceHeader {
        hdr(
            vec![
                HeaderAttribute::nominal("outlook", vec!["sunny".into(), "rainy".into()]),
                HeaderAttribute::numeric("temperature"),
                HeaderAttribute::nominal("play", vec!["yes".into(), "no".into()]),
            ],
            2,
        )
    }

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().expect("tempfile");
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn parse_attribute_line_missing_type_after_name() {
        let err = parse_attribute_line("@attribute outlook").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_attribute_line_name_without_closing_quote() {
        let err = parse_attribute_line("@attribute 'bad {x, y}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_attribute_line_quoted_name() {
        let attr = parse_attribute_line("@attribute 'wind speed' real").unwrap();
        assert_eq!(attr, HeaderAttribute::numeric("wind speed"));
    }

    #[test]
    fn parse_attribute_line_empty_nominal_domain() {
        let err = parse_attribute_line("@attribute a {   }").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_attribute_line_trailing_comma_nominal_domain() {
        let attr = parse_attribute_line("@attribute a {x, }").unwrap();
        assert_eq!(attr, HeaderAttribute::nominal("a", vec!["x".into()]));
    }

    #[test]
    fn parse_attribute_line_unsupported_type_string() {
        let err = parse_attribute_line("@attribute note string").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_instance_splits_label_from_attributes() {
        let instance = parse_instance(&weather(), "sunny,85,no").unwrap();
        assert_eq!(instance.label(), &AttributeValue::from("no"));
        assert_eq!(instance.attribute("outlook"), Some(&"sunny".into()));
        assert_eq!(instance.attribute("temperature"), Some(&85.0.into()));
        assert!(instance.attribute("play").is_none());
        assert_eq!(instance.weight(), 1.0);
    }

    #[test]
    fn parse_instance_missing_values_are_absent() {
        let instance = parse_instance(&weather(), "?,?,yes").unwrap();
        assert!(instance.attributes().is_empty());
    }

    #[test]
    fn parse_instance_reads_trailing_weight() {
        let instance = parse_instance(&weather(), "rainy,60,yes, {2.5}").unwrap();
        assert_eq!(instance.weight(), 2.5);
        for bad in ["rainy,60,yes,2.5", "rainy,60,yes,{-1}", "rainy,60,yes,{w}"] {
            let err = parse_instance(&weather(), bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidData);
        }
    }

    #[test]
    fn parse_instance_rejects_bad_rows() {
        for bad in ["sunny,85", "sunny,hot,yes", "cloudy,85,yes", "sunny,85,?"] {
            let err = parse_instance(&weather(), bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidData, "{bad}");
        }
    }

    #[test]
    fn parse_header_unexpected_eof_before_data() {
        let tf = write_temp("@relation r\n@attribute a numeric\n");
        let mut br = BufReader::new(File::open(tf.path()).unwrap());
        let err = parse_header(&mut br, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn parse_header_unsupported_header_directive() {
        let tf = write_temp("@relation r\n@foo bar\n@data\n1\n");
        let mut br = BufReader::new(File::open(tf.path()).unwrap());
        let err = parse_header(&mut br, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_header_defaults_class_to_last_attribute() {
        let tf = write_temp("@attribute a numeric\n@attribute b {x, y}\n@data\n1,x\n");
        let mut br = BufReader::new(File::open(tf.path()).unwrap());
        let (h, _pos) = parse_header(&mut br, None).unwrap();
        assert_eq!(h.relation_name(), "unnamed_relation");
        assert_eq!(h.class_index(), 1);
        assert_eq!(h.number_of_classes(), 2);
    }

    #[test]
    fn parse_header_rejects_out_of_range_class_index() {
        let tf = write_temp("@relation r\n@attribute a numeric\n@data\n1\n");
        let mut br = BufReader::new(File::open(tf.path()).unwrap());
        let err = parse_header(&mut br, Some(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
