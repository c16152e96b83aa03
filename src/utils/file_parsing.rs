/// Splits a data row on commas that are not inside single or double quotes.
/// Quotes are kept in the returned tokens.
pub fn split_csv_preserving_quotes(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in line.trim().chars() {
        match (quote, c) {
            (None, '\'' | '"') => {
                quote = Some(c);
                current.push(c);
            }
            (Some(q), _) if c == q => {
                quote = None;
                current.push(c);
            }
            (None, ',') => tokens.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    tokens.push(current);
    tokens
}

pub fn strip_surrounding_quotes(s: &str) -> &str {
    let s = s.trim();
    for q in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_inside_quotes_do_not_split() {
        let tokens = split_csv_preserving_quotes("'a, b',2,\"x,y\", {3}");
        assert_eq!(tokens, vec!["'a, b'", "2", "\"x,y\"", " {3}"]);
    }

    #[test]
    fn strips_matching_quotes_only() {
        assert_eq!(strip_surrounding_quotes("'sunny'"), "sunny");
        assert_eq!(strip_surrounding_quotes(" \"rainy\" "), "rainy");
        assert_eq!(strip_surrounding_quotes("'open"), "'open");
        assert_eq!(strip_surrounding_quotes("'"), "'");
    }
}
