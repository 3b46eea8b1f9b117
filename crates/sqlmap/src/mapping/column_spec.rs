use crate::{Error, Result};

/// How a nested select builds its parameter from the current row.
///
/// A specifier is either a single column name, or a composite list of
/// `property=column` pairs such as `{id=ORDER_ID, code=CODE}`. Braces,
/// `=`, `,` and whitespace all delimit tokens; a specifier containing `=` or
/// `,` is composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    Single(String),
    Composite(Vec<(String, String)>),
}

impl ColumnSpec {
    pub fn parse(spec: &str) -> Result<ColumnSpec> {
        if !Self::is_composite(spec) {
            return Ok(ColumnSpec::Single(spec.trim().to_string()));
        }

        let tokens: Vec<&str> = spec
            .split(|c: char| matches!(c, '{' | '}' | '=' | ',') || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .collect();

        if tokens.len() % 2 != 0 {
            return Err(Error::configuration(format!(
                "the composite column specifier `{spec}` has an odd number of tokens; \
                 expected property=column pairs"
            )));
        }

        let pairs = tokens
            .chunks_exact(2)
            .map(|pair| (pair[0].to_string(), pair[1].to_string()))
            .collect();

        Ok(ColumnSpec::Composite(pairs))
    }

    pub fn is_composite(spec: &str) -> bool {
        spec.contains('=') || spec.contains(',')
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            ColumnSpec::Single(column) => Some(column),
            ColumnSpec::Composite(_) => None,
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        match self {
            ColumnSpec::Single(_) => &[],
            ColumnSpec::Composite(pairs) => pairs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_column() {
        assert_eq!(
            ColumnSpec::parse("CAT_ID").unwrap(),
            ColumnSpec::Single("CAT_ID".into())
        );
    }

    #[test]
    fn composite_with_braces_and_spaces() {
        let spec = ColumnSpec::parse("{ id = ORDER_ID, code=CODE }").unwrap();
        assert_eq!(
            spec.pairs(),
            [
                ("id".to_string(), "ORDER_ID".to_string()),
                ("code".to_string(), "CODE".to_string()),
            ]
        );
    }

    #[test]
    fn comma_alone_makes_it_composite() {
        let spec = ColumnSpec::parse("id,ORDER_ID").unwrap();
        assert_eq!(spec.pairs().len(), 1);
    }

    #[test]
    fn odd_token_count_is_rejected() {
        for spec in ["{id=ORDER_ID, code}", "a,b,c", "{x=}"] {
            let err = ColumnSpec::parse(spec).unwrap_err();
            assert!(err.is_configuration(), "{spec}");
        }
    }
}
