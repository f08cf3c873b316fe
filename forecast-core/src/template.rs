//! `$NAME` placeholder substitution.
//!
//! `$$` is a literal dollar sign, `$NAME` and `${NAME}` are replaced from the
//! substitution map. Substitution is strict: an unknown name or a stray `$`
//! is an error.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

use crate::error::{Error, Result};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        \$
        (?:
            (?P<escaped>\$)                         # $$
          | (?P<named>[_A-Za-z][_A-Za-z0-9]*)       # $NAME
          | \{ (?P<braced>[_A-Za-z][_A-Za-z0-9]*) \} # ${NAME}
          | (?P<invalid>)                           # anything else
        )
    "#,
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    pub fn substitute(&self, values: &HashMap<String, String>) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        let mut last = 0;

        for caps in PLACEHOLDER_RE.captures_iter(&self.source) {
            let whole = caps.get_match();
            out.push_str(&self.source[last..whole.start()]);

            if caps.name("escaped").is_some() {
                out.push('$');
            } else if let Some(name) = caps.name("named").or_else(|| caps.name("braced")) {
                let value = values.get(name.as_str()).ok_or_else(|| {
                    Error::Template(format!("no value for placeholder ${}", name.as_str()))
                })?;
                out.push_str(value);
            } else {
                let (line, column) = line_column(&self.source, whole.start());
                return Err(Error::Template(format!(
                    "invalid placeholder at line {line}, column {column}"
                )));
            }

            last = whole.end();
        }

        out.push_str(&self.source[last..]);
        Ok(out)
    }
}

/// 1-based line and column of byte offset `at`.
fn line_column(source: &str, at: usize) -> (usize, usize) {
    let before = &source[..at];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn named_and_braced_placeholders() {
        let t = Template::new("High $HIGH_ONE°${UNIT}, low ${LOW_ONE}$UNIT");
        let out = t
            .substitute(&values(&[("HIGH_ONE", "70"), ("LOW_ONE", "50"), ("UNIT", "F")]))
            .unwrap();
        assert_eq!(out, "High 70°F, low 50F");
    }

    #[test]
    fn double_dollar_is_literal() {
        let t = Template::new("costs $$5 on $DAY");
        assert_eq!(t.substitute(&values(&[("DAY", "Monday")])).unwrap(), "costs $5 on Monday");
    }

    #[test]
    fn name_stops_at_first_non_identifier_char() {
        let t = Template::new("<svg rotate=\"$ROTATION\">$ICON_ONE.png</svg>");
        let out = t.substitute(&values(&[("ROTATION", "180"), ("ICON_ONE", "skc")])).unwrap();
        assert_eq!(out, "<svg rotate=\"180\">skc.png</svg>");
    }

    #[test]
    fn unknown_placeholder_is_error() {
        let err = Template::new("$HIGH_FIVE").substitute(&values(&[])).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
        assert!(err.to_string().contains("$HIGH_FIVE"), "{err}");
    }

    #[test]
    fn stray_dollar_is_error_with_position() {
        let err = Template::new("line one\nprice: $5").substitute(&values(&[])).unwrap_err();
        assert!(err.to_string().contains("line 2, column 8"), "{err}");

        let err = Template::new("${UNCLOSED").substitute(&values(&[])).unwrap_err();
        assert!(err.to_string().contains("line 1, column 1"), "{err}");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let t = Template::new("plain text\n");
        assert_eq!(t.substitute(&values(&[])).unwrap(), "plain text\n");
    }
}
