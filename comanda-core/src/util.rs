use crate::{Error, Result};

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Whether `name` can be written into SQL text without quoting.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn check_identifier(name: &str) -> Result<&str> {
    if is_identifier(name) {
        Ok(name)
    } else {
        Err(Error::msg(format!(
            "`{}` is not a valid identifier, expected letters, digits and underscores",
            name
        )))
    }
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            &$query[..::std::cmp::min($query.len(), 497)].trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

/// Sends the value through the channel and logs in case of error.
#[macro_export]
macro_rules! send_value {
    ($tx:expr, $value:expr) => {{
        if let Err(e) = $tx.send($value) {
            log::debug!("{:#}", e);
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_identifier("store_id"));
        assert!(is_identifier("createdAt"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("name; DROP TABLE orders"));
        assert!(!is_identifier("\"quoted\""));
        assert!(check_identifier("orders").is_ok());
        assert!(check_identifier("or ders").is_err());
    }

    #[test]
    fn separated() {
        let mut out = String::from("(");
        separated_by(&mut out, ["a", "b", "c"], |out, v| out.push_str(v), ", ");
        out.push(')');
        assert_eq!(out, "(a, b, c)");
    }
}
