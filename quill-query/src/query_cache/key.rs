//! Query fingerprints.

use std::fmt;

use crate::normalize::{PageWindow, graceful_sql, strip_pagination};
use crate::value::Value;

/// A normalized identity for a query and its parameters.
///
/// Text is folded with [`graceful_sql`], so keyword case and whitespace width
/// do not matter. Parameters compare by [`Value`] equality, which treats
/// numbers by mathematical value. A query without parameters and one with an
/// empty parameter list are the same fingerprint.
///
/// ```rust
/// use quill_query::QueryFingerprint;
///
/// let a = QueryFingerprint::new("select * from members where id = ?", [1]);
/// let b = QueryFingerprint::new("SELECT *   from    members where id=?", [1.0]);
/// assert_eq!(a, b);
///
/// let c = QueryFingerprint::new("select * from members where id = ? order by name", [1]);
/// assert_ne!(a, c);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryFingerprint {
    text: String,
    params: Vec<Value>,
}

impl QueryFingerprint {
    /// Fingerprint a query with parameters.
    pub fn new<I, V>(query: &str, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            text: graceful_sql(query),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Fingerprint a query without parameters.
    pub fn without_params(query: &str) -> Self {
        Self {
            text: graceful_sql(query),
            params: Vec::new(),
        }
    }

    /// Fingerprint from an optional parameter list; `None` means no parameters.
    pub fn from_optional(query: &str, params: Option<Vec<Value>>) -> Self {
        Self {
            text: graceful_sql(query),
            params: params.unwrap_or_default(),
        }
    }

    /// Normalized query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bound parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// The fingerprint of the unpaginated query plus the stripped window.
    pub fn split_window(&self) -> (BaseFingerprint, PageWindow) {
        let (base, window) = strip_pagination(&self.text);
        let base = BaseFingerprint(Self {
            text: base.to_string(),
            params: self.params.clone(),
        });
        (base, window)
    }

    /// The fingerprint with any trailing `limit`/`offset` removed.
    pub fn base(&self) -> BaseFingerprint {
        self.split_window().0
    }
}

impl fmt::Display for QueryFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)?;
        if !self.params.is_empty() {
            f.write_str(" params: [")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", param)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// A fingerprint whose text carries no trailing pagination clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseFingerprint(QueryFingerprint);

impl BaseFingerprint {
    /// The underlying fingerprint.
    pub fn fingerprint(&self) -> &QueryFingerprint {
        &self.0
    }
}

impl fmt::Display for BaseFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(fp: &QueryFingerprint) -> u64 {
        let mut hasher = DefaultHasher::new();
        fp.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_numeric_params_are_equal() {
        let base = QueryFingerprint::new("select", [1i32]);
        let others = [
            QueryFingerprint::new("select", [1i64]),
            QueryFingerprint::new("select", [1.0f64]),
            QueryFingerprint::new("select", [1.0f32]),
        ];
        for other in &others {
            assert_eq!(&base, other);
            assert_eq!(hash_of(&base), hash_of(other));
        }
    }

    #[test]
    fn test_params_distinguish() {
        let one = QueryFingerprint::new("select", [1]);
        assert_ne!(one, QueryFingerprint::new("select", ["1"]));
        assert_ne!(one, QueryFingerprint::new("select", [1.2]));
        assert_ne!(one, QueryFingerprint::new("select", [1, 2]));
    }

    #[test]
    fn test_text_case() {
        assert_eq!(
            QueryFingerprint::new("select", ["1"]),
            QueryFingerprint::new("SELECT", ["1"])
        );
        assert_ne!(
            QueryFingerprint::new("select", ["1"]),
            QueryFingerprint::new("select1", ["1"])
        );
    }

    #[test]
    fn test_missing_params_equal_empty() {
        let none = QueryFingerprint::from_optional("select", None);
        let empty = QueryFingerprint::new("select", Vec::<Value>::new());
        assert_eq!(none, empty);
        assert_eq!(hash_of(&none), hash_of(&empty));
        assert_eq!(none, QueryFingerprint::without_params("select"));
    }

    #[test]
    fn test_base_strips_window() {
        let paged = QueryFingerprint::new("select * from MEMbers  where   id= ? limit  2 offset  2", [1]);
        let (base, window) = paged.split_window();
        assert_eq!(base.fingerprint().text(), "select * from members where id = ?");
        assert_eq!(window.limit, Some(2));
        assert_eq!(window.offset, Some(2));
        assert_eq!(base, QueryFingerprint::new("select * from members where id = ?", [1]).base());
    }

    #[test]
    fn test_display() {
        let fp = QueryFingerprint::new("SELECT * FROM t WHERE a = ?", ["x"]);
        assert_eq!(fp.to_string(), "select * from t where a = ? params: [x]");
    }
}
