//! Parser for the OQL predicate subset the resolution layer emits.
//!
//! Exactly two query shapes are recognized:
//!
//! - `SELECT DISTINCT * FROM /C x where x.F=$1`
//! - `SELECT DISTINCT * FROM /C x where x.F IN set($1, $2, ..., $n)`
//!
//! Anything else is a query failure. The field part may be a dotted path
//! into nested records.

use std::sync::LazyLock;

use gridql_store::StoreError;
use regex::Regex;

static EQUALITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^SELECT DISTINCT \* FROM /([A-Za-z_][A-Za-z0-9_]*) x where x\.([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)=\$1$",
    )
    .expect("equality predicate regex is valid")
});

static MEMBERSHIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^SELECT DISTINCT \* FROM /([A-Za-z_][A-Za-z0-9_]*) x where x\.([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*) IN set\((\$\d+(?:, \$\d+)*)\)$",
    )
    .expect("membership predicate regex is valid")
});

/// A successfully parsed predicate query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Predicate {
    /// Target collection name.
    pub collection: String,
    /// Field path the predicate filters on.
    pub field: String,
    /// Number of `$n` parameters the query references.
    pub arity: usize,
}

/// Parses a predicate query, validating parameter numbering.
pub(crate) fn parse(oql: &str) -> Result<Predicate, StoreError> {
    if let Some(caps) = EQUALITY.captures(oql) {
        return Ok(Predicate {
            collection: caps[1].to_string(),
            field: caps[2].to_string(),
            arity: 1,
        });
    }

    if let Some(caps) = MEMBERSHIP.captures(oql) {
        let params: Vec<&str> = caps[3].split(", ").collect();
        // Parameters must be $1..$n in order
        for (i, param) in params.iter().enumerate() {
            if *param != format!("${}", i + 1) {
                return Err(StoreError::query_failed(format!(
                    "non-sequential query parameter {param} in: {oql}"
                )));
            }
        }
        return Ok(Predicate {
            collection: caps[1].to_string(),
            field: caps[2].to_string(),
            arity: params.len(),
        });
    }

    Err(StoreError::query_failed(format!(
        "unsupported query shape: {oql}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_equality() {
        let p = parse("SELECT DISTINCT * FROM /Person x where x.firstName=$1").unwrap();
        assert_eq!(p.collection, "Person");
        assert_eq!(p.field, "firstName");
        assert_eq!(p.arity, 1);
    }

    #[test]
    fn test_parse_dotted_field_path() {
        let p = parse("SELECT DISTINCT * FROM /Person x where x.address.city=$1").unwrap();
        assert_eq!(p.field, "address.city");
    }

    #[test]
    fn test_parse_membership() {
        let p = parse("SELECT DISTINCT * FROM /Person x where x.firstName IN set($1, $2, $3)")
            .unwrap();
        assert_eq!(p.collection, "Person");
        assert_eq!(p.field, "firstName");
        assert_eq!(p.arity, 3);
    }

    #[test]
    fn test_parse_membership_single_value() {
        let p = parse("SELECT DISTINCT * FROM /Person x where x.age IN set($1)").unwrap();
        assert_eq!(p.arity, 1);
    }

    #[test]
    fn test_rejects_non_sequential_parameters() {
        let err =
            parse("SELECT DISTINCT * FROM /Person x where x.firstName IN set($2, $1)").unwrap_err();
        assert!(err.is_query_failed());
    }

    #[test]
    fn test_rejects_other_shapes() {
        for oql in [
            "SELECT * FROM /Person",
            "SELECT DISTINCT * FROM /Person x where x.firstName>$1",
            "DELETE FROM /Person",
            "",
        ] {
            assert!(parse(oql).unwrap_err().is_query_failed(), "accepted: {oql}");
        }
    }
}
