// src/common/db_utils.rs

/// A constraint the database refused a write on.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique(String),
    ForeignKey(String),
}

/// Looks inside a sqlx error for a unique or foreign key violation and reports
/// which constraint fired. Anything else returns `None`.
pub(crate) fn constraint_violation(err: &sqlx::Error) -> Option<Violation> {
    let db_err = err.as_database_error()?;
    let constraint = db_err.constraint().unwrap_or_default().to_string();

    if db_err.is_unique_violation() {
        return Some(Violation::Unique(constraint));
    }
    if db_err.is_foreign_key_violation() {
        return Some(Violation::ForeignKey(constraint));
    }
    None
}

/// Wraps a user supplied term for a case-insensitive substring match.
pub(crate) fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_violations() {
        assert_eq!(constraint_violation(&sqlx::Error::RowNotFound), None);
        assert_eq!(constraint_violation(&sqlx::Error::PoolTimedOut), None);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("bolt"), "%bolt%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
