//! Classification of PostgreSQL driver errors.

/// Name of the unique constraint guarding `links.alias`.
pub const ALIAS_UNIQUE_CONSTRAINT: &str = "links_alias_key";

/// Returns true if `e` is a unique violation of the alias constraint.
pub fn is_unique_violation_on_alias(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(ALIAS_UNIQUE_CONSTRAINT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        assert!(!is_unique_violation_on_alias(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation_on_alias(&sqlx::Error::PoolTimedOut));
    }
}
