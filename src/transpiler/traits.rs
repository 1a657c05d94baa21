//! Transpiler traits and utilities.

/// SQL reserved words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "order",
    "group",
    "user",
    "table",
    "select",
    "from",
    "where",
    "join",
    "left",
    "right",
    "inner",
    "outer",
    "full",
    "cross",
    "on",
    "and",
    "or",
    "not",
    "null",
    "true",
    "false",
    "limit",
    "offset",
    "as",
    "in",
    "is",
    "like",
    "between",
    "having",
    "union",
    "all",
    "distinct",
    "case",
    "when",
    "then",
    "else",
    "end",
    "exists",
    "insert",
    "update",
    "delete",
    "set",
    "index",
    "key",
    "primary",
    "foreign",
    "references",
    "default",
    "constraint",
    "check",
];

/// Quote an identifier if it's a reserved word, contains special chars, or
/// has uppercase letters (Postgres folds unquoted names to lowercase).
pub fn escape_identifier(name: &str) -> String {
    let lower = name.to_lowercase();
    let needs_escaping = RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().any(char::is_uppercase)
        || name.chars().next().map(|c| c.is_numeric()).unwrap_or(true);

    if needs_escaping {
        quote_identifier(name)
    } else {
        name.to_string()
    }
}

/// Always quote, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Trait for dialect-specific SQL generation.
pub trait SqlGenerator {
    /// Quote an identifier (table, alias or column name).
    fn quote_identifier(&self, name: &str) -> String;
    /// Generate the parameter placeholder (e.g., $1, ?) for a 1-based index.
    fn placeholder(&self, index: usize) -> String;
    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut sql = String::new();
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        if let Some(n) = offset {
            sql.push_str(&format!(" OFFSET {}", n));
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("person"), "person");
        assert_eq!(escape_identifier("order"), "\"order\"");
        assert_eq!(escape_identifier("User"), "\"User\"");
        assert_eq!(escape_identifier("MyTable"), "\"MyTable\"");
        assert_eq!(escape_identifier("my_table"), "my_table");
        assert_eq!(escape_identifier("first name"), "\"first name\"");
        assert_eq!(escape_identifier("2fa"), "\"2fa\"");
        assert_eq!(escape_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
