use crate::transpiler::traits::{quote_identifier, SqlGenerator};

#[derive(Debug, Default)]
pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn quote_identifier(&self, name: &str) -> String {
        quote_identifier(name)
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
        match (limit, offset) {
            (Some(n), Some(m)) => format!(" LIMIT {} OFFSET {}", n, m),
            (Some(n), None) => format!(" LIMIT {}", n),
            (None, Some(m)) => format!(" LIMIT -1 OFFSET {}", m),
            (None, None) => String::new(),
        }
    }
}
