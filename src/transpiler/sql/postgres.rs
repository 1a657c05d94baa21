use crate::transpiler::traits::{escape_identifier, quote_identifier, SqlGenerator};

#[derive(Debug, Default)]
pub struct PostgresGenerator {
    quote_all: bool,
}

impl PostgresGenerator {
    pub fn new(quote_all: bool) -> Self {
        Self { quote_all }
    }
}

impl SqlGenerator for PostgresGenerator {
    fn quote_identifier(&self, name: &str) -> String {
        if self.quote_all {
            quote_identifier(name)
        } else {
            escape_identifier(name)
        }
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }
}
