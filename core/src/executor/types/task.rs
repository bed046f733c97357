/// One statement to execute, read from one source file.
///
/// Fields are private so a task cannot change once the scheduler owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTask {
    identifier: String,
    sequence_number: usize,
    sql_text: String,
}

impl SqlTask {
    pub fn new(
        identifier: impl Into<String>,
        sequence_number: usize,
        sql_text: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            sequence_number,
            sql_text: sql_text.into(),
        }
    }

    /// Source file name, unique within a run.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// 1-based position in enumeration order.
    pub fn sequence_number(&self) -> usize {
        self.sequence_number
    }

    pub fn sql_text(&self) -> &str {
        &self.sql_text
    }
}
