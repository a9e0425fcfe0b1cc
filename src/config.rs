use serde::Serialize;

/// How a statement sequence treats two statements with no `;` between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorPolicy {
    /// `x := 1 y := 2` is read as two statements.
    #[default]
    Optional,

    /// A statement starter in separator position is a missing `;`.
    Required,
}

/// Knobs for a single parse invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParserConfig {
    pub separators: SeparatorPolicy,
}

impl ParserConfig {
    pub fn with_separators(mut self, separators: SeparatorPolicy) -> Self {
        self.separators = separators;
        self
    }
}
