use std::fmt;

/// Arithmetic operator a problem was generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
}

impl Operator {
    /// All operators, in the order batch slots are distributed.
    pub const ALL: [Operator; 3] = [Operator::Add, Operator::Subtract, Operator::Multiply];

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
        }
    }

    /// Position of this operator in [`Operator::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Operator::Add => 0,
            Operator::Subtract => 1,
            Operator::Multiply => 2,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single arithmetic problem shown during a drill.
///
/// The expression text (e.g. `"3 + 4"`) is what uniqueness is checked on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Problem {
    expression: String,
    answer: i64,
    operator: Operator,
}

impl Problem {
    #[must_use]
    pub fn addition(a: i64, b: i64) -> Self {
        Self::binary(Operator::Add, a, b, a + b)
    }

    /// Builds `(result + b) - b`, so the displayed answer is always `result`.
    #[must_use]
    pub fn subtraction(result: i64, b: i64) -> Self {
        Self::binary(Operator::Subtract, result + b, b, result)
    }

    #[must_use]
    pub fn multiplication(a: i64, b: i64) -> Self {
        Self::binary(Operator::Multiply, a, b, a * b)
    }

    fn binary(operator: Operator, a: i64, b: i64, answer: i64) -> Self {
        Self {
            expression: format!("{a} {operator} {b}"),
            answer,
            operator,
        }
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    #[must_use]
    pub fn answer(&self) -> i64 {
        self.answer
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Checks raw user input against the answer.
    ///
    /// Input is trimmed and parsed as a base-10 integer; anything that does
    /// not parse counts as wrong.
    #[must_use]
    pub fn accepts(&self, input: &str) -> bool {
        input
            .trim()
            .parse::<i64>()
            .is_ok_and(|value| value == self.answer)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}
