//! Semantic error values.
//!
//! Semantic errors never unwind. The engine builds one of these, reports it through the shared `Reporter` under its
//! catalog code, and continues with a substitute.

use thiserror::Error;
use vascal_core::DiagnosticCode;

/// A recoverable semantic error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("Multiply declared variable. Cannot have two variables with the same name in the same scope: {0}")]
    MultiplyDeclared(String),

    #[error("Reserved name cannot be redeclared: {0}")]
    ReservedName(String),

    #[error("Undeclared variable {0}")]
    UndeclaredVariable(String),

    #[error("Missing subscripts for this array declaration")]
    ArrayWithoutSubscripts,

    #[error("Simple variables cannot use subscripts: {0}")]
    VariableWithSubscripts(String),

    #[error("Variable {0} must be an integer")]
    IntegerExpected(String),

    #[error("The modulus operation requires 2 integer operands. {0} and {1} are not both integers")]
    ModError(String, String),

    #[error("Expected an arithmetic expression but received a relational expression")]
    ArithmeticExpected,

    #[error("Expected a relational expression but received an arithmetic expression")]
    RelationalExpected,

    #[error("This function is not the current function : {0}")]
    WrongFunction(String),

    #[error("This variable name is not a procedure: {0}")]
    NonProcedure(String),

    #[error("This variable name is not a function: {0}")]
    NonFunction(String),

    #[error(transparent)]
    Call(#[from] CallError),
}

impl SemanticError {
    /// Catalog code of this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            SemanticError::MultiplyDeclared(_) => DiagnosticCode::MultiplyDeclaredVariable,
            SemanticError::ReservedName(_) => DiagnosticCode::ReservedName,
            SemanticError::UndeclaredVariable(_) => DiagnosticCode::UndeclaredVariable,
            SemanticError::ArrayWithoutSubscripts => DiagnosticCode::ArrayWithoutSubscripts,
            SemanticError::VariableWithSubscripts(_) => DiagnosticCode::VariableWithSubscripts,
            SemanticError::IntegerExpected(_) => DiagnosticCode::IntegerExpected,
            SemanticError::ModError(..) => DiagnosticCode::ModError,
            SemanticError::ArithmeticExpected => DiagnosticCode::ETypeErrorA,
            SemanticError::RelationalExpected => DiagnosticCode::ETypeErrorR,
            SemanticError::WrongFunction(_) => DiagnosticCode::WrongFunction,
            SemanticError::NonProcedure(_) => DiagnosticCode::NonProcedure,
            SemanticError::NonFunction(_) => DiagnosticCode::NonFunction,
            SemanticError::Call(err) => err.code(),
        }
    }
}

/// A call that cannot be emitted. Reporting one poisons the call being collected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("Wrong number of parameters in call to {name}: expected {expected}, found {found}")]
    Miscount { name: String, expected: usize, found: usize },

    #[error("Parameter {position} of {name} has the wrong type: expected {expected}, found {found}")]
    UnmatchedTypes {
        name: String,
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Array parameter {position} of {name} does not match the declared array")]
    ArrayParameter { name: String, position: usize },
}

impl CallError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            CallError::Miscount { .. } => DiagnosticCode::ParameterMiscount,
            CallError::UnmatchedTypes { .. } => DiagnosticCode::UnmatchedParameterTypes,
            CallError::ArrayParameter { .. } => DiagnosticCode::ArrayParameterError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_codes() {
        let err = SemanticError::UndeclaredVariable("X".to_string());
        assert_eq!(err.to_string(), "Undeclared variable X");
        assert_eq!(err.code(), DiagnosticCode::UndeclaredVariable);

        let err = SemanticError::ModError("A".to_string(), "B".to_string());
        assert_eq!(
            err.to_string(),
            "The modulus operation requires 2 integer operands. A and B are not both integers"
        );
    }

    #[test]
    fn test_call_errors_keep_their_code() {
        let err: SemanticError = CallError::Miscount {
            name: "P".to_string(),
            expected: 2,
            found: 3,
        }
        .into();
        assert_eq!(err.code(), DiagnosticCode::ParameterMiscount);
        assert_eq!(err.to_string(), "Wrong number of parameters in call to P: expected 2, found 3");
    }
}
