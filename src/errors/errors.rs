use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::TokenKind, symbols::symbols::TypeSymbol, Position, Span};

/// A user-facing problem found while lexing, parsing or binding, tied to
/// the source span it was found at.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    span: Span,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Span) -> Self {
        Diagnostic { kind, span }
    }

    pub fn get_kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_position(&self) -> &Position {
        &self.span.start
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// True when parsing stopped because the input ended early. The REPL
    /// uses this to keep reading lines into the same submission.
    pub fn is_unexpected_end_of_file(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::UnexpectedToken {
                actual: TokenKind::EOF,
                ..
            } | DiagnosticKind::UnexpectedExpressionToken {
                actual: TokenKind::EOF
            }
        )
    }

    pub fn get_diagnostic_name(&self) -> &str {
        match &self.kind {
            DiagnosticKind::BadCharacter { .. } => "BadCharacter",
            DiagnosticKind::UnterminatedString => "UnterminatedString",
            DiagnosticKind::InvalidNumber { .. } => "InvalidNumber",
            DiagnosticKind::UnexpectedToken { .. } => "UnexpectedToken",
            DiagnosticKind::UnexpectedExpressionToken { .. } => "UnexpectedExpressionToken",
            DiagnosticKind::UndefinedVariable { .. } => "UndefinedVariable",
            DiagnosticKind::NotAVariable { .. } => "NotAVariable",
            DiagnosticKind::UndefinedFunction { .. } => "UndefinedFunction",
            DiagnosticKind::NotAFunction { .. } => "NotAFunction",
            DiagnosticKind::UndefinedType { .. } => "UndefinedType",
            DiagnosticKind::SymbolAlreadyDeclared { .. } => "SymbolAlreadyDeclared",
            DiagnosticKind::ParameterAlreadyDeclared { .. } => "ParameterAlreadyDeclared",
            DiagnosticKind::CannotAssign { .. } => "CannotAssign",
            DiagnosticKind::CannotConvert { .. } => "CannotConvert",
            DiagnosticKind::CannotConvertImplicitly { .. } => "CannotConvertImplicitly",
            DiagnosticKind::WrongArgumentCount { .. } => "WrongArgumentCount",
            DiagnosticKind::WrongArgumentType { .. } => "WrongArgumentType",
            DiagnosticKind::ExpressionMustHaveValue => "ExpressionMustHaveValue",
            DiagnosticKind::UndefinedUnaryOperator { .. } => "UndefinedUnaryOperator",
            DiagnosticKind::UndefinedBinaryOperator { .. } => "UndefinedBinaryOperator",
            DiagnosticKind::InvalidBreakOrContinue { .. } => "InvalidBreakOrContinue",
            DiagnosticKind::InvalidReturn => "InvalidReturn",
            DiagnosticKind::InvalidReturnExpression { .. } => "InvalidReturnExpression",
            DiagnosticKind::MissingReturnExpression { .. } => "MissingReturnExpression",
            DiagnosticKind::AllPathsMustReturn { .. } => "AllPathsMustReturn",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.kind {
            DiagnosticKind::UnterminatedString => {
                ErrorTip::Suggestion(String::from("close the string with a matching `\"`"))
            }
            DiagnosticKind::UnexpectedToken {
                actual: TokenKind::EOF,
                expected,
            } => ErrorTip::Suggestion(format!("the input ended before a `{}`", expected)),
            DiagnosticKind::UndefinedVariable { name } => {
                ErrorTip::Suggestion(format!("declare it first, e.g. `var {} = ...`", name))
            }
            DiagnosticKind::CannotAssign { name } => ErrorTip::Suggestion(format!(
                "declare `{}` with `var` instead of `let`",
                name
            )),
            DiagnosticKind::CannotConvertImplicitly { to, .. } => {
                ErrorTip::Suggestion(format!("wrap the value in `{}(...)`", to))
            }
            DiagnosticKind::WrongArgumentCount { expected, .. } => {
                ErrorTip::Suggestion(format!("pass exactly {} arguments", expected))
            }
            DiagnosticKind::AllPathsMustReturn { .. } => {
                ErrorTip::Suggestion(String::from("add a `return` at the end of the function"))
            }
            _ => ErrorTip::None,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    #[error("bad character input: '{character}'")]
    BadCharacter { character: char },
    #[error("unterminated string literal.")]
    UnterminatedString,
    #[error("The number {text} isn't a valid {ty}.")]
    InvalidNumber { text: String, ty: TypeSymbol },
    #[error("unexpected token <{actual}>, expected <{expected}>.")]
    UnexpectedToken { actual: TokenKind, expected: TokenKind },
    #[error("unexpected token <{actual}>.")]
    UnexpectedExpressionToken { actual: TokenKind },
    #[error("variable '{name}' doesn't exist.")]
    UndefinedVariable { name: String },
    #[error("'{name}' is not a variable.")]
    NotAVariable { name: String },
    #[error("function '{name}' doesn't exist.")]
    UndefinedFunction { name: String },
    #[error("'{name}' is not a function.")]
    NotAFunction { name: String },
    #[error("type '{name}' doesn't exist.")]
    UndefinedType { name: String },
    #[error("'{name}' is already declared.")]
    SymbolAlreadyDeclared { name: String },
    #[error("A parameter with the name '{name}' already exists.")]
    ParameterAlreadyDeclared { name: String },
    #[error("cannot assign to variable '{name}' because it is read-only.")]
    CannotAssign { name: String },
    #[error("cannot convert type <{from}> to <{to}>.")]
    CannotConvert { from: TypeSymbol, to: TypeSymbol },
    #[error("cannot implicitly convert type <{from}> to <{to}>. An explicit conversion exists. Are you missing a cast?")]
    CannotConvertImplicitly { from: TypeSymbol, to: TypeSymbol },
    #[error("function '{name}' requires {expected} arguments, but was given {actual}.")]
    WrongArgumentCount {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("parameter '{name}' requires a value of type <{expected}>, but was given a value of type <{actual}>.")]
    WrongArgumentType {
        name: String,
        expected: TypeSymbol,
        actual: TypeSymbol,
    },
    #[error("expression must have a value.")]
    ExpressionMustHaveValue,
    #[error("Unary operator '{operator}' is not defined for type <{operand}>")]
    UndefinedUnaryOperator { operator: String, operand: TypeSymbol },
    #[error("Binary operator '{operator}' is not defined for types <{left}> and <{right}>")]
    UndefinedBinaryOperator {
        operator: String,
        left: TypeSymbol,
        right: TypeSymbol,
    },
    #[error("The keyword '{keyword}' can only be used inside of loops.")]
    InvalidBreakOrContinue { keyword: String },
    #[error("The 'return' keyword can only be used inside of functions.")]
    InvalidReturn,
    #[error("The return expression is not valid for function '{name}'.")]
    InvalidReturnExpression { name: String },
    #[error("The return expression is missing for function '{name}'.")]
    MissingReturnExpression { name: String },
    #[error("Not all code paths return a value for function '{name}'.")]
    AllPathsMustReturn { name: String },
}

/// Ordered collection of diagnostics produced by one stage.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        DiagnosticBag::default()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, diagnostics: I) {
        self.diagnostics.extend(diagnostics);
    }

    fn report(&mut self, kind: DiagnosticKind, span: &Span) {
        self.diagnostics.push(Diagnostic::new(kind, span.clone()));
    }

    pub fn report_bad_character(&mut self, span: &Span, character: char) {
        self.report(DiagnosticKind::BadCharacter { character }, span);
    }

    pub fn report_unterminated_string(&mut self, span: &Span) {
        self.report(DiagnosticKind::UnterminatedString, span);
    }

    pub fn report_invalid_number(&mut self, span: &Span, text: &str, ty: TypeSymbol) {
        self.report(
            DiagnosticKind::InvalidNumber {
                text: text.to_string(),
                ty,
            },
            span,
        );
    }

    pub fn report_undefined_variable(&mut self, span: &Span, name: &str) {
        self.report(
            DiagnosticKind::UndefinedVariable {
                name: name.to_string(),
            },
            span,
        );
    }

    pub fn report_not_a_variable(&mut self, span: &Span, name: &str) {
        self.report(
            DiagnosticKind::NotAVariable {
                name: name.to_string(),
            },
            span,
        );
    }

    pub fn report_undefined_function(&mut self, span: &Span, name: &str) {
        self.report(
            DiagnosticKind::UndefinedFunction {
                name: name.to_string(),
            },
            span,
        );
    }

    pub fn report_not_a_function(&mut self, span: &Span, name: &str) {
        self.report(
            DiagnosticKind::NotAFunction {
                name: name.to_string(),
            },
            span,
        );
    }

    pub fn report_undefined_type(&mut self, span: &Span, name: &str) {
        self.report(
            DiagnosticKind::UndefinedType {
                name: name.to_string(),
            },
            span,
        );
    }

    pub fn report_symbol_already_declared(&mut self, span: &Span, name: &str) {
        self.report(
            DiagnosticKind::SymbolAlreadyDeclared {
                name: name.to_string(),
            },
            span,
        );
    }

    pub fn report_parameter_already_declared(&mut self, span: &Span, name: &str) {
        self.report(
            DiagnosticKind::ParameterAlreadyDeclared {
                name: name.to_string(),
            },
            span,
        );
    }

    pub fn report_cannot_assign(&mut self, span: &Span, name: &str) {
        self.report(
            DiagnosticKind::CannotAssign {
                name: name.to_string(),
            },
            span,
        );
    }

    pub fn report_cannot_convert(&mut self, span: &Span, from: TypeSymbol, to: TypeSymbol) {
        self.report(DiagnosticKind::CannotConvert { from, to }, span);
    }

    pub fn report_cannot_convert_implicitly(
        &mut self,
        span: &Span,
        from: TypeSymbol,
        to: TypeSymbol,
    ) {
        self.report(DiagnosticKind::CannotConvertImplicitly { from, to }, span);
    }

    pub fn report_wrong_argument_count(
        &mut self,
        span: &Span,
        name: &str,
        expected: usize,
        actual: usize,
    ) {
        self.report(
            DiagnosticKind::WrongArgumentCount {
                name: name.to_string(),
                expected,
                actual,
            },
            span,
        );
    }

    pub fn report_wrong_argument_type(
        &mut self,
        span: &Span,
        name: &str,
        expected: TypeSymbol,
        actual: TypeSymbol,
    ) {
        self.report(
            DiagnosticKind::WrongArgumentType {
                name: name.to_string(),
                expected,
                actual,
            },
            span,
        );
    }

    pub fn report_expression_must_have_value(&mut self, span: &Span) {
        self.report(DiagnosticKind::ExpressionMustHaveValue, span);
    }

    pub fn report_undefined_unary_operator(
        &mut self,
        span: &Span,
        operator: &str,
        operand: TypeSymbol,
    ) {
        self.report(
            DiagnosticKind::UndefinedUnaryOperator {
                operator: operator.to_string(),
                operand,
            },
            span,
        );
    }

    pub fn report_undefined_binary_operator(
        &mut self,
        span: &Span,
        operator: &str,
        left: TypeSymbol,
        right: TypeSymbol,
    ) {
        self.report(
            DiagnosticKind::UndefinedBinaryOperator {
                operator: operator.to_string(),
                left,
                right,
            },
            span,
        );
    }

    pub fn report_invalid_break_or_continue(&mut self, span: &Span, keyword: &str) {
        self.report(
            DiagnosticKind::InvalidBreakOrContinue {
                keyword: keyword.to_string(),
            },
            span,
        );
    }

    pub fn report_invalid_return(&mut self, span: &Span) {
        self.report(DiagnosticKind::InvalidReturn, span);
    }

    pub fn report_invalid_return_expression(&mut self, span: &Span, name: &str) {
        self.report(
            DiagnosticKind::InvalidReturnExpression {
                name: name.to_string(),
            },
            span,
        );
    }

    pub fn report_missing_return_expression(&mut self, span: &Span, name: &str) {
        self.report(
            DiagnosticKind::MissingReturnExpression {
                name: name.to_string(),
            },
            span,
        );
    }

    pub fn report_all_paths_must_return(&mut self, span: &Span, name: &str) {
        self.report(
            DiagnosticKind::AllPathsMustReturn {
                name: name.to_string(),
            },
            span,
        );
    }
}

impl IntoIterator for DiagnosticBag {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

/// Failures raised while a well-typed program runs.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("attempted to divide by zero")]
    DivideByZero,
    #[error("cannot convert '{value}' to <{ty}>")]
    InvalidConversion { value: String, ty: TypeSymbol },
    #[error("random range [{min}, {max}) is empty")]
    EmptyRandomRange { min: i32, max: i32 },
}
