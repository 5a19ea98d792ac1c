use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A recorded diagnostic: what went wrong and where.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::ExpectedPrimary { .. } => "ExpectedPrimary",
            ErrorImpl::UnrecognisedStatement { .. } => "UnrecognisedStatement",
            ErrorImpl::ExpectedIdentifier { .. } => "ExpectedIdentifier",
            ErrorImpl::ExpectedIncludePath { .. } => "ExpectedIncludePath",
            ErrorImpl::ExpectedRunKeyword { .. } => "ExpectedRunKeyword",
            ErrorImpl::InvalidElseBranch { .. } => "InvalidElseBranch",
            ErrorImpl::MissingReturnType { .. } => "MissingReturnType",
            ErrorImpl::InitialisedListEntry { .. } => "InitialisedListEntry",
            ErrorImpl::ExpectedArrayElementType { .. } => "ExpectedArrayElementType",
            ErrorImpl::ExpectedArrayLength { .. } => "ExpectedArrayLength",
            ErrorImpl::UnbalancedArrayNesting { .. } => "UnbalancedArrayNesting",
            ErrorImpl::ExpectedType { .. } => "ExpectedType",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token, expected } => {
                ErrorTip::Suggestion(format!("expected {}, found `{}`", expected, token))
            }
            ErrorImpl::ExpectedPrimary { token } => ErrorTip::Suggestion(format!(
                "`{}` cannot start an expression",
                token
            )),
            ErrorImpl::UnrecognisedStatement { token } => ErrorTip::Suggestion(format!(
                "keyword `{}` cannot start a statement",
                token
            )),
            ErrorImpl::ExpectedIdentifier { context, token } => ErrorTip::Suggestion(format!(
                "expected a name {}, found `{}`",
                context, token
            )),
            ErrorImpl::ExpectedIncludePath { token } => ErrorTip::Suggestion(format!(
                "include takes a string literal, e.g. include \"io\", found `{}`",
                token
            )),
            ErrorImpl::ExpectedRunKeyword { token } => ErrorTip::Suggestion(format!(
                "compile time blocks are written `#run {{ ... }}`, found `#{}`",
                token
            )),
            ErrorImpl::InvalidElseBranch { token } => ErrorTip::Suggestion(format!(
                "`else` must be followed by `if` or a body, found `{}`",
                token
            )),
            ErrorImpl::MissingReturnType { token } => ErrorTip::Suggestion(format!(
                "functions must name a return type after `->`, found `{}`",
                token
            )),
            ErrorImpl::InitialisedListEntry { name } => ErrorTip::Suggestion(format!(
                "remove the initial value from `{}`",
                name
            )),
            ErrorImpl::ExpectedArrayElementType { token } => ErrorTip::Suggestion(format!(
                "array types need an element type, found `{}`",
                token
            )),
            ErrorImpl::ExpectedArrayLength { token } => ErrorTip::Suggestion(format!(
                "array lengths are integer literals, found `{}`",
                token
            )),
            ErrorImpl::UnbalancedArrayNesting { .. } => {
                ErrorTip::Suggestion(String::from("ensure every '[' has a matching ']'"))
            }
            ErrorImpl::ExpectedType { token } => {
                ErrorTip::Suggestion(format!("`{}` is not a type", token))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.position.line, self.internal_error)
    }
}

impl std::error::Error for Error {}

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
pub enum ErrorImpl {
    #[error("{token}")]
    UnrecognisedToken { token: String },
    #[error("expected {expected}, found {token:?}")]
    UnexpectedToken { token: String, expected: String },
    #[error("could not find valid primary at {token:?}")]
    ExpectedPrimary { token: String },
    #[error("could not recognize statement starting with {token:?}")]
    UnrecognisedStatement { token: String },
    #[error("expected identifier {context}, found {token:?}")]
    ExpectedIdentifier { context: String, token: String },
    #[error("expected string literal in include statement, found {token:?}")]
    ExpectedIncludePath { token: String },
    #[error("expected 'run' keyword in compile time execution statement, found {token:?}")]
    ExpectedRunKeyword { token: String },
    #[error("expected body or if statement after else, found {token:?}")]
    InvalidElseBranch { token: String },
    #[error("function must have a return type, found {token:?}")]
    MissingReturnType { token: String },
    #[error("cannot initialize {name:?} in a value declaration list")]
    InitialisedListEntry { name: String },
    #[error("expected valid type identifier in array type, found {token:?}")]
    ExpectedArrayElementType { token: String },
    #[error("expected a number for the array length, found {token:?}")]
    ExpectedArrayLength { token: String },
    #[error("unbalanced array nesting, {open} '[' left open")]
    UnbalancedArrayNesting { open: i32 },
    #[error("found invalid type {token:?}")]
    ExpectedType { token: String },
}
