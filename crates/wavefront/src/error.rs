use std::{io, num};

use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, ObjError>;

#[derive(Error, Debug)]
pub enum ObjError {
    #[error("Failed to read line {line_number}")]
    Io {
        line_number: usize,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ObjParseError),
}

impl ObjError {
    /// The parse error, if the source could be read but its content is invalid
    pub fn as_parse_error(&self) -> Option<&ObjParseError> {
        match self {
            ObjError::Parse(err) => Some(err),
            ObjError::Io { .. } => None,
        }
    }
}

/// A line of the source which is not valid OBJ.
#[derive(Error, Debug)]
#[error("Failed to parse line {line_number}: `{line}`")]
pub struct ObjParseError {
    /// 1-based
    pub line_number: usize,
    /// the raw line, as read from the source
    pub line: String,
    #[source]
    pub kind: ParseErrorKind,
}

#[derive(Error, Debug)]
pub enum ParseErrorKind {
    #[error("Failed parsing floating point value.")]
    ParseFloat(#[source] num::ParseFloatError),
    #[error("Floating point value out of range: {0}")]
    FloatOutOfRange(String),
    #[error("Failed parsing integer value.")]
    ParseInt(#[source] num::ParseIntError),
    #[error("Invalid number of arguments for `{statement}`: expected at least {expected}, found {found}.")]
    ArgumentCount {
        statement: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Failed to parse vertex indices. Invalid number of indices: {0}.")]
    VertexIndexCount(usize),
    #[error("Missing material name.")]
    MissingMaterialName,
    #[error("Vertex index {index} is out of range for {count} elements.")]
    IndexOutOfRange { index: i32, count: usize },
    #[error("Face mixes vertices with and without {0}.")]
    MixedAttributes(&'static str),
}
