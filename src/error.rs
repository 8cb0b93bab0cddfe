//! Error taxonomy for the binding layer.
//!
//! Every marshaling failure is a [`BindingError`] on the Rust side and maps to
//! one of three exception types on the Python side, so hosts can catch them by
//! name instead of matching on `RuntimeError` messages.

use pyo3::exceptions::{PyException, PyIndexError, PyTypeError};
use pyo3::PyErr;
use thiserror::Error;

pyo3::create_exception!(
    sports_bindings,
    InvalidInputError,
    PyException,
    "A host mapping or object is missing a required key or attribute."
);

pyo3::create_exception!(
    sports_bindings,
    TypeMismatchError,
    PyTypeError,
    "A host value could not be converted to the expected native type."
);

pyo3::create_exception!(
    sports_bindings,
    IndexOutOfRangeError,
    PyIndexError,
    "A positional read went past the end of the host tuple."
);

/// Marshaling errors crossing the native/host boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("missing required key: {0:?}")]
    MissingKey(String),
    #[error("missing required attribute: {0:?}")]
    MissingAttribute(String),
    #[error("field {field:?} is not convertible to {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
    #[error("tuple index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl From<BindingError> for PyErr {
    fn from(err: BindingError) -> PyErr {
        match err {
            BindingError::MissingKey(_) | BindingError::MissingAttribute(_) => {
                InvalidInputError::new_err(err.to_string())
            }
            BindingError::TypeMismatch { .. } => TypeMismatchError::new_err(err.to_string()),
            BindingError::IndexOutOfRange { .. } => {
                IndexOutOfRangeError::new_err(err.to_string())
            }
        }
    }
}
