//! # sports_bindings
//!
//! A tutorial Python extension module showing how to pass dynamic host values
//! across the native boundary with PyO3: dicts, lists, tuples, arbitrary
//! objects accessed by attribute name, and 2-D NumPy arrays handed back over
//! an independently owned buffer with a release callback.
//!
//! ## Surface
//!
//! - `SportsPlayer(name, sportsType, age)` with `addPlayers(dict)` and
//!   `getPlayersList()` over a process-wide registry
//! - `multipleArgsFunction(array2d, obj, tuple)` returning
//!   `(array copy, vegetable or None, player name)`
//! - Exception types `InvalidInputError`, `TypeMismatchError`,
//!   `IndexOutOfRangeError`
//!
//! ## Example
//!
//! ```python
//! from sports_bindings import SportsPlayer, multipleArgsFunction
//! import numpy as np
//!
//! players = SportsPlayer("", "", 0)
//! players.addPlayers({"player name": "R Jadeja",
//!                     "sports type": "Cricket",
//!                     "player age": 33})
//! print(players.getPlayersList())
//!
//! arr, veg, name = multipleArgsFunction(
//!     np.arange(20).reshape(4, 5),
//!     players,
//!     ("Lettuce", "Apple", 55.8),
//! )
//! ```
//!
//! ## Architecture
//!
//! Marshaling rules are host-agnostic ([`bindings::protocol`]); the PyO3 rim
//! ([`bindings::python`]) only implements the three adapter traits over
//! concrete Python values and registers the module. State lives in
//! [`registry`], errors in [`error`].

use pyo3::prelude::*;

/// Language binding layer: marshaling protocol plus the Python adapter
pub mod bindings;
/// Error taxonomy and Python exception types
pub mod error;
/// Process-wide player registry
pub mod registry;

pub use bindings::python::{multiple_args_function, SportsPlayer};
pub use error::{BindingError, IndexOutOfRangeError, InvalidInputError, TypeMismatchError};
pub use registry::{PlayerRecord, PlayerRegistry};

/// Module entry point invoked by the Python interpreter on import.
#[pymodule]
fn sports_bindings(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<SportsPlayer>()?;
    m.add_function(wrap_pyfunction!(multiple_args_function, m)?)?;
    m.add(
        "InvalidInputError",
        m.py().get_type_bound::<InvalidInputError>(),
    )?;
    m.add(
        "TypeMismatchError",
        m.py().get_type_bound::<TypeMismatchError>(),
    )?;
    m.add(
        "IndexOutOfRangeError",
        m.py().get_type_bound::<IndexOutOfRangeError>(),
    )?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
