//! Python binding adapter using PyO3.
//!
//! Implements the protocol adapters over concrete Python values (`dict`,
//! arbitrary objects, `tuple`) and exposes the tutorial surface: the
//! `SportsPlayer` class and `multipleArgsFunction`. The NumPy hand-back at
//! the bottom shows the ownership-transfer pattern: a native buffer wrapped
//! in a capsule whose destructor is the sole deallocation point, run by the
//! Python runtime when the last array reference dies.

use numpy::ndarray::ArrayView2;
use numpy::{AllowTypeChange, PyArray2, PyArrayLike2};
use pyo3::prelude::*;
use pyo3::types::{PyCapsule, PyDict, PyList, PyTuple};
use std::ffi::c_void;

use super::protocol::{
    self, AttributeAdapter, MapAdapter, OwnedMatrix, SequenceAdapter, KEY_PLAYER_AGE,
    KEY_PLAYER_NAME, KEY_SPORTS_TYPE,
};
use crate::error::BindingError;
use crate::registry::{PlayerRecord, PLAYERS};

/// [`MapAdapter`] over a Python `dict`
pub struct PyMapAdapter<'a, 'py>(pub &'a Bound<'py, PyDict>);

impl<'py> PyMapAdapter<'_, 'py> {
    fn item(&self, key: &str) -> Result<Bound<'py, PyAny>, BindingError> {
        self.0
            .get_item(key)
            .ok()
            .flatten()
            .ok_or_else(|| BindingError::MissingKey(key.to_string()))
    }
}

impl MapAdapter for PyMapAdapter<'_, '_> {
    fn contains(&self, key: &str) -> bool {
        self.0.contains(key).unwrap_or(false)
    }

    fn text(&self, key: &str) -> Result<String, BindingError> {
        self.item(key)?
            .extract()
            .map_err(|_| BindingError::TypeMismatch {
                field: key.to_string(),
                expected: "text",
            })
    }

    fn integer(&self, key: &str) -> Result<i32, BindingError> {
        self.item(key)?
            .extract()
            .map_err(|_| BindingError::TypeMismatch {
                field: key.to_string(),
                expected: "integer",
            })
    }
}

/// [`AttributeAdapter`] over any Python object. Pure duck typing: the lookup
/// is `getattr`, so any object shape carrying the right names works.
pub struct PyAttributeAdapter<'a, 'py>(pub &'a Bound<'py, PyAny>);

impl<'py> PyAttributeAdapter<'_, 'py> {
    fn attr(&self, name: &str) -> Result<Bound<'py, PyAny>, BindingError> {
        self.0
            .getattr(name)
            .map_err(|_| BindingError::MissingAttribute(name.to_string()))
    }
}

impl AttributeAdapter for PyAttributeAdapter<'_, '_> {
    fn text(&self, name: &str) -> Result<String, BindingError> {
        self.attr(name)?
            .extract()
            .map_err(|_| BindingError::TypeMismatch {
                field: name.to_string(),
                expected: "text",
            })
    }

    fn integer(&self, name: &str) -> Result<i32, BindingError> {
        self.attr(name)?
            .extract()
            .map_err(|_| BindingError::TypeMismatch {
                field: name.to_string(),
                expected: "integer",
            })
    }
}

/// [`SequenceAdapter`] over a Python `tuple`
pub struct PyTupleAdapter<'a, 'py>(pub &'a Bound<'py, PyTuple>);

impl<'py> PyTupleAdapter<'_, 'py> {
    fn item(&self, index: usize) -> Result<Bound<'py, PyAny>, BindingError> {
        self.0
            .get_item(index)
            .map_err(|_| BindingError::IndexOutOfRange {
                index,
                len: self.0.len(),
            })
    }
}

impl SequenceAdapter for PyTupleAdapter<'_, '_> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn text(&self, index: usize) -> Result<String, BindingError> {
        self.item(index)?
            .extract()
            .map_err(|_| BindingError::TypeMismatch {
                field: format!("tuple[{index}]"),
                expected: "text",
            })
    }

    fn float(&self, index: usize) -> Result<f32, BindingError> {
        self.item(index)?
            .extract()
            .map_err(|_| BindingError::TypeMismatch {
                field: format!("tuple[{index}]"),
                expected: "float",
            })
    }
}

/// Player record exposed to Python.
///
/// The attribute names match the ones `multipleArgsFunction` looks up, so an
/// instance of this class itself satisfies the object-argument contract.
#[pyclass]
pub struct SportsPlayer {
    #[pyo3(get, set, name = "playerName")]
    pub name: String,
    #[pyo3(get, set, name = "sportsType")]
    pub sports_type: String,
    #[pyo3(get, set, name = "playerAge")]
    pub age: i32,
}

#[pymethods]
impl SportsPlayer {
    #[new]
    fn new(name: String, sports_type: String, age: i32) -> Self {
        Self {
            name,
            sports_type,
            age,
        }
    }

    /// Validates one player dict and appends it to the process registry.
    ///
    /// Expected shape, exact keys:
    /// `{"player name": str, "sports type": str, "player age": int}`.
    /// A missing key raises `InvalidInputError` and nothing is stored;
    /// a wrong value type raises `TypeMismatchError`.
    #[pyo3(name = "addPlayers")]
    fn add_players(&self, profile: &Bound<'_, PyDict>) -> PyResult<()> {
        let record = protocol::player_from_map(&PyMapAdapter(profile))?;
        PLAYERS.insert(record);
        Ok(())
    }

    /// Returns every stored player as a fresh list of fresh dicts, in
    /// insertion order. The result never aliases registry storage.
    #[pyo3(name = "getPlayersList")]
    fn get_players_list<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyList>> {
        let list = PyList::empty_bound(py);
        for record in PLAYERS.snapshot() {
            log::info!("fetching {} details", record.name);
            let details = PyDict::new_bound(py);
            details.set_item(KEY_PLAYER_NAME, &record.name)?;
            details.set_item(KEY_SPORTS_TYPE, &record.sports_type)?;
            details.set_item(KEY_PLAYER_AGE, record.age)?;
            list.append(details)?;
        }
        log::info!("players list size: {}", list.len());
        Ok(list)
    }
}

/// Demonstrates marshaling three heterogeneous arguments in one call.
///
/// * `matrix` — any 2-D array coercible to C-order `u8` (the `AllowTypeChange`
///   extractor mirrors NumPy forcecast).
/// * `player_obj` — any object with `playerName`/`sportsType`/`playerAge`
///   attributes.
/// * `produce` — `(vegetable: str, fruit: str, price: float)`; an empty tuple
///   is allowed and skipped, a 1- or 2-tuple raises `IndexOutOfRangeError`.
///
/// Returns `(matrix copy, vegetable name or None, player name)`. The returned
/// array owns an independent native buffer, so mutating either array after
/// the call never affects the other.
#[pyfunction]
#[pyo3(name = "multipleArgsFunction")]
pub fn multiple_args_function<'py>(
    py: Python<'py>,
    matrix: PyArrayLike2<'py, u8, AllowTypeChange>,
    player_obj: &Bound<'py, PyAny>,
    produce: &Bound<'py, PyTuple>,
) -> PyResult<(Bound<'py, PyArray2<u8>>, Option<String>, String)> {
    let view = matrix.as_array();
    protocol::log_matrix(view);

    let player: PlayerRecord = protocol::player_from_attributes(&PyAttributeAdapter(player_obj))?;
    let entry = protocol::produce_from_tuple(&PyTupleAdapter(produce))?;

    let output = hand_back_matrix(py, OwnedMatrix::copy_from(view))?;
    Ok((output, entry.map(|e| e.vegetable), player.name))
}

/// Release-callback runs, observable by tests pinning the exactly-once
/// contract.
#[cfg(test)]
static RELEASED_BUFFERS: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

/// Transfers ownership of a native buffer to the Python runtime.
///
/// The buffer rides inside a capsule installed as the array's base object.
/// Python's reference counting drops the capsule exactly once, when the last
/// reference to the array goes away, and the capsule destructor is the sole
/// place the buffer is freed. If the host never releases the array the buffer
/// lives forever; that is the contract, not a leak.
pub fn hand_back_matrix(py: Python<'_>, matrix: OwnedMatrix) -> PyResult<Bound<'_, PyArray2<u8>>> {
    let (data, rows, cols) = matrix.into_parts();
    // The heap allocation does not move when the Vec moves into the capsule.
    let ptr = data.as_ptr();

    let release = PyCapsule::new_bound_with_destructor(
        py,
        data,
        None,
        |data: Vec<u8>, _ctx: *mut c_void| {
            // Last-look diagnostic; the read is only sound because nothing
            // else touches the buffer between here and the drop below.
            if let Some(probe) = data.get(1) {
                log::debug!("element [1] = {probe}");
            }
            log::debug!("freeing buffer @ {:p}", data.as_ptr());
            #[cfg(test)]
            RELEASED_BUFFERS.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        },
    )?;

    let view = unsafe { ArrayView2::from_shape_ptr((rows, cols), ptr) };
    let array = unsafe { PyArray2::borrow_from_array_bound(&view, release.into_any()) };
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::protocol::{player_from_attributes, player_from_map, produce_from_tuple};

    fn player_dict<'py>(py: Python<'py>) -> Bound<'py, PyDict> {
        let dict = PyDict::new_bound(py);
        dict.set_item("player name", "R Jadeja").unwrap();
        dict.set_item("sports type", "Cricket").unwrap();
        dict.set_item("player age", 33).unwrap();
        dict
    }

    #[test]
    fn test_map_adapter_decodes_dict() {
        Python::with_gil(|py| {
            let dict = player_dict(py);
            let record = player_from_map(&PyMapAdapter(&dict)).unwrap();
            assert_eq!(record, PlayerRecord::new("R Jadeja", "Cricket", 33));
        });
    }

    #[test]
    fn test_map_adapter_missing_key() {
        Python::with_gil(|py| {
            let dict = player_dict(py);
            dict.del_item("player age").unwrap();
            assert_eq!(
                player_from_map(&PyMapAdapter(&dict)),
                Err(BindingError::MissingKey("player age".to_string()))
            );
        });
    }

    #[test]
    fn test_map_adapter_age_not_an_integer() {
        Python::with_gil(|py| {
            let dict = player_dict(py);
            dict.set_item("player age", "thirty three").unwrap();
            assert!(matches!(
                player_from_map(&PyMapAdapter(&dict)),
                Err(BindingError::TypeMismatch { .. })
            ));
        });
    }

    #[test]
    fn test_attribute_adapter_duck_types() {
        Python::with_gil(|py| {
            // A plain SimpleNamespace, nothing this crate defines
            let types = py.import_bound("types").unwrap();
            let kwargs = PyDict::new_bound(py);
            kwargs.set_item("playerName", "R Ashwin").unwrap();
            kwargs.set_item("sportsType", "Cricket").unwrap();
            kwargs.set_item("playerAge", 34).unwrap();
            let obj = types
                .getattr("SimpleNamespace")
                .unwrap()
                .call((), Some(&kwargs))
                .unwrap();

            let record = player_from_attributes(&PyAttributeAdapter(&obj)).unwrap();
            assert_eq!(record, PlayerRecord::new("R Ashwin", "Cricket", 34));
        });
    }

    #[test]
    fn test_attribute_adapter_missing_attribute() {
        Python::with_gil(|py| {
            let obj = py.eval_bound("object()", None, None).unwrap();
            assert_eq!(
                player_from_attributes(&PyAttributeAdapter(&obj)),
                Err(BindingError::MissingAttribute("playerName".to_string()))
            );
        });
    }

    #[test]
    fn test_sports_player_satisfies_attribute_contract() {
        Python::with_gil(|py| {
            let player = Bound::new(py, SportsPlayer::new("R Jadeja".into(), "Cricket".into(), 33))
                .unwrap()
                .into_any();
            let record = player_from_attributes(&PyAttributeAdapter(&player)).unwrap();
            assert_eq!(record, PlayerRecord::new("R Jadeja", "Cricket", 33));
        });
    }

    #[test]
    fn test_tuple_adapter_decodes_produce() {
        Python::with_gil(|py| {
            let tuple = PyTuple::new_bound(
                py,
                ["Carrot".into_py(py), "Apple".into_py(py), 1.5f32.into_py(py)],
            );
            let entry = produce_from_tuple(&PyTupleAdapter(&tuple)).unwrap().unwrap();
            assert_eq!(entry.vegetable, "Carrot");
            assert_eq!(entry.fruit, "Apple");
            assert_eq!(entry.price, 1.5);
        });
    }

    #[test]
    fn test_tuple_adapter_empty_tuple() {
        Python::with_gil(|py| {
            let tuple = PyTuple::empty_bound(py);
            assert_eq!(produce_from_tuple(&PyTupleAdapter(&tuple)), Ok(None));
        });
    }

    #[test]
    fn test_hand_back_matrix_owns_and_releases_exactly_once() {
        use numpy::ndarray::array;
        use numpy::PyArrayMethods;
        use std::sync::atomic::Ordering;

        Python::with_gil(|py| {
            // The NumPy C API is only reachable when the interpreter can
            // import the numpy package.
            if py.import_bound("numpy").is_err() {
                return;
            }

            let matrix = OwnedMatrix::copy_from(array![[1u8, 2], [3, 4]].view());
            let before = RELEASED_BUFFERS.load(Ordering::SeqCst);

            let first = hand_back_matrix(py, matrix).unwrap();
            assert_eq!(first.readonly().as_array(), array![[1u8, 2], [3, 4]]);

            // The buffer stays alive while any reference remains and is
            // released exactly once when the last one goes away.
            let second = first.clone();
            drop(first);
            assert_eq!(RELEASED_BUFFERS.load(Ordering::SeqCst), before);
            drop(second);
            assert_eq!(RELEASED_BUFFERS.load(Ordering::SeqCst), before + 1);
        });
    }

    #[test]
    fn test_tuple_adapter_short_tuple_is_out_of_range() {
        Python::with_gil(|py| {
            let items: [PyObject; 1] = ["Carrot".into_py(py)];
            let tuple = PyTuple::new_bound(py, items);
            assert_eq!(
                produce_from_tuple(&PyTupleAdapter(&tuple)),
                Err(BindingError::IndexOutOfRange { index: 1, len: 1 })
            );
        });
    }
}
