//! Host-agnostic marshaling protocol.
//!
//! The host hands us three shapes of dynamic value: key-value mappings,
//! objects with named attributes, and fixed-size tuples. Each shape is
//! abstracted behind a small adapter trait (typed get plus the existence or
//! bounds check that shape supports), so the marshaling functions here never
//! touch a concrete host value type. The Python implementations live in
//! [`super::python`]; the same functions would sit unchanged behind a JS or
//! Lua adapter.

use crate::error::BindingError;
use crate::registry::PlayerRecord;
use numpy::ndarray::ArrayView2;

/// Required mapping keys for `addPlayers`. Exact match, case-sensitive.
pub const KEY_PLAYER_NAME: &str = "player name";
pub const KEY_SPORTS_TYPE: &str = "sports type";
pub const KEY_PLAYER_AGE: &str = "player age";

/// Required attribute names for `multipleArgsFunction`'s object argument.
pub const ATTR_PLAYER_NAME: &str = "playerName";
pub const ATTR_SPORTS_TYPE: &str = "sportsType";
pub const ATTR_PLAYER_AGE: &str = "playerAge";

/// Key-value mapping on the host side (a Python dict)
pub trait MapAdapter {
    fn contains(&self, key: &str) -> bool;
    fn text(&self, key: &str) -> Result<String, BindingError>;
    fn integer(&self, key: &str) -> Result<i32, BindingError>;
}

/// Object with named attributes on the host side, duck-typed: any host object
/// exposing the right attribute names works, no declared schema
pub trait AttributeAdapter {
    fn text(&self, name: &str) -> Result<String, BindingError>;
    fn integer(&self, name: &str) -> Result<i32, BindingError>;
}

/// Fixed-size ordered sequence on the host side (a Python tuple)
pub trait SequenceAdapter {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn text(&self, index: usize) -> Result<String, BindingError>;
    fn float(&self, index: usize) -> Result<f32, BindingError>;
}

/// Validates and decodes one player mapping.
///
/// All three keys must be present before any value is read; a missing key
/// rejects the whole mapping with [`BindingError::MissingKey`] and nothing is
/// extracted. Extra keys are ignored. Value conversion failures surface as
/// [`BindingError::TypeMismatch`].
pub fn player_from_map<M: MapAdapter>(map: &M) -> Result<PlayerRecord, BindingError> {
    for key in [KEY_PLAYER_NAME, KEY_SPORTS_TYPE, KEY_PLAYER_AGE] {
        if !map.contains(key) {
            return Err(BindingError::MissingKey(key.to_string()));
        }
    }
    Ok(PlayerRecord {
        name: map.text(KEY_PLAYER_NAME)?,
        sports_type: map.text(KEY_SPORTS_TYPE)?,
        age: map.integer(KEY_PLAYER_AGE)?,
    })
}

/// Decodes the three player attributes off an arbitrary host object.
pub fn player_from_attributes<A: AttributeAdapter>(obj: &A) -> Result<PlayerRecord, BindingError> {
    let record = PlayerRecord {
        name: obj.text(ATTR_PLAYER_NAME)?,
        sports_type: obj.text(ATTR_SPORTS_TYPE)?,
        age: obj.integer(ATTR_PLAYER_AGE)?,
    };
    log::info!(
        "playerName: {} sportsType: {} playerAge: {}",
        record.name,
        record.sports_type,
        record.age
    );
    Ok(record)
}

/// Vegetable/fruit/price triple decoded from the host tuple. Ephemeral; never
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ProduceEntry {
    pub vegetable: String,
    pub fruit: String,
    pub price: f32,
}

/// Decodes the produce tuple positionally.
///
/// An empty tuple is skipped entirely and yields `None`. A non-empty tuple is
/// read at positions 0, 1 and 2; tuples of length 1 or 2 therefore fail with
/// [`BindingError::IndexOutOfRange`] from the bounds-checked reads rather
/// than walking off the end.
pub fn produce_from_tuple<S: SequenceAdapter>(
    seq: &S,
) -> Result<Option<ProduceEntry>, BindingError> {
    if seq.is_empty() {
        return Ok(None);
    }
    let entry = ProduceEntry {
        vegetable: seq.text(0)?,
        fruit: seq.text(1)?,
        price: seq.float(2)?,
    };
    log::info!(
        "Vegetable name: {} Fruit name: {} Total price: {}",
        entry.vegetable,
        entry.fruit,
        entry.price
    );
    Ok(Some(entry))
}

/// Independently owned row-major 2-D byte buffer.
///
/// Built by copying a borrowed view, so the result never aliases host-visible
/// storage. The buffer is what gets handed back to the host with a release
/// callback attached (see [`super::python`]).
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedMatrix {
    data: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl OwnedMatrix {
    /// Copies `view` into a fresh row-major buffer.
    pub fn copy_from(view: ArrayView2<'_, u8>) -> Self {
        let (rows, cols) = view.dim();
        // ArrayView iteration is in logical order, which for a 2-D view is
        // row-major regardless of the source strides.
        let data: Vec<u8> = view.iter().copied().collect();
        Self { data, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the matrix, yielding the raw buffer and its shape.
    pub fn into_parts(self) -> (Vec<u8>, usize, usize) {
        (self.data, self.rows, self.cols)
    }
}

/// Logs every element of the incoming array as one flat line, in storage
/// order.
pub fn log_matrix(view: ArrayView2<'_, u8>) {
    let flat: Vec<String> = view.iter().map(|v| v.to_string()).collect();
    log::info!("matrix data: {}", flat.join(" , "));
}
