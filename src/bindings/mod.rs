//! Language binding layer (FFI)
//!
//! Split in two, so the marshaling rules live apart from any one host:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              Host (Python)                   │
//! │   dict        object        tuple   ndarray  │
//! └──────┬───────────┬────────────┬────────┬─────┘
//!        v           v            v        v
//! ┌──────────────────────────────────────────────┐
//! │      Binding adapter (python.rs, PyO3)       │
//! │  MapAdapter  AttributeAdapter  SequenceAdapter│
//! └──────────────────────┬───────────────────────┘
//!                        v
//! ┌──────────────────────────────────────────────┐
//! │      Marshaling protocol (protocol.rs)       │
//! │   validation, typed extraction, OwnedMatrix  │
//! └──────────────────────┬───────────────────────┘
//!                        v
//! ┌──────────────────────────────────────────────┐
//! │          Native state (registry.rs)          │
//! └──────────────────────────────────────────────┘
//! ```

pub mod protocol;
pub mod python;

pub use protocol::*;
