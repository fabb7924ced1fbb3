use crate::dom::{Json, JsonKind};
use thiserror::Error;

/// An error returned by the document construction and mutation APIs.
///
/// Every mutation is type-guarded: calling an array operation on a non-array
/// node (and so on) fails with [`DomError::WrongType`] and leaves all state
/// unchanged. Parse failures are *not* reported through this type; they come
/// back as `Error` nodes, see [`Json::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomError {
    /// The receiving node does not have the kind the operation requires.
    #[error("wrong node type: expected {expected:?}, found {found:?}")]
    WrongType {
        /// The kind the operation requires.
        expected: JsonKind,
        /// The kind the receiver actually has.
        found: JsonKind,
    },
    /// The string payload does not satisfy the JSON string grammar.
    #[error("invalid json string")]
    InvalidString,
    /// The element passed to an element-flavored insert already belongs to a
    /// container.
    #[error("element already has a parent")]
    AlreadyParented,
    /// The index is past the end of the container.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The container's length at the time of the call.
        len: usize,
    },
    /// No entry with the given key.
    #[error("key not found")]
    KeyNotFound,
    /// Growing the container would exceed the allocation ceiling.
    #[error("allocation too large")]
    AllocationTooLarge,
    /// The allocator refused to grow the container.
    #[error("out of memory")]
    OutOfMemory,
}

/// An error returned by serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SerializeError {
    /// `Error` and `Dropped` nodes have no JSON rendering.
    #[error("cannot serialize an error node")]
    ErrorNode,
    /// The caller-provided buffer cannot hold the output and expansion is
    /// disabled.
    #[error("output does not fit the provided buffer")]
    BufferTooSmall,
    /// The output would exceed the serializer's allocation ceiling.
    #[error("serialized output too large")]
    OutputTooLarge,
    /// The allocator refused to grow the output buffer.
    #[error("out of memory")]
    OutOfMemory,
    /// A `Double` holding ±inf (for instance from an overflowed parse) has
    /// no JSON representation.
    #[error("number is not finite")]
    NonFiniteNumber,
}

/// A failed element-flavored insert.
///
/// The caller's orphan is handed back unmodified and unparented, so a
/// rejected insert loses nothing:
///
/// ```rust
/// use canopy_json::Json;
///
/// let mut doc = Json::int(1); // not an array
/// let rejected = doc.array_push_element(Json::null()).unwrap_err();
/// assert!(!rejected.element.has_parent());
/// ```
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RejectedElement<'a> {
    /// Why the insert failed.
    #[source]
    pub error: DomError,
    /// The element, returned to the caller.
    pub element: Json<'a>,
}
