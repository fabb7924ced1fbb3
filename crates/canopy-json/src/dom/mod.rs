mod array;
pub(crate) mod children;
mod object;

use std::fmt;

use crate::error::{DomError, SerializeError};
use crate::parser::Parser;
use crate::serializer;
use crate::strings;
use children::Children;

pub use children::ContainerId;
pub use object::ObjTuple;

/// The kind of a [`Json`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    /// A failed parse, carrying a static message.
    Error,
    /// An object: an ordered sequence of key/value tuples.
    Object,
    /// An array: an ordered sequence of nodes.
    Array,
    /// A string owning its bytes.
    String,
    /// A string whose bytes are borrowed from the caller.
    Ref,
    /// A signed 64-bit integer.
    Int,
    /// An IEEE-754 double.
    Double,
    /// `true` or `false`.
    Bool,
    /// `null`.
    Null,
    /// A discarded root handle.
    Dropped,
}

/// Back-reference from a child node to the container that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    container: ContainerId,
    kind: JsonKind,
}

impl ParentLink {
    /// Identity of the containing child vector.
    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// Kind of the containing node, [`JsonKind::Array`] or
    /// [`JsonKind::Object`].
    pub fn kind(&self) -> JsonKind {
        self.kind
    }
}

#[derive(Debug)]
pub(crate) enum JsonData<'a> {
    Error(&'static str),
    Object(Children<ObjTuple<'a>>),
    Array(Children<Json<'a>>),
    String(String),
    Ref(&'a str),
    Int(i64),
    Double(f64),
    Bool(bool),
    Null,
    Dropped,
}

/// One node of a JSON document tree.
///
/// A node is created orphaned, either by [`Json::parse`] or by a
/// constructor, and becomes parented when it is pushed or inserted into an
/// array or object. Every parented node carries a back-reference to its
/// container, so it can report [`has_parent`] and [`parent_kind`] and can
/// change kind in place (see the `transform_into_*` family) without being
/// removed first.
///
/// ## Example
/// ```rust
/// use canopy_json::{Json, JsonKind};
///
/// let mut array = Json::array();
/// array.array_push_int(1).unwrap();
///
/// let child = array.array_index(0).unwrap();
/// assert_eq!(child.parent_kind(), Some(JsonKind::Array));
/// ```
///
/// The lifetime parameter is the lifetime of borrowed string bytes held by
/// `Ref` nodes; a tree without refs is `Json<'static>`.
///
/// [`has_parent`]: Json::has_parent
/// [`parent_kind`]: Json::parent_kind
#[derive(Debug)]
pub struct Json<'a> {
    pub(crate) data: JsonData<'a>,
    pub(crate) parent: Option<ParentLink>,
}

impl<'a> Json<'a> {
    fn new(data: JsonData<'a>) -> Self {
        Json { data, parent: None }
    }

    /// Parse JSON text into a document tree.
    ///
    /// Parse failures are materialized as an `Error` node; see
    /// [`error_message`](Json::error_message).
    pub fn parse(input: &str) -> Json<'static> {
        Parser::new(input).parse()
    }

    /// Create an integer node.
    pub fn int(n: i64) -> Self {
        Json::new(JsonData::Int(n))
    }

    /// Create a double node.
    pub fn double(n: f64) -> Self {
        Json::new(JsonData::Double(n))
    }

    /// Create a bool node.
    pub fn boolean(b: bool) -> Self {
        Json::new(JsonData::Bool(b))
    }

    /// Create a null node.
    pub fn null() -> Self {
        Json::new(JsonData::Null)
    }

    /// Create an empty array node.
    pub fn array() -> Self {
        Json::new(JsonData::Array(Children::new()))
    }

    /// Create an empty object node.
    pub fn object() -> Self {
        Json::new(JsonData::Object(Children::new()))
    }

    /// Create a string node owning a validated copy of `text`.
    pub fn string(text: &str) -> Result<Self, DomError> {
        if strings::is_valid(text) {
            Ok(Json::new(JsonData::String(text.to_owned())))
        } else {
            Err(DomError::InvalidString)
        }
    }

    /// Create a string node borrowing `text`. Serializes exactly like an
    /// owned string; only the ownership on destruction differs.
    pub fn string_ref(text: &'a str) -> Result<Self, DomError> {
        if strings::is_valid(text) {
            Ok(Json::new(JsonData::Ref(text)))
        } else {
            Err(DomError::InvalidString)
        }
    }

    pub(crate) fn error(message: &'static str) -> Json<'static> {
        Json::new(JsonData::Error(message))
    }

    /// A string node from an already-validated owned lexeme.
    pub(crate) fn owned_string(text: String) -> Json<'static> {
        Json::new(JsonData::String(text))
    }

    /// The node's kind.
    pub fn kind(&self) -> JsonKind {
        match &self.data {
            JsonData::Error(_) => JsonKind::Error,
            JsonData::Object(_) => JsonKind::Object,
            JsonData::Array(_) => JsonKind::Array,
            JsonData::String(_) => JsonKind::String,
            JsonData::Ref(_) => JsonKind::Ref,
            JsonData::Int(_) => JsonKind::Int,
            JsonData::Double(_) => JsonKind::Double,
            JsonData::Bool(_) => JsonKind::Bool,
            JsonData::Null => JsonKind::Null,
            JsonData::Dropped => JsonKind::Dropped,
        }
    }

    /// Whether the node currently lives inside a container.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// The node's parent back-reference, if any.
    pub fn parent(&self) -> Option<ParentLink> {
        self.parent
    }

    /// Kind of the containing node, if any.
    pub fn parent_kind(&self) -> Option<JsonKind> {
        self.parent.map(|link| link.kind)
    }

    /// Identity of this node's child vector, when the node is a container.
    pub fn container_id(&self) -> Option<ContainerId> {
        match &self.data {
            JsonData::Object(children) => Some(children.id()),
            JsonData::Array(children) => Some(children.id()),
            _ => None,
        }
    }

    /// The integer payload of an `Int` node.
    pub fn as_int(&self) -> Option<i64> {
        match self.data {
            JsonData::Int(n) => Some(n),
            _ => None,
        }
    }

    /// The double payload of a `Double` node.
    pub fn as_double(&self) -> Option<f64> {
        match self.data {
            JsonData::Double(n) => Some(n),
            _ => None,
        }
    }

    /// The payload of a `Bool` node.
    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            JsonData::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// The text of a `String` or `Ref` node.
    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            JsonData::String(text) => Some(text),
            JsonData::Ref(text) => Some(text),
            _ => None,
        }
    }

    /// The message of an `Error` node.
    pub fn error_message(&self) -> Option<&'static str> {
        match self.data {
            JsonData::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Replace the payload of an `Int` node.
    pub fn set_int(&mut self, n: i64) -> Result<(), DomError> {
        match &mut self.data {
            JsonData::Int(slot) => {
                *slot = n;
                Ok(())
            }
            _ => Err(self.wrong_type(JsonKind::Int)),
        }
    }

    /// Replace the payload of a `Double` node.
    pub fn set_double(&mut self, n: f64) -> Result<(), DomError> {
        match &mut self.data {
            JsonData::Double(slot) => {
                *slot = n;
                Ok(())
            }
            _ => Err(self.wrong_type(JsonKind::Double)),
        }
    }

    /// Replace the payload of a `Bool` node.
    pub fn set_bool(&mut self, b: bool) -> Result<(), DomError> {
        match &mut self.data {
            JsonData::Bool(slot) => {
                *slot = b;
                Ok(())
            }
            _ => Err(self.wrong_type(JsonKind::Bool)),
        }
    }

    /// Replace the payload of a `String` node with a validated copy of
    /// `text`.
    pub fn set_string(&mut self, text: &str) -> Result<(), DomError> {
        if !matches!(self.data, JsonData::String(_)) {
            return Err(self.wrong_type(JsonKind::String));
        }
        if !strings::is_valid(text) {
            return Err(DomError::InvalidString);
        }
        self.data = JsonData::String(text.to_owned());
        Ok(())
    }

    /// Replace the borrow of a `Ref` node.
    pub fn set_ref(&mut self, text: &'a str) -> Result<(), DomError> {
        match &mut self.data {
            JsonData::Ref(slot) => {
                *slot = text;
                Ok(())
            }
            _ => Err(self.wrong_type(JsonKind::Ref)),
        }
    }

    /// Turn this node into an `Int`, dropping any owned payload. The parent
    /// link is preserved, so a parented child changes kind in place.
    pub fn transform_into_int(&mut self, n: i64) {
        self.data = JsonData::Int(n);
    }

    /// Turn this node into a `Double`; see
    /// [`transform_into_int`](Json::transform_into_int).
    pub fn transform_into_double(&mut self, n: f64) {
        self.data = JsonData::Double(n);
    }

    /// Turn this node into a `Bool`.
    pub fn transform_into_bool(&mut self, b: bool) {
        self.data = JsonData::Bool(b);
    }

    /// Turn this node into a `String`. The old payload is only dropped once
    /// the new text validates.
    pub fn transform_into_string(&mut self, text: &str) -> Result<(), DomError> {
        if !strings::is_valid(text) {
            return Err(DomError::InvalidString);
        }
        self.data = JsonData::String(text.to_owned());
        Ok(())
    }

    /// Turn this node into a `Ref` borrowing `text`.
    pub fn transform_into_ref(&mut self, text: &'a str) -> Result<(), DomError> {
        if !strings::is_valid(text) {
            return Err(DomError::InvalidString);
        }
        self.data = JsonData::Ref(text);
        Ok(())
    }

    /// Turn this node into an empty array.
    pub fn transform_into_empty_array(&mut self) {
        self.data = JsonData::Array(Children::new());
    }

    /// Turn this node into an empty object.
    pub fn transform_into_empty_object(&mut self) {
        self.data = JsonData::Object(Children::new());
    }

    /// Release this node.
    ///
    /// A parented node is replaced with `Null` in place, so the containing
    /// vector keeps its length; use the container's `remove`/`pop`
    /// operations to actually shrink it. A root drops its whole subtree and
    /// the handle is left `Dropped`.
    pub fn discard(&mut self) {
        if matches!(self.data, JsonData::Dropped) {
            return;
        }

        if self.parent.is_some() {
            self.data = JsonData::Null;
        } else {
            self.data = JsonData::Dropped;
        }
    }

    /// Serialize this subtree into a library-grown buffer.
    pub fn serialize(&self) -> Result<Vec<u8>, SerializeError> {
        serializer::to_vec(self)
    }

    /// Serialize this subtree, appending to a caller-provided buffer. The
    /// buffer is never dropped by the library; with `expand == false` the
    /// output must fit the buffer's existing capacity.
    pub fn serialize_into(
        &self,
        buffer: &mut Vec<u8>,
        expand: bool,
    ) -> Result<(), SerializeError> {
        serializer::into_buffer(self, buffer, expand)
    }

    pub(crate) fn wrong_type(&self, expected: JsonKind) -> DomError {
        DomError::WrongType {
            expected,
            found: self.kind(),
        }
    }
}

/// Structural equality: kinds and payloads, children in container order.
/// Parent links and container identities are ignored, and a `String` equals
/// a `Ref` holding the same text.
impl PartialEq for Json<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.data, &other.data) {
            (JsonData::Error(a), JsonData::Error(b)) => a == b,
            (JsonData::Object(a), JsonData::Object(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (JsonData::Array(a), JsonData::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (JsonData::String(a), JsonData::String(b)) => a == b,
            (JsonData::Ref(a), JsonData::Ref(b)) => a == b,
            (JsonData::String(a), JsonData::Ref(b)) => a == b,
            (JsonData::Ref(a), JsonData::String(b)) => a == b,
            (JsonData::Int(a), JsonData::Int(b)) => a == b,
            (JsonData::Double(a), JsonData::Double(b)) => a == b,
            (JsonData::Bool(a), JsonData::Bool(b)) => a == b,
            (JsonData::Null, JsonData::Null) => true,
            (JsonData::Dropped, JsonData::Dropped) => true,
            _ => false,
        }
    }
}

/// Renders the serialized JSON text. `Error` and `Dropped` nodes have no
/// rendering and yield `fmt::Error`.
impl fmt::Display for Json<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.serialize().map_err(|_| fmt::Error)?;
        f.write_str(std::str::from_utf8(&bytes).map_err(|_| fmt::Error)?)
    }
}

macro_rules! from_integer {
    ($($ty:path),+) => {
        $(
            impl From<$ty> for Json<'static> {
                fn from(n: $ty) -> Self {
                    Json::int(n as i64)
                }
            }
        )+
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Json<'static> {
    fn from(n: f64) -> Self {
        Json::double(n)
    }
}

impl From<f32> for Json<'static> {
    fn from(n: f32) -> Self {
        Json::double(n as f64)
    }
}

impl From<bool> for Json<'static> {
    fn from(b: bool) -> Self {
        Json::boolean(b)
    }
}

#[cfg(test)]
mod test {
    use super::{Json, JsonKind};
    use crate::error::DomError;

    #[test]
    fn constructors_return_orphans() {
        for node in [
            Json::int(5),
            Json::double(2.5),
            Json::boolean(true),
            Json::null(),
            Json::array(),
            Json::object(),
            Json::string("hi").unwrap(),
        ] {
            assert!(!node.has_parent());
            assert_eq!(node.parent_kind(), None);
        }
    }

    #[test]
    fn string_constructors_validate() {
        assert_eq!(Json::string("a\nb").unwrap_err(), DomError::InvalidString);
        assert_eq!(
            Json::string_ref(r"\q").unwrap_err(),
            DomError::InvalidString
        );
        assert_eq!(Json::string_ref("plain").unwrap().kind(), JsonKind::Ref);
    }

    #[test]
    fn accessors_are_type_guarded() {
        let node = Json::int(7);
        assert_eq!(node.as_int(), Some(7));
        assert_eq!(node.as_double(), None);
        assert_eq!(node.as_bool(), None);
        assert_eq!(node.as_str(), None);
        assert_eq!(node.error_message(), None);
    }

    #[test]
    fn setters_require_the_matching_kind() {
        let mut node = Json::int(1);
        node.set_int(2).unwrap();
        assert_eq!(node.as_int(), Some(2));
        assert!(node.set_double(2.0).is_err());
        assert!(node.set_bool(true).is_err());

        let mut text = Json::string("a").unwrap();
        text.set_string("b").unwrap();
        assert_eq!(text.as_str(), Some("b"));
        assert_eq!(text.set_string("a\tb"), Err(DomError::InvalidString));
        assert_eq!(text.as_str(), Some("b"));

        // the ref setter swaps one borrow for another
        assert!(text.set_ref("c").is_err());
        let mut reference = Json::string_ref("one").unwrap();
        reference.set_ref("two").unwrap();
        assert_eq!(reference.as_str(), Some("two"));
    }

    #[test]
    fn transforms_change_kind_in_place() {
        let mut node = Json::string("payload").unwrap();
        node.transform_into_int(3);
        assert_eq!(node.kind(), JsonKind::Int);

        node.transform_into_empty_object();
        assert_eq!(node.kind(), JsonKind::Object);
        assert_eq!(node.object_len(), 0);

        node.transform_into_string("again").unwrap();
        assert_eq!(node.as_str(), Some("again"));
    }

    #[test]
    fn failed_string_transform_keeps_the_old_payload() {
        let mut node = Json::int(1);
        assert!(node.transform_into_string("bad\u{1}").is_err());
        assert_eq!(node.as_int(), Some(1));
    }

    #[test]
    fn discarding_a_root_marks_it_dropped() {
        let mut root = Json::array();
        root.array_push_int(1).unwrap();
        root.discard();
        assert_eq!(root.kind(), JsonKind::Dropped);

        // discarding twice is a no-op
        root.discard();
        assert_eq!(root.kind(), JsonKind::Dropped);
    }

    #[test]
    fn owned_and_borrowed_strings_compare_equal() {
        let owned = Json::string("text").unwrap();
        let borrowed = Json::string_ref("text").unwrap();
        assert_eq!(owned, borrowed);
        assert_ne!(owned, Json::string("other").unwrap());
    }

    #[test]
    fn from_conversions() {
        assert_eq!(Json::from(5u16), Json::int(5));
        assert_eq!(Json::from(2.5f32), Json::double(2.5));
        assert_eq!(Json::from(true), Json::boolean(true));
    }

    #[test]
    fn display_renders_json_text() {
        let doc = Json::parse(r#"{"a":[1,true,null]}"#);
        assert_eq!(doc.to_string(), r#"{"a":[1,true,null]}"#);
    }
}
