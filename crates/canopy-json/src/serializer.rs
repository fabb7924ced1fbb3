//! Tree-walk serializer with an explicit buffer-growth discipline.
//!
//! Every write goes through [`Serializer::ensure`], which enforces the
//! output ceiling and only grows the buffer when expansion is allowed.
//! Caller-provided buffers are borrowed, never dropped, and in
//! fixed-capacity mode the output is bounded by the capacity the caller
//! chose.

use crate::dom::children::Children;
use crate::dom::{Json, JsonData, ObjTuple};
use crate::error::SerializeError;

/// Starting capacity of a library-grown output buffer.
const INITIAL_CAPACITY: usize = 512;

/// Total bytes the serializer may produce.
const OUTPUT_CEILING: usize = i32::MAX as usize;

/// Serialize `node` into a library-grown buffer.
pub(crate) fn to_vec(node: &Json<'_>) -> Result<Vec<u8>, SerializeError> {
    let mut out = Vec::with_capacity(INITIAL_CAPACITY);
    let mut serializer = Serializer::new(&mut out, true);
    serializer.node(node)?;
    debug_assert_eq!(serializer.depth, 0);

    Ok(out)
}

/// Serialize `node`, appending to a caller-provided buffer.
pub(crate) fn into_buffer(
    node: &Json<'_>,
    out: &mut Vec<u8>,
    expand: bool,
) -> Result<(), SerializeError> {
    let mut serializer = Serializer::new(out, expand);
    serializer.node(node)?;
    debug_assert_eq!(serializer.depth, 0);

    Ok(())
}

struct Serializer<'s> {
    out: &'s mut Vec<u8>,
    expand: bool,
    /// Hard bound on `out.len()`: the ceiling when expanding, the buffer's
    /// existing capacity otherwise.
    limit: usize,
    depth: usize,
}

impl<'s> Serializer<'s> {
    fn new(out: &'s mut Vec<u8>, expand: bool) -> Serializer<'s> {
        let limit = if expand {
            OUTPUT_CEILING
        } else {
            out.capacity()
        };

        Serializer {
            out,
            expand,
            limit,
            depth: 0,
        }
    }

    /// Verify that `needed` more bytes fit, growing only when allowed.
    fn ensure(&mut self, needed: usize) -> Result<(), SerializeError> {
        let required = self.out.len().saturating_add(needed);
        if required > self.limit {
            return Err(if self.expand {
                SerializeError::OutputTooLarge
            } else {
                SerializeError::BufferTooSmall
            });
        }

        if required > self.out.capacity() {
            self.out
                .try_reserve(needed)
                .map_err(|_| SerializeError::OutOfMemory)?;
        }

        Ok(())
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        self.ensure(bytes.len())?;
        self.out.extend_from_slice(bytes);

        Ok(())
    }

    fn node(&mut self, node: &Json<'_>) -> Result<(), SerializeError> {
        match &node.data {
            JsonData::String(text) => self.string(text),
            JsonData::Ref(text) => self.string(text),
            JsonData::Int(n) => self.put(n.to_string().as_bytes()),
            JsonData::Double(n) => self.double(*n),
            JsonData::Bool(true) => self.put(b"true"),
            JsonData::Bool(false) => self.put(b"false"),
            JsonData::Null => self.put(b"null"),
            JsonData::Array(children) => self.array(children),
            JsonData::Object(children) => self.object(children),
            JsonData::Error(_) | JsonData::Dropped => Err(SerializeError::ErrorNode),
        }
    }

    /// Emit `"`, the raw bytes, `"`. The bytes were validated at parse or
    /// construction time and still carry their escapes.
    fn string(&mut self, text: &str) -> Result<(), SerializeError> {
        self.ensure(text.len() + 2)?;
        self.out.push(b'"');
        self.out.extend_from_slice(text.as_bytes());
        self.out.push(b'"');

        Ok(())
    }

    fn double(&mut self, n: f64) -> Result<(), SerializeError> {
        if !n.is_finite() {
            return Err(SerializeError::NonFiniteNumber);
        }
        self.put(format_double(n).as_bytes())
    }

    fn array(&mut self, children: &Children<Json<'_>>) -> Result<(), SerializeError> {
        self.put(b"[")?;
        self.depth += 1;

        let len = children.len();
        for (i, child) in children.iter().enumerate() {
            self.node(child)?;
            if i + 1 < len {
                self.put(b",")?;
            }
        }

        self.depth -= 1;
        self.put(b"]")
    }

    fn object(&mut self, children: &Children<ObjTuple<'_>>) -> Result<(), SerializeError> {
        self.put(b"{")?;
        self.depth += 1;

        let len = children.len();
        for (i, tuple) in children.iter().enumerate() {
            self.string(&tuple.key)?;
            self.put(b":")?;
            self.node(tuple.value())?;
            if i + 1 < len {
                self.put(b",")?;
            }
        }

        self.depth -= 1;
        self.put(b"}")
    }
}

/// Shortest round-trip representation of a finite double, constrained to
/// the grammar this library accepts back: a fraction part is always present
/// and an exponent always carries an explicit sign.
fn format_double(n: f64) -> String {
    let mut text = format!("{n:?}");

    match text.find('e') {
        Some(mut e) => {
            if !text[..e].contains('.') {
                text.insert_str(e, ".0");
                e += 2;
            }
            if !matches!(text.as_bytes()[e + 1], b'+' | b'-') {
                text.insert(e + 1, '+');
            }
        }
        None => {
            if !text.contains('.') {
                text.push_str(".0");
            }
        }
    }

    text
}

#[cfg(test)]
mod test {
    use super::format_double;
    use crate::dom::Json;
    use crate::error::SerializeError;

    fn text(node: &Json<'_>) -> String {
        String::from_utf8(node.serialize().unwrap()).unwrap()
    }

    #[test]
    fn primitives() {
        assert_eq!(text(&Json::int(-42)), "-42");
        assert_eq!(text(&Json::boolean(true)), "true");
        assert_eq!(text(&Json::boolean(false)), "false");
        assert_eq!(text(&Json::null()), "null");
        assert_eq!(text(&Json::string("hi").unwrap()), "\"hi\"");
        assert_eq!(text(&Json::string_ref("hi").unwrap()), "\"hi\"");
    }

    #[test]
    fn doubles_always_reparse_as_doubles() {
        assert_eq!(format_double(40.0), "40.0");
        assert_eq!(format_double(-0.25), "-0.25");
        assert_eq!(format_double(1e300), "1.0e+300");
        assert_eq!(format_double(1.25e-7), "1.25e-7");
        assert_eq!(format_double(-12.523e15), "-1.2523e+16");
    }

    #[test]
    fn non_finite_doubles_fail() {
        assert_eq!(
            Json::double(f64::INFINITY).serialize(),
            Err(SerializeError::NonFiniteNumber)
        );
    }

    #[test]
    fn containers_keep_insertion_order() {
        let mut object = Json::object();
        object.object_push_str("b", "two").unwrap();
        object.object_push_int("a", 1).unwrap();
        assert_eq!(text(&object), "{\"b\":\"two\",\"a\":1}");

        let array = Json::array_from_ints(&[1, 2, 3]).unwrap();
        assert_eq!(text(&array), "[1,2,3]");

        assert_eq!(text(&Json::object()), "{}");
        assert_eq!(text(&Json::array()), "[]");
    }

    #[test]
    fn string_bytes_are_emitted_verbatim() {
        let doc = Json::parse("\"a\\nb\"");
        assert_eq!(text(&doc), "\"a\\nb\"");
    }

    #[test]
    fn error_nodes_do_not_serialize() {
        let error = Json::parse("nonsense");
        assert_eq!(error.serialize(), Err(SerializeError::ErrorNode));

        let mut dropped = Json::null();
        dropped.discard();
        assert_eq!(dropped.serialize(), Err(SerializeError::ErrorNode));
    }

    #[test]
    fn fixed_buffer_must_fit() {
        let doc = Json::parse("[1,2,3]");

        let mut small = Vec::with_capacity(4);
        assert_eq!(
            doc.serialize_into(&mut small, false),
            Err(SerializeError::BufferTooSmall)
        );

        let mut roomy = Vec::with_capacity(64);
        doc.serialize_into(&mut roomy, true).unwrap();
        assert_eq!(roomy, b"[1,2,3]");
    }

    #[test]
    fn expanding_buffer_grows_past_its_capacity() {
        let doc = Json::parse("[\"0123456789\",\"0123456789\"]");
        let mut tiny = Vec::with_capacity(2);
        doc.serialize_into(&mut tiny, true).unwrap();
        assert_eq!(tiny, b"[\"0123456789\",\"0123456789\"]");
    }

    #[test]
    fn serialize_into_appends() {
        let mut out = Vec::with_capacity(32);
        Json::int(1).serialize_into(&mut out, false).unwrap();
        Json::int(2).serialize_into(&mut out, false).unwrap();
        assert_eq!(out, b"12");
    }
}
