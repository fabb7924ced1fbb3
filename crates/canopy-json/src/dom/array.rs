//! Array operations of the mutation API.
//!
//! Primitive flavors construct the child in place; element flavors take an
//! existing orphan by value and hand it back untouched if the insert cannot
//! go through. Parent links are only written once the vector has room, so a
//! failure never leaves a half-linked node behind.

use crate::dom::children::Children;
use crate::dom::{Json, JsonData, JsonKind, ParentLink};
use crate::error::{DomError, RejectedElement};

impl<'a> Json<'a> {
    fn array_children(&self) -> Result<&Children<Json<'a>>, DomError> {
        match &self.data {
            JsonData::Array(children) => Ok(children),
            _ => Err(self.wrong_type(JsonKind::Array)),
        }
    }

    fn array_children_mut(&mut self) -> Result<&mut Children<Json<'a>>, DomError> {
        let found = self.kind();
        match &mut self.data {
            JsonData::Array(children) => Ok(children),
            _ => Err(DomError::WrongType {
                expected: JsonKind::Array,
                found,
            }),
        }
    }

    /// Number of elements; `0` when the node is not an array.
    pub fn array_len(&self) -> usize {
        self.array_children().map(Children::len).unwrap_or(0)
    }

    /// The element at `index`.
    pub fn array_index(&self, index: usize) -> Option<&Json<'a>> {
        self.array_children().ok()?.get(index)
    }

    /// Mutable access to the element at `index`.
    pub fn array_index_mut(&mut self, index: usize) -> Option<&mut Json<'a>> {
        self.array_children_mut().ok()?.get_mut(index)
    }

    /// The first element.
    pub fn array_front(&self) -> Option<&Json<'a>> {
        self.array_children().ok()?.front()
    }

    /// The last element.
    pub fn array_back(&self) -> Option<&Json<'a>> {
        self.array_children().ok()?.back()
    }

    /// Append a freshly built node, linking its parent. Shared by the
    /// primitive flavors and the parser.
    pub(crate) fn array_push_node(&mut self, mut node: Json<'a>) -> Result<(), DomError> {
        let children = self.array_children_mut()?;
        children.reserve_one()?;
        node.parent = Some(ParentLink {
            container: children.id(),
            kind: JsonKind::Array,
        });
        children.push(node);
        Ok(())
    }

    pub(crate) fn array_insert_node(
        &mut self,
        index: usize,
        mut node: Json<'a>,
    ) -> Result<(), DomError> {
        let children = self.array_children_mut()?;
        if index > children.len() {
            return Err(DomError::IndexOutOfBounds {
                index,
                len: children.len(),
            });
        }
        children.reserve_one()?;
        node.parent = Some(ParentLink {
            container: children.id(),
            kind: JsonKind::Array,
        });
        children.insert(index, node);
        Ok(())
    }

    /// Append an owned, validated copy of `text`.
    pub fn array_push_str(&mut self, text: &str) -> Result<(), DomError> {
        self.array_children()?;
        let node = Json::string(text)?;
        self.array_push_node(node)
    }

    /// Append a string node borrowing `text`.
    pub fn array_push_ref(&mut self, text: &'a str) -> Result<(), DomError> {
        self.array_children()?;
        let node = Json::string_ref(text)?;
        self.array_push_node(node)
    }

    /// Append an integer.
    pub fn array_push_int(&mut self, n: i64) -> Result<(), DomError> {
        self.array_push_node(Json::int(n))
    }

    /// Append a double.
    pub fn array_push_double(&mut self, n: f64) -> Result<(), DomError> {
        self.array_push_node(Json::double(n))
    }

    /// Append a bool.
    pub fn array_push_bool(&mut self, b: bool) -> Result<(), DomError> {
        self.array_push_node(Json::boolean(b))
    }

    /// Append a null.
    pub fn array_push_null(&mut self) -> Result<(), DomError> {
        self.array_push_node(Json::null())
    }

    /// Insert an owned, validated copy of `text` at `index`.
    pub fn array_insert_str(&mut self, index: usize, text: &str) -> Result<(), DomError> {
        self.array_children()?;
        let node = Json::string(text)?;
        self.array_insert_node(index, node)
    }

    /// Insert a string node borrowing `text` at `index`.
    pub fn array_insert_ref(&mut self, index: usize, text: &'a str) -> Result<(), DomError> {
        self.array_children()?;
        let node = Json::string_ref(text)?;
        self.array_insert_node(index, node)
    }

    /// Insert an integer at `index`; `index == len` appends.
    pub fn array_insert_int(&mut self, index: usize, n: i64) -> Result<(), DomError> {
        self.array_insert_node(index, Json::int(n))
    }

    /// Insert a double at `index`.
    pub fn array_insert_double(&mut self, index: usize, n: f64) -> Result<(), DomError> {
        self.array_insert_node(index, Json::double(n))
    }

    /// Insert a bool at `index`.
    pub fn array_insert_bool(&mut self, index: usize, b: bool) -> Result<(), DomError> {
        self.array_insert_node(index, Json::boolean(b))
    }

    /// Insert a null at `index`.
    pub fn array_insert_null(&mut self, index: usize) -> Result<(), DomError> {
        self.array_insert_node(index, Json::null())
    }

    /// Append an existing orphan. On failure the orphan comes back inside
    /// the error, unmodified and unparented.
    pub fn array_push_element(&mut self, element: Json<'a>) -> Result<(), RejectedElement<'a>> {
        if element.has_parent() {
            return Err(RejectedElement {
                error: DomError::AlreadyParented,
                element,
            });
        }
        let children = match self.array_children_mut() {
            Ok(children) => children,
            Err(error) => return Err(RejectedElement { error, element }),
        };
        if let Err(error) = children.reserve_one() {
            return Err(RejectedElement { error, element });
        }

        let mut element = element;
        element.parent = Some(ParentLink {
            container: children.id(),
            kind: JsonKind::Array,
        });
        children.push(element);
        Ok(())
    }

    /// Insert an existing orphan at `index`; see
    /// [`array_push_element`](Json::array_push_element).
    pub fn array_insert_element(
        &mut self,
        index: usize,
        element: Json<'a>,
    ) -> Result<(), RejectedElement<'a>> {
        if element.has_parent() {
            return Err(RejectedElement {
                error: DomError::AlreadyParented,
                element,
            });
        }
        let children = match self.array_children_mut() {
            Ok(children) => children,
            Err(error) => return Err(RejectedElement { error, element }),
        };
        if index > children.len() {
            return Err(RejectedElement {
                error: DomError::IndexOutOfBounds {
                    index,
                    len: children.len(),
                },
                element,
            });
        }
        if let Err(error) = children.reserve_one() {
            return Err(RejectedElement { error, element });
        }

        let mut element = element;
        element.parent = Some(ParentLink {
            container: children.id(),
            kind: JsonKind::Array,
        });
        children.insert(index, element);
        Ok(())
    }

    /// Remove the last element and return it to the caller, parent link
    /// cleared.
    pub fn array_pop(&mut self) -> Option<Json<'a>> {
        let mut node = self.array_children_mut().ok()?.pop()?;
        node.parent = None;
        Some(node)
    }

    /// Drop the subtree at `index` and shift the tail left.
    pub fn array_remove(&mut self, index: usize) -> Result<(), DomError> {
        let children = self.array_children_mut()?;
        let len = children.len();
        match children.remove(index) {
            Some(_) => Ok(()),
            None => Err(DomError::IndexOutOfBounds { index, len }),
        }
    }

    /// Drop all elements.
    pub fn array_clear(&mut self) -> Result<(), DomError> {
        self.array_children_mut()?.clear();
        Ok(())
    }

    /// Build an array node from a slice of integers.
    pub fn array_from_ints(values: &[i64]) -> Result<Self, DomError> {
        let mut array = Json::array();
        for &n in values {
            array.array_push_int(n)?;
        }
        Ok(array)
    }

    /// Build an array node from a slice of doubles.
    pub fn array_from_doubles(values: &[f64]) -> Result<Self, DomError> {
        let mut array = Json::array();
        for &n in values {
            array.array_push_double(n)?;
        }
        Ok(array)
    }

    /// Build an array node from a slice of bools.
    pub fn array_from_bools(values: &[bool]) -> Result<Self, DomError> {
        let mut array = Json::array();
        for &b in values {
            array.array_push_bool(b)?;
        }
        Ok(array)
    }

    /// Build an array node of owned strings, validating each.
    pub fn array_from_strs(values: &[&str]) -> Result<Self, DomError> {
        let mut array = Json::array();
        for text in values {
            array.array_push_str(text)?;
        }
        Ok(array)
    }

    /// Build an array node of borrowed strings, validating each.
    pub fn array_from_refs(values: &[&'a str]) -> Result<Self, DomError> {
        let mut array = Json::array();
        for text in values {
            array.array_push_ref(text)?;
        }
        Ok(array)
    }

    /// Build an array node of `count` nulls.
    pub fn array_from_nulls(count: usize) -> Result<Self, DomError> {
        let mut array = Json::array();
        for _ in 0..count {
            array.array_push_null()?;
        }
        Ok(array)
    }

    /// Build an array node from existing orphans. Everything is dropped if
    /// any element is parented or an insert fails.
    pub fn array_from_elements(elements: Vec<Json<'a>>) -> Result<Self, DomError> {
        let mut array = Json::array();
        for element in elements {
            array
                .array_push_element(element)
                .map_err(|rejected| rejected.error)?;
        }
        Ok(array)
    }
}

#[cfg(test)]
mod test {
    use crate::dom::{Json, JsonKind};
    use crate::error::DomError;

    #[test]
    fn new_array_is_empty() {
        let array = Json::array();
        assert_eq!(array.array_len(), 0);
        assert!(array.array_front().is_none());
        assert!(array.array_back().is_none());
    }

    #[test]
    fn push_links_the_parent() {
        let mut array = Json::array();
        array.array_push_int(1).unwrap();
        array.array_push_str("two").unwrap();
        array.array_push_null().unwrap();
        assert_eq!(array.array_len(), 3);

        let id = array.container_id().unwrap();
        for i in 0..3 {
            let child = array.array_index(i).unwrap();
            assert_eq!(child.parent_kind(), Some(JsonKind::Array));
            assert_eq!(child.parent().unwrap().container(), id);
        }
    }

    #[test]
    fn operations_are_type_guarded() {
        let mut node = Json::int(3);
        assert!(matches!(
            node.array_push_int(1),
            Err(DomError::WrongType {
                expected: JsonKind::Array,
                found: JsonKind::Int,
            })
        ));
        assert_eq!(node.array_len(), 0);
        assert!(node.array_index(0).is_none());
        assert!(node.array_pop().is_none());
    }

    #[test]
    fn insert_shifts_the_tail() {
        let mut array = Json::array();
        array.array_push_int(1).unwrap();
        array.array_push_int(3).unwrap();
        array.array_insert_int(1, 2).unwrap();

        let values: Vec<i64> = (0..3)
            .map(|i| array.array_index(i).unwrap().as_int().unwrap())
            .collect();
        assert_eq!(values, vec![1, 2, 3]);

        // index == len appends
        array.array_insert_int(3, 4).unwrap();
        assert_eq!(array.array_back().unwrap().as_int(), Some(4));

        assert!(matches!(
            array.array_insert_int(9, 9),
            Err(DomError::IndexOutOfBounds { index: 9, len: 4 })
        ));
    }

    #[test]
    fn pop_clears_the_parent_link() {
        let mut array = Json::array();
        array.array_push_bool(true).unwrap();
        let popped = array.array_pop().unwrap();
        assert_eq!(array.array_len(), 0);
        assert!(!popped.has_parent());
        assert_eq!(popped.as_bool(), Some(true));
    }

    #[test]
    fn remove_drops_the_subtree() {
        let mut array = Json::array();
        array.array_push_int(1).unwrap();
        array.array_push_int(2).unwrap();
        array.array_remove(0).unwrap();
        assert_eq!(array.array_len(), 1);
        assert_eq!(array.array_index(0).unwrap().as_int(), Some(2));

        assert!(array.array_remove(5).is_err());
    }

    #[test]
    fn parented_elements_are_rejected() {
        let mut array = Json::array();
        array.array_push_int(1).unwrap();

        // an orphan wearing another container's link
        let parented = Json {
            data: crate::dom::JsonData::Int(9),
            parent: array.array_index(0).unwrap().parent(),
        };

        let mut other = Json::array();
        let rejected = other.array_push_element(parented).unwrap_err();
        assert_eq!(rejected.error, DomError::AlreadyParented);
        assert!(rejected.element.has_parent());
        assert_eq!(other.array_len(), 0);
    }

    #[test]
    fn element_rejection_returns_the_orphan() {
        let mut not_an_array = Json::null();
        let rejected = not_an_array
            .array_push_element(Json::int(1))
            .unwrap_err();
        assert!(matches!(rejected.error, DomError::WrongType { .. }));
        assert!(!rejected.element.has_parent());
        assert_eq!(rejected.element.as_int(), Some(1));
    }

    #[test]
    fn clear_empties_the_array() {
        let mut array = Json::array_from_ints(&[1, 2, 3]).unwrap();
        array.array_clear().unwrap();
        assert_eq!(array.array_len(), 0);
    }

    #[test]
    fn bulk_constructors() {
        let array = Json::array_from_strs(&["a", "b"]).unwrap();
        assert_eq!(array.array_len(), 2);
        assert_eq!(array.array_index(1).unwrap().as_str(), Some("b"));

        assert_eq!(
            Json::array_from_strs(&["ok", "bad\u{2}"]).unwrap_err(),
            DomError::InvalidString
        );

        let refs = Json::array_from_refs(&["x", "y"]).unwrap();
        assert_eq!(refs.array_index(0).unwrap().kind(), JsonKind::Ref);

        let nulls = Json::array_from_nulls(3).unwrap();
        assert_eq!(nulls.array_len(), 3);
        assert_eq!(nulls.array_index(2).unwrap().kind(), JsonKind::Null);
        assert_eq!(Json::array_from_nulls(0).unwrap().array_len(), 0);

        let elements = Json::array_from_elements(vec![Json::int(1), Json::null()]).unwrap();
        assert_eq!(elements.array_len(), 2);
        assert!(elements.array_index(1).unwrap().has_parent());
    }
}
