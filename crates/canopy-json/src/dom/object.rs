//! Object operations of the mutation API.
//!
//! An object is an ordered sequence of key/value tuples. Insertion order is
//! canonical until [`Json::object_sort`] or [`Json::object_sort_by`] is
//! called; duplicate keys are accepted and preserved. The `sorted` flag on
//! the lookup operations is the caller's assertion that the object is still
//! arranged under the lookup's ordering, switching the search from linear to
//! binary.

use std::cmp::Ordering;

use crate::dom::children::Children;
use crate::dom::{Json, JsonData, JsonKind, ParentLink};
use crate::error::{DomError, RejectedElement};
use crate::strings;

/// A key/value entry of an object node.
#[derive(Debug)]
pub struct ObjTuple<'a> {
    pub(crate) key: String,
    pub(crate) value: Json<'a>,
}

impl<'a> ObjTuple<'a> {
    /// The entry's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The entry's value.
    pub fn value(&self) -> &Json<'a> {
        &self.value
    }

    /// Mutable access to the entry's value.
    pub fn value_mut(&mut self) -> &mut Json<'a> {
        &mut self.value
    }
}

impl PartialEq for ObjTuple<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

fn key_order(a: &ObjTuple<'_>, b: &ObjTuple<'_>) -> Ordering {
    a.key.cmp(&b.key)
}

impl<'a> Json<'a> {
    fn object_children(&self) -> Result<&Children<ObjTuple<'a>>, DomError> {
        match &self.data {
            JsonData::Object(children) => Ok(children),
            _ => Err(self.wrong_type(JsonKind::Object)),
        }
    }

    fn object_children_mut(&mut self) -> Result<&mut Children<ObjTuple<'a>>, DomError> {
        let found = self.kind();
        match &mut self.data {
            JsonData::Object(children) => Ok(children),
            _ => Err(DomError::WrongType {
                expected: JsonKind::Object,
                found,
            }),
        }
    }

    fn valid_key(key: &str) -> Result<String, DomError> {
        if strings::is_valid(key) {
            Ok(key.to_owned())
        } else {
            Err(DomError::InvalidString)
        }
    }

    /// Number of entries; `0` when the node is not an object.
    pub fn object_len(&self) -> usize {
        self.object_children().map(Children::len).unwrap_or(0)
    }

    /// The entry at `index`.
    pub fn object_index(&self, index: usize) -> Option<&ObjTuple<'a>> {
        self.object_children().ok()?.get(index)
    }

    /// Mutable access to the entry at `index`.
    pub fn object_index_mut(&mut self, index: usize) -> Option<&mut ObjTuple<'a>> {
        self.object_children_mut().ok()?.get_mut(index)
    }

    /// The first entry whose key equals `key`; `sorted` asserts the object
    /// is sorted ascending by key, enabling binary search.
    pub fn object_index_by_key(&self, key: &str, sorted: bool) -> Option<&ObjTuple<'a>> {
        let children = self.object_children().ok()?;
        let index = children.find_index(|tuple| tuple.key.as_str().cmp(key), sorted)?;
        children.get(index)
    }

    /// Mutable access to the first entry whose key equals `key`.
    pub fn object_index_by_key_mut(
        &mut self,
        key: &str,
        sorted: bool,
    ) -> Option<&mut ObjTuple<'a>> {
        let children = self.object_children_mut().ok()?;
        let index = children.find_index(|tuple| tuple.key.as_str().cmp(key), sorted)?;
        children.get_mut(index)
    }

    /// Whether an entry with `key` exists.
    pub fn object_contains(&self, key: &str, sorted: bool) -> bool {
        self.object_index_by_key(key, sorted).is_some()
    }

    /// Append a (key, node) tuple, linking the node's parent. Shared by the
    /// primitive flavors and the parser; the key must already be validated.
    pub(crate) fn object_push_node(&mut self, key: String, value: Json<'a>) -> Result<(), DomError> {
        let children = self.object_children_mut()?;
        children.reserve_one()?;
        let mut value = value;
        value.parent = Some(ParentLink {
            container: children.id(),
            kind: JsonKind::Object,
        });
        children.push(ObjTuple { key, value });
        Ok(())
    }

    pub(crate) fn object_insert_node(
        &mut self,
        index: usize,
        key: String,
        value: Json<'a>,
    ) -> Result<(), DomError> {
        let children = self.object_children_mut()?;
        if index > children.len() {
            return Err(DomError::IndexOutOfBounds {
                index,
                len: children.len(),
            });
        }
        children.reserve_one()?;
        let mut value = value;
        value.parent = Some(ParentLink {
            container: children.id(),
            kind: JsonKind::Object,
        });
        children.insert(index, ObjTuple { key, value });
        Ok(())
    }

    /// Append an entry holding an owned, validated copy of `text`.
    pub fn object_push_str(&mut self, key: &str, text: &str) -> Result<(), DomError> {
        self.object_children()?;
        let key = Self::valid_key(key)?;
        let node = Json::string(text)?;
        self.object_push_node(key, node)
    }

    /// Append an entry holding a string node that borrows `text`.
    pub fn object_push_ref(&mut self, key: &str, text: &'a str) -> Result<(), DomError> {
        self.object_children()?;
        let key = Self::valid_key(key)?;
        let node = Json::string_ref(text)?;
        self.object_push_node(key, node)
    }

    /// Append an integer entry.
    pub fn object_push_int(&mut self, key: &str, n: i64) -> Result<(), DomError> {
        self.object_children()?;
        let key = Self::valid_key(key)?;
        self.object_push_node(key, Json::int(n))
    }

    /// Append a double entry.
    pub fn object_push_double(&mut self, key: &str, n: f64) -> Result<(), DomError> {
        self.object_children()?;
        let key = Self::valid_key(key)?;
        self.object_push_node(key, Json::double(n))
    }

    /// Append a bool entry.
    pub fn object_push_bool(&mut self, key: &str, b: bool) -> Result<(), DomError> {
        self.object_children()?;
        let key = Self::valid_key(key)?;
        self.object_push_node(key, Json::boolean(b))
    }

    /// Append a null entry.
    pub fn object_push_null(&mut self, key: &str) -> Result<(), DomError> {
        self.object_children()?;
        let key = Self::valid_key(key)?;
        self.object_push_node(key, Json::null())
    }

    /// Insert an owned-string entry at `index`; `index == len` appends.
    pub fn object_insert_str(&mut self, index: usize, key: &str, text: &str) -> Result<(), DomError> {
        self.object_children()?;
        let key = Self::valid_key(key)?;
        let node = Json::string(text)?;
        self.object_insert_node(index, key, node)
    }

    /// Insert a borrowed-string entry at `index`.
    pub fn object_insert_ref(
        &mut self,
        index: usize,
        key: &str,
        text: &'a str,
    ) -> Result<(), DomError> {
        self.object_children()?;
        let key = Self::valid_key(key)?;
        let node = Json::string_ref(text)?;
        self.object_insert_node(index, key, node)
    }

    /// Insert an integer entry at `index`.
    pub fn object_insert_int(&mut self, index: usize, key: &str, n: i64) -> Result<(), DomError> {
        self.object_children()?;
        let key = Self::valid_key(key)?;
        self.object_insert_node(index, key, Json::int(n))
    }

    /// Insert a double entry at `index`.
    pub fn object_insert_double(
        &mut self,
        index: usize,
        key: &str,
        n: f64,
    ) -> Result<(), DomError> {
        self.object_children()?;
        let key = Self::valid_key(key)?;
        self.object_insert_node(index, key, Json::double(n))
    }

    /// Insert a bool entry at `index`.
    pub fn object_insert_bool(&mut self, index: usize, key: &str, b: bool) -> Result<(), DomError> {
        self.object_children()?;
        let key = Self::valid_key(key)?;
        self.object_insert_node(index, key, Json::boolean(b))
    }

    /// Insert a null entry at `index`.
    pub fn object_insert_null(&mut self, index: usize, key: &str) -> Result<(), DomError> {
        self.object_children()?;
        let key = Self::valid_key(key)?;
        self.object_insert_node(index, key, Json::null())
    }

    /// Append an entry holding an existing orphan. On failure the orphan
    /// comes back inside the error, unmodified and unparented.
    pub fn object_push_element(
        &mut self,
        key: &str,
        element: Json<'a>,
    ) -> Result<(), RejectedElement<'a>> {
        if element.has_parent() {
            return Err(RejectedElement {
                error: DomError::AlreadyParented,
                element,
            });
        }
        let key = match Self::valid_key(key) {
            Ok(key) => key,
            Err(error) => return Err(RejectedElement { error, element }),
        };
        let children = match self.object_children_mut() {
            Ok(children) => children,
            Err(error) => return Err(RejectedElement { error, element }),
        };
        if let Err(error) = children.reserve_one() {
            return Err(RejectedElement { error, element });
        }

        let mut value = element;
        value.parent = Some(ParentLink {
            container: children.id(),
            kind: JsonKind::Object,
        });
        children.push(ObjTuple { key, value });
        Ok(())
    }

    /// Insert an entry holding an existing orphan at `index`; see
    /// [`object_push_element`](Json::object_push_element).
    pub fn object_insert_element(
        &mut self,
        index: usize,
        key: &str,
        element: Json<'a>,
    ) -> Result<(), RejectedElement<'a>> {
        if element.has_parent() {
            return Err(RejectedElement {
                error: DomError::AlreadyParented,
                element,
            });
        }
        let key = match Self::valid_key(key) {
            Ok(key) => key,
            Err(error) => return Err(RejectedElement { error, element }),
        };
        let children = match self.object_children_mut() {
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

        let mut value = element;
        value.parent = Some(ParentLink {
            container: children.id(),
            kind: JsonKind::Object,
        });
        children.insert(index, ObjTuple { key, value });
        Ok(())
    }

    /// Remove the last entry and return it to the caller, the value's
    /// parent link cleared.
    pub fn object_pop(&mut self) -> Option<ObjTuple<'a>> {
        let mut tuple = self.object_children_mut().ok()?.pop()?;
        tuple.value.parent = None;
        Some(tuple)
    }

    /// Drop the entry at `index` and shift the tail left.
    pub fn object_remove(&mut self, index: usize) -> Result<(), DomError> {
        let children = self.object_children_mut()?;
        let len = children.len();
        match children.remove(index) {
            Some(_) => Ok(()),
            None => Err(DomError::IndexOutOfBounds { index, len }),
        }
    }

    /// Drop the first entry whose key equals `key`.
    pub fn object_remove_by_key(&mut self, key: &str, sorted: bool) -> Result<(), DomError> {
        let children = self.object_children_mut()?;
        match children.find_index(|tuple| tuple.key.as_str().cmp(key), sorted) {
            Some(index) => {
                children.remove(index);
                Ok(())
            }
            None => Err(DomError::KeyNotFound),
        }
    }

    /// Drop all entries.
    pub fn object_clear(&mut self) -> Result<(), DomError> {
        self.object_children_mut()?.clear();
        Ok(())
    }

    /// Sort entries ascending by key. Values follow their keys.
    pub fn object_sort(&mut self) -> Result<(), DomError> {
        self.object_children_mut()?.sort_by(key_order);
        Ok(())
    }

    /// Sort entries with a caller comparator.
    pub fn object_sort_by(
        &mut self,
        cmp: impl FnMut(&ObjTuple<'a>, &ObjTuple<'a>) -> Ordering,
    ) -> Result<(), DomError> {
        self.object_children_mut()?.sort_by(cmp);
        Ok(())
    }

    /// Whether the entries are currently sorted ascending by key.
    pub fn object_is_sorted(&self) -> bool {
        self.object_children()
            .map(|children| children.is_sorted_by(key_order))
            .unwrap_or(false)
    }

    /// Whether the entries are currently sorted under `cmp`.
    pub fn object_is_sorted_by(
        &self,
        cmp: impl FnMut(&ObjTuple<'a>, &ObjTuple<'a>) -> Ordering,
    ) -> bool {
        self.object_children()
            .map(|children| children.is_sorted_by(cmp))
            .unwrap_or(false)
    }
}
