//! Property paths into parameter values
//!
//! A path is a dot-separated list of segments, each optionally followed by a
//! bracketed index: `order.items[0].sku`, `attrs[color]`. Indexes address
//! list/array positions or map keys.

use crate::error::BindingError;
use crate::value::{Value, ValueMap};
use std::fmt;

/// One segment of a property path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Property name
    pub name: String,

    /// Bracketed index, if present
    pub index: Option<String>,
}

/// A parsed property path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    /// Parse a property path
    pub fn parse(path: &str) -> Result<Self, BindingError> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;

        for ch in path.chars() {
            match ch {
                '[' => {
                    depth += 1;
                    current.push(ch);
                }
                ']' => {
                    if depth == 0 {
                        return Err(invalid(path, "unbalanced ']'"));
                    }
                    depth -= 1;
                    current.push(ch);
                }
                '.' if depth == 0 => {
                    segments.push(parse_segment(path, &current)?);
                    current.clear();
                }
                _ => current.push(ch),
            }
        }

        if depth != 0 {
            return Err(invalid(path, "unterminated '['"));
        }
        segments.push(parse_segment(path, &current)?);

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Name of the first segment, without its index
    pub fn leading_name(&self) -> &str {
        &self.segments[0].name
    }

    /// Read the value at this path
    ///
    /// Missing keys and null intermediates yield `Ok(None)`.
    pub fn get<'v>(&self, root: &'v Value) -> Result<Option<&'v Value>, BindingError> {
        self.walk(root, &self.segments)
    }

    /// Read the rest of this path, given the value already found for the
    /// leading segment's name
    ///
    /// Used when the leading name was looked up elsewhere (for instance in a
    /// strict parameter map).
    pub fn get_from_leading<'v>(
        &self,
        leading: &'v Value,
    ) -> Result<Option<&'v Value>, BindingError> {
        let first = &self.segments[0];
        let start = match &first.index {
            None => leading,
            Some(index) => match self.index_into(leading, first, index)? {
                Some(value) => value,
                None => return Ok(None),
            },
        };
        self.walk(start, &self.segments[1..])
    }

    /// Write a value at this path, creating intermediate maps as needed
    pub fn set(&self, root: &mut Value, value: Value) -> Result<(), BindingError> {
        let (last, parents) = self
            .segments
            .split_last()
            .ok_or_else(|| invalid(&self.raw, "empty path"))?;

        let mut current = root;
        for segment in parents {
            current = self.child_mut(current, segment)?;
        }

        if current.is_null() {
            *current = Value::Map(ValueMap::new());
        }
        let map = match current {
            Value::Map(map) => map,
            _ => return Err(self.no_such_property(last)),
        };

        match &last.index {
            None => {
                map.insert(last.name.clone(), value);
                Ok(())
            }
            Some(index) => {
                let collection = map
                    .get_mut(&last.name)
                    .ok_or_else(|| self.not_indexable(last))?;
                let slot = self.slot_mut(collection, last, index)?;
                *slot = value;
                Ok(())
            }
        }
    }

    fn walk<'v>(
        &self,
        start: &'v Value,
        segments: &[PathSegment],
    ) -> Result<Option<&'v Value>, BindingError> {
        let mut current = start;
        for segment in segments {
            match self.step(current, segment)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    fn step<'v>(
        &self,
        current: &'v Value,
        segment: &PathSegment,
    ) -> Result<Option<&'v Value>, BindingError> {
        let named = match current {
            Value::Null => return Ok(None),
            Value::Map(map) => match map.get(&segment.name) {
                Some(value) => value,
                None => return Ok(None),
            },
            _ => return Err(self.no_such_property(segment)),
        };

        match &segment.index {
            None => Ok(Some(named)),
            Some(index) => self.index_into(named, segment, index),
        }
    }

    fn index_into<'v>(
        &self,
        collection: &'v Value,
        segment: &PathSegment,
        index: &str,
    ) -> Result<Option<&'v Value>, BindingError> {
        match collection {
            Value::Null => Ok(None),
            Value::Map(map) => Ok(map.get(index)),
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                let position = self.parse_index(segment, index)?;
                items
                    .get(position)
                    .map(Some)
                    .ok_or_else(|| self.out_of_range(segment, position, items.len()))
            }
            _ => Err(self.not_indexable(segment)),
        }
    }

    fn child_mut<'v>(
        &self,
        current: &'v mut Value,
        segment: &PathSegment,
    ) -> Result<&'v mut Value, BindingError> {
        if current.is_null() {
            *current = Value::Map(ValueMap::new());
        }
        let map = match current {
            Value::Map(map) => map,
            _ => return Err(self.no_such_property(segment)),
        };

        match &segment.index {
            None => Ok(map.entry(segment.name.clone()).or_insert(Value::Null)),
            Some(index) => {
                let collection = map
                    .get_mut(&segment.name)
                    .ok_or_else(|| self.not_indexable(segment))?;
                self.slot_mut(collection, segment, index)
            }
        }
    }

    fn slot_mut<'v>(
        &self,
        collection: &'v mut Value,
        segment: &PathSegment,
        index: &str,
    ) -> Result<&'v mut Value, BindingError> {
        match collection {
            Value::Map(map) => Ok(map.entry(index.to_string()).or_insert(Value::Null)),
            Value::List(items) | Value::Array(items) => {
                let position = self.parse_index(segment, index)?;
                let len = items.len();
                items
                    .get_mut(position)
                    .ok_or_else(|| self.out_of_range(segment, position, len))
            }
            // sets have no positional slots
            _ => Err(self.not_indexable(segment)),
        }
    }

    fn parse_index(&self, segment: &PathSegment, index: &str) -> Result<usize, BindingError> {
        index.trim().parse().map_err(|_| BindingError::InvalidIndex {
            path: self.raw.clone(),
            property: segment.name.clone(),
            index: index.to_string(),
        })
    }

    fn no_such_property(&self, segment: &PathSegment) -> BindingError {
        BindingError::NoSuchProperty {
            path: self.raw.clone(),
            property: segment.name.clone(),
        }
    }

    fn not_indexable(&self, segment: &PathSegment) -> BindingError {
        BindingError::NotIndexable {
            path: self.raw.clone(),
            property: segment.name.clone(),
        }
    }

    fn out_of_range(&self, segment: &PathSegment, index: usize, len: usize) -> BindingError {
        BindingError::IndexOutOfRange {
            path: self.raw.clone(),
            property: segment.name.clone(),
            index,
            len,
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn parse_segment(path: &str, raw: &str) -> Result<PathSegment, BindingError> {
    let (name, index) = match raw.find('[') {
        Some(open) => {
            if !raw.ends_with(']') {
                return Err(invalid(path, "index must close the segment"));
            }
            let index = &raw[open + 1..raw.len() - 1];
            if index.is_empty() {
                return Err(invalid(path, "empty index"));
            }
            (&raw[..open], Some(index.to_string()))
        }
        None => (raw, None),
    };

    if name.is_empty() {
        return Err(invalid(path, "empty segment"));
    }

    Ok(PathSegment {
        name: name.to_string(),
        index,
    })
}

fn invalid(path: &str, reason: &str) -> BindingError {
    BindingError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(entries: Vec<(&str, Value)>) -> Value {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn parse_segments() {
        let path = PropertyPath::parse("order.items[0].sku").unwrap();
        assert_eq!(path.leading_name(), "order");
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.segments()[1].name, "items");
        assert_eq!(path.segments()[1].index.as_deref(), Some("0"));
    }

    #[test]
    fn leading_name_strips_index() {
        let path = PropertyPath::parse("ids[2]").unwrap();
        assert_eq!(path.leading_name(), "ids");
    }

    #[test]
    fn dots_inside_brackets_stay_in_index() {
        let path = PropertyPath::parse("attrs[a.b]").unwrap();
        assert_eq!(path.segments().len(), 1);
        assert_eq!(path.segments()[0].index.as_deref(), Some("a.b"));
    }

    #[test]
    fn parse_rejects_malformed_paths() {
        assert!(PropertyPath::parse("").is_err());
        assert!(PropertyPath::parse("a..b").is_err());
        assert!(PropertyPath::parse("a[0").is_err());
        assert!(PropertyPath::parse("a]").is_err());
        assert!(PropertyPath::parse("a[]").is_err());
        assert!(PropertyPath::parse("[0]").is_err());
    }

    #[test]
    fn get_navigates_maps_and_sequences() {
        let root = map(vec![(
            "order",
            map(vec![(
                "items",
                Value::List(vec![map(vec![("sku", Value::from("A-1"))])]),
            )]),
        )]);

        let path = PropertyPath::parse("order.items[0].sku").unwrap();
        assert_eq!(path.get(&root).unwrap(), Some(&Value::from("A-1")));

        let missing = PropertyPath::parse("order.customer.name").unwrap();
        assert_eq!(missing.get(&root).unwrap(), None);
    }

    #[test]
    fn get_through_scalar_fails() {
        let root = map(vec![("id", Value::Int(1))]);
        let path = PropertyPath::parse("id.value").unwrap();
        let err = path.get(&root).unwrap_err();
        assert!(matches!(err, BindingError::NoSuchProperty { .. }));
    }

    #[test]
    fn get_index_out_of_range_fails() {
        let root = map(vec![("ids", Value::Array(vec![Value::Int(1)]))]);
        let path = PropertyPath::parse("ids[3]").unwrap();
        assert!(matches!(
            path.get(&root).unwrap_err(),
            BindingError::IndexOutOfRange { index: 3, len: 1, .. }
        ));
    }

    #[test]
    fn set_creates_intermediate_maps() {
        let mut root = Value::Map(ValueMap::new());
        PropertyPath::parse("x.y")
            .unwrap()
            .set(&mut root, Value::Int(7))
            .unwrap();

        assert_eq!(root, map(vec![("x", map(vec![("y", Value::Int(7))]))]));
    }

    #[test]
    fn set_into_list_slot() {
        let mut root = map(vec![("ids", Value::List(vec![Value::Int(1), Value::Int(2)]))]);
        PropertyPath::parse("ids[1]")
            .unwrap()
            .set(&mut root, Value::Int(9))
            .unwrap();
        assert_eq!(
            PropertyPath::parse("ids").unwrap().get(&root).unwrap(),
            Some(&Value::List(vec![Value::Int(1), Value::Int(9)]))
        );
    }

    #[test]
    fn set_rejects_set_index_and_missing_collection() {
        let mut root = map(vec![("tags", Value::Set(vec![Value::from("a")]))]);
        let err = PropertyPath::parse("tags[0]")
            .unwrap()
            .set(&mut root, Value::Null)
            .unwrap_err();
        assert!(matches!(err, BindingError::NotIndexable { .. }));

        let err = PropertyPath::parse("missing[0]")
            .unwrap()
            .set(&mut root, Value::Null)
            .unwrap_err();
        assert!(matches!(err, BindingError::NotIndexable { .. }));
        assert!(root.as_map().unwrap().get("missing").is_none());
    }

    #[test]
    fn get_from_leading_applies_leading_index() {
        let leading = Value::List(vec![map(vec![("name", Value::from("a"))])]);
        let path = PropertyPath::parse("users[0].name").unwrap();
        assert_eq!(
            path.get_from_leading(&leading).unwrap(),
            Some(&Value::from("a"))
        );
    }
}
