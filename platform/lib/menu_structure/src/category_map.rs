use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Menu categories in the order they were first seen.
///
/// Serializes as a JSON object. Adding to a category that already exists
/// appends to it instead of creating a second entry, both when building the
/// map by hand and when deserializing an object with repeated keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap<T> {
	entries: Vec<(String, Vec<T>)>,
}

impl<T> Default for CategoryMap<T> {
	fn default() -> Self {
		Self { entries: Vec::new() }
	}
}

impl<T> CategoryMap<T> {
	pub fn new() -> Self {
		Self::default()
	}

	fn position(&self, category: &str) -> Option<usize> {
		self.entries.iter().position(|(name, _)| name == category)
	}

	pub fn push(&mut self, category: &str, item: T) {
		match self.position(category) {
			Some(idx) => self.entries[idx].1.push(item),
			None => self.entries.push((category.to_string(), vec![item])),
		}
	}

	/// Adds a whole category. An empty `items` still registers the category.
	pub fn extend_category(&mut self, category: String, items: Vec<T>) {
		match self.position(&category) {
			Some(idx) => self.entries[idx].1.extend(items),
			None => self.entries.push((category, items)),
		}
	}

	pub fn get(&self, category: &str) -> Option<&[T]> {
		self.position(category).map(|idx| self.entries[idx].1.as_slice())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn categories(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(name, _)| name.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
		self.entries.iter().map(|(name, items)| (name.as_str(), items.as_slice()))
	}

	pub fn items(&self) -> impl Iterator<Item = &T> {
		self.entries.iter().flat_map(|(_, items)| items.iter())
	}

	/// Rebuilds the map with every item transformed, keeping the order.
	pub fn map_items<U>(self, mut f: impl FnMut(&str, T) -> U) -> CategoryMap<U> {
		CategoryMap {
			entries: self
				.entries
				.into_iter()
				.map(|(name, items)| {
					let items = items.into_iter().map(|item| f(&name, item)).collect();
					(name, items)
				})
				.collect(),
		}
	}
}

impl<T> IntoIterator for CategoryMap<T> {
	type IntoIter = std::vec::IntoIter<(String, Vec<T>)>;
	type Item = (String, Vec<T>);

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

impl<T> FromIterator<(String, Vec<T>)> for CategoryMap<T> {
	fn from_iter<I: IntoIterator<Item = (String, Vec<T>)>>(iter: I) -> Self {
		let mut map = Self::new();
		for (category, items) in iter {
			map.extend_category(category, items);
		}
		map
	}
}

impl<T: Serialize> Serialize for CategoryMap<T> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (name, items) in &self.entries {
			map.serialize_entry(name, items)?;
		}
		map.end()
	}
}

struct CategoryMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for CategoryMapVisitor<T> {
	type Value = CategoryMap<T>;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a map of category names to lists of items")
	}

	fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
		let mut map = CategoryMap::new();
		while let Some((category, items)) = access.next_entry::<String, Vec<T>>()? {
			map.extend_category(category, items);
		}
		Ok(map)
	}
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for CategoryMap<T> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_map(CategoryMapVisitor(PhantomData))
	}
}
