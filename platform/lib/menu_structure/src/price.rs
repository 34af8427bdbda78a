use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A menu price, always held at two decimal places.
///
/// Deserializes from a JSON number or from a string that contains a number
/// somewhere in it (`"$12.99 (450-600 cal)"` reads as `12.99`). Serializes as
/// a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
	pub const SCALE: u32 = 2;

	pub fn new(amount: Decimal) -> Self {
		Self(amount.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero))
	}

	pub fn amount(&self) -> Decimal {
		self.0
	}

	/// Pulls the first number out of free text, ignoring currency symbols and
	/// anything after it.
	pub fn extract(text: &str) -> Option<Self> {
		let token = first_numeric_token(text)?;
		Decimal::from_str(&token).ok().map(Self::new)
	}
}

impl From<Decimal> for Price {
	fn from(amount: Decimal) -> Self {
		Self::new(amount)
	}
}

impl fmt::Display for Price {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:.2}", self.0)
	}
}

/// The first number in `text` with thousands separators removed, so
/// `"$1,250.00"` reads as `1250.00`. A comma only counts as a separator when
/// it sits between a digit and a group of exactly three digits.
fn first_numeric_token(text: &str) -> Option<String> {
	let bytes = text.as_bytes();
	let start = bytes.iter().position(u8::is_ascii_digit)?;

	let mut token = String::new();
	let mut end = start;
	loop {
		while end < bytes.len() && bytes[end].is_ascii_digit() {
			token.push(bytes[end] as char);
			end += 1;
		}

		if bytes.get(end) == Some(&b',') && is_digit_group(&bytes[end + 1..]) {
			end += 1;
		} else {
			break;
		}
	}

	if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
		token.push('.');
		end += 1;
		while end < bytes.len() && bytes[end].is_ascii_digit() {
			token.push(bytes[end] as char);
			end += 1;
		}
	}

	Some(token)
}

fn is_digit_group(rest: &[u8]) -> bool {
	rest.len() >= 3 && rest[..3].iter().all(u8::is_ascii_digit) && rest.get(3).map_or(true, |b| !b.is_ascii_digit())
}

impl Serialize for Price {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self.0.to_f64() {
			Some(value) => serializer.serialize_f64(value),
			None => Err(serde::ser::Error::custom("price out of range")),
		}
	}
}

struct PriceVisitor;

impl<'de> Visitor<'de> for PriceVisitor {
	type Value = Price;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a price as a number or a string containing a number")
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
		Ok(Price::new(Decimal::from(v)))
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
		Ok(Price::new(Decimal::from(v)))
	}

	fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
		Decimal::from_f64(v)
			.map(Price::new)
			.ok_or_else(|| E::invalid_value(Unexpected::Float(v), &self))
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
		Price::extract(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
	}
}

impl<'de> Deserialize<'de> for Price {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(PriceVisitor)
	}
}

/// For `Option<Price>` fields: `null`, a missing key and a blank string all
/// mean "no price".
pub(crate) fn optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Price>, D::Error> {
	struct OptionalPriceVisitor;

	impl<'de> Visitor<'de> for OptionalPriceVisitor {
		type Value = Option<Price>;

		fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
			PriceVisitor.expecting(formatter)
		}

		fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
			Ok(None)
		}

		fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
			Ok(None)
		}

		fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
			deserializer.deserialize_any(self)
		}

		fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
			PriceVisitor.visit_u64(v).map(Some)
		}

		fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
			PriceVisitor.visit_i64(v).map(Some)
		}

		fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
			PriceVisitor.visit_f64(v).map(Some)
		}

		fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
			if v.trim().is_empty() {
				return Ok(None);
			}
			PriceVisitor.visit_str(v).map(Some)
		}
	}

	deserializer.deserialize_option(OptionalPriceVisitor)
}
