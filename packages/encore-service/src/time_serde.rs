//! Wire formats for calendar fields: dates as `YYYY-MM-DD`, times as `HH:MM`.

pub mod date {
	use serde::{Deserialize, Deserializer, Serializer};
	use time::{Date, macros::format_description};

	pub fn serialize<S>(value: &Date, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let formatted = value
			.format(format_description!("[year]-[month]-[day]"))
			.map_err(serde::ser::Error::custom)?;

		serializer.serialize_str(&formatted)
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		Date::parse(&raw, format_description!("[year]-[month]-[day]"))
			.map_err(serde::de::Error::custom)
	}
}

pub mod option_time {
	use serde::{Deserialize, Deserializer, Serializer};
	use time::{Time, macros::format_description};

	pub fn serialize<S>(value: &Option<Time>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match value {
			Some(time) => {
				let formatted = time
					.format(format_description!("[hour]:[minute]"))
					.map_err(serde::ser::Error::custom)?;

				serializer.serialize_some(&formatted)
			},
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Time>, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw: Option<String> = Option::deserialize(deserializer)?;

		raw.map(|raw| {
			Time::parse(&raw, format_description!("[hour]:[minute]"))
				.map_err(serde::de::Error::custom)
		})
		.transpose()
	}
}
