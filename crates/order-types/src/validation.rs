//! Configuration validation for pluggable implementations.
//!
//! Backends describe the TOML table they accept as a [`Schema`] of required
//! and optional [`Field`]s. The schema is checked before a backend is built so
//! that a typo in a config file surfaces as a precise error at startup.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// Error that occurs when a required field is missing.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// Error that occurs when a field has an invalid value.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// Error that occurs when field type is incorrect.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
	/// Error that occurs when a field is not part of the schema.
	#[error("Unknown field: {0}")]
	UnknownField(String),
}

/// The type a configuration field must have.
#[derive(Debug)]
pub enum FieldType {
	String,
	/// An integer with optional inclusive bounds.
	Integer { min: Option<i64>, max: Option<i64> },
	Boolean,
	/// An array whose elements all have the inner type.
	Array(Box<FieldType>),
}

/// Custom check run after the type check passed.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A named field in a configuration schema.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Attaches a custom validator that runs after the type check.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		check_type(&self.name, value, &self.field_type)?;
		if let Some(validator) = &self.validator {
			validator(value).map_err(|message| ValidationError::InvalidValue {
				field: self.name.clone(),
				message,
			})?;
		}
		Ok(())
	}
}

/// Validation schema for one TOML table.
///
/// Keys that are neither required nor optional are rejected.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML value against this schema.
	///
	/// # Errors
	///
	/// Returns an error if the value is not a table, a required field is
	/// missing, a field has the wrong type or fails its validator, or the
	/// table contains a key the schema does not know.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			field.check(value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(value)?;
			}
		}

		for key in table.keys() {
			let known = self
				.required
				.iter()
				.chain(self.optional.iter())
				.any(|field| &field.name == key);
			if !known {
				return Err(ValidationError::UnknownField(key.clone()));
			}
		}

		Ok(())
	}
}

fn type_mismatch(field: &str, expected: &str, value: &toml::Value) -> ValidationError {
	ValidationError::TypeMismatch {
		field: field.to_string(),
		expected: expected.to_string(),
		actual: value.type_str().to_string(),
	}
}

fn check_type(
	field_name: &str,
	value: &toml::Value,
	expected_type: &FieldType,
) -> Result<(), ValidationError> {
	match expected_type {
		FieldType::String if !value.is_str() => Err(type_mismatch(field_name, "string", value)),
		FieldType::Boolean if !value.is_bool() => Err(type_mismatch(field_name, "boolean", value)),
		FieldType::String | FieldType::Boolean => Ok(()),
		FieldType::Integer { min, max } => {
			let int_val = value
				.as_integer()
				.ok_or_else(|| type_mismatch(field_name, "integer", value))?;

			if let Some(min_val) = min.filter(|min_val| int_val < *min_val) {
				return Err(ValidationError::InvalidValue {
					field: field_name.to_string(),
					message: format!("Value {} is less than minimum {}", int_val, min_val),
				});
			}
			if let Some(max_val) = max.filter(|max_val| int_val > *max_val) {
				return Err(ValidationError::InvalidValue {
					field: field_name.to_string(),
					message: format!("Value {} is greater than maximum {}", int_val, max_val),
				});
			}
			Ok(())
		},
		FieldType::Array(inner_type) => {
			let array = value
				.as_array()
				.ok_or_else(|| type_mismatch(field_name, "array", value))?;
			for (i, item) in array.iter().enumerate() {
				check_type(&format!("{}[{}]", field_name, i), item, inner_type)?;
			}
			Ok(())
		},
	}
}

/// A configuration schema that can validate TOML values.
///
/// Every storage backend returns one of these so its table can be validated
/// without constructing the backend.
#[async_trait]
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(input: &str) -> toml::Value {
		toml::from_str(input).unwrap()
	}

	fn file_like_schema() -> Schema {
		Schema::new(
			vec![Field::new("storage_path", FieldType::String)],
			vec![Field::new(
				"retries",
				FieldType::Integer {
					min: Some(0),
					max: Some(10),
				},
			)],
		)
	}

	#[test]
	fn test_valid_table() {
		let config = parse(
			r#"
			storage_path = "./data"
			retries = 3
			"#,
		);
		assert!(file_like_schema().validate(&config).is_ok());
	}

	#[test]
	fn test_missing_required_field() {
		let result = file_like_schema().validate(&parse("retries = 1"));
		assert!(matches!(result, Err(ValidationError::MissingField(f)) if f == "storage_path"));
	}

	#[test]
	fn test_type_mismatch() {
		let result = file_like_schema().validate(&parse("storage_path = 5"));
		assert!(matches!(result, Err(ValidationError::TypeMismatch { .. })));
	}

	#[test]
	fn test_integer_bounds() {
		let result = file_like_schema().validate(&parse(
			r#"
			storage_path = "./data"
			retries = 11
			"#,
		));
		assert!(matches!(result, Err(ValidationError::InvalidValue { .. })));
	}

	#[test]
	fn test_unknown_field() {
		let result = file_like_schema().validate(&parse(
			r#"
			storage_path = "./data"
			ttl_orders = 60
			"#,
		));
		assert!(matches!(result, Err(ValidationError::UnknownField(f)) if f == "ttl_orders"));
	}

	#[test]
	fn test_array_elements_checked() {
		let schema = Schema::new(
			vec![],
			vec![Field::new("hosts", FieldType::Array(Box::new(FieldType::String)))],
		);
		let result = schema.validate(&parse(r#"hosts = ["a", 1]"#));
		assert!(
			matches!(result, Err(ValidationError::TypeMismatch { field, .. }) if field == "hosts[1]")
		);
	}

	#[test]
	fn test_custom_validator() {
		let schema = Schema::new(
			vec![Field::new("storage_path", FieldType::String).with_validator(|v| {
				match v.as_str() {
					Some("") => Err("must not be empty".to_string()),
					_ => Ok(()),
				}
			})],
			vec![],
		);
		let result = schema.validate(&parse(r#"storage_path = """#));
		assert!(matches!(result, Err(ValidationError::InvalidValue { .. })));
	}
}
