//! Tool specification types.
//!
//! Defines the inputs of a tool, the JSON Schema advertised for them and the
//! validation applied to call arguments.

use serde::{Deserialize, Serialize};

/// Specification for a tool's interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Input parameters for the tool.
    pub inputs: Vec<ToolInput>,
}

impl ToolSpec {
    /// Create a new empty tool spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input parameter.
    pub fn with_input(mut self, input: ToolInput) -> Self {
        self.inputs.push(input);
        self
    }

    /// Generate JSON Schema from inputs.
    pub fn generate_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for input in &self.inputs {
            properties.insert(input.name.clone(), input.to_schema());
            if input.required {
                required.push(serde_json::Value::String(input.name.clone()));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }

    /// Fill in missing optional inputs that declare a default.
    ///
    /// Non-object values are left untouched; `validate_inputs` rejects them.
    pub fn apply_defaults(&self, values: &mut serde_json::Value) {
        let Some(obj) = values.as_object_mut() else {
            return;
        };

        for input in &self.inputs {
            let Some(default) = &input.default else {
                continue;
            };
            if obj.get(&input.name).is_none_or(serde_json::Value::is_null) {
                obj.insert(input.name.clone(), default.clone());
            }
        }
    }

    /// Validate input values against the spec.
    pub fn validate_inputs(&self, values: &serde_json::Value) -> Result<(), String> {
        let obj = values
            .as_object()
            .ok_or_else(|| "Input must be an object".to_string())?;

        for input in &self.inputs {
            match obj.get(&input.name) {
                Some(value) => input.validate(value)?,
                None if input.required => {
                    return Err(format!("Missing required input: {}", input.name));
                }
                None => {}
            }
        }

        Ok(())
    }
}

/// An input parameter for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInput {
    /// Parameter name.
    pub name: String,

    /// Data type.
    pub data_type: DataType,

    /// Description of the parameter.
    pub description: String,

    /// Whether the parameter is required.
    pub required: bool,

    /// Default value (if not required).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Validation constraints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<InputConstraints>,
}

impl ToolInput {
    /// Create a new required input parameter.
    pub fn required(
        name: impl Into<String>,
        data_type: DataType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: description.into(),
            required: true,
            default: None,
            constraints: None,
        }
    }

    /// Create a new optional input parameter.
    pub fn optional(
        name: impl Into<String>,
        data_type: DataType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: description.into(),
            required: false,
            default: None,
            constraints: None,
        }
    }

    /// Set a default value.
    pub fn with_default(mut self, default: impl Into<serde_json::Value>) -> Self {
        self.default = Some(default.into());
        self.required = false;
        self
    }

    /// Add constraints.
    pub fn with_constraints(mut self, constraints: InputConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    /// Convert to JSON Schema.
    pub fn to_schema(&self) -> serde_json::Value {
        let mut schema = serde_json::json!({
            "type": self.data_type.to_json_type(),
            "description": self.description
        });

        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }

        if let Some(constraints) = &self.constraints {
            constraints.apply_to_schema(&mut schema);
        }

        schema
    }

    /// Validate a value against this input's type and constraints.
    pub fn validate(&self, value: &serde_json::Value) -> Result<(), String> {
        if !self.data_type.matches(value) {
            return Err(format!(
                "Invalid type for {}: expected {}",
                self.name,
                self.data_type.to_json_type()
            ));
        }

        if let Some(constraints) = &self.constraints {
            constraints.validate(value, &self.name)?;
        }

        Ok(())
    }
}

/// Data types for tool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl DataType {
    /// Convert to JSON Schema type string.
    pub fn to_json_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Whether a JSON value has this type.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

/// Constraints for input validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConstraints {
    /// Minimum value (for numbers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Maximum value (for numbers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Minimum length (for strings).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Maximum length (for strings).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Enumeration of allowed values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

impl InputConstraints {
    /// Create constraints for a numeric range.
    pub fn range(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Default::default()
        }
    }

    /// Create constraints for a numeric lower bound.
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            ..Default::default()
        }
    }

    /// Create constraints for string length.
    pub fn length(min: usize, max: usize) -> Self {
        Self {
            min_length: Some(min),
            max_length: Some(max),
            ..Default::default()
        }
    }

    /// Create constraints requiring a non-empty string.
    pub fn non_empty() -> Self {
        Self {
            min_length: Some(1),
            ..Default::default()
        }
    }

    /// Create constraints from an enum of allowed values.
    pub fn enum_of(values: Vec<serde_json::Value>) -> Self {
        Self {
            enum_values: Some(values),
            ..Default::default()
        }
    }

    /// Apply constraints to a JSON Schema object.
    pub fn apply_to_schema(&self, schema: &mut serde_json::Value) {
        if let Some(min) = self.min {
            schema["minimum"] = serde_json::json!(min);
        }
        if let Some(max) = self.max {
            schema["maximum"] = serde_json::json!(max);
        }
        if let Some(min_len) = self.min_length {
            schema["minLength"] = serde_json::json!(min_len);
        }
        if let Some(max_len) = self.max_length {
            schema["maxLength"] = serde_json::json!(max_len);
        }
        if let Some(enum_vals) = &self.enum_values {
            schema["enum"] = serde_json::json!(enum_vals);
        }
    }

    /// Validate a value against these constraints.
    pub fn validate(&self, value: &serde_json::Value, name: &str) -> Result<(), String> {
        if let Some(num) = value.as_f64() {
            if let Some(min) = self.min.filter(|min| num < *min) {
                return Err(format!("{name}: value {num} is less than minimum {min}"));
            }
            if let Some(max) = self.max.filter(|max| num > *max) {
                return Err(format!("{name}: value {num} is greater than maximum {max}"));
            }
        }

        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if let Some(min) = self.min_length.filter(|min| len < *min) {
                return Err(format!("{name}: string length {len} is less than {min}"));
            }
            if let Some(max) = self.max_length.filter(|max| len > *max) {
                return Err(format!("{name}: string length {len} is greater than {max}"));
            }
        }

        if self
            .enum_values
            .as_ref()
            .is_some_and(|allowed| !allowed.contains(value))
        {
            return Err(format!("{name}: value not in allowed enum"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn search_spec() -> ToolSpec {
        ToolSpec::new()
            .with_input(
                ToolInput::required("query", DataType::String, "Search text")
                    .with_constraints(InputConstraints::non_empty()),
            )
            .with_input(
                ToolInput::optional("k", DataType::Integer, "Result count")
                    .with_default(5)
                    .with_constraints(InputConstraints::at_least(0.0)),
            )
    }

    #[test]
    fn test_tool_spec_schema_generation() {
        let schema = search_spec().generate_schema();

        assert_eq!(
            schema,
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search text",
                        "minLength": 1
                    },
                    "k": {
                        "type": "integer",
                        "description": "Result count",
                        "default": 5,
                        "minimum": 0.0
                    }
                },
                "required": ["query"]
            })
        );
    }

    #[test]
    fn test_input_validation() {
        let input = ToolInput::required("count", DataType::Integer, "Count")
            .with_constraints(InputConstraints::range(0.0, 100.0));

        assert!(input.validate(&serde_json::json!(50)).is_ok());
        assert!(input.validate(&serde_json::json!(150)).is_err());
        assert!(input.validate(&serde_json::json!(-1)).is_err());
        assert!(input.validate(&serde_json::json!(2.5)).is_err());
        assert!(input.validate(&serde_json::json!("not a number")).is_err());
    }

    #[test]
    fn test_validate_inputs() {
        let spec = search_spec();

        assert!(spec.validate_inputs(&serde_json::json!({ "query": "red dress" })).is_ok());
        assert_eq!(
            spec.validate_inputs(&serde_json::json!({ "k": 3 })),
            Err("Missing required input: query".to_string())
        );
        assert_eq!(
            spec.validate_inputs(&serde_json::json!({ "query": "" })),
            Err("query: string length 0 is less than 1".to_string())
        );
        assert_eq!(
            spec.validate_inputs(&serde_json::json!(["query"])),
            Err("Input must be an object".to_string())
        );
    }

    #[test]
    fn test_apply_defaults() {
        let spec = search_spec();

        let mut missing = serde_json::json!({ "query": "jeans" });
        spec.apply_defaults(&mut missing);
        assert_eq!(missing, serde_json::json!({ "query": "jeans", "k": 5 }));

        let mut null = serde_json::json!({ "query": "jeans", "k": null });
        spec.apply_defaults(&mut null);
        assert_eq!(null["k"], serde_json::json!(5));

        let mut given = serde_json::json!({ "query": "jeans", "k": 2 });
        spec.apply_defaults(&mut given);
        assert_eq!(given["k"], serde_json::json!(2));
    }

    #[test]
    fn test_enum_constraint() {
        let input = ToolInput::required("transport", DataType::String, "Transport")
            .with_constraints(InputConstraints::enum_of(vec![
                serde_json::json!("stdio"),
                serde_json::json!("http"),
            ]));

        assert!(input.validate(&serde_json::json!("http")).is_ok());
        assert!(input.validate(&serde_json::json!("sse")).is_err());
    }
}
