use serde_json::Value;

use crate::domain::{Fields, Model, ModelType, ProjectionError, Property};

/// A model backed by a JSON document.
///
/// Object members become fields in document order. Nested objects are
/// projected recursively and arrays become sequences.
#[derive(Debug, Clone)]
pub struct JsonModel<'v> {
    model_type: ModelType,
    value: &'v Value,
    excluded: &'v [String],
}

impl<'v> JsonModel<'v> {
    /// Wraps a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is `null`.
    pub fn new(model_type: ModelType, value: &'v Value) -> Result<Self, ProjectionError> {
        if value.is_null() {
            return Err(ProjectionError::MissingModel(model_type));
        }
        Ok(Self {
            model_type,
            value,
            excluded: &[],
        })
    }

    /// Marks the named top-level members as no-output.
    ///
    /// Members of nested objects are unaffected, even when they share a name.
    #[must_use]
    pub const fn excluding(mut self, names: &'v [String]) -> Self {
        self.excluded = names;
        self
    }

    fn nested(&self, key: &str, value: &'v Value) -> Self {
        Self {
            model_type: ModelType::named(format!("{}.{key}", self.model_type)),
            value,
            excluded: &[],
        }
    }

    fn property(&self, key: &str, value: &'v Value) -> Property<'v> {
        match value {
            Value::Null => Property::Null,
            Value::Bool(b) => (*b).into(),
            Value::Number(number) => number
                .as_i64()
                .map(Property::from)
                .or_else(|| number.as_u64().map(Property::from))
                .or_else(|| number.as_f64().map(Property::from))
                .unwrap_or(Property::Null),
            Value::String(text) => text.into(),
            Value::Array(items) => Property::Sequence(
                items
                    .iter()
                    .map(|item| self.property(key, item))
                    .collect(),
            ),
            Value::Object(_) => Property::object(self.nested(key, value)),
        }
    }
}

impl Model for JsonModel<'_> {
    fn describe<'a>(&'a self, fields: &mut Fields<'a>) {
        if let Value::Object(members) = self.value {
            for (key, value) in members {
                let property = self.property(key, value);
                if self.excluded.iter().any(|name| name == key) {
                    fields.excluded(key.as_str(), property);
                } else {
                    fields.field(key.as_str(), property);
                }
            }
        }
    }

    fn model_type(&self) -> ModelType {
        self.model_type.clone()
    }

    fn is_collection(&self) -> bool {
        self.value.is_array()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{ModelProjector, Value as PropertyValue};

    #[test]
    fn null_model_is_missing() {
        let error = JsonModel::new(ModelType::named("order"), &Value::Null).unwrap_err();
        assert_eq!(error, ProjectionError::MissingModel(ModelType::named("order")));
        assert_eq!(error.kind(), crate::domain::ErrorKind::Missing);
    }

    #[test]
    fn array_model_is_a_collection() {
        let value = json!([{"id": 1}]);
        let model = JsonModel::new(ModelType::named("orders"), &value).unwrap();
        assert!(matches!(
            ModelProjector::new().project(&model),
            Err(ProjectionError::Collection(_))
        ));
    }

    #[test]
    fn members_project_in_document_order() {
        let value = json!({
            "Zeta": 1,
            "Alpha": "a",
            "Big": u64::MAX,
            "Ratio": 0.5,
            "Gone": null,
            "Tags": ["x", "y"],
            "Address": {"Street": "High St"},
        });
        let model = JsonModel::new(ModelType::named("order"), &value).unwrap();
        let map = ModelProjector::new().project(&model).unwrap();

        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec!["Zeta", "Alpha", "Big", "Ratio", "Gone", "Tags", "Address"]
        );
        assert_eq!(map.get("Zeta"), Some(&PropertyValue::Int(1)));
        assert_eq!(map.get("Big"), Some(&PropertyValue::UInt(u64::MAX)));
        assert_eq!(map.get("Ratio"), Some(&PropertyValue::Float(0.5)));
        assert_eq!(map.get("Gone"), Some(&PropertyValue::Null));
        assert_eq!(
            map.get("Tags"),
            Some(&PropertyValue::List(vec![
                PropertyValue::Text("x".to_string()),
                PropertyValue::Text("y".to_string()),
            ]))
        );
        let address = map.get("Address").and_then(PropertyValue::as_map).unwrap();
        assert_eq!(
            address.get("Street"),
            Some(&PropertyValue::Text("High St".to_string()))
        );
    }

    #[test]
    fn exclusions_apply_to_top_level_members_only() {
        let value = json!({
            "Name": "Ann",
            "Address": {"Name": "home", "Street": "High St"},
        });
        let excluded = vec!["Name".to_string()];
        let model = JsonModel::new(ModelType::named("customer"), &value)
            .unwrap()
            .excluding(&excluded);
        let map = ModelProjector::new().project(&model).unwrap();

        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["Address"]);
        let address = map.get("Address").and_then(PropertyValue::as_map).unwrap();
        assert_eq!(
            address.get("Name"),
            Some(&PropertyValue::Text("home".to_string()))
        );
    }

    #[test]
    fn model_type_is_as_given() {
        let value = json!({});
        let model = JsonModel::new(ModelType::named("order"), &value).unwrap();
        assert_eq!(model.model_type().as_str(), "order");
    }
}
