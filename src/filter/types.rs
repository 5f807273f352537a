use serde_json::Value;

/// API field name to database column name
pub type FieldMappings = &'static [(&'static str, &'static str)];

/// Ordered set of field filters. Conditions are generated in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterData {
    fields: Vec<(String, Value)>,
}

impl FilterData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter; `None`, JSON null and empty strings are kept out of the set
    pub fn with<V: Into<Value>>(mut self, field: impl Into<String>, value: Option<V>) -> Self {
        self.push(field, value);
        self
    }

    pub fn push<V: Into<Value>>(&mut self, field: impl Into<String>, value: Option<V>) {
        let Some(value) = value else { return };
        match value.into() {
            Value::Null => {}
            Value::String(s) if s.is_empty() => {}
            value => self.fields.push((field.into(), value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FilterData {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut data = FilterData::new();
        for (k, v) in iter {
            data.push(k, Some(v));
        }
        data
    }
}

/// SQL text plus positional parameters, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

impl SqlResult {
    pub fn new(query: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn none_and_null_values_are_skipped() {
        let data = FilterData::new()
            .with("name", Some("acme"))
            .with("abbr", None::<String>)
            .with("logo_path", Some(Value::Null))
            .with("id", Some(3));
        let collected: Vec<_> = data.iter().collect();
        assert_eq!(collected, vec![("name", &json!("acme")), ("id", &json!(3))]);
    }

    #[test]
    fn empty_strings_are_skipped() {
        let data = FilterData::new()
            .with("name", Some(""))
            .with("abbr", Some(String::new()))
            .with("title", Some(" "));
        let collected: Vec<_> = data.iter().collect();
        assert_eq!(collected, vec![("title", &json!(" "))]);

        let data: FilterData = vec![("name", json!(""))].into_iter().collect();
        assert!(data.is_empty());
    }

    #[test]
    fn collects_in_order() {
        let data: FilterData = vec![("b", json!(1)), ("a", json!("x"))].into_iter().collect();
        let keys: Vec<_> = data.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
