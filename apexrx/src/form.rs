use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use thiserror::Error;

/// Field key to error message, for fields that currently fail validation.
pub type FormErrors = IndexMap<String, String>;

pub type Validator = Arc<dyn Fn(&FormValues) -> FormErrors + Send + Sync>;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    #[error("form has no field '{0}'")]
    UnknownField(String),
}

/// Current text of every field, in label order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormValues(IndexMap<String, String>);

impl FormValues {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads the values as a typed record whose fields are all strings on the wire.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::to_value(&self.0).and_then(serde_json::from_value)
    }
}

/// One rendered text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub value: String,
    /// Only set once the field was touched and while it fails validation.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R> {
    Submitted(R),
    Invalid(FormErrors),
}

/// A text form generated from a label map.
///
/// Validation is whatever the caller installs with [`ApexForm::with_validator`];
/// without one every submission is accepted.
#[derive(Clone)]
pub struct ApexForm {
    labels: IndexMap<String, String>,
    values: FormValues,
    touched: HashSet<String>,
    errors: FormErrors,
    validator: Option<Validator>,
    submit_count: u32,
}

impl Debug for ApexForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApexForm")
            .field("labels", &self.labels)
            .field("values", &self.values)
            .field("touched", &self.touched)
            .field("errors", &self.errors)
            .field("submit_count", &self.submit_count)
            .finish()
    }
}

impl ApexForm {
    pub fn new<I, K, L>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        let labels: IndexMap<String, String> = labels
            .into_iter()
            .map(|(key, label)| (key.into(), label.into()))
            .collect();
        let values = FormValues(
            labels
                .keys()
                .map(|key| (key.clone(), String::new()))
                .collect(),
        );
        Self {
            labels,
            values,
            touched: HashSet::new(),
            errors: FormErrors::new(),
            validator: None,
            submit_count: 0,
        }
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&FormValues) -> FormErrors + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self.validate();
        self
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<(), FormError> {
        let slot = self
            .values
            .0
            .get_mut(key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        *slot = value.into();
        self.validate();
        Ok(())
    }

    /// Marks a field as interacted with (the blur of a text input).
    pub fn touch(&mut self, key: &str) -> Result<(), FormError> {
        if !self.labels.contains_key(key) {
            return Err(FormError::UnknownField(key.to_string()));
        }
        self.touched.insert(key.to_string());
        self.validate();
        Ok(())
    }

    pub fn is_touched(&self, key: &str) -> bool {
        self.touched.contains(key)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    pub fn fields(&self) -> Vec<FormField> {
        self.labels
            .iter()
            .map(|(key, label)| FormField {
                key: key.clone(),
                label: label.clone(),
                value: self.values.get(key).unwrap_or_default().to_string(),
                error: self
                    .touched
                    .contains(key)
                    .then(|| self.errors.get(key).cloned())
                    .flatten(),
            })
            .collect()
    }

    /// Touches every field and validates. The handler runs only when nothing fails.
    pub fn submit<R, F>(&mut self, handler: F) -> SubmitOutcome<R>
    where
        F: FnOnce(&FormValues) -> R,
    {
        self.submit_count += 1;
        self.touched.extend(self.labels.keys().cloned());
        self.validate();
        if self.errors.is_empty() {
            SubmitOutcome::Submitted(handler(&self.values))
        } else {
            SubmitOutcome::Invalid(self.errors.clone())
        }
    }

    /// Back to empty values, nothing touched.
    pub fn reset(&mut self) {
        for value in self.values.0.values_mut() {
            value.clear();
        }
        self.touched.clear();
        self.submit_count = 0;
        self.validate();
    }

    fn validate(&mut self) {
        self.errors = match &self.validator {
            Some(validator) => validator(&self.values),
            None => FormErrors::new(),
        };
    }
}
