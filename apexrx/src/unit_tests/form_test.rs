use crate::unit_tests::{field, Field};
use crate::{ApexForm, FormError, FormErrors, SubmitOutcome};

fn field_form() -> ApexForm {
    ApexForm::new([("id", "Id"), ("label", "Label"), ("helpText", "Help text")])
}

fn require_label(values: &crate::FormValues) -> FormErrors {
    let mut errors = FormErrors::new();
    if values.get("label").unwrap_or_default().trim().is_empty() {
        errors.insert("label".to_string(), "Label is required".to_string());
    }
    errors
}

#[test]
fn test_fields_follow_label_order_with_empty_values() {
    let form = field_form();
    let fields = form.fields();

    let keys: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, vec!["id", "label", "helpText"]);
    assert_eq!(fields[2].label, "Help text");
    assert!(fields.iter().all(|f| f.value.is_empty() && f.error.is_none()));
}

#[test]
fn test_submit_without_validator_accepts_everything() {
    let mut form = field_form();

    let outcome = form.submit(|values| values.clone());
    match outcome {
        SubmitOutcome::Submitted(values) => {
            assert_eq!(values.len(), 3);
            assert_eq!(values.get("id"), Some(""));
        }
        SubmitOutcome::Invalid(errors) => panic!("unexpected errors: {errors:?}"),
    }
    assert_eq!(form.submit_count(), 1);
}

#[test]
fn test_error_shown_only_when_touched() {
    let mut form = field_form().with_validator(require_label);
    assert!(!form.is_valid());
    assert!(form.fields().iter().all(|f| f.error.is_none()));

    form.touch("label").unwrap();
    let label = form.fields().into_iter().find(|f| f.key == "label").unwrap();
    assert_eq!(label.error.as_deref(), Some("Label is required"));

    form.set_value("label", "Name").unwrap();
    let label = form.fields().into_iter().find(|f| f.key == "label").unwrap();
    assert!(label.error.is_none());
    assert!(form.is_valid());
}

#[test]
fn test_invalid_submit_skips_handler_and_touches_all() {
    let mut form = field_form().with_validator(require_label);
    let mut called = false;

    let outcome = form.submit(|_| called = true);

    assert!(!called);
    assert!(matches!(outcome, SubmitOutcome::Invalid(ref errors) if errors.contains_key("label")));
    assert!(form.is_touched("id") && form.is_touched("helpText"));
}

#[test]
fn test_unknown_field_is_rejected() {
    let mut form = field_form();
    assert_eq!(
        form.set_value("color", "red"),
        Err(FormError::UnknownField("color".to_string()))
    );
    assert!(form.touch("color").is_err());
}

#[test]
fn test_values_parse_into_entity() {
    let mut form = field_form();
    form.set_value("id", "f1").unwrap();
    form.set_value("label", "Name").unwrap();
    form.set_value("helpText", "Your name").unwrap();

    let parsed: Field = form.values().parse().unwrap();
    assert_eq!(parsed, field("f1", "Name", "Your name"));
}

#[test]
fn test_reset_clears_values_and_touched() {
    let mut form = field_form();
    form.set_value("id", "x").unwrap();
    form.touch("id").unwrap();
    form.submit(|_| ());

    form.reset();

    assert_eq!(form.values().get("id"), Some(""));
    assert!(!form.is_touched("id"));
    assert_eq!(form.submit_count(), 0);
}
