use pretty_assertions::assert_eq;
use validata::prelude::*;

fn lowercase() -> Hook {
    Hook::map(|v| match v {
        Value::String(s) => Value::String(s.to_lowercase()),
        other => other,
    })
}

#[test]
fn before_mutation_is_visible_to_rules() {
    let spec = FieldSpec::builder()
        .before(lowercase())
        .rules(RuleSet::builder().regex("^[a-z]+$").build().unwrap())
        .build();
    assert_eq!(spec.validate(Value::from("ABC")), Ok(Value::from("abc")));
}

#[test]
fn before_false_short_circuits() {
    let spec = FieldSpec::builder()
        .before(Hook::new(|_| false))
        .rules(RuleSet::builder().callback(|_| panic!("rules must not run")).build().unwrap())
        .after(Hook::new(|_| panic!("after must not run")))
        .build();
    let err = spec.validate(Value::from("x")).unwrap_err();
    assert_eq!(err.check, Check::CallbackBefore);
    assert_eq!(err.check.to_string(), "callback before");
}

#[test]
fn trim_then_empty_check() {
    let spec = FieldSpec::builder().trim(true).build();
    assert_eq!(spec.validate(Value::from("   ")).unwrap_err().check, Check::Mandatory);

    let optional = FieldSpec::builder().trim(true).optional(true).build();
    assert_eq!(optional.validate(Value::from("   ")), Ok(Value::Null));

    let defaulted = FieldSpec::builder().trim(true).default("none").build();
    assert_eq!(defaulted.validate(Value::from("   ")), Ok(Value::from("none")));
}

#[test]
fn optional_null_stays_null() {
    let spec = FieldSpec::builder()
        .optional(true)
        .rules(RuleSet::builder().types([TypeTag::Integer]).build().unwrap())
        .build();
    assert_eq!(spec.validate(Value::Null), Ok(Value::Null));
}

#[test]
fn default_is_trusted() {
    let spec = FieldSpec::builder()
        .default(Value::from(vec![1, 2, 3]))
        .rules(RuleSet::builder().types([TypeTag::String]).build().unwrap())
        .build();
    assert_eq!(spec.validate(Value::Null), Ok(Value::from(vec![1, 2, 3])));
    assert_eq!(spec.validate(Value::Int(1)).unwrap_err().check, Check::Types);
}

#[test]
fn after_sees_validated_value() {
    let spec = FieldSpec::builder()
        .rules(RuleSet::builder().max_length(30).build().unwrap())
        .after(Hook::map(|v| match v {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        }))
        .build();
    assert_eq!(spec.validate(Value::from("Jane")), Ok(Value::from("JANE")));
}

#[test]
fn validate_ex_message() {
    let spec = FieldSpec::builder().build();
    let err = spec.validate_ex(Value::Null).unwrap_err();
    assert_eq!(err.to_string(), "Failed validation \"mandatory\" for null value");
    assert_eq!(err.name(), None);
}

#[test]
fn config_with_explicit_validation() {
    let spec = FieldSpec::try_from(config! {
        "optional" => true,
        "allow_empty" => true,
        "default" => "x",
        "validation" => RuleSet::builder().max_length(1).build().unwrap(),
        "before" => lowercase(),
    })
    .unwrap();
    assert!(spec.optional());
    assert!(spec.allow_empty());
    assert!(spec.before().is_some());
    assert!(spec.after().is_none());
    assert_eq!(spec.rules().and_then(RuleSet::max_length), Some(1));
    assert_eq!(spec.validate(Value::from("")), Ok(Value::from("")));
}

#[test]
fn config_rejects_bad_shapes() {
    let err = FieldSpec::try_from(config! { "before" => "lowercase" }).unwrap_err();
    assert_eq!(err.code(), "CONFIG_INVALID_OPTION");

    let err = FieldSpec::try_from(config! { "validation" => 3 }).unwrap_err();
    assert_eq!(err.code(), "CONFIG_INVALID_OPTION");
}

#[test]
fn specs_are_shareable_across_threads() {
    let spec = std::sync::Arc::new(
        FieldSpec::builder()
            .rules(RuleSet::builder().min_value(0.0).build().unwrap())
            .build(),
    );
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let spec = std::sync::Arc::clone(&spec);
            std::thread::spawn(move || spec.validate(Value::Int(i - 2)).is_ok())
        })
        .collect();
    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![false, false, true, true]);
}
