use pretty_assertions::assert_eq;
use validata::prelude::*;
use validata::{Handle, ObjectRef};

fn yes_no_nc() -> RuleSet {
    RuleSet::try_from(config! { "allowed_values_nc" => vec!["Yes", "No"] }).unwrap()
}

#[test]
fn case_insensitive_allowed_values() {
    let rules = yes_no_nc();
    assert!(rules.is_valid(&Value::from("YES")));
    assert!(rules.is_valid(&Value::from("yes")));
    assert!(rules.is_valid(&Value::from("No")));
    assert_eq!(
        rules.validate(&Value::from("nope")),
        Err(Check::AllowedValuesNc)
    );
    assert_eq!(
        rules.allowed_values_nc(),
        Some(&[Value::from("Yes"), Value::from("No")][..])
    );
}

#[test]
fn allowed_values_over_sequences() {
    let rules = RuleSet::builder().allowed_values(["a", "b"]).build().unwrap();
    assert!(rules.is_valid(&Value::from(vec!["a", "b", "a"])));
    assert!(rules.is_valid(&Value::Sequence(vec![])));
    assert_eq!(
        rules.validate(&Value::from(vec!["a", "c"])),
        Err(Check::AllowedValues)
    );
}

#[test]
fn scalar_pseudo_type() {
    let rules = RuleSet::try_from(config! { "types" => vec!["scalar"] }).unwrap();
    for value in [Value::Bool(true), Value::Int(1), Value::Float(1.5), Value::from("s")] {
        assert!(rules.is_valid(&value), "{value:?}");
    }
    assert_eq!(
        rules.validate(&Value::from(vec![1])),
        Err(Check::Types)
    );
}

#[test]
fn evaluation_order_is_fixed() {
    let rules = RuleSet::builder()
        .callback(|_| false)
        .regex("^x$")
        .min_value(0.0)
        .max_length(2)
        .allowed_values(["abc", "xyz"])
        .types([TypeTag::String])
        .build()
        .unwrap();
    assert_eq!(rules.validate(&Value::Int(3)), Err(Check::Types));
    assert_eq!(rules.validate(&Value::from("q")), Err(Check::AllowedValues));
    assert_eq!(rules.validate(&Value::from("abc")), Err(Check::MaxLength));
}

#[test]
fn value_bounds_need_numbers() {
    let rules = RuleSet::builder().min_value(0.0).max_value(10.0).build().unwrap();
    assert!(rules.is_valid(&Value::Int(0)));
    assert!(rules.is_valid(&Value::from("9.5")));
    assert_eq!(rules.validate(&Value::Int(11)), Err(Check::MaxValue));
    assert_eq!(rules.validate(&Value::Int(-1)), Err(Check::MinValue));
    assert_eq!(rules.validate(&Value::from("high")), Err(Check::MaxValue));
}

#[test]
fn resource_and_isa() {
    let rules = RuleSet::builder().resource_type("stream").build().unwrap();
    assert!(rules.is_valid(&Value::Handle(Handle::new("stream", 1))));
    assert_eq!(
        rules.validate(&Value::Handle(Handle::new("gd", 1))),
        Err(Check::ResourceType)
    );

    let rules = RuleSet::builder().isa("DateTimeInterface").build().unwrap();
    let date = ObjectRef::new("DateTime").with_capability("DateTimeInterface");
    assert!(rules.is_valid(&Value::Object(date)));
    assert_eq!(rules.validate(&Value::from("2024-01-01")), Err(Check::Isa));
}

#[test]
fn named_callbacks_from_config() {
    let rules = RuleSet::try_from(config! {
        "callbacks" => config! {
            "is_even" => Predicate::new(|v| v.as_i64().is_some_and(|n| n % 2 == 0)),
            "is_small" => Predicate::new(|v| v.as_i64().is_some_and(|n| n < 10)),
        },
    })
    .unwrap();
    assert!(rules.is_valid(&Value::Int(4)));
    let err = rules.validate_ex(&Value::Int(12)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed validation \"is_small (callback)\" for integer value 12"
    );
}

#[test]
fn repeated_validation_is_stable() {
    let rules = yes_no_nc();
    let value = Value::from("maybe");
    let first = rules.validate(&value);
    let second = rules.validate(&value);
    assert_eq!(first, second);
}

#[test]
fn accessors_expose_options() {
    let rules = RuleSet::try_from(config! {
        "types" => vec!["int", "float"],
        "min_value" => 0,
        "max_value" => 10,
        "regex" => "^[0-9.]+$",
        "_comment" => "score out of ten",
    })
    .unwrap();
    assert_eq!(rules.types(), Some(&[TypeTag::Integer, TypeTag::Double][..]));
    assert_eq!(rules.min_value(), Some(0.0));
    assert_eq!(rules.max_value(), Some(10.0));
    assert_eq!(rules.regex(), Some("^[0-9.]+$"));
    assert_eq!(rules.isa(), None);
}

#[test]
fn configuration_errors_fail_construction() {
    let cases = [
        (config! { "unknown" => 1 }, "CONFIG_UNKNOWN_OPTION"),
        (config! { "max_length" => "long" }, "CONFIG_INVALID_OPTION"),
        (config! { "types" => vec!["number"] }, "CONFIG_INVALID_OPTION"),
        (config! { "types" => Vec::<&str>::new() }, "CONFIG_INVALID_OPTION"),
        (config! { "regex" => "(" }, "CONFIG_INVALID_PATTERN"),
        (config! { "callback" => true }, "CONFIG_INVALID_OPTION"),
        (
            config! { "allowed_values" => vec![Value::from(vec![1])] },
            "CONFIG_INVALID_OPTION",
        ),
    ];
    for (config, code) in cases {
        let err = RuleSet::try_from(config).unwrap_err();
        assert_eq!(err.code(), code, "{err}");
    }
}
