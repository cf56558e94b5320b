//! Diagnostics emitted through `tracing`.

use std::io;
use std::sync::{Arc, Mutex};

use validata::prelude::*;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn captured<F: FnOnce()>(f: F) -> String {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    capture.contents()
}

#[test]
fn deprecated_rule_options_warn() {
    let logs = captured(|| {
        let rules = RuleSet::try_from(config! { "mb_max_length" => 3 }).unwrap();
        assert_eq!(rules.max_length_chars(), Some(3));
    });
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("mb_max_length"), "{logs}");
}

#[test]
fn deprecated_validator_options_warn() {
    let logs = captured(|| {
        let validator = RecordValidator::try_from(config! { "empty_delete" => true }).unwrap();
        assert!(validator.delete_null());
    });
    assert!(logs.contains("empty_delete"), "{logs}");
}

#[test]
fn null_into_rule_set_warns() {
    let logs = captured(|| {
        let rules = RuleSet::builder().max_length(1).build().unwrap();
        assert!(rules.validate(&Value::Null).is_ok());
    });
    assert!(logs.contains("rule set asked to validate null"), "{logs}");
}
