use chrono::TimeDelta;
use lazy_static::lazy_static;
use prefill::kind::{ExactType, ValueKind};
use prefill::record::{FieldValue, Record, Schema};
use prefill::tag::lookup;
use prefill::{FieldError, FieldOutcome, Filler, apply_defaults};

#[derive(Default, Debug)]
struct Job {
    name: String,
    queue: String,
    timeout: TimeDelta,
    retry: TimeDelta,
    port: u16,
}

impl Record for Job {
    fn schema() -> &'static Schema<Self> {
        lazy_static! {
            static ref SCHEMA: Schema<Job> = Schema::<Job>::new("Job")
                .field("name", r#"default:"nightly""#, |j| FieldValue::from(&mut j.name))
                .field("queue", r#"default:"batch" alt:"priority""#, |j| FieldValue::from(&mut j.queue))
                .field("timeout", r#"default:"30""#, |j| FieldValue::from(&mut j.timeout))
                .field("retry", r#"default:"5""#, |j| FieldValue::from(&mut j.retry))
                .field("port", r#"default:"8080" alt:"9090""#, |j| FieldValue::from(&mut j.port));
        }
        &SCHEMA
    }
}

fn seconds(_: &Filler, value: FieldValue<'_>, text: &str) -> Result<(), FieldError> {
    let FieldValue::Duration(slot) = value else {
        return Err(FieldError::Unsupported("not a duration"));
    };
    let count: i64 = text.parse().map_err(|_| FieldError::InvalidInt(text.to_string()))?;
    *slot = TimeDelta::seconds(count);
    Ok(())
}

#[test]
fn kind_strategy_replaces_builtin() {
    let filler = Filler::builder()
        .kind(ValueKind::String, |_, value, text| {
            if let FieldValue::Str(slot) = value {
                *slot = text.to_uppercase();
            }
            Ok(())
        })
        .build();
    let mut job = Job::default();
    filler.fill(&mut job).unwrap();
    assert_eq!(job.name, "NIGHTLY");
    assert_eq!(job.queue, "BATCH");
}

#[test]
fn exact_type_beats_kind_and_name_beats_both() {
    let filler = Filler::builder()
        .kind(ValueKind::Int, |_, _, _| Err(FieldError::Unsupported("int")))
        .exact(ExactType::Duration, seconds)
        .field("retry", |_, value, text| {
            if let FieldValue::Duration(slot) = value {
                *slot = TimeDelta::minutes(text.parse().unwrap_or(0));
            }
            Ok(())
        })
        .build();
    let mut job = Job::default();
    let report = filler.fill(&mut job).unwrap();
    assert_eq!(job.timeout, TimeDelta::seconds(30));
    assert_eq!(job.retry, TimeDelta::minutes(5));
    assert!(report.is_clean());
}

#[test]
fn builtin_duration_rejects_bare_counts() {
    let mut job = Job::default();
    let report = Filler::new().fill(&mut job).unwrap();
    assert_eq!(job.timeout, TimeDelta::zero());
    assert!(matches!(
        report.outcome("timeout"),
        Some(FieldOutcome::Failed(FieldError::Duration(_)))
    ));
}

#[test]
fn kind_table_reads_durations_when_no_exact_strategy_applies() {
    let filler = Filler::new();
    let mut wait = TimeDelta::zero();
    prefill::coerce::coerce_int(&filler, FieldValue::from(&mut wait), "1m30s").unwrap();
    assert_eq!(wait, TimeDelta::seconds(90));
}

#[test]
fn annotation_key_is_configurable() {
    let mut job = Job::default();
    Filler::with_tag("alt").fill(&mut job).unwrap();
    assert_eq!(job.queue, "priority");
    assert_eq!(job.port, 9090);
    assert!(job.name.is_empty());

    let mut job = Job::default();
    apply_defaults(&mut job, Some("alt")).unwrap();
    assert_eq!(job.port, 9090);

    // asking for the default key afterwards is not shadowed by "alt"
    let mut job = Job::default();
    apply_defaults(&mut job, None).unwrap();
    assert_eq!(job.port, 8080);
    let mut job = Job::default();
    apply_defaults(&mut job, Some("default")).unwrap();
    assert_eq!(job.queue, "batch");
}

#[test]
fn annotation_lookup() {
    assert_eq!(lookup(r#"default:"8080""#, "default").as_deref(), Some("8080"));
    assert_eq!(lookup(r#"default:"8080" alt:"9090""#, "alt").as_deref(), Some("9090"));
    assert_eq!(lookup(r#"default:"say \"hi\"""#, "default").as_deref(), Some(r#"say "hi""#));
    assert_eq!(lookup(r#"default:"""#, "default").as_deref(), Some(""));
    assert_eq!(lookup(r#"default:"8080""#, "alt"), None);
    assert_eq!(lookup("default:8080", "default"), None);
    assert_eq!(lookup(r#"default:"unterminated"#, "default"), None);
    assert_eq!(lookup("", "default"), None);
}

#[test]
fn annotation_escapes() {
    assert_eq!(lookup(r#"default:"\x41""#, "default").as_deref(), Some("A"));
    assert_eq!(lookup(r#"default:"caf\u00e9""#, "default").as_deref(), Some("café"));
    assert_eq!(lookup(r#"default:"\U0001F600""#, "default").as_deref(), Some("\u{1F600}"));
    assert_eq!(lookup(r#"default:"\101\a""#, "default").as_deref(), Some("A\u{7}"));
    assert_eq!(lookup(r#"default:"a\tb""#, "default").as_deref(), Some("a\tb"));
    // byte escapes outside ASCII and unknown escapes give no value
    assert_eq!(lookup(r#"default:"\xff""#, "default"), None);
    assert_eq!(lookup(r#"default:"\x4""#, "default"), None);
    assert_eq!(lookup(r#"default:"\q""#, "default"), None);
}
