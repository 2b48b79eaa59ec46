use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use prefill::record::{FieldValue, Record, Schema};
use prefill::{FieldError, FieldOutcome, Filler, Mode, PrefillError, set_defaults};

#[derive(Default, Debug)]
struct Tls {
    cert: String,
    verify: bool,
}

#[derive(Default, Debug)]
struct Upstream {
    name: String,
    weight: u8,
}

#[derive(Default, Debug)]
struct Server {
    host: String,
    port: u16,
    tls: Tls,
    upstreams: Vec<Upstream>,
    started: NaiveDateTime,
}

impl Record for Tls {
    fn schema() -> &'static Schema<Self> {
        lazy_static! {
            static ref SCHEMA: Schema<Tls> = Schema::<Tls>::new("Tls")
                .field("cert", r#"default:"/etc/ssl/cert.pem""#, |t| FieldValue::from(&mut t.cert))
                .field("verify", r#"default:"true""#, |t| FieldValue::from(&mut t.verify));
        }
        &SCHEMA
    }
}

impl Record for Upstream {
    fn schema() -> &'static Schema<Self> {
        lazy_static! {
            static ref SCHEMA: Schema<Upstream> = Schema::<Upstream>::new("Upstream")
                .field("name", r#"default:"upstream""#, |u| FieldValue::from(&mut u.name))
                .field("weight", r#"default:"1""#, |u| FieldValue::from(&mut u.weight));
        }
        &SCHEMA
    }
}

impl Record for Server {
    fn schema() -> &'static Schema<Self> {
        lazy_static! {
            static ref SCHEMA: Schema<Server> = Schema::<Server>::new("Server")
                .field("host", r#"default:"localhost""#, |s| FieldValue::from(&mut s.host))
                .field("port", r#"default:"8080""#, |s| FieldValue::from(&mut s.port))
                .field("tls", "", |s| FieldValue::record(&mut s.tls))
                .field("upstreams", "", |s| FieldValue::records(&mut s.upstreams))
                .field("started", r#"default:"2024-01-02 03:04:05""#, |s| FieldValue::from(&mut s.started));
        }
        &SCHEMA
    }
}

#[test]
fn nested_records_are_always_descended() {
    let mut server = Server {
        tls: Tls { verify: true, ..Default::default() },
        upstreams: vec![
            Upstream::default(),
            Upstream { weight: 5, ..Default::default() },
        ],
        ..Default::default()
    };
    let report = set_defaults(&mut server).unwrap();
    assert_eq!(server.host, "localhost");
    assert_eq!(server.tls.cert, "/etc/ssl/cert.pem");
    assert_eq!(server.upstreams.len(), 2);
    assert_eq!(server.upstreams[0].name, "upstream");
    assert_eq!(server.upstreams[0].weight, 1);
    assert_eq!(server.upstreams[1].name, "upstream");
    assert_eq!(server.upstreams[1].weight, 5);
    assert_eq!(
        server.started,
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap()
    );

    assert_eq!(report.outcome("tls.cert"), Some(&FieldOutcome::Defaulted));
    assert_eq!(report.outcome("tls.verify"), Some(&FieldOutcome::Kept));
    assert_eq!(report.outcome("upstreams[0].weight"), Some(&FieldOutcome::Defaulted));
    assert_eq!(report.outcome("upstreams[1].weight"), Some(&FieldOutcome::Kept));
}

#[test]
fn record_sequences_are_never_resized() {
    let mut server = Server::default();
    set_defaults(&mut server).unwrap();
    assert!(server.upstreams.is_empty());
}

#[test]
fn enumerate_fields_stays_one_level_deep() {
    let filler = Filler::new();
    let mut server = Server { port: 443, ..Default::default() };
    let fields = filler.enumerate_fields(&mut server);
    let names: Vec<_> = fields.iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["host", "port", "tls", "upstreams", "started"]);
    assert_eq!(fields[0].annotation.as_deref(), Some("localhost"));
    assert!(fields[0].is_zero);
    assert!(!fields[1].is_zero);
    assert_eq!(fields[2].kind, prefill::kind::ValueKind::Record);
    assert_eq!(fields[2].type_name, "Tls");
    assert_eq!(fields[3].kind, prefill::kind::ValueKind::Sequence);
    assert_eq!(fields[4].exact_type, Some(prefill::kind::ExactType::Timestamp));
}

#[derive(Default, Debug)]
struct Limits {
    soft: u8,
    hard: u8,
    burst: u8,
}

impl Record for Limits {
    fn schema() -> &'static Schema<Self> {
        lazy_static! {
            static ref SCHEMA: Schema<Limits> = Schema::<Limits>::new("Limits")
                .field("soft", r#"default:"10""#, |l| FieldValue::from(&mut l.soft))
                .field("hard", r#"default:"oops""#, |l| FieldValue::from(&mut l.hard))
                .field("burst", r#"default:"30""#, |l| FieldValue::from(&mut l.burst));
        }
        &SCHEMA
    }
}

#[derive(Default, Debug)]
struct Quota {
    limits: Limits,
}

impl Record for Quota {
    fn schema() -> &'static Schema<Self> {
        lazy_static! {
            static ref SCHEMA: Schema<Quota> =
                Schema::<Quota>::new("Quota").field("limits", "", |q| FieldValue::record(&mut q.limits));
        }
        &SCHEMA
    }
}

#[test]
fn strict_mode_stops_at_first_failure() {
    let filler = Filler::builder().mode(Mode::Strict).build();
    let mut quota = Quota::default();
    let err = filler.fill(&mut quota).unwrap_err();
    assert!(matches!(
        err,
        PrefillError::Field { ref path, source: FieldError::InvalidUint(_) } if path == "limits.hard"
    ));
    // fields before the failure keep their defaults, later ones are untouched
    assert_eq!(quota.limits.soft, 10);
    assert_eq!(quota.limits.hard, 0);
    assert_eq!(quota.limits.burst, 0);
}

#[test]
fn lenient_mode_reports_and_continues() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("prefill=trace")
        .try_init();
    let mut quota = Quota::default();
    let report = set_defaults(&mut quota).unwrap();
    assert_eq!(quota.limits.soft, 10);
    assert_eq!(quota.limits.hard, 0);
    assert_eq!(quota.limits.burst, 30);
    let failures: Vec<_> = report.failures().map(|(path, _)| path).collect();
    assert_eq!(failures, vec!["limits.hard"]);
    assert!(!report.is_clean());
}
