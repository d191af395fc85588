use pretty_assertions::assert_eq;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tokenfold::analyzer::object::{
    ignore_property, parse_object, parse_object_default, parse_started_object, parse_sub_type,
    unknown_property,
};
use tokenfold::analyzer::parsers::{
    parse_property_name, parse_type, BOOL, DATE_TIME, END_ARRAY, END_OBJECT, GUID, I64,
    OPTIONAL_STRING, START_ARRAY, START_OBJECT, STRING,
};
use tokenfold::analyzer::prelude::*;
use tokenfold::{
    parse, parse_str, tokenize, BoxedParser, Error, ParseConfig, ParseError, Updater, UpdaterExt,
};

#[ctor::ctor]
fn init_tests() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Data {
    foo: String,
    bar: String,
}

fn data_selector(name: &str) -> BoxedParser<Updater<Data>> {
    match name {
        "foo" => STRING
            .updater(|foo: String, data: Data| Data { foo, ..data })
            .boxed(),
        "bar" => STRING.assign(|data: &mut Data, bar| data.bar = bar).boxed(),
        other => unknown_property(other),
    }
}

#[test]
fn it_folds_properties_in_textual_order() {
    let parser = parse_object(data_selector, Data::default());
    let input = r#"
        {
            "foo": "a",
            "bar": "b"
        }"#;

    assert_eq!(
        parse_str(&parser, input, &ParseConfig::default()),
        Ok(Data {
            foo: "a".to_string(),
            bar: "b".to_string(),
        })
    );
}

#[test]
fn it_returns_initial_value_for_empty_object() {
    let initial = Data {
        foo: "x".to_string(),
        bar: "y".to_string(),
    };
    let parser = parse_object(data_selector, initial.clone());
    assert_eq!(parse_str(&parser, "{}", &ParseConfig::default()), Ok(initial));
}

#[test]
fn it_fails_on_unknown_property_with_its_name() {
    let parser = parse_object(data_selector, Data::default());
    let input = "{\"foo\": \"a\",\n \"zzz\": \"c\"}";

    let error = parse_str(&parser, input, &ParseConfig::default()).unwrap_err();
    match &error {
        Error::Parse { source, line, .. } => {
            assert_eq!(source.property(), Some("zzz"));
            assert!(matches!(
                source,
                ParseError::Property { inner, .. } if **inner == ParseError::UnknownProperty("zzz".to_string())
            ));
            assert_eq!(*line, 2);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(error.to_string().contains("zzz"));
}

#[test]
fn it_parses_started_object_mid_stream() {
    let buffer = tokenize(r#"{"foo": "a", "bar": "b"}"#, &Default::default()).unwrap();
    let mut cursor = buffer.cursor();
    assert!(cursor.advance());

    let parser = parse_started_object(data_selector, Data::default());
    let data = parse(&parser, &mut cursor, &ParseConfig::default()).unwrap();
    assert_eq!(data.bar, "b");
    assert!(cursor.is_finished());
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Pending { id: uuid::Uuid },
    Scheduled(Scheduled),
}

#[derive(Debug, Clone, PartialEq)]
struct Scheduled {
    id: uuid::Uuid,
    at: chrono::NaiveDateTime,
    note: Option<String>,
}

impl From<Scheduled> for Event {
    fn from(scheduled: Scheduled) -> Self {
        Event::Scheduled(scheduled)
    }
}

fn schedule(event: Event) -> Scheduled {
    match event {
        Event::Scheduled(scheduled) => scheduled,
        Event::Pending { id } => Scheduled {
            id,
            at: chrono::NaiveDateTime::default(),
            note: None,
        },
    }
}

fn event_selector(name: &str) -> BoxedParser<Updater<Event>> {
    match name {
        "id" => GUID
            .updater(|id, event: Event| match event {
                Event::Pending { .. } => Event::Pending { id },
                Event::Scheduled(s) => Event::Scheduled(Scheduled { id, ..s }),
            })
            .boxed(),
        "schedule" => parse_sub_type(
            |name: &str| match name {
                "at" => DATE_TIME.assign(|s: &mut Scheduled, at| s.at = at).boxed(),
                "note" => OPTIONAL_STRING
                    .assign(|s: &mut Scheduled, note| s.note = note)
                    .boxed(),
                other => unknown_property(other),
            },
            schedule,
        )
        .boxed(),
        _ => ignore_property(),
    }
}

#[test]
fn it_parses_sub_type_into_parent() {
    let input = r#"{
        "id": "936da01f-9abd-4d9d-80c7-02af85c822a8",
        "source": {"ignored": [1, 2, 3]},
        "schedule": {"at": "2024-05-06T07:08:09", "note": null}
    }"#;
    let parser = parse_object(
        event_selector,
        Event::Pending {
            id: uuid::Uuid::nil(),
        },
    );

    let event = parse_str(&parser, input, &ParseConfig::default()).unwrap();
    let expected_at = chrono::NaiveDate::from_ymd_opt(2024, 5, 6)
        .and_then(|d| d.and_hms_opt(7, 8, 9))
        .unwrap();
    assert_eq!(
        event,
        Event::Scheduled(Scheduled {
            id: uuid::Uuid::parse_str("936da01f-9abd-4d9d-80c7-02af85c822a8").unwrap(),
            at: expected_at,
            note: None,
        })
    );
}

#[test]
fn it_reports_bad_guid_as_conversion_failure() {
    let parser = parse_object(
        event_selector,
        Event::Pending {
            id: uuid::Uuid::nil(),
        },
    );
    let error = parse_str(&parser, r#"{"id": "nope"}"#, &ParseConfig::default()).unwrap_err();
    let source = error.parse_error().unwrap();
    assert_eq!(source.property(), Some("id"));
    assert!(matches!(
        source,
        ParseError::Property { inner, .. } if matches!(**inner, ParseError::Conversion { .. })
    ));
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
struct Limits {
    soft: i64,
    hard: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Job {
    name: String,
    retries: i64,
    enabled: bool,
    tags: Vec<String>,
    limits: Limits,
}

#[test]
fn it_mixes_primitives_arrays_and_serde_values() {
    let parser = parse_object_default(|name: &str| -> BoxedParser<Updater<Job>> {
        match name {
            "name" => STRING.assign(|job: &mut Job, v| job.name = v).boxed(),
            "retries" => I64.assign(|job: &mut Job, v| job.retries = v).boxed(),
            "enabled" => BOOL.assign(|job: &mut Job, v| job.enabled = v).boxed(),
            "tags" => STRING
                .many()
                .between(START_ARRAY, END_ARRAY)
                .assign(|job: &mut Job, v| job.tags = v)
                .boxed(),
            "limits" => parse_type::<Limits>()
                .assign(|job: &mut Job, v| job.limits = v)
                .boxed(),
            other => unknown_property(other),
        }
    });
    let input = r#"{
        "name": "nightly",
        "retries": 3,
        "enabled": true,
        "tags": ["a", "b"],
        "limits": {"soft": 10, "hard": 20}
    }"#;

    assert_eq!(
        parse_str(&parser, input, &ParseConfig::default()),
        Ok(Job {
            name: "nightly".to_string(),
            retries: 3,
            enabled: true,
            tags: vec!["a".to_string(), "b".to_string()],
            limits: Limits { soft: 10, hard: 20 },
        })
    );
}

#[test]
fn it_matches_property_names_case_insensitively_when_configured() {
    let parser = then(parse_property_name("Kind"), STRING).between(START_OBJECT, END_OBJECT);
    let input = r#"{"kind": "circle"}"#;

    assert!(parse_str(&parser, input, &ParseConfig::default()).is_err());
    let relaxed = ParseConfig {
        case_insensitive_properties: true,
        ..ParseConfig::default()
    };
    assert_eq!(parse_str(&parser, input, &relaxed), Ok("circle".to_string()));
}
