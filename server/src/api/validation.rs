use sea_orm::{ConnectionTrait, DbErr, Value};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use std::fmt;

use super::error::Error;
use crate::repository::Repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// Tables a payload field may point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Artist,
    Album,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Text { max: Option<usize> },
    Integer,
    Exists(Target),
}

/// One field of a resource schema.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub presence: Presence,
    pub constraint: Constraint,
}

impl Rule {
    pub const fn required(field: &'static str, constraint: Constraint) -> Self {
        Self {
            field,
            presence: Presence::Required,
            constraint,
        }
    }

    pub const fn optional(field: &'static str, constraint: Constraint) -> Self {
        Self {
            field,
            presence: Presence::Optional,
            constraint,
        }
    }
}

pub const fn text() -> Constraint {
    Constraint::Text { max: None }
}

pub const fn short_text() -> Constraint {
    Constraint::Text { max: Some(255) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

#[derive(Debug, Default)]
pub struct ValidationErrors(Vec<(&'static str, Vec<String>)>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: String) {
        match self.0.iter_mut().find(|(f, _)| *f == field) {
            Some((_, messages)) => messages.push(message),
            None => self.0.push((field, vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first message, followed by how many more were collected.
    pub fn message(&self) -> String {
        let mut messages = self.0.iter().flat_map(|(_, m)| m.iter());
        let first = match messages.next() {
            Some(first) => first.to_owned(),
            None => return "The given data was invalid.".to_string(),
        };
        match messages.count() {
            0 => first,
            1 => format!("{} (and 1 more error)", first),
            n => format!("{} (and {} more errors)", first, n),
        }
    }

    pub fn into_fields(self) -> BTreeMap<String, Vec<String>> {
        self.0
            .into_iter()
            .map(|(field, messages)| (field.to_string(), messages))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationErrors {}

enum Input<'a> {
    Absent,
    Null,
    Present(&'a Json),
}

fn input<'a>(payload: &'a Map<String, Json>, field: &str) -> Input<'a> {
    match payload.get(field) {
        None => Input::Absent,
        Some(Json::Null) => Input::Null,
        Some(Json::String(s)) if s.trim().is_empty() => Input::Null,
        Some(v) => Input::Present(v),
    }
}

fn label(field: &str) -> String {
    field.replace('_', " ")
}

fn integer(value: &Json) -> Option<i32> {
    match value {
        Json::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Constraint {
    fn null(&self) -> Value {
        match self {
            Constraint::Text { .. } => Value::String(None),
            Constraint::Integer | Constraint::Exists(_) => Value::Int(None),
        }
    }

    fn type_message(&self, field: &str) -> String {
        match self {
            Constraint::Text { .. } => format!("The {} field must be a string.", label(field)),
            Constraint::Integer => format!("The {} field must be an integer.", label(field)),
            Constraint::Exists(_) => format!("The selected {} is invalid.", label(field)),
        }
    }
}

async fn exists<C>(db: &C, target: Target, id: i32) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    match target {
        Target::Artist => {
            Repository::<_, entity::ArtistEntity>::new(db)
                .exists(id)
                .await
        }
        Target::Album => Repository::<_, entity::AlbumEntity>::new(db).exists(id).await,
    }
}

async fn check<C>(db: &C, rule: &Rule, value: &Json) -> Result<Result<Value, String>, DbErr>
where
    C: ConnectionTrait,
{
    Ok(match (rule.constraint, value) {
        (Constraint::Text { max }, Json::String(s)) => {
            let s = s.trim();
            match max {
                Some(max) if s.chars().count() > max => Err(format!(
                    "The {} field must not be greater than {} characters.",
                    label(rule.field),
                    max
                )),
                _ => Ok(s.into()),
            }
        }
        (Constraint::Integer, value) => integer(value)
            .map(Value::from)
            .ok_or_else(|| rule.constraint.type_message(rule.field)),
        (Constraint::Exists(target), value) => {
            let found = match integer(value) {
                Some(id) => exists(db, target, id).await?.then_some(id),
                None => None,
            };
            found
                .map(Value::from)
                .ok_or_else(|| rule.constraint.type_message(rule.field))
        }
        (constraint, _) => Err(constraint.type_message(rule.field)),
    })
}

/// Checks `payload` against `rules` and returns the column values to store.
/// Fields outside the schema are ignored. On create, required fields must be
/// present; on update every field is optional but present ones follow the
/// same type and reference constraints.
pub async fn validate<C>(
    db: &C,
    rules: &[Rule],
    payload: &Map<String, Json>,
    mode: Mode,
) -> Result<Vec<(&'static str, Value)>, Error>
where
    C: ConnectionTrait,
{
    let mut values = Vec::new();
    let mut errors = ValidationErrors::default();
    for rule in rules {
        match input(payload, rule.field) {
            Input::Absent | Input::Null
                if mode == Mode::Create && rule.presence == Presence::Required =>
            {
                errors.push(
                    rule.field,
                    format!("The {} field is required.", label(rule.field)),
                );
            }
            Input::Absent => {}
            Input::Null => match rule.presence {
                Presence::Optional => values.push((rule.field, rule.constraint.null())),
                Presence::Required => {
                    errors.push(rule.field, rule.constraint.type_message(rule.field))
                }
            },
            Input::Present(value) => match check(db, rule, value).await? {
                Ok(value) => values.push((rule.field, value)),
                Err(message) => errors.push(rule.field, message),
            },
        }
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        tracing::debug!(?errors, "Payload failed validation");
        Err(errors.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{database, seed_artist};
    use serde_json::json;

    const RULES: &[Rule] = &[
        Rule::required("name", short_text()),
        Rule::optional("cover", text()),
        Rule::required("year", Constraint::Integer),
        Rule::required("artist_id", Constraint::Exists(Target::Artist)),
    ];

    fn payload(value: Json) -> Map<String, Json> {
        match value {
            Json::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn fields(err: Error) -> BTreeMap<String, Vec<String>> {
        match err {
            Error::Validation(errors) => errors.into_fields(),
            e => panic!("expected a validation error, got {:?}", e),
        }
    }

    #[tokio::test]
    async fn accepts_valid_payload() {
        let db = database().await;
        let artist = seed_artist(&db, "Queen").await;
        let values = validate(
            &db,
            RULES,
            &payload(json!({
                "name": "  A Night at the Opera ",
                "year": "1975",
                "artist_id": artist,
                "label": "EMI",
            })),
            Mode::Create,
        )
        .await
        .unwrap();
        assert_eq!(
            values,
            vec![
                ("name", Value::from("A Night at the Opera")),
                ("year", Value::from(1975)),
                ("artist_id", Value::from(artist)),
            ]
        );
    }

    #[tokio::test]
    async fn reports_every_failing_field() {
        let db = database().await;
        let err = validate(
            &db,
            RULES,
            &payload(json!({
                "name": "x".repeat(256),
                "cover": 12,
                "year": 19.5,
                "artist_id": 9999,
            })),
            Mode::Create,
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The name field must not be greater than 255 characters. (and 3 more errors)"
        );
        let fields = fields(err);
        assert_eq!(fields["cover"], vec!["The cover field must be a string."]);
        assert_eq!(fields["year"], vec!["The year field must be an integer."]);
        assert_eq!(fields["artist_id"], vec!["The selected artist id is invalid."]);
    }

    #[tokio::test]
    async fn length_limit_counts_characters() {
        let db = database().await;
        let artist = seed_artist(&db, "Björk").await;
        let name = "é".repeat(255);
        let values = validate(
            &db,
            RULES,
            &payload(json!({ "name": name, "year": 1993, "artist_id": artist })),
            Mode::Create,
        )
        .await
        .unwrap();
        assert_eq!(values[0], ("name", Value::from(name.as_str())));

        let err = validate(
            &db,
            RULES,
            &payload(json!({ "name": "é".repeat(256) })),
            Mode::Update,
        )
        .await
        .unwrap_err();
        assert_eq!(
            fields(err)["name"],
            vec!["The name field must not be greater than 255 characters."]
        );
    }

    #[tokio::test]
    async fn required_fields_on_create() {
        let db = database().await;
        let err = validate(&db, RULES, &payload(json!({ "name": "" })), Mode::Create)
            .await
            .unwrap_err();
        let fields = fields(err);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["name"], vec!["The name field is required."]);
        assert_eq!(fields["year"], vec!["The year field is required."]);
        assert!(!fields.contains_key("cover"));
    }

    #[tokio::test]
    async fn update_allows_partial_payloads() {
        let db = database().await;
        let values = validate(&db, RULES, &payload(json!({ "cover": null })), Mode::Update)
            .await
            .unwrap();
        assert_eq!(values, vec![("cover", Value::String(None))]);

        let values = validate(&db, RULES, &payload(json!({})), Mode::Update)
            .await
            .unwrap();
        assert!(values.is_empty());
    }

    #[tokio::test]
    async fn update_keeps_type_and_reference_checks() {
        let db = database().await;
        let err = validate(
            &db,
            RULES,
            &payload(json!({ "name": null, "artist_id": "abc" })),
            Mode::Update,
        )
        .await
        .unwrap_err();
        let fields = fields(err);
        assert_eq!(fields["name"], vec!["The name field must be a string."]);
        assert_eq!(fields["artist_id"], vec!["The selected artist id is invalid."]);
    }

    #[test]
    fn message_counts_remaining_errors() {
        let mut errors = ValidationErrors::default();
        errors.push("name", "first".to_string());
        assert_eq!(errors.message(), "first");
        errors.push("year", "second".to_string());
        assert_eq!(errors.message(), "first (and 1 more error)");
        errors.push("year", "third".to_string());
        assert_eq!(errors.message(), "first (and 2 more errors)");
        assert_eq!(errors.into_fields()["year"].len(), 2);
    }
}
