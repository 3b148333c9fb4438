use super::Catalog;
use crate::api::validation::{short_text, text, Constraint, Rule, Target};

impl Catalog for entity::SongEntity {
    type Active = entity::SongActive;

    const LABEL: &'static str = "Song";
    const SINGULAR: &'static str = "song";
    const PLURAL: &'static str = "songs";
    const RULES: &'static [Rule] = &[
        Rule::required("name", short_text()),
        Rule::required("songwriter", short_text()),
        Rule::optional("lyrics", text()),
        Rule::required("album_id", Constraint::Exists(Target::Album)),
    ];
}
