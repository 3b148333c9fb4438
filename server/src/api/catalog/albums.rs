use super::Catalog;
use crate::api::validation::{short_text, text, Constraint, Rule, Target};

impl Catalog for entity::AlbumEntity {
    type Active = entity::AlbumActive;

    const LABEL: &'static str = "Album";
    const SINGULAR: &'static str = "album";
    const PLURAL: &'static str = "albums";
    const RULES: &'static [Rule] = &[
        Rule::required("name", short_text()),
        Rule::optional("cover", text()),
        Rule::required("year", Constraint::Integer),
        Rule::required("genre", short_text()),
        Rule::required("artist_id", Constraint::Exists(Target::Artist)),
    ];
}
