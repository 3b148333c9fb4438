use super::Catalog;
use crate::api::validation::{short_text, text, Rule};

impl Catalog for entity::ArtistEntity {
    type Active = entity::ArtistActive;

    const LABEL: &'static str = "Artist";
    const SINGULAR: &'static str = "artist";
    const PLURAL: &'static str = "artists";
    // is_band is documented as "yes" or "no" but any string is stored
    const RULES: &'static [Rule] = &[
        Rule::required("name", short_text()),
        Rule::required("nationality", short_text()),
        Rule::optional("image", text()),
        Rule::required("description", text()),
        Rule::required("is_band", text()),
    ];
}
