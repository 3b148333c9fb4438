use super::Catalog;
use crate::api::validation::{short_text, text, Constraint, Rule, Target};

impl Catalog for entity::MemberEntity {
    type Active = entity::MemberActive;

    const LABEL: &'static str = "Member";
    const SINGULAR: &'static str = "member";
    const PLURAL: &'static str = "members";
    const RULES: &'static [Rule] = &[
        Rule::required("name", short_text()),
        Rule::required("instrument", short_text()),
        Rule::required("year", Constraint::Integer),
        Rule::required("artist_id", Constraint::Exists(Target::Artist)),
        Rule::optional("image", text()),
    ];
}
