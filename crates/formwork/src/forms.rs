//! Ready-made forms: registration, a dynamic favourites list and switches.

use formwork_core::{EngineConfig, Field, FieldCollection, FormBuilder, FormModel, Result};
use formwork_validate::{
    EqualsFieldRule, InMemoryDirectory, MinLengthRule, PatternRule, RequiredRule,
    RequiredTrueRule, ReservedValueRule, RuleSet, UniqueRule, ValidationContext,
};
use std::time::Duration;

/// Email address already taken in [`email_directory`].
pub const TAKEN_EMAIL: &str = "axelmtz@gmail.com";

/// Username nobody may register.
pub const RESERVED_USERNAME: &str = "strider";

/// Simulated latency of the email lookup.
pub const EMAIL_LOOKUP_LATENCY: Duration = Duration::from_secs(3);

pub const FAVORITE_GAMES: [&str; 3] = ["Halo Reach", "Resident Evil 5", "Fornite"];

/// A simulated user directory where [`TAKEN_EMAIL`] is registered.
pub fn email_directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .register("email", TAKEN_EMAIL)
        .with_latency(EMAIL_LOOKUP_LATENCY)
}

/// The registration form, ready for a context and config.
///
/// `email` is checked against the context's directory; `password2` must
/// match `password`.
pub fn register_builder() -> FormBuilder {
    let required = || RuleSet::new().rule(RequiredRule::new());

    FormModel::builder()
        .field("name", "", required().rule(PatternRule::full_name()))
        .field(
            "email",
            "",
            required()
                .rule(PatternRule::email())
                .async_rule(UniqueRule::new("email")),
        )
        .field(
            "username",
            "",
            required().rule(ReservedValueRule::new([RESERVED_USERNAME])),
        )
        .field("password", "", required().rule(MinLengthRule::new(6)))
        .field("password2", "", required())
        .cross_rule(EqualsFieldRule::new("password", "password2"))
}

pub fn register_form(context: ValidationContext) -> Result<FormModel> {
    register_builder().context(context).build()
}

pub fn register_form_with(context: ValidationContext, config: EngineConfig) -> Result<FormModel> {
    register_builder().context(context).config(config).build()
}

/// A name plus a list of favourite games, grown through [`new_favorite_field`].
pub fn dynamic_form() -> Result<FormModel> {
    FormModel::builder()
        .field(
            "name",
            "",
            RuleSet::new()
                .rule(RequiredRule::new())
                .rule(MinLengthRule::new(3)),
        )
        .collection(
            "favoriteGames",
            FieldCollection::new(RuleSet::new().rule(RequiredRule::new()), FAVORITE_GAMES),
        )
        .build()
}

/// Staging input for [`dynamic_form`]'s `favoriteGames`.
pub fn new_favorite_field() -> Field {
    Field::new(
        "",
        RuleSet::new()
            .rule(RequiredRule::new())
            .rule(MinLengthRule::new(3)),
    )
}

/// Gender, notifications and a terms checkbox that must be accepted.
pub fn switches_form() -> Result<FormModel> {
    FormModel::builder()
        .field("gender", "M", RuleSet::new().rule(RequiredRule::new()))
        .field("wantNotification", true, RuleSet::new().rule(RequiredRule::new()))
        .field(
            "termsAndConditions",
            false,
            RuleSet::new().rule(RequiredTrueRule::new()),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_validate::{ErrorDescriptor, Value};

    #[test]
    fn register_form_starts_untouched_and_invalid() {
        let form = register_form(ValidationContext::new()).unwrap();
        let names: Vec<_> = form.names().collect();
        assert_eq!(names, ["name", "email", "username", "password", "password2"]);
        assert!(!form.is_valid());
        assert!(form.cross_error().is_none());
        for name in names {
            assert!(!form.is_field_invalid(name).unwrap());
        }
    }

    #[test]
    fn full_name_pattern() {
        let mut form = register_form(ValidationContext::new()).unwrap();
        form.set_value("name", "Axel").unwrap();
        assert_eq!(form.field("name").unwrap().error().unwrap().code(), "pattern");

        form.set_value("name", "Axel Martínez").unwrap();
        assert!(form.field("name").unwrap().error().is_none());
    }

    #[test]
    fn switches_need_terms_accepted() {
        let mut form = switches_form().unwrap();
        assert_eq!(
            form.field("termsAndConditions").unwrap().error(),
            Some(&ErrorDescriptor::RequiredTrue)
        );
        assert!(form.field("wantNotification").unwrap().error().is_none());

        form.set_value("termsAndConditions", true).unwrap();
        let outcome = form.submit();
        assert!(outcome.ok);

        let values = outcome.values.unwrap();
        assert_eq!(
            values.get("gender").and_then(|v| v.as_single()),
            Some(&Value::from("M"))
        );
        assert_eq!(form.value("termsAndConditions").unwrap(), &Value::Bool(false));
    }

    #[test]
    fn dynamic_form_initial_items() {
        let form = dynamic_form().unwrap();
        assert_eq!(form.items("favoriteGames").unwrap().len(), 3);
        assert!(form.collection("favoriteGames").unwrap().is_valid());
    }
}
