//! Validation-rule lookup for request bodies.
//!
//! The exporter never inspects handlers itself. It asks a [`RuleProvider`] whether a handler
//! takes a validated input object and, if so, which field names that object declares. Hosts
//! plug in whatever introspection their ecosystem offers; this crate ships a static table
//! ([`StaticRules`]), a source scanner ([`crate::source::SourceRules`]) and a combinator
//! ([`ChainedRules`]).

use crate::collection::BodyField;
use crate::routes::HandlerId;
use log::debug;
use std::collections::HashMap;

/// Looks up the validated input fields of a route handler.
pub trait RuleProvider {
    /// Returns the ordered field names declared by the validation object the handler
    /// receives, or `None` when the handler has no such parameter, the object declares no
    /// rules, or the handler cannot be found.
    fn validated_fields(&self, handler: &HandlerId) -> Option<Vec<String>>;
}

/// Provider that never knows any fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRules;

impl RuleProvider for NoRules {
    fn validated_fields(&self, _handler: &HandlerId) -> Option<Vec<String>> {
        None
    }
}

/// Fixed `Controller@method -> fields` table.
///
/// Keys may use the fully qualified controller (`App\Http\Controllers\UserController@store`)
/// or just its type name (`UserController@store`); the qualified key wins.
#[derive(Debug, Default, Clone)]
pub struct StaticRules {
    rules: HashMap<String, Vec<String>>,
}

impl StaticRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the fields for one handler key
    pub fn with_rule<I, S>(mut self, key: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules
            .insert(key.to_string(), fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<HashMap<String, Vec<String>>> for StaticRules {
    fn from(rules: HashMap<String, Vec<String>>) -> Self {
        Self { rules }
    }
}

impl RuleProvider for StaticRules {
    fn validated_fields(&self, handler: &HandlerId) -> Option<Vec<String>> {
        let qualified = handler.to_string();
        let short = format!("{}@{}", handler.controller_name(), handler.method);

        self.rules
            .get(&qualified)
            .or_else(|| self.rules.get(&short))
            .cloned()
    }
}

/// Asks each provider in turn; the first answer wins.
#[derive(Default)]
pub struct ChainedRules<'a> {
    providers: Vec<&'a dyn RuleProvider>,
}

impl<'a> ChainedRules<'a> {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with(mut self, provider: &'a dyn RuleProvider) -> Self {
        self.providers.push(provider);
        self
    }
}

impl RuleProvider for ChainedRules<'_> {
    fn validated_fields(&self, handler: &HandlerId) -> Option<Vec<String>> {
        self.providers
            .iter()
            .find_map(|provider| provider.validated_fields(handler))
    }
}

/// Turns provider answers into body field placeholders.
pub struct FieldEnricher<'a> {
    rules: &'a dyn RuleProvider,
}

impl<'a> FieldEnricher<'a> {
    pub fn new(rules: &'a dyn RuleProvider) -> Self {
        Self { rules }
    }

    /// Body fields for `handler`: one empty text placeholder per validated field, in
    /// declaration order. Unknown handlers yield no fields.
    pub fn body_fields(&self, handler: &HandlerId) -> Vec<BodyField> {
        match self.rules.validated_fields(handler) {
            Some(fields) => fields.into_iter().map(BodyField::text).collect(),
            None => {
                debug!("No validation rules found for {}", handler);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_rules() {
        let handler = HandlerId::new("UserController", "store");
        assert_eq!(NoRules.validated_fields(&handler), None);
    }

    #[test]
    fn test_static_rules_short_key() {
        let rules = StaticRules::new().with_rule("UserController@store", ["name", "email"]);
        let handler = HandlerId::new("App\\Http\\Controllers\\UserController", "store");

        assert_eq!(
            rules.validated_fields(&handler),
            Some(vec!["name".to_string(), "email".to_string()])
        );
        assert_eq!(
            rules.validated_fields(&HandlerId::new("UserController", "update")),
            None
        );
    }

    #[test]
    fn test_static_rules_qualified_key_wins() {
        let rules = StaticRules::new()
            .with_rule("UserController@store", ["short"])
            .with_rule("Admin\\UserController@store", ["qualified"]);

        assert_eq!(
            rules.validated_fields(&HandlerId::new("Admin\\UserController", "store")),
            Some(vec!["qualified".to_string()])
        );
        assert_eq!(
            rules.validated_fields(&HandlerId::new("Shop\\UserController", "store")),
            Some(vec!["short".to_string()])
        );
    }

    #[test]
    fn test_chained_rules_first_answer_wins() {
        let first = StaticRules::new().with_rule("UserController@store", ["name"]);
        let second = StaticRules::new()
            .with_rule("UserController@store", ["ignored"])
            .with_rule("PostController@store", ["title", "body"]);
        let chain = ChainedRules::new().with(&NoRules).with(&first).with(&second);

        assert_eq!(
            chain.validated_fields(&HandlerId::new("UserController", "store")),
            Some(vec!["name".to_string()])
        );
        assert_eq!(
            chain.validated_fields(&HandlerId::new("PostController", "store")),
            Some(vec!["title".to_string(), "body".to_string()])
        );
        assert_eq!(
            chain.validated_fields(&HandlerId::new("TagController", "store")),
            None
        );
    }

    #[test]
    fn test_enricher_builds_text_placeholders() {
        let rules = StaticRules::new().with_rule("UserController@store", ["name", "email"]);
        let enricher = FieldEnricher::new(&rules);

        let fields = enricher.body_fields(&HandlerId::new("UserController", "store"));

        assert_eq!(fields, vec![BodyField::text("name"), BodyField::text("email")]);
        assert_eq!(fields[0].value, "");
        assert_eq!(fields[0].field_type, "text");
    }

    #[test]
    fn test_enricher_unknown_handler_has_no_fields() {
        let enricher = FieldEnricher::new(&NoRules);
        assert!(enricher
            .body_fields(&HandlerId::new("UserController", "index"))
            .is_empty());
    }
}
