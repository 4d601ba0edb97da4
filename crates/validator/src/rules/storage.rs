//! Rules backed by a [`PresenceVerifier`](crate::foundation::PresenceVerifier)

use crate::foundation::{RuleContext, ValidatorError};
use crate::macros::rule;

/// Column to query: the explicit parameter, else the attribute's last segment.
fn column<'a>(explicit: Option<&'a str>, ctx: &RuleContext<'a>) -> &'a str {
    explicit.unwrap_or_else(|| {
        let attribute = ctx.attribute();
        attribute.rsplit('.').next().unwrap_or(attribute)
    })
}

fn verifier<'a>(
    rule: &str,
    ctx: &RuleContext<'a>,
) -> Result<&'a dyn crate::foundation::PresenceVerifier, ValidatorError> {
    ctx.presence()
        .ok_or_else(|| ValidatorError::MissingPresenceVerifier { rule: rule.to_owned() })
}

rule! {
    /// No stored record may hold the value, except the one named by `except`.
    pub Unique => "unique" ["collection", "column", "except"];
    message "The :attribute has been used";
    check(self, value, ctx) {
        let collection = self.params.value(Self::KEY, "collection")?;
        let verifier = verifier(Self::KEY, ctx)?;
        let column = column(self.params.get("column"), ctx);
        Ok(verifier.count(collection, column, value, self.params.get("except")) == 0)
    }
    fn unique(collection, column);
}

rule! {
    /// At least one stored record must hold the value.
    pub Exists => "exists" ["collection", "column"];
    message "The :attribute does not exist";
    check(self, value, ctx) {
        let collection = self.params.value(Self::KEY, "collection")?;
        let verifier = verifier(Self::KEY, ctx)?;
        let column = column(self.params.get("column"), ctx);
        Ok(verifier.count(collection, column, value, None) > 0)
    }
    fn exists(collection, column);
}
