//! Template audience resolution.
//!
//! # Responsibility
//! - Decide which active templates a user sees.
//!
//! # Invariants
//! - Inactive templates are never visible.
//! - A template with at least one override is an explicit allow-list: the
//!   user's role is not consulted.
//! - A template without overrides is visible to the roles in its
//!   `audience_scope`.

use crate::model::checklist::{
    AssignmentOverride, AudienceScope, ChecklistTemplate, TemplateId, UserId, UserRef,
};
use std::collections::BTreeSet;

/// Effective audience of one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience<'a> {
    /// Only these users, regardless of role.
    Explicit(BTreeSet<UserId>),
    /// Every user whose role is in the scope.
    Scope(&'a AudienceScope),
}

impl Audience<'_> {
    /// Returns whether `user` belongs to this audience.
    pub fn admits(&self, user: &UserRef) -> bool {
        match self {
            Self::Explicit(users) => users.contains(&user.id),
            Self::Scope(scope) => scope.includes(user.role),
        }
    }
}

/// Derives the audience of `template` from the override snapshot.
pub fn effective_audience<'a>(
    template: &'a ChecklistTemplate,
    overrides: &[AssignmentOverride],
) -> Audience<'a> {
    let assigned: BTreeSet<UserId> = overrides
        .iter()
        .filter(|entry| entry.template_id == template.id)
        .map(|entry| entry.user_id)
        .collect();

    if assigned.is_empty() {
        Audience::Scope(&template.audience_scope)
    } else {
        Audience::Explicit(assigned)
    }
}

/// Returns whether `user` sees `template`.
pub fn is_visible_to(
    template: &ChecklistTemplate,
    overrides: &[AssignmentOverride],
    user: &UserRef,
) -> bool {
    template.is_active && effective_audience(template, overrides).admits(user)
}

/// Ids of all templates visible to `user`.
pub fn visible_templates(
    templates: &[ChecklistTemplate],
    overrides: &[AssignmentOverride],
    user: &UserRef,
) -> BTreeSet<TemplateId> {
    visible_template_refs(templates, overrides, user)
        .into_iter()
        .map(|template| template.id)
        .collect()
}

/// Templates visible to `user`, in catalog order.
///
/// A template id listed twice in the catalog is returned once.
pub fn visible_template_refs<'a>(
    templates: &'a [ChecklistTemplate],
    overrides: &[AssignmentOverride],
    user: &UserRef,
) -> Vec<&'a ChecklistTemplate> {
    let mut seen = BTreeSet::new();
    templates
        .iter()
        .filter(|template| is_visible_to(template, overrides, user))
        .filter(|template| seen.insert(template.id))
        .collect()
}
