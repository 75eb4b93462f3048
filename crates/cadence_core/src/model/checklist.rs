//! Checklist catalog model.
//!
//! # Responsibility
//! - Define templates, items, audience scopes and per-user overrides.
//! - Resolve the recurrence anchor of an item explicitly.
//!
//! # Invariants
//! - `is_active` is the only state flag on templates and items.
//! - An item anchor is `rule.start_date`, else the UTC date of `created_at`.
//! - Audience is an explicit field; titles carry no visibility meaning.

use crate::model::recurrence::{RecurrenceRule, RuleValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

pub type TemplateId = Uuid;
pub type ItemId = Uuid;
pub type UserId = Uuid;

/// Role a dashboard user acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Sales,
    Recruiter,
    Secretary,
    Finance,
}

/// Querying user identity as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub role: UserRole,
}

impl UserRef {
    pub fn new(id: UserId, role: UserRole) -> Self {
        Self { id, role }
    }
}

/// Roles that see a template when it has no per-user overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudienceScope {
    /// Every role.
    #[default]
    AnyRole,
    /// Only the listed roles.
    Roles(BTreeSet<UserRole>),
}

impl AudienceScope {
    /// Scope limited to the given roles.
    pub fn roles(roles: impl IntoIterator<Item = UserRole>) -> Self {
        Self::Roles(roles.into_iter().collect())
    }

    /// Returns whether `role` belongs to this scope.
    pub fn includes(&self, role: UserRole) -> bool {
        match self {
            Self::AnyRole => true,
            Self::Roles(roles) => roles.contains(&role),
        }
    }
}

/// One recurring obligation inside a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ItemId,
    pub text: String,
    pub is_active: bool,
    /// Position inside the template; lower sorts first.
    pub order_index: u32,
    /// `None` behaves as daily.
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    pub created_at: DateTime<Utc>,
}

impl ChecklistItem {
    /// Creates an active daily item with a generated id.
    pub fn new(text: impl Into<String>, order_index: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_active: true,
            order_index,
            recurrence: None,
            created_at,
        }
    }

    /// Builder-style setter for the recurrence rule.
    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    /// Anchor day for interval rules: explicit `start_date`, else creation day.
    pub fn anchor_date(&self) -> NaiveDate {
        self.recurrence
            .as_ref()
            .and_then(RecurrenceRule::start_date)
            .unwrap_or_else(|| self.created_at.date_naive())
    }

    /// Validates the attached rule; items without a rule are always valid.
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        match &self.recurrence {
            Some(rule) => rule.validate(),
            None => Ok(()),
        }
    }
}

/// Named group of checklist items with one audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistTemplate {
    pub id: TemplateId,
    pub title: String,
    pub is_active: bool,
    #[serde(default)]
    pub audience_scope: AudienceScope,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

impl ChecklistTemplate {
    /// Creates an active, empty template visible to every role.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            is_active: true,
            audience_scope: AudienceScope::AnyRole,
            items: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: AudienceScope) -> Self {
        self.audience_scope = scope;
        self
    }

    pub fn with_item(mut self, item: ChecklistItem) -> Self {
        self.items.push(item);
        self
    }

    /// Active items ordered by `order_index`, ties kept in insertion order.
    pub fn active_items(&self) -> Vec<&ChecklistItem> {
        let mut items: Vec<&ChecklistItem> =
            self.items.iter().filter(|item| item.is_active).collect();
        items.sort_by_key(|item| item.order_index);
        items
    }
}

/// Per-user allow-list entry for one template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentOverride {
    pub template_id: TemplateId,
    pub user_id: UserId,
}

impl AssignmentOverride {
    pub fn new(template_id: TemplateId, user_id: UserId) -> Self {
        Self {
            template_id,
            user_id,
        }
    }
}

/// Read snapshot of the template catalog and its overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub templates: Vec<ChecklistTemplate>,
    #[serde(default)]
    pub overrides: Vec<AssignmentOverride>,
}
