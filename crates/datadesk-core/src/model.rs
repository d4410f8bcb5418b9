// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Canadian province/territory codes accepted in the `region` field.
pub const REGIONS: [&str; 13] = [
    "AB", "BC", "MB", "NB", "NL", "NS", "NT", "NU", "ON", "PE", "QC", "SK", "YT",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Environment {
    Staging,
    Production,
}

impl Environment {
    pub const ALL: [Self; 2] = [Self::Staging, Self::Production];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Staging => "Staging",
            Self::Production => "Production",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "staging" => Some(Self::Staging),
            "production" => Some(Self::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" | "viewer" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub const fn can_access_production(self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// One master-data domain, rendered as a tab in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DomainKind {
    Partnerships,
    Customers,
    Products,
    Suppliers,
}

impl DomainKind {
    pub const ALL: [Self; 4] = [
        Self::Partnerships,
        Self::Customers,
        Self::Products,
        Self::Suppliers,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Partnerships => "partnerships",
            Self::Customers => "customers",
            Self::Products => "products",
            Self::Suppliers => "suppliers",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Partnerships => "Partnerships",
            Self::Customers => "Customers",
            Self::Products => "Products",
            Self::Suppliers => "Suppliers",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "partnerships" => Some(Self::Partnerships),
            "customers" => Some(Self::Customers),
            "products" => Some(Self::Products),
            "suppliers" => Some(Self::Suppliers),
            _ => None,
        }
    }

    /// Field holding the record's stable identifier.
    pub const fn key_field(self) -> &'static str {
        "id"
    }

    /// Field the top-level stat cards group by.
    pub const fn status_field(self) -> &'static str {
        match self {
            Self::Partnerships | Self::Customers => "status",
            Self::Products => "category",
            Self::Suppliers => "location",
        }
    }

    /// Display order for table columns.
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Partnerships => &[
                "id",
                "name",
                "status",
                "region",
                "tier",
                "source_type",
                "point_contact",
                "internal_contact",
            ],
            Self::Customers => &["id", "name", "email", "status", "created"],
            Self::Products => &["id", "name", "category", "price", "stock"],
            Self::Suppliers => &["id", "name", "contact", "location", "rating"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    Active,
    Inactive,
    Pending,
    Suspended,
}

impl RecordStatus {
    pub const ALL: [Self; 4] = [Self::Active, Self::Inactive, Self::Pending, Self::Suspended];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Pending => "Pending",
            Self::Suspended => "Suspended",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    Email,
    Portal,
    Phone,
    Meeting,
    Referral,
}

impl SourceType {
    pub const ALL: [Self; 5] = [
        Self::Email,
        Self::Portal,
        Self::Phone,
        Self::Meeting,
        Self::Referral,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Portal => "Portal",
            Self::Phone => "Phone",
            Self::Meeting => "Meeting",
            Self::Referral => "Referral",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// One scalar field value. Records carry no fixed schema; every field is
/// text, a number, or null, and a missing field reads as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Null,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub const fn number(value: f64) -> Self {
        Self::Number(value)
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Stringified form used for search matching and table cells. Null reads
    /// as the empty string.
    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    format!("{}", *value as i64)
                } else {
                    value.to_string()
                }
            }
            Self::Null => String::new(),
        }
    }

    /// Exact-match test against a field-filter value. Text compares
    /// case-insensitively after trimming; numbers compare numerically when
    /// the filter value parses. Null never equals a concrete value.
    pub fn matches_filter(&self, wanted: &str) -> bool {
        match self {
            Self::Text(value) => value.trim().eq_ignore_ascii_case(wanted.trim()),
            Self::Number(value) => wanted
                .trim()
                .parse::<f64>()
                .is_ok_and(|parsed| parsed.total_cmp(value) == Ordering::Equal),
            Self::Null => false,
        }
    }

    /// Ordering between two concrete values. Null ordering is the sort
    /// engine's responsibility (nulls always sort last), so this falls back
    /// to display-string comparison for mixed or null operands.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            (Self::Number(left), Self::Number(right)) => left.total_cmp(right),
            _ => self.display().cmp(&other.display()),
        }
    }
}

/// One row of master data: an ordered mapping from field name to scalar.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldValue)>,
        S: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// Stringified value of `field`; missing or null fields read as "".
    pub fn display(&self, field: &str) -> String {
        self.fields
            .get(field)
            .map(FieldValue::display)
            .unwrap_or_default()
    }

    /// The record identifier under `key_field`, if present and non-empty.
    pub fn key(&self, key_field: &str) -> Option<String> {
        let key = self.display(key_field);
        if key.is_empty() { None } else { Some(key) }
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.values()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Validates a comma-separated region list against the known codes.
pub fn validate_region_list(value: &str) -> Result<()> {
    for token in value.split(',') {
        let code = token.trim();
        if !REGIONS.contains(&code) {
            bail!("invalid region {code:?}; valid regions: {}", REGIONS.join(", "));
        }
    }
    Ok(())
}

/// Minimal contact-email shape check, matching the upstream source of truth.
pub fn validate_contact_email(value: &str) -> Result<()> {
    if !value.is_empty() && !value.contains('@') {
        bail!("invalid contact email {value:?}");
    }
    Ok(())
}

/// Fields holding contact emails across the domain schemas.
const EMAIL_FIELDS: [&str; 3] = ["email", "point_contact", "contact"];

/// Runs the backend's field checks against one record. Bad values are
/// reported, not rejected; the dashboard still shows what the backend
/// holds.
pub fn record_quality_issues(record: &Record) -> Vec<String> {
    let mut issues = Vec::new();
    if let Some(FieldValue::Text(region)) = record.get("region")
        && let Err(error) = validate_region_list(region)
    {
        issues.push(error.to_string());
    }
    for field in EMAIL_FIELDS {
        if let Some(FieldValue::Text(value)) = record.get(field)
            && let Err(error) = validate_contact_email(value)
        {
            issues.push(error.to_string());
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::{
        DomainKind, Environment, FieldValue, Record, RecordStatus, Role, record_quality_issues,
        validate_contact_email, validate_region_list,
    };

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(RecordStatus::parse("active"), Some(RecordStatus::Active));
        assert_eq!(RecordStatus::parse(" Inactive "), Some(RecordStatus::Inactive));
        assert_eq!(RecordStatus::parse("retired"), None);
    }

    #[test]
    fn environment_round_trips_through_strings() {
        for environment in Environment::ALL {
            assert_eq!(Environment::parse(environment.as_str()), Some(environment));
        }
        assert_eq!(Environment::parse("prod"), None);
    }

    #[test]
    fn only_admins_reach_production() {
        assert!(Role::Admin.can_access_production());
        assert!(!Role::User.can_access_production());
    }

    #[test]
    fn null_field_displays_as_empty_and_matches_nothing() {
        let value = FieldValue::Null;
        assert_eq!(value.display(), "");
        assert!(!value.matches_filter("Active"));
        assert!(!value.matches_filter(""));
    }

    #[test]
    fn number_display_drops_integral_fraction() {
        assert_eq!(FieldValue::number(45.0).display(), "45");
        assert_eq!(FieldValue::number(4.8).display(), "4.8");
    }

    #[test]
    fn text_filter_match_trims_and_ignores_case() {
        let value = FieldValue::text("Active");
        assert!(value.matches_filter("active"));
        assert!(value.matches_filter(" ACTIVE "));
        assert!(!value.matches_filter("act"));
    }

    #[test]
    fn record_key_requires_non_empty_value() {
        let record = Record::from_pairs([
            ("id", FieldValue::text("LL")),
            ("name", FieldValue::text("Leaf Life")),
        ]);
        assert_eq!(record.key("id"), Some("LL".to_owned()));

        let blank = Record::from_pairs([("id", FieldValue::Null)]);
        assert_eq!(blank.key("id"), None);
        assert_eq!(blank.key("missing"), None);
    }

    #[test]
    fn every_domain_lists_its_key_and_status_columns() {
        for domain in DomainKind::ALL {
            assert!(domain.columns().contains(&domain.key_field()));
            assert!(domain.columns().contains(&domain.status_field()));
        }
    }

    #[test]
    fn region_list_validation_accepts_multi_region_values() {
        assert!(validate_region_list("AB").is_ok());
        assert!(validate_region_list("AB, MB").is_ok());
        let error = validate_region_list("AB,XX").expect_err("unknown region should fail");
        assert!(error.to_string().contains("invalid region \"XX\""));
    }

    #[test]
    fn contact_email_requires_at_sign_when_present() {
        assert!(validate_contact_email("").is_ok());
        assert!(validate_contact_email("dylan@example.com").is_ok());
        assert!(validate_contact_email("not-an-email").is_err());
    }

    #[test]
    fn quality_issues_report_bad_regions_and_emails() {
        let clean = Record::from_pairs([
            ("region", FieldValue::text("AB, MB")),
            ("point_contact", FieldValue::text("dylan@example.com")),
        ]);
        assert!(record_quality_issues(&clean).is_empty());

        let flagged = Record::from_pairs([
            ("region", FieldValue::text("AB,XX")),
            ("email", FieldValue::text("not-an-email")),
        ]);
        let issues = record_quality_issues(&flagged);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("invalid region \"XX\""));
        assert!(issues[1].contains("invalid contact email"));
    }
}
