//! Staff domain types and validation rules.

use chrono::{DateTime, Utc};
use lodgekeep_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffId(Uuid);

impl StaffId {
    /// Creates a new random staff identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a staff identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for StaffId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StaffId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Activity state of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    /// Member is on duty and accrues active days.
    Active,
    /// Member is off duty; no active days accrue.
    Inactive,
}

impl StaffStatus {
    /// Returns the storage string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parses a storage string into a status.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown staff status '{value}'"
            ))),
        }
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let parts: Vec<&str> = trimmed.splitn(2, '@').collect();
        if parts.len() != 2 {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        let local = parts[0];
        let domain = parts[1];

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Validated ten-digit phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Creates a validated phone number: exactly ten ASCII digits.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_owned();

        if trimmed.len() != 10 || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(AppError::Validation(
                "phone must be a 10-digit number".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated phone string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// Staff member managed by one owner account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    staff_id: StaffId,
    name: NonEmptyString,
    role: NonEmptyString,
    email: EmailAddress,
    phone: PhoneNumber,
    status: StaffStatus,
    performance: u8,
    transaction_count: u32,
    last_active_at: Option<DateTime<Utc>>,
    recent_activity: Option<String>,
    created_at: DateTime<Utc>,
}

/// Raw column values used to rebuild a persisted staff member.
#[derive(Debug, Clone)]
pub struct StaffMemberParts {
    /// Unique staff identifier.
    pub staff_id: StaffId,
    /// Member display name.
    pub name: String,
    /// Member job role.
    pub role: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Stored status string.
    pub status: String,
    /// Last persisted performance score.
    pub performance: u8,
    /// Recorded number of handled transactions.
    pub transaction_count: u32,
    /// When the member was last seen active, if recorded.
    pub last_active_at: Option<DateTime<Utc>>,
    /// Free-form note about the member's latest activity, if recorded.
    pub recent_activity: Option<String>,
    /// When the member was added.
    pub created_at: DateTime<Utc>,
}

impl StaffMember {
    /// Creates a new staff member starting out active with no recorded
    /// transactions or performance history.
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            staff_id: StaffId::new(),
            name: NonEmptyString::new(name)?,
            role: NonEmptyString::new(role)?,
            email: EmailAddress::new(email)?,
            phone: PhoneNumber::new(phone)?,
            status: StaffStatus::Active,
            performance: 0,
            transaction_count: 0,
            last_active_at: None,
            recent_activity: None,
            created_at,
        })
    }

    /// Rebuilds a staff member from stored parts, re-validating every field.
    pub fn from_parts(parts: StaffMemberParts) -> AppResult<Self> {
        let StaffMemberParts {
            staff_id,
            name,
            role,
            email,
            phone,
            status,
            performance,
            transaction_count,
            last_active_at,
            recent_activity,
            created_at,
        } = parts;

        Ok(Self {
            staff_id,
            name: NonEmptyString::new(name)?,
            role: NonEmptyString::new(role)?,
            email: EmailAddress::new(email)?,
            phone: PhoneNumber::new(phone)?,
            status: StaffStatus::parse(&status)?,
            performance,
            transaction_count,
            last_active_at,
            recent_activity,
            created_at,
        })
    }

    /// Returns the unique staff identifier.
    #[must_use]
    pub fn staff_id(&self) -> StaffId {
        self.staff_id
    }

    /// Returns the member display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the member job role.
    #[must_use]
    pub fn role(&self) -> &NonEmptyString {
        &self.role
    }

    /// Returns the contact email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the contact phone number.
    #[must_use]
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    /// Returns the current activity status.
    #[must_use]
    pub fn status(&self) -> StaffStatus {
        self.status
    }

    /// Returns the last persisted performance score.
    #[must_use]
    pub fn performance(&self) -> u8 {
        self.performance
    }

    /// Returns the recorded number of handled transactions.
    #[must_use]
    pub fn transaction_count(&self) -> u32 {
        self.transaction_count
    }

    /// Returns when the member was last seen active, if recorded.
    #[must_use]
    pub fn last_active_at(&self) -> Option<DateTime<Utc>> {
        self.last_active_at
    }

    /// Returns the free-form note about the member's latest activity.
    #[must_use]
    pub fn recent_activity(&self) -> Option<&str> {
        self.recent_activity.as_deref()
    }

    /// Returns when the member was added.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the current activity status.
    pub fn set_status(&mut self, status: StaffStatus) {
        self.status = status;
    }

    /// Records a freshly computed performance score.
    pub fn record_performance(&mut self, score: u8) {
        self.performance = score;
    }

    /// Records the latest handled-transaction count.
    pub fn record_transactions(&mut self, count: u32) {
        self.transaction_count = count;
    }
}
