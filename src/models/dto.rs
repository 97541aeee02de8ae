use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::car::{Car, ENGINE_VERSIONS, NAME_MAX_CHARS, NAME_MIN_CHARS};
use crate::response::FieldError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

const MSG_REQUIRED: &str = "This field is required";
const MSG_TOO_SMALL: &str = "Value is too short or small";
const MSG_TOO_LARGE: &str = "Value is too long or large";

fn allowed_values_message(allowed: &[&str]) -> String {
    format!("Invalid value. Allowed values: {}", allowed.join(" "))
}

/// Inbound body for POST /cars. Fields are optional so that a missing
/// field surfaces as a validation error rather than a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCarRequest {
    pub name: Option<String>,
    pub engine_version: Option<String>,
}

/// A create request that passed validation.
#[derive(Debug, Clone)]
pub struct NewCar {
    pub name: String,
    pub engine_version: String,
}

impl CreateCarRequest {
    pub fn validate(self) -> Result<NewCar, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.name.unwrap_or_default();
        if name.is_empty() {
            errors.push(FieldError::new("name", MSG_REQUIRED));
        } else if let Err(message) = check_name_length(&name) {
            errors.push(FieldError::new("name", message));
        }

        let engine_version = self.engine_version.unwrap_or_default();
        if engine_version.is_empty() {
            errors.push(FieldError::new("engine_version", MSG_REQUIRED));
        } else if !ENGINE_VERSIONS.contains(&engine_version.as_str()) {
            errors.push(FieldError::new(
                "engine_version",
                allowed_values_message(ENGINE_VERSIONS),
            ));
        }

        if errors.is_empty() {
            Ok(NewCar {
                name,
                engine_version,
            })
        } else {
            Err(errors)
        }
    }
}

/// Inbound body for PUT /cars/{id}. An absent or empty field means
/// "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCarRequest {
    pub name: Option<String>,
    pub engine_version: Option<String>,
}

/// An update request that passed validation. `None` fields are not touched.
#[derive(Debug, Clone, Default)]
pub struct CarUpdate {
    pub name: Option<String>,
    pub engine_version: Option<String>,
}

impl UpdateCarRequest {
    pub fn validate(self) -> Result<CarUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.name.filter(|s| !s.is_empty());
        if let Some(name) = name.as_deref() {
            if let Err(message) = check_name_length(name) {
                errors.push(FieldError::new("name", message));
            }
        }

        let engine_version = self.engine_version.filter(|s| !s.is_empty());
        if let Some(engine_version) = engine_version.as_deref() {
            if !ENGINE_VERSIONS.contains(&engine_version) {
                errors.push(FieldError::new(
                    "engine_version",
                    allowed_values_message(ENGINE_VERSIONS),
                ));
            }
        }

        if errors.is_empty() {
            Ok(CarUpdate {
                name,
                engine_version,
            })
        } else {
            Err(errors)
        }
    }
}

fn check_name_length(name: &str) -> Result<(), &'static str> {
    let chars = name.chars().count();
    if chars < NAME_MIN_CHARS {
        Err(MSG_TOO_SMALL)
    } else if chars > NAME_MAX_CHARS {
        Err(MSG_TOO_LARGE)
    } else {
        Ok(())
    }
}

/// Raw pagination query string for GET /cars. Zero and empty values count
/// as omitted, mirroring how clients have always sent these parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

impl PaginationQuery {
    /// Field-level checks for values that were present but out of range.
    /// Normalization in [`Pagination::from_query`] never sees these,
    /// because the handler rejects the request first.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if let Some(page) = self.page {
            if page < 0 {
                errors.push(FieldError::new("page", MSG_TOO_SMALL));
            }
        }

        if let Some(page_size) = self.page_size {
            if page_size < 0 {
                errors.push(FieldError::new("page_size", MSG_TOO_SMALL));
            } else if page_size > MAX_PAGE_SIZE {
                errors.push(FieldError::new("page_size", MSG_TOO_LARGE));
            }
        }

        if let Some(sort_by) = self.sort_by.as_deref() {
            if !sort_by.is_empty() && SortField::parse(sort_by).is_none() {
                errors.push(FieldError::new(
                    "sort_by",
                    allowed_values_message(&["name", "engine_version", "created_at"]),
                ));
            }
        }

        if let Some(sort_dir) = self.sort_dir.as_deref() {
            if !sort_dir.is_empty() && SortDirection::parse(sort_dir).is_none() {
                errors.push(FieldError::new(
                    "sort_dir",
                    allowed_values_message(&["asc", "desc"]),
                ));
            }
        }

        errors
    }
}

/// Column a listing may be ordered by. Anything outside this enum can
/// never reach the store, so ordering clauses are injection-proof by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    EngineVersion,
    CreatedAt,
}

impl SortField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "engine_version" => Some(Self::EngineVersion),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::EngineVersion => "engine_version",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Normalized paging descriptor. Building one is total: whatever the
/// query held, the result is a valid page, size, and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl Pagination {
    pub fn from_query(query: &PaginationQuery) -> Self {
        let page = match query.page {
            Some(page) if page >= 1 => page,
            _ => DEFAULT_PAGE,
        };
        let page_size = match query.page_size {
            Some(size) if size >= 1 => size.min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        let sort_field = query
            .sort_by
            .as_deref()
            .and_then(SortField::parse)
            .unwrap_or(SortField::CreatedAt);
        let sort_direction = query
            .sort_dir
            .as_deref()
            .and_then(SortDirection::parse)
            .unwrap_or(SortDirection::Desc);

        Self {
            page,
            page_size,
            sort_field,
            sort_direction,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    pub fn order_by(&self) -> String {
        format!("{} {}", self.sort_field.column(), self.sort_direction.keyword())
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::from_query(&PaginationQuery::default())
    }
}

/// Wire representation of a car. Soft-deleted rows never reach this type.
#[derive(Debug, Clone, Serialize)]
pub struct CarResponse {
    pub id: Uuid,
    pub name: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Car> for CarResponse {
    fn from(car: &Car) -> Self {
        Self {
            id: car.id,
            name: car.name.clone(),
            engine_version: car.engine_version.clone(),
            created_at: car.created_at,
            updated_at: car.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse {
    pub data: Vec<CarResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub current_page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_records: i64,
}
