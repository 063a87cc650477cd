//! Input sanitization and per-field validation.
//!
//! Every write path goes through one of the `Validated*` constructors
//! below, so handlers never touch raw payload fields directly.

use chrono::{DateTime, Months, NaiveDate, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use validator::ValidateEmail;

use crate::domain::{
    Category, Industry, NewUser, SaleStatus, StringUuid,
};

pub const MAX_AMOUNT: f64 = 99_999_999.99;
pub const MIN_SALE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2000, 1, 1) {
    Some(d) => d,
    None => panic!("static date"),
};

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref JS_SCHEME: Regex = Regex::new(r"(?i)javascript:").unwrap();
    static ref EVENT_HANDLER: Regex = Regex::new(r"(?i)on\w+\s*=").unwrap();
    static ref NAME_CHARS: Regex = Regex::new(r"^[\p{Latin}\s'\-]+$").unwrap();
    static ref PHONE_CHARS: Regex = Regex::new(r"^\+?\d+$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError {
            field,
            message: message.into(),
        }
    }
}

type Result<T> = std::result::Result<T, ValidationError>;

/// Strips HTML tags, `javascript:` schemes and inline event handlers,
/// trims whitespace and truncates to `max_len` characters.
pub fn sanitize_text(input: &str, max_len: usize) -> String {
    let text = HTML_TAG.replace_all(input, "");
    let text = JS_SCHEME.replace_all(&text, "");
    let text = EVENT_HANDLER.replace_all(&text, "");
    let text = text.trim();
    text.chars().take(max_len).collect()
}

pub fn validate_name(field: &'static str, input: &str) -> Result<String> {
    let name = sanitize_text(input, 100);
    if name.chars().count() < 2 {
        return Err(ValidationError::new(
            field,
            "must be at least 2 characters long",
        ));
    }
    if !NAME_CHARS.is_match(&name) {
        return Err(ValidationError::new(
            field,
            "may only contain letters, spaces, hyphens and apostrophes",
        ));
    }
    Ok(name)
}

/// Normalizes to lowercase, strips `+tag` aliases from the local part
/// and checks syntax. Returns the normalized address.
pub fn validate_email(input: &str) -> Result<String> {
    let email = input.trim().to_lowercase();
    let email = match email.split_once('@') {
        Some((local, domain)) => {
            let local = local.split('+').next().unwrap_or(local);
            format!("{local}@{domain}")
        }
        None => email,
    };
    if email.chars().count() > 100 || !email.validate_email() {
        return Err(ValidationError::new("email", "is not a valid email address"));
    }
    Ok(email)
}

/// Strips spaces, hyphens and parentheses, then requires 8 to 15 digits
/// with an optional leading `+`. Returns the cleaned number.
pub fn validate_phone(input: &str) -> Result<String> {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = cleaned.trim_start_matches('+').chars().count();
    if !PHONE_CHARS.is_match(&cleaned) || !(8..=15).contains(&digits) {
        return Err(ValidationError::new(
            "phone",
            "must be 8 to 15 digits, optionally prefixed with +",
        ));
    }
    Ok(cleaned)
}

/// Accepts a non-negative amount up to 99,999,999.99 and rounds it to
/// 2 decimal places, half away from zero.
pub fn validate_amount(field: &'static str, input: f64) -> Result<Decimal> {
    if !input.is_finite() || input < 0.0 {
        return Err(ValidationError::new(field, "must be a non-negative number"));
    }
    if input > MAX_AMOUNT {
        return Err(ValidationError::new(
            field,
            format!("must not exceed {MAX_AMOUNT}"),
        ));
    }
    let amount = Decimal::from_f64(input)
        .ok_or_else(|| ValidationError::new(field, "must be a non-negative number"))?;
    Ok(amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Parses an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (taken as
/// midnight UTC). Dates before 2000-01-01 or more than ten years in the
/// future are rejected.
pub fn validate_date(field: &'static str, input: &str) -> Result<DateTime<Utc>> {
    let date = DateTime::parse_from_rfc3339(input.trim())
        .map(|d| d.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
                .map(|d| Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap_or_default()))
        })
        .map_err(|_| ValidationError::new(field, "is not a valid date"))?;

    if date.date_naive() < MIN_SALE_DATE {
        return Err(ValidationError::new(field, "must not be before 2000-01-01"));
    }
    let horizon = Utc::now()
        .checked_add_months(Months::new(120))
        .unwrap_or_else(Utc::now);
    if date > horizon {
        return Err(ValidationError::new(
            field,
            "must not be more than 10 years in the future",
        ));
    }
    Ok(date)
}

pub fn validate_password(input: &str) -> Result<&str> {
    let len = input.chars().count();
    if !(6..=128).contains(&len) {
        return Err(ValidationError::new(
            "password",
            "must be between 6 and 128 characters long",
        ));
    }
    if !input.chars().any(|c| c.is_ascii_alphabetic())
        || !input.chars().any(|c| c.is_ascii_digit())
    {
        return Err(ValidationError::new(
            "password",
            "must contain at least one letter and one digit",
        ));
    }
    Ok(input)
}

fn parse_uuid(field: &'static str, input: &str) -> Result<StringUuid> {
    input
        .trim()
        .parse()
        .map_err(|_| ValidationError::new(field, "is not a valid id"))
}

/// A client payload that passed field validation.
#[derive(Debug, Clone)]
pub struct ValidatedClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub industry: Option<Industry>,
    pub notes: String,
}

impl ValidatedClient {
    pub fn from_payload(payload: crate::domain::ClientPayload) -> Result<Self> {
        let name = validate_name("name", &payload.name)?;
        let email = payload
            .email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .map(validate_email)
            .transpose()?;
        let phone = payload
            .phone
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(validate_phone)
            .transpose()?;
        let industry = payload
            .industry
            .as_deref()
            .filter(|i| !i.trim().is_empty())
            .map(|i| {
                i.trim()
                    .parse::<Industry>()
                    .map_err(|_| ValidationError::new("industry", "is not a known industry"))
            })
            .transpose()?;
        let notes = payload
            .notes
            .as_deref()
            .map(|n| sanitize_text(n, 1000))
            .unwrap_or_default();
        Ok(ValidatedClient {
            name,
            email,
            phone,
            industry,
            notes,
        })
    }
}

/// A sale payload that passed field validation.
#[derive(Debug, Clone)]
pub struct ValidatedSale {
    pub client_id: StringUuid,
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub status: SaleStatus,
}

impl ValidatedSale {
    pub fn from_payload(payload: crate::domain::SalePayload) -> Result<Self> {
        let client_id = parse_uuid("clientId", &payload.client_id)?;
        let amount = validate_amount("amount", payload.amount)?;
        let description = payload
            .description
            .as_deref()
            .map(|d| sanitize_text(d, 500))
            .unwrap_or_default();
        let date = validate_date("date", &payload.date)?;
        let status = payload
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse::<SaleStatus>()
                    .map_err(|_| ValidationError::new("status", "is not a known status"))
            })
            .transpose()?
            .unwrap_or(SaleStatus::Pending);
        Ok(ValidatedSale {
            client_id,
            amount,
            description,
            date,
            status,
        })
    }
}

/// A product payload that passed field validation.
#[derive(Debug, Clone)]
pub struct ValidatedProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub sku: Option<String>,
    pub stock: i64,
    pub is_active: bool,
}

impl ValidatedProduct {
    pub fn from_payload(payload: crate::domain::ProductPayload) -> Result<Self> {
        let name = sanitize_text(&payload.name, 200);
        if name.chars().count() < 2 {
            return Err(ValidationError::new(
                "name",
                "must be at least 2 characters long",
            ));
        }
        let description = payload
            .description
            .as_deref()
            .map(|d| sanitize_text(d, 1000))
            .unwrap_or_default();
        let price = validate_amount("price", payload.price)?;
        let category = payload
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(|c| {
                c.trim()
                    .parse::<Category>()
                    .map_err(|_| ValidationError::new("category", "is not a known category"))
            })
            .transpose()?
            .unwrap_or(Category::Product);
        let sku = payload
            .sku
            .as_deref()
            .map(|s| sanitize_text(s, 64))
            .filter(|s| !s.is_empty());
        let stock = payload.stock.unwrap_or(0);
        if stock < 0 {
            return Err(ValidationError::new("stock", "must not be negative"));
        }
        Ok(ValidatedProduct {
            name,
            description,
            price,
            category,
            sku,
            stock,
            is_active: payload.is_active.unwrap_or(true),
        })
    }
}

/// A registration payload that passed field validation.
#[derive(Debug, Clone)]
pub struct ValidatedUser(pub NewUser);

impl ValidatedUser {
    pub fn from_payload(payload: crate::domain::RegisterPayload) -> Result<Self> {
        let name = validate_name("name", &payload.name)?;
        let email = validate_email(&payload.email)?;
        validate_password(&payload.password)?;
        Ok(ValidatedUser(NewUser {
            name,
            email,
            password: payload.password,
        }))
    }
}
