//! Request-shape validation at the front door: required fields, pagination
//! bounds, date sanity. Anything passing here is forwarded; the server
//! still enforces the business rules.

use chrono::Utc;

use crate::errors::GatewayError;
use common::dto::{
    NewBookingDto, NewCommentDto, NewItemDto, NewItemRequestDto, NewUserDto, UpdateItemDto,
    UpdateUserDto,
};

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, GatewayError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(GatewayError::Validation(format!("{field} is required"))),
    }
}

fn check_email(email: &str) -> Result<(), GatewayError> {
    if !email.contains('@') {
        return Err(GatewayError::Validation(format!("invalid email: {email}")));
    }
    Ok(())
}

/// `from >= 0`, `size > 0`, with the documented defaults.
pub fn pagination(from: Option<i64>, size: Option<i64>) -> Result<(u64, u64), GatewayError> {
    let from = from.unwrap_or(0);
    let size = size.unwrap_or(20);
    if from < 0 {
        return Err(GatewayError::Validation("pagination error: from must be >= 0".into()));
    }
    if size <= 0 {
        return Err(GatewayError::Validation("pagination error: size must be > 0".into()));
    }
    Ok((from as u64, size as u64))
}

pub fn new_user(dto: &NewUserDto) -> Result<(), GatewayError> {
    required(dto.name.as_deref(), "name")?;
    let email = required(dto.email.as_deref(), "email")?;
    check_email(email)
}

pub fn update_user(dto: &UpdateUserDto) -> Result<(), GatewayError> {
    if let Some(name) = dto.name.as_deref() {
        required(Some(name), "name")?;
    }
    if let Some(email) = dto.email.as_deref() {
        check_email(email)?;
    }
    Ok(())
}

pub fn new_item(dto: &NewItemDto) -> Result<(), GatewayError> {
    required(dto.name.as_deref(), "name")?;
    required(dto.description.as_deref(), "description")?;
    if dto.available.is_none() {
        return Err(GatewayError::Validation("available is required".into()));
    }
    Ok(())
}

pub fn update_item(dto: &UpdateItemDto) -> Result<(), GatewayError> {
    if let Some(name) = dto.name.as_deref() {
        required(Some(name), "name")?;
    }
    if let Some(description) = dto.description.as_deref() {
        required(Some(description), "description")?;
    }
    Ok(())
}

/// Interval sanity for booking creation: both bounds present, ordered,
/// strictly in the future, non-degenerate.
pub fn new_booking(dto: &NewBookingDto) -> Result<(), GatewayError> {
    if dto.item_id.is_none() {
        return Err(GatewayError::Validation("itemId is required".into()));
    }
    let start = dto
        .start
        .ok_or_else(|| GatewayError::Validation("start is required".into()))?;
    let end = dto
        .end
        .ok_or_else(|| GatewayError::Validation("end is required".into()))?;
    let now = Utc::now();
    if end <= start {
        return Err(GatewayError::Validation("end must be after start".into()));
    }
    if start <= now || end <= now {
        return Err(GatewayError::Validation("booking interval must lie in the future".into()));
    }
    Ok(())
}

pub fn comment(dto: &NewCommentDto) -> Result<(), GatewayError> {
    required(dto.text.as_deref(), "text")?;
    Ok(())
}

pub fn new_request(dto: &NewItemRequestDto) -> Result<(), GatewayError> {
    required(dto.description.as_deref(), "description")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn pagination_bounds() {
        assert_eq!(pagination(None, None).unwrap(), (0, 20));
        assert_eq!(pagination(Some(40), Some(10)).unwrap(), (40, 10));
        assert!(pagination(Some(-1), Some(10)).is_err());
        assert!(pagination(Some(0), Some(0)).is_err());
        assert!(pagination(Some(0), Some(-5)).is_err());
    }

    #[test]
    fn booking_interval_sanity() {
        let now = Utc::now();
        let ok = NewBookingDto {
            item_id: Some(1),
            start: Some(now + Duration::hours(1)),
            end: Some(now + Duration::hours(2)),
        };
        assert!(new_booking(&ok).is_ok());

        let swapped = NewBookingDto { start: ok.end, end: ok.start, ..ok.clone() };
        assert!(new_booking(&swapped).is_err());

        let in_past = NewBookingDto {
            start: Some(now - Duration::hours(2)),
            end: Some(now - Duration::hours(1)),
            ..ok.clone()
        };
        assert!(new_booking(&in_past).is_err());

        let degenerate = NewBookingDto { end: ok.start, ..ok.clone() };
        assert!(new_booking(&degenerate).is_err());

        let missing = NewBookingDto { item_id: Some(1), start: None, end: None };
        assert!(new_booking(&missing).is_err());
    }

    #[test]
    fn user_shape() {
        let ok = NewUserDto { name: Some("Bob".into()), email: Some("bob@example.com".into()) };
        assert!(new_user(&ok).is_ok());
        let bad_email = NewUserDto { email: Some("bob.example.com".into()), ..ok.clone() };
        assert!(new_user(&bad_email).is_err());
        let blank_name = NewUserDto { name: Some("  ".into()), ..ok };
        assert!(new_user(&blank_name).is_err());
        // Partial update may omit everything.
        assert!(update_user(&UpdateUserDto::default()).is_ok());
    }

    #[test]
    fn item_shape() {
        let ok = NewItemDto {
            name: Some("drill".into()),
            description: Some("cordless".into()),
            available: Some(true),
            request_id: None,
        };
        assert!(new_item(&ok).is_ok());
        assert!(new_item(&NewItemDto { available: None, ..ok.clone() }).is_err());
        assert!(new_item(&NewItemDto { name: None, ..ok }).is_err());
    }

    #[test]
    fn text_fields_must_not_be_blank() {
        assert!(comment(&NewCommentDto { text: Some("fine".into()) }).is_ok());
        assert!(comment(&NewCommentDto { text: Some("   ".into()) }).is_err());
        assert!(new_request(&NewItemRequestDto { description: None }).is_err());
    }
}
