//! Explicit entity-to-DTO mapping: one pure function per pair.

use chrono::Utc;

use common::dto::{
    BookingDto, BookingShortDto, CommentDto, ItemDto, ItemRequestDto, ItemShortDto, UserDto,
};
use models::{booking, comment, item, request, user};

pub fn to_user_dto(u: user::Model) -> UserDto {
    UserDto { id: u.id, name: u.name, email: u.email }
}

pub fn to_item_short(i: &item::Model) -> ItemShortDto {
    ItemShortDto {
        id: i.id,
        name: i.name.clone(),
        description: i.description.clone(),
        available: i.available,
        owner_id: i.owner_id,
        request_id: i.request_id,
    }
}

pub fn to_item_dto(
    i: item::Model,
    last_booking: Option<BookingShortDto>,
    next_booking: Option<BookingShortDto>,
    comments: Vec<CommentDto>,
) -> ItemDto {
    ItemDto {
        id: i.id,
        name: i.name,
        description: i.description,
        available: i.available,
        request_id: i.request_id,
        last_booking,
        next_booking,
        comments,
    }
}

pub fn to_booking_short(b: &booking::Model) -> BookingShortDto {
    BookingShortDto {
        id: b.id,
        booker_id: b.booker_id,
        start: b.start_date.with_timezone(&Utc),
        end: b.end_date.with_timezone(&Utc),
    }
}

pub fn to_booking_dto(b: booking::Model, i: &item::Model, booker: &user::Model) -> BookingDto {
    BookingDto {
        id: b.id,
        start: b.start_date.with_timezone(&Utc),
        end: b.end_date.with_timezone(&Utc),
        status: b.status.as_str().to_string(),
        booker: UserDto { id: booker.id, name: booker.name.clone(), email: booker.email.clone() },
        item: to_item_short(i),
    }
}

pub fn to_comment_dto(c: comment::Model, author_name: String) -> CommentDto {
    CommentDto {
        id: c.id,
        text: c.text,
        author_name,
        created: c.created.with_timezone(&Utc),
    }
}

pub fn to_request_dto(r: request::Model, items: Vec<ItemShortDto>) -> ItemRequestDto {
    ItemRequestDto {
        id: r.id,
        description: r.description,
        created: r.created.with_timezone(&Utc),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::booking::BookingStatus;

    fn sample_item() -> item::Model {
        item::Model {
            id: 7,
            owner_id: 1,
            name: "drill".into(),
            description: "cordless drill".into(),
            available: true,
            request_id: Some(3),
        }
    }

    #[test]
    fn item_short_keeps_the_request_link() {
        let short = to_item_short(&sample_item());
        assert_eq!(short.id, 7);
        assert_eq!(short.owner_id, 1);
        assert_eq!(short.request_id, Some(3));
    }

    #[test]
    fn booking_dto_carries_status_as_wire_string() {
        let now = Utc::now();
        let b = booking::Model {
            id: 11,
            item_id: 7,
            booker_id: 2,
            start_date: now.into(),
            end_date: (now + chrono::Duration::hours(2)).into(),
            status: BookingStatus::Waiting,
        };
        let booker = user::Model { id: 2, name: "Bob".into(), email: "bob@example.com".into() };
        let dto = to_booking_dto(b, &sample_item(), &booker);
        assert_eq!(dto.status, "WAITING");
        assert_eq!(dto.booker.id, 2);
        assert_eq!(dto.item.id, 7);
    }

    #[test]
    fn request_dto_defaults_to_empty_item_list() {
        let r = request::Model {
            id: 3,
            requestor_id: 2,
            description: "need a ladder".into(),
            created: Utc::now().into(),
        };
        let dto = to_request_dto(r, Vec::new());
        assert!(dto.items.is_empty());
    }
}
