//! Wire DTOs shared by the gateway and the server.
//!
//! Create/update payloads keep optional fields so the gateway can report
//! missing values as 400s instead of body-rejection errors; the service
//! layer re-validates on its side.

pub mod booking;
pub mod item;
pub mod request;
pub mod user;

pub use booking::{BookingDto, BookingShortDto, NewBookingDto};
pub use item::{CommentDto, ItemDto, ItemShortDto, NewCommentDto, NewItemDto, UpdateItemDto};
pub use request::{ItemRequestDto, NewItemRequestDto};
pub use user::{NewUserDto, UpdateUserDto, UserDto};
