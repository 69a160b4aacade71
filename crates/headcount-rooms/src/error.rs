use headcount_ui::ConfigError;
use thiserror::Error;

use crate::RoomId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("a form needs at least one room")]
    NoRooms,
    #[error("guest count cannot be negative (got {0})")]
    NegativeGuests(i64),
    #[error("no room with id {0:?}")]
    UnknownRoom(RoomId),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
