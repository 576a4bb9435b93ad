mod domain;
pub(crate) mod repository;
mod routes;

pub(crate) use self::routes::booking_router;
