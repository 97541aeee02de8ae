pub mod car;
pub mod dto;

pub use car::{Car, CarState, ENGINE_VERSIONS};
pub use dto::{
    CarResponse, CarUpdate, CreateCarRequest, NewCar, PaginatedResponse, Pagination,
    PaginationMeta, PaginationQuery, SortDirection, SortField, UpdateCarRequest,
};
