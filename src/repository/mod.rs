mod car_repo;
mod errors;
mod memory;

pub use car_repo::{CarRepository, PgCarRepository};
pub use errors::RepoError;
pub use memory::InMemoryCarRepository;
