use std::sync::Arc;

use uuid::Uuid;

use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::{
    Car, CarResponse, CarUpdate, NewCar, PaginatedResponse, Pagination, PaginationMeta,
    PaginationQuery,
};
use crate::repository::CarRepository;

/// Orchestrates car use cases on top of a [`CarRepository`]. Validation
/// has already happened by the time a request reaches this layer.
#[derive(Clone)]
pub struct CarService {
    repo: Arc<dyn CarRepository>,
}

impl CarService {
    pub fn new(repo: Arc<dyn CarRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_car(&self, input: NewCar) -> Result<CarResponse, AppError> {
        let car = Car::new(input.name, input.engine_version);
        self.repo.create(&car).await?;
        tracing::debug!("{} Created car {}", API_NAME, car.id);
        Ok(CarResponse::from(&car))
    }

    pub async fn get_car_by_id(&self, id: Uuid) -> Result<CarResponse, AppError> {
        let car = self.repo.find_by_id(id).await?;
        Ok(CarResponse::from(&car))
    }

    pub async fn list_cars(&self, query: &PaginationQuery) -> Result<PaginatedResponse, AppError> {
        let pagination = Pagination::from_query(query);
        let (cars, total_records) = self.repo.find_all(&pagination).await?;

        let data = cars.iter().map(CarResponse::from).collect();
        let total_pages = (total_records + pagination.page_size - 1) / pagination.page_size;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta {
                current_page: pagination.page,
                page_size: pagination.page_size,
                total_pages,
                total_records,
            },
        })
    }

    pub async fn update_car(&self, id: Uuid, update: CarUpdate) -> Result<CarResponse, AppError> {
        let mut car = self.repo.find_by_id(id).await?;
        if let Some(name) = update.name {
            car.name = name;
        }
        if let Some(engine_version) = update.engine_version {
            car.engine_version = engine_version;
        }
        self.repo.update(&car).await?;
        tracing::debug!("{} Updated car {}", API_NAME, id);

        // Re-read so the response carries the store-stamped updated_at.
        let refreshed = self.repo.find_by_id(id).await?;
        Ok(CarResponse::from(&refreshed))
    }

    pub async fn delete_car(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(id).await?;
        tracing::debug!("{} Deleted car {}", API_NAME, id);
        Ok(())
    }
}
