use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::car_repo::CarRepository;
use super::errors::RepoError;
use crate::models::{Car, CarState, Pagination, SortDirection, SortField};

/// Process-local [`CarRepository`] with the same observable behavior as
/// the Postgres implementation, including soft delete visibility. Used
/// by the test suites; also handy for local runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryCarRepository {
    cars: Mutex<HashMap<Uuid, Car>>,
}

impl InMemoryCarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_store<T>(&self, f: impl FnOnce(&mut HashMap<Uuid, Car>) -> T) -> T {
        let mut cars = self.cars.lock().expect("car store mutex poisoned");
        f(&mut cars)
    }
}

#[async_trait]
impl CarRepository for InMemoryCarRepository {
    async fn create(&self, car: &Car) -> Result<(), RepoError> {
        self.with_store(|cars| {
            cars.insert(car.id, car.clone());
        });
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Car, RepoError> {
        self.with_store(|cars| {
            cars.get(&id)
                .filter(|car| !car.is_deleted())
                .cloned()
                .ok_or(RepoError::NotFound)
        })
    }

    async fn find_all(&self, pagination: &Pagination) -> Result<(Vec<Car>, i64), RepoError> {
        self.with_store(|cars| {
            let mut live: Vec<Car> = cars
                .values()
                .filter(|car| !car.is_deleted())
                .cloned()
                .collect();

            live.sort_by(|a, b| {
                let ordering = match pagination.sort_field {
                    SortField::Name => a.name.cmp(&b.name),
                    SortField::EngineVersion => a.engine_version.cmp(&b.engine_version),
                    SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                };
                match pagination.sort_direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });

            let total = live.len() as i64;
            let page = live
                .into_iter()
                .skip(pagination.offset().max(0) as usize)
                .take(pagination.page_size.max(0) as usize)
                .collect();

            Ok((page, total))
        })
    }

    async fn update(&self, car: &Car) -> Result<(), RepoError> {
        self.with_store(|cars| match cars.get_mut(&car.id) {
            Some(stored) if !stored.is_deleted() => {
                stored.name = car.name.clone();
                stored.engine_version = car.engine_version.clone();
                stored.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(RepoError::NotFound),
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.with_store(|cars| match cars.get_mut(&id) {
            Some(stored) if !stored.is_deleted() => {
                stored.state = CarState::Deleted { at: Utc::now() };
                Ok(())
            }
            _ => Err(RepoError::NotFound),
        })
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        self.with_store(|cars| Ok(cars.get(&id).is_some_and(|car| !car.is_deleted())))
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;

    fn pagination(page: i64, page_size: i64, sort_by: &str, sort_dir: &str) -> Pagination {
        Pagination::from_query(&PaginationQuery {
            page: Some(page),
            page_size: Some(page_size),
            sort_by: Some(sort_by.to_string()),
            sort_dir: Some(sort_dir.to_string()),
        })
    }

    async fn seeded_repo(names: &[&str]) -> InMemoryCarRepository {
        let repo = InMemoryCarRepository::new();
        for name in names {
            repo.create(&Car::new(name.to_string(), "2.0".to_string()))
                .await
                .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn find_all_sorts_by_name_in_both_directions() {
        let repo = seeded_repo(&["Citroen C4", "Audi A4", "BMW i3"]).await;

        let (asc, total) = repo
            .find_all(&pagination(1, 10, "name", "asc"))
            .await
            .unwrap();
        assert_eq!(total, 3);
        let names: Vec<&str> = asc.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Audi A4", "BMW i3", "Citroen C4"]);

        let (desc, _) = repo
            .find_all(&pagination(1, 10, "name", "desc"))
            .await
            .unwrap();
        let names: Vec<&str> = desc.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Citroen C4", "BMW i3", "Audi A4"]);
    }

    #[tokio::test]
    async fn find_all_windows_past_the_offset() {
        let repo = seeded_repo(&["a1", "a2", "a3", "a4", "a5"]).await;

        let (page, total) = repo
            .find_all(&pagination(2, 2, "name", "asc"))
            .await
            .unwrap();
        assert_eq!(total, 5);
        let names: Vec<&str> = page.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a3", "a4"]);

        let (beyond, total) = repo
            .find_all(&pagination(9, 2, "name", "asc"))
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn deleted_cars_vanish_from_every_read() {
        let repo = seeded_repo(&["Audi A4", "BMW i3"]).await;
        let (all, _) = repo.find_all(&Pagination::default()).await.unwrap();
        let target = all[0].id;
        assert!(repo.exists(target).await.unwrap());

        repo.delete(target).await.unwrap();

        assert!(matches!(
            repo.find_by_id(target).await,
            Err(RepoError::NotFound)
        ));
        assert!(!repo.exists(target).await.unwrap());
        let (left, total) = repo.find_all(&Pagination::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(left.len(), 1);
        assert_ne!(left[0].id, target);
    }

    #[tokio::test]
    async fn second_delete_reports_not_found() {
        let repo = seeded_repo(&["Audi A4"]).await;
        let (all, _) = repo.find_all(&Pagination::default()).await.unwrap();
        let target = all[0].id;

        repo.delete(target).await.unwrap();
        assert!(matches!(
            repo.delete(target).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_stamps_a_fresh_updated_at() {
        let repo = seeded_repo(&["Audi A4"]).await;
        let (all, _) = repo.find_all(&Pagination::default()).await.unwrap();
        let mut car = all[0].clone();
        let created_at = car.created_at;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        car.name = "Audi A6".to_string();
        repo.update(&car).await.unwrap();

        let stored = repo.find_by_id(car.id).await.unwrap();
        assert_eq!(stored.name, "Audi A6");
        assert_eq!(stored.created_at, created_at);
        assert!(stored.updated_at > created_at);
    }
}
