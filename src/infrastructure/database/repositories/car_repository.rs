//! SeaORM implementation of CarRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::car::{Car, CarRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::car;

pub struct SeaOrmCarRepository {
    db: DatabaseConnection,
}

impl SeaOrmCarRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: car::Model) -> Car {
    Car {
        id: m.id,
        brand: m.brand,
        model: m.model,
        license_plate: m.license_plate,
        available: m.available,
        created_at: m.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("database error: {}", e))
}

// ── CarRepository impl ──────────────────────────────────────────

#[async_trait]
impl CarRepository for SeaOrmCarRepository {
    async fn save(&self, c: Car) -> DomainResult<()> {
        debug!("Saving car {} ({})", c.id, c.license_plate);

        let taken = car::Entity::find()
            .filter(car::Column::LicensePlate.eq(c.license_plate.clone()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if taken.is_some() {
            return Err(DomainError::Conflict(format!(
                "license plate '{}' already registered",
                c.license_plate
            )));
        }

        let model = car::ActiveModel {
            id: Set(c.id),
            brand: Set(c.brand),
            model: Set(c.model),
            license_plate: Set(c.license_plate),
            available: Set(c.available),
            created_at: Set(c.created_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Car>> {
        let model = car::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_license_plate(&self, plate: &str) -> DomainResult<Option<Car>> {
        let model = car::Entity::find()
            .filter(car::Column::LicensePlate.eq(plate))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Car>> {
        let models = car::Entity::find()
            .order_by_asc(car::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn set_available(&self, id: i32, available: bool) -> DomainResult<()> {
        let existing = car::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("Car", "id", id));
        };

        let mut active: car::ActiveModel = existing.into();
        active.available = Set(available);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn next_id(&self) -> i32 {
        car::Entity::find()
            .all(&self.db)
            .await
            .map(|cs| cs.into_iter().map(|c| c.id).max().unwrap_or(0) + 1)
            .unwrap_or(1)
    }
}
