//! SeaORM implementation of BookingRepository
//!
//! The two mutating operations run inside serializable transactions:
//! `insert` re-runs the overlap query before writing (closing the
//! check-then-act race between concurrent creates), and `cancel` applies the
//! car-flag flip and the row delete as one unit.

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IsolationLevel, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionError, TransactionTrait,
};

use crate::domain::booking::{Booking, BookingRepository};
use crate::domain::{BookingPeriod, DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, car};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> DomainResult<Booking> {
    // Rows are only ever written from validated periods; a violation here
    // means the table was modified out of band.
    let period = BookingPeriod::new(m.start_date, m.end_date).map_err(|_| {
        DomainError::Storage(format!(
            "booking {} has inverted interval {}..{}",
            m.id, m.start_date, m.end_date
        ))
    })?;
    Ok(Booking {
        id: m.id,
        user_id: m.user_id,
        car_id: m.car_id,
        period,
        created_at: m.created_at,
    })
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("database error: {}", e))
}

fn txn_err(e: TransactionError<DomainError>) -> DomainError {
    match e {
        TransactionError::Connection(e) => db_err(e),
        TransactionError::Transaction(e) => e,
    }
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn insert(&self, b: Booking) -> DomainResult<()> {
        debug!("Inserting booking {} for car {}", b.id, b.car_id);

        self.db
            .transaction_with_config::<_, (), DomainError>(
                move |txn| {
                    Box::pin(async move {
                        let clash = booking::Entity::find()
                            .filter(booking::Column::CarId.eq(b.car_id))
                            .filter(booking::Column::StartDate.lt(b.period.end()))
                            .filter(booking::Column::EndDate.gt(b.period.start()))
                            .one(txn)
                            .await
                            .map_err(db_err)?;
                        if clash.is_some() {
                            return Err(DomainError::Conflict(format!(
                                "car {} already booked in {}",
                                b.car_id, b.period
                            )));
                        }

                        let model = booking::ActiveModel {
                            id: Set(b.id),
                            user_id: Set(b.user_id),
                            car_id: Set(b.car_id),
                            start_date: Set(b.period.start()),
                            end_date: Set(b.period.end()),
                            created_at: Set(b.created_at),
                        };
                        model.insert(txn).await.map_err(db_err)?;
                        Ok(())
                    })
                },
                Some(IsolationLevel::Serializable),
                None,
            )
            .await
            .map_err(txn_err)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .order_by_asc(booking::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_asc(booking::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_overlapping(
        &self,
        car_id: i32,
        period: &BookingPeriod,
    ) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::CarId.eq(car_id))
            .filter(booking::Column::StartDate.lt(period.end()))
            .filter(booking::Column::EndDate.gt(period.start()))
            .order_by_asc(booking::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn cancel(&self, id: i32) -> DomainResult<()> {
        debug!("Cancelling booking {}", id);

        self.db
            .transaction_with_config::<_, (), DomainError>(
                move |txn| {
                    Box::pin(async move {
                        let Some(existing) = booking::Entity::find_by_id(id)
                            .one(txn)
                            .await
                            .map_err(db_err)?
                        else {
                            return Err(DomainError::not_found("Booking", "id", id));
                        };

                        let Some(car_row) = car::Entity::find_by_id(existing.car_id)
                            .one(txn)
                            .await
                            .map_err(db_err)?
                        else {
                            return Err(DomainError::Storage(format!(
                                "car {} referenced by booking {} is missing",
                                existing.car_id, id
                            )));
                        };

                        let mut active: car::ActiveModel = car_row.into();
                        active.available = Set(true);
                        active.update(txn).await.map_err(db_err)?;

                        existing.delete(txn).await.map_err(db_err)?;
                        Ok(())
                    })
                },
                Some(IsolationLevel::Serializable),
                None,
            )
            .await
            .map_err(txn_err)
    }

    async fn next_id(&self) -> i32 {
        booking::Entity::find()
            .all(&self.db)
            .await
            .map(|bs| bs.into_iter().map(|b| b.id).max().unwrap_or(0) + 1)
            .unwrap_or(1)
    }
}
