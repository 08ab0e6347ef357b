//! PostgreSQL-backed catalog and order collections.

use async_trait::async_trait;
use chrono::Utc;
use domain::catalog::{CatalogEntry, NewCatalogEntry, Price, SizePrices};
use domain::order::NewOrder;
use domain::ports::{CatalogStore, OrderStore};
use domain::storage::AssetRef;
use domain::StoreError;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{ExprTrait, LikeExpr, Order, SimpleExpr};
use sea_orm::*;
use uuid::Uuid;

use crate::entity::{pizza, pizza_order};

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `normalized_name` compared byte-wise, whatever the database collation.
/// Keeps SQL ordering identical to the in-memory index and lets the
/// `COLLATE "C"` index serve prefix `LIKE`s.
fn name_key() -> SimpleExpr {
    Expr::cust(r#""pizza"."normalized_name" COLLATE "C""#)
}

/// Entries whose normalized name starts with `prefix`, by name then id.
pub(crate) fn prefix_query(prefix: &str) -> Select<pizza::Entity> {
    let mut select = pizza::Entity::find();

    if !prefix.is_empty() {
        select = select.filter(
            name_key().like(LikeExpr::new(format!("{}%", escape_like(prefix))).escape('\\')),
        );
    }

    select
        .order_by(name_key(), Order::Asc)
        .order_by_asc(pizza::Column::Id)
}

fn unavailable(err: DbErr) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn cents(price: Price) -> Result<i64, StoreError> {
    i64::try_from(price.cents())
        .map_err(|_| StoreError::Corrupt(format!("price {price} does not fit a BIGINT")))
}

fn price(column: &str, value: i64) -> Result<Price, StoreError> {
    u64::try_from(value)
        .map(Price::from_cents)
        .map_err(|_| StoreError::Corrupt(format!("negative {column}: {value}")))
}

fn into_entry(model: pizza::Model) -> Result<CatalogEntry, StoreError> {
    let image_ref: AssetRef = model
        .image_ref
        .parse()
        .map_err(|e| StoreError::Corrupt(format!("pizza {}: {e}", model.id)))?;
    let prices = SizePrices {
        small: price("price_small", model.price_small)?,
        medium: price("price_medium", model.price_medium)?,
        large: price("price_large", model.price_large)?,
    };
    Ok(NewCatalogEntry::restore(
        model.name,
        model.description,
        prices,
        image_ref,
        model.image_asset_path,
    )
    .with_id(model.id))
}

/// Columns written on both insert and update.
fn active_model(record: &NewCatalogEntry) -> Result<pizza::ActiveModel, StoreError> {
    let prices = record.prices();
    Ok(pizza::ActiveModel {
        name: Set(record.name().to_string()),
        normalized_name: Set(record.normalized_name().to_string()),
        description: Set(record.description().to_string()),
        price_small: Set(cents(prices.small)?),
        price_medium: Set(cents(prices.medium)?),
        price_large: Set(cents(prices.large)?),
        image_ref: Set(record.image_ref().to_string()),
        image_asset_path: Set(record.image_asset_path().to_string()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    })
}

/// The `pizza` table.
#[derive(Clone)]
pub struct SeaCatalogStore {
    db: DatabaseConnection,
}

impl SeaCatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for SeaCatalogStore {
    async fn query_by_name_prefix(&self, prefix: &str) -> Result<Vec<CatalogEntry>, StoreError> {
        prefix_query(prefix)
            .all(&self.db)
            .await
            .map_err(unavailable)?
            .into_iter()
            .map(into_entry)
            .collect()
    }

    async fn get(&self, id: Uuid) -> Result<CatalogEntry, StoreError> {
        let model = pizza::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| StoreError::NotFound(format!("pizza {id}")))?;
        into_entry(model)
    }

    async fn insert(&self, record: NewCatalogEntry) -> Result<Uuid, StoreError> {
        let id = Uuid::now_v7();
        let mut model = active_model(&record)?;
        model.id = Set(id);
        model.created_at = Set(Utc::now());

        pizza::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(unavailable)?;
        Ok(id)
    }

    async fn update(&self, id: Uuid, record: NewCatalogEntry) -> Result<(), StoreError> {
        let result = pizza::Entity::update_many()
            .set(active_model(&record)?)
            .filter(pizza::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(unavailable)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(format!("pizza {id}")));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = pizza::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(unavailable)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(format!("pizza {id}")));
        }
        Ok(())
    }
}

/// The `pizza_order` table.
#[derive(Clone)]
pub struct SeaOrderStore {
    db: DatabaseConnection,
}

impl SeaOrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderStore for SeaOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Uuid, StoreError> {
        let id = Uuid::now_v7();
        let quantity = i32::try_from(order.quantity)
            .map_err(|_| StoreError::Corrupt(format!("quantity {} too large", order.quantity)))?;

        let model = pizza_order::ActiveModel {
            id: Set(id),
            pizza_name: Set(order.pizza_name),
            size: Set(order.size.code().to_string()),
            quantity: Set(quantity),
            table_number: Set(order.table_number),
            amount: Set(cents(order.amount)?),
            status: Set(order.status.as_str().to_string()),
            waiter_id: Set(order.waiter_id),
            image_ref: Set(order.image_ref.to_string()),
            created_at: Set(order.created_at),
        };

        pizza_order::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(unavailable)?;
        Ok(id)
    }
}
