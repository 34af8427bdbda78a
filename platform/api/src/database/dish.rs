use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use super::ArModel;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct Dish {
	pub id: i64,
	pub name: String,
	pub description: Option<String>,
	pub ingredients: Option<String>,
	#[serde(with = "rust_decimal::serde::float_option")]
	pub price: Option<Decimal>,
	pub nutritional_info: Option<String>,
	pub allergens: Option<String>,
	pub restaurant_id: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct NewDish {
	pub name: String,
	pub description: Option<String>,
	pub ingredients: Option<String>,
	#[serde(default, with = "rust_decimal::serde::float_option")]
	pub price: Option<Decimal>,
	pub nutritional_info: Option<String>,
	pub allergens: Option<String>,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct DishUpdate {
	pub name: Option<String>,
	pub description: Option<String>,
	pub ingredients: Option<String>,
	#[serde(default, with = "rust_decimal::serde::float_option")]
	pub price: Option<Decimal>,
	pub nutritional_info: Option<String>,
	pub allergens: Option<String>,
}

/// A dish of a restaurant together with its best rated model, used to match
/// menu items against what the catalog already knows.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CatalogEntry {
	pub dish_id: i64,
	pub name: String,
	pub model_id: Option<String>,
}

fn round_price(price: Option<Decimal>) -> Option<Decimal> {
	price.map(|p| p.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

impl Dish {
	pub async fn create(db: impl sqlx::PgExecutor<'_>, restaurant_id: &str, dish: &NewDish) -> Result<Self, sqlx::Error> {
		sqlx::query_as(
			r#"
			INSERT INTO dishes (
				name,
				description,
				ingredients,
				price,
				nutritional_info,
				allergens,
				restaurant_id
			) VALUES (
				$1,
				$2,
				$3,
				$4,
				$5,
				$6,
				$7
			) RETURNING *
			"#,
		)
		.bind(&dish.name)
		.bind(&dish.description)
		.bind(&dish.ingredients)
		.bind(round_price(dish.price))
		.bind(&dish.nutritional_info)
		.bind(&dish.allergens)
		.bind(restaurant_id)
		.fetch_one(db)
		.await
	}

	pub async fn by_id(db: impl sqlx::PgExecutor<'_>, id: i64) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM dishes WHERE id = $1")
			.bind(id)
			.fetch_optional(db)
			.await
	}

	pub async fn by_restaurant(db: impl sqlx::PgExecutor<'_>, restaurant_id: &str) -> Result<Vec<Self>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM dishes WHERE restaurant_id = $1 ORDER BY id")
			.bind(restaurant_id)
			.fetch_all(db)
			.await
	}

	pub async fn update(db: impl sqlx::PgExecutor<'_>, id: i64, update: &DishUpdate) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as(
			r#"
			UPDATE
				dishes
			SET
				name = COALESCE($2, name),
				description = COALESCE($3, description),
				ingredients = COALESCE($4, ingredients),
				price = COALESCE($5, price),
				nutritional_info = COALESCE($6, nutritional_info),
				allergens = COALESCE($7, allergens),
				updated_at = NOW()
			WHERE
				id = $1
			RETURNING *
			"#,
		)
		.bind(id)
		.bind(&update.name)
		.bind(&update.description)
		.bind(&update.ingredients)
		.bind(round_price(update.price))
		.bind(&update.nutritional_info)
		.bind(&update.allergens)
		.fetch_optional(db)
		.await
	}

	/// Creates a dish together with its first model. Either both rows are
	/// written or neither is.
	pub async fn create_with_model(
		db: &sqlx::PgPool,
		restaurant_id: &str,
		dish: &NewDish,
		model_id: &str,
		uploaded_by: i64,
		now: DateTime<Utc>,
	) -> Result<(Self, ArModel), sqlx::Error> {
		let mut tx = db.begin().await?;

		let dish = Self::create(&mut *tx, restaurant_id, dish).await?;
		let model = ArModel::create(&mut *tx, model_id, dish.id, uploaded_by, now).await?;

		tx.commit().await?;

		Ok((dish, model))
	}

	pub async fn delete(db: impl sqlx::PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
		let result = sqlx::query("DELETE FROM dishes WHERE id = $1").bind(id).execute(db).await?;
		Ok(result.rows_affected() > 0)
	}
}

impl CatalogEntry {
	pub async fn by_restaurant(db: impl sqlx::PgExecutor<'_>, restaurant_id: &str) -> Result<Vec<Self>, sqlx::Error> {
		sqlx::query_as(
			r#"
			SELECT
				d.id AS dish_id,
				d.name,
				(
					SELECT m.id
					FROM ar_models m
					WHERE m.dish_id = d.id
					ORDER BY m.rating DESC, m.id
					LIMIT 1
				) AS model_id
			FROM
				dishes d
			WHERE
				d.restaurant_id = $1
			ORDER BY d.id
			"#,
		)
		.bind(restaurant_id)
		.fetch_all(db)
		.await
	}
}
