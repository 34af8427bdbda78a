use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct Restaurant {
	/// External place id, chosen by the client.
	pub id: String,
	pub name: String,
	pub created_at: DateTime<Utc>,
}

impl Restaurant {
	/// Inserts the restaurant, or returns the stored row untouched when the id
	/// already exists.
	pub async fn create(db: impl sqlx::PgExecutor<'_>, id: &str, name: &str) -> Result<Self, sqlx::Error> {
		sqlx::query_as(
			r#"
			INSERT INTO restaurants (
				id,
				name
			) VALUES (
				$1,
				$2
			)
			ON CONFLICT (id) DO UPDATE SET id = restaurants.id
			RETURNING *
			"#,
		)
		.bind(id)
		.bind(name)
		.fetch_one(db)
		.await
	}

	pub async fn by_id(db: impl sqlx::PgExecutor<'_>, id: &str) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM restaurants WHERE id = $1")
			.bind(id)
			.fetch_optional(db)
			.await
	}
}
