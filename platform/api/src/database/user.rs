use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct User {
	pub id: i64,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub user_name: String,
	/// Opaque to this service, checked by the credential service.
	#[serde(skip_serializing)]
	pub hashed_password: String,
	pub email: String,
	pub age: Option<i32>,
	pub food_restrictions: Vec<String>,
	pub food_preferences: Vec<String>,
	pub total_points: i64,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct NewUser {
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub user_name: String,
	pub hashed_password: String,
	pub email: String,
	pub age: Option<i32>,
	#[serde(default)]
	pub food_restrictions: Vec<String>,
	#[serde(default)]
	pub food_preferences: Vec<String>,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct UserUpdate {
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub user_name: Option<String>,
	pub email: Option<String>,
	pub age: Option<i32>,
	pub food_restrictions: Option<Vec<String>>,
	pub food_preferences: Option<Vec<String>>,
	pub total_points: Option<i64>,
}

impl User {
	pub async fn create(db: impl sqlx::PgExecutor<'_>, user: &NewUser) -> Result<Self, sqlx::Error> {
		sqlx::query_as(
			r#"
			INSERT INTO users (
				first_name,
				last_name,
				user_name,
				hashed_password,
				email,
				age,
				food_restrictions,
				food_preferences
			) VALUES (
				$1,
				$2,
				$3,
				$4,
				$5,
				$6,
				$7,
				$8
			) RETURNING *
			"#,
		)
		.bind(&user.first_name)
		.bind(&user.last_name)
		.bind(&user.user_name)
		.bind(&user.hashed_password)
		.bind(&user.email)
		.bind(user.age)
		.bind(&user.food_restrictions)
		.bind(&user.food_preferences)
		.fetch_one(db)
		.await
	}

	pub async fn by_id(db: impl sqlx::PgExecutor<'_>, id: i64) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM users WHERE id = $1")
			.bind(id)
			.fetch_optional(db)
			.await
	}

	/// Finds a user by user name or, failing that, by email.
	pub async fn by_login(db: impl sqlx::PgExecutor<'_>, login: &str) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM users WHERE user_name = $1 OR email = $1 ORDER BY (user_name = $1) DESC LIMIT 1")
			.bind(login)
			.fetch_optional(db)
			.await
	}

	pub async fn update(db: impl sqlx::PgExecutor<'_>, id: i64, update: &UserUpdate) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as(
			r#"
			UPDATE
				users
			SET
				first_name = COALESCE($2, first_name),
				last_name = COALESCE($3, last_name),
				user_name = COALESCE($4, user_name),
				email = COALESCE($5, email),
				age = COALESCE($6, age),
				food_restrictions = COALESCE($7, food_restrictions),
				food_preferences = COALESCE($8, food_preferences),
				total_points = COALESCE($9, total_points)
			WHERE
				id = $1
			RETURNING *
			"#,
		)
		.bind(id)
		.bind(&update.first_name)
		.bind(&update.last_name)
		.bind(&update.user_name)
		.bind(&update.email)
		.bind(update.age)
		.bind(&update.food_restrictions)
		.bind(&update.food_preferences)
		.bind(update.total_points)
		.fetch_optional(db)
		.await
	}

	pub async fn delete(db: impl sqlx::PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
		let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(db).await?;
		Ok(result.rows_affected() > 0)
	}
}
