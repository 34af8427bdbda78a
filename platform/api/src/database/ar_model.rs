use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct ArModel {
	/// Client chosen asset id.
	pub id: String,
	/// Hot score as of the last vote, see [`hot_score::compute_hot_score`].
	pub rating: f64,
	pub up_votes: i64,
	pub down_votes: i64,
	pub dish_id: i64,
	pub uploaded_by: i64,
	pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
	Up,
	Down,
}

fn tally(count: i64) -> u64 {
	u64::try_from(count).unwrap_or_default()
}

impl ArModel {
	/// The model after `vote` is counted at `now`, with the rating recomputed
	/// from the new tallies.
	pub fn with_vote(&self, vote: Vote, now: DateTime<Utc>) -> Self {
		let (up_votes, down_votes) = match vote {
			Vote::Up => (self.up_votes.saturating_add(1), self.down_votes),
			Vote::Down => (self.up_votes, self.down_votes.saturating_add(1)),
		};

		Self {
			rating: hot_score::compute_hot_score(tally(up_votes), tally(down_votes), self.uploaded_at, now),
			up_votes,
			down_votes,
			..self.clone()
		}
	}

	pub async fn create(
		db: impl sqlx::PgExecutor<'_>,
		id: &str,
		dish_id: i64,
		uploaded_by: i64,
		now: DateTime<Utc>,
	) -> Result<Self, sqlx::Error> {
		sqlx::query_as(
			r#"
			INSERT INTO ar_models (
				id,
				rating,
				up_votes,
				down_votes,
				dish_id,
				uploaded_by,
				uploaded_at
			) VALUES (
				$1,
				$2,
				0,
				0,
				$3,
				$4,
				$5
			) RETURNING *
			"#,
		)
		.bind(id)
		.bind(hot_score::initial_hot_score(now, now))
		.bind(dish_id)
		.bind(uploaded_by)
		.bind(now)
		.fetch_one(db)
		.await
	}

	pub async fn by_id(db: impl sqlx::PgExecutor<'_>, id: &str) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM ar_models WHERE id = $1")
			.bind(id)
			.fetch_optional(db)
			.await
	}

	pub async fn by_dish(db: impl sqlx::PgExecutor<'_>, dish_id: i64) -> Result<Vec<Self>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM ar_models WHERE dish_id = $1 ORDER BY rating DESC, id")
			.bind(dish_id)
			.fetch_all(db)
			.await
	}

	pub async fn by_restaurant(db: impl sqlx::PgExecutor<'_>, restaurant_id: &str) -> Result<Vec<Self>, sqlx::Error> {
		sqlx::query_as(
			r#"
			SELECT
				m.*
			FROM
				ar_models m
				INNER JOIN dishes d ON d.id = m.dish_id
			WHERE
				d.restaurant_id = $1
			ORDER BY m.dish_id, m.rating DESC, m.id
			"#,
		)
		.bind(restaurant_id)
		.fetch_all(db)
		.await
	}

	/// Counts a vote and stores the recomputed rating.
	///
	/// The row is locked for the duration of the transaction so concurrent
	/// votes on the same model are applied one after another.
	pub async fn vote(db: &sqlx::PgPool, id: &str, vote: Vote, now: DateTime<Utc>) -> Result<Option<Self>, sqlx::Error> {
		let mut tx = db.begin().await?;

		let Some(model): Option<Self> = sqlx::query_as("SELECT * FROM ar_models WHERE id = $1 FOR UPDATE")
			.bind(id)
			.fetch_optional(&mut *tx)
			.await?
		else {
			return Ok(None);
		};

		let voted = model.with_vote(vote, now);

		let model: Self = sqlx::query_as(
			r#"
			UPDATE
				ar_models
			SET
				up_votes = $2,
				down_votes = $3,
				rating = $4
			WHERE
				id = $1
			RETURNING *
			"#,
		)
		.bind(&voted.id)
		.bind(voted.up_votes)
		.bind(voted.down_votes)
		.bind(voted.rating)
		.fetch_one(&mut *tx)
		.await?;

		tx.commit().await?;

		Ok(Some(model))
	}

	pub async fn delete(db: impl sqlx::PgExecutor<'_>, id: &str) -> Result<bool, sqlx::Error> {
		let result = sqlx::query("DELETE FROM ar_models WHERE id = $1").bind(id).execute(db).await?;
		Ok(result.rows_affected() > 0)
	}
}
