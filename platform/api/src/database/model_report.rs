use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct ModelReport {
	pub id: i64,
	pub model_id: String,
	pub reported_by: i64,
	pub reason: String,
	pub additional_comments: Option<String>,
	/// One of [`ReportStatus`], stored as text.
	pub status: String,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
	#[default]
	Pending,
	Resolved,
}

impl ReportStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Resolved => "resolved",
		}
	}
}

impl ModelReport {
	pub async fn create(
		db: impl sqlx::PgExecutor<'_>,
		model_id: &str,
		reported_by: i64,
		reason: &str,
		additional_comments: Option<&str>,
	) -> Result<Self, sqlx::Error> {
		sqlx::query_as(
			r#"
			INSERT INTO model_reports (
				model_id,
				reported_by,
				reason,
				additional_comments,
				status
			) VALUES (
				$1,
				$2,
				$3,
				$4,
				$5
			) RETURNING *
			"#,
		)
		.bind(model_id)
		.bind(reported_by)
		.bind(reason)
		.bind(additional_comments)
		.bind(ReportStatus::Pending.as_str())
		.fetch_one(db)
		.await
	}

	pub async fn by_model(db: impl sqlx::PgExecutor<'_>, model_id: &str) -> Result<Vec<Self>, sqlx::Error> {
		sqlx::query_as("SELECT * FROM model_reports WHERE model_id = $1 ORDER BY created_at, id")
			.bind(model_id)
			.fetch_all(db)
			.await
	}

	pub async fn set_status(
		db: impl sqlx::PgExecutor<'_>,
		id: i64,
		status: ReportStatus,
	) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as("UPDATE model_reports SET status = $2 WHERE id = $1 RETURNING *")
			.bind(id)
			.bind(status.as_str())
			.fetch_optional(db)
			.await
	}
}
