use hyper::{Body, Request, StatusCode};

use super::send;
use crate::config::AppConfig;
use crate::tests::global::{mock_global_state, VisionReply};

#[tokio::test]
async fn test_nearby() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(
		&global,
		Request::post("/v1/general/nearby/-122.41/37.77").body(Body::empty()).unwrap(),
	)
	.await;

	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["places"][0]["displayName"]["text"], "Noodle Bar");
	assert_eq!(res.body["places"][0]["location"]["longitude"], -122.41);
	assert_eq!(res.body["places"][0]["location"]["latitude"], 37.77);
}

#[tokio::test]
async fn test_nearby_bad_coordinates() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(
		&global,
		Request::post("/v1/general/nearby/east/37.77").body(Body::empty()).unwrap(),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let res = send(
		&global,
		Request::post("/v1/general/nearby/10.0/95.0").body(Body::empty()).unwrap(),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "coordinates out of range");
}

#[tokio::test]
async fn test_nearby_restaurants_path() {
	let (global, _handler) = mock_global_state(AppConfig::default(), VisionReply::Unavailable).await;

	let res = send(
		&global,
		Request::post("/v1/general/nearby-restaurants/-96.34/30.62")
			.body(Body::empty())
			.unwrap(),
	)
	.await;

	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["places"][0]["location"]["longitude"], -96.34);
	assert_eq!(res.body["places"][0]["location"]["latitude"], 30.62);
}
