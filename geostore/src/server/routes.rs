use super::handlers::{AppState, create_features, delete_feature, get_feature, list_features, update_feature};
use axum::{Router, routing::get};

const COLLECTION: [&str; 2] = ["/api/features/{kind}", "/api/features/{kind}/"];
const ITEM: [&str; 2] = ["/api/features/{kind}/{name}", "/api/features/{kind}/{name}/"];

/// The feature API; every route also answers with a trailing slash.
pub fn feature_routes(state: AppState) -> Router {
	let mut router: Router<AppState> = Router::new();
	for path in COLLECTION {
		router = router.route(path, get(list_features).post(create_features));
	}
	for path in ITEM {
		router = router.route(path, get(get_feature).put(update_feature).delete(delete_feature));
	}
	router.with_state(state)
}
