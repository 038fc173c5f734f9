use {
    crate::handlers::ViewerState,
    mongodb::bson::doc,
    rocket::{Route, State, get, routes, serde::json::Json},
    serde::{Deserialize, Serialize},
};

#[derive(Serialize, Deserialize, Clone, Default, Debug)]
pub struct CollectionStatus {
    pub collection: String,
}

#[derive(Serialize, Deserialize, Clone, Default, Debug)]
pub struct HealthStatus {
    pub db_status: String,
    pub collections_status: CollectionStatus,
}

fn collection_status(names: &[String], collection: &str) -> String {
    if names.iter().any(|name| name == collection) {
        format!("{} collection online!", collection)
    } else {
        format!("{} collection missing", collection)
    }
}

#[get("/check-health")]
pub async fn health(state: &State<ViewerState>) -> Json<HealthStatus> {
    let mut health = HealthStatus::default();

    let pinged = state
        .client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await;

    if let Err(e) = pinged {
        log::warn!("health check ping failed: {}", e);
        health.db_status = "database offline :(".to_string();
        return Json(health);
    }

    health.db_status = "database online!".to_string();
    health.collections_status.collection = match state
        .client
        .database(&state.database)
        .list_collection_names()
        .await
    {
        Ok(names) => collection_status(&names, &state.collection),
        Err(e) => {
            log::warn!("listing collections failed: {}", e);
            "collections unavailable".to_string()
        }
    };

    Json(health)
}

pub fn routes() -> Vec<Route> {
    routes![health]
}
