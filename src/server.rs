use {
    crate::{
        errors::Result,
        handlers::{self, ViewerState},
    },
    rocket::{Build, Rocket, catchers, figment::Figment, http::Method, routes},
    rocket_cors::{AllowedOrigins, CorsOptions},
    std::net::IpAddr,
};

/// Figment overrides for the listening socket, on top of Rocket's defaults.
pub fn figment(address: Option<IpAddr>, port: Option<u16>) -> Figment {
    let mut figment = rocket::Config::figment();
    if let Some(address) = address {
        figment = figment.merge(("address", address));
    }
    if let Some(port) = port {
        figment = figment.merge(("port", port));
    }
    figment
}

pub fn build(figment: Figment, state: ViewerState) -> Result<Rocket<Build>> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .allowed_methods(vec![Method::Get].into_iter().map(From::from).collect())
        .to_cors()?;

    Ok(rocket::custom(figment)
        .manage(state)
        .attach(cors)
        .register("/", catchers![handlers::catch404, handlers::catch500])
        .mount("/", routes![handlers::index])
        .mount("/cpu-benchmarks", handlers::benchmarks::routes())
        .mount("/misc", handlers::misc::routes()))
}

/// Runs the viewer until Rocket shuts down, then releases the client.
pub async fn serve(figment: Figment, state: ViewerState) -> Result<()> {
    let client = state.client.clone();
    release_after(launch(figment, state), client.shutdown()).await
}

async fn launch(figment: Figment, state: ViewerState) -> Result<()> {
    build(figment, state)?
        .launch()
        .await
        .map(drop)
        .map_err(Box::new)?;
    Ok(())
}

/// Awaits `run`, then `release`, whatever `run` returned.
pub async fn release_after<F, R>(run: F, release: R) -> Result<()>
where
    F: Future<Output = Result<()>>,
    R: IntoFuture<Output = ()>,
{
    let result = run.await;
    release.await;
    log::info!("client closed");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, errors::ViewerError};
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };
    use rocket::http::Status;
    use rocket::local::asynchronous::Client as LocalClient;
    use serde_json::Value;

    // Nothing listens on port 1, and selection gives up quickly.
    const UNREACHABLE: &str = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200";

    async fn local() -> LocalClient {
        let client = db::connect(UNREACHABLE).await.unwrap();
        let state = ViewerState::new(client, "taipan_benchmarks", "cpu_benchmarks");
        let rocket = build(figment(None, None), state).unwrap();
        LocalClient::tracked(rocket).await.unwrap()
    }

    #[test]
    fn figment_overrides_socket() {
        let config: rocket::Config = figment(Some("0.0.0.0".parse().unwrap()), Some(9000))
            .extract()
            .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.address.to_string(), "0.0.0.0");
    }

    #[rocket::async_test]
    async fn index_lists_routes() {
        let client = local().await;
        let response = client.get("/").dispatch().await;

        assert_eq!(response.status(), Status::Ok);
        let body = response.into_string().await.unwrap();
        assert!(body.contains("/cpu-benchmarks"));
    }

    #[rocket::async_test]
    async fn unknown_route_gets_json_404() {
        let client = local().await;
        let response = client.get("/gpu-benchmarks").dispatch().await;

        assert_eq!(response.status(), Status::NotFound);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["status"], 404);
    }

    #[rocket::async_test]
    async fn health_reports_offline_database() {
        let client = local().await;
        let response = client.get("/misc/check-health").dispatch().await;

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["db_status"], "database offline :(");
        assert_eq!(body["collections_status"]["collection"], "");
    }

    #[rocket::async_test]
    async fn listing_without_database_is_unavailable() {
        let client = local().await;
        let response = client.get("/cpu-benchmarks").dispatch().await;

        assert_eq!(response.status(), Status::ServiceUnavailable);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "Database unavailable");
        assert_eq!(body["status"], 503);
    }

    #[tokio::test]
    async fn release_follows_a_clean_run() {
        let released = Arc::new(AtomicBool::new(false));
        let flag = released.clone();

        let result = release_after(async { Ok(()) }, async move {
            flag.store(true, Ordering::SeqCst)
        })
        .await;

        assert!(result.is_ok());
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn release_follows_a_failed_run() {
        let released = Arc::new(AtomicBool::new(false));
        let flag = released.clone();

        let result = release_after(
            async { Err(ViewerError::NotFound("launch".into())) },
            async move { flag.store(true, Ordering::SeqCst) },
        )
        .await;

        assert!(matches!(result, Err(ViewerError::NotFound(step)) if step == "launch"));
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn serve_on_an_occupied_port_fails_and_returns() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();

        let client = db::connect(UNREACHABLE).await.unwrap();
        let state = ViewerState::new(client, "taipan_benchmarks", "cpu_benchmarks");
        let figment = figment(Some("127.0.0.1".parse().unwrap()), Some(port));

        let err = serve(figment, state).await.unwrap_err();
        let message = err.to_string();

        assert!(matches!(err, ViewerError::Server(_)), "{}", message);
    }
}
