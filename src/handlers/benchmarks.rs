use {
    crate::{
        db::{benchmark_filter, collect_all, latest_first},
        errors::{Result, ViewerError},
        handlers::ViewerState,
        models::CpuBenchmark,
        render::decode_benchmarks,
    },
    mongodb::bson::doc,
    rocket::{Route, State, get, routes, serde::json::Json},
};

#[get("/")]
pub async fn get_benchmarks(state: &State<ViewerState>) -> Result<Json<Vec<CpuBenchmark>>> {
    let documents = collect_all(&state.documents(), doc! {}).await?;

    Ok(Json(decode_benchmarks(&documents)))
}

/// Latest result for `cpu_model`.
#[get("/<cpu_model>")]
pub async fn get_benchmark(
    state: &State<ViewerState>,
    cpu_model: String,
) -> Result<Json<CpuBenchmark>> {
    let document = state
        .documents()
        .find_one(benchmark_filter(Some(&cpu_model)))
        .sort(latest_first())
        .await?
        .ok_or_else(|| ViewerError::NotFound(cpu_model.clone()))?;

    Ok(Json(CpuBenchmark::from_document(document)?))
}

pub fn routes() -> Vec<Route> {
    routes![get_benchmarks, get_benchmark]
}
