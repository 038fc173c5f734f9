use {
    crate::{errors::Result, models::CpuBenchmark},
    mongodb::bson::{Bson, Document},
};

const HEADERS: [&str; 8] = [
    "CPU Model",
    "Execution time (single core)",
    "Execution time (multi core)",
    "Single core score",
    "Multi core score",
    "Speedup",
    "Efficiency",
    "CPU utilization",
];

/// Pretty relaxed Extended JSON array of the documents, unmodified.
pub fn render_json(documents: &[Document]) -> Result<String> {
    let values: Vec<serde_json::Value> = documents
        .iter()
        .map(|document| Bson::Document(document.clone()).into_relaxed_extjson())
        .collect();

    Ok(serde_json::to_string_pretty(&values)?)
}

pub fn decode_benchmarks(documents: &[Document]) -> Vec<CpuBenchmark> {
    documents
        .iter()
        .filter_map(|document| match CpuBenchmark::from_document(document.clone()) {
            Ok(benchmark) => Some(benchmark),
            Err(e) => {
                let id = document
                    .get("_id")
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "<no _id>".to_string());
                log::warn!("skipping document {}: {}", id, e);
                None
            }
        })
        .collect()
}

/// Column report in the layout the benchmark writes to `pi_benchmark.txt`.
pub fn render_table(benchmarks: &[CpuBenchmark]) -> String {
    let [model, single, multi, single_score, multi_score, speedup, efficiency, utilization] =
        HEADERS;

    let mut out = format!(
        "{:<41}| {:<29}| {:<28}| {:<18}| {:<17}| {:<8}| {:<11}| {}\n\n",
        model, single, multi, single_score, multi_score, speedup, efficiency, utilization
    );

    for b in benchmarks {
        out.push_str(&format!(
            "{:<41}| {:<29}| {:<28}| {:<18}| {:<17}| {:<8}| {:<11}| {}%\n",
            b.cpu_model,
            b.execution_time_single_core,
            b.execution_time_multi_core,
            b.single_core_score,
            b.multi_core_score,
            b.speedup,
            b.efficiency,
            b.cpu_utilization
        ));
    }

    out
}
