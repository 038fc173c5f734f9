use {
    mongodb::bson::{self, Document, oid::ObjectId},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// A stored numeric value, kept in the kind it was written with.
///
/// Scores are stored as integers on first insert and as floats once averaged.
/// Floats always print with a fractional part (`30.0`, not `30`).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match *self {
            Number::Int(n) => n.to_string(),
            Number::Float(n) if n.is_finite() && n.fract() == 0.0 => format!("{:.1}", n),
            Number::Float(n) => n.to_string(),
        };
        f.pad(&text)
    }
}

/// One benchmark result for a CPU model, as written by the `pi` benchmark
/// into `taipan_benchmarks.cpu_benchmarks`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CpuBenchmark {
    #[serde(rename = "_id", default, skip_serializing)]
    pub oid: Option<ObjectId>,
    pub cpu_model: String,
    pub execution_time_single_core: Number,
    pub execution_time_multi_core: Number,
    pub single_core_score: Number,
    pub multi_core_score: Number,
    pub speedup: Number,
    pub efficiency: Number,
    pub cpu_utilization: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_cpus_tested: Option<i64>,
}

impl CpuBenchmark {
    pub fn from_document(document: Document) -> Result<Self, bson::de::Error> {
        bson::from_document(document)
    }
}
