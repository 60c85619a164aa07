//! Wire types for the prediction service.

use serde::{Deserialize, Serialize};

/// Utilization of the source (`s_`) and destination (`d_`) nodes,
/// each `requested / allocatable`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictorPayload {
    pub s_cpu_usage: f32,
    pub s_mem_usage: f32,
    pub d_cpu_usage: f32,
    pub d_mem_usage: f32,
}

impl PredictorPayload {
    /// Name of the first NaN or infinite ratio, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("s_cpu_usage", self.s_cpu_usage),
            ("s_mem_usage", self.s_mem_usage),
            ("d_cpu_usage", self.d_cpu_usage),
            ("d_mem_usage", self.d_mem_usage),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// The service's prediction. Only `concurrency` feeds scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictorResponse {
    #[serde(rename = "latencyMS", default)]
    pub latency_ms: Option<f32>,
    pub concurrency: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_field_names() {
        let payload = PredictorPayload {
            s_cpu_usage: 0.5,
            s_mem_usage: 0.25,
            d_cpu_usage: 0.125,
            d_mem_usage: 1.5,
        };
        let json: serde_json::Value = serde_json::to_value(payload).unwrap();
        assert_eq!(json["s_cpu_usage"], 0.5);
        assert_eq!(json["s_mem_usage"], 0.25);
        assert_eq!(json["d_cpu_usage"], 0.125);
        assert_eq!(json["d_mem_usage"], 1.5);
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn finds_non_finite_ratios() {
        let mut payload = PredictorPayload {
            s_cpu_usage: 0.5,
            s_mem_usage: 0.25,
            d_cpu_usage: 0.125,
            d_mem_usage: 1.5,
        };
        assert_eq!(payload.non_finite_field(), None);

        payload.d_mem_usage = f32::INFINITY;
        assert_eq!(payload.non_finite_field(), Some("d_mem_usage"));

        payload.s_cpu_usage = f32::NAN;
        assert_eq!(payload.non_finite_field(), Some("s_cpu_usage"));
    }

    #[test]
    fn response_reads_latency_and_concurrency() {
        let resp: PredictorResponse =
            serde_json::from_str(r#"{"latencyMS": 12.5, "concurrency": 0.35}"#).unwrap();
        assert_eq!(resp.latency_ms, Some(12.5));
        assert_eq!(resp.concurrency, 0.35);
    }

    #[test]
    fn latency_is_optional() {
        let resp: PredictorResponse = serde_json::from_str(r#"{"concurrency": 2.0}"#).unwrap();
        assert_eq!(resp.latency_ms, None);
    }

    #[test]
    fn concurrency_is_required() {
        let res = serde_json::from_str::<PredictorResponse>(r#"{"latencyMS": 3.0}"#);
        assert!(res.is_err());
    }
}
