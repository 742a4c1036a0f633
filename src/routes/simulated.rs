use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde_json::{Value, json};

use crate::common::AppState;

/// Declared set of simulated-reading endpoints: one table of
/// path -> payload builder instead of a handler per route. Each payload
/// gets a fresh UTC timestamp at request time.
pub const SIMULATED_READINGS: &[(&str, fn() -> Value)] = &[
    ("/temperatura", temperature),
    ("/velocidad", speed),
    ("/Universidad", university),
];

fn temperature() -> Value {
    json!({ "valor": "10°C" })
}

fn speed() -> Value {
    json!({ "valor": "25 km/h" })
}

fn university() -> Value {
    json!({ "nombres": ["Universidad Tecnológica de la Laguna Durango"] })
}

fn with_timestamp(mut payload: Value) -> Value {
    if let Value::Object(map) = &mut payload {
        map.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));
    }
    payload
}

pub fn router() -> Router<AppState> {
    let mut router = Router::new();
    for (path, payload) in SIMULATED_READINGS {
        let build = *payload;
        router = router.route(path, get(move || async move { Json(with_timestamp(build())) }));
    }
    router
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_all_simulated_paths() {
        let paths: Vec<&str> = SIMULATED_READINGS.iter().map(|(p, _)| *p).collect();
        assert_eq!(paths, vec!["/temperatura", "/velocidad", "/Universidad"]);
    }

    #[test]
    fn payloads_carry_expected_fields() {
        let t = with_timestamp(temperature());
        assert_eq!(t["valor"], "10°C");
        assert!(t["timestamp"].is_string());

        let v = with_timestamp(speed());
        assert_eq!(v["valor"], "25 km/h");

        let u = with_timestamp(university());
        assert!(u["nombres"].is_array());
        assert_eq!(u["nombres"][0], "Universidad Tecnológica de la Laguna Durango");
    }
}
