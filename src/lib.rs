/// Diagnostic output, only compiled in with the `debug` feature
#[allow(unused_macros)]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(&msg));
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{}", msg);
    }};
}
#[allow(unused_imports)]
pub(crate) use debug_log;

pub mod churn;
pub mod render;
pub mod scoring;
pub mod simulation;
pub mod types;

use render::{render_bar_chart, render_summary, BarChart};
use simulation::LobbySimulator;
use types::*;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn parse_params(label: &str, params_json: &str) -> Result<LobbyParams, JsValue> {
    serde_json::from_str(params_json)
        .map_err(|e| JsValue::from_str(&format!("{} parse error: {}", label, e)))
}

/// WASM-exposed lobby simulator, driven by the UI on every control change
#[wasm_bindgen]
pub struct LobbyEngine {
    sim: LobbySimulator,
    last_report: Option<LobbyReport>,
}

#[wasm_bindgen]
impl LobbyEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> LobbyEngine {
        LobbyEngine {
            sim: LobbySimulator::new(seed),
            last_report: None,
        }
    }

    /// Engine seeded the same way every scenario is by default
    pub fn with_default_seed() -> LobbyEngine {
        LobbyEngine::new(DEFAULT_SEED)
    }

    pub fn get_seed(&self) -> u64 {
        self.sim.seed()
    }

    /// Change the seed; the next `simulate` call uses it
    pub fn set_seed(&mut self, seed: u64) {
        self.sim.set_seed(seed);
    }

    /// Simulate a lobby for the given params and return the report as JSON
    pub fn simulate(&mut self, params_json: &str) -> Result<String, JsValue> {
        let params = parse_params("Params", params_json)?;
        let report = self.sim.simulate(&params).map_err(|e| JsValue::from_str(&e))?;
        let json = serde_json::to_string(&report)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))?;
        self.last_report = Some(report);
        Ok(json)
    }

    /// Last report as JSON, "null" before the first simulation
    pub fn get_last_report(&self) -> String {
        serde_json::to_string(&self.last_report).unwrap_or_default()
    }

    /// Bar chart data for the last report
    pub fn get_chart(&self) -> String {
        self.last_report
            .as_ref()
            .map(|r| serde_json::to_string(&BarChart::from_report(r)).unwrap_or_default())
            .unwrap_or_else(|| "null".to_string())
    }

    /// Human counts per bracket of the last report, empty before the first run
    pub fn get_bracket_counts(&self) -> js_sys::Uint32Array {
        let counts = self
            .last_report
            .as_ref()
            .map(|r| r.composition.per_bracket_human_counts.to_vec())
            .unwrap_or_default();
        js_sys::Uint32Array::from(&counts[..])
    }

    /// Text chart of the last report
    pub fn get_text_chart(&self, width: usize) -> String {
        self.last_report
            .as_ref()
            .map(|r| render_bar_chart(&BarChart::from_report(r), width))
            .unwrap_or_default()
    }

    /// Text summary of the last report
    pub fn get_summary(&self) -> String {
        self.last_report
            .as_ref()
            .map(render_summary)
            .unwrap_or_default()
    }

    pub fn get_brackets() -> String {
        serde_json::to_string(&BRACKETS).unwrap_or_default()
    }

    /// Control ranges for building the sliders
    pub fn get_controls() -> String {
        serde_json::to_string(&CONTROLS).unwrap_or_default()
    }

    pub fn get_default_params() -> String {
        serde_json::to_string(&LobbyParams::default()).unwrap_or_default()
    }
}

/// Sweep one parameter and score a lobby per value
pub fn sweep(
    base: &LobbyParams,
    parameter: &str,
    values: &[f64],
    seed: u64,
) -> Result<Vec<serde_json::Value>, String> {
    let sim = LobbySimulator::new(seed);
    let mut results = Vec::with_capacity(values.len());

    for &value in values {
        let mut params = base.clone();

        match parameter {
            "bot_count" => {
                if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
                    return Err(format!("bot_count must be a whole number, got {}", value));
                }
                params.bot_count = value as u32;
            }
            "churn_level" => params.churn_level = value,
            "kd_churn_cutoff" => params.kd_churn_cutoff = value,
            _ => return Err(format!("Unknown parameter: {}", parameter)),
        }

        let report = sim.simulate(&params)?;
        results.push(serde_json::json!({
            "parameter_value": value,
            "sweat": report.score.value,
            "rating": report.score.rating,
            "composite": report.score.composite,
            "median_kd": report.score.median_kd,
            "top10_mean_kd": report.score.top10_mean_kd,
            "per_bracket_human_counts": report.composition.per_bracket_human_counts,
        }));
    }

    Ok(results)
}

/// Run a parameter sweep experiment
#[wasm_bindgen]
pub fn run_sweep(
    base_params_json: &str,
    parameter: &str,
    values_json: &str,
    seed: u64,
) -> Result<String, JsValue> {
    let base = parse_params("Params", base_params_json)?;
    let values: Vec<f64> = serde_json::from_str(values_json)
        .map_err(|e| JsValue::from_str(&format!("Values parse error: {}", e)))?;

    let results = sweep(&base, parameter, &values, seed).map_err(|e| JsValue::from_str(&e))?;

    serde_json::to_string(&results)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Change in sweat from `a` to `b`, kept at one decimal
pub fn sweat_delta(a: &LobbyReport, b: &LobbyReport) -> f64 {
    scoring::round1(b.score.value - a.score.value)
}

/// Compare two parameter sets under the same seed
#[wasm_bindgen]
pub fn compare_params(
    params_a_json: &str,
    params_b_json: &str,
    seed: u64,
) -> Result<String, JsValue> {
    let params_a = parse_params("Params A", params_a_json)?;
    let params_b = parse_params("Params B", params_b_json)?;

    let sim = LobbySimulator::new(seed);
    let report_a = sim.simulate(&params_a).map_err(|e| JsValue::from_str(&e))?;
    let report_b = sim.simulate(&params_b).map_err(|e| JsValue::from_str(&e))?;

    let comparison = serde_json::json!({
        "sweat_delta": sweat_delta(&report_a, &report_b),
        "params_a": report_a,
        "params_b": report_b,
    });

    serde_json::to_string(&comparison)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
