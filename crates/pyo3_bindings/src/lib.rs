//! PyO3 bindings for the trade statement normalizer.
//!
//! Exposes the exploration session to the Python presentation layer:
//! - Loading principal and tertiary statements
//! - Date and identifier filters
//! - Style map, hover fields and JSON export
//! - Per-statement data views
//! - Logging setup

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use statement_core::{
    Config as RustConfig, Error as RustError, SourceRole, TradeEvent as RustTradeEvent,
};
use statement_explorer::{EventFilter, StatementInput, TradeExplorer};

fn to_py_err(e: RustError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// The principal statement, or the tertiary one with this file id.
fn role_for(file_id: Option<String>) -> SourceRole {
    match file_id {
        Some(id) => SourceRole::Tertiary(id),
        None => SourceRole::Principal,
    }
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// One normalized trade event.
#[pyclass]
#[derive(Clone)]
pub struct TradeEvent {
    /// ISO timestamp, `None` when the export had no valid time.
    #[pyo3(get)]
    pub time: Option<String>,
    #[pyo3(get)]
    pub price: Option<f64>,
    #[pyo3(get)]
    pub profit: String,
    #[pyo3(get)]
    pub take_profit: String,
    #[pyo3(get)]
    pub size: Option<f64>,
    #[pyo3(get)]
    pub ticket: String,
    #[pyo3(get)]
    pub source: String,
    #[pyo3(get)]
    pub event_type: String,
    #[pyo3(get)]
    pub copy_ref: String,
    #[pyo3(get)]
    pub day: Option<u32>,
    #[pyo3(get)]
    pub month: Option<u32>,
    #[pyo3(get)]
    pub year: Option<i32>,
}

#[pymethods]
impl TradeEvent {
    fn __repr__(&self) -> String {
        format!(
            "TradeEvent(ticket={}, type={}, time={:?}, price={:?})",
            self.ticket, self.event_type, self.time, self.price
        )
    }
}

impl From<&RustTradeEvent> for TradeEvent {
    fn from(e: &RustTradeEvent) -> Self {
        TradeEvent {
            time: e.time.map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string()),
            price: e.price,
            profit: e.profit.clone(),
            take_profit: e.take_profit.clone(),
            size: e.size,
            ticket: e.ticket.clone(),
            source: e.source.clone(),
            event_type: e.event_type.clone(),
            copy_ref: e.copy_ref.to_string(),
            day: e.day,
            month: e.month,
            year: e.year,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Statement exploration session.
#[pyclass]
pub struct PyTradeExplorer {
    inner: TradeExplorer,
}

impl PyTradeExplorer {
    fn select(&self, filter: &EventFilter) -> Vec<TradeEvent> {
        self.inner
            .view(filter)
            .into_iter()
            .map(TradeEvent::from)
            .collect()
    }
}

#[pymethods]
impl PyTradeExplorer {
    /// Create a session, optionally overriding configuration with JSON.
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => RustConfig::from_json(json).map_err(to_py_err)?,
            None => RustConfig::default(),
        };
        let inner = TradeExplorer::new(&config).map_err(to_py_err)?;
        Ok(PyTradeExplorer { inner })
    }

    /// Load the principal statement. Returns its event count.
    fn load_principal(&mut self, name: &str, html: &str) -> PyResult<usize> {
        self.inner.load_principal(name, html).map_err(to_py_err)
    }

    /// Load one tertiary statement. Returns its event count.
    fn load_tertiary(&mut self, name: &str, html: &str) -> PyResult<usize> {
        self.inner.load_tertiary(name, html).map_err(to_py_err)
    }

    /// Load several tertiary statements in parallel.
    ///
    /// Returns `(name, events, error)` per file; failed files report their
    /// error and leave the session untouched.
    fn load_tertiaries(
        &mut self,
        py: Python<'_>,
        files: Vec<(String, String)>,
    ) -> PyResult<Vec<(String, usize, Option<String>)>> {
        let names: Vec<String> = files.iter().map(|(name, _)| name.clone()).collect();
        let inputs = files
            .into_iter()
            .map(|(name, html)| StatementInput::tertiary(name, html))
            .collect();

        let inner = &mut self.inner;
        let results = py
            .allow_threads(|| inner.load_batch(inputs))
            .map_err(to_py_err)?;

        Ok(names
            .into_iter()
            .zip(results)
            .map(|(name, result)| match result {
                Ok(events) => (name, events, None),
                Err(e) => (name, 0, Some(e.to_string())),
            })
            .collect())
    }

    /// Every merged event.
    fn all(&self) -> Vec<TradeEvent> {
        self.select(&EventFilter::All)
    }

    fn by_day(&self, day: u32, month: u32, year: i32) -> Vec<TradeEvent> {
        self.select(&EventFilter::Day { day, month, year })
    }

    fn by_month(&self, month: u32, year: i32) -> Vec<TradeEvent> {
        self.select(&EventFilter::Month { month, year })
    }

    fn by_year(&self, year: i32) -> Vec<TradeEvent> {
        self.select(&EventFilter::Year { year })
    }

    fn by_day_range(
        &self,
        start_day: u32,
        end_day: u32,
        month: u32,
        year: i32,
    ) -> Vec<TradeEvent> {
        self.select(&EventFilter::DayRange {
            start_day,
            end_day,
            month,
            year,
        })
    }

    fn by_month_range(
        &self,
        start_month: u32,
        start_year: i32,
        end_month: u32,
        end_year: i32,
    ) -> Vec<TradeEvent> {
        self.select(&EventFilter::MonthRange {
            start_month,
            start_year,
            end_month,
            end_year,
        })
    }

    fn by_year_range(&self, start_year: i32, end_year: i32) -> Vec<TradeEvent> {
        self.select(&EventFilter::YearRange {
            start_year,
            end_year,
        })
    }

    /// Principal ticket or copy identifier.
    fn by_identifier(&self, identifier: String) -> Vec<TradeEvent> {
        self.select(&EventFilter::Identifier { identifier })
    }

    /// Filter given as JSON, e.g. `{"mode": "year", "year": 2023}`.
    fn view(&self, filter_json: &str) -> PyResult<Vec<TradeEvent>> {
        let filter = EventFilter::from_json(filter_json).map_err(to_py_err)?;
        Ok(self.select(&filter))
    }

    /// JSON rows of a filter given as JSON.
    fn view_json(&self, filter_json: &str) -> PyResult<String> {
        let filter = EventFilter::from_json(filter_json).map_err(to_py_err)?;
        self.inner.view_json(&filter).map_err(to_py_err)
    }

    /// `(label, marker, color)` for every event type of the loaded files.
    fn style_map(&self) -> Vec<(String, String, String)> {
        self.inner
            .styles()
            .entries()
            .iter()
            .map(|s| {
                (
                    s.label.clone(),
                    s.marker.as_str().to_string(),
                    s.color.to_string(),
                )
            })
            .collect()
    }

    /// Events of one loaded statement, before merging.
    #[pyo3(signature = (file_id=None))]
    fn statement_events(&self, file_id: Option<String>) -> Option<Vec<TradeEvent>> {
        self.inner
            .statement(&role_for(file_id))
            .map(|table| table.events().iter().map(TradeEvent::from).collect())
    }

    /// Data view rows of one loaded statement as JSON.
    #[pyo3(signature = (file_id=None))]
    fn statement_json(&self, file_id: Option<String>) -> PyResult<Option<String>> {
        self.inner
            .statement_json(&role_for(file_id))
            .map_err(to_py_err)
    }

    /// File ids of the loaded tertiary statements.
    fn tertiary_ids(&self) -> Vec<String> {
        self.inner
            .roles()
            .filter_map(|role| role.file_id().map(str::to_string))
            .collect()
    }

    /// Columns of a per-statement data view.
    #[staticmethod]
    fn display_columns() -> Vec<&'static str> {
        statement_core::display_columns()
    }

    fn hover_fields(&self) -> Vec<&'static str> {
        self.inner.hover_fields().to_vec()
    }

    /// Number of merged events.
    fn __len__(&self) -> usize {
        self.inner.merged().len()
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Install a tracing subscriber. `filter` defaults to `RUST_LOG`, then `info`.
///
/// Returns `False` if a subscriber was already installed.
#[pyfunction]
#[pyo3(signature = (filter=None))]
fn init_logging(filter: Option<String>) -> bool {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();
    if installed {
        info!("logging initialized");
    }
    installed
}

// ============================================================================
// Module Definition
// ============================================================================

/// Trade statement normalizer for Python.
#[pymodule]
fn trade_statements(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<TradeEvent>()?;
    m.add_class::<PyTradeExplorer>()?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    Ok(())
}
