// Rust DataFrame Viewer
// Author: Gabriel Demetrios Lafis

//! # Rust DataFrame Viewer
//!
//! The data core of a dataframe viewer: it reads tabular files into one
//! in-memory [`Table`] and answers the questions the UI asks about it.
//!
//! ## Features
//!
//! - Loading `.csv`, `.json` (array of records), `.xlsx` (first sheet) and
//!   `.db` (SQLite) files, dispatched by extension
//! - Merging several files with identical headers into one table
//! - Case-insensitive search filtering
//! - Stable multi-column sorting toggled per column
//! - Descriptive statistics for a numeric column
//! - Category datasets for bar, line and pie charts
//!
//! ## Example
//!
//! ```no_run
//! use rust_dataframe_viewer::{processing::ChartKind, Config, Session};
//!
//! let mut session = Session::new(&Config::default());
//!
//! let report = session.load_paths(&["sales_q1.csv", "sales_q2.csv"])?;
//! if let Some(warning) = &report.warning {
//!     eprintln!("{}", warning);
//! }
//!
//! session.set_search("north");
//! session.toggle_sort(0);
//! let visible = session.visible_rows();
//! println!("{} rows visible", visible.len());
//!
//! println!("{}", session.column_stats("revenue")?);
//! let dataset = session.chart_dataset(ChartKind::Bar, "region", "revenue")?;
//! for (category, value) in dataset.iter() {
//!     println!("{}: {}", category, value);
//! }
//! # Ok::<(), rust_dataframe_viewer::AppError>(())
//! ```

pub mod data;
pub mod processing;
pub mod session;
pub mod utils;

// Re-export main types
pub use data::{DataError, ParserRegistry, Row, Table, Value};
pub use processing::ProcessingError;
pub use session::{LoadReport, Session};
pub use utils::{AppError, AppResult, Config};
