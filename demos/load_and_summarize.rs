// Load files and print a summary
// Author: Gabriel Demetrios Lafis
//
// cargo run --example load_and_summarize -- <file>... [--stats COLUMN] [--chart X Y]

use anyhow::{bail, Context, Result};

use rust_dataframe_viewer::{
    processing::ChartKind,
    utils::init_logging,
    Config, Session, Table,
};

fn main() -> Result<()> {
    let config = match std::env::var("VIEWER_CONFIG") {
        Ok(path) => Config::from_file(&path).with_context(|| format!("loading {}", path))?,
        Err(_) => Config::default(),
    };

    if let Err(err) = init_logging(config.log_level_filter()) {
        eprintln!("Error initializing logger: {}", err);
    }

    let mut files = Vec::new();
    let mut stats_column = None;
    let mut chart_columns = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--stats" => stats_column = Some(args.next().context("--stats needs a column")?),
            "--chart" => {
                let x = args.next().context("--chart needs an x column")?;
                let y = args.next().context("--chart needs a y column")?;
                chart_columns = Some((x, y));
            }
            _ => files.push(arg),
        }
    }

    if files.is_empty() {
        bail!(
            "usage: load_and_summarize <file>... [--stats COLUMN] [--chart X Y] (supported: {})",
            Session::new(&config).registry().supported_extensions().join(", ")
        );
    }

    let mut session = Session::new(&config);
    let report = session.load_paths(&files).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if let Some(warning) = &report.warning {
        println!("Warning: {}", warning);
    }

    if let Some(table) = session.table() {
        print_table(table, &session.visible_rows(), 10);
    }

    if let Some(column) = stats_column {
        let stats = session.column_stats(&column)?;
        println!("\nStatistics for '{}':\n{}", column, stats);
    }

    if let Some((x, y)) = chart_columns {
        let dataset = session.chart_dataset(ChartKind::Bar, &x, &y)?;
        println!("\n{} by {}:", dataset.y_label, dataset.x_label);
        for (category, value) in dataset.iter() {
            println!("  {:<20} {}", category, value);
        }
    }

    Ok(())
}

fn print_table(table: &Table, order: &[usize], limit: usize) {
    println!("{}", table.columns().join("\t"));
    for &index in order.iter().take(limit) {
        if let Some(row) = table.get_row(index) {
            let cells: Vec<String> = row.iter().map(|v| v.to_text()).collect();
            println!("{}", cells.join("\t"));
        }
    }
    if order.len() > limit {
        println!("... {} more rows", order.len() - limit);
    }
}
