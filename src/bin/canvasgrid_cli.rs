//! CLI tool for canvasgrid - imports a CSV/TSV/JSON table and prints aggregates
//!
//! Usage:
//!   canvasgrid_cli <table.csv>                     # Import and report populated cells
//!   canvasgrid_cli <table.csv> D1:D51              # ... plus aggregates over a range
//!   canvasgrid_cli <table.json> B2:C9 --config g.json
//!
//! Set `RUST_LOG=debug` to see import and command logs on stderr.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use canvasgrid::cell_ref::{format_cell_ref, parse_cell_range};
use canvasgrid::{CellPos, Grid, GridConfig, ImportFormat};
use tracing_subscriber::EnvFilter;

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        fail("Usage: canvasgrid_cli <file.csv|file.tsv|file.json> [RANGE] [--config grid.json]");
    }

    let input_path = &args[1];
    let mut range_arg: Option<&str> = None;
    let mut config_path: Option<&str> = None;
    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--config" {
            config_path = rest.next().map(String::as_str);
        } else {
            range_arg = Some(arg);
        }
    }

    let config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .unwrap_or_else(|e| fail(&format!("Error reading {path}: {e}")));
            GridConfig::from_json(&text).unwrap_or_else(|e| fail(&format!("Invalid config: {e}")))
        }
        None => GridConfig::default(),
    };

    let format = ImportFormat::from_path(input_path)
        .unwrap_or_else(|| fail(&format!("Unknown file type: {input_path}")));
    let text = fs::read_to_string(input_path)
        .unwrap_or_else(|e| fail(&format!("Error reading {input_path}: {e}")));

    let mut grid = Grid::new(config).unwrap_or_else(|e| fail(&format!("Invalid config: {e}")));
    let count = grid
        .load(format, &text)
        .unwrap_or_else(|e| fail(&format!("{input_path}: {e}")));

    let mut report = serde_json::json!({
        "file": input_path,
        "cells": count,
    });

    if let Some(range_arg) = range_arg {
        let range = parse_cell_range(range_arg)
            .unwrap_or_else(|| fail(&format!("Invalid range: {range_arg}")));
        grid.select_range(
            CellPos::new(range.start_row, range.start_col),
            CellPos::new(range.end_row, range.end_col),
        )
        .unwrap_or_else(|e| fail(&format!("Range outside grid: {e}")));
        let selected = grid.get_selection().unwrap();
        report["range"] = serde_json::json!(format!(
            "{}:{}",
            format_cell_ref(CellPos::new(selected.start_row, selected.start_col)),
            format_cell_ref(CellPos::new(selected.end_row, selected.end_col)),
        ));
        report["aggregates"] = serde_json::to_value(grid.aggregate()).unwrap();
    }

    let json = serde_json::to_string_pretty(&report).unwrap();
    io::stdout().write_all(json.as_bytes()).unwrap();
    println!();
}
