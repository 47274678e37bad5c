// src/main.rs

use anyhow::Result;
use docgen::commands;

fn main() -> Result<()> {
    commands::run_cli()
}
