// src/docgen.rs
//! Doc generation: extracted units → three completions each → Markdown.
//!
//! Per unit, strictly in order: parameters, returns, then a description prompted
//! with the two generated sections. Rendered as
//!
//! ```text
//! ### Name
//! <description>
//! #### Parameters ...
//! #### Returns ...
//! ---
//! ```

use anyhow::{Context, Result};
use std::{io::Write, path::Path};

use crate::{
    config::Config,
    extract,
    model::TextModel,
    naming,
    packet::ExtractedUnit,
    prompt::{self, PARAMS_BASE, RETURNS_BASE},
    scan,
};

/// Generated sections for one unit (model text only, bases not included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDoc {
    pub name: String,
    pub description: String,
    pub params: String,
    pub returns: String,
}

impl UnitDoc {
    pub fn params_md(&self) -> String {
        format!("{PARAMS_BASE}{}", self.params)
    }

    pub fn returns_md(&self) -> String {
        format!("{RETURNS_BASE}{}", self.returns)
    }

    pub fn render<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "### {}", self.name)?;
        writeln!(out, "{}", self.description)?;
        writeln!(out, "{}", self.params_md())?;
        writeln!(out, "{}", self.returns_md())?;
        writeln!(out, "\n\n---\n\n\n\n")?;
        Ok(())
    }
}

/// Run the three completions for one unit.
pub fn document_unit<M: TextModel + ?Sized>(model: &M, config: &Config, unit: &ExtractedUnit) -> Result<UnitDoc> {
    let definition = unit.text();
    let id = unit.stable_id();

    let params = model
        .complete(&prompt::parameters(&definition), &config.model.params())
        .with_context(|| format!("parameters completion for {id}"))?;
    let params = params.text()?.to_string();

    let returns = model
        .complete(&prompt::returns(&definition), &config.model.returns())
        .with_context(|| format!("returns completion for {id}"))?;
    let returns = returns.text()?.to_string();

    let mut doc = UnitDoc { name: unit.name.clone(), description: String::new(), params, returns };

    let desc_prompt = prompt::description(&doc.params_md(), &doc.returns_md(), &definition);
    log::info!("{}", desc_prompt);

    let description = model
        .complete(&desc_prompt, &config.model.description())
        .with_context(|| format!("description completion for {id}"))?;
    doc.description = description.text()?.to_string();
    log::info!("{}", doc.description);

    Ok(doc)
}

/// Every documentable unit under `root`, files in walk order, units in source order.
pub fn extract_units(root: &Path, config: &Config) -> Result<Vec<ExtractedUnit>> {
    let rules = config.extract.scan_rules();
    let mut units = Vec::new();

    for file in scan::walk_sources(root, &config.extract.extensions)? {
        let lines = scan::read_lines(&file.path)?;
        let packets = extract::parse(&lines, &rules);
        log::debug!("[docgen] {}: {} units", file.rel_path, packets.len());

        for packet in packets.iter().filter(|p| !p.is_empty()) {
            let name = naming::resolve_name(packet);
            units.push(ExtractedUnit::from_packet(name, file.rel_path.as_str(), packet));
        }
    }
    Ok(units)
}

/// Document every unit under `root` into `out`. Returns the number of units written.
pub fn generate_tree<M, W>(root: &Path, config: &Config, model: &M, out: &mut W) -> Result<usize>
where
    M: TextModel + ?Sized,
    W: Write + ?Sized,
{
    let units = extract_units(root, config)?;
    log::info!("[docgen] {} units under {}", units.len(), root.display());

    for (i, unit) in units.iter().enumerate() {
        log::info!("[docgen] ({}/{}) {}", i + 1, units.len(), unit.stable_id());
        let doc = document_unit(model, config, unit)?;
        doc.render(out).context("writing markdown")?;
        out.flush().context("flushing markdown")?;
    }
    Ok(units.len())
}

/* ===================================== Tests ===================================== */
