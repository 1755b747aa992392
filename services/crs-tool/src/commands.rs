//! The `list`, `describe` and `transform` commands.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crs_common::Authority;
use crs_parameter::{ParameterDescriptor, ValueKind};
use operation::{OperationRegistry, TransformProvider};
use projection::MathTransform;

/// One line per operation: code, name and kind.
///
/// With an authority, only operations that authority names or numbers are
/// listed, under that authority's name and code.
pub fn list(registry: &OperationRegistry, authority: Option<Authority>, out: &mut impl Write) -> Result<()> {
    for provider in registry.providers() {
        let group = provider.descriptor();
        let (code, name) = match authority {
            Some(authority) => {
                let code = group.identifier(authority).map(|id| id.to_string());
                let name = group
                    .all_names()
                    .find(|n| n.authority == authority && !n.deprecated)
                    .map(|n| n.name.clone());
                if code.is_none() && name.is_none() {
                    continue;
                }
                (code, name.unwrap_or_else(|| provider.name().to_string()))
            }
            None => (
                group.canonical_identifier().map(|id| id.to_string()),
                provider.name().to_string(),
            ),
        };
        writeln!(
            out,
            "{:<14} {:<52} {}",
            code.as_deref().unwrap_or("-"),
            name,
            provider.kind()
        )?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct OperationDescription {
    pub name: String,
    pub kind: String,
    pub identifiers: Vec<String>,
    pub aliases: Vec<String>,
    pub source_dimensions: usize,
    pub target_dimensions: usize,
    pub parameters: Vec<ParameterDescription>,
}

#[derive(Debug, Serialize)]
pub struct ParameterDescription {
    pub name: String,
    pub aliases: Vec<String>,
    pub kind: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub unit: String,
    pub minimum: Option<f64>,
    pub minimum_exclusive: bool,
    pub maximum: Option<f64>,
    pub default: Option<String>,
    pub mandatory: bool,
}

impl OperationDescription {
    pub fn of(provider: &dyn TransformProvider) -> Self {
        let group = provider.descriptor();
        Self {
            name: provider.name().to_string(),
            kind: provider.kind().to_string(),
            identifiers: group.identifiers().iter().map(|id| id.to_string()).collect(),
            aliases: group
                .aliases()
                .iter()
                .filter(|n| !n.deprecated)
                .map(|n| format!("{}:{}", n.authority, n.name))
                .collect(),
            source_dimensions: group.source_dimensions(),
            target_dimensions: group.target_dimensions(),
            parameters: group.parameters().iter().map(ParameterDescription::of).collect(),
        }
    }
}

impl ParameterDescription {
    fn of(descriptor: &ParameterDescriptor) -> Self {
        let options = match descriptor.kind() {
            ValueKind::Choice(options) => options.clone(),
            _ => Vec::new(),
        };
        Self {
            name: descriptor.primary_name().to_string(),
            aliases: descriptor
                .aliases()
                .iter()
                .filter(|n| !n.deprecated)
                .map(|n| format!("{}:{}", n.authority, n.name))
                .collect(),
            kind: descriptor.kind().as_str().to_string(),
            options,
            unit: descriptor.unit().to_string(),
            minimum: descriptor.min(),
            minimum_exclusive: descriptor.is_min_exclusive(),
            maximum: descriptor.max(),
            default: descriptor.default_value().map(|v| v.to_string()),
            mandatory: descriptor.is_mandatory(),
        }
    }

    fn range(&self) -> String {
        let open = if self.minimum_exclusive { "(" } else { "[" };
        match (self.minimum, self.maximum) {
            (None, None) => "-".to_string(),
            (min, max) => format!(
                "{}{}, {}]",
                open,
                min.map_or("-inf".to_string(), |v| v.to_string()),
                max.map_or("inf".to_string(), |v| v.to_string())
            ),
        }
    }
}

pub fn describe(registry: &OperationRegistry, operation: &str, json: bool, out: &mut impl Write) -> Result<()> {
    let provider = registry
        .find(operation)
        .with_context(|| format!("Unknown operation '{}'", operation))?;
    let description = OperationDescription::of(provider.as_ref());

    if json {
        serde_json::to_writer_pretty(&mut *out, &description)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{} ({})", description.name, description.kind)?;
    writeln!(out, "  identifiers: {}", description.identifiers.join(", "))?;
    if !description.aliases.is_empty() {
        writeln!(out, "  aliases:     {}", description.aliases.join(", "))?;
    }
    writeln!(
        out,
        "  dimensions:  {} -> {}",
        description.source_dimensions, description.target_dimensions
    )?;
    writeln!(out, "  parameters:")?;
    for p in &description.parameters {
        let kind = if p.options.is_empty() {
            p.kind.clone()
        } else {
            format!("{} {{{}}}", p.kind, p.options.join("|"))
        };
        writeln!(
            out,
            "    {:<44} {:<10} {:<8} {:<22} default={}{}",
            p.name,
            kind,
            p.unit,
            p.range(),
            p.default.as_deref().unwrap_or("-"),
            if p.mandatory { "" } else { " (optional)" }
        )?;
    }
    Ok(())
}

/// Split `name=value`. The name may itself not contain `=`.
pub fn parse_param(param: &str) -> Result<(&str, &str)> {
    match param.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => bail!("Expected NAME=VALUE, got '{}'", param),
    }
}

/// Parse one coordinate tuple separated by commas or whitespace.
pub fn parse_coordinates(line: &str) -> Result<Vec<f64>> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().with_context(|| format!("'{}' is not a number", s)))
        .collect()
}

/// Find `operation`, apply `params` and create the (optionally inverted) transform.
pub fn build_transform(
    registry: &OperationRegistry,
    operation: &str,
    params: &[String],
    inverse: bool,
) -> Result<Arc<dyn MathTransform>> {
    let provider = registry
        .find(operation)
        .with_context(|| format!("Unknown operation '{}'", operation))?;

    let mut values = provider.create_value();
    for param in params {
        let (name, value) = parse_param(param)?;
        values
            .set_text(name, value)
            .with_context(|| format!("Invalid parameter '{}'", param))?;
    }

    let provided = provider
        .create_transform(&values)
        .with_context(|| format!("Failed to create {}", provider.name()))?;
    info!(
        operation = provider.name(),
        transform = provided.transform.name(),
        source_dimensions = provided.source_dimensions(),
        target_dimensions = provided.target_dimensions(),
        complement = provided.is_complement(),
        "Created transform"
    );

    if inverse {
        provided.transform.inverse().context("Transform is not invertible")
    } else {
        Ok(provided.transform)
    }
}

/// Transform every non-blank line, writing one comma-separated tuple per input.
///
/// Lines starting with `#` are skipped. Returns the number of points written.
pub fn transform_lines(
    transform: &dyn MathTransform,
    lines: impl IntoIterator<Item = io::Result<String>>,
    out: &mut impl Write,
) -> Result<usize> {
    let mut count = 0;
    for (number, line) in lines.into_iter().enumerate() {
        let line = line.context("Failed to read input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let point = parse_coordinates(line).with_context(|| format!("Line {}", number + 1))?;
        if point.len() != transform.source_dimensions() {
            bail!(
                "Line {}: expected {} coordinates, got {}",
                number + 1,
                transform.source_dimensions(),
                point.len()
            );
        }

        let result = transform
            .transform(&point)
            .with_context(|| format!("Line {}", number + 1))?;
        let formatted: Vec<String> = result.iter().map(|v| v.to_string()).collect();
        writeln!(out, "{}", formatted.join(","))?;
        count += 1;
    }
    debug!(points = count, "Transformed input");
    Ok(count)
}
