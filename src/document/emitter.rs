use super::{CalibrationSource, Document};
use std::fmt::{self, Write};

/// Double-quotes a scalar, escaping backslashes and quotes.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Turns a symbolic name into an interpolation token. Empty stays empty.
pub fn wrap_source(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!("${{{}}}", name)
    }
}

pub(super) fn write_document<W: Write>(out: &mut W, doc: &Document) -> fmt::Result {
    writeln!(out, "# {}", doc.header)?;
    writeln!(out)?;
    writeln!(out, "id: {}", quote(&doc.id))?;
    writeln!(out, "type: {}", quote(&doc.device_type))?;
    writeln!(out, "bus: {}", quote(&doc.bus))?;
    writeln!(out, "address: {}", quote(&doc.address))?;
    writeln!(out)?;

    writeln!(out, "identify:")?;
    writeln!(out, "  whoami_reg: {}", quote(&doc.identify.whoami_reg))?;
    writeln!(out, "  whoami_value: {}", quote(&doc.identify.whoami_value))?;
    writeln!(out)?;

    writeln!(out, "read:")?;
    writeln!(out, "  interval_ms: {}", doc.read.interval_ms)?;
    writeln!(out, "  registers:")?;
    for register in &doc.read.registers {
        writeln!(out, "    - name: {}", quote(&register.name))?;
        writeln!(out, "      reg: {}", quote(&register.reg))?;
        writeln!(out, "      len: {}", register.len)?;
        writeln!(out, "      decode: {}", quote(&register.decode))?;
    }

    if !doc.constants.is_empty() {
        writeln!(out)?;
        writeln!(out, "constants:")?;
        for constant in &doc.constants {
            // Constant values are written as entered, text included.
            writeln!(out, "  {}: {}", constant.name, constant.value)?;
        }
    }

    if !doc.calibrate.is_empty() {
        writeln!(out)?;
        writeln!(out, "calibrate:")?;
        for entry in &doc.calibrate {
            writeln!(out, "  {}:", entry.name)?;
            match &entry.source {
                CalibrationSource::Single(input) => writeln!(out, "    input: {}", quote(input))?,
                CalibrationSource::Named(inputs) if !inputs.is_empty() => {
                    writeln!(out, "    inputs:")?;
                    for (key, source) in inputs {
                        writeln!(out, "      {}: {}", key, quote(source))?;
                    }
                }
                CalibrationSource::Named(_) => {}
            }
            writeln!(out, "    expr: {}", quote(&entry.expr))?;
            if let Some(description) = entry.description.as_deref().filter(|d| !d.is_empty()) {
                writeln!(out, "    # {}", description.replace('\n', " "))?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "map:")?;
    writeln!(out, "  status:")?;
    if doc.map.status.is_empty() {
        writeln!(out, "    sensor_overview: []")?;
    } else {
        writeln!(out, "    sensor_overview:")?;
        for status in &doc.map.status {
            writeln!(out, "      - sensor_id: {}", quote(&status.sensor_id))?;
            writeln!(out, "        sensor_type: {}", quote(&status.sensor_type))?;
            writeln!(out, "        value: {}", quote(&status.value))?;
            if let Some(unit) = &status.unit {
                writeln!(out, "        unit: {}", quote(unit))?;
            }
        }
    }

    if doc.map.telemetry.is_empty() {
        writeln!(out, "  telemetry: {{}}")?;
    } else {
        writeln!(out, "  telemetry:")?;
        for topic in &doc.map.telemetry {
            writeln!(out, "    {}:", quote(&topic.topic))?;
            for field in &topic.fields {
                writeln!(out, "      {}: {}", field.field, quote(&field.value))?;
            }
        }
    }
    Ok(())
}
