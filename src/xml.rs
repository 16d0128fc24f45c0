//! DAX 3.4 document emission
//!
//! Output is deterministic for a given [`Adag`]: jobs and uses in authored
//! order, dependencies grouped by child in first-registration order.

use std::collections::HashMap;
use std::io;

use crate::adag::{Adag, Arg, Dependency};
use crate::error::DaxError;

const DAX_XMLNS: &str = "http://pegasus.isi.edu/schema/DAX";
const XSI_XMLNS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const DAX_SCHEMA_LOCATION: &str =
    "http://pegasus.isi.edu/schema/DAX http://pegasus.isi.edu/schema/dax-3.4.xsd";
const DAX_VERSION: &str = "3.4";

/// Serialize an [`Adag`] to a writer
pub fn write_adag<W: io::Write>(adag: &Adag, writer: &mut W) -> Result<(), DaxError> {
    writer.write_all(adag_to_string(adag).as_bytes())?;
    Ok(())
}

/// Serialize an [`Adag`] to an in-memory DAX document
pub fn adag_to_string(adag: &Adag) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<!-- generated by: daxgen v{} -->\n",
        env!("CARGO_PKG_VERSION")
    ));
    xml.push_str(&format!(
        "<adag xmlns=\"{}\" xmlns:xsi=\"{}\" xsi:schemaLocation=\"{}\" \
         version=\"{}\" name=\"{}\" index=\"{}\" count=\"{}\">\n",
        DAX_XMLNS,
        XSI_XMLNS,
        DAX_SCHEMA_LOCATION,
        DAX_VERSION,
        escape_xml(&adag.name),
        adag.index,
        adag.count
    ));

    for (id, job) in adag.jobs() {
        xml.push_str(&format!(
            "  <job id=\"{}\" name=\"{}\"",
            escape_xml(id),
            escape_xml(&job.name)
        ));
        if let Some(ref namespace) = job.namespace {
            xml.push_str(&format!(" namespace=\"{}\"", escape_xml(namespace)));
        }
        if let Some(ref version) = job.version {
            xml.push_str(&format!(" version=\"{}\"", escape_xml(version)));
        }
        xml.push_str(">\n");

        if !job.args.is_empty() {
            let rendered: Vec<String> = job
                .args
                .iter()
                .map(|arg| match arg {
                    Arg::Plain(text) => escape_xml(text),
                    Arg::File(file) => format!("<file name=\"{}\"/>", escape_xml(file.name())),
                })
                .collect();
            xml.push_str(&format!("    <argument>{}</argument>\n", rendered.join(" ")));
        }

        for file_use in &job.uses {
            xml.push_str(&format!(
                "    <uses name=\"{}\" link=\"{}\"",
                escape_xml(file_use.file.name()),
                file_use.link.as_str()
            ));
            if let Some(transfer) = file_use.transfer {
                xml.push_str(&format!(" transfer=\"{transfer}\""));
            }
            if let Some(register) = file_use.register {
                xml.push_str(&format!(" register=\"{register}\""));
            }
            if let Some(optional) = file_use.optional {
                xml.push_str(&format!(" optional=\"{optional}\""));
            }
            xml.push_str("/>\n");
        }

        xml.push_str("  </job>\n");
    }

    // Group by child, preserving first-registration order
    let mut child_order: Vec<&str> = Vec::new();
    let mut parents_by_child: HashMap<&str, Vec<&Dependency>> = HashMap::new();
    for dep in adag.dependencies() {
        parents_by_child
            .entry(dep.child.as_ref())
            .or_insert_with(|| {
                child_order.push(dep.child.as_ref());
                Vec::new()
            })
            .push(dep);
    }

    for child in child_order {
        xml.push_str(&format!("  <child ref=\"{}\">\n", escape_xml(child)));
        if let Some(parents) = parents_by_child.get(child) {
            for dep in parents {
                xml.push_str(&format!("    <parent ref=\"{}\"", escape_xml(&dep.parent)));
                if let Some(ref label) = dep.label {
                    xml.push_str(&format!(" edge-label=\"{}\"", escape_xml(label)));
                }
                xml.push_str("/>\n");
            }
        }
        xml.push_str("  </child>\n");
    }

    xml.push_str("</adag>\n");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
