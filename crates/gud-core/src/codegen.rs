//! Declaration header generation.
//!
//! Renders a description table as COMMON-block declarations for the host
//! model's build. The generated block sits between two marker lines and the
//! end marker records the MD5 checksum of the block:
//!
//! ```text
//! C--[[[begin]]]
//!       COMMON /GUD_CONSTANTS_r/
//!      &    rad2deg
//!       _RL rad2deg
//!
//! C--[[[end]]] (checksum: 0c6d3b7e...)
//! ```
//!
//! Rendering is deterministic and follows the table's declaration order, so
//! regenerating from an unchanged table reproduces the header byte for byte.
//! A block edited by hand no longer matches its recorded checksum.

use crate::errors::{GudError, GudResult};
use crate::features::FeatureFlag;
use crate::table::{DescriptionTable, GroupDefinition, ParameterDefinition};
use crate::value::ParameterKind;
use md5::{Digest, Md5};

/// Line opening the generated block
pub const BEGIN_MARKER: &str = "C--[[[begin]]]";
/// Prefix of the line closing the generated block
pub const END_MARKER: &str = "C--[[[end]]]";

const CHECKSUM_PREFIX: &str = " (checksum: ";

/// Storage blocks are emitted per kind in this order.
const KIND_ORDER: [ParameterKind; 4] = [
    ParameterKind::Logical,
    ParameterKind::Text,
    ParameterKind::Integer,
    ParameterKind::Real,
];

fn block_suffix(kind: ParameterKind) -> &'static str {
    match kind {
        ParameterKind::Logical => "l",
        ParameterKind::Text => "c",
        ParameterKind::Integer => "i",
        ParameterKind::Real => "r",
    }
}

fn declared_type(parameter: &ParameterDefinition) -> String {
    match parameter.kind {
        ParameterKind::Logical => "LOGICAL".to_string(),
        ParameterKind::Integer => "INTEGER".to_string(),
        ParameterKind::Real => "_RL".to_string(),
        ParameterKind::Text => format!("CHARACTER*{}", parameter.length.unwrap_or(1)),
    }
}

/// MD5 hex digest of a generated block
pub fn checksum(block: &str) -> String {
    format!("{:x}", Md5::digest(block.as_bytes()))
}

/// Render the declarations of every group.
///
/// Each group gets one storage block per parameter kind, named after the
/// group with a kind suffix (`_l`, `_c`, `_i`, `_r`). A group condition wraps
/// the whole group; parameter conditions that differ from their group's wrap
/// each run of consecutive parameters sharing the condition.
pub fn render_declarations(table: &DescriptionTable) -> GudResult<String> {
    table.validate()?;

    let mut out = String::new();
    for group in &table.groups {
        if let Some(flag) = &group.enabled_if {
            out.push_str(&format!("#ifdef {flag}\n"));
        }

        for kind in KIND_ORDER {
            let members: Vec<&ParameterDefinition> =
                group.parameters.iter().filter(|p| p.kind == kind).collect();
            if members.is_empty() {
                continue;
            }

            out.push_str(&format!(
                "      COMMON /{}_{}/\n",
                group.name,
                block_suffix(kind)
            ));
            let last = members.len() - 1;
            write_runs(&mut out, group, &members, |i, p| {
                let separator = if i < last { "," } else { "" };
                format!("     &    {}{separator}", p.name)
            });
            write_runs(&mut out, group, &members, |_, p| {
                let dims = p
                    .dims
                    .as_ref()
                    .map(|d| format!("({d})"))
                    .unwrap_or_default();
                format!("      {} {}{dims}", declared_type(p), p.name)
            });
        }

        if group.enabled_if.is_some() {
            out.push_str("#endif\n");
        }
        out.push('\n');
    }
    Ok(out)
}

/// Write one line per member, wrapping conditional runs in `#ifdef`/`#endif`.
fn write_runs(
    out: &mut String,
    group: &GroupDefinition,
    members: &[&ParameterDefinition],
    line: impl Fn(usize, &ParameterDefinition) -> String,
) {
    let mut open: Option<&FeatureFlag> = None;
    for (i, parameter) in members.iter().enumerate() {
        let condition = parameter
            .enabled_if
            .as_ref()
            .filter(|flag| Some(*flag) != group.enabled_if.as_ref());
        if condition != open {
            if open.is_some() {
                out.push_str("#endif\n");
            }
            if let Some(flag) = condition {
                out.push_str(&format!("#ifdef {flag}\n"));
            }
            open = condition;
        }
        out.push_str(&line(i, parameter));
        out.push('\n');
    }
    if open.is_some() {
        out.push_str("#endif\n");
    }
}

/// Render the complete header file.
pub fn render_header(table: &DescriptionTable) -> GudResult<String> {
    let body = render_declarations(table)?;
    let header_name = table
        .header
        .clone()
        .unwrap_or_else(|| format!("{}_GENPARAMS.h", table.package.to_uppercase()));

    let mut out = String::new();
    out.push_str(&format!(
        "C This file is generated from the {} parameter description table.\n",
        table.package
    ));
    out.push_str("C Code between the begin and end markers is regenerated;\n");
    out.push_str("C add new parameters to the table instead of editing it.\n\n");

    if let Some(guard) = &table.guard {
        out.push_str(&format!("#ifdef {guard}\n\n"));
    }

    out.push_str("CBOP\n");
    out.push_str(&format!("C     !ROUTINE: {header_name}\n"));
    out.push_str("C     !INTERFACE:\n");
    out.push_str(&format!("C #include {header_name}\n\n"));
    out.push_str("C     !DESCRIPTION:\n");
    out.push_str(&format!(
        "C Contains run-time parameters for the {} package\n",
        table.package
    ));
    if !table.requires.is_empty() {
        out.push_str("C\n");
        out.push_str(&format!("C Requires: {}\n", table.requires.join(", ")));
    }
    out.push('\n');

    out.push_str(BEGIN_MARKER);
    out.push('\n');
    out.push_str(&body);
    out.push_str(&format!(
        "{END_MARKER}{CHECKSUM_PREFIX}{})\n",
        checksum(&body)
    ));

    if let Some(guard) = &table.guard {
        out.push_str(&format!("\n#endif /* {guard} */\n"));
    }
    Ok(out)
}

/// The generated block of a header and the checksum recorded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBlock<'a> {
    pub body: &'a str,
    pub checksum: &'a str,
}

/// Locate the generated block of a header.
pub fn extract_block(header: &str) -> GudResult<GeneratedBlock<'_>> {
    let begin = find_line(header, BEGIN_MARKER, 0)
        .ok_or_else(|| GudError::MalformedHeader(format!("missing '{BEGIN_MARKER}' line")))?;
    let body_start = header[begin..]
        .find('\n')
        .map(|i| begin + i + 1)
        .ok_or_else(|| GudError::MalformedHeader("generated block is empty".to_string()))?;
    let end = find_line(header, END_MARKER, body_start)
        .ok_or_else(|| GudError::MalformedHeader(format!("missing '{END_MARKER}' line")))?;

    let end_line = header[end..].lines().next().unwrap_or_default();
    let checksum = end_line[END_MARKER.len()..]
        .strip_prefix(CHECKSUM_PREFIX)
        .and_then(|rest| rest.trim_end().strip_suffix(')'))
        .ok_or_else(|| {
            GudError::MalformedHeader(format!("no checksum recorded in '{end_line}'"))
        })?;

    Ok(GeneratedBlock {
        body: &header[body_start..end],
        checksum,
    })
}

/// Byte offset of the first line at or after `from` that starts with `marker`.
fn find_line(text: &str, marker: &str, from: usize) -> Option<usize> {
    let mut offset = from;
    for line in text[from..].split_inclusive('\n') {
        if line.starts_with(marker) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

/// Check the generated block still matches its recorded checksum.
pub fn verify_header(header: &str) -> GudResult<()> {
    let block = extract_block(header)?;
    let computed = checksum(block.body);
    if computed != block.checksum {
        return Err(GudError::ChecksumMismatch {
            recorded: block.checksum.to_string(),
            computed,
        });
    }
    Ok(())
}

/// Check a header is intact and was generated from `table`.
pub fn is_current(header: &str, table: &DescriptionTable) -> GudResult<bool> {
    verify_header(header)?;
    let block = extract_block(header)?;
    Ok(block.body == render_declarations(table)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizes::Extent;

    fn table() -> DescriptionTable {
        DescriptionTable::new("gud")
            .with_header("GUD_GENPARAMS.h")
            .with_guard("ALLOW_GUD")
            .requires("GUD_SIZE.h")
            .group("GUD_CONSTANTS")
            .parameter(ParameterDefinition::real("rad2deg"))
            .build()
            .group("CARBON_CONSTANTS")
            .enabled_if("GUD_ALLOW_CARBON")
            .parameter(ParameterDefinition::real("Pa2Atm"))
            .parameter(ParameterDefinition::real("ptr2mol"))
            .build()
            .group("GUD_PARAMS")
            .parameter(ParameterDefinition::real("Kdissc"))
            .parameter(ParameterDefinition::real("R_OP").enabled_if("GUD_ALLOW_CARBON"))
            .parameter(ParameterDefinition::real("m3perkg").enabled_if("GUD_ALLOW_CARBON"))
            .parameter(ParameterDefinition::real("diaz_ini_fac"))
            .parameter(ParameterDefinition::integer("gud_seed"))
            .parameter(ParameterDefinition::logical("gud_read_phos"))
            .build()
            .group("GUD_RADTRANS_PARAMS")
            .enabled_if("GUD_ALLOW_RADTRANS")
            .parameter(ParameterDefinition::text("gud_waterAbsorbFile", 80))
            .parameter(ParameterDefinition::real_array(
                "gud_waveband_edges",
                Extent::named_with_offset("nlam", 1),
            ))
            .build()
    }

    #[test]
    fn test_render_declarations() {
        let expected = "\
      COMMON /GUD_CONSTANTS_r/
     &    rad2deg
      _RL rad2deg

#ifdef GUD_ALLOW_CARBON
      COMMON /CARBON_CONSTANTS_r/
     &    Pa2Atm,
     &    ptr2mol
      _RL Pa2Atm
      _RL ptr2mol
#endif

      COMMON /GUD_PARAMS_l/
     &    gud_read_phos
      LOGICAL gud_read_phos
      COMMON /GUD_PARAMS_i/
     &    gud_seed
      INTEGER gud_seed
      COMMON /GUD_PARAMS_r/
     &    Kdissc,
#ifdef GUD_ALLOW_CARBON
     &    R_OP,
     &    m3perkg,
#endif
     &    diaz_ini_fac
      _RL Kdissc
#ifdef GUD_ALLOW_CARBON
      _RL R_OP
      _RL m3perkg
#endif
      _RL diaz_ini_fac

#ifdef GUD_ALLOW_RADTRANS
      COMMON /GUD_RADTRANS_PARAMS_c/
     &    gud_waterAbsorbFile
      CHARACTER*80 gud_waterAbsorbFile
      COMMON /GUD_RADTRANS_PARAMS_r/
     &    gud_waveband_edges
      _RL gud_waveband_edges(nlam+1)
#endif

";
        assert_eq!(render_declarations(&table()).unwrap(), expected);
    }

    #[test]
    fn test_render_is_idempotent() {
        let first = render_header(&table()).unwrap();
        let second = render_header(&table()).unwrap();
        assert_eq!(first, second);
        assert!(is_current(&first, &table()).unwrap());
    }

    #[test]
    fn test_header_layout() {
        let header = render_header(&table()).unwrap();
        assert!(header.contains("#ifdef ALLOW_GUD\n"));
        assert!(header.contains("C     !ROUTINE: GUD_GENPARAMS.h\n"));
        assert!(header.contains("C Requires: GUD_SIZE.h\n"));
        assert!(header.ends_with("#endif /* ALLOW_GUD */\n"));

        let block = extract_block(&header).unwrap();
        assert_eq!(block.body, render_declarations(&table()).unwrap());
        assert_eq!(block.checksum, checksum(block.body));
        assert_eq!(block.checksum.len(), 32);
    }

    #[test]
    fn test_checksum_of_empty_block() {
        assert_eq!(checksum(""), "d41d8cd98f00b204e9800998ecf8427e");

        let header = render_header(&DescriptionTable::new("gud")).unwrap();
        let block = extract_block(&header).unwrap();
        assert_eq!(block.body, "");
        assert_eq!(block.checksum, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_hand_edit_is_detected() {
        let header = render_header(&table()).unwrap();
        let edited = header.replace("_RL ptr2mol", "_RL ptr2mol, extra");

        match verify_header(&edited) {
            Err(GudError::ChecksumMismatch { recorded, computed }) => {
                assert_ne!(recorded, computed);
            }
            other => panic!("Expected ChecksumMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_changed_table_is_not_current() {
        let header = render_header(&table()).unwrap();
        let changed = table()
            .group("GUD_CDOM_PARAMS")
            .enabled_if("GUD_ALLOW_CDOM")
            .parameter(ParameterDefinition::real("fracCDOM"))
            .build();

        // Intact, but stale
        assert!(verify_header(&header).is_ok());
        assert!(!is_current(&header, &changed).unwrap());
    }

    #[test]
    fn test_malformed_headers() {
        assert!(matches!(
            extract_block("no markers here\n"),
            Err(GudError::MalformedHeader(_))
        ));
        assert!(matches!(
            extract_block("C--[[[begin]]]\n      _RL x\n"),
            Err(GudError::MalformedHeader(_))
        ));
        assert!(matches!(
            extract_block("C--[[[begin]]]\n      _RL x\nC--[[[end]]]\n"),
            Err(GudError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_render_rejects_invalid_table() {
        let table = DescriptionTable::new("gud")
            .group("CARBON_CONSTANTS")
            .parameter(ParameterDefinition::real("Pa2Atm"))
            .parameter(ParameterDefinition::real("Pa2Atm"))
            .build();
        assert!(matches!(
            render_header(&table),
            Err(GudError::DuplicateName { .. })
        ));
    }
}
