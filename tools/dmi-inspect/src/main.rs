//! Command-line front end for the SMBIOS/DMI decoder.
//!
//! By default reads the kernel-exported table pair under
//! `/sys/firmware/dmi/tables`; `--from-dump` decodes a dump file instead,
//! and `--dump-bin` writes one for offline analysis.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use dmi_core::decode::decode_table;
use dmi_core::report::TextSink;
use dmi_core::{DecodeConfig, DecodeFlags, NoOemHook, TypeFilter};
use dmi_dump::LoadedTable;

const SYS_ENTRY_FILE: &str = "/sys/firmware/dmi/tables/smbios_entry_point";
const SYS_TABLE_FILE: &str = "/sys/firmware/dmi/tables/DMI";

#[derive(Parser, Debug)]
#[command(
    name = "dmi-inspect",
    about = "Decode SMBIOS/DMI hardware inventory tables into readable text."
)]
struct Args {
    /// Read the entry point and table from a dump file instead of sysfs
    #[arg(long, value_name = "FILE")]
    from_dump: Option<PathBuf>,

    /// Write the entry point and table to a dump file
    #[arg(long, value_name = "FILE")]
    dump_bin: Option<PathBuf>,

    /// Only decode these record types (a number or a keyword such as
    /// "bios", "memory", "processor"); repeatable
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    types: Vec<String>,

    /// Only decode the record with this handle
    #[arg(short = 'H', long, value_name = "HANDLE", value_parser = parse_handle)]
    handle: Option<u16>,

    /// Dump each record as hex instead of decoding it
    #[arg(short = 'u', long, action = clap::ArgAction::SetTrue)]
    dump: bool,

    /// Less verbose output: no banners, no diagnostics, no handle
    /// cross-references
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    quiet: bool,

    /// Stop decoding at the end-of-table marker for all entry point forms
    #[arg(long, action = clap::ArgAction::SetTrue)]
    stop_at_eot: bool,
}

fn parse_handle(arg: &str) -> Result<u16, String> {
    let digits = arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X"));
    match digits {
        Some(digits) => u16::from_str_radix(digits, 16),
        None => arg.parse(),
    }
    .map_err(|e| format!("invalid handle {arg:?}: {e}"))
}

fn build_type_filter(types: &[String]) -> anyhow::Result<Option<TypeFilter>> {
    if types.is_empty() {
        return Ok(None);
    }
    let mut filter = TypeFilter::empty();
    for spec in types {
        if let Ok(ty) = spec.parse::<u8>() {
            filter.insert(ty);
        } else if !filter.insert_keyword(spec) {
            let keywords: Vec<&str> = dmi_core::TYPE_KEYWORDS
                .iter()
                .map(|&(name, _)| name)
                .collect();
            bail!(
                "invalid type {spec:?}; expected a number (0-255) or one of: {}",
                keywords.join(", ")
            );
        }
    }
    Ok(Some(filter))
}

fn load(args: &Args) -> anyhow::Result<LoadedTable> {
    match &args.from_dump {
        Some(path) => dmi_dump::load_dump(path)
            .with_context(|| format!("reading dump file {}", path.display())),
        None => dmi_dump::load_split(Path::new(SYS_ENTRY_FILE), Path::new(SYS_TABLE_FILE))
            .context("reading SMBIOS data from sysfs (try --from-dump on other systems)"),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut flags = DecodeFlags::empty();
    if args.quiet {
        flags |= DecodeFlags::QUIET;
    }
    if args.stop_at_eot {
        flags |= DecodeFlags::STOP_AT_EOT;
    }
    if args.dump {
        flags |= DecodeFlags::DUMP_HEX;
    }
    if args.from_dump.is_some() {
        flags |= DecodeFlags::FROM_DUMP;
    }
    let cfg = DecodeConfig {
        flags,
        type_filter: build_type_filter(&args.types)?,
        handle_filter: args.handle,
    };

    let loaded = load(&args)?;

    if let Some(path) = &args.dump_bin {
        dmi_dump::save_dump(&loaded.entry, &loaded.table, path)
            .with_context(|| format!("writing dump file {}", path.display()))?;
        if !args.quiet {
            println!("# Wrote entry point and DMI table to {}.", path.display());
        }
        return Ok(());
    }

    let stdout = io::stdout().lock();
    let mut sink = TextSink::new(stdout);
    decode_table(&loaded.entry, &loaded.table, &cfg, &mut NoOemHook, &mut sink);
    Ok(())
}
