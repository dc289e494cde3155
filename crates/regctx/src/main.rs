use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use regctx_core::catalog::{MachineVariant, RegisterCatalog};
use regctx_core::context::{NativeRegisterContext, NativeRegisterContextMips64};
use regctx_core::error::{RegctxError, RegctxResult};
use regctx_core::native::{NativeProcess, ThreadHandle};
use regctx_core::platform::loopback::LoopbackProcess;
use regctx_core::types::{Address, Architecture, RegisterDescriptor, RegisterKind, ThreadId};
use regctx_core::watchpoints::{WatchFlags, WatchpointCapability, INVALID_WATCHPOINT_INDEX};
use regctx_utils::{debug, info, init_logging, init_logging_with_config, LogConfig, LogLevel, LoggingError, LoggingGuard};

/// Inspect register layouts and drive register contexts.
#[derive(Parser, Debug)]
#[command(name = "regctx")]
#[command(version)]
#[command(about = "Inspect register layout catalogs and drive register contexts", long_about = None)]
struct Cli
{
    /// Target architecture (mips64 or mips64el)
    #[arg(long, global = true, default_value = "mips64el")]
    arch: String,

    /// Log level (error, warn, info, debug, trace); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// List the register sets of the architecture
    Sets,
    /// List register descriptors
    Registers
    {
        /// Only list the registers of this set index
        #[arg(long)]
        set: Option<usize>,
    },
    /// Show the hardware watchpoint capabilities
    Watchpoints,
    /// Write and read registers of a thread backed by in-memory storage
    Session
    {
        /// Thread id of the simulated thread
        #[arg(long, default_value_t = 1)]
        tid: u64,
        /// Register assignment, e.g. `pc=0x120000a00` (repeatable)
        #[arg(long = "write", value_name = "NAME=VALUE")]
        writes: Vec<String>,
        /// Register to print after the writes (repeatable; default: all)
        #[arg(long = "read", value_name = "NAME")]
        reads: Vec<String>,
    },
}

fn main()
{
    let cli = Cli::parse();

    let _guard = match setup_logging(cli.log_level.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run_command(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn setup_logging(level: Option<&str>) -> Result<LoggingGuard, LoggingError>
{
    match level {
        Some(level) => {
            let level = level.parse::<LogLevel>().map_err(LoggingError::InvalidLevel)?;
            init_logging_with_config(&LogConfig::from_env()?.with_level(level))
        }
        None => init_logging(),
    }
}

fn resolve_variant(arch: &str) -> RegctxResult<MachineVariant>
{
    let architecture = arch.parse::<Architecture>().map_err(RegctxError::InvalidArgument)?;
    MachineVariant::try_from(architecture)
}

fn run_command(cli: &Cli) -> RegctxResult<()>
{
    let variant = resolve_variant(&cli.arch)?;
    debug!(%variant, "resolved machine variant");

    match &cli.command {
        Commands::Sets => {
            print_sets(variant.catalog());
            Ok(())
        }
        Commands::Registers { set } => print_registers(variant.catalog(), *set),
        Commands::Watchpoints => {
            print_watchpoints(variant);
            Ok(())
        }
        Commands::Session { tid, writes, reads } => run_session(variant, ThreadId::from(*tid), writes, reads),
    }
}

fn print_sets(catalog: &RegisterCatalog)
{
    println!("Register sets ({}):", catalog.name());
    for (index, set) in catalog.register_sets().iter().enumerate() {
        println!("  {index}: {} ({}), {} registers", set.name, set.short_name, set.num_registers);
    }
}

fn print_registers(catalog: &RegisterCatalog, set: Option<usize>) -> RegctxResult<()>
{
    let indices: Vec<u32> = match set {
        Some(index) => catalog
            .register_set(index)
            .ok_or_else(|| RegctxError::InvalidArgument(format!("no register set {index}")))?
            .register_indices()
            .to_vec(),
        None => (0u32..).take(catalog.register_count()).collect(),
    };

    println!("{:>5}  {:<9} {:<7} {:>4} {:>6} {:>6} {:>8}", "index", "name", "alt", "size", "offset", "dwarf", "generic");
    for descriptor in indices.into_iter().filter_map(|index| catalog.register_info_at_index(index)) {
        println!(
            "{:>5}  {:<9} {:<7} {:>4} {:>6} {:>6} {:>8}",
            descriptor.logical_index(),
            descriptor.name,
            descriptor.alt_name.unwrap_or("-"),
            descriptor.byte_size,
            descriptor.byte_offset,
            number_or_dash(descriptor, RegisterKind::Dwarf),
            number_or_dash(descriptor, RegisterKind::Generic),
        );
    }
    Ok(())
}

fn number_or_dash(descriptor: &RegisterDescriptor, kind: RegisterKind) -> String
{
    descriptor.number(kind).map_or_else(|| "-".to_string(), |number| number.to_string())
}

fn print_watchpoints(variant: MachineVariant)
{
    let capabilities = variant.capabilities();
    println!("Architecture: {variant} ({} endian)", variant.byte_order());
    println!("  Hardware watchpoints: {}", capabilities.hardware_watchpoints);
    println!("  Bulk register transfer: {}", if capabilities.bulk_transfer { "yes" } else { "no" });

    let process: Arc<dyn NativeProcess> = Arc::new(LoopbackProcess::new(variant.catalog().storage_size(), variant.byte_order()));
    let mut context = NativeRegisterContextMips64::with_variant(ThreadHandle::new(ThreadId::from(1), &process), variant);
    let index = context.set_hardware_watchpoint(Address::new(0x1000), 8, WatchFlags::WRITE);
    if index == INVALID_WATCHPOINT_INDEX {
        println!("  Probe: no slot available for a write watchpoint");
    } else {
        println!("  Probe: armed slot {index}");
        context.clear_hardware_watchpoint(index);
    }
}

fn run_session(variant: MachineVariant, tid: ThreadId, writes: &[String], reads: &[String]) -> RegctxResult<()>
{
    let process: Arc<dyn NativeProcess> = Arc::new(LoopbackProcess::new(variant.catalog().storage_size(), variant.byte_order()));
    let mut context = NativeRegisterContextMips64::with_variant(ThreadHandle::new(tid, &process), variant);
    info!(thread = tid.raw(), %variant, "started register session");

    for assignment in writes {
        let (name, value) = parse_assignment(assignment)?;
        let descriptor = lookup(&context, name)?;
        context.write_register_from_unsigned(descriptor.logical_index(), value)?;
    }

    let descriptors: Vec<&RegisterDescriptor> = if reads.is_empty() {
        context.catalog().registers().iter().collect()
    } else {
        reads.iter().map(|name| lookup(&context, name)).collect::<RegctxResult<_>>()?
    };

    for descriptor in descriptors {
        let value = context.read_register(Some(descriptor))?;
        match value.as_u64() {
            Some(word) => println!("{:>9} = 0x{word:016x}", descriptor.name),
            None => println!("{:>9} = {:02x?}", descriptor.name, value.bytes()),
        }
    }
    Ok(())
}

fn lookup<C: NativeRegisterContext>(context: &C, name: &str) -> RegctxResult<&'static RegisterDescriptor>
{
    context
        .register_info_by_name(name)
        .ok_or_else(|| RegctxError::InvalidArgument(format!("unknown register: {name}")))
}

/// Split `name=value`; the value is hex with a `0x` prefix, decimal otherwise.
fn parse_assignment(assignment: &str) -> RegctxResult<(&str, u64)>
{
    let (name, value) = assignment
        .split_once('=')
        .ok_or_else(|| RegctxError::InvalidArgument(format!("expected NAME=VALUE, got {assignment}")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(RegctxError::InvalidArgument(format!("missing register name in {assignment}")));
    }
    Ok((name, parse_value(value.trim())?))
}

fn parse_value(value: &str) -> RegctxResult<u64>
{
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => value.replace('_', "").parse::<u64>(),
    };
    parsed.map_err(|e| RegctxError::InvalidArgument(format!("invalid register value {value}: {e}")))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_parse_assignment()
    {
        assert_eq!(parse_assignment("pc=0x1200_0a00").unwrap(), ("pc", 0x1200_0a00));
        assert_eq!(parse_assignment(" sp = 4096 ").unwrap(), ("sp", 4096));
        assert!(parse_assignment("pc").is_err());
        assert!(parse_assignment("=1").is_err());
        assert!(parse_assignment("pc=0xzz").is_err());
    }

    #[test]
    fn test_resolve_variant()
    {
        assert_eq!(resolve_variant("mips64").unwrap(), MachineVariant::Mips64);
        assert!(matches!(resolve_variant("x86_64"), Err(RegctxError::UnsupportedArchitecture(_))));
        assert!(matches!(resolve_variant("vax"), Err(RegctxError::InvalidArgument(_))));
    }

    #[test]
    fn test_cli_parses_session()
    {
        let cli = Cli::parse_from(["regctx", "--arch", "mips64", "session", "--write", "pc=0x10", "--read", "pc"]);
        assert_eq!(cli.arch, "mips64");
        assert!(matches!(
            cli.command,
            Commands::Session { ref writes, ref reads, tid: 1 } if writes == &["pc=0x10"] && reads == &["pc"]
        ));
    }
}
