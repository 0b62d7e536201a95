mod config;
mod logger;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use once_cell::sync::OnceCell;
use xscript_core::asm::assemble;
use xscript_core::disasm::disassemble;
use xscript_core::{Engine, InstructionKind, Script, VmConfig};
use xscript_ext::GameSession;

use crate::config::app_config::{AppConfigBuilder, AppConfigReader};
use crate::config::logger_config::LoggerConfig;

/// Sealed once, then shared by every run in the process.
static ENGINE: OnceCell<Engine> = OnceCell::new();

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Abort a run after this many instructions (0 disables the limit)
    #[clap(long)]
    step_limit: Option<usize>,
    /// Debug-level logging for the engine crates
    #[clap(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every registered instruction
    List,
    /// Assemble a `.xsa` source into a compiled script
    Asm {
        input: PathBuf,
        #[clap(short, long)]
        output: PathBuf,
    },
    /// Print a listing of a compiled script
    Disasm { input: PathBuf },
    /// Execute a compiled script or `.xsa` source against a fresh session
    Run { input: PathBuf },
}

fn engine(vm_config: VmConfig) -> Result<&'static Engine> {
    ENGINE
        .get_or_try_init(|| xscript_ext::engine_builder().with_config(vm_config).build())
        .context("instruction set configuration is inconsistent")
}

fn load_script(path: &Path, engine: &Engine) -> Result<Script> {
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("xsa")) {
        let source = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        return assemble(&source, engine.instructions()).with_context(|| format!("assembling {}", path.display()));
    }

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Script::from_bytes(&bytes).with_context(|| format!("loading {}", path.display()))
}

fn list(engine: &Engine) {
    for desc in engine.instructions().iter() {
        let kind = match desc.kind {
            InstructionKind::Instruction => "-".to_string(),
            InstructionKind::Function { return_type } => return_type.to_string(),
        };
        println!(
            "{:<28} {:<12} {:>2} {}",
            desc.mnemonic,
            desc.signature.as_str(),
            kind,
            desc.opcode
        );
    }
}

fn run(engine: &Engine, script: &Script) -> Result<()> {
    let mut session = GameSession::new();
    let outcome = engine.run(script, &mut session)?;
    tracing::info!(steps = outcome.steps, halted = outcome.halted, "script finished");

    for message in session.take_messages() {
        println!("[message] {} {:?}", message.text, message.buttons);
    }
    for control in session.controls().disabled() {
        println!("[disabled] {}", control.name());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut builder = match &args.config {
        Some(path) => AppConfigBuilder::from_config(AppConfigReader::read_app_json(path)?),
        None => AppConfigBuilder::new(),
    };
    if let Some(step_limit) = args.step_limit {
        builder = builder.with_vm_config(VmConfig { step_limit });
    }
    if args.verbose {
        builder = builder.with_logger_config(LoggerConfig {
            app_level_filter: LevelFilter::Debug,
            level_filter: LevelFilter::Info,
        });
    }
    let app_config = builder.get();
    logger::init_logging(&app_config.logger_config.clone().unwrap_or_default());
    tracing::debug!(app = %app_config.app_name, "starting");

    let engine = engine(app_config.vm_config.unwrap_or_default())?;
    match args.command {
        Command::List => list(engine),
        Command::Asm { input, output } => {
            let script = load_script(&input, engine)?;
            let bytes = script.to_bytes().with_context(|| format!("encoding {}", input.display()))?;
            std::fs::write(&output, bytes).with_context(|| format!("writing {}", output.display()))?;
        }
        Command::Disasm { input } => {
            let script = load_script(&input, engine)?;
            print!("{}", disassemble(&script.code, engine.instructions()));
        }
        Command::Run { input } => {
            let script = load_script(&input, engine)?;
            run(engine, &script)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembled_source_survives_the_container() {
        let engine = engine(VmConfig::default()).unwrap();
        let dir = std::env::temp_dir().join(format!("xscript-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let source = dir.join("lock.xsa");
        std::fs::write(&source, "disableplayermagic\npushint \"done\"\nmessagebox 0\nreturn\n").unwrap();

        let script = load_script(&source, engine).unwrap();
        let compiled = dir.join("lock.xsc");
        std::fs::write(&compiled, script.to_bytes().unwrap()).unwrap();
        assert_eq!(load_script(&compiled, engine).unwrap(), script);

        run(engine, &script).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bundled_testcase_runs() {
        let engine = engine(VmConfig::default()).unwrap();
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/testcase/controls.xsa"));
        let script = load_script(path, engine).unwrap();

        let mut session = GameSession::with_seed(3);
        let outcome = engine.run(&script, &mut session).unwrap();
        assert!(outcome.halted);
        assert_eq!(session.locals_ref().long(0), 1);
        assert!((0..6).contains(&session.locals_ref().long(1)));
        assert_eq!(session.controls().disabled().count(), 2);
        assert_eq!(session.messages()[0].buttons, vec!["Wait".to_string(), "Leave".to_string()]);
    }

    #[test]
    fn arguments_parse() {
        let args = Args::parse_from([
            "xscript",
            "--config",
            "app.json",
            "--step-limit",
            "5",
            "asm",
            "in.xsa",
            "-o",
            "out.xsc",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("app.json")));
        assert_eq!(args.step_limit, Some(5));
        assert!(!args.verbose);
        assert!(matches!(args.command, Command::Asm { .. }));
    }
}
