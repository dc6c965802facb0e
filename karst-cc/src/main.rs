//  MAIN.rs
//    by Lut99
//
//  Created:
//    07 Mar 2025, 11:20:06
//  Last edited:
//    22 Aug 2025, 10:08:19
//  Auto updated?
//    Yes
//
//  Description:
//!   Entrypoint for the offline Karst -> C compiler (`karstc`).
//

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use humanlog::{DebugMode, HumanLogger};
use karst_ast::errors::AstError;
use karst_ast::semantic::Target;
use karst_dsl::PrettyError as _;
use log::{error, info};


/***** ARGUMENTS *****/
/// Defines the toplevel arguments of the `karstc`-executable.
#[derive(Debug, Parser)]
#[clap(name = "karstc", about = "Compiles Karst modules ahead-of-time into portable C units.")]
struct ToplevelArguments {
    /// Whether to enable INFO- and DEBUG-logging.
    #[clap(long, global=true, help="If given, enables additional INFO- and DEBUG-level logging prints.")]
    debug : bool,
    /// Whether to enable TRACE-logging.
    #[clap(long, global=true, help="If given, enables additional TRACE-level logging prints. Implies `--debug`.")]
    trace : bool,

    /// Defines what to do.
    #[clap(subcommand)]
    subcommand : KarstcSubcommand,
}

/// Defines the subcommands of the `karstc`-executable.
#[derive(Debug, Subcommand)]
enum KarstcSubcommand {
    /// Compiles a module directory.
    #[clap(name = "compile", about = "Resolves the module in the given directory and generates one C unit per executable package in it.")]
    Compile(CompileArguments),
}

/// Defines the arguments of the `compile`-subcommand.
#[derive(Debug, Parser)]
struct CompileArguments {
    /// The directory of the main module to compile.
    #[clap(name = "DIRECTORY", help = "The directory of the main module to compile.")]
    directory : PathBuf,

    /// The directory to write the generated units to.
    #[clap(short, long, help = "The directory to write the generated units to. Defaults to 'dist' within the module directory.")]
    dist : Option<PathBuf>,
    /// Additional directories to search dependency modules under.
    #[clap(short = 'm', long = "module-path", help = "An additional directory to search dependency modules under. Can be given multiple times.")]
    module_paths : Vec<PathBuf>,
    /// Whether to dump the resolved target next to the generated units.
    #[clap(long, help = "If given, writes a debug dump of the resolved target next to the generated units.")]
    dump_target : bool,
}





/***** HELPER FUNCTIONS *****/
/// Prints a resolution error, with source context if it carries a parse diagnostic.
fn report(err: &AstError) {
    match err {
        AstError::Parse { path, err } | AstError::Config { path, err } => match fs::read_to_string(path) {
            Ok(source) => eprintln!("{}", err.display_with_source(&path.display().to_string(), &source)),
            Err(_) => error!("{}: {err}", path.display()),
        },
        err => error!("{err}"),
    }
}





/***** ENTRYPOINT *****/
fn main() {
    // Parse the arguments
    let args: ToplevelArguments = ToplevelArguments::parse();

    // Setup the logger
    if let Err(err) = HumanLogger::terminal(DebugMode::from_flags(args.trace, args.debug)).init() {
        eprintln!("WARNING: Failed to setup logger: {err} (no logging enabled for this session)");
    }
    info!("`{}` v{} - The Karst Compiler", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    match args.subcommand {
        KarstcSubcommand::Compile(compile) => {
            // Resolve the main module and everything it pulls in
            info!("Resolving module in {}...", compile.directory.display());
            let target: Target = match karst_ast::check(&compile.directory, compile.module_paths) {
                Ok(target) => target,
                Err(err) => {
                    report(&err);
                    std::process::exit(1);
                },
            };

            // Generate the units
            let dist: PathBuf = compile.dist.unwrap_or_else(|| compile.directory.join("dist"));
            info!("Generating units to {}...", dist.display());
            if let Err(err) = karst_gen::generate(&target, &dist) {
                error!("{err}");
                std::process::exit(1);
            }

            // Dump the resolved target next to them if so requested
            if compile.dump_target {
                let path: PathBuf = dist.join("target.dump");
                if let Err(err) = fs::write(&path, format!("{target:#?}\n")) {
                    error!("Failed to write target dump to {}: {err}", path.display());
                    std::process::exit(1);
                }
                info!("Wrote target dump to {}", path.display());
            }
            info!("Done.");
        },
    }
}
