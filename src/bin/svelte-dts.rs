use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use svelte_dts::tracing_config::init_tracing;
use svelte_dts::{Generator, GeneratorOptions};

#[derive(Parser, Debug)]
#[command(
    name = "svelte-dts",
    version,
    about = "Generate an ambient TypeScript declaration file for a Svelte component library"
)]
struct CliArgs {
    /// Entry point of the library, relative to --cwd.
    #[arg(short, long)]
    input: PathBuf,

    /// Output declaration file. Defaults to the `types` field of package.json.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File extensions to declare, comma separated.
    #[arg(short, long, value_delimiter = ',', default_value = ".svelte,.ts,.js")]
    extensions: Vec<String>,

    /// Project root holding package.json.
    #[arg(long, default_value = ".")]
    cwd: PathBuf,

    /// Drop declarations marked `@internal`.
    #[arg(long)]
    strip_internal: bool,
}

fn run(args: CliArgs) -> Result<usize> {
    let mut options = GeneratorOptions::new(&args.cwd)
        .with_extensions(&args.extensions)
        .with_strip_internal(args.strip_internal);
    if let Some(output) = &args.output {
        options = options.with_output(output);
    }

    let generator = Generator::new(&args.input, options)
        .with_context(|| format!("failed to set up generation for {}", args.input.display()))?;
    let count = generator
        .write()
        .with_context(|| format!("failed to write {}", generator.output_path().display()))?;

    println!(
        "[svelte-dts] {} module(s) written to {}",
        count,
        generator.output_path().display()
    );
    Ok(count)
}

fn main() -> ExitCode {
    init_tracing();
    let args = CliArgs::parse();

    match run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[svelte-dts] error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
