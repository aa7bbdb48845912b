use clap::error::ErrorKind;
use color_print::{ceprintln, cprintln};
use sclc::{fasm, Config, Error};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    input: PathBuf,

    /// Output file [default: input without its extension]
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Directory searched by -include
    #[clap(short, long = "include_dir", default_value = ".")]
    include_dir: PathBuf,

    /// Print every stage with tokens, AST and symbols
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    use clap::Parser;

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let config = match Config::new(args.input, args.output, args.include_dir, args.verbose) {
        Ok(config) => config,
        Err(e) => fatal(e),
    };

    if let Err(e) = run(&config) {
        fatal(e);
    }
}

fn run(config: &Config) -> Result<(), Error> {
    if config.verbose {
        println!("sclc {}", env!("CARGO_PKG_VERSION"));
        println!("  < {}", config.input.display());
    }

    let code = std::fs::read_to_string(&config.input)
        .map_err(|e| Error::FileRead(config.input.clone(), e))?;
    let name = config.input.display().to_string();

    let compilation = sclc::compile(&name, &code, &config.include_dir, config.verbose);
    compilation.diags.dump(&compilation.sources);

    let Some(asm) = compilation.asm else {
        ceprintln!(
            "<yellow,bold>warning</>: {} error(s) found",
            compilation.diags.error_count()
        );
        std::process::exit(1);
    };

    let asm_path = config.asm_path();
    std::fs::write(&asm_path, asm).map_err(|e| Error::FileWrite(asm_path.clone(), e))?;

    if config.verbose {
        cprintln!("<s>6. Assemble</>");
        println!("  > {}", asm_path.display());
        println!("  > {}", config.output.display());
    }
    fasm::assemble(&asm_path, &config.output)?;

    cprintln!("<green,bold>Finished</> {}", config.output.display());
    Ok(())
}

fn fatal(e: Error) -> ! {
    ceprintln!("<red,bold>error</>: {}", e);
    if let Some(source) = std::error::Error::source(&e) {
        ceprintln!("  <blue>caused by</>: {}", source);
    }
    std::process::exit(1);
}
