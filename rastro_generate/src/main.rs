use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use log::info;
use rastro::{generate, ProtocolTable};

#[derive(Parser, Debug)]
#[command(about = "Generates a Rust module with one rastro encoder per signature")]
struct Opt {
    /// Write the module to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,
    /// Field letters of each event signature, e.g. `lls` or `ddi`
    #[arg(value_name = "SIGNATURE")]
    signatures: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    env_logger::init();
    let opt = Opt::parse();

    let table = ProtocolTable::from_letters(&opt.signatures)?;
    let module = generate::generate_module(&table);

    match &opt.output {
        Some(path) => {
            fs::write(path, &module)?;
            info!("wrote {} encoders to {}", table.len(), path.display());
        }
        None => io::stdout().lock().write_all(module.as_bytes())?,
    }
    Ok(())
}
