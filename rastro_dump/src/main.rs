use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use log::info;
use rastro_read::{Rastro, SyncDescription};

#[derive(Parser, Debug)]
#[command(about = "Prints the events of rastro trace files in global time order")]
struct Opt {
    /// Clock correction per host name (`<hostname> <a> <loc0> <ref0>` lines)
    #[arg(long = "sync", value_name = "FILE")]
    sync: Option<PathBuf>,
    /// Print one JSON object per event instead of text
    #[arg(long = "json")]
    json: bool,
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    env_logger::init();
    let opt = Opt::parse();

    let mut session = match &opt.sync {
        Some(path) => Rastro::with_sync(SyncDescription::from_path(path)?),
        None => Rastro::new(),
    };
    for path in &opt.files {
        let file_id = session.open_file(path)?;
        let file = &session.files()[file_id];
        info!(
            "file {}: {} (id1={}, id2={}, host {:?})",
            file_id,
            file.name(),
            file.metadata().id1,
            file.metadata().id2,
            file.metadata().hostname
        );
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut count = 0u64;
    while let Some(event) = session.next_global_event()? {
        if opt.json {
            serde_json::to_writer(&mut out, event)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", event)?;
        }
        count += 1;
    }
    out.flush()?;

    info!("{} events from {} files", count, session.files().len());
    Ok(())
}
