use std::{fs::File, io::BufWriter, path::PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use iokum_resource_pack::{
    codec::Registry,
    overlay, serialize, Compression, Options,
};

#[derive(Parser)]
#[command(about)]
struct Arguments {
    /// Zip archive or directory to read
    input: PathBuf,
    /// Zip archive to write
    output: PathBuf,
    /// Pack format to write for
    #[arg(long)]
    format: u32,
    /// Resolve overlays for the format and write a pack without them
    #[arg(long)]
    flatten: bool,
    /// Store entries instead of deflating them
    #[arg(long)]
    stored: bool,
    /// Fail on malformed JSON
    #[arg(long)]
    strict: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // parse arguments
    let Arguments {
        input,
        output,
        format,
        flatten,
        stored,
        strict,
    } = Arguments::parse();
    let registry = Registry::new(Options {
        compression: if stored {
            Compression::Stored
        } else {
            Compression::Deflate
        },
        strict,
        ..Default::default()
    });

    // read
    let mut container = if input.is_dir() {
        serialize::read_directory(&registry, &input).unwrap()
    } else {
        serialize::read_zip(&registry, File::open(&input).unwrap()).unwrap()
    };
    info!(
        "Read {} resources and {} overlays from {}",
        container.len(),
        container.overlays().count(),
        input.display()
    );
    if flatten {
        container = overlay::effective(&container, format);
    }

    // write
    let built = serialize::build(&registry, &container, format).unwrap();
    std::io::copy(
        &mut built.bytes.as_ref(),
        &mut BufWriter::new(File::create(&output).unwrap()),
    )
    .unwrap();
    info!("Wrote {} (SHA-1 {})", output.display(), built.sha1);
}
