//! Compress text files, persist archive and codebook, then restore them.
//!
//! ```text
//! compdecomp [-v|-d] [--out DIR] <input>...
//! ```
//!
//! For every input `name.txt` this writes `name.bin` (packed bits) and
//! `name.json` (codebook with padding), reloads both, decodes the archive with
//! the tree rebuilt from the codebook and checks it against the source text.

use huffpack::compression::{
    build_tree, compress, decompress, generate_codes, Archive, Codebook, FrequencyTable,
};
use log::LevelFilter;
use std::env;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const USAGE: &str = "usage: compdecomp [-v|-d] [--out DIR] <input>...";

#[derive(Debug, Default, PartialEq)]
struct Options {
    level: Option<LevelFilter>,
    out_dir: Option<PathBuf>,
    inputs: Vec<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Options, Box<dyn Error>> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-v" | "--verbose" => options.level = Some(LevelFilter::Info),
            "-d" | "--debug" => options.level = Some(LevelFilter::Debug),
            "-o" | "--out" => {
                let dir = args.next().ok_or("--out needs a directory")?;
                options.out_dir = Some(PathBuf::from(dir));
            }
            "-h" | "--help" => return Err(USAGE.into()),
            flag if flag.starts_with('-') => return Err(format!("unknown flag {flag}\n{USAGE}").into()),
            input => options.inputs.push(PathBuf::from(input)),
        }
    }

    if options.inputs.is_empty() {
        return Err(USAGE.into());
    }
    Ok(options)
}

/// Archive bytes per source character.
fn compression_ratio(archive: &Archive, symbol_count: usize) -> f64 {
    match symbol_count {
        0 => 0.0,
        count => archive.bytes.len() as f64 / count as f64,
    }
}

fn run(input: &Path, out_dir: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let content = fs::read_to_string(input)?;
    let text = content.trim_end();
    let symbols: Vec<char> = text.chars().collect();

    log::info!("building the tree for {}", input.display());
    let frequencies = FrequencyTable::count(symbols.iter().copied());
    let tree = build_tree(&frequencies)?;
    let codes = generate_codes(&tree);
    log::debug!("leaves left to right: {:?}", tree.symbols());

    println!("\n{}", input.display());
    print!("{}", codes.report(&frequencies));
    println!(
        "average code length: {:.3} bits",
        codes.average_length(&frequencies)
    );

    log::info!("compressing the text");
    let archive = compress(symbols.iter().copied(), &codes)?;

    let stem = input
        .file_stem()
        .ok_or_else(|| format!("{} has no file name", input.display()))?
        .to_string_lossy();
    let dir = out_dir
        .or_else(|| input.parent())
        .unwrap_or_else(|| Path::new("."));
    let archive_path = dir.join(format!("{stem}.bin"));
    let codebook_path = dir.join(format!("{stem}.json"));

    fs::write(&archive_path, &archive.bytes)?;
    Codebook::for_archive(codes, &archive)?
        .to_writer(BufWriter::new(File::create(&codebook_path)?))?;
    println!(
        "{} symbols -> {} bytes, padding {}, compression ratio {:.3}",
        symbols.len(),
        archive.bytes.len(),
        archive.padding,
        compression_ratio(&archive, symbols.len())
    );

    log::info!("loading codes from {}", codebook_path.display());
    let codebook: Codebook<char> =
        Codebook::from_reader(BufReader::new(File::open(&codebook_path)?))?;
    let rebuilt = codebook.rebuild_tree()?;

    log::info!("decompressing {}", archive_path.display());
    let bytes = fs::read(&archive_path)?;
    let decoded: String = decompress(&bytes, codebook.padding(), &rebuilt)?
        .into_iter()
        .collect();

    if decoded != text {
        return Err(format!("{} did not survive the round trip", input.display()).into());
    }
    log::info!("{} restored intact", input.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = parse_args(env::args().skip(1))?;

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = options.level {
        logger.filter_level(level);
    }
    logger.init();

    for input in &options.inputs {
        run(input, options.out_dir.as_deref())?;
    }
    Ok(())
}
