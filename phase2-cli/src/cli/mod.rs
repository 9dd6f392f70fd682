mod begin;
pub use begin::*;

mod contribute;
pub use contribute::*;

mod create_keypair;
pub use create_keypair::*;

mod dummy_phase2;
pub use dummy_phase2::*;

mod dummy_powersoftau;
pub use dummy_powersoftau::*;

mod lagrange;
pub use lagrange::*;

mod linear_combination;
pub use linear_combination::*;

mod verify_contribution;
pub use verify_contribution::*;

mod verify_transcript;
pub use verify_transcript::*;

use phase2::CircuitQap;
use setup_utils::{log_hash, write_hash_text, Hash};

use anyhow::{Context, Result};
use ark_ff::PrimeField;
use fs_err::{File, OpenOptions};
use memmap::{Mmap, MmapOptions};
use std::io::{BufWriter, Write};
use tracing::info;

/// Maps a whole input file into memory, read-only.
pub(crate) fn map_file(path: &str) -> Result<Mmap> {
    let file = File::open(path)?;
    let map = unsafe { MmapOptions::new().map(file.file()) }
        .with_context(|| format!("unable to create a memory map for {}", path))?;
    Ok(map)
}

/// Creates (or truncates) an output file.
pub(crate) fn create_file(path: &str) -> Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    Ok(BufWriter::new(file))
}

/// Opens a file for appending, creating it if needed.
pub(crate) fn append_file(path: &str) -> Result<BufWriter<File>> {
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    Ok(BufWriter::new(file))
}

pub(crate) fn read_circuit<F: PrimeField>(path: &str) -> Result<CircuitQap<F>> {
    let map = map_file(path)?;
    let qap = CircuitQap::read(&map[..]).with_context(|| format!("could not read the circuit {}", path))?;
    Ok(qap)
}

/// Logs a digest and writes its text form to `path`.
pub(crate) fn write_hash_file(path: &str, name: &str, hash: &Hash) -> Result<()> {
    info!("{}:", name);
    log_hash(hash);
    let mut file = create_file(path)?;
    write_hash_text(&mut file, hash)?;
    file.flush()?;
    Ok(())
}
