//! Per-worker part files and the final ordered merge.
//!
//! Each worker writes its own part file in the cache directory, optionally
//! bzip2-compressed. The merge concatenates the parts in worker-id order;
//! for compressed output the parts are individual bzip2 streams and their
//! concatenation is a valid multi-stream `.bz2` file.

use crate::config::Config;
use crate::error::Result;
use bzip2::write::BzEncoder;
use bzip2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

/// One worker's output stream.
pub enum PartSink {
    Plain(BufWriter<File>),
    Compressed(BzEncoder<BufWriter<File>>),
}

impl PartSink {
    /// Create the part file for `worker`.
    pub fn create(config: &Config, worker: usize) -> Result<PartSink> {
        let file = File::create(config.part_path(worker))?;
        let buffered = BufWriter::new(file);
        if config.output_compress && config.output.is_some() {
            Ok(PartSink::Compressed(BzEncoder::new(
                buffered,
                Compression::default(),
            )))
        } else {
            Ok(PartSink::Plain(buffered))
        }
    }

    /// Finish the stream (terminates the bzip2 stream).
    pub fn finish(self) -> Result<()> {
        match self {
            PartSink::Plain(mut w) => w.flush()?,
            PartSink::Compressed(enc) => {
                enc.finish()?.flush()?;
            }
        }
        Ok(())
    }
}

impl Write for PartSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            PartSink::Plain(w) => w.write(buf),
            PartSink::Compressed(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            PartSink::Plain(w) => w.flush(),
            PartSink::Compressed(w) => w.flush(),
        }
    }
}

/// Open the merge destination: the final output file, or stdout.
pub fn open_destination(config: &Config) -> Result<Box<dyn Write>> {
    match config.final_output() {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

/// Concatenate the part files in worker order into `dest`, removing them
/// unless the config keeps them. Returns the byte count.
pub fn merge_parts(config: &Config, workers: usize, dest: &mut dyn Write) -> Result<u64> {
    let mut total = 0u64;
    let paths: Vec<PathBuf> = (0..workers).map(|w| config.part_path(w)).collect();
    for path in &paths {
        let mut part = File::open(path)?;
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = part.read(&mut buf)?;
            if n == 0 {
                break;
            }
            dest.write_all(&buf[..n])?;
            total += n as u64;
        }
    }
    dest.flush()?;
    if !config.output_keep_files {
        for path in &paths {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!(path = %path.display(), error = %e, "could not remove part file");
            }
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_parts_concatenate_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new("in.pbf", dir.path());
        config.output = Some(dir.path().join("out.nt"));
        config.output_compress = false;

        for (w, text) in ["alpha\n", "beta\n"].iter().enumerate() {
            let mut sink = PartSink::create(&config, w).unwrap();
            sink.write_all(text.as_bytes()).unwrap();
            sink.finish().unwrap();
        }

        let mut merged = Vec::new();
        merge_parts(&config, 2, &mut merged).unwrap();
        assert_eq!(String::from_utf8(merged).unwrap(), "alpha\nbeta\n");
        // Parts are gone by default
        assert!(!config.part_path(0).exists());
        assert!(!config.part_path(1).exists());
    }

    #[test]
    fn keep_files_retains_parts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new("in.pbf", dir.path());
        config.output = Some(dir.path().join("out.nt"));
        config.output_compress = false;
        config.output_keep_files = true;

        let mut sink = PartSink::create(&config, 0).unwrap();
        sink.write_all(b"data\n").unwrap();
        sink.finish().unwrap();

        let mut merged = Vec::new();
        merge_parts(&config, 1, &mut merged).unwrap();
        assert!(config.part_path(0).exists());
    }

    #[test]
    fn compressed_parts_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new("in.pbf", dir.path());
        config.output = Some(dir.path().join("out.nt"));
        config.output_compress = true;

        for (w, text) in ["first stream\n", "second stream\n"].iter().enumerate() {
            let mut sink = PartSink::create(&config, w).unwrap();
            sink.write_all(text.as_bytes()).unwrap();
            sink.finish().unwrap();
        }

        let mut merged = Vec::new();
        merge_parts(&config, 2, &mut merged).unwrap();
        // Multi-stream bz2: decode both streams back to back
        let mut decoded = Vec::new();
        bzip2::read::MultiBzDecoder::new(merged.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            "first stream\nsecond stream\n"
        );
    }
}
