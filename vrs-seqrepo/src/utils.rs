use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Relative path of a sequence file, expanded from a template where `%s2` is
/// the first two characters of the seq_id and `%s` is the whole seq_id.
pub fn get_sequence_path(seq_id: &str, template: &str) -> PathBuf {
    let prefix = seq_id.get(0..2).unwrap_or(seq_id);
    let path_str = template.replace("%s2", prefix).replace("%s", seq_id);
    PathBuf::from(path_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_sequence_path() {
        assert_eq!(
            get_sequence_path("aKF498dAxc", "sequences/%s2/%s.seq"),
            PathBuf::from("sequences/aK/aKF498dAxc.seq")
        );
        assert_eq!(
            get_sequence_path("a", "sequences/%s2/%s.seq"),
            PathBuf::from("sequences/a/a.seq")
        );
    }
}
