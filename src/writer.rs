use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use clap::ValueEnum;

use crate::{
    error::{Error, Result},
    probe::{
        summary::{ProbeSummary, HEADER},
        ProbeCollection,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line.
    Jsonl,
    /// A single pretty-printed JSON array.
    Json,
    /// Comma-separated probe summary with a header line.
    Csv,
}

/// Writes `probes` to `path`, replacing any existing file.
///
/// The data goes to a temporary file next to `path` which is renamed into
/// place once fully written, so a failed write never leaves a truncated file
/// behind. The replaced file keeps its permissions; a new file gets the
/// same mode `File::create` would give it.
pub fn write_probes(probes: &ProbeCollection, path: &Path, format: OutputFormat) -> Result<()> {
    let io_error = |source: io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // subject to the umask, like File::create
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut file = builder.tempfile_in(parent_dir(path)).map_err(io_error)?;

    match fs::metadata(path) {
        Ok(existing) if existing.is_file() => file
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(io_error)?,
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_error(e)),
    }

    {
        let mut out = BufWriter::new(file.as_file_mut());
        render(probes, format, &mut out).map_err(io_error)?;
        out.flush().map_err(io_error)?;
    }
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;

    tracing::debug!("Wrote {} probes to {}", probes.len(), path.display());

    Ok(())
}

pub fn render<W: Write>(probes: &ProbeCollection, format: OutputFormat, mut out: W) -> io::Result<()> {
    match format {
        OutputFormat::Jsonl => {
            for probe in probes {
                serde_json::to_writer(&mut out, probe)?;
                out.write_all(b"\n")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, probes)?;
            out.write_all(b"\n")?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(out);
            writer.write_record(HEADER)?;
            for probe in probes {
                writer.write_record(ProbeSummary::from_record(probe).columns())?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
