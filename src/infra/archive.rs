//! Zip construction for the installed output subtree.

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Build a finalized zip of `root`'s contents into an unlinked temp file.
///
/// The walk is pre-order with entries sorted by name, so the archive
/// layout is deterministic for a given tree. Every directory gets an
/// explicit trailing-slash entry with the stored (uncompressed) method, so
/// empty directories survive extraction; file bytes are copied into their
/// entries chunk-by-chunk rather than loaded whole. Entry paths are
/// relative to `root` and use forward slashes on every platform.
///
/// The zip writer needs a seekable sink to finalize its central directory,
/// which is why the archive lands in an anonymous temp file instead of
/// going straight to the wire. The returned file is rewound and ready for
/// streaming; the OS reclaims it when the last handle closes.
///
/// # Errors
///
/// Returns an error when the tree cannot be read or the archive cannot be
/// written.
pub fn build_spool(root: &Path) -> io::Result<File> {
    let spool = tempfile::tempfile()?;
    let mut zip = ZipWriter::new(spool);
    add_tree(&mut zip, root, "")?;
    let mut file = zip.finish().map_err(io::Error::other)?;
    file.seek(SeekFrom::Start(0))?;
    Ok(file)
}

fn add_tree(zip: &mut ZipWriter<File>, dir: &Path, prefix: &str) -> io::Result<()> {
    let dir_options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let file_options = SimpleFileOptions::default();

    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = format!("{prefix}{name}");
        if entry.file_type()?.is_dir() {
            let rel = format!("{rel}/");
            zip.add_directory(rel.as_str(), dir_options)
                .map_err(io::Error::other)?;
            add_tree(zip, &entry.path(), &rel)?;
        } else {
            zip.start_file(rel.as_str(), file_options)
                .map_err(io::Error::other)?;
            let mut src = File::open(entry.path())?;
            io::copy(&mut src, zip)?;
        }
    }
    Ok(())
}
