use crate::libmondai::archive::{write_tree, write_zip};
use crate::libmondai::error::{Error, Result};
use crate::libmondai::normalize::normalize;
use crate::libmondai::package::render;
use crate::libmondai::question::{parse, QuestionRecord};
use crate::libmondai::strip::strip;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const ARCHIVE_SUFFIX: &str = "_QTI21";

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub outdir: PathBuf,
    /// Also leave the unpacked package next to the zip.
    pub write_tree: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub archive: PathBuf,
    pub question_count: usize,
}

/// `*.rtf` files directly inside `dir`, sorted by name.
pub fn find_rtf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "rtf") {
            files.push(path);
        }
    }
    files.sort();
    debug!("[Batch] Found {} RTF files in {:?}", files.len(), dir);
    Ok(files)
}

/// Stripped and normalized text of an RTF document.
pub fn extract_text(raw: &[u8]) -> String {
    normalize(&strip(raw))
}

pub fn read_questions(path: &Path) -> Result<Vec<QuestionRecord>> {
    let raw = fs::read(path)?;
    parse(&extract_text(&raw))
}

pub fn document_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Converts one RTF file into `<outdir>/<stem>_QTI21.zip`.
///
/// Nothing is written if the document fails to parse.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<ConversionSummary> {
    let now = Instant::now();
    let questions = read_questions(path)?;
    let title = document_title(path);
    let package = render(&questions, &title);

    let base = format!("{title}{ARCHIVE_SUFFIX}");
    let archive = options.outdir.join(format!("{base}.zip"));
    if options.write_tree {
        write_tree(&package, &options.outdir.join(&base))?;
    }
    write_zip(&package, &archive)?;

    info!(
        "[Batch] Converted {:?} in {} ms.",
        path,
        now.elapsed().as_millis()
    );
    Ok(ConversionSummary {
        archive,
        question_count: questions.len(),
    })
}
