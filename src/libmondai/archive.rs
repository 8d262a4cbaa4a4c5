use crate::libmondai::error::Result;
use crate::libmondai::package::{Package, PackageFile};
use log::debug;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// One entry per path, in first-seen order, holding the last contents
/// rendered for that path.
fn unique_files(package: &Package) -> Vec<&PackageFile> {
    let mut seen = HashSet::new();
    package
        .files
        .iter()
        .filter(|file| seen.insert(file.path.as_str()))
        .filter_map(|file| package.get(&file.path))
        .collect()
}

/// Writes `package` as a DEFLATE zip into `writer`.
///
/// Every entry carries the zip epoch as its timestamp, so the same package
/// always produces the same bytes.
pub fn write_zip_to<W: Write + Seek>(package: &Package, writer: W) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    for file in unique_files(package) {
        zip.start_file(file.path.as_str(), options)?;
        zip.write_all(file.contents.as_bytes())?;
    }
    Ok(zip.finish()?)
}

pub fn write_zip(package: &Package, path: &Path) -> Result<()> {
    debug!("[Archive] Writing {:?}", path);
    let file = File::create(path)?;
    write_zip_to(package, file)?;
    Ok(())
}

/// Writes the unpacked package under `dir`, creating folders as needed.
pub fn write_tree(package: &Package, dir: &Path) -> Result<()> {
    debug!("[Archive] Writing unpacked package to {:?}", dir);
    for file in unique_files(package) {
        let target = file
            .path
            .split('/')
            .fold(dir.to_path_buf(), |acc, part| acc.join(part));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &file.contents)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libmondai::package::render;
    use crate::libmondai::question::QuestionRecord;
    use std::io::{Cursor, Read};
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn records(numbers: &[u64]) -> Vec<QuestionRecord> {
        numbers
            .iter()
            .map(|&number| QuestionRecord {
                number,
                stem: format!("Stem {number}"),
                options: [('a', "yes"), ('b', "no")]
                    .iter()
                    .map(|(k, v)| (*k, v.to_string()))
                    .collect(),
                answer: 'a',
            })
            .collect()
    }

    fn entries(bytes: Vec<u8>) -> Vec<(String, String)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                assert_eq!(file.compression(), CompressionMethod::Deflated);
                let mut contents = String::new();
                file.read_to_string(&mut contents).unwrap();
                (file.name().to_string(), contents)
            })
            .collect()
    }

    #[test]
    fn zip_holds_package_in_order() {
        let package = render(&records(&[2, 1]), "quiz");
        let bytes = write_zip_to(&package, Cursor::new(Vec::new()))
            .unwrap()
            .into_inner();
        let entries = entries(bytes);
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["imsmanifest.xml", "assessmentTest.xml", "items/Q002.xml", "items/Q001.xml"]
        );
        for (entry, file) in entries.iter().zip(&package.files) {
            assert_eq!(entry.1, file.contents);
        }
    }

    #[test]
    fn zip_bytes_are_reproducible() {
        let package = render(&records(&[1, 2, 3]), "quiz");
        let first = write_zip_to(&package, Cursor::new(Vec::new())).unwrap().into_inner();
        let second = write_zip_to(&package, Cursor::new(Vec::new())).unwrap().into_inner();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_paths_are_written_once_with_last_contents() {
        let mut dup = records(&[1, 1]);
        dup[1].stem = "Replacement".to_string();
        let package = render(&dup, "quiz");
        let bytes = write_zip_to(&package, Cursor::new(Vec::new()))
            .unwrap()
            .into_inner();
        let entries = entries(bytes);
        assert_eq!(entries.len(), 3);
        assert!(entries[2].1.contains("Replacement"));
    }

    #[test]
    fn tree_mirrors_zip() {
        let dir = TempDir::new().unwrap();
        let package = render(&records(&[5]), "quiz");
        write_tree(&package, dir.path()).unwrap();

        for file in &package.files {
            let on_disk = fs::read_to_string(dir.path().join(&file.path)).unwrap();
            assert_eq!(on_disk, file.contents);
        }
        assert!(dir.path().join("items").is_dir());
    }

    #[test]
    fn write_zip_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.zip");
        write_zip(&render(&records(&[1]), "quiz"), &path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(entries(bytes).len(), 3);
    }
}
