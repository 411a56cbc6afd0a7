//! Structural sniffing of DOCX/ODT templates.
//!
//! Both formats are zip containers. A file is accepted when its extension is known,
//! the container opens, and the format's required entries are listed in the central
//! directory. Entry contents are never parsed.

use crate::model::TemplateKind;
use crate::paths::extension_of;
use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

pub fn template_kind(path: &Path) -> Option<TemplateKind> {
    TemplateKind::from_extension(&extension_of(path))
}

pub fn validate_template_file(path: &Path) -> bool {
    let Some(kind) = template_kind(path) else {
        return false;
    };

    let archive = match File::open(path).map(ZipArchive::new) {
        Ok(Ok(archive)) => archive,
        Ok(Err(e)) => {
            tracing::debug!(path = %path.display(), error = %e, "not a zip container");
            return false;
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot open template");
            return false;
        }
    };

    let missing = kind
        .required_entries()
        .iter()
        .find(|required| !archive.file_names().any(|name| name == **required));

    match missing {
        Some(entry) => {
            tracing::debug!(path = %path.display(), entry, "template is missing required entry");
            false
        }
        None => true,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    pub(crate) fn write_zip(path: &Path, entries: &[&str]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for entry in entries {
            zip.start_file(*entry, options.clone()).unwrap();
            zip.write_all(b"<xml/>").unwrap();
        }
        zip.finish().unwrap();
    }

    pub(crate) fn write_docx(path: &Path) {
        write_zip(path, &["[Content_Types].xml", "word/document.xml"]);
    }

    pub(crate) fn write_odt(path: &Path) {
        write_zip(path, &["mimetype", "META-INF/manifest.xml", "content.xml"]);
    }

    #[test]
    fn test_valid_docx_and_odt() {
        let dir = tempfile::tempdir().unwrap();
        let docx = dir.path().join("profile.docx");
        let odt = dir.path().join("profile.ODT");
        write_docx(&docx);
        write_odt(&odt);
        assert!(validate_template_file(&docx));
        assert!(validate_template_file(&odt));
    }

    #[test]
    fn test_docx_missing_document_xml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        write_zip(&path, &["[Content_Types].xml", "word/styles.xml"]);
        assert!(!validate_template_file(&path));
    }

    #[test]
    fn test_odt_entries_do_not_satisfy_docx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renamed.docx");
        write_odt(&path);
        assert!(!validate_template_file(&path));
    }

    #[test]
    fn test_not_a_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.docx");
        std::fs::write(&path, "just text").unwrap();
        assert!(!validate_template_file(&path));
    }

    #[test]
    fn test_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.zip");
        write_docx(&path);
        assert!(!validate_template_file(&path));
        assert!(!validate_template_file(&dir.path().join("missing.docx")));
    }
}
