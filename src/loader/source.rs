//! Raw source files: optional gzip or zip, then text decoding.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, info};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Encodings tried in order when turning source bytes into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
}

pub const ENCODINGS: [Encoding; 2] = [Encoding::Utf8, Encoding::Latin1];

impl Encoding {
    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(str::to_string)
            }
            // ISO-8859-1 maps every byte to the code point of the same value
            Encoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Uncompressed bytes of `member` in a zip archive
pub fn read_archive_member<R: Read + Seek>(reader: R, member: &str) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(reader)?;
    let mut entry = match archive.by_name(member) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Err(Error::MissingMember(member.to_string())),
        Err(e) => return Err(e.into()),
    };
    debug!("Extracting {} ({} bytes)", member, entry.size());

    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// All bytes of `path`, gunzipped when the name ends in `.gz`. A `.zip`
/// archive yields the member named like the archive minus its extension.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    if path.extension().map_or(false, |e| e == "zip") {
        let member = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        return read_archive_member(file, &member);
    }

    let mut reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Decode with the first encoding in `encodings` that accepts the bytes
pub fn decode(bytes: &[u8], encodings: &[Encoding], source_name: &str) -> Result<String> {
    for encoding in encodings {
        if let Some(text) = encoding.decode(bytes) {
            debug!("Decoded {} as {:?}", source_name, encoding);
            return Ok(text);
        }
    }
    Err(Error::Decoding {
        source_name: source_name.to_string(),
    })
}

/// Text content of a local source file
pub fn read_text(path: &Path) -> Result<String> {
    info!("Loading {}", path.display());
    let bytes = read_bytes(path)?;
    decode(&bytes, &ENCODINGS, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn archive(members: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in members {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_read_plain_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "\u{feff}Fryslân;Ljouwert\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "Fryslân;Ljouwert\n");
    }

    #[test]
    fn test_latin1_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        // "Zoë" in ISO-8859-1
        std::fs::write(&path, b"Zo\xEB").unwrap();
        assert_eq!(read_text(&path).unwrap(), "Zoë");
    }

    #[test]
    fn test_gzip_member() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all("Utrecht;Simplonbaan".as_bytes()).unwrap();
        encoder.finish().unwrap();
        assert_eq!(read_text(&path).unwrap(), "Utrecht;Simplonbaan");
    }

    #[test]
    fn test_archive_member_extracted() {
        let bytes = archive(&[
            ("LEESMIJ.txt", &b"zie website"[..]),
            ("postcode_NL.csv", &b"2511BT;Spui"[..]),
        ]);
        let member = read_archive_member(Cursor::new(bytes), "postcode_NL.csv").unwrap();
        assert_eq!(member, b"2511BT;Spui");
    }

    #[test]
    fn test_archive_member_missing() {
        let bytes = archive(&[("LEESMIJ.txt", &b"zie website"[..])]);
        let err = read_archive_member(Cursor::new(bytes), "postcode_NL.csv").unwrap_err();
        assert!(matches!(err, Error::MissingMember(ref m) if m == "postcode_NL.csv"));
    }

    #[test]
    fn test_zip_file_read_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv.zip");
        std::fs::write(&path, archive(&[("rows.csv", &b"Zo\xEB;Dorpsstraat"[..])])).unwrap();
        assert_eq!(read_text(&path).unwrap(), "Zoë;Dorpsstraat");
    }

    #[test]
    fn test_decoding_exhausted() {
        let err = decode(b"\xFF\xFE", &[Encoding::Utf8], "broken.csv").unwrap_err();
        assert!(matches!(err, Error::Decoding { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = read_text(Path::new("/nonexistent/rows.csv")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
