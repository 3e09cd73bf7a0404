use regex::Regex;

use crate::models::{AttachedFile, FileKind};

/// Revision number parsed from a filename: case-insensitive
/// `rev[separator]?<digits>` or `v<digits>`, separators space/period/
/// underscore/hyphen. No marker means revision 0.
pub(crate) fn revision_number(filename: &str) -> u32 {
    let patterns = [r"(?i)rev[\s._-]?(\d+)", r"(?i)v(\d+)"];
    for pattern in patterns {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        if let Some(caps) = re.captures(filename) {
            if let Some(digits) = caps.get(1) {
                if let Ok(n) = digits.as_str().parse() {
                    return n;
                }
            }
        }
    }
    0
}

/// Pick the "latest" reference document among the attached PDFs: the one
/// with the highest filename revision, later attachments winning ties.
/// Returns `None` when nothing PDF-like is attached.
pub(crate) fn pick_reference_doc(files: &[AttachedFile]) -> Option<&AttachedFile> {
    let mut best: Option<&AttachedFile> = None;
    let mut highest = 0;
    for file in files {
        let is_pdf = file.kind == FileKind::Pdf || file.name.to_lowercase().ends_with(".pdf");
        if !is_pdf {
            continue;
        }
        let rev = revision_number(&file.name);
        if best.is_none() || rev >= highest {
            best = Some(file);
            highest = rev;
        }
    }
    best
}

/// Filename with its extension stripped, used as the default service
/// description.
pub(crate) fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}
