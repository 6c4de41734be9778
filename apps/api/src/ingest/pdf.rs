use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, warn};

use super::IngestError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Extracts text from PDF bytes, one entry per page in document order.
pub fn extract_pages(data: &[u8]) -> Result<Vec<String>, IngestError> {
    let raw = extract_raw_pages(data)?;
    let pages: Vec<String> = raw.iter().map(String::as_str).map(normalize_page).collect();
    debug!(
        pages = pages.len(),
        chars = pages.iter().map(|p| p.chars().count()).sum::<usize>(),
        "PDF text extracted"
    );
    Ok(pages)
}

fn extract_raw_pages(data: &[u8]) -> Result<Vec<String>, IngestError> {
    if !starts_with_magic(data) {
        return Err(IngestError::Pdf("missing %PDF- header".to_string()));
    }

    // pdf-extract panics on some malformed documents instead of erroring.
    match catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    })) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(IngestError::Pdf(e.to_string())),
        Err(_) => {
            warn!("PDF extractor panicked on malformed input");
            Err(IngestError::Pdf("malformed PDF".to_string()))
        }
    }
}

/// Some writers prefix the header with junk bytes; readers accept it within
/// the first kilobyte.
fn starts_with_magic(data: &[u8]) -> bool {
    let head = &data[..data.len().min(1024)];
    head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

/// Drops trailing whitespace on each line and collapses runs of blank lines.
fn normalize_page(page: &str) -> String {
    let mut out = String::with_capacity(page.len());
    let mut blank_run = 0;
    for line in page.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}
