use super::glyphs::GlyphCollector;
use super::layout::{detect_tables, LayoutSettings};
use crate::error::{StatementError, StatementResult};
use crate::statement_model::RawRow;
use pdf_extract::Document;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Opened statement PDF. The document is parsed into memory on open, so
/// the file handle is released before any page is read.
pub struct StatementReader {
    document: Document,
    path: PathBuf,
    page_numbers: Vec<u32>,
    settings: LayoutSettings,
}

impl StatementReader {
    /// Open `path`, decrypting it with `password` when it is encrypted
    pub fn open(
        path: impl AsRef<Path>,
        password: Option<&str>,
        settings: LayoutSettings,
    ) -> StatementResult<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        if !path.exists() {
            return Err(StatementError::FileNotFound { path: shown });
        }

        let mut document = Document::load(path)
            .map_err(|e| StatementError::document_access(&shown, e.to_string()))?;

        if document.is_encrypted() {
            unlock(&mut document, password, &shown)?;
            debug!("Decrypted {}", shown);
        }

        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        info!("📄 Opened {} ({} pages)", shown, page_numbers.len());

        Ok(Self {
            document,
            path: path.to_path_buf(),
            page_numbers,
            settings,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    /// Tables found on one page, each a list of rows
    pub fn page_tables(&self, page_number: u32) -> StatementResult<Vec<Vec<RawRow>>> {
        let mut collector = GlyphCollector::new();

        let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::output_doc_page(&self.document, &mut collector, page_number)
        }));

        match rendered {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(StatementError::pdf_processing(format!(
                    "failed to read page {}: {}",
                    page_number, e
                )))
            }
            Err(_) => {
                return Err(StatementError::pdf_processing(format!(
                    "PDF library aborted while reading page {}",
                    page_number
                )))
            }
        }

        let glyphs = collector.into_glyphs();
        let tables = detect_tables(&glyphs, &self.settings);
        debug!(
            page = page_number,
            glyphs = glyphs.len(),
            tables = tables.len(),
            "Scanned page"
        );
        Ok(tables)
    }

    /// Lazy, single-pass rows of every table: page order, then table order,
    /// then row order. A page is only rendered when the iterator reaches it.
    pub fn rows(&self) -> RawRows<'_> {
        RawRows {
            reader: self,
            pages: self.page_numbers.iter(),
            pending: VecDeque::new(),
            failed: false,
        }
    }
}

/// Decrypt with the given password. Without one, only an empty user
/// password is tried, which opens owner-restricted statements.
fn unlock(document: &mut Document, password: Option<&str>, shown: &str) -> StatementResult<()> {
    match password {
        Some(password) => document
            .decrypt(password)
            .map_err(|e| StatementError::document_access(shown, format!("wrong password: {}", e))),
        None => document.decrypt("").map_err(|_| {
            StatementError::document_access(shown, "document is encrypted and no password was given")
        }),
    }
}

pub struct RawRows<'a> {
    reader: &'a StatementReader,
    pages: std::slice::Iter<'a, u32>,
    pending: VecDeque<RawRow>,
    failed: bool,
}

impl<'a> Iterator for RawRows<'a> {
    type Item = StatementResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.pop_front() {
                return Some(Ok(row));
            }
            if self.failed {
                return None;
            }

            let page = *self.pages.next()?;
            match self.reader.page_tables(page) {
                Ok(tables) => self.pending.extend(tables.into_iter().flatten()),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
