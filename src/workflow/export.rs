use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::context::AppContext;
use crate::domain::ticket::Ticket;
use crate::error::{AppResult, ExportError};
use crate::report::{REPORT_MEDIA_TYPE, render_html, report_file_name};

/// A finished, self-contained report ready to be saved.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

pub async fn export_report(
    ctx: &AppContext,
    tickets: &[Ticket],
) -> Result<ReportDocument, ExportError> {
    if tickets.is_empty() {
        return Err(ExportError::EmptyExportSet);
    }

    let logo = ctx.logo.fetch().await.map_err(|err| {
        error!(error = %err, "failed to fetch report logo");
        ExportError::AssetEmbed(err.to_string())
    })?;
    if logo.bytes.is_empty() {
        return Err(ExportError::AssetEmbed("logo asset is empty".to_string()));
    }

    let now = ctx.clock.now();
    let html = render_html(tickets, &logo.to_data_url(), &now);

    info!(
        tickets = tickets.len(),
        bytes = html.len(),
        "report generated"
    );
    Ok(ReportDocument {
        file_name: report_file_name(&now),
        media_type: REPORT_MEDIA_TYPE,
        bytes: html.into_bytes(),
    })
}

/// Saves the document under `dir`, returning the written path.
pub fn deliver(document: &ReportDocument, dir: &Path) -> AppResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&document.file_name);
    fs::write(&path, &document.bytes)?;
    info!(path = %path.display(), media_type = document.media_type, "report saved");
    Ok(path)
}
