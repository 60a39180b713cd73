use std::path::PathBuf;

use clap::Args;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::export::{deliver, export_report};
use crate::workflow::ticket::sorted_newest_first;

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Directory to save the report into (defaults to the configured export directory).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

pub async fn run(ctx: &AppContext, args: ExportArgs) -> AppResult<PathBuf> {
    let tickets = sorted_newest_first(ctx.store.load_all());
    let document = export_report(ctx, &tickets).await?;
    let dir = args
        .output_dir
        .unwrap_or_else(|| ctx.config.export_dir.clone());
    deliver(&document, &dir)
}
