//! Getting the sheet text from Google Sheets or from disk

use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::{config::Source, errors::Error};

/// Turns a sheet's edit link into its CSV export link.
///
/// `https://docs.google.com/spreadsheets/d/<id>/edit?usp=sharing` becomes
/// `https://docs.google.com/spreadsheets/d/<id>/export?format=csv`. Links not
/// ending in `/edit` are returned unchanged.
#[must_use]
pub fn export_url(sheet: &Url) -> Url {
    let mut export = sheet.clone();
    if let Some(base) = sheet.path().trim_end_matches('/').strip_suffix("/edit") {
        export.set_path(&format!("{base}/export"));
        export.set_query(Some("format=csv"));
        export.set_fragment(None);
    }
    export
}

/// Turns an export link back into the link that opens the sheet for editing
#[must_use]
pub fn edit_url(sheet: &Url) -> Url {
    let mut edit = sheet.clone();
    if let Some(base) = sheet.path().trim_end_matches('/').strip_suffix("/export") {
        edit.set_path(&format!("{base}/edit"));
        edit.set_query(None);
        edit.set_fragment(None);
    }
    edit
}

/// Rejects bodies that are web pages rather than CSV.
///
/// Google serves a sign-in page instead of the export when the sheet isn't
/// shared by link, so HTML here means a sharing problem, not bad data.
pub fn ensure_csv(body: &str) -> Result<(), Error> {
    let start: String = body.trim_start().chars().take(14).collect();
    let start = start.to_lowercase();
    if start.starts_with("<!doctype html") || start.starts_with("<html") {
        return Err(Error::HtmlResponse);
    }
    Ok(())
}

/// Downloads a sheet export and checks that it is CSV
pub async fn fetch_document(client: &Client, url: &Url) -> Result<String, Error> {
    info!(%url, "fetching sheet");
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status(status));
    }
    let body = response.text().await?;
    ensure_csv(&body)?;
    debug!(bytes = body.len(), "fetched sheet");
    Ok(body)
}

/// Reads the sheet text from wherever `source` points
pub async fn load_document(client: &Client, source: &Source) -> Result<String, Error> {
    match source {
        Source::Sheet(url) => fetch_document(client, &export_url(url)).await,
        Source::File(path) => {
            info!(path = %path.display(), "reading sheet file");
            let body = tokio::fs::read_to_string(path).await?;
            ensure_csv(&body)?;
            Ok(body)
        }
    }
}
