/// Error type that can be returned by fallible operations in this crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured source is neither a Google Sheets link nor a readable path
    #[error("Please provide a valid Google Sheet URL or CSV file: {0}")]
    InvalidSource(String),
    /// The sheet answered with a web page, which happens when it isn't shared publicly
    #[error("Received HTML instead of CSV. Please ensure the sheet's sharing settings are set to 'Anyone with the link can view'.")]
    HtmlResponse,
    /// A command-line flag or configuration value could not be used
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// The configuration file exists but isn't valid JSON for [`Config`](crate::config::Config)
    #[error("Invalid configuration file")]
    ConfigFile(#[source] serde_json::Error),
    /// The sheet was reached but didn't answer with a success status
    #[error("Network response was not ok: {0}")]
    Status(reqwest::StatusCode),
    /// The sheet could not be reached or its body could not be read
    #[error("Error fetching sheet")]
    Transport(#[from] reqwest::Error),
    /// Reading a local file failed
    #[error("Error reading input")]
    Io(#[from] std::io::Error),
    /// Writing CSV output failed; could wrap IO or serialization errors
    #[error("Error writing CSV")]
    Output(#[from] csv::Error),
    /// Writing JSON output failed
    #[error("Error writing JSON")]
    Json(#[source] serde_json::Error),
}

impl Error {
    /// Whether the error comes from how the dashboard is set up, rather than from
    /// reaching the sheet or writing results
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidSource(_) | Error::HtmlResponse | Error::Config(_) | Error::ConfigFile(_)
        )
    }

    /// The one line shown to the user when a load fails.
    ///
    /// Setup problems are shown as they are, since the user can fix them. Other
    /// failures get a generic line; their details go to the log.
    #[must_use]
    pub fn status_message(&self) -> String {
        if self.is_configuration() {
            self.to_string()
        } else {
            "Error: failed to load data. Check the log, the URL and the sheet's sharing settings."
                .to_string()
        }
    }
}
