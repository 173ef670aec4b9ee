//! Column discovery for the CLI: local header sniffing with backend
//! fallback for server-known paths.

use std::path::Path;

use tracing::debug;

use csvcmp_client::BackendClient;
use csvcmp_ingest::sniff_header;
use csvcmp_model::ColumnsPayload;
use csvcmp_ui::{ColumnSource, FileSource};

/// [`ColumnSource`] backed by the local filesystem and the backend API.
pub struct CliColumnSource {
    client: BackendClient,
}

impl CliColumnSource {
    #[must_use]
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

impl ColumnSource for CliColumnSource {
    fn upload_columns(&self, source: &FileSource) -> Vec<String> {
        let Some(name) = source.display_name() else {
            return Vec::new();
        };
        match sniff_header(Path::new(name)) {
            Ok(columns) => columns,
            Err(err) => {
                debug!(file = name, error = %err, "header sniff failed");
                Vec::new()
            }
        }
    }

    fn remote_columns(&self, left_path: Option<&str>, right_path: Option<&str>) -> ColumnsPayload {
        self.client.fetch_columns(left_path, right_path)
    }
}
