//! Environment variable names, defaults and wire constants.

/// Environment variable naming the data proxy to create when none is given.
///
/// # Example
///
/// ```bash
/// export GA4GH_VRS_DATAPROXY_URI=seqrepo+file:///usr/local/share/seqrepo/latest
/// ```
pub const DATAPROXY_URI_ENV: &str = "GA4GH_VRS_DATAPROXY_URI";

/// Environment variable overriding the default REST service base URL.
pub const SEQREPO_REST_SERVICE_URL_ENV: &str = "SEQREPO_REST_SERVICE_URL";

pub const DEFAULT_SEQREPO_REST_SERVICE_URL: &str = "http://localhost:5000/seqrepo";

/// Version segment of the REST API path: `<base_url>/<version>/...`.
pub const REST_API_VERSION: &str = "1";

pub const SEQUENCE_ENDPOINT: &str = "sequence";
pub const METADATA_ENDPOINT: &str = "metadata";
