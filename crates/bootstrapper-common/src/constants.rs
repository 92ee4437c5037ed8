//! Well-known file names, relative paths, and defaults.
//!
//! Paths are relative to the directory they are joined onto: the move
//! target, the input directory, or a per-container config directory.

/// Application name used in the version banner.
pub const APP_NAME: &str = "bootstrapper";

/// Default base path where the agent will be available inside the workload.
pub const DEFAULT_INSTALL_PATH: &str = "/opt/dynatrace/oneagent";

// ── Move ─────────────────────────────────────────────────────────────

/// Manifest describing technology-partitioned files, at the source root.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Version marker written by the agent installer, relative to the target.
pub const INSTALLER_VERSION_FILE_PATH: &str = "agent/installer.version";

/// Location of the "current version" symlink, relative to the target.
pub const CURRENT_VERSION_DIR: &str = "agent/bin/current";

// ── Process module config ────────────────────────────────────────────

/// Overlay payload for the process module config, in the input directory.
pub const PMC_INPUT_FILE_NAME: &str = "ruxitagentproc.json";

/// Baseline process module config shipped with the agent, relative to the target.
pub const PMC_SOURCE_PATH: &str = "agent/conf/ruxitagentproc.conf";

/// Merged process module config, relative to a container config directory.
pub const PMC_DESTINATION_PATH: &str = "oneagent/agent/config/ruxitagentproc.conf";

/// Storage location injected for read-only installs.
pub const READONLY_STORAGE_PATH: &str = "/var/lib/dynatrace/oneagent";

// ── Agent config files ───────────────────────────────────────────────

/// Preload config, relative to the config directory.
pub const PRELOAD_CONFIG_PATH: &str = "oneagent/ld.so.preload";

/// Agent shared object, relative to the install path.
pub const LIB_AGENT_PROC_PATH: &str = "agent/lib64/liboneagentproc.so";

/// Container config, relative to a container config directory.
pub const CONTAINER_CONF_PATH: &str = "oneagent/agent/config/container.conf";

/// Directory for certificates and curl options, relative to a container config directory.
pub const CUSTOM_KEYS_PATH: &str = "oneagent/agent/customkeys";

/// Combined certificate bundle file name.
pub const CERTS_FILE_NAME: &str = "custom.pem";

/// Proxy certificate bundle file name.
pub const PROXY_CERTS_FILE_NAME: &str = "custom_proxy.pem";

/// Trusted CA input file name.
pub const TRUSTED_CERTS_INPUT_FILE: &str = "trusted.pem";

/// `ActiveGate` CA input file name.
pub const ACTIVEGATE_CERTS_INPUT_FILE: &str = "activegate.pem";

/// Curl options file name.
pub const CURL_OPTIONS_FILE_NAME: &str = "curl_options.conf";

/// Initial connect retry input file name.
pub const INITIAL_CONNECT_RETRY_INPUT_FILE: &str = "initial-connect-retry";

// ── Enrichment ───────────────────────────────────────────────────────

/// Metadata JSON, relative to a container config directory.
pub const METADATA_JSON_PATH: &str = "enrichment/dt_metadata.json";

/// Metadata properties, relative to a container config directory.
pub const METADATA_PROPERTIES_PATH: &str = "enrichment/dt_metadata.properties";

/// Endpoint directory, relative to a container config directory.
pub const ENDPOINT_DIR: &str = "enrichment/endpoint";

/// Endpoint properties file name, both as input and output.
pub const ENDPOINT_FILE_NAME: &str = "endpoint.properties";

// ── Permissions ──────────────────────────────────────────────────────

/// Mode used for generated directories and files (before umask).
pub const DEFAULT_MODE: u32 = 0o777;
