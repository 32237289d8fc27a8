//! # Platform-safe Names
//!
//! Every module, resource, service instance and destination name this crate
//! generates is derived from the descriptor ID (the *prefix*). The target
//! platform caps those names at different lengths depending on the kind of
//! entity, so each name has a [`NameRole`] carrying its fixed suffix and its
//! maximum length.
//!
//! The prefix is truncated to `max - suffix.len()` characters *before* the
//! suffix is appended, so the suffix survives intact and the result never
//! exceeds the role maximum. All generated names are sanitized with
//! [`format`] and match `^[A-Za-z0-9_-]+$` (given a non-empty prefix).

use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of the MTA ID and of module names.
pub const MAX_MTA_ID_LENGTH: usize = 128;
/// Maximum length of resource and service instance names.
pub const MAX_SERVICE_NAME_LENGTH: usize = 50;
/// Maximum length of destination names.
pub const MAX_DESTINATION_NAME_LENGTH: usize = 200;
/// Maximum length of the `sap.cloud.service` identifier.
pub const MAX_CLOUD_SERVICE_LENGTH: usize = 30;
/// Prefix cap used for ABAP service resource names.
pub const MAX_ABAP_SERVICE_PREFIX_LENGTH: usize = 24;
/// Service-name cap used for ABAP service resource names.
pub const MAX_ABAP_SERVICE_NAME_LENGTH: usize = 20;
/// Marker placed between prefix and service name of ABAP resources.
pub const ABAP_MARKER: &str = "-abap-";

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("static pattern is valid"));

/// Substitute `prefix` for every `%s` in `template` and replace each
/// character outside `[A-Za-z0-9_-]` with `_`.
///
/// ```
/// use mta_config::naming::format;
///
/// assert_eq!(format("%s-srv-api", "My.App!"), "My_App_-srv-api");
/// ```
pub fn format(template: &str, prefix: &str) -> String {
    sanitize(&template.replace("%s", prefix))
}

/// Replace each character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize(value: &str) -> String {
    DISALLOWED.replace_all(value, "_").into_owned()
}

/// Keep at most `max` characters of `value`.
pub fn truncate(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Every kind of name derived from the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameRole {
    Xsuaa,
    XsuaaService,
    XsuaaServiceKey,
    Destination,
    AppHost,
    AppHostService,
    AppHostServiceKey,
    Html5Runtime,
    Html5RuntimeService,
    Connectivity,
    Router,
    AppContent,
    DestinationContent,
    SrvApiDestination,
    CloudService,
}

impl NameRole {
    pub const ALL: [NameRole; 15] = [
        NameRole::Xsuaa,
        NameRole::XsuaaService,
        NameRole::XsuaaServiceKey,
        NameRole::Destination,
        NameRole::AppHost,
        NameRole::AppHostService,
        NameRole::AppHostServiceKey,
        NameRole::Html5Runtime,
        NameRole::Html5RuntimeService,
        NameRole::Connectivity,
        NameRole::Router,
        NameRole::AppContent,
        NameRole::DestinationContent,
        NameRole::SrvApiDestination,
        NameRole::CloudService,
    ];

    /// Fixed suffix appended to the truncated prefix.
    pub fn suffix(self) -> &'static str {
        match self {
            NameRole::Xsuaa => "-uaa",
            NameRole::XsuaaService => "-xsuaa-service",
            NameRole::XsuaaServiceKey => "-uaa-key",
            NameRole::Destination => "-destination-service",
            NameRole::AppHost => "-repo-host",
            NameRole::AppHostService => "-html5-service",
            NameRole::AppHostServiceKey => "-repo-host-key",
            NameRole::Html5Runtime => "-html5-repo-runtime",
            NameRole::Html5RuntimeService => "-html5-app-runtime-service",
            NameRole::Connectivity => "-connectivity",
            NameRole::Router => "-router",
            NameRole::AppContent => "-app-content",
            NameRole::DestinationContent => "-destination-content",
            NameRole::SrvApiDestination => "-srv-api",
            NameRole::CloudService => "",
        }
    }

    /// Platform ceiling for the complete name.
    pub fn max_len(self) -> usize {
        match self {
            NameRole::Router | NameRole::AppContent | NameRole::DestinationContent => {
                MAX_MTA_ID_LENGTH
            }
            NameRole::SrvApiDestination => MAX_DESTINATION_NAME_LENGTH,
            NameRole::CloudService => MAX_CLOUD_SERVICE_LENGTH,
            _ => MAX_SERVICE_NAME_LENGTH,
        }
    }

    /// Number of prefix characters kept before the suffix.
    pub fn prefix_len(self) -> usize {
        self.max_len().saturating_sub(self.suffix().len())
    }
}

/// Build the name for `role` from `prefix`.
pub fn role_name(role: NameRole, prefix: &str) -> String {
    let template = format!("%s{}", role.suffix());
    format(&template, truncate(prefix, role.prefix_len()))
}

/// Resource name binding an existing ABAP service: `<prefix>-abap-<service>`.
pub fn abap_service_name(prefix: &str, service_name: &str) -> String {
    sanitize(&format!(
        "{}{}{}",
        truncate(prefix, MAX_ABAP_SERVICE_PREFIX_LENGTH),
        ABAP_MARKER,
        truncate(service_name, MAX_ABAP_SERVICE_NAME_LENGTH)
    ))
}

/// Leading part shared by every ABAP service resource name of `prefix`.
pub fn abap_service_marker(prefix: &str) -> String {
    sanitize(&format!(
        "{}{}",
        truncate(prefix, MAX_ABAP_SERVICE_PREFIX_LENGTH),
        ABAP_MARKER
    ))
}

/// Destination name pointing at an application's HTML5 repository content.
pub fn app_host_destination(prefix: &str) -> String {
    format!("{}_html_repo_host", role_name(NameRole::CloudService, prefix))
}

/// Destination name pointing at the application's XSUAA tenant.
pub fn xsuaa_destination(prefix: &str) -> String {
    format!("{}_uaa", role_name(NameRole::CloudService, prefix))
}

/// Sanitized MTA ID for a new descriptor.
pub fn mta_id(id: &str) -> String {
    sanitize(truncate(id, MAX_MTA_ID_LENGTH))
}
