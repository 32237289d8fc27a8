//! Fixed vocabulary used when reading and writing MTA descriptors.

/// File name of the base descriptor.
pub const MTA_FILE_NAME: &str = "mta.yaml";
/// File name of the extension descriptor layered over the base one.
pub const MTA_EXTENSION_FILE_NAME: &str = "mta-ext.mtaext";

pub const MTA_SCHEMA_VERSION: &str = "3.2";
pub const MTA_EXTENSION_SCHEMA_VERSION: &str = "3.1";
pub const MTA_VERSION: &str = "0.0.1";
pub const MTA_EXTENSION_VERSION: &str = "1.0.0";

// Resource types
pub const MANAGED_SERVICE: &str = "org.cloudfoundry.managed-service";
pub const EXISTING_SERVICE: &str = "org.cloudfoundry.existing-service";

// Module types
pub const HTML5_MODULE_TYPE: &str = "html5";
pub const APPROUTER_MODULE_TYPE: &str = "approuter.nodejs";
pub const CONTENT_MODULE_TYPE: &str = "com.sap.application.content";
pub const NODEJS_MODULE_TYPE: &str = "nodejs";
pub const JAVA_MODULE_TYPE: &str = "java";

// Services and plans
pub const XSUAA_SERVICE: &str = "xsuaa";
pub const HTML5_REPO_SERVICE: &str = "html5-apps-repo";
pub const DESTINATION_SERVICE: &str = "destination";
pub const CONNECTIVITY_SERVICE: &str = "connectivity";
pub const APP_HOST_PLAN: &str = "app-host";
pub const APP_RUNTIME_PLAN: &str = "app-runtime";
pub const XSUAA_PLAN: &str = "application";
pub const LITE_PLAN: &str = "lite";

/// Path of the router module created by this engine.
pub const ROUTER_PATH: &str = "router";
/// Path of the router module generated by `cds add approuter`.
pub const CAP_ROUTER_PATH: &str = "app/router";
pub const ROUTER_MEMORY: &str = "256M";
pub const XSUAA_CONFIG_PATH: &str = "./xs-security.json";

/// Name of the API provided by a CAP server module.
pub const SRV_API: &str = "srv-api";
/// Property reference resolving to the server module's URL.
pub const SRV_URL_REFERENCE: &str = "~{srv-api/srv-url}";
/// Sentinel destination name replaced by `<prefix>-srv-api`.
pub const DEFAULT_SERVICE_DESTINATION: &str = "fiori-default-srv-api";

pub const EXISTING_DESTINATIONS_POLICY: &str = "update";
pub const DESTINATION_CONFIG_VERSION: &str = "1.0.0";
pub const DEPLOY_MODE: &str = "html5-repo";
pub const ABAP_PROTOCOL: &str = "ODataV2";

// Default UI5 CDN destination
pub const UI5_DESTINATION_NAME: &str = "ui5";
pub const UI5_DESTINATION_URL: &str = "https://ui5.sap.com";

pub const NO_AUTHENTICATION: &str = "NoAuthentication";
pub const TOKEN_EXCHANGE_AUTHENTICATION: &str = "OAuth2UserTokenExchange";
pub const HTTP_DESTINATION: &str = "HTTP";
pub const INTERNET_PROXY: &str = "Internet";

// html5 module build
pub const HTML5_BUILD_RESULT: &str = "dist";
pub const HTML5_BUILDER: &str = "custom";
pub const HTML5_BUILD_COMMANDS: [&str; 2] = ["npm install", "npm run build:cf"];
pub const APP_CONTENT_BUILD_RESULT: &str = "resources";
pub const APP_CONTENT_TARGET_PATH: &str = "resources/";
