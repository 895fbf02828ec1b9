/// Exchange schema URI root shared by the wire namespaces.
pub const SCHEMA_ROOT: &str = "http://schemas.microsoft.com/exchange/services/2006";

/// SOAP 1.1 envelope namespace.
pub const SOAP_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// EWS types namespace, conventionally bound to the `t:` prefix.
pub const TYPES_NS: &str = const_str::concat!(SCHEMA_ROOT, "/types");

/// EWS messages namespace, conventionally bound to the `m:` prefix.
pub const MESSAGES_NS: &str = const_str::concat!(SCHEMA_ROOT, "/messages");

/// Prefix used for elements in the types namespace.
pub const TYPES_PREFIX: &str = "t";

/// Prefix used for elements in the messages namespace.
pub const MESSAGES_PREFIX: &str = "m";

/// Wire datetime format for Exchange timestamps (UTC, second precision).
pub const EXCHANGE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
