use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "ignore_cves": {
                "type": ["array", "null"],
                "items": { "type": "string", "minLength": 1 }
            },
            "registory_domain": { "type": ["string", "null"] },
            "registry_domain": { "type": ["string", "null"] },
            "scanner": {
                "type": "object",
                "properties": {
                    "image": { "type": "string" },
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "severities": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "enum": ["UNKNOWN", "LOW", "MEDIUM", "HIGH", "CRITICAL"]
                        }
                    },
                    "docker_socket": { "type": "string" }
                }
            },
            "retry": {
                "type": "object",
                "properties": {
                    "max_retries": { "type": "integer", "minimum": 0, "maximum": 5 }
                }
            }
        }
    })
});
