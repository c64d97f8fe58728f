//! Tool definitions and handlers.
//!
//! Three tools are exposed, each backed by one ECP command:
//! - `press_key`: `POST /keypress/{Key}`
//! - `launch_app`: `POST /launch/{appId}`
//! - `get_device_info`: `GET /query/device-info`
//!
//! Every handler returns a human-readable string, success or not. Only a
//! malformed call (unknown tool, missing argument) is reported as an error.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::device_control::{DispatchResult, EcpCommand, EcpDispatcher};

/// The tool surface over a single dispatcher
#[derive(Debug, Clone, Copy, Default)]
pub struct TvTools {
    dispatcher: EcpDispatcher,
}

impl TvTools {
    #[cfg(test)]
    pub fn with_dispatcher(dispatcher: EcpDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Simulate a single remote button press
    pub async fn press_key(&self, tv_ip: &str, key_name: &str) -> String {
        let command = EcpCommand::keypress(key_name);
        let key = command.parameter().unwrap_or_default();

        match self.dispatcher.send_action(tv_ip, &command).await {
            DispatchResult::Success => {
                format!("Successfully sent '{}' keypress command to TV at {}.", key, tv_ip)
            }
            DispatchResult::Failure => format!(
                "Failed to send '{}' keypress. Check the IP, device status, and if the key name is valid.",
                key
            ),
        }
    }

    /// Launch an application by its channel ID
    pub async fn launch_app(&self, tv_ip: &str, app_id: &str) -> String {
        let command = EcpCommand::launch(app_id);

        match self.dispatcher.send_action(tv_ip, &command).await {
            DispatchResult::Success => format!(
                "Successfully sent launch command for app ID {} to TV at {}.",
                app_id, tv_ip
            ),
            DispatchResult::Failure => format!(
                "Failed to launch app ID {}. Ensure the app ID is correct and the TV is ready.",
                app_id
            ),
        }
    }

    /// Fetch the device-info document, returned as the device sent it
    pub async fn get_device_info(&self, tv_ip: &str) -> String {
        match self.dispatcher.send_query(tv_ip, &EcpCommand::DeviceInfo).await {
            Ok(xml) => xml,
            Err(e) => format!(
                "Error retrieving device info from {}: {}. Ensure 'Control by mobile apps' is enabled.",
                tv_ip, e
            ),
        }
    }

    /// Run a tool by name with JSON arguments
    pub async fn call(&self, name: &str, arguments: Value) -> Result<String, ToolCallError> {
        match name {
            "press_key" => {
                let args: PressKeyArgs = parse_args(name, arguments)?;
                Ok(self.press_key(&args.tv_ip, &args.key_name).await)
            }
            "launch_app" => {
                let args: LaunchAppArgs = parse_args(name, arguments)?;
                Ok(self.launch_app(&args.tv_ip, &args.app_id).await)
            }
            "get_device_info" => {
                let args: DeviceInfoArgs = parse_args(name, arguments)?;
                Ok(self.get_device_info(&args.tv_ip).await)
            }
            _ => Err(ToolCallError::UnknownTool(name.to_string())),
        }
    }
}

/// A tool call that could not be dispatched at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCallError {
    UnknownTool(String),
    InvalidArguments { tool: String, reason: String },
}

impl std::fmt::Display for ToolCallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolCallError::UnknownTool(name) => write!(f, "Unknown tool: {}", name),
            ToolCallError::InvalidArguments { tool, reason } => {
                write!(f, "Invalid arguments for {}: {}", tool, reason)
            }
        }
    }
}

impl std::error::Error for ToolCallError {}

#[derive(Deserialize)]
struct PressKeyArgs {
    tv_ip: String,
    key_name: String,
}

#[derive(Deserialize)]
struct LaunchAppArgs {
    tv_ip: String,
    app_id: String,
}

#[derive(Deserialize)]
struct DeviceInfoArgs {
    tv_ip: String,
}

fn parse_args<T: serde::de::DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolCallError> {
    // A call without arguments is treated like an empty object
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| ToolCallError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

/// JSON schema definitions for every tool
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "press_key",
            "description": "Simulates a single button press on the TV remote.\n\nCommon keys: Home, Back, Select, Up, Down, Left, Right, Play, Rev, Fwd, InstantReplay, Info, VolumeUp, VolumeDown, VolumeMute, PowerOff.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "tv_ip": {
                        "type": "string",
                        "description": "The IP address of the TV (e.g., 192.168.1.100)."
                    },
                    "key_name": {
                        "type": "string",
                        "description": "The name of the key to press (e.g., Home, Select, VolumeUp)."
                    }
                },
                "required": ["tv_ip", "key_name"]
            }
        }),
        json!({
            "name": "launch_app",
            "description": "Launches an application on the TV using its channel ID.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "tv_ip": {
                        "type": "string",
                        "description": "The IP address of the TV."
                    },
                    "app_id": {
                        "type": "string",
                        "description": "The Channel ID of the app (e.g., 12 for Netflix)."
                    }
                },
                "required": ["tv_ip", "app_id"]
            }
        }),
        json!({
            "name": "get_device_info",
            "description": "Retrieves basic device information (model, software version, etc.) as XML.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "tv_ip": {
                        "type": "string",
                        "description": "The IP address of the TV."
                    }
                },
                "required": ["tv_ip"]
            }
        }),
    ]
}
