mod command;
mod ecp;
mod types;

pub use command::EcpCommand;
pub use ecp::EcpDispatcher;
pub use types::DispatchResult;
