pub mod builder;
pub mod error;
pub mod handler;
pub mod http;
pub mod interpreter;
pub mod metadata;
pub mod transport;
pub mod types;

pub use error::{MetadataError, ProxyError};
pub use handler::{ConnectCallback, ConnectHandler};
pub use http::HttpConnectProxy;
pub use transport::{ConnectProxy, ProxyContext};
pub use types::{
    ClientError, ConnectEvent, ConnectReply, ConnectRequest, ConnectResult, Credentials,
    Disconnect, Encoding, ProxyCredentials, ReplyInfo, TransportInfo,
};
