//! Newsfeed engine: background fetch/parse pipeline and the load controller.
mod connectivity;
mod controller;
mod decode;
mod engine;
mod fetch;
mod parse;
mod types;

pub use connectivity::{ConnectivityProbe, StaticConnectivity, TcpConnectivityProbe};
pub use controller::{LoadController, LoadObserver};
pub use decode::{decode_body, DecodedBody};
pub use engine::{EngineHandle, EngineServices};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use parse::{
    parse_articles, parse_report, DropReason, GuardianResponseParser, ParseDiagnostic,
    ParseReport, ResponseParser,
};
pub use types::{EngineError, EngineEvent};
