pub mod direct_downloader;
pub mod events;
pub mod file_sink;
pub mod filename;
pub mod http_client;
pub mod lookup;
pub mod url_parser;
