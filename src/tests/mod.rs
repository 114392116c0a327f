pub mod common;
mod config_loading;
mod document_serialization;
