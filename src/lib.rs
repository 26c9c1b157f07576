//! relay-l10n
//!
//! アプリの地図データ抽出とリレー所在地 (国・都市名) の翻訳カタログ生成ツール

pub mod catalogue;
pub mod config;
pub mod geo;
pub mod http;
pub mod indexer;
pub mod input;
pub mod integrate;
pub mod issues;
pub mod locale;
pub mod pipeline;
pub mod process;
pub mod relay;
pub mod stats;
#[cfg(test)]
mod test_utils;
pub mod translator;
pub mod types;

// Pipeline を再エクスポート
pub use pipeline::{
    Pipeline,
    PipelineError,
};
