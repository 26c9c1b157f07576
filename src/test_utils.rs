//! テスト用ユーティリティ
//!
//! データセット、HTTP クライアント、外部コマンドのテストダブルを提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used, clippy::panic)]

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use crate::http::{
    FetchError,
    HttpClient,
    HttpResponse,
};
use crate::input::dataset::{
    DatasetError,
    DatasetReader,
    Feature,
};
use crate::process::{
    CommandError,
    CommandOutput,
    CommandRunner,
    SystemCommandRunner,
};

/// JSON オブジェクトからジオメトリなしの Feature を作成する
pub(crate) fn feature(properties: Value) -> Feature {
    let Value::Object(map) = properties else { panic!("properties must be a JSON object") };
    Feature::new(map, None)
}

/// ジオメトリ付きの Feature を作成する
pub(crate) fn feature_with_geometry(properties: Value, geometry: Value) -> Feature {
    Feature { geometry: Some(geometry), ..feature(properties) }
}

/// メモリ上のデータセット。読み込み回数を記録する
#[derive(Debug, Default)]
pub(crate) struct MemoryDataset {
    datasets: HashMap<String, Vec<Feature>>,
    reads: RefCell<HashMap<String, usize>>,
}

impl MemoryDataset {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, dataset: &str, features: Vec<Feature>) -> Self {
        self.datasets.insert(dataset.to_string(), features);
        self
    }

    /// `dataset` が読み込まれた回数
    pub(crate) fn reads(&self, dataset: &str) -> usize {
        self.reads.borrow().get(dataset).copied().unwrap_or_default()
    }
}

impl DatasetReader for MemoryDataset {
    fn read_features(&self, dataset: &str) -> Result<Vec<Feature>, DatasetError> {
        *self.reads.borrow_mut().entry(dataset.to_string()).or_default() += 1;
        Ok(self.datasets.get(dataset).cloned().unwrap_or_default())
    }
}

/// URL ごとに固定レスポンスを返す HTTP クライアント。未登録の URL は 404
#[derive(Debug, Default)]
pub(crate) struct FakeHttpClient {
    responses: HashMap<String, HttpResponse>,
    requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeHttpClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_response(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(url.to_string(), HttpResponse { status, body: body.to_string(), link: None });
        self
    }

    pub(crate) fn with_linked_response(mut self, url: &str, status: u16, body: &str, link: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            HttpResponse { status, body: body.to_string(), link: Some(link.to_string()) },
        );
        self
    }

    pub(crate) fn requested_urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(url, _)| url.clone()).collect()
    }

    pub(crate) fn requested_headers(&self) -> Vec<Vec<(String, String)>> {
        self.requests.borrow().iter().map(|(_, headers)| headers.clone()).collect()
    }
}

impl HttpClient for FakeHttpClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        let headers = headers.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        self.requests.borrow_mut().push((url.to_string(), headers));
        Ok(self
            .responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| HttpResponse { status: 404, body: String::new(), link: None }))
    }
}

/// 記録された外部コマンド呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandCall {
    pub(crate) program: String,
    pub(crate) args: Vec<String>,
    pub(crate) stdin: Option<Vec<u8>>,
}

/// 呼び出しを記録し、固定の出力を返すコマンドランナー
#[derive(Debug, Default)]
pub(crate) struct FakeCommandRunner {
    output: CommandOutput,
    calls: RefCell<Vec<CommandCall>>,
}

impl FakeCommandRunner {
    pub(crate) fn new() -> Self {
        Self { output: CommandOutput { status: Some(0), ..CommandOutput::default() }, ..Self::default() }
    }

    pub(crate) fn with_output(mut self, output: CommandOutput) -> Self {
        self.output = output;
        self
    }

    pub(crate) fn calls(&self) -> Vec<CommandCall> {
        self.calls.borrow().clone()
    }
}

/// 実際の `msgcat` が実行できるか
///
/// gettext がインストールされていない環境ではマージのテストをスキップする。
pub(crate) fn msgcat_available() -> bool {
    SystemCommandRunner
        .run("msgcat", &["--version".to_string()], None)
        .is_ok_and(|output| output.success())
}

impl CommandRunner for FakeCommandRunner {
    fn run(&self, program: &str, args: &[String], stdin: Option<&[u8]>) -> Result<CommandOutput, CommandError> {
        self.calls.borrow_mut().push(CommandCall {
            program: program.to_string(),
            args: args.to_vec(),
            stdin: stdin.map(<[u8]>::to_vec),
        });
        Ok(self.output.clone())
    }
}
