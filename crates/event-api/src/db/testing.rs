//! Scripted [`Gateway`] double for unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::db::gateway::{Gateway, Param, Row};
use crate::error::AppResult;

/// A statement the double received.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub sql: String,
    pub params: Vec<Param>,
}

/// Answers each statement with the next queued reply.
///
/// `execute` consumes a reply too, so a queued error can fail an insert.
/// An empty queue answers with zero rows.
#[derive(Default)]
pub struct ScriptedGateway {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<VecDeque<AppResult<Vec<Row>>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_rows(&self, rows: Vec<Row>) {
        self.replies.lock().unwrap().push_back(Ok(rows));
    }

    pub fn reply_ok(&self) {
        self.reply_rows(Vec::new());
    }

    pub fn reply_err(&self, err: crate::error::AppError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, sql: &str, params: &[Param]) -> AppResult<Vec<Row>> {
        self.calls.lock().unwrap().push(Call {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn execute(&self, sql: &str, params: &[Param]) -> AppResult<()> {
        self.next(sql, params).map(|_| ())
    }

    async fn fetch_rows(&self, sql: &str, params: &[Param]) -> AppResult<Vec<Row>> {
        self.next(sql, params)
    }
}

/// Build a row from a JSON object literal.
pub fn row(value: serde_json::Value) -> Row {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("row fixture must be an object, got {}", other),
    }
}
