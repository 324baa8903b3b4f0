#![allow(dead_code)]

use async_trait::async_trait;
use nyaya_gpt::api::{Completion, CompletionService, GenerationError, GenerationRequest};
use nyaya_gpt::FlowRunner;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Replays canned completions and records every request it receives.
#[derive(Default)]
pub struct StubCompletion {
    queue: Mutex<VecDeque<Result<Completion, String>>>,
    by_flow: Mutex<HashMap<&'static str, String>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl StubCompletion {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(self: &Arc<Self>, json: Value) -> Arc<Self> {
        self.push(Ok(Completion::Text(json.to_string())))
    }

    pub fn reply_text(self: &Arc<Self>, text: &str) -> Arc<Self> {
        self.push(Ok(Completion::Text(text.to_string())))
    }

    pub fn tool_call(self: &Arc<Self>, name: &str, arguments: Value) -> Arc<Self> {
        self.push(Ok(Completion::ToolCall {
            name: name.to_string(),
            arguments,
        }))
    }

    pub fn fail(self: &Arc<Self>, message: &str) -> Arc<Self> {
        self.push(Err(message.to_string()))
    }

    /// Answers every request of `flow` with `json`, regardless of order.
    pub fn reply_for(self: &Arc<Self>, flow: &'static str, json: Value) -> Arc<Self> {
        self.by_flow.lock().unwrap().insert(flow, json.to_string());
        Arc::clone(self)
    }

    fn push(self: &Arc<Self>, item: Result<Completion, String>) -> Arc<Self> {
        self.queue.lock().unwrap().push_back(item);
        Arc::clone(self)
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> String {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.prompt().to_string())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionService for StubCompletion {
    async fn generate(&self, request: &GenerationRequest) -> Result<Completion, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(text) = self.by_flow.lock().unwrap().get(request.flow) {
            return Ok(Completion::Text(text.clone()));
        }
        match self.queue.lock().unwrap().pop_front() {
            Some(Ok(completion)) => Ok(completion),
            Some(Err(message)) => Err(GenerationError::Service(message)),
            None => Err(GenerationError::Service("no canned response left".to_string())),
        }
    }
}

pub fn runner(stub: &Arc<StubCompletion>) -> FlowRunner {
    FlowRunner::new(stub.clone())
}

pub fn long_contract() -> String {
    "This Leave and License Agreement is made at Mumbai between the Licensor and the Licensee. \
     The Licensee shall pay a monthly fee of Rs. 40,000 and a refundable deposit of Rs. 2,00,000. \
     Either party may terminate with one month's notice."
        .to_string()
}
