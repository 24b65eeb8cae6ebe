use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tubesum::llm::{ChatModel, ChatRequest};
use tubesum::{Result, TubesumError};

#[derive(Clone)]
pub struct MockChat {
    pub reply: String,
    pub calls: Arc<Mutex<Vec<ChatRequest>>>,
    pub fail_with: Option<String>,
}

impl MockChat {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            reply: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

#[async_trait]
impl ChatModel for MockChat {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request);
        if let Some(ref msg) = self.fail_with {
            return Err(TubesumError::Llm(msg.clone()));
        }
        Ok(self.reply.clone())
    }
}
