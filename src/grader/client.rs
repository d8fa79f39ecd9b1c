//! 评分客户端实现
//!
//! 每次评估对 chat-completion 端点发起一次 POST；仅超时按固定间隔重试，
//! 其余失败立即返回。重试预算耗尽等价于最后一次超时，沿用超时哨兵。

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GraderConfig;
use crate::errors::{PortalError, Result};

use super::error::GradeError;

/// 评分标准系统提示词
const SYSTEM_PROMPT: &str = "你是一位严谨的编程作业评分助手。请根据题目要求评估学生提交的内容，\
从正确性、完整性、代码规范三个维度给出评语，并给出一个 0-100 的总分。\
评语使用中文，保持客观。";

/// 批量评估的输入项
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub code: String,
    pub requirements: String,
}

/// 批量评估的结果记录，按输入顺序排列
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub key: String,
    pub code: String,
    pub requirements: String,
    pub evaluation: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

pub struct GraderClient {
    http: reqwest::Client,
    config: GraderConfig,
}

impl GraderClient {
    pub fn new(config: &GraderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| PortalError::configuration(format!("评分客户端初始化失败: {e}")))?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// 核心调用：带重试的单条评估
    pub async fn try_evaluate(&self, user_prompt: &str) -> std::result::Result<String, GradeError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let budget = self.config.max_retries.max(1);
        for attempt in 1..=budget {
            debug!("Grading request attempt {}/{}", attempt, budget);

            match self.send_once(&body).await {
                Ok(content) => {
                    debug!("Grading request succeeded on attempt {}", attempt);
                    return Ok(content);
                }
                Err(GradeError::Timeout) => {
                    warn!("Grading request timed out ({}/{})", attempt, budget);
                    if attempt < budget {
                        tokio::time::sleep(Duration::from_secs(self.config.retry_delay)).await;
                    }
                }
                Err(e) => {
                    warn!("Grading request failed: {}", e);
                    return Err(e);
                }
            }
        }

        // 预算内全部超时
        Err(GradeError::Timeout)
    }

    /// 评估一段代码：题目要求 + 学生代码拼成用户提示词
    pub async fn evaluate_code(&self, student_code: &str, requirements: &str) -> String {
        let user_prompt = format!("{requirements}\n{student_code}\n请根据评分标准进行客观评价。");
        match self.try_evaluate(&user_prompt).await {
            Ok(content) => content,
            Err(e) => e.sentinel(),
        }
    }

    /// 评估整段作业内容（文档预览走这条路径）
    pub async fn evaluate_content(&self, content: &str) -> String {
        let user_prompt = format!("{content}\n请根据评分标准进行客观评价。");
        match self.try_evaluate(&user_prompt).await {
            Ok(content) => content,
            Err(e) => e.sentinel(),
        }
    }

    /// 顺序批量评估，条目之间固定停顿 1 秒以避开接口限流
    pub async fn batch_evaluate(&self, items: &[BatchItem]) -> Vec<BatchRecord> {
        let mut records = Vec::with_capacity(items.len());

        for (i, item) in items.iter().enumerate() {
            debug!("Batch grading item {}/{}", i + 1, items.len());

            let evaluation = self.evaluate_code(&item.code, &item.requirements).await;
            records.push(BatchRecord {
                key: format!("submission_{}", i + 1),
                code: item.code.clone(),
                requirements: item.requirements.clone(),
                evaluation,
            });

            if i + 1 < items.len() {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }

        records
    }

    async fn send_once(&self, body: &ChatRequest<'_>) -> std::result::Result<String, GradeError> {
        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(classify)?;

        let response = response.error_for_status().map_err(classify)?;

        let parsed: ChatResponse = response.json().await.map_err(classify)?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GradeError::MalformedResponse("choices 为空".to_string()))
    }
}

fn classify(e: reqwest::Error) -> GradeError {
    if e.is_timeout() {
        GradeError::Timeout
    } else if e.is_decode() {
        GradeError::MalformedResponse(e.to_string())
    } else if e.is_connect() || e.is_request() || e.status().is_some() {
        GradeError::Transport(e.to_string())
    } else {
        GradeError::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn test_config(addr: SocketAddr, timeout: u64, max_retries: u32) -> GraderConfig {
        GraderConfig {
            enabled: true,
            api_key: "sk-test".to_string(),
            api_url: format!("http://{addr}/v1/chat/completions"),
            model: "deepseek-coder".to_string(),
            temperature: 0.1,
            max_tokens: 256,
            timeout,
            max_retries,
            retry_delay: 0,
        }
    }

    async fn write_json_response(socket: &mut tokio::net::TcpStream, json: &str) {
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            json.len(),
            json
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    }

    /// 每次尝试都超时：恰好 max_retries 次尝试，返回超时哨兵
    #[tokio::test]
    async fn test_all_timeouts_exhaust_budget() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let server_hits = hits.clone();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                server_hits.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut buf = [0u8; 8192];
                    let _ = socket.read(&mut buf).await;
                    // 不回复，拖过客户端超时
                    tokio::time::sleep(Duration::from_secs(10)).await;
                });
            }
        });

        let client = GraderClient::new(&test_config(addr, 1, 3)).unwrap();
        let result = client.evaluate_code("print(1)", "输出数字 1").await;

        assert_eq!(result, "❌ 评分失败：请求超时，请稍后重试");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    /// 第一次超时、第二次成功：返回模型内容，不发起第三次
    #[tokio::test]
    async fn test_success_after_timeout_stops_retrying() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let server_hits = hits.clone();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                let attempt = server_hits.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut buf = [0u8; 8192];
                    let _ = socket.read(&mut buf).await;
                    if attempt == 0 {
                        tokio::time::sleep(Duration::from_secs(10)).await;
                    } else {
                        write_json_response(
                            &mut socket,
                            r#"{"choices":[{"message":{"content":"85 分，实现正确"}}]}"#,
                        )
                        .await;
                    }
                });
            }
        });

        let client = GraderClient::new(&test_config(addr, 1, 3)).unwrap();
        let result = client.evaluate_code("print(1)", "输出数字 1").await;

        assert_eq!(result, "85 分，实现正确");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    /// 响应缺少 choices：第一次尝试即返回格式错误哨兵，不重试
    #[tokio::test]
    async fn test_missing_choices_fails_without_retry() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let server_hits = hits.clone();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                server_hits.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut buf = [0u8; 8192];
                    let _ = socket.read(&mut buf).await;
                    write_json_response(&mut socket, r#"{"id":"cmpl-1"}"#).await;
                });
            }
        });

        let client = GraderClient::new(&test_config(addr, 5, 3)).unwrap();
        let result = client.evaluate_content("第一段内容").await;

        assert!(result.starts_with("❌ API响应格式错误："), "got: {result}");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    /// 非 2xx 状态：返回网络错误哨兵，不重试
    #[tokio::test]
    async fn test_server_error_maps_to_transport_sentinel() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let server_hits = hits.clone();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                server_hits.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut buf = [0u8; 8192];
                    let _ = socket.read(&mut buf).await;
                    let response =
                        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        let client = GraderClient::new(&test_config(addr, 5, 3)).unwrap();
        let result = client.evaluate_content("内容").await;

        assert!(result.starts_with("❌ 网络错误："), "got: {result}");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    /// 批量评估按顺序产出 submission_N 键
    #[tokio::test]
    async fn test_batch_evaluate_keys_preserve_order() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let mut n = 0usize;
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                n += 1;
                let body = format!(r#"{{"choices":[{{"message":{{"content":"第 {n} 份已评"}}}}]}}"#);
                tokio::spawn(async move {
                    let mut buf = [0u8; 8192];
                    let _ = socket.read(&mut buf).await;
                    write_json_response(&mut socket, &body).await;
                });
            }
        });

        let client = GraderClient::new(&test_config(addr, 5, 1)).unwrap();
        let items = vec![
            BatchItem {
                code: "print(1)".to_string(),
                requirements: "输出 1".to_string(),
            },
            BatchItem {
                code: "print(2)".to_string(),
                requirements: "输出 2".to_string(),
            },
        ];

        let records = client.batch_evaluate(&items).await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "submission_1");
        assert_eq!(records[1].key, "submission_2");
        assert_eq!(records[0].evaluation, "第 1 份已评");
        assert_eq!(records[1].code, "print(2)");
    }
}
