//! Webhook 알림 서비스.
//!
//! `{topic, subject, message}` JSON을 설정된 URL로 POST합니다.
//! SNS HTTP 게이트웨이나 Slack/Discord 호환 엔드포인트 앞단에 둘 수 있습니다.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::types::{
    Notification, NotificationError, NotificationEvent, NotificationPriority, NotificationResult,
    NotificationSender,
};

/// Webhook 전송 설정.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// POST 대상 URL
    pub url: String,
    /// 알림 토픽 (예: SNS topic ARN)
    pub topic: String,
    /// 전송 활성화 여부
    pub enabled: bool,
    /// 요청 타임아웃
    pub timeout: Duration,
}

impl WebhookConfig {
    /// 새 Webhook 설정을 생성합니다.
    pub fn new(url: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            topic: topic.into(),
            enabled: true,
            timeout: Duration::from_secs(10),
        }
    }

    /// 전송 활성화 여부를 지정합니다.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Webhook 알림 전송기.
pub struct WebhookSender {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookSender {
    /// 새 Webhook 전송기를 생성합니다.
    pub fn new(config: WebhookConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    /// 요청 본문을 만듭니다.
    fn payload(&self, notification: &Notification) -> serde_json::Value {
        serde_json::json!({
            "id": notification.id,
            "topic": self.config.topic,
            "subject": notification.subject,
            "message": notification.message(),
            "priority": notification.priority,
            "timestamp": notification.timestamp.to_rfc3339(),
        })
    }
}

#[async_trait]
impl NotificationSender for WebhookSender {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        if !self.is_enabled() {
            debug!("Webhook notifications are disabled, skipping");
            return Ok(());
        }

        let response = self
            .client
            .post(&self.config.url)
            .json(&self.payload(notification))
            .send()
            .await
            .map_err(NotificationError::NetworkError)?;

        if response.status().is_success() {
            info!(subject = %notification.subject, "Webhook notification sent");
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            warn!("Webhook rate limited");
            return Err(NotificationError::RateLimited(60));
        }

        error!("Failed to send webhook notification: {} - {}", status, body);
        Err(NotificationError::SendFailed(format!("HTTP {}: {}", status, body)))
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.url.is_empty()
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

/// 알림을 로그로만 남기는 전송기.
#[derive(Debug, Default)]
pub struct LogSender;

#[async_trait]
impl NotificationSender for LogSender {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        info!(
            subject = %notification.subject,
            priority = ?notification.priority,
            "{}",
            notification.message()
        );
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// 여러 전송기를 관리하는 알림 관리자.
#[derive(Default)]
pub struct NotificationManager {
    senders: Vec<Box<dyn NotificationSender>>,
}

impl NotificationManager {
    /// 새 알림 관리자를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 알림 전송기를 추가합니다.
    pub fn add_sender<S: NotificationSender + 'static>(&mut self, sender: S) {
        self.senders.push(Box::new(sender));
    }

    /// 활성화된 전송기 수
    pub fn enabled_count(&self) -> usize {
        self.senders.iter().filter(|s| s.is_enabled()).count()
    }

    /// 활성화된 모든 전송기를 통해 알림을 전송합니다.
    ///
    /// 활성 전송기가 하나뿐이고 그 전송이 실패한 경우에만 에러를 반환합니다.
    pub async fn notify(&self, notification: &Notification) -> NotificationResult<()> {
        let mut last_error = None;

        for sender in &self.senders {
            if sender.is_enabled() {
                if let Err(e) = sender.send(notification).await {
                    error!("Failed to send notification via {}: {}", sender.name(), e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if self.enabled_count() == 1 => Err(e),
            _ => Ok(()),
        }
    }

    /// 실행 요약 알림을 전송합니다.
    pub async fn notify_run_summary(
        &self,
        partition_records: Vec<usize>,
        written: usize,
        failed: usize,
        regions_uploaded: usize,
        regions_failed: Vec<String>,
    ) -> NotificationResult<()> {
        let priority = if failed > 0 || !regions_failed.is_empty() {
            NotificationPriority::High
        } else {
            NotificationPriority::Normal
        };

        let notification = Notification::new(NotificationEvent::RunSummary {
            partition_records,
            written,
            failed,
            regions_uploaded,
            regions_failed,
        })
        .with_priority(priority);

        self.notify(&notification).await
    }

    /// 시스템 오류 알림을 전송합니다.
    pub async fn notify_system_error(
        &self,
        error_code: &str,
        message: &str,
    ) -> NotificationResult<()> {
        let notification = Notification::new(NotificationEvent::SystemError {
            error_code: error_code.to_string(),
            message: message.to_string(),
        })
        .with_priority(NotificationPriority::Critical);

        self.notify(&notification).await
    }
}
