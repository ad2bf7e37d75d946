// User-facing notification port
use async_trait::async_trait;

/// Blocking interactions with the admin: notifications, confirmations and
/// single-field questions.
#[async_trait]
pub trait Prompt: Send {
    async fn alert(&mut self, message: &str);

    async fn confirm(&mut self, question: &str) -> bool;

    /// Ask for one form field. Returns an empty string when nothing was given.
    async fn ask(&mut self, label: &str) -> String;
}
