//! State for the text-to-video page.

use crate::ui::upscaler::RequestToken;

#[derive(Debug, Default)]
pub struct VidifyPage {
    prompt: String,
    video_url: Option<String>,
    error: Option<String>,
    in_flight: Option<RequestToken>,
    next_token: u64,
}

impl VidifyPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the convert control is enabled: a non-blank prompt and no
    /// request already in flight.
    pub fn can_convert(&self) -> bool {
        !self.prompt.trim().is_empty() && self.in_flight.is_none()
    }

    /// Start a conversion, clearing the prior result and error.
    pub fn begin_convert(&mut self) -> Option<RequestToken> {
        if !self.can_convert() {
            return None;
        }

        self.error = None;
        self.video_url = None;

        let token = RequestToken::next(&mut self.next_token);
        self.in_flight = Some(token);
        Some(token)
    }

    /// Deliver the outcome of a request started with `token`. Stale tokens
    /// are ignored.
    pub fn finish_convert(&mut self, token: RequestToken, outcome: Result<String, String>) {
        if self.in_flight != Some(token) {
            return;
        }

        self.in_flight = None;
        match outcome {
            Ok(url) => self.video_url = Some(url),
            Err(message) => self.error = Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_prompt_disables_convert() {
        let mut page = VidifyPage::new();
        assert!(!page.can_convert());

        page.set_prompt("   \n\t");
        assert!(!page.can_convert());
        assert!(page.begin_convert().is_none());

        page.set_prompt("a cat surfing a wave");
        assert!(page.can_convert());
    }

    #[test]
    fn convert_is_single_flight() {
        let mut page = VidifyPage::new();
        page.set_prompt("a cat surfing a wave");

        let token = page.begin_convert().unwrap();
        assert!(page.is_loading());
        assert!(page.begin_convert().is_none());

        page.finish_convert(token, Ok("https://cdn.example/wave.mp4".to_string()));
        assert_eq!(page.video_url(), Some("https://cdn.example/wave.mp4"));
        assert!(!page.is_loading());
    }

    #[test]
    fn failure_shows_error_and_new_attempt_clears_it() {
        let mut page = VidifyPage::new();
        page.set_prompt("a cat surfing a wave");

        let token = page.begin_convert().unwrap();
        page.finish_convert(token, Err("Failed to generate video".to_string()));
        assert_eq!(page.error(), Some("Failed to generate video"));

        page.begin_convert().unwrap();
        assert!(page.error().is_none());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut page = VidifyPage::new();
        page.set_prompt("a cat surfing a wave");

        let stale = page.begin_convert().unwrap();
        page.finish_convert(stale, Err("timeout".to_string()));
        let current = page.begin_convert().unwrap();

        page.finish_convert(stale, Ok("https://cdn.example/old.mp4".to_string()));
        assert!(page.video_url().is_none());

        page.finish_convert(current, Ok("https://cdn.example/new.mp4".to_string()));
        assert_eq!(page.video_url(), Some("https://cdn.example/new.mp4"));
    }
}
