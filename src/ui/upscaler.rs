//! State for the image upscaler page: selected upload, preview, result,
//! error, and the full-screen/comparison toggles.

use crate::encode::MAX_UPLOAD_BYTES;

/// Identifies one in-flight request. Completions carrying a token that is no
/// longer current are dropped, so rapid repeated triggers cannot land a stale
/// response on top of a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Mint the next token from a page-local counter.
    pub(crate) fn next(counter: &mut u64) -> Self {
        let token = RequestToken(*counter);
        *counter += 1;
        token
    }
}

/// An accepted file-picker selection.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub name: String,
    pub content_type: String,
    pub size: usize,
    /// Data URI used as the "before" preview.
    pub preview_data_uri: String,
}

#[derive(Debug, Default)]
pub struct UpscalerPage {
    selected: Option<SelectedImage>,
    upscaled_url: Option<String>,
    error: Option<String>,
    in_flight: Option<RequestToken>,
    next_token: u64,
    full_screen: bool,
    show_comparison: bool,
}

impl UpscalerPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// File-picker result. Oversized files are refused with the message shown
    /// to the user; the previous selection stays untouched.
    pub fn select_image(&mut self, image: SelectedImage) -> Result<(), String> {
        if image.size > MAX_UPLOAD_BYTES {
            return Err("Please select an image smaller than 10MB.".to_string());
        }
        self.selected = Some(image);
        Ok(())
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    pub fn upscaled_url(&self) -> Option<&str> {
        self.upscaled_url.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the upscale control is enabled.
    pub fn can_upscale(&self) -> bool {
        self.selected.is_some() && self.in_flight.is_none()
    }

    /// Start an upscale. Clears the prior result and error and returns the
    /// token the eventual completion must present. `None` while the control
    /// is disabled.
    pub fn begin_upscale(&mut self) -> Option<RequestToken> {
        if !self.can_upscale() {
            return None;
        }

        self.error = None;
        self.upscaled_url = None;

        let token = RequestToken::next(&mut self.next_token);
        self.in_flight = Some(token);
        Some(token)
    }

    /// Deliver the outcome of a request started with `token`. Stale tokens
    /// are ignored.
    pub fn finish_upscale(&mut self, token: RequestToken, outcome: Result<String, String>) {
        if self.in_flight != Some(token) {
            return;
        }

        self.in_flight = None;
        match outcome {
            Ok(url) => self.upscaled_url = Some(url),
            Err(message) => self.error = Some(message),
        }
    }

    pub fn show_comparison(&self) -> bool {
        self.show_comparison
    }

    pub fn toggle_comparison(&mut self) {
        self.show_comparison = !self.show_comparison;
    }

    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    /// Mirror of the host's fullscreen-change notification.
    pub fn set_full_screen(&mut self, full_screen: bool) {
        self.full_screen = full_screen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_png() -> SelectedImage {
        SelectedImage {
            name: "photo.png".to_string(),
            content_type: "image/png".to_string(),
            size: 2 * 1024 * 1024,
            preview_data_uri: "data:image/png;base64,AAAA".to_string(),
        }
    }

    #[test]
    fn upscale_requires_a_selection() {
        let mut page = UpscalerPage::new();
        assert!(!page.can_upscale());
        assert!(page.begin_upscale().is_none());
    }

    #[test]
    fn oversized_selection_is_refused_and_previous_kept() {
        let mut page = UpscalerPage::new();
        page.select_image(small_png()).unwrap();

        let oversized = SelectedImage {
            size: MAX_UPLOAD_BYTES + 1,
            ..small_png()
        };
        assert!(page.select_image(oversized).is_err());
        assert_eq!(page.selected().unwrap().size, 2 * 1024 * 1024);
    }

    #[test]
    fn begin_clears_prior_result_and_error() {
        let mut page = UpscalerPage::new();
        page.select_image(small_png()).unwrap();

        let token = page.begin_upscale().unwrap();
        page.finish_upscale(token, Err("Failed to upscale image".to_string()));
        assert!(page.error().is_some());

        let token = page.begin_upscale().unwrap();
        assert!(page.error().is_none());
        assert!(page.upscaled_url().is_none());
        page.finish_upscale(token, Ok("https://cdn.example/4x.png".to_string()));
        assert_eq!(page.upscaled_url(), Some("https://cdn.example/4x.png"));
    }

    #[test]
    fn control_is_disabled_while_in_flight() {
        let mut page = UpscalerPage::new();
        page.select_image(small_png()).unwrap();

        let _token = page.begin_upscale().unwrap();
        assert!(page.is_loading());
        assert!(page.begin_upscale().is_none());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut page = UpscalerPage::new();
        page.select_image(small_png()).unwrap();

        let stale = page.begin_upscale().unwrap();
        // The first request errors, freeing the control for a retry
        page.finish_upscale(stale, Err("timeout".to_string()));
        let current = page.begin_upscale().unwrap();

        // The stale outcome arrives late and must not land
        page.finish_upscale(stale, Ok("https://cdn.example/old.png".to_string()));
        assert!(page.upscaled_url().is_none());
        assert!(page.is_loading());

        page.finish_upscale(current, Ok("https://cdn.example/new.png".to_string()));
        assert_eq!(page.upscaled_url(), Some("https://cdn.example/new.png"));
    }

    #[test]
    fn toggles_flip_independently() {
        let mut page = UpscalerPage::new();
        page.toggle_comparison();
        assert!(page.show_comparison());
        assert!(!page.is_full_screen());

        page.set_full_screen(true);
        page.toggle_comparison();
        assert!(!page.show_comparison());
        assert!(page.is_full_screen());
    }
}
