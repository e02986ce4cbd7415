use wireget_net::{ParseWarning, Response};

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub response: Response,
    pub warnings: Vec<ParseWarning>,
}

impl FetchResult {
    pub fn new(response: Response, warnings: Vec<ParseWarning>) -> Self {
        Self { response, warnings }
    }

    pub fn status(&self) -> u16 {
        self.response.line.status_code
    }

    pub fn content_type(&self) -> Option<&str> {
        self.response.headers.get("content-type")
    }

    pub fn body(&self) -> &[u8] {
        &self.response.body
    }

    /// Lossy preview of the first `max` body bytes. Clamps to the body
    /// length, so short bodies are safe.
    pub fn body_preview(&self, max: usize) -> String {
        let body = self.body();
        let end = body.len().min(max);
        String::from_utf8_lossy(&body[..end]).into_owned()
    }
}
